//! Listing fixtures shared by integration tests.

use catalog_core::common::{Listing, Source};

/// A listing for `source` with a link and id derived from `id`
pub fn listing(source: Source, id: &str) -> Listing {
    Listing {
        product_id: format!("{}-{}", source.mall_name().to_lowercase(), id),
        title: format!("{} item {}", source, id),
        price: 10_000,
        image: Some(format!("https://img.example.com/{}.jpg", id)),
        mall_name: source.mall_name().to_string(),
        link: format!("https://shop.example.com/products/{}", id),
        brand: Some("Acme".to_string()),
        category: None,
    }
}

pub fn priced(mut listing: Listing, price: i32) -> Listing {
    listing.price = price;
    listing
}

pub fn in_category(mut listing: Listing, category: &str) -> Listing {
    listing.category = Some(category.to_string());
    listing
}

pub fn listings(source: Source, ids: &[&str]) -> Vec<Listing> {
    ids.iter().map(|id| listing(source, id)).collect()
}
