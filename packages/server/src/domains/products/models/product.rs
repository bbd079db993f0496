use serde::{Deserialize, Serialize};

use crate::common::Listing;

/// A persisted catalog row.
///
/// `id` is the store-assigned surrogate key; `product_id` is the external dedup key.
/// `keyword` holds only the most recent keyword that wrote this row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub product_id: String,
    pub title: String,
    pub price: i32,
    pub image: Option<String>,
    pub mall_name: String,
    pub link: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub keyword: String,
}

impl Product {
    /// Build a new row from a candidate listing (used by stores that assign ids themselves)
    pub fn from_listing(id: i64, listing: &Listing, keyword: &str) -> Self {
        Self {
            id,
            product_id: listing.product_id.clone(),
            title: listing.title.clone(),
            price: listing.price,
            image: listing.image.clone(),
            mall_name: listing.mall_name.clone(),
            link: Some(listing.link.clone()),
            brand: listing.brand.clone(),
            category: listing.category.clone(),
            keyword: keyword.to_string(),
        }
    }

    /// Overwrite the mutable display fields and the keyword in place.
    ///
    /// `id`, `product_id`, `brand` and `category` are left untouched.
    pub fn merge_listing(&mut self, listing: &Listing, keyword: &str) {
        self.title = listing.title.clone();
        self.price = listing.price;
        self.image = listing.image.clone();
        self.link = Some(listing.link.clone());
        self.mall_name = listing.mall_name.clone();
        self.keyword = keyword.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: i32) -> Listing {
        Listing {
            product_id: "p-1".into(),
            title: "Hand cream".into(),
            price,
            image: Some("https://img.example/1.png".into()),
            mall_name: "Naver".into(),
            link: "https://shop.example/1".into(),
            brand: Some("Acme".into()),
            category: Some("Beauty".into()),
        }
    }

    #[test]
    fn merge_overwrites_display_fields_and_keyword_only() {
        let mut product = Product::from_listing(7, &listing(1000), "gift");

        let mut changed = listing(900);
        changed.title = "Hand cream 50ml".into();
        changed.brand = Some("Other".into());
        changed.category = Some("Other".into());
        product.merge_listing(&changed, "hand cream");

        assert_eq!(product.id, 7);
        assert_eq!(product.price, 900);
        assert_eq!(product.title, "Hand cream 50ml");
        assert_eq!(product.keyword, "hand cream");
        assert_eq!(product.brand.as_deref(), Some("Acme"));
        assert_eq!(product.category.as_deref(), Some("Beauty"));
    }
}
