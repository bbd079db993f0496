//! Upsert contract of the catalog store, exercised against the in-memory implementation.

mod common;

use catalog_core::common::Source;
use catalog_core::domains::products::{CatalogStore, UpsertSummary, MAX_LINK_LEN};
use catalog_core::kernel::InMemoryCatalogStore;
use common::*;

#[tokio::test]
async fn repeated_upserts_never_duplicate_a_product_id() {
    let store = InMemoryCatalogStore::new();
    let item = listing(Source::Naver, "1");

    for _ in 0..5 {
        store.upsert(&[item.clone()], "핸드크림").await.unwrap();
    }

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn upsert_updates_price_in_place_and_keeps_surrogate_id() {
    let store = InMemoryCatalogStore::new();
    store
        .upsert(&listings(Source::Naver, &["1", "2"]), "디퓨저")
        .await
        .unwrap();
    let before = store.find_by_product_id("naver-2").await.unwrap().unwrap();

    let summary = store
        .upsert(&[priced(listing(Source::Naver, "2"), 7_500)], "디퓨저")
        .await
        .unwrap();

    let after = store.find_by_product_id("naver-2").await.unwrap().unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.inserted, 0);
    assert_eq!(after.id, before.id);
    assert_eq!(after.price, 7_500);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn keyword_is_overwritten_by_the_latest_ingestion() {
    let store = InMemoryCatalogStore::new();
    let item = listing(Source::Kream, "55");

    store.upsert(&[item.clone()], "백팩").await.unwrap();
    store.upsert(&[item], "크로스백").await.unwrap();

    let product = store.find_by_product_id("kream-55").await.unwrap().unwrap();
    assert_eq!(product.keyword, "크로스백");

    let by_old = store
        .find_by_keywords(&["백팩".to_string()], 0)
        .await
        .unwrap();
    assert!(by_old.is_empty());
}

#[tokio::test]
async fn brand_and_category_survive_later_upserts() {
    let store = InMemoryCatalogStore::new();
    store
        .upsert(&[in_category(listing(Source::Kream, "9"), "한정판")], "향수")
        .await
        .unwrap();

    let mut changed = listing(Source::Kream, "9");
    changed.brand = Some("Other".to_string());
    changed.category = Some("라이프".to_string());
    store.upsert(&[changed], "향수").await.unwrap();

    let product = store.find_by_product_id("kream-9").await.unwrap().unwrap();
    assert_eq!(product.brand.as_deref(), Some("Acme"));
    assert_eq!(product.category.as_deref(), Some("한정판"));
}

#[tokio::test]
async fn overlong_links_are_skipped_without_aborting_the_batch() {
    let store = InMemoryCatalogStore::new();
    let mut too_long = listing(Source::Coupang, "1");
    too_long.link = format!("https://www.coupang.com/{}", "x".repeat(MAX_LINK_LEN));

    let summary = store
        .upsert(&[too_long, listing(Source::Coupang, "2")], "스마트워치")
        .await
        .unwrap();

    assert_eq!(
        summary,
        UpsertSummary {
            inserted: 1,
            updated: 0,
            skipped: 1
        }
    );
    assert!(store.find_by_product_id("coupang-1").await.unwrap().is_none());
}

#[tokio::test]
async fn keyword_lookup_pages_twenty_per_keyword() {
    let store = InMemoryCatalogStore::new();
    let ids: Vec<String> = (0..25).map(|i| i.to_string()).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    store
        .upsert(&listings(Source::Naver, &id_refs), "초콜릿")
        .await
        .unwrap();
    store
        .upsert(&listings(Source::Kream, &["a", "b"]), "텀블러")
        .await
        .unwrap();

    let keywords = vec!["초콜릿".to_string(), "텀블러".to_string()];
    let first = store.find_by_keywords(&keywords, 0).await.unwrap();
    let second = store.find_by_keywords(&keywords, 1).await.unwrap();

    assert_eq!(first.len(), 22);
    assert_eq!(first[0].keyword, "초콜릿");
    assert_eq!(first[21].keyword, "텀블러");
    assert_eq!(second.len(), 5);
}

#[tokio::test]
async fn update_link_replaces_only_the_link() {
    let store = InMemoryCatalogStore::new();
    store
        .upsert(&[listing(Source::Coupang, "42")], "안마기기")
        .await
        .unwrap();
    let product = store.find_by_product_id("coupang-42").await.unwrap().unwrap();

    store
        .update_link(product.id, "https://link.coupang.com/a/42")
        .await
        .unwrap();

    let updated = store.find_by_product_id("coupang-42").await.unwrap().unwrap();
    assert_eq!(updated.link.as_deref(), Some("https://link.coupang.com/a/42"));
    assert_eq!(updated.title, product.title);
    assert_eq!(updated.keyword, "안마기기");
}
