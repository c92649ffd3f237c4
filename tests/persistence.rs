// tests/persistence.rs
// Catalog contents survive reopening the database file

use pricebot::{CatalogStore, PhoneRecord, db};
use tempfile::TempDir;

#[tokio::test]
async fn records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("phones.db").display());

    {
        let pool = db::connect(&url).await.unwrap();
        let store = CatalogStore::new(pool.clone());
        store.upsert("iPhone 15", "$899", "128GB").await.unwrap();
        store.upsert("Galaxy S22", "$799", "256GB").await.unwrap();
        assert!(store.delete_exact("galaxy s22").await.unwrap());
        pool.close().await;
    }

    let store = CatalogStore::new(db::connect(&url).await.unwrap());
    assert_eq!(
        store.find_by_substring("").await.unwrap(),
        vec![PhoneRecord::new("iPhone 15", "$899", "128GB")]
    );
}

#[tokio::test]
async fn connect_creates_missing_database_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.db");
    assert!(!path.exists());

    let pool = db::connect(&format!("sqlite://{}", path.display())).await.unwrap();
    assert!(path.exists());
    assert_eq!(CatalogStore::new(pool).count().await.unwrap(), 0);
}
