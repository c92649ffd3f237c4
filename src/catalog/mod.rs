//! Catalog store - persisted phone records keyed by case-folded model name
//!
//! Every operation opens its own transaction and commits before returning.
//! Nothing is cached between calls; the database is the only source of truth.
//! Store failures are logged here and handed back as
//! [`CatalogError::StoreUnavailable`] so callers can branch on them.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// One catalog entry. `price` and `storage` are display strings, echoed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PhoneRecord {
    pub model: String,
    pub price: String,
    pub storage: String,
}

impl PhoneRecord {
    pub fn new(model: impl Into<String>, price: impl Into<String>, storage: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            price: price.into(),
            storage: storage.into(),
        }
    }
}

/// Model name and price, as shown by `/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PhoneListing {
    pub model: String,
    pub price: String,
}

/// Comparison key for model names. ASCII-only folding; other characters pass through.
pub fn fold_case(model: &str) -> String {
    model.to_ascii_lowercase()
}

fn store_failure(op: &'static str) -> impl FnOnce(sqlx::Error) -> CatalogError {
    move |e| {
        warn!(op, error = %e, "catalog store operation failed");
        CatalogError::StoreUnavailable(e)
    }
}

#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every record whose folded model contains the folded query, in store order.
    ///
    /// The match is literal: `%` and `_` are ordinary characters. An empty
    /// query is contained in every model and so returns the whole catalog.
    pub async fn find_by_substring(&self, query: &str) -> Result<Vec<PhoneRecord>> {
        let needle = fold_case(query);
        let records = self
            .find_tx(&needle)
            .await
            .map_err(store_failure("find_by_substring"))?;
        debug!(query, matches = records.len(), "catalog lookup");
        Ok(records)
    }

    async fn find_tx(&self, needle: &str) -> sqlx::Result<Vec<PhoneRecord>> {
        let mut tx = self.pool.begin().await?;
        let records = sqlx::query_as::<_, PhoneRecord>(
            "SELECT model, price, storage FROM phones WHERE instr(model_key, $1) > 0 ORDER BY id",
        )
        .bind(needle)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(records)
    }

    /// Insert a record, or fully replace the one whose model folds to the same key.
    ///
    /// A replaced record takes a new position at the end of the store order.
    pub async fn upsert(&self, model: &str, price: &str, storage: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(CatalogError::EmptyModel);
        }

        self.upsert_tx(model, price, storage)
            .await
            .map_err(store_failure("upsert"))?;
        info!(model, price, storage, "phone upserted");
        Ok(())
    }

    async fn upsert_tx(&self, model: &str, price: &str, storage: &str) -> sqlx::Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO phones (model, model_key, price, storage)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(model)
        .bind(fold_case(model))
        .bind(price)
        .bind(storage)
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }

    /// Remove the record whose model folds to the same key. `Ok(false)` when nothing matched.
    pub async fn delete_exact(&self, model: &str) -> Result<bool> {
        let key = fold_case(model);
        let removed = self
            .execute_tx("DELETE FROM phones WHERE model_key = $1", &[key.as_str()])
            .await
            .map_err(store_failure("delete_exact"))?;
        if removed > 0 {
            info!(model, "phone deleted");
        }
        Ok(removed > 0)
    }

    /// Set the price of an existing record. Never inserts.
    pub async fn update_price(&self, model: &str, new_price: &str) -> Result<bool> {
        let key = fold_case(model);
        let updated = self
            .execute_tx(
                "UPDATE phones SET price = $1 WHERE model_key = $2",
                &[new_price, key.as_str()],
            )
            .await
            .map_err(store_failure("update_price"))?;
        if updated > 0 {
            info!(model, new_price, "phone price updated");
        }
        Ok(updated > 0)
    }

    /// Remove every record; returns how many were removed. Succeeds on an empty catalog.
    pub async fn clear_all(&self) -> Result<u64> {
        let removed = self
            .execute_tx("DELETE FROM phones", &[])
            .await
            .map_err(store_failure("clear_all"))?;
        info!(removed, "catalog cleared");
        Ok(removed)
    }

    async fn execute_tx(&self, sql: &str, binds: &[&str]) -> sqlx::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let affected = query.execute(&mut *tx).await?.rows_affected();
        tx.commit().await?;
        Ok(affected)
    }

    /// Model and price of every record, in store order
    pub async fn list_all(&self) -> Result<Vec<PhoneListing>> {
        self.list_tx().await.map_err(store_failure("list_all"))
    }

    async fn list_tx(&self) -> sqlx::Result<Vec<PhoneListing>> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, PhoneListing>("SELECT model, price FROM phones ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM phones")
            .fetch_one(&self.pool)
            .await
            .map_err(store_failure("count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup_store() -> CatalogStore {
        CatalogStore::new(db::connect_in_memory().await.unwrap())
    }

    async fn seeded_store() -> CatalogStore {
        let store = setup_store().await;
        store.upsert("iPhone 12", "$499", "64GB").await.unwrap();
        store.upsert("iPhone 12 Pro", "$599", "128GB").await.unwrap();
        store.upsert("Galaxy S22", "$799", "256GB").await.unwrap();
        store
    }

    #[test]
    fn test_fold_case_is_ascii_only() {
        assert_eq!(fold_case("iPhone 15 PRO"), "iphone 15 pro");
        assert_eq!(fold_case("ÉCLAIR"), "Éclair");
    }

    #[tokio::test]
    async fn test_find_by_substring_matches_every_containing_model() {
        let store = seeded_store().await;

        let found = store.find_by_substring("IPHONE 12").await.unwrap();
        let models: Vec<_> = found.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(models, vec!["iPhone 12", "iPhone 12 Pro"]);

        // Every non-empty substring of a stored model finds it
        for query in ["i", "phone", "12 p", "Pro", "o"] {
            let found = store.find_by_substring(query).await.unwrap();
            assert!(
                found.iter().any(|r| r.model == "iPhone 12 Pro"),
                "query {query:?} should match"
            );
        }
    }

    #[tokio::test]
    async fn test_find_by_substring_empty_query_matches_all() {
        let store = seeded_store().await;
        let found = store.find_by_substring("").await.unwrap();
        assert_eq!(found.len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_substring_treats_wildcards_literally() {
        let store = seeded_store().await;
        assert!(store.find_by_substring("%").await.unwrap().is_empty());
        assert!(store.find_by_substring("iPhone_12").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_substring_no_match() {
        let store = seeded_store().await;
        assert!(store.find_by_substring("pixel").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_case_insensitively() {
        let store = setup_store().await;
        store.upsert("iPhone 15", "$899", "128GB").await.unwrap();
        store.upsert("IPHONE 15", "$849", "256GB").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let found = store.find_by_substring("iphone 15").await.unwrap();
        assert_eq!(found, vec![PhoneRecord::new("IPHONE 15", "$849", "256GB")]);
    }

    #[tokio::test]
    async fn test_upsert_rejects_empty_model() {
        let store = setup_store().await;
        let err = store.upsert("   ", "$1", "1GB").await.unwrap_err();
        assert!(matches!(err, CatalogError::EmptyModel));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replaced_record_moves_to_end_of_listing() {
        let store = seeded_store().await;
        store.upsert("iphone 12", "$450", "64GB").await.unwrap();

        let listing = store.list_all().await.unwrap();
        let models: Vec<_> = listing.iter().map(|l| l.model.as_str()).collect();
        assert_eq!(models, vec!["iPhone 12 Pro", "Galaxy S22", "iphone 12"]);
    }

    #[tokio::test]
    async fn test_update_price_never_creates() {
        let store = seeded_store().await;

        assert!(!store.update_price("Pixel 8", "$699").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 3);

        assert!(store.update_price("galaxy s22", "$749").await.unwrap());
        let found = store.find_by_substring("galaxy").await.unwrap();
        assert_eq!(found[0].price, "$749");
        assert_eq!(found[0].storage, "256GB");
        assert_eq!(found[0].model, "Galaxy S22");
    }

    #[tokio::test]
    async fn test_delete_exact() {
        let store = seeded_store().await;

        // Substrings don't count for delete
        assert!(!store.delete_exact("iPhone").await.unwrap());
        assert!(store.delete_exact("IPHONE 12").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);

        assert!(!store.delete_exact("iPhone 12").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = seeded_store().await;
        assert_eq!(store.clear_all().await.unwrap(), 3);
        assert!(store.list_all().await.unwrap().is_empty());

        // Already empty is still a success
        assert_eq!(store.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_in_store_order() {
        let store = seeded_store().await;
        let listing = store.list_all().await.unwrap();
        assert_eq!(
            listing,
            vec![
                PhoneListing { model: "iPhone 12".into(), price: "$499".into() },
                PhoneListing { model: "iPhone 12 Pro".into(), price: "$599".into() },
                PhoneListing { model: "Galaxy S22".into(), price: "$799".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_closed_pool_reports_store_unavailable() {
        let pool = db::connect_in_memory().await.unwrap();
        let store = CatalogStore::new(pool.clone());
        pool.close().await;

        let err = store.upsert("iPhone 15", "$899", "128GB").await.unwrap_err();
        assert!(err.is_store_failure());
        assert!(store.find_by_substring("iphone").await.unwrap_err().is_store_failure());
        assert!(store.clear_all().await.unwrap_err().is_store_failure());
    }
}
