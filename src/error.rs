// src/error.rs
// Error types for the catalog and its bootstrap

use thiserror::Error;

/// Main error type for the pricebot library
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("phone model must not be empty")]
    EmptyModel,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// True when the backing store failed, as opposed to a rejected input
    pub fn is_store_failure(&self) -> bool {
        matches!(self, CatalogError::StoreUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model_error() {
        let err = CatalogError::EmptyModel;
        assert!(err.to_string().contains("must not be empty"));
        assert!(!err.is_store_failure());
    }

    #[test]
    fn test_config_error() {
        let err = CatalogError::Config("PRICEBOT_ADMIN_ID is not set".to_string());
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("PRICEBOT_ADMIN_ID"));
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: CatalogError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, CatalogError::StoreUnavailable(_)));
        assert!(err.is_store_failure());
        assert!(err.to_string().contains("store unavailable"));
    }

    #[test]
    fn test_result_err() {
        let result: Result<bool> = Err(CatalogError::EmptyModel);
        assert!(result.is_err());
    }
}
