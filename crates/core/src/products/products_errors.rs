use thiserror::Error;

/// Errors raised by catalog lookups during goal creation.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Product is not available: {0}")]
    NotAvailable(String),
}

impl ProductError {
    /// Stable machine-readable code for API mapping.
    pub fn code(&self) -> &'static str {
        match self {
            ProductError::NotFound(_) => "PRODUCT_NOT_FOUND",
            ProductError::NotAvailable(_) => "PRODUCT_NOT_AVAILABLE",
        }
    }
}
