use crate::domain::payment::{PaymentStatus, RefundDetails};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Per-field validation failures, accumulated rather than fail-fast so a
/// caller receives the complete violation set in one response.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts into a `PaymentError` if any field failed.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PaymentError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Invalid status transition: {current} -> {requested}")]
    InvalidTransition {
        current: PaymentStatus,
        requested: PaymentStatus,
        allowed: Vec<PaymentStatus>,
    },
    #[error("{message}")]
    InvalidState {
        message: &'static str,
        current: PaymentStatus,
    },
    #[error("This payment has already been refunded")]
    AlreadyRefunded(RefundDetails),
    #[error("Invalid refund amount")]
    InvalidAmount { max_refund_amount: Decimal },
    #[error("Currency {0} is not supported")]
    UnsupportedCurrency(String),
    #[error("{0}")]
    Conflict(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl PaymentError {
    /// Single-field validation failure.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into().into())
    }
}
