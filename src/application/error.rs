use thiserror::Error;

use crate::domain::ItemValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Customer already exists: {0}")]
    CustomerAlreadyExists(String),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    #[error("Invalid sale: {0}")]
    InvalidSale(#[from] ItemValidationError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown payment method: {0} (valid: cash, transfer, card, check)")]
    UnknownPaymentMethod(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
