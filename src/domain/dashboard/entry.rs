//! Quick-entry payloads and their client-side validation

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum length for product names
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;

/// Largest amount accepted for a single sale
pub const MAX_SALE_AMOUNT: f64 = 999_999.99;

/// Entry validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    /// Product name is blank
    EmptyProductName,
    /// Product name exceeds maximum length
    ProductNameTooLong { length: usize, max: usize },
    /// Amount is zero or negative
    NonPositiveAmount { value: f64 },
    /// Amount above the accepted maximum
    AmountTooLarge { value: f64, max: f64 },
    /// A required text field is blank
    EmptyField { field: &'static str },
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyProductName => write!(f, "Product name cannot be empty"),
            Self::ProductNameTooLong { length, max } => {
                write!(f, "Product name too long: {} characters (max {})", length, max)
            }
            Self::NonPositiveAmount { value } => {
                write!(f, "Amount must be positive, got {}", value)
            }
            Self::AmountTooLarge { value, max } => {
                write!(f, "Amount too large: {} (max {})", value, max)
            }
            Self::EmptyField { field } => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for EntryValidationError {}

impl From<EntryValidationError> for DomainError {
    fn from(err: EntryValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Manually entered sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickSale {
    pub product_name: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl QuickSale {
    pub fn new(product_name: impl Into<String>, amount: f64) -> Self {
        Self {
            product_name: product_name.into(),
            amount,
            customer_id: None,
            category: None,
            date: None,
        }
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Validates and normalizes the sale: trims the name, rounds to cents
    pub fn normalized(mut self) -> Result<Self, EntryValidationError> {
        let name = self.product_name.trim();

        if name.is_empty() {
            return Err(EntryValidationError::EmptyProductName);
        }

        let length = name.chars().count();
        if length > MAX_PRODUCT_NAME_LENGTH {
            return Err(EntryValidationError::ProductNameTooLong {
                length,
                max: MAX_PRODUCT_NAME_LENGTH,
            });
        }

        validate_amount(self.amount)?;

        if self.amount > MAX_SALE_AMOUNT {
            return Err(EntryValidationError::AmountTooLarge {
                value: self.amount,
                max: MAX_SALE_AMOUNT,
            });
        }

        self.product_name = name.to_string();
        self.amount = (self.amount * 100.0).round() / 100.0;

        Ok(self)
    }
}

/// Manually entered customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickCustomer {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl QuickCustomer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.trim().is_empty() {
            return Err(EntryValidationError::EmptyField { field: "Customer id" });
        }

        if self.name.trim().is_empty() {
            return Err(EntryValidationError::EmptyField { field: "Customer name" });
        }

        Ok(())
    }
}

/// Manually entered expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickExpense {
    pub description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl QuickExpense {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount,
            category: None,
            date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.description.trim().is_empty() {
            return Err(EntryValidationError::EmptyField {
                field: "Description",
            });
        }

        validate_amount(self.amount)
    }
}

fn validate_amount(amount: f64) -> Result<(), EntryValidationError> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(EntryValidationError::NonPositiveAmount { value: amount });
    }

    Ok(())
}
