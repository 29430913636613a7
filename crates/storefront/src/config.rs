//! Storefront configuration

use crate::model::Address;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Storefront configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Request channel capacity of every actor (env: STOREFRONT_CHANNEL_CAPACITY)
    pub channel_capacity: usize,
    /// Appended to `{order_id}_invoice` (env: STOREFRONT_INVOICE_SUFFIX)
    pub invoice_file_suffix: String,
    /// Queue for cart activity (env: STOREFRONT_CART_QUEUE)
    pub cart_queue: String,
    /// Queue for checkout outcomes (env: STOREFRONT_ORDER_QUEUE)
    pub order_queue: String,
    /// How long a checkout idempotency key is remembered
    /// (env: STOREFRONT_IDEMPOTENCY_WINDOW_SECS)
    pub idempotency_window: Duration,
    /// Retailer block printed on invoices (env: RETAILER_*)
    pub retailer: Address,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            invoice_file_suffix: ".txt".into(),
            cart_queue: "cart-activity".into(),
            order_queue: "order-activity".into(),
            idempotency_window: Duration::from_secs(24 * 60 * 60),
            retailer: Address {
                name: "ABC Retail".into(),
                street: "64 Main Street".into(),
                city: "Johannesburg".into(),
                province: "Gauteng".into(),
                postal_code: "2060".into(),
                country: "South Africa".into(),
                phone: "011 682 7901".into(),
                email: "abc@retail.co.za".into(),
            },
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`; unset or empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let channel_capacity = positive(&var, "STOREFRONT_CHANNEL_CAPACITY")?
            .map_or(defaults.channel_capacity, |n| n as usize);
        let idempotency_window = positive(&var, "STOREFRONT_IDEMPOTENCY_WINDOW_SECS")?
            .map_or(defaults.idempotency_window, Duration::from_secs);

        let retailer = defaults.retailer;
        let config = Self {
            channel_capacity,
            invoice_file_suffix: var("STOREFRONT_INVOICE_SUFFIX")
                .unwrap_or(defaults.invoice_file_suffix),
            cart_queue: var("STOREFRONT_CART_QUEUE").unwrap_or(defaults.cart_queue),
            order_queue: var("STOREFRONT_ORDER_QUEUE").unwrap_or(defaults.order_queue),
            idempotency_window,
            retailer: Address {
                name: var("RETAILER_NAME").unwrap_or(retailer.name),
                street: var("RETAILER_STREET").unwrap_or(retailer.street),
                city: var("RETAILER_CITY").unwrap_or(retailer.city),
                province: var("RETAILER_PROVINCE").unwrap_or(retailer.province),
                postal_code: var("RETAILER_POSTAL_CODE").unwrap_or(retailer.postal_code),
                country: var("RETAILER_COUNTRY").unwrap_or(retailer.country),
                phone: var("RETAILER_PHONE").unwrap_or(retailer.phone),
                email: var("RETAILER_EMAIL").unwrap_or(retailer.email),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidNumber {
                name: "STOREFRONT_CHANNEL_CAPACITY",
                value: "0".into(),
            });
        }
        for (name, value) in [
            ("STOREFRONT_CART_QUEUE", &self.cart_queue),
            ("STOREFRONT_ORDER_QUEUE", &self.order_queue),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }
        Ok(())
    }
}

fn positive(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = var(name) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}
