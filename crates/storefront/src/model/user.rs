use super::Address;
use serde::{Deserialize, Serialize};

string_id! {
    /// Type-safe identifier for Users.
    UserId
}

/// A registered customer with a shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub street_address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
}

impl User {
    pub fn shipping_address(&self) -> Address {
        Address {
            name: self.name.clone(),
            street: self.street_address.clone(),
            city: self.city.clone(),
            province: self.province.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            phone: self.phone_number.clone(),
            email: self.email.clone(),
        }
    }
}

/// Payload for registering a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub street_address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
}

impl UserCreate {
    /// Every field is required and the e-mail needs a local part and a domain.
    pub fn validate(&self) -> Result<(), String> {
        let missing = super::blank_fields(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("street_address", self.street_address.as_str()),
            ("city", self.city.as_str()),
            ("province", self.province.as_str()),
            ("postal_code", self.postal_code.as_str()),
            ("country", self.country.as_str()),
            ("phone_number", self.phone_number.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(format!("missing required fields: {}", missing.join(", ")));
        }
        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(format!("invalid email '{}'", self.email)),
        }
    }
}
