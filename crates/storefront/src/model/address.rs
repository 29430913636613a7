use serde::{Deserialize, Serialize};
use std::fmt;

/// A postal address with contact details, used for invoice shipping and retailer blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.street)?;
        writeln!(f, "{}, {} {}", self.city, self.province, self.postal_code)?;
        writeln!(f, "{}", self.country)?;
        writeln!(f, "Tel: {}", self.phone)?;
        write!(f, "Email: {}", self.email)
    }
}
