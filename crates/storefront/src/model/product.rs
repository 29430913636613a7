//! Catalog products and their fixed category list.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

string_id! {
    /// Type-safe identifier for Products.
    ProductId
}

/// The fixed set of product categories, declared in alphabetical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Appliances,
    Automotive,
    Beauty,
    Books,
    Clothing,
    Electronics,
    Food,
    Furniture,
    Games,
    Garden,
    Health,
    Jewellery,
    Movies,
    Music,
    Outdoors,
    Pets,
    Sports,
    Tools,
    Toys,
}

impl Category {
    pub const ALL: [Category; 19] = [
        Category::Appliances,
        Category::Automotive,
        Category::Beauty,
        Category::Books,
        Category::Clothing,
        Category::Electronics,
        Category::Food,
        Category::Furniture,
        Category::Games,
        Category::Garden,
        Category::Health,
        Category::Jewellery,
        Category::Movies,
        Category::Music,
        Category::Outdoors,
        Category::Pets,
        Category::Sports,
        Category::Tools,
        Category::Toys,
    ];

    /// Every category, sorted by name.
    pub fn all() -> Vec<Category> {
        let mut all = Self::ALL.to_vec();
        all.sort_by_key(|c| c.as_str());
        all
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Appliances => "Appliances",
            Category::Automotive => "Automotive",
            Category::Beauty => "Beauty",
            Category::Books => "Books",
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::Food => "Food",
            Category::Furniture => "Furniture",
            Category::Games => "Games",
            Category::Garden => "Garden",
            Category::Health => "Health",
            Category::Jewellery => "Jewellery",
            Category::Movies => "Movies",
            Category::Music => "Music",
            Category::Outdoors => "Outdoors",
            Category::Pets => "Pets",
            Category::Sports => "Sports",
            Category::Tools => "Tools",
            Category::Toys => "Toys",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Represents a product in the catalog.
///
/// # Actor Framework
/// Managed by the product actor; see [`crate::product_actor`] for its
/// [`ActorEntity`](actor_framework::ActorEntity) implementation and the
/// `CheckStock` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category: Category,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Payload for creating a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub category: Category,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl ProductCreate {
    /// Required fields are name and description; price may not be negative.
    pub fn validate(&self) -> Result<(), String> {
        let missing = super::blank_fields(&[
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(format!("missing required fields: {}", missing.join(", ")));
        }
        validate_price(self.price)
    }
}

/// Payload for updating an existing product. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub category: Option<Category>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [("name", &self.name), ("description", &self.description)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{field} must not be blank"));
            }
        }
        match self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }
}

fn validate_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("price must not be negative, got {price}"));
    }
    Ok(())
}
