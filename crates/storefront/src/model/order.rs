//! Order lines. There is no order header: an order is the set of lines sharing
//! one [`OrderId`], all written in one batch for one user.

use super::{ProductId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

string_id! {
    /// Identifier shared by every line of one order.
    OrderId
}

string_id! {
    /// Identifier of a single order line.
    OrderLineId
}

/// Fulfillment status of one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Shipped,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::Pending,
        ItemStatus::InProgress,
        ItemStatus::Shipped,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "Pending",
            ItemStatus::InProgress => "In Progress",
            ItemStatus::Shipped => "Shipped",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.label().replace(' ', "").eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown item status '{s}'"))
    }
}

/// Status of a whole order, derived from its lines on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Shipped,
    Mixed,
}

impl fmt::Display for AggregateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateStatus::Pending => "Pending",
            AggregateStatus::InProgress => "In Progress",
            AggregateStatus::Shipped => "Shipped",
            AggregateStatus::Mixed => "Mixed",
        })
    }
}

/// One product-quantity record of a multi-line order.
///
/// Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: ItemStatus,
    pub ordered_at: DateTime<Utc>,
}

impl OrderLine {
    pub fn from_draft(id: OrderLineId, draft: OrderLineCreate) -> Self {
        Self {
            id,
            order_id: draft.order_id,
            user_id: draft.user_id,
            product_id: draft.product_id,
            quantity: draft.quantity,
            total_price: draft.total_price,
            status: draft.status,
            ordered_at: draft.ordered_at,
        }
    }
}

/// Payload for creating an order line. The line id is assigned on write.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineCreate {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: ItemStatus,
    pub ordered_at: DateTime<Utc>,
}

impl OrderLineCreate {
    pub fn validate(&self) -> Result<(), String> {
        let missing = super::blank_fields(&[
            ("order_id", self.order_id.as_str()),
            ("user_id", self.user_id.as_str()),
            ("product_id", self.product_id.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(format!("missing required fields: {}", missing.join(", ")));
        }
        if self.quantity == 0 {
            return Err("quantity must be at least 1".to_string());
        }
        if self.total_price.is_sign_negative() && !self.total_price.is_zero() {
            return Err(format!("total price must not be negative, got {}", self.total_price));
        }
        Ok(())
    }
}

/// Status change applied to order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineUpdate {
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_uses_spaced_label_everywhere() {
        assert_eq!(ItemStatus::InProgress.to_string(), "In Progress");
        assert_eq!(
            serde_json::to_string(&ItemStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!("in progress".parse::<ItemStatus>(), Ok(ItemStatus::InProgress));
        assert_eq!("InProgress".parse::<ItemStatus>(), Ok(ItemStatus::InProgress));
        assert!("Lost".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn line_draft_requires_ids_and_quantity() {
        let draft = OrderLineCreate {
            order_id: OrderId::generate(),
            user_id: UserId::from(""),
            product_id: ProductId::generate(),
            quantity: 0,
            total_price: Decimal::ZERO,
            status: ItemStatus::Pending,
            ordered_at: Utc::now(),
        };
        let err = draft.validate().unwrap_err();
        assert!(err.contains("user_id"));

        let draft = OrderLineCreate {
            user_id: UserId::generate(),
            ..draft
        };
        assert!(draft.validate().unwrap_err().contains("quantity"));
    }
}
