//! Custom actions for the Product actor, handled by
//! [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action).

/// Custom actions for Product entities.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Takes `n` units off the stock level in one step, stopping at zero.
    /// Touches no other field.
    DecrementStock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    CheckStock(u32),
    DecrementStock { available: u32, remaining: u32 },
}
