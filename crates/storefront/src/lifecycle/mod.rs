//! # System Lifecycle & Orchestration
//!
//! [`Storefront`] creates the product, user and order line actors, wraps their
//! clients in the services the rest of the crate exposes, and shuts everything
//! down again.
//!
//! ## Dependency wiring
//!
//! The actors themselves need no context (`Context = ()`). Cross-resource logic
//! (checkout, invoicing, history) lives in services that hold client clones behind
//! the collaborator traits:
//!
//! ```text
//! SessionCarts ──► CatalogReader (ProductClient)
//! Checkout ──────► CatalogReader, OrderPersistence (OrderClient),
//!                  InvoiceTrigger (InvoiceGenerator), FileStore, MessageQueue
//! OrderHistory ──► OrderPersistence, CatalogReader, AccountReader (UserClient)
//! ```
//!
//! ## Graceful Shutdown
//!
//! Every client clone keeps its actor alive. [`Storefront::shutdown`] drops the
//! services and clients it owns and then awaits each actor task, so callers must
//! drop any `Arc` they cloned out of it (carts, services) first.

pub mod storefront;

pub use actor_framework::tracing::setup_tracing;
pub use storefront::*;
