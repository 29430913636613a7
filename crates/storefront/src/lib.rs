//! # Storefront
//!
//! The order-lifecycle and cart core of an online store, built on the generic
//! resource actors of [`actor_framework`].
//!
//! ## Core Components
//!
//! - **[model]**: products, users, order lines, cart lines.
//! - **[product_actor], [user_actor], [order_actor]**: `ActorEntity` implementations.
//! - **[clients]**: typed clients that also implement the collaborator traits
//!   ([`catalog::CatalogReader`], [`accounts::AccountReader`],
//!   [`persistence::OrderPersistence`]).
//! - **[cart]**: session-scoped carts with copy-on-write snapshots.
//! - **[checkout]**: cart to committed order, then stock, cart and invoice follow-ups.
//! - **[status]** and **[history]**: derived order status and read views.
//! - **[invoice]**, **[files]**, **[queue]**: invoice documents, their storage and
//!   activity messages.
//! - **[images]**: one stored image per product, keyed by category and product id.
//! - **[lifecycle]**: [`Storefront`](lifecycle::Storefront) start and shutdown.
//!
//! ## Testing
//!
//! Unit tests sit next to the code; `tests/` drives the whole system through real
//! actors, with [`actor_framework::mock`] standing in where a failure must be forced.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod files;
pub mod history;
pub mod images;
pub mod invoice;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod persistence;
pub mod product_actor;
pub mod queue;
pub mod status;
pub mod user_actor;

#[cfg(test)]
mod fakes;
