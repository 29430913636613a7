//! # Typed Clients
//!
//! Domain-facing wrappers around the generic
//! [`ResourceClient`](actor_framework::ResourceClient). Each one maps
//! [`FrameworkError`](actor_framework::FrameworkError) into its actor's error type and
//! implements the collaborator trait the rest of the crate depends on.

pub mod order_client;
pub mod product_client;
pub mod user_client;

pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use user_client::UserClient;
