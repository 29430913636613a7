//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent resource stores built on the **Actor Model**.
//! Every resource type (products, accounts, order lines) is owned by one
//! [`ResourceActor`] task; everything else talks to it through a cloneable
//! [`ResourceClient`].
//!
//! ## Resource-Oriented Actors
//!
//! - Standard CRUD operations on well-defined resources
//! - Isolated state (no shared memory, no locks inside the actor)
//! - Sequential processing within each actor, so every request sees a consistent store
//!
//! On top of single-entity CRUD the framework offers three set-oriented operations
//! that storage-like resources need:
//!
//! - **Batch create** ([`ResourceClient::create_batch`]): all entities are inserted,
//!   or none are.
//! - **Filtered list** ([`ResourceClient::list`]): a snapshot of every entity matching
//!   a [`Filter`].
//! - **Filtered update** ([`ResourceClient::update_where`]): one update applied to every
//!   match as a single step; if any entity rejects it the store is left untouched.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - business rules and lifecycle hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message loop, id generation, atomic batches
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed async API
//!
//! ```rust
//! use actor_framework::{ActorEntity, Filter, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Sku { id: u32, stock: u32 }
//! #[derive(Debug)] struct SkuCreate { stock: u32 }
//! #[derive(Debug, Clone)] struct SkuUpdate { stock: u32 }
//! #[derive(Debug)] enum SkuAction {}
//! #[derive(Debug, thiserror::Error)] #[error("sku error")] struct SkuError;
//!
//! #[async_trait]
//! impl ActorEntity for Sku {
//!     type Id = u32; type Create = SkuCreate; type Update = SkuUpdate;
//!     type Action = SkuAction; type ActionResult = (); type Context = (); type Error = SkuError;
//!
//!     fn from_create_params(id: u32, params: SkuCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, stock: params.stock })
//!     }
//!     async fn on_update(&mut self, update: SkuUpdate, _: &()) -> Result<(), Self::Error> {
//!         self.stock = update.stock;
//!         Ok(())
//!     }
//!     async fn handle_action(&mut self, _: SkuAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut next = 0;
//!     let (actor, client) = ResourceActor::<Sku>::new(10, move || { next += 1; next });
//!     tokio::spawn(actor.run(()));
//!
//!     let ids = client
//!         .create_batch(vec![SkuCreate { stock: 1 }, SkuCreate { stock: 0 }])
//!         .await
//!         .unwrap();
//!     assert_eq!(ids.len(), 2);
//!
//!     let empty = client.list(Filter::new(|s: &Sku| s.stock == 0)).await.unwrap();
//!     assert_eq!(empty.len(), 1);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are injected when the loop starts (`actor.run(context)`), not at
//! construction time, so actors can be created first and wired afterwards.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a queue of expectations instead of a real
//! store, which makes downstream failures (closed actors, rejected batches) easy to inject.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
