//! # Generic Actor Server
//!
//! [`ResourceActor`] owns the entity store for one resource type and processes
//! requests strictly one at a time, so no request ever observes a half-applied batch.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Filter, ResourceRequest, Response};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// The actor is the "server" half: it owns the `store`, the id generator and the
/// receiving end of the channel. Exclusive ownership inside its task replaces locks.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new(capacity, id_generator)` returns the actor and its client.
/// 2. **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3. **Run**: spawn the run loop on the Tokio runtime.
///
/// # Operations
///
/// * **Create** - next id from the generator, `from_create_params`, `on_create`, insert.
/// * **CreateBatch** - every payload is built and passes `on_create` before any is
///   inserted; the first failure rejects the whole batch.
/// * **Get** / **List** - clones of the matching entities.
/// * **Update** - `on_update` in place.
/// * **UpdateWhere** - `on_update` on copies of every match, committed only if all succeed.
/// * **Delete** - `on_delete`, then removal.
/// * **Action** - `handle_action` in place.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: Box<dyn FnMut() -> T::Id + Send>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - capacity of the request channel; callers wait when it is full.
    /// * `next_id` - produces a fresh id for every created entity.
    pub fn new(
        buffer_size: usize,
        next_id: impl FnMut() -> T::Id + Send + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: Box::new(next_id),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create_one(params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::CreateBatch { params, respond_to } => {
                    let requested = params.len();
                    debug!(entity_type, requested, "CreateBatch");
                    let result = self.create_batch(params, &context).await;
                    match &result {
                        Ok(ids) => info!(
                            entity_type,
                            created = ids.len(),
                            size = self.store.len(),
                            "Batch created"
                        ),
                        Err(e) => warn!(entity_type, requested, error = %e, "Batch rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| filter.matches(item))
                        .cloned()
                        .collect();
                    debug!(entity_type, matched = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    self.update_one(entity_type, id, update, &context, respond_to)
                        .await;
                }
                ResourceRequest::UpdateWhere {
                    filter,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, ?update, "UpdateWhere");
                    let result = self.update_where(filter, update, &context).await;
                    match &result {
                        Ok(items) => info!(entity_type, updated = items.len(), "Batch updated"),
                        Err(e) => warn!(entity_type, error = %e, "Batch update rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create_one(
        &mut self,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id)();
        let mut item = T::from_create_params(id.clone(), params)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        item.on_create(context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    async fn create_batch(
        &mut self,
        params: Vec<T::Create>,
        context: &T::Context,
    ) -> Result<Vec<T::Id>, FrameworkError> {
        let mut staged = Vec::with_capacity(params.len());
        for (index, payload) in params.into_iter().enumerate() {
            let id = (self.next_id)();
            let mut item = T::from_create_params(id.clone(), payload).map_err(|e| {
                FrameworkError::BatchRejected {
                    index,
                    source: Box::new(e),
                }
            })?;
            item.on_create(context)
                .await
                .map_err(|e| FrameworkError::BatchRejected {
                    index,
                    source: Box::new(e),
                })?;
            staged.push((id, item));
        }

        let mut ids = Vec::with_capacity(staged.len());
        for (id, item) in staged {
            self.store.insert(id.clone(), item);
            ids.push(id);
        }
        Ok(ids)
    }

    async fn update_one(
        &mut self,
        entity_type: &str,
        id: T::Id,
        update: T::Update,
        context: &T::Context,
        respond_to: Response<T>,
    ) {
        let Some(item) = self.store.get_mut(&id) else {
            warn!(entity_type, %id, "Not found");
            let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
            return;
        };
        match item.on_update(update, context).await {
            Ok(()) => {
                info!(entity_type, %id, "Updated");
                let _ = respond_to.send(Ok(item.clone()));
            }
            Err(e) => {
                warn!(entity_type, %id, error = %e, "Update failed");
                let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
            }
        }
    }

    async fn update_where(
        &mut self,
        filter: Filter<T>,
        update: T::Update,
        context: &T::Context,
    ) -> Result<Vec<T>, FrameworkError> {
        let targets: Vec<(T::Id, T)> = self
            .store
            .iter()
            .filter(|(_, item)| filter.matches(item))
            .map(|(id, item)| (id.clone(), item.clone()))
            .collect();

        let mut staged = Vec::with_capacity(targets.len());
        for (index, (id, mut copy)) in targets.into_iter().enumerate() {
            copy.on_update(update.clone(), context)
                .await
                .map_err(|e| FrameworkError::BatchRejected {
                    index,
                    source: Box::new(e),
                })?;
            staged.push((id, copy));
        }

        let mut updated = Vec::with_capacity(staged.len());
        for (id, item) in staged {
            updated.push(item.clone());
            self.store.insert(id, item);
        }
        Ok(updated)
    }
}
