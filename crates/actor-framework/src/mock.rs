//! # Mock Framework & Testing Guide
//!
//! [`MockClient<T>`] hands out a real [`ResourceClient<T>`] whose requests are answered
//! from a queue of expectations instead of an entity store. Use it to test code that
//! sits *around* a client (wrappers, services, actors with dependencies) without
//! spawning the dependency actors.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | None, scripted replies | Real store |
//! | **Determinism** | Fully scripted | Subject to scheduler |
//! | **Error Injection** | Easy (`return_err`) | Needs specific state |
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Account { id: u32 }
//! #[derive(Debug)] struct AccountCreate;
//! #[derive(Debug, Clone)] struct AccountUpdate;
//! #[derive(Debug)] enum AccountAction {}
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct AccountError;
//!
//! #[async_trait]
//! impl ActorEntity for Account {
//!     type Id = u32; type Create = AccountCreate; type Update = AccountUpdate;
//!     type Action = AccountAction; type ActionResult = (); type Context = (); type Error = AccountError;
//!     fn from_create_params(id: u32, _: AccountCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: AccountUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: AccountAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Account>::new();
//!     let client = mock.client();
//!
//!     // Simulate a downstream failure
//!     mock.expect_get(1).return_err(FrameworkError::ActorClosed);
//!
//!     let result = client.get(1).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! A request that does not match the next expectation is answered by dropping its
//! reply channel (the caller sees [`FrameworkError::ActorDropped`]) and is counted;
//! [`MockClient::verify`] then fails the test.
//!
//! For hand-driven tests, [`create_mock_client`] returns the client together with the raw
//! request receiver, and the `expect_*` helpers pull typed requests off it.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted reply for the next request of a given kind.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    List(Result<Vec<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    CreateBatch(Result<Vec<T::Id>, FrameworkError>),
    Update(Result<T, FrameworkError>),
    UpdateWhere(Result<Vec<T>, FrameworkError>),
    Delete(Result<(), FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

struct MockState<T: ActorEntity> {
    expectations: VecDeque<Expectation<T>>,
    mismatches: usize,
}

type Shared<T> = Arc<Mutex<MockState<T>>>;

fn lock<T: ActorEntity>(state: &Shared<T>) -> MutexGuard<'_, MockState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reply<R>(
    respond_to: oneshot::Sender<Result<R, FrameworkError>>,
    response: Result<R, FrameworkError>,
) {
    let _ = respond_to.send(response);
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    state: Shared<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let state: Shared<T> = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            mismatches: 0,
        }));
        let shared = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = lock(&shared).expectations.pop_front();
                let matched = match (request, next) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(r))) => {
                        reply(respond_to, r);
                        true
                    }
                    (ResourceRequest::List { respond_to, .. }, Some(Expectation::List(r))) => {
                        reply(respond_to, r);
                        true
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        reply(respond_to, r);
                        true
                    }
                    (
                        ResourceRequest::CreateBatch { respond_to, .. },
                        Some(Expectation::CreateBatch(r)),
                    ) => {
                        reply(respond_to, r);
                        true
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(r))) => {
                        reply(respond_to, r);
                        true
                    }
                    (
                        ResourceRequest::UpdateWhere { respond_to, .. },
                        Some(Expectation::UpdateWhere(r)),
                    ) => {
                        reply(respond_to, r);
                        true
                    }
                    (ResourceRequest::Delete { respond_to, .. }, Some(Expectation::Delete(r))) => {
                        reply(respond_to, r);
                        true
                    }
                    (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action(r))) => {
                        reply(respond_to, r);
                        true
                    }
                    // Dropping the request drops its reply channel.
                    _ => false,
                };
                if !matched {
                    tracing::warn!("MockClient received an unexpected request");
                    lock(&shared).mismatches += 1;
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn push(&self, expectation: Expectation<T>) {
        lock(&self.state).expectations.push_back(expectation);
    }

    /// Expects a `get`. The id is informational; replies are consumed in order.
    pub fn expect_get(&mut self, _id: T::Id) -> ExpectationBuilder<'_, T, Option<T>> {
        ExpectationBuilder::new(self, Expectation::Get)
    }

    /// Expects a `list`.
    pub fn expect_list(&mut self) -> ExpectationBuilder<'_, T, Vec<T>> {
        ExpectationBuilder::new(self, Expectation::List)
    }

    /// Expects a `create`.
    pub fn expect_create(&mut self) -> ExpectationBuilder<'_, T, T::Id> {
        ExpectationBuilder::new(self, Expectation::Create)
    }

    /// Expects a `create_batch`.
    pub fn expect_create_batch(&mut self) -> ExpectationBuilder<'_, T, Vec<T::Id>> {
        ExpectationBuilder::new(self, Expectation::CreateBatch)
    }

    /// Expects an `update`.
    pub fn expect_update(&mut self, _id: T::Id) -> ExpectationBuilder<'_, T, T> {
        ExpectationBuilder::new(self, Expectation::Update)
    }

    /// Expects an `update_where`.
    pub fn expect_update_where(&mut self) -> ExpectationBuilder<'_, T, Vec<T>> {
        ExpectationBuilder::new(self, Expectation::UpdateWhere)
    }

    /// Expects a `delete`.
    pub fn expect_delete(&mut self, _id: T::Id) -> ExpectationBuilder<'_, T, ()> {
        ExpectationBuilder::new(self, Expectation::Delete)
    }

    /// Expects a `perform_action`.
    pub fn expect_action(&mut self, _id: T::Id) -> ExpectationBuilder<'_, T, T::ActionResult> {
        ExpectationBuilder::new(self, Expectation::Action)
    }

    /// Panics if expectations remain or an unexpected request arrived.
    pub fn verify(&self) {
        let state = lock(&self.state);
        assert_eq!(
            state.mismatches, 0,
            "{} request(s) did not match an expectation",
            state.mismatches
        );
        assert!(
            state.expectations.is_empty(),
            "Not all expectations were met. {} remaining",
            state.expectations.len()
        );
    }
}

/// Builder that completes one expectation with either a success or an error.
pub struct ExpectationBuilder<'a, T: ActorEntity, R> {
    mock: &'a MockClient<T>,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
}

impl<'a, T: ActorEntity, R> ExpectationBuilder<'a, T, R> {
    fn new(mock: &'a MockClient<T>, wrap: fn(Result<R, FrameworkError>) -> Expectation<T>) -> Self {
        Self { mock, wrap }
    }

    /// Replies with a successful result.
    pub fn return_ok(self, value: R) {
        self.mock.push((self.wrap)(Ok(value)));
    }

    /// Replies with an error.
    pub fn return_err(self, error: FrameworkError) {
        self.mock.push((self.wrap)(Err(error)));
    }
}

// =============================================================================
// RECEIVER-DRIVEN HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Returns the next request if it is a `CreateBatch`.
pub async fn expect_create_batch<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    Vec<T::Create>,
    oneshot::Sender<Result<Vec<T::Id>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::CreateBatch { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is a `Get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Ticket {
        id: u32,
        title: String,
    }

    #[derive(Debug)]
    struct TicketCreate {
        title: String,
    }

    #[derive(Debug, Clone)]
    struct TicketUpdate;

    #[derive(Debug)]
    enum TicketAction {}

    #[derive(Debug, thiserror::Error)]
    #[error("Ticket error")]
    struct TicketError;

    #[async_trait]
    impl ActorEntity for Ticket {
        type Id = u32;
        type Create = TicketCreate;
        type Update = TicketUpdate;
        type Action = TicketAction;
        type ActionResult = ();
        type Context = ();
        type Error = TicketError;

        fn from_create_params(id: u32, params: TicketCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                title: params.title,
            })
        }

        async fn on_update(&mut self, _: TicketUpdate, _: &()) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn handle_action(&mut self, _: TicketAction, _: &()) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_receiver_driven_batch() {
        let (client, mut receiver) = create_mock_client::<Ticket>(10);

        let task = tokio::spawn(async move {
            client
                .create_batch(vec![
                    TicketCreate { title: "a".into() },
                    TicketCreate { title: "b".into() },
                ])
                .await
        });

        let (params, responder) = expect_create_batch(&mut receiver)
            .await
            .expect("Expected CreateBatch request");
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].title, "b");
        responder.send(Ok(vec![7, 8])).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), vec![7, 8]);
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Ticket>::new();
        mock.expect_create().return_ok(1);
        mock.expect_get(1).return_ok(Some(Ticket {
            id: 1,
            title: "printer jam".into(),
        }));
        mock.expect_update_where().return_ok(vec![]);

        let client = mock.client();
        let id = client
            .create(TicketCreate {
                title: "printer jam".into(),
            })
            .await
            .unwrap();
        assert_eq!(id, 1);

        let fetched = client.get(1).await.unwrap().unwrap();
        assert_eq!(fetched.title, "printer jam");

        let updated = client
            .update_where(crate::Filter::all(), TicketUpdate)
            .await
            .unwrap();
        assert!(updated.is_empty());

        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_drops_reply() {
        let mut mock = MockClient::<Ticket>::new();
        mock.expect_create().return_ok(1);

        let result = mock.client().get(1).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
