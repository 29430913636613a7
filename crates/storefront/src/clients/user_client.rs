//! # User Client
//!
//! Registration and lookup of customers.

use crate::accounts::AccountReader;
use crate::model::{User, UserCreate, UserId};
use crate::user_actor::UserError;
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    /// Registers a user after validating every field. E-mails are unique,
    /// compared case-insensitively.
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn register(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        params.validate().map_err(UserError::Validation)?;
        if self.find_by_email(&params.email).await?.is_some() {
            warn!("Email already registered");
            return Err(UserError::DuplicateEmail(params.email));
        }
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let email = email.trim().to_lowercase();
        let mut matches = self
            .list(Filter::new(move |u: &User| u.email == email))
            .await?;
        Ok(matches.pop())
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            other => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl AccountReader for UserClient {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserError> {
        ActorClient::get(self, id.clone()).await
    }
}
