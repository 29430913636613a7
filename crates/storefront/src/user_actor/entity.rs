use super::error::UserError;
use crate::model::{User, UserCreate, UserId};
use actor_framework::ActorEntity;
use async_trait::async_trait;

/// Profile fields are fixed after registration.
#[derive(Debug, Clone)]
pub enum UserUpdate {}

#[derive(Debug)]
pub enum UserAction {}

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = ();
    type Context = ();
    type Error = UserError;

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        params.validate().map_err(UserError::Validation)?;
        Ok(Self {
            id,
            name: params.name,
            email: params.email.trim().to_lowercase(),
            street_address: params.street_address,
            city: params.city,
            province: params.province,
            postal_code: params.postal_code,
            country: params.country,
            phone_number: params.phone_number,
        })
    }

    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(&mut self, action: UserAction, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
