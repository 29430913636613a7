use super::error::OrderError;
use crate::model::{OrderLine, OrderLineCreate, OrderLineId, OrderLineUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[derive(Debug)]
pub enum OrderLineAction {}

#[async_trait]
impl ActorEntity for OrderLine {
    type Id = OrderLineId;
    type Create = OrderLineCreate;
    type Update = OrderLineUpdate;
    type Action = OrderLineAction;
    type ActionResult = ();
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderLineId, params: OrderLineCreate) -> Result<Self, Self::Error> {
        params.validate().map_err(OrderError::Validation)?;
        Ok(Self::from_draft(id, params))
    }

    /// Status is the only mutable field.
    async fn on_update(&mut self, update: OrderLineUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.status = update.status;
        Ok(())
    }

    async fn on_delete(&self, _ctx: &()) -> Result<(), Self::Error> {
        Err(OrderError::DeleteForbidden(self.id.to_string()))
    }

    async fn handle_action(
        &mut self,
        action: OrderLineAction,
        _ctx: &(),
    ) -> Result<(), Self::Error> {
        match action {}
    }
}
