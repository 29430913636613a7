//! [`ActorEntity`] implementation that lets the generic
//! [`ResourceActor`](actor_framework::ResourceActor) manage [`Product`]s.

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        params.validate().map_err(ProductError::Validation)?;
        Ok(Self {
            id,
            category: params.category,
            name: params.name,
            description: params.description,
            price: params.price,
            quantity: params.quantity,
        })
    }

    /// Applies every present field; the whole update is rejected if any field is invalid.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        update.validate().map_err(ProductError::Validation)?;
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, Self::Error> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.quantity)),
            ProductAction::DecrementStock(n) => {
                let available = self.quantity;
                self.quantity = available.saturating_sub(n);
                Ok(ProductActionResult::DecrementStock {
                    available,
                    remaining: self.quantity,
                })
            }
        }
    }
}
