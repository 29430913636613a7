//! # Product Client
//!
//! Catalog administration and the [`CatalogReader`] implementation over the
//! product actor.

use crate::catalog::CatalogReader;
use crate::images::ProductImages;
use crate::model::{Category, Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    /// The fixed category list, alphabetically sorted.
    pub fn categories(&self) -> Vec<Category> {
        Category::all()
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        params.validate().map_err(ProductError::Validation)?;
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        update.validate().map_err(ProductError::Validation)?;
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Products of one category, sorted by name.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category: Category) -> Result<Vec<Product>, ProductError> {
        let mut products = self
            .list(Filter::new(move |p: &Product| p.category == category))
            .await?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    /// Deletes the product, then its image. A failed image cleanup is logged and
    /// does not fail the delete.
    #[instrument(skip(self, images))]
    pub async fn delete_product(
        &self,
        id: ProductId,
        images: &ProductImages,
    ) -> Result<(), ProductError> {
        let product = ActorClient::get(self, id.clone())
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;
        ActorClient::delete(self, id.clone()).await?;
        match images.delete(product.category, &id).await {
            Ok(removed) => info!(%id, image_removed = removed, "Product deleted"),
            Err(e) => warn!(%id, error = %e, "Product deleted, image left behind"),
        }
        Ok(())
    }

    /// Check the current stock level for a product.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        debug!("Checking stock");
        match self
            .inner
            .perform_action(id, ProductAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl CatalogReader for ProductClient {
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        ActorClient::get(self, id.clone()).await
    }

    #[instrument(skip(self))]
    async fn decrement_stock(&self, id: &ProductId, quantity: u32) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id.clone(), ProductAction::DecrementStock(quantity))
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::DecrementStock { available, remaining } => {
                debug!(available, remaining, "Stock decremented");
                Ok(available)
            }
            other => Err(unexpected(other)),
        }
    }

    /// Every product, sorted by name.
    async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        let mut products = ActorClient::list(self, Filter::all()).await?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::InMemoryFileStore;
    use crate::product_actor;
    use actor_framework::mock::{create_mock_client, expect_action, MockClient};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn draft(category: Category, name: &str) -> ProductCreate {
        ProductCreate {
            category,
            name: name.into(),
            description: format!("{name} description"),
            price: Decimal::new(1000, 2),
            quantity: 5,
        }
    }

    fn running_client() -> ProductClient {
        let (actor, generic) = product_actor::new(8);
        tokio::spawn(actor.run(()));
        ProductClient::new(generic)
    }

    #[tokio::test]
    async fn test_check_stock_returns_correct_level() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let check_task =
            tokio::spawn(async move { product_client.check_stock(ProductId::from("p-1")).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, ProductId::from("p-1"));
        assert!(matches!(action, ProductAction::CheckStock));
        responder
            .send(Ok(ProductActionResult::CheckStock(42)))
            .unwrap();

        assert_eq!(check_task.await.unwrap().unwrap(), 42);
    }

    #[tokio::test]
    async fn test_missing_product_maps_to_not_found() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_update(ProductId::from("gone"))
            .return_err(FrameworkError::NotFound("gone".into()));
        let client = ProductClient::new(mock.client());

        let result = client
            .update_product(ProductId::from("gone"), ProductUpdate::default())
            .await;
        assert_eq!(result, Err(ProductError::NotFound("gone".into())));
        mock.verify();
    }

    #[tokio::test]
    async fn test_invalid_create_never_reaches_actor() {
        let mock = MockClient::<Product>::new();
        let client = ProductClient::new(mock.client());

        let result = client
            .create_product(ProductCreate {
                category: Category::Toys,
                name: String::new(),
                description: "Spinning top".into(),
                price: Decimal::ONE,
                quantity: 1,
            })
            .await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_decrement_stock_sends_one_action() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task = tokio::spawn(async move {
            product_client
                .decrement_stock(&ProductId::from("p-1"), 3)
                .await
        });

        let (_, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert!(matches!(action, ProductAction::DecrementStock(3)));
        responder
            .send(Ok(ProductActionResult::DecrementStock {
                available: 5,
                remaining: 2,
            }))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_decrement_leaves_price_untouched() {
        let client = running_client();
        let id = client.create_product(draft(Category::Tools, "Saw")).await.unwrap();

        client
            .update_product(
                id.clone(),
                ProductUpdate {
                    price: Some(Decimal::new(9900, 2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(client.decrement_stock(&id, 2).await.unwrap(), 5);

        let product = client.get_product(&id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 3);
        assert_eq!(product.price, Decimal::new(9900, 2));

        let missing = client.decrement_stock(&ProductId::from("gone"), 1).await;
        assert!(matches!(missing, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_categories_are_the_fixed_sorted_list() {
        let client = ProductClient::new(MockClient::<Product>::new().client());
        let categories = client.categories();
        assert_eq!(categories.len(), 19);
        assert_eq!(categories.first(), Some(&Category::Appliances));
        assert_eq!(categories.last(), Some(&Category::Toys));
        let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_list_by_category_filters_and_sorts_by_name() {
        let client = running_client();
        for (category, name) in [
            (Category::Garden, "Spade"),
            (Category::Books, "Atlas"),
            (Category::Garden, "Hose"),
            (Category::Garden, "Rake"),
        ] {
            client.create_product(draft(category, name)).await.unwrap();
        }

        let garden = client.list_by_category(Category::Garden).await.unwrap();
        let names: Vec<&str> = garden.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Hose", "Rake", "Spade"]);
        assert!(client.list_by_category(Category::Pets).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_product_and_image() {
        let client = running_client();
        let images = ProductImages::new(Arc::new(InMemoryFileStore::new()));
        let id = client.create_product(draft(Category::Music, "Drum")).await.unwrap();
        images
            .upload(Category::Music, &id, b"GIF89a-drum".to_vec())
            .await
            .unwrap();

        client.delete_product(id.clone(), &images).await.unwrap();

        assert_eq!(ActorClient::get(&client, id.clone()).await.unwrap(), None);
        assert!(!images.exists(Category::Music, &id).await.unwrap());

        let again = client.delete_product(id.clone(), &images).await;
        assert_eq!(again, Err(ProductError::NotFound(id.to_string())));
    }

    #[tokio::test]
    async fn test_delete_of_unknown_id_is_not_found() {
        let client = running_client();
        let result = ActorClient::delete(&client, ProductId::from("nope")).await;
        assert_eq!(result, Err(ProductError::NotFound("nope".into())));
    }
}
