//! Demo run: a customer fills a cart, checks out, the order ships and the invoice
//! is downloaded. A discontinued product is then removed with its image.

use rust_decimal::Decimal;
use storefront::checkout::CheckoutRequest;
use storefront::config::StorefrontConfig;
use storefront::lifecycle::{setup_tracing, Storefront};
use storefront::model::{Category, ItemStatus, ProductCreate, SessionId, UserCreate};
use tracing::{error, info, warn, Instrument};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    setup_tracing("info");

    let config = StorefrontConfig::from_env().map_err(|e| e.to_string())?;
    let store = Storefront::start(&config);

    let user_id = store
        .user_client
        .register(UserCreate {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            street_address: "12 Oak Avenue".to_string(),
            city: "Johannesburg".to_string(),
            province: "Gauteng".to_string(),
            postal_code: "2196".to_string(),
            country: "South Africa".to_string(),
            phone_number: "011 555 0142".to_string(),
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(%user_id, "User registered");

    let mut product_ids = Vec::new();
    for (category, name, cents, quantity) in [
        (Category::Appliances, "Kettle", 1000, 10),
        (Category::Books, "Cookbook", 500, 3),
    ] {
        let id = store
            .product_client
            .create_product(ProductCreate {
                category,
                name: name.to_string(),
                description: format!("{name} for the demo"),
                price: Decimal::new(cents, 2),
                quantity,
            })
            .await
            .map_err(|e| e.to_string())?;
        store
            .images
            .upload(category, &id, PNG_SIGNATURE.to_vec())
            .await
            .map_err(|e| e.to_string())?;
        product_ids.push(id);
    }

    let session = SessionId::generate();
    let span = tracing::info_span!("checkout", %session);
    let receipt = async {
        let cart = store.carts.cart(&session).await;
        cart.add_to_cart(&product_ids[0], 2).await;
        cart.add_to_cart(&product_ids[1], 1).await;
        info!(total = %cart.grand_total().await, "Cart ready");

        let request =
            CheckoutRequest::new(user_id.clone()).with_idempotency_key(session.to_string());
        store.checkout.checkout(request, &cart).await
    }
    .instrument(span)
    .await;

    let receipt = match receipt {
        Ok(receipt) => receipt,
        Err(e) => {
            error!(error = %e, "{}", e.user_message());
            store.shutdown().await?;
            return Err(e.to_string());
        }
    };
    info!(order_id = %receipt.order_id, total = %receipt.grand_total, "{}", receipt.user_message());
    for warning in &receipt.warnings {
        warn!(%warning, "Checkout warning");
    }

    if let Err(e) = store
        .status
        .update_whole_order_status(&receipt.order_id, ItemStatus::Shipped)
        .await
    {
        error!(error = %e, "Status update failed");
    }

    for summary in store
        .history
        .customer_history(&user_id)
        .await
        .map_err(|e| e.to_string())?
    {
        info!(
            order_id = %summary.order_id,
            status = %summary.status,
            total = %summary.grand_total,
            "Order"
        );
    }

    let details = store
        .history
        .order_details(&user_id, &receipt.order_id)
        .await
        .map_err(|e| e.to_string())?;
    for line in &details.lines {
        info!(
            product = %line.product_name,
            quantity = line.quantity,
            has_image = line.has_image,
            "Order line"
        );
    }

    match store.checkout.download_invoice(&user_id, &receipt.order_id).await {
        Ok(file) => info!(name = %file.name, bytes = file.content.len(), "Invoice downloaded"),
        Err(e) => warn!(error = %e, "Invoice not available"),
    }

    store
        .product_client
        .delete_product(product_ids[1].clone(), &store.images)
        .await
        .map_err(|e| e.to_string())?;
    info!(remaining = store.files.list("books").await.len(), "Cookbook discontinued");

    store.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
