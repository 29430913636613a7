//! # Checkout
//!
//! Turns a session's cart into one order:
//!
//! 1. Reject an empty cart or a blank user id before contacting anything.
//! 2. Build one `Pending` line per cart line under a fresh order id, priced from
//!    the cart snapshot.
//! 3. Write all lines in one batch. Anything short of a full write fails the
//!    checkout and leaves the cart alone.
//! 4. Decrement stock per product, clear the cart, then generate and store the
//!    invoice. Failures from here on become [`CheckoutWarning`]s on the receipt;
//!    the order is never rolled back.
//!
//! Stock is decremented per product by the catalog in one step, stopping at zero.
//! Nothing reserves stock between adding to the cart and checking out, so an
//! order can still ask for more than is left. That shows up as
//! [`StockIssue::Oversold`].

pub mod error;
pub mod receipt;

pub use error::CheckoutError;
pub use receipt::{CheckoutOutcome, CheckoutReceipt, CheckoutWarning, StockIssue};

use crate::cart::CartStore;
use crate::catalog::CatalogReader;
use crate::files::{FileStore, FileStoreError, StoredFile};
use crate::invoice::{invoice_file_name, InvoiceTrigger};
use crate::model::{
    cart_total, CartLine, ItemStatus, OrderId, OrderLine, OrderLineCreate, ProductId, UserId,
};
use crate::persistence::{BatchWrite, OrderPersistence};
use crate::product_actor::ProductError;
use crate::queue::{publish, MessageQueue, QueueMessage};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{error, info, instrument, warn};

/// A request to check out the caller's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub user_id: UserId,
    /// Client token; a repeat for the same user returns the first receipt.
    pub idempotency_key: Option<String>,
}

impl CheckoutRequest {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.user_id.is_blank() {
            return Err(CheckoutError::Validation("user id is required".to_string()));
        }
        if self.idempotency_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(CheckoutError::Validation("idempotency key must not be blank".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Appended to `{order_id}_invoice` to name stored invoices.
    pub invoice_suffix: String,
    /// Queue receiving checkout outcomes.
    pub order_queue: String,
    /// How long a successful keyed checkout is remembered.
    pub idempotency_window: Duration,
}

type ReceiptCell = Arc<OnceCell<CheckoutReceipt>>;

struct RememberedKey {
    since: Instant,
    cell: ReceiptCell,
}

pub struct Checkout {
    catalog: Arc<dyn CatalogReader>,
    orders: Arc<dyn OrderPersistence>,
    invoices: Arc<dyn InvoiceTrigger>,
    files: Arc<dyn FileStore>,
    queue: Arc<dyn MessageQueue>,
    settings: CheckoutSettings,
    receipts: Mutex<HashMap<(UserId, String), RememberedKey>>,
}

impl Checkout {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        orders: Arc<dyn OrderPersistence>,
        invoices: Arc<dyn InvoiceTrigger>,
        files: Arc<dyn FileStore>,
        queue: Arc<dyn MessageQueue>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            catalog,
            orders,
            invoices,
            files,
            queue,
            settings,
            receipts: Mutex::new(HashMap::new()),
        }
    }

    /// Checks out `cart` for the requesting user.
    ///
    /// With an idempotency key, the first successful checkout for `(user, key)` is
    /// remembered for the configured window and repeats get its receipt back with
    /// `replayed` set. Concurrent repeats wait for the first one. A failed checkout
    /// is forgotten at once.
    #[instrument(skip(self, cart), fields(user_id = %request.user_id, session = %cart.session()))]
    pub async fn checkout(
        &self,
        request: CheckoutRequest,
        cart: &CartStore,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        request.validate()?;
        let Some(key) = request.idempotency_key else {
            return self.place(&request.user_id, cart).await;
        };

        let cell = self.receipt_cell(&request.user_id, &key);
        if let Some(earlier) = cell.get() {
            info!(order_id = %earlier.order_id, "Repeated checkout, returning earlier receipt");
            return Ok(CheckoutReceipt {
                replayed: true,
                ..earlier.clone()
            });
        }
        let mut placed_here = false;
        let result = cell
            .get_or_try_init(|| {
                placed_here = true;
                self.place(&request.user_id, cart)
            })
            .await;
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(e) => {
                self.forget_failed(&request.user_id, &key, &cell);
                return Err(e);
            }
        };
        Ok(CheckoutReceipt {
            replayed: !placed_here,
            ..receipt.clone()
        })
    }

    /// The cell for `(user, key)`. Settled keys older than the window are dropped
    /// first; a key still being placed is kept.
    fn receipt_cell(&self, user_id: &UserId, key: &str) -> ReceiptCell {
        let window = self.settings.idempotency_window;
        let mut receipts = self.receipts.lock().unwrap_or_else(PoisonError::into_inner);
        receipts.retain(|_, remembered| {
            !remembered.cell.initialized() || remembered.since.elapsed() < window
        });
        receipts
            .entry((user_id.clone(), key.to_string()))
            .or_insert_with(|| RememberedKey {
                since: Instant::now(),
                cell: ReceiptCell::default(),
            })
            .cell
            .clone()
    }

    /// Drops the key of a failed checkout unless another request is still waiting on it.
    fn forget_failed(&self, user_id: &UserId, key: &str, cell: &ReceiptCell) {
        let mut receipts = self.receipts.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = (user_id.clone(), key.to_string());
        if receipts
            .get(&entry)
            .is_some_and(|r| {
                Arc::ptr_eq(&r.cell, cell) && !r.cell.initialized() && Arc::strong_count(cell) == 2
            })
        {
            receipts.remove(&entry);
        }
    }

    /// Number of idempotency keys currently held.
    pub fn remembered_keys(&self) -> usize {
        self.receipts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn place(
        &self,
        user_id: &UserId,
        cart: &CartStore,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let lines = cart.items().await;
        let result = self.place_order(user_id, &lines, Some(cart)).await;
        let message = match &result {
            Ok(receipt) => format!(
                "Order {} placed by {} with {} item(s), total {}",
                receipt.order_id,
                user_id,
                receipt.lines.len(),
                receipt.grand_total
            ),
            Err(e) => format!("Checkout failed for {user_id}: {e}"),
        };
        let message = QueueMessage::new(self.settings.order_queue.clone(), message);
        publish(self.queue.as_ref(), message).await;
        result
    }

    /// Places an order for `lines`, clearing `cart` once the order is committed.
    pub async fn place_order(
        &self,
        user_id: &UserId,
        lines: &[CartLine],
        cart: Option<&CartStore>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if user_id.is_blank() {
            return Err(CheckoutError::Validation("user id is required".to_string()));
        }
        if lines.is_empty() {
            return Err(CheckoutError::Validation("cart is empty".to_string()));
        }
        if let Some(line) = lines.iter().find(|l| l.quantity == 0) {
            return Err(CheckoutError::Validation(format!(
                "cart line {} has no quantity",
                line.product_id
            )));
        }

        let order_id = OrderId::generate();
        let ordered_at = Utc::now();
        let drafts: Vec<OrderLineCreate> = lines
            .iter()
            .map(|line| OrderLineCreate {
                order_id: order_id.clone(),
                user_id: user_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                total_price: line.line_total(),
                status: ItemStatus::Pending,
                ordered_at,
            })
            .collect();

        let expected = drafts.len();
        let order_lines = match self.orders.create_batch(drafts.clone()).await {
            BatchWrite::AllWritten { ids } if ids.len() == expected => ids
                .into_iter()
                .zip(drafts)
                .map(|(id, draft)| OrderLine::from_draft(id, draft))
                .collect::<Vec<_>>(),
            BatchWrite::AllWritten { ids } => {
                error!(%order_id, expected, written = ids.len(), "Order write count mismatch");
                return Err(CheckoutError::PartialWrite {
                    expected,
                    written: ids.len(),
                });
            }
            BatchWrite::PartialFailure { written } => {
                error!(%order_id, expected, written, "Order partially written");
                return Err(CheckoutError::PartialWrite { expected, written });
            }
            BatchWrite::TotalFailure { reason } => {
                error!(%order_id, %reason, "Order write failed");
                return Err(CheckoutError::Persistence(reason));
            }
        };
        info!(%order_id, lines = expected, "Order committed");

        let mut warnings = Vec::new();
        for line in lines {
            if let Err(issue) = self.decrement_stock(&line.product_id, line.quantity).await {
                warn!(%order_id, product_id = %line.product_id, %issue, "Stock not decremented");
                warnings.push(CheckoutWarning::Stock {
                    product_id: line.product_id.clone(),
                    issue,
                });
            }
        }

        if let Some(cart) = cart {
            cart.clear_cart().await;
        }

        let invoice_file = match self.store_invoice(user_id, &order_id).await {
            Ok(name) => Some(name),
            Err(warning) => {
                warn!(%order_id, %warning, "Invoice delayed");
                warnings.push(warning);
                None
            }
        };

        Ok(CheckoutReceipt {
            order_id,
            user_id: user_id.clone(),
            grand_total: cart_total(lines),
            lines: order_lines,
            invoice_file,
            warnings,
            replayed: false,
        })
    }

    async fn decrement_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StockIssue> {
        let available = match self.catalog.decrement_stock(product_id, quantity).await {
            Ok(available) => available,
            Err(ProductError::NotFound(_)) => return Err(StockIssue::ProductMissing),
            Err(e) => return Err(StockIssue::UpdateFailed(e.to_string())),
        };
        if available < quantity {
            return Err(StockIssue::Oversold {
                requested: quantity,
                available,
            });
        }
        Ok(())
    }

    async fn store_invoice(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<String, CheckoutWarning> {
        let document = self
            .invoices
            .generate(user_id, order_id)
            .await
            .map_err(|e| CheckoutWarning::InvoiceGeneration(e.to_string()))?;
        let name = invoice_file_name(order_id, &self.settings.invoice_suffix);
        self.files
            .upload(user_id.as_str(), &name, document)
            .await
            .map_err(|e| CheckoutWarning::InvoiceUpload(e.to_string()))?;
        Ok(name)
    }

    /// The stored invoice of one of the user's orders.
    #[instrument(skip(self))]
    pub async fn download_invoice(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<StoredFile, FileStoreError> {
        let name = invoice_file_name(order_id, &self.settings.invoice_suffix);
        self.files.download(user_id.as_str(), &name).await
    }
}
