//! Hand-written collaborators for unit tests.

use crate::accounts::AccountReader;
use crate::catalog::CatalogReader;
use crate::files::{FileStore, FileStoreError, StoredFile};
use crate::invoice::{InvoiceError, InvoiceTrigger};
use crate::model::{
    Category, ItemStatus, OrderId, OrderLine, OrderLineCreate, OrderLineId, Product, ProductId,
    User, UserId,
};
use crate::order_actor::OrderError;
use crate::persistence::{
    group_by_order, BatchWrite, GroupedOrders, OrderPersistence, StatusSelector,
};
use crate::product_actor::ProductError;
use crate::queue::{MessageQueue, QueueError, QueueMessage};
use crate::user_actor::UserError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn product(id: &str, price: &str, quantity: u32) -> Product {
    Product {
        id: ProductId::from(id),
        category: Category::Books,
        name: format!("Product {id}"),
        description: format!("Description of {id}"),
        price: price.parse().unwrap(),
        quantity,
    }
}

pub fn user(id: &str) -> User {
    User {
        id: UserId::from(id),
        name: format!("Customer {id}"),
        email: format!("{id}@example.com"),
        street_address: "1 Main Road".into(),
        city: "Pretoria".into(),
        province: "Gauteng".into(),
        postal_code: "0002".into(),
        country: "South Africa".into(),
        phone_number: "012 555 0123".into(),
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<HashMap<ProductId, Product>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    pub writes: AtomicUsize,
}

impl FakeCatalog {
    pub fn with(products: Vec<Product>) -> Self {
        let catalog = Self::default();
        {
            let mut map = catalog.products.lock().unwrap();
            for p in products {
                map.insert(p.id.clone(), p);
            }
        }
        catalog
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn set_price(&self, id: &str, price: &str) {
        let mut map = self.products.lock().unwrap();
        map.get_mut(&ProductId::from(id)).unwrap().price = price.parse().unwrap();
    }

    pub fn remove(&self, id: &str) {
        self.products.lock().unwrap().remove(&ProductId::from(id));
    }

    pub fn quantity(&self, id: &str) -> Option<u32> {
        self.products
            .lock()
            .unwrap()
            .get(&ProductId::from(id))
            .map(|p| p.quantity)
    }
}

#[async_trait]
impl CatalogReader for FakeCatalog {
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ProductError::ActorCommunicationError("catalog offline".into()));
        }
        Ok(self.products.lock().unwrap().get(id).cloned())
    }

    async fn decrement_stock(&self, id: &ProductId, quantity: u32) -> Result<u32, ProductError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProductError::ActorCommunicationError("catalog read-only".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut map = self.products.lock().unwrap();
        let product = map
            .get_mut(id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;
        let available = product.quantity;
        product.quantity = available.saturating_sub(quantity);
        Ok(available)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.products.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct FakeAccounts {
    users: Mutex<HashMap<UserId, User>>,
}

impl FakeAccounts {
    pub fn with(users: Vec<User>) -> Self {
        let accounts = Self::default();
        for u in users {
            accounts.users.lock().unwrap().insert(u.id.clone(), u);
        }
        accounts
    }
}

#[async_trait]
impl AccountReader for FakeAccounts {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }
}

/// What the next `create_batch` reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteMode {
    Store,
    Partial(usize),
    Fail,
}

pub struct FakeOrders {
    lines: Mutex<Vec<OrderLine>>,
    mode: Mutex<WriteMode>,
    /// Lines changed by the next `update_status`, if capped.
    update_cap: Mutex<Option<usize>>,
    pub batches: AtomicUsize,
}

impl Default for FakeOrders {
    fn default() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            mode: Mutex::new(WriteMode::Store),
            update_cap: Mutex::new(None),
            batches: AtomicUsize::new(0),
        }
    }
}

impl FakeOrders {
    pub fn set_mode(&self, mode: WriteMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn cap_updates(&self, cap: usize) {
        *self.update_cap.lock().unwrap() = Some(cap);
    }

    pub fn lines(&self) -> Vec<OrderLine> {
        self.lines.lock().unwrap().clone()
    }

    pub fn insert(&self, line: OrderLine) {
        self.lines.lock().unwrap().push(line);
    }
}

#[async_trait]
impl OrderPersistence for FakeOrders {
    async fn create_batch(&self, drafts: Vec<OrderLineCreate>) -> BatchWrite {
        self.batches.fetch_add(1, Ordering::SeqCst);
        match *self.mode.lock().unwrap() {
            WriteMode::Fail => BatchWrite::TotalFailure {
                reason: "storage offline".into(),
            },
            WriteMode::Partial(written) => BatchWrite::PartialFailure { written },
            WriteMode::Store => {
                let mut lines = self.lines.lock().unwrap();
                let mut ids = Vec::new();
                for draft in drafts {
                    let id = OrderLineId::generate();
                    ids.push(id.clone());
                    lines.push(OrderLine::from_draft(id, draft));
                }
                BatchWrite::AllWritten { ids }
            }
        }
    }

    async fn get_by_order_and_user(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
    ) -> Result<Vec<OrderLine>, OrderError> {
        Ok(self
            .lines()
            .into_iter()
            .filter(|l| l.order_id == *order_id && l.user_id == *user_id)
            .collect())
    }

    async fn get_by_order(&self, order_id: &OrderId) -> Result<Vec<OrderLine>, OrderError> {
        Ok(self
            .lines()
            .into_iter()
            .filter(|l| l.order_id == *order_id)
            .collect())
    }

    async fn get_by_user(&self, user_id: &UserId) -> Result<GroupedOrders, OrderError> {
        Ok(group_by_order(
            self.lines()
                .into_iter()
                .filter(|l| l.user_id == *user_id)
                .collect(),
        ))
    }

    async fn get_all(&self) -> Result<GroupedOrders, OrderError> {
        Ok(group_by_order(self.lines()))
    }

    async fn update_status(
        &self,
        selector: StatusSelector,
        status: ItemStatus,
    ) -> Result<usize, OrderError> {
        let cap = self.update_cap.lock().unwrap().take().unwrap_or(usize::MAX);
        let mut updated = 0;
        for line in self.lines.lock().unwrap().iter_mut() {
            if updated < cap && selector.matches(line) {
                line.status = status;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[derive(Default)]
pub struct FakeInvoices {
    fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeInvoices {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl InvoiceTrigger for FakeInvoices {
    async fn generate(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<Vec<u8>, InvoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(InvoiceError::Lookup("order store offline".into()));
        }
        Ok(format!("invoice {order_id} for {user_id}").into_bytes())
    }
}

/// A file store that refuses every upload.
pub struct BrokenFileStore;

#[async_trait]
impl FileStore for BrokenFileStore {
    async fn upload(
        &self,
        _directory: &str,
        _name: &str,
        _content: Vec<u8>,
    ) -> Result<(), FileStoreError> {
        Err(FileStoreError::Unavailable("share offline".into()))
    }

    async fn download(&self, directory: &str, name: &str) -> Result<StoredFile, FileStoreError> {
        Err(FileStoreError::NotFound {
            directory: directory.into(),
            name: name.into(),
        })
    }

    async fn delete(&self, _directory: &str, _name: &str) -> Result<bool, FileStoreError> {
        Err(FileStoreError::Unavailable("share offline".into()))
    }

    async fn exists(&self, _directory: &str, _name: &str) -> Result<bool, FileStoreError> {
        Err(FileStoreError::Unavailable("share offline".into()))
    }
}

#[derive(Default)]
pub struct RecordingQueue {
    sent: Mutex<Vec<QueueMessage>>,
    fail: AtomicBool,
}

impl RecordingQueue {
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<QueueMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageQueue for RecordingQueue {
    async fn send(&self, message: QueueMessage) -> Result<(), QueueError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(QueueError::Unavailable("broker down".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub fn decimal(value: &str) -> Decimal {
    value.parse().unwrap()
}
