//! Receipt record and image storage interfaces.
//!
//! Persistent backends live with the host application. The in-memory
//! stores here back tests and prototypes.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::receipt::{Receipt, ReceiptDraft};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store of confirmed receipt records.
pub trait ReceiptStore {
    /// All receipts, most recent purchase first.
    fn fetch_receipts(&self) -> Result<Vec<Receipt>>;

    fn receipt(&self, id: Uuid) -> Result<Option<Receipt>>;

    /// Validate a draft and save it as a new receipt.
    fn create(&self, draft: &ReceiptDraft) -> Result<Receipt>;

    /// Insert or replace a receipt by id.
    fn upsert(&self, receipt: Receipt) -> Result<()>;

    fn delete(&self, id: Uuid) -> Result<()>;

    /// Snapshots of all receipts: one immediately, then one after every change.
    fn observe(&self) -> Receiver<Vec<Receipt>>;
}

/// Store of receipt image bytes keyed by opaque token.
pub trait ImageStore {
    /// Store `data` and return its token. A fresh token is generated
    /// when `preferred_token` is `None`.
    fn store(&self, data: &[u8], preferred_token: Option<&str>) -> Result<String>;

    fn read(&self, token: &str) -> Result<Vec<u8>>;

    fn delete(&self, token: &str) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("store lock poisoned".into()))
}

/// In-memory receipt store.
#[derive(Default)]
pub struct MemoryReceiptStore {
    receipts: Mutex<Vec<Receipt>>,
    observers: Mutex<Vec<Sender<Vec<Receipt>>>>,
}

impl MemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(receipts: &[Receipt]) -> Vec<Receipt> {
        let mut sorted = receipts.to_vec();
        sorted.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        sorted
    }

    fn notify(&self, receipts: &[Receipt]) -> Result<()> {
        let snapshot = Self::snapshot(receipts);
        let mut observers = lock(&self.observers)?;
        observers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        debug!("Notified {} receipt observers", observers.len());
        Ok(())
    }
}

impl ReceiptStore for MemoryReceiptStore {
    fn fetch_receipts(&self) -> Result<Vec<Receipt>> {
        Ok(Self::snapshot(&lock(&self.receipts)?))
    }

    fn receipt(&self, id: Uuid) -> Result<Option<Receipt>> {
        Ok(lock(&self.receipts)?.iter().find(|r| r.id == id).cloned())
    }

    fn create(&self, draft: &ReceiptDraft) -> Result<Receipt> {
        let total_amount = draft.total_amount.ok_or_else(|| {
            StoreError::Validation("total amount must be provided before saving".into())
        })?;
        let merchant_name = draft.merchant_name.trim();
        if merchant_name.is_empty() {
            return Err(StoreError::Validation("merchant name cannot be empty".into()));
        }

        let now = Utc::now();
        let receipt = Receipt {
            id: Uuid::new_v4(),
            merchant_name: merchant_name.to_string(),
            purchase_date: draft.purchase_date.unwrap_or_else(|| now.naive_utc()),
            total_amount,
            tax_amount: draft.tax_amount,
            tip_amount: draft.tip_amount,
            currency_code: draft.currency_code.clone(),
            payment_method: draft.normalized_payment_method(),
            notes: draft.normalized_notes(),
            image_token: None,
            ocr_text: None,
            ocr_locale_identifier: None,
            created_at: now,
            updated_at: now,
            line_items: draft.line_items.clone(),
            auto_filled_fields: draft.auto_filled_fields.clone(),
        };

        let mut receipts = lock(&self.receipts)?;
        receipts.push(receipt.clone());
        self.notify(&receipts)?;
        debug!("Created receipt {}", receipt.id);
        Ok(receipt)
    }

    fn upsert(&self, receipt: Receipt) -> Result<()> {
        let mut receipts = lock(&self.receipts)?;
        match receipts.iter_mut().find(|r| r.id == receipt.id) {
            Some(existing) => *existing = receipt,
            None => receipts.push(receipt),
        }
        self.notify(&receipts)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut receipts = lock(&self.receipts)?;
        let before = receipts.len();
        receipts.retain(|r| r.id != id);
        if receipts.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.notify(&receipts)
    }

    fn observe(&self) -> Receiver<Vec<Receipt>> {
        let (tx, rx) = mpsc::channel();
        if let (Ok(receipts), Ok(mut observers)) = (lock(&self.receipts), lock(&self.observers)) {
            if tx.send(Self::snapshot(&receipts)).is_ok() {
                observers.push(tx);
            }
        }
        rx
    }
}

/// In-memory image store.
#[derive(Default)]
pub struct MemoryImageStore {
    images: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryImageStore {
    fn store(&self, data: &[u8], preferred_token: Option<&str>) -> Result<String> {
        let token = match preferred_token {
            Some(token) if !token.trim().is_empty() => token.to_string(),
            _ => format!("{}.jpg", Uuid::new_v4()),
        };
        lock(&self.images)?.insert(token.clone(), data.to_vec());
        Ok(token)
    }

    fn read(&self, token: &str) -> Result<Vec<u8>> {
        lock(&self.images)?
            .get(token)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(token.to_string()))
    }

    fn delete(&self, token: &str) -> Result<()> {
        lock(&self.images)?
            .remove(token)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(token.to_string()))
    }
}
