use crate::domain::currency::Currency;
use crate::domain::payment::Payment;
use crate::domain::ports::{PaymentStore, UserStore};
use crate::domain::user::User;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column family for payment records.
pub const CF_PAYMENTS: &str = "payments";
/// Column family for user records.
pub const CF_USERS: &str = "users";

/// Persistent store backed by RocksDB, keyed by UUID bytes with JSON values.
///
/// Secondary lookups (order id, transaction id, user, currency) iterate the
/// payments column family; the unique keys they serve are enforced by the
/// engine before writes.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates the database at `path`, ensuring both column
    /// families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_users = ColumnFamilyDescriptor::new(CF_USERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments, cf_users])
            .map_err(|e| PaymentError::Internal(Box::new(e)))?;
        Ok(Self { db: Arc::new(db) })
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: Uuid, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db
            .put_cf(&cf, key.as_bytes(), bytes)
            .map_err(|e| PaymentError::Internal(Box::new(e)))
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, key: Uuid) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        let bytes = self
            .db
            .get_cf(&cf, key.as_bytes())
            .map_err(|e| PaymentError::Internal(Box::new(e)))?;
        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan_payments(&self, mut keep: impl FnMut(&Payment) -> bool) -> Result<Vec<Payment>> {
        let cf = self.cf(CF_PAYMENTS)?;
        let mut payments = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| PaymentError::Internal(Box::new(e)))?;
            let payment: Payment = serde_json::from_slice(&value)?;
            if keep(&payment) {
                payments.push(payment);
            }
        }
        Ok(payments)
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PaymentError::internal(format!("{name} column family not found")))
    }
}

#[async_trait]
impl PaymentStore for RocksDbStore {
    async fn store(&self, payment: Payment) -> Result<()> {
        self.put(CF_PAYMENTS, payment.id, &payment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Payment>> {
        self.read(CF_PAYMENTS, id)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>> {
        Ok(self
            .scan_payments(|p| p.order_id == order_id)?
            .into_iter()
            .next())
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>> {
        Ok(self
            .scan_payments(|p| p.transaction_id.as_deref() == Some(transaction_id))?
            .into_iter()
            .next())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>> {
        let mut payments = self.scan_payments(|p| p.user_id == user_id)?;
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn find_by_currency(&self, currency: Currency) -> Result<Vec<Payment>> {
        self.scan_payments(|p| p.currency == currency)
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        self.scan_payments(|_| true)
    }
}

#[async_trait]
impl UserStore for RocksDbStore {
    async fn store(&self, user: User) -> Result<()> {
        self.put(CF_USERS, user.id, &user)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        self.read(CF_USERS, id)
    }
}
