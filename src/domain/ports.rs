use crate::domain::currency::Currency;
use crate::domain::payment::Payment;
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence port for payments. Implementations serialize individual
/// document writes but offer no multi-document transactions; concurrent
/// writers to the same payment race last-write-wins.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store(&self, payment: Payment) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>>;
    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>>;
    async fn find_by_currency(&self, currency: Currency) -> Result<Vec<Payment>>;
    async fn get_all(&self) -> Result<Vec<Payment>>;
}

/// Persistence port for users. The engine only needs existence checks and
/// simple reads.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn store(&self, user: User) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type UserStoreBox = Box<dyn UserStore>;
