use crate::domain::currency::{self, Currency};
use crate::domain::payment::{
    Payment, PaymentDraft, PaymentStatus, Receipt,
};
use crate::domain::ports::{PaymentStoreBox, UserStoreBox};
use crate::domain::user::User;
use crate::domain::validation;
use crate::error::{PaymentError, Result};
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// The payment lifecycle engine.
///
/// Owns the status state machine, refund workflow, receipt generation and the
/// currency-derived views. All persistence goes through the store ports; the
/// engine awaits every write before returning so each request observes its
/// own effects.
pub struct PaymentEngine {
    payment_store: PaymentStoreBox,
    user_store: UserStoreBox,
}

/// A payment projected into another currency using the static rate table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedPayment {
    #[serde(flatten)]
    pub payment: Payment,
    pub target_currency: Currency,
    pub converted_amount: Decimal,
    pub formatted_amount: String,
}

/// Aggregated view over all payments. `total_amount` groups completed
/// payments by currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_count: u64,
    pub by_status: BTreeMap<&'static str, u64>,
    pub by_method: BTreeMap<&'static str, u64>,
    pub total_amount: BTreeMap<&'static str, Decimal>,
}

impl PaymentEngine {
    pub fn new(payment_store: PaymentStoreBox, user_store: UserStoreBox) -> Self {
        Self {
            payment_store,
            user_store,
        }
    }

    /// Creates a user. A client-supplied id is honored (document stores
    /// allow caller-chosen identifiers) as long as it is free.
    pub async fn create_user(
        &self,
        id: Option<Uuid>,
        name: String,
        email: String,
    ) -> Result<User> {
        let mut user = User::new(name, email);
        if let Some(id) = id {
            if self.user_store.exists(id).await? {
                return Err(PaymentError::Conflict(
                    "User with this ID already exists".to_string(),
                ));
            }
            user.id = id;
        }
        self.user_store.store(user.clone()).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.user_store
            .get(id)
            .await?
            .ok_or(PaymentError::NotFound("User"))
    }

    /// Validates the draft, checks user existence and uniqueness constraints,
    /// and persists a new payment in `Pending` status.
    pub async fn create_payment(&self, draft: PaymentDraft) -> Result<Payment> {
        let new = validation::validate_payment_input(draft)?;

        if !self.user_store.exists(new.user_id).await? {
            return Err(PaymentError::NotFound("User"));
        }
        if self
            .payment_store
            .find_by_order_id(&new.order_id)
            .await?
            .is_some()
        {
            return Err(PaymentError::Conflict(
                "Payment with this order ID already exists".to_string(),
            ));
        }
        if let Some(transaction_id) = new.transaction_id.as_deref() {
            self.ensure_transaction_id_free(transaction_id, None).await?;
        }

        let payment = Payment::new(new);
        self.payment_store.store(payment.clone()).await?;
        tracing::info!(payment_id = %payment.id, order_id = %payment.order_id, "payment created");
        Ok(payment)
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<Payment> {
        self.payment_store
            .get(id)
            .await?
            .ok_or(PaymentError::NotFound("Payment"))
    }

    pub async fn find_by_order_id(&self, order_id: &str) -> Result<Payment> {
        self.payment_store
            .find_by_order_id(order_id)
            .await?
            .ok_or(PaymentError::NotFound("Payment"))
    }

    pub async fn list_payments(&self) -> Result<Vec<Payment>> {
        self.payment_store.get_all().await
    }

    pub async fn payments_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>> {
        if !self.user_store.exists(user_id).await? {
            return Err(PaymentError::NotFound("User"));
        }
        self.payment_store.find_by_user(user_id).await
    }

    pub async fn payments_by_currency(&self, currency: Currency) -> Result<Vec<Payment>> {
        self.payment_store.find_by_currency(currency).await
    }

    /// Derived view of a payment converted into `target` using the static
    /// exchange-rate table.
    pub async fn payment_in_currency(
        &self,
        id: Uuid,
        target: Currency,
    ) -> Result<ConvertedPayment> {
        let payment = self.get_payment(id).await?;
        let converted_amount = currency::convert(payment.amount, payment.currency, target);
        let formatted_amount = currency::format_amount(converted_amount, target);
        Ok(ConvertedPayment {
            payment,
            target_currency: target,
            converted_amount,
            formatted_amount,
        })
    }

    /// Applies a status transition (per the transition table on
    /// [`PaymentStatus`]), optionally recording the gateway transaction
    /// reference and response payload.
    pub async fn update_status(
        &self,
        id: Uuid,
        requested: PaymentStatus,
        transaction_id: Option<String>,
        gateway_response: Option<serde_json::Value>,
    ) -> Result<Payment> {
        let mut payment = self.get_payment(id).await?;
        let previous = payment.status;
        payment.transition_to(requested)?;

        if let Some(transaction_id) = transaction_id {
            validation::validate_transaction_id(&transaction_id)?;
            self.ensure_transaction_id_free(&transaction_id, Some(id)).await?;
            payment.transaction_id = Some(transaction_id);
        }
        if let Some(gateway_response) = gateway_response {
            payment.gateway_response = Some(gateway_response);
        }

        self.payment_store.store(payment.clone()).await?;
        tracing::info!(payment_id = %id, %previous, status = %requested, "payment status updated");
        Ok(payment)
    }

    /// Validates and applies the one-time refund for a completed payment.
    /// The refund reference is best-effort unique (timestamp + random
    /// suffix).
    pub async fn process_refund(
        &self,
        id: Uuid,
        refund_amount: Decimal,
        refund_reason: Option<String>,
    ) -> Result<Payment> {
        let mut payment = self.get_payment(id).await?;
        let reason = refund_reason.unwrap_or_else(|| "Customer request".to_string());
        let refund_id = generate_refund_id();
        payment.apply_refund(refund_id, refund_amount, reason)?;

        self.payment_store.store(payment.clone()).await?;
        tracing::info!(payment_id = %id, %refund_amount, "payment refunded");
        Ok(payment)
    }

    pub async fn generate_receipt(&self, id: Uuid) -> Result<Receipt> {
        Ok(self.get_payment(id).await?.generate_receipt())
    }

    /// Aggregate counts by status and method, and completed totals by
    /// currency.
    pub async fn stats(&self) -> Result<PaymentStats> {
        let payments = self.payment_store.get_all().await?;

        let mut by_status = BTreeMap::new();
        let mut by_method = BTreeMap::new();
        let mut total_amount = BTreeMap::new();
        for payment in &payments {
            *by_status.entry(payment.status.as_str()).or_insert(0) += 1;
            *by_method.entry(payment.payment_method.as_str()).or_insert(0) += 1;
            if payment.status == PaymentStatus::Completed {
                *total_amount
                    .entry(payment.currency.code())
                    .or_insert(Decimal::ZERO) += payment.amount;
            }
        }

        Ok(PaymentStats {
            total_count: payments.len() as u64,
            by_status,
            by_method,
            total_amount,
        })
    }

    async fn ensure_transaction_id_free(
        &self,
        transaction_id: &str,
        except: Option<Uuid>,
    ) -> Result<()> {
        if let Some(existing) = self
            .payment_store
            .find_by_transaction_id(transaction_id)
            .await?
            && Some(existing.id) != except
        {
            return Err(PaymentError::Conflict(
                "Payment with this transaction ID already exists".to_string(),
            ));
        }
        Ok(())
    }
}

/// `REF-` + base-36 millisecond timestamp + 4 random alphanumerics.
/// Best-effort uniqueness, not a hard invariant.
fn generate_refund_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let millis = Utc::now().timestamp_millis().unsigned_abs();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("REF-{}{suffix}", base36_upper(millis))
}

fn base36_upper(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
