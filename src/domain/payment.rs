use crate::domain::currency::Currency;
use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lifecycle status of a payment, governed by a single transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 6] = [
        PaymentStatus::Pending,
        PaymentStatus::Processing,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
        PaymentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(value: &str) -> Option<PaymentStatus> {
        PaymentStatus::ALL.iter().copied().find(|s| s.as_str() == value)
    }

    /// The set of statuses this status may legally transition to.
    /// `Refunded` is terminal.
    pub fn allowed_transitions(&self) -> &'static [PaymentStatus] {
        match self {
            PaymentStatus::Pending => &[
                PaymentStatus::Processing,
                PaymentStatus::Cancelled,
                PaymentStatus::Failed,
            ],
            PaymentStatus::Processing => &[PaymentStatus::Completed, PaymentStatus::Failed],
            PaymentStatus::Completed => &[PaymentStatus::Refunded],
            PaymentStatus::Failed => &[PaymentStatus::Pending],
            PaymentStatus::Cancelled => &[PaymentStatus::Pending],
            PaymentStatus::Refunded => &[],
        }
    }

    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    Crypto,
    CashOnDelivery,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
        PaymentMethod::Crypto,
        PaymentMethod::CashOnDelivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Crypto => "crypto",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }

    pub fn from_str(value: &str) -> Option<PaymentMethod> {
        PaymentMethod::ALL.iter().copied().find(|m| m.as_str() == value)
    }

    /// Card methods require nested card details.
    pub fn is_card(&self) -> bool {
        matches!(self, PaymentMethod::CreditCard | PaymentMethod::DebitCard)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Other,
}

impl CardType {
    pub const ALL: [CardType; 5] = [
        CardType::Visa,
        CardType::Mastercard,
        CardType::Amex,
        CardType::Discover,
        CardType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "visa",
            CardType::Mastercard => "mastercard",
            CardType::Amex => "amex",
            CardType::Discover => "discover",
            CardType::Other => "other",
        }
    }

    pub fn from_str(value: &str) -> Option<CardType> {
        CardType::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_type: Option<CardType>,
    pub last_four_digits: Option<String>,
    pub expiry_date: Option<String>,
    pub billing_address: Option<BillingAddress>,
}

/// The one permitted refund against a payment. Once set, immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundDetails {
    pub refund_id: String,
    pub refund_amount: Decimal,
    pub refund_date: DateTime<Utc>,
    pub refund_reason: String,
}

/// A validated creation payload, produced by
/// [`crate::domain::validation::validate_payment_input`].
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: String,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub payment_details: Option<CardDetails>,
    pub transaction_id: Option<String>,
    pub gateway_response: Option<serde_json::Value>,
    pub metadata: BTreeMap<String, String>,
}

/// Raw creation payload as decoded from a request body. Field-level
/// validation happens in `domain::validation`, not during deserialization, so
/// all violations can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub order_id: Option<String>,
    pub user_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub payment_details: Option<CardDetailsDraft>,
    pub transaction_id: Option<String>,
    pub gateway_response: Option<serde_json::Value>,
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetailsDraft {
    pub card_type: Option<String>,
    pub last_four_digits: Option<String>,
    pub expiry_date: Option<String>,
    pub billing_address: Option<BillingAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: String,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub payment_details: Option<CardDetails>,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub gateway_response: Option<serde_json::Value>,
    pub refund_details: Option<RefundDetails>,
    pub metadata: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pure projection of a payment into a receipt. Deterministic, no
/// persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub receipt_id: String,
    pub order_id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
}

impl Payment {
    /// Creates a new payment in `Pending` status with a store-assigned id.
    pub fn new(new: NewPayment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_id: new.order_id,
            user_id: new.user_id,
            amount: new.amount,
            currency: new.currency,
            payment_method: new.payment_method,
            payment_details: new.payment_details,
            status: PaymentStatus::Pending,
            transaction_id: new.transaction_id,
            gateway_response: new.gateway_response,
            refund_details: None,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a status transition, rejecting pairs outside the transition
    /// table.
    pub fn transition_to(&mut self, requested: PaymentStatus) -> Result<(), PaymentError> {
        if !self.status.can_transition_to(requested) {
            return Err(PaymentError::InvalidTransition {
                current: self.status,
                requested,
                allowed: self.status.allowed_transitions().to_vec(),
            });
        }
        self.status = requested;
        self.touch();
        Ok(())
    }

    /// Applies the one permitted refund. Only `Completed` payments can be
    /// refunded, exactly once, for `0 < amount <= self.amount`.
    pub fn apply_refund(
        &mut self,
        refund_id: String,
        refund_amount: Decimal,
        refund_reason: String,
    ) -> Result<(), PaymentError> {
        if self.status != PaymentStatus::Completed {
            return Err(PaymentError::InvalidState {
                message: "Only completed payments can be refunded",
                current: self.status,
            });
        }
        if let Some(existing) = &self.refund_details {
            return Err(PaymentError::AlreadyRefunded(existing.clone()));
        }
        if refund_amount <= Decimal::ZERO || refund_amount > self.amount {
            return Err(PaymentError::InvalidAmount {
                max_refund_amount: self.amount,
            });
        }

        self.status = PaymentStatus::Refunded;
        self.refund_details = Some(RefundDetails {
            refund_id,
            refund_amount,
            refund_date: Utc::now(),
            refund_reason,
        });
        self.touch();
        Ok(())
    }

    pub fn generate_receipt(&self) -> Receipt {
        Receipt {
            receipt_id: format!("RCPT-{}", self.id),
            order_id: self.order_id.clone(),
            amount: self.amount,
            currency: self.currency,
            payment_method: self.payment_method,
            payment_date: self.created_at,
            status: self.status,
        }
    }

    /// Refreshes the last-modified timestamp. `created_at` never changes.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn sample_payment() -> Payment {
        Payment::new(NewPayment {
            order_id: "ORDER-AB12CD".to_string(),
            user_id: Uuid::new_v4(),
            amount: dec!(99.99),
            currency: Currency::USD,
            payment_method: PaymentMethod::CreditCard,
            payment_details: Some(CardDetails {
                card_type: Some(CardType::Visa),
                last_four_digits: Some("4242".to_string()),
                expiry_date: Some("12/28".to_string()),
                billing_address: None,
            }),
            transaction_id: None,
            gateway_response: None,
            metadata: BTreeMap::new(),
        })
    }

    #[test]
    fn test_new_payment_starts_pending() {
        let payment = sample_payment();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.refund_details.is_none());
        assert_eq!(payment.created_at, payment.updated_at);
    }

    #[test]
    fn test_transition_table_is_exhaustive() {
        // Every (current, next) pair outside the table must be rejected.
        let legal: &[(PaymentStatus, PaymentStatus)] = &[
            (PaymentStatus::Pending, PaymentStatus::Processing),
            (PaymentStatus::Pending, PaymentStatus::Cancelled),
            (PaymentStatus::Pending, PaymentStatus::Failed),
            (PaymentStatus::Processing, PaymentStatus::Completed),
            (PaymentStatus::Processing, PaymentStatus::Failed),
            (PaymentStatus::Completed, PaymentStatus::Refunded),
            (PaymentStatus::Failed, PaymentStatus::Pending),
            (PaymentStatus::Cancelled, PaymentStatus::Pending),
        ];

        for current in PaymentStatus::ALL {
            for next in PaymentStatus::ALL {
                let expected = legal.contains(&(current, next));
                assert_eq!(
                    current.can_transition_to(next),
                    expected,
                    "{current} -> {next}"
                );
            }
        }
    }

    #[test]
    fn test_refunded_is_terminal() {
        for next in PaymentStatus::ALL {
            assert!(!PaymentStatus::Refunded.can_transition_to(next));
        }
        assert!(PaymentStatus::Refunded.allowed_transitions().is_empty());
    }

    #[test]
    fn test_illegal_transition_reports_allowed_set() {
        let mut payment = sample_payment();
        let err = payment.transition_to(PaymentStatus::Completed).unwrap_err();
        match err {
            PaymentError::InvalidTransition {
                current,
                requested,
                allowed,
            } => {
                assert_eq!(current, PaymentStatus::Pending);
                assert_eq!(requested, PaymentStatus::Completed);
                assert_eq!(
                    allowed,
                    vec![
                        PaymentStatus::Processing,
                        PaymentStatus::Cancelled,
                        PaymentStatus::Failed
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Rejected transitions leave the payment untouched.
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_refund_requires_completed_status() {
        let mut payment = sample_payment();
        let err = payment
            .apply_refund("REF-ABC123".to_string(), dec!(10), "Damaged item".to_string())
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidState { .. }));
    }

    #[test]
    fn test_refund_boundary_amounts() {
        let mut payment = sample_payment();
        payment.status = PaymentStatus::Completed;

        // Exceeding the original amount fails and reports the maximum.
        let err = payment
            .apply_refund("REF-A".to_string(), dec!(150.00), "Too much".to_string())
            .unwrap_err();
        match err {
            PaymentError::InvalidAmount { max_refund_amount } => {
                assert_eq!(max_refund_amount, dec!(99.99));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = payment
            .apply_refund("REF-B".to_string(), dec!(0), "Zero".to_string())
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount { .. }));

        // Exactly the original amount succeeds.
        payment
            .apply_refund("REF-FULL01".to_string(), dec!(99.99), "Customer request".to_string())
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Refunded);
    }

    #[test]
    fn test_refund_is_not_idempotent() {
        let mut payment = sample_payment();
        payment.status = PaymentStatus::Completed;
        payment
            .apply_refund("REF-ONE001".to_string(), dec!(50), "Customer request".to_string())
            .unwrap();

        let err = payment
            .apply_refund("REF-TWO002".to_string(), dec!(10), "Customer request".to_string())
            .unwrap_err();
        match err {
            PaymentError::AlreadyRefunded(details) => {
                assert_eq!(details.refund_id, "REF-ONE001");
                assert_eq!(details.refund_amount, dec!(50));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_receipt_is_deterministic() {
        let mut payment = sample_payment();
        payment.status = PaymentStatus::Completed;

        let first = payment.generate_receipt();
        let second = payment.generate_receipt();
        assert_eq!(first, second);
        assert_eq!(first.receipt_id, format!("RCPT-{}", payment.id));
        assert_eq!(first.order_id, "ORDER-AB12CD");
        assert_eq!(first.payment_date, payment.created_at);
        assert_eq!(first.status, PaymentStatus::Completed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cash_on_delivery\""
        );
    }
}
