use crate::domain::payment::PaymentDraft;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::BufRead;

/// One decoded request line. The `op` tag selects the operation; field names
/// use the same camelCase spelling as the payments API bodies.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    CreateUser {
        id: Option<String>,
        name: String,
        email: String,
    },
    #[serde(rename_all = "camelCase")]
    GetUser { id: String },
    CreatePayment(PaymentDraft),
    #[serde(rename_all = "camelCase")]
    GetPayment {
        id: Option<String>,
        order_id: Option<String>,
    },
    ListPayments,
    #[serde(rename_all = "camelCase")]
    PaymentsByUser { user_id: String },
    #[serde(rename_all = "camelCase")]
    PaymentsByCurrency { currency: String },
    #[serde(rename_all = "camelCase")]
    PaymentInCurrency {
        id: Option<String>,
        order_id: Option<String>,
        target_currency: String,
    },
    #[serde(rename_all = "camelCase")]
    UpdateStatus {
        id: Option<String>,
        order_id: Option<String>,
        status: Option<String>,
        transaction_id: Option<String>,
        gateway_response: Option<serde_json::Value>,
    },
    #[serde(rename_all = "camelCase")]
    Refund {
        id: Option<String>,
        order_id: Option<String>,
        refund_amount: Option<Decimal>,
        refund_reason: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Receipt {
        id: Option<String>,
        order_id: Option<String>,
    },
    Currencies,
    Stats,
}

/// Reads requests from a JSON Lines source, one object per line.
///
/// Blank lines are skipped; a malformed line surfaces as an `Err` item so
/// the caller can answer it with a 400 without aborting the stream.
pub struct RequestReader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> RequestReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn requests(self) -> impl Iterator<Item = Result<Request>> {
        self.reader
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|line| {
                let line = line?;
                serde_json::from_str(&line).map_err(PaymentError::from)
            })
    }
}
