use crate::domain::currency::{self, Currency};
use crate::domain::payment::{
    CardDetails, CardDetailsDraft, CardType, NewPayment, PaymentDraft, PaymentMethod,
    PaymentStatus,
};
use crate::error::{PaymentError, Result, ValidationErrors};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::LazyLock;
use uuid::Uuid;

pub const MAX_AMOUNT: Decimal = dec!(1000000);

static ORDER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ORDER-[A-Z0-9]{6,12}$").expect("hard-coded pattern"));
static TRANSACTION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TXN-[A-Z0-9]{6,15}$").expect("hard-coded pattern"));
static LAST_FOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("hard-coded pattern"));
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("hard-coded pattern"));

/// Validates a creation payload, accumulating every field violation instead
/// of failing on the first, and produces the typed payload on success.
pub fn validate_payment_input(draft: PaymentDraft) -> Result<NewPayment> {
    let mut errors = ValidationErrors::new();

    let order_id = match draft.order_id {
        None => {
            errors.add("orderId", "Order ID is required");
            None
        }
        Some(order_id) if !ORDER_ID_RE.is_match(&order_id) => {
            errors.add(
                "orderId",
                "Invalid order ID format. Format should be ORDER-XXXXXX where X is alphanumeric",
            );
            None
        }
        Some(order_id) => Some(order_id),
    };

    let user_id = match draft.user_id.as_deref() {
        None => {
            errors.add("userId", "User ID is required");
            None
        }
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(user_id) => Some(user_id),
            Err(_) => {
                errors.add("userId", "Invalid user ID format");
                None
            }
        },
    };

    let resolved_currency = match draft.currency.as_deref() {
        None => Some(Currency::USD),
        Some(code) => match Currency::from_code(code) {
            Some(currency) => Some(currency),
            None => {
                errors.add("currency", format!("Currency {code} is not supported"));
                None
            }
        },
    };

    let amount = match draft.amount {
        None => {
            errors.add("amount", "Amount is required");
            None
        }
        Some(amount) if amount <= Decimal::ZERO => {
            errors.add("amount", "Amount must be a positive number");
            None
        }
        Some(amount) if amount > MAX_AMOUNT => {
            errors.add("amount", "Amount cannot exceed 1,000,000");
            None
        }
        Some(amount) if amount.normalize().scale() > 2 => {
            errors.add("amount", "Amount can have at most 2 decimal places");
            None
        }
        Some(amount) => {
            if let Some(currency) = resolved_currency
                && !currency::valid_amount_for(amount, currency)
            {
                errors.add(
                    "amount",
                    format!(
                        "Amount can have at most {} decimal places for {currency}",
                        currency.decimal_places()
                    ),
                );
                None
            } else {
                Some(amount)
            }
        }
    };

    let payment_method = match draft.payment_method.as_deref() {
        None => {
            errors.add("paymentMethod", "Payment method is required");
            None
        }
        Some(raw) => match PaymentMethod::from_str(raw) {
            Some(method) => Some(method),
            None => {
                errors.add(
                    "paymentMethod",
                    format!(
                        "Invalid payment method. Valid options are: {}",
                        method_options()
                    ),
                );
                None
            }
        },
    };

    // Card details only apply to card methods; other methods ignore them.
    let payment_details = match (payment_method, draft.payment_details) {
        (Some(method), None) if method.is_card() => {
            errors.add(
                "paymentDetails",
                "Payment details are required for card payments",
            );
            None
        }
        (Some(method), Some(details)) if method.is_card() => {
            validate_card_details(details, &mut errors)
        }
        _ => None,
    };

    if let Some(transaction_id) = draft.transaction_id.as_deref()
        && !TRANSACTION_ID_RE.is_match(transaction_id)
    {
        errors.add("transactionId", TRANSACTION_ID_MESSAGE);
    }

    if let (Some(order_id), Some(user_id), Some(amount), Some(currency), Some(payment_method)) = (
        order_id,
        user_id,
        amount,
        resolved_currency,
        payment_method,
    ) && errors.is_empty()
    {
        Ok(NewPayment {
            order_id,
            user_id,
            amount,
            currency,
            payment_method,
            payment_details,
            transaction_id: draft.transaction_id,
            gateway_response: draft.gateway_response,
            metadata: draft.metadata.unwrap_or_default(),
        })
    } else {
        Err(PaymentError::Validation(errors))
    }
}

const TRANSACTION_ID_MESSAGE: &str =
    "Invalid transaction ID format. Format should be TXN-XXXXXX where X is alphanumeric";

/// Checks each card-detail field independently so every violation lands in
/// the errors map.
fn validate_card_details(
    draft: CardDetailsDraft,
    errors: &mut ValidationErrors,
) -> Option<CardDetails> {
    let errors_before = errors.0.len();

    let card_type = match draft.card_type.as_deref() {
        None => None,
        Some(raw) => match CardType::from_str(raw) {
            Some(card_type) => Some(card_type),
            None => {
                errors.add("cardType", "Invalid card type");
                None
            }
        },
    };

    if let Some(last_four) = draft.last_four_digits.as_deref()
        && !LAST_FOUR_RE.is_match(last_four)
    {
        errors.add("lastFourDigits", "Last four digits must be 4 numeric characters");
    }

    if let Some(expiry) = draft.expiry_date.as_deref()
        && !EXPIRY_RE.is_match(expiry)
    {
        errors.add("expiryDate", "Expiry date must be in MM/YY format");
    }

    if errors.0.len() > errors_before {
        return None;
    }

    Some(CardDetails {
        card_type,
        last_four_digits: draft.last_four_digits,
        expiry_date: draft.expiry_date,
        billing_address: draft.billing_address,
    })
}

/// Format check for a gateway transaction reference.
pub fn validate_transaction_id(transaction_id: &str) -> Result<()> {
    if TRANSACTION_ID_RE.is_match(transaction_id) {
        Ok(())
    } else {
        Err(PaymentError::validation("transactionId", TRANSACTION_ID_MESSAGE))
    }
}

/// Request-level refund validation; the engine enforces the per-payment
/// bounds.
pub fn validate_refund_input(
    refund_amount: Option<Decimal>,
    refund_reason: Option<&str>,
) -> Result<()> {
    let mut errors = ValidationErrors::new();

    match refund_amount {
        None => errors.add("refundAmount", "Refund amount is required"),
        Some(amount) if amount <= Decimal::ZERO => {
            errors.add("refundAmount", "Refund amount must be a positive number")
        }
        Some(amount) if amount.normalize().scale() > 2 => {
            errors.add("refundAmount", "Refund amount can have at most 2 decimal places")
        }
        Some(_) => {}
    }

    match refund_reason {
        None => errors.add("refundReason", "Refund reason is required"),
        // Character bounds, not byte bounds.
        Some(reason) if !(5..=500).contains(&reason.chars().count()) => {
            errors.add("refundReason", "Refund reason must be between 5 and 500 characters")
        }
        Some(_) => {}
    }

    errors.into_result()
}

/// Parses and validates the requested status of a status-update request.
pub fn validate_status_update(status: Option<&str>) -> Result<PaymentStatus> {
    match status {
        None => Err(PaymentError::validation("status", "Status is required")),
        Some(raw) => PaymentStatus::from_str(raw).ok_or_else(|| {
            PaymentError::validation(
                "status",
                format!("Invalid status. Valid options are: {}", status_options()),
            )
        }),
    }
}

fn method_options() -> String {
    PaymentMethod::ALL
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_options() -> String {
    PaymentStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
