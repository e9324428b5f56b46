use crate::application::engine::PaymentEngine;
use crate::domain::currency::Currency;
use crate::domain::validation;
use crate::error::{PaymentError, Result};
use crate::interfaces::json::request::Request;
use crate::interfaces::json::response::Response;
use uuid::Uuid;

/// Dispatches one request against the engine, translating every failure into
/// its response shape. Request-level validation runs here, before the engine
/// is invoked.
pub async fn handle(engine: &PaymentEngine, request: Request) -> Response {
    match dispatch(engine, request).await {
        Ok(response) => response,
        Err(err) => Response::from_error(&err),
    }
}

async fn dispatch(engine: &PaymentEngine, request: Request) -> Result<Response> {
    match request {
        Request::CreateUser { id, name, email } => {
            let id = id
                .map(|raw| parse_id(&raw, "id", "Invalid user ID format"))
                .transpose()?;
            let user = engine.create_user(id, name, email).await?;
            Ok(Response::created(&user))
        }
        Request::GetUser { id } => {
            let user = engine.get_user(parse_id(&id, "id", "Invalid user ID format")?).await?;
            Ok(Response::ok(&user))
        }
        Request::CreatePayment(draft) => {
            let payment = engine.create_payment(draft).await?;
            Ok(Response::created(&payment))
        }
        Request::GetPayment { id, order_id } => {
            let payment_id = resolve_payment(engine, id, order_id).await?;
            Ok(Response::ok(&engine.get_payment(payment_id).await?))
        }
        Request::ListPayments => Ok(Response::ok(&engine.list_payments().await?)),
        Request::PaymentsByUser { user_id } => {
            let user_id = parse_id(&user_id, "userId", "Invalid user ID format")?;
            Ok(Response::ok(&engine.payments_by_user(user_id).await?))
        }
        Request::PaymentsByCurrency { currency } => {
            let currency = parse_currency(&currency)?;
            Ok(Response::ok(&engine.payments_by_currency(currency).await?))
        }
        Request::PaymentInCurrency {
            id,
            order_id,
            target_currency,
        } => {
            let target = parse_currency(&target_currency)?;
            let payment_id = resolve_payment(engine, id, order_id).await?;
            Ok(Response::ok(
                &engine.payment_in_currency(payment_id, target).await?,
            ))
        }
        Request::UpdateStatus {
            id,
            order_id,
            status,
            transaction_id,
            gateway_response,
        } => {
            let requested = validation::validate_status_update(status.as_deref())?;
            let payment_id = resolve_payment(engine, id, order_id).await?;
            let payment = engine
                .update_status(payment_id, requested, transaction_id, gateway_response)
                .await?;
            Ok(Response::ok(&payment))
        }
        Request::Refund {
            id,
            order_id,
            refund_amount,
            refund_reason,
        } => {
            validation::validate_refund_input(refund_amount, refund_reason.as_deref())?;
            let Some(amount) = refund_amount else {
                return Err(PaymentError::validation("refundAmount", "Refund amount is required"));
            };
            let payment_id = resolve_payment(engine, id, order_id).await?;
            let payment = engine
                .process_refund(payment_id, amount, refund_reason)
                .await?;
            Ok(Response::ok(&payment))
        }
        Request::Receipt { id, order_id } => {
            let payment_id = resolve_payment(engine, id, order_id).await?;
            Ok(Response::ok(&engine.generate_receipt(payment_id).await?))
        }
        Request::Currencies => {
            let currencies: Vec<_> = Currency::ALL.iter().map(|c| c.info()).collect();
            Ok(Response::ok(&currencies))
        }
        Request::Stats => Ok(Response::ok(&engine.stats().await?)),
    }
}

/// Resolves the payment selector: a store-assigned id takes precedence, an
/// order reference is looked up, anything else is a validation error.
async fn resolve_payment(
    engine: &PaymentEngine,
    id: Option<String>,
    order_id: Option<String>,
) -> Result<Uuid> {
    match (id, order_id) {
        (Some(id), _) => parse_id(&id, "id", "Invalid payment ID format"),
        (None, Some(order_id)) => Ok(engine.find_by_order_id(&order_id).await?.id),
        (None, None) => Err(PaymentError::validation("id", "Payment ID is required")),
    }
}

fn parse_id(raw: &str, field: &str, message: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| PaymentError::validation(field, message))
}

fn parse_currency(code: &str) -> Result<Currency> {
    Currency::from_code(code).ok_or_else(|| PaymentError::UnsupportedCurrency(code.to_string()))
}
