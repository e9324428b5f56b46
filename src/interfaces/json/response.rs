use crate::error::{PaymentError, Result};
use serde::Serialize;
use serde_json::{Value, json};
use std::io::Write;

/// One response line: the HTTP-equivalent status code plus a JSON body, the
/// same contract the payments API exposes over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn ok<T: Serialize>(body: &T) -> Response {
        Self::with_status(200, body)
    }

    pub fn created<T: Serialize>(body: &T) -> Response {
        Self::with_status(201, body)
    }

    pub fn bad_request(message: impl std::fmt::Display) -> Response {
        Response {
            status: 400,
            body: json!({ "message": message.to_string() }),
        }
    }

    fn with_status<T: Serialize>(status: u16, body: &T) -> Response {
        match serde_json::to_value(body) {
            Ok(body) => Response { status, body },
            Err(err) => Self::from_error(&PaymentError::Json(err)),
        }
    }

    /// Maps the error taxonomy onto status codes and structured bodies:
    /// not-found conditions become 404, store/unexpected failures 500 and
    /// every recoverable validation or state error a descriptive 400.
    pub fn from_error(err: &PaymentError) -> Response {
        let (status, body) = match err {
            PaymentError::NotFound(_) => (404, json!({ "message": err.to_string() })),
            PaymentError::Validation(errors) => (
                400,
                json!({ "message": "Validation failed", "errors": errors }),
            ),
            PaymentError::InvalidTransition {
                current,
                requested,
                allowed,
            } => (
                400,
                json!({
                    "message": "Invalid status transition",
                    "currentStatus": current,
                    "requestedStatus": requested,
                    "allowedTransitions": allowed,
                }),
            ),
            PaymentError::InvalidState { message, current } => (
                400,
                json!({ "message": message, "currentStatus": current }),
            ),
            PaymentError::AlreadyRefunded(details) => (
                400,
                json!({
                    "message": "This payment has already been refunded",
                    "refundDetails": details,
                }),
            ),
            PaymentError::InvalidAmount { max_refund_amount } => (
                400,
                json!({
                    "message": "Invalid refund amount",
                    "maxRefundAmount": max_refund_amount,
                }),
            ),
            PaymentError::UnsupportedCurrency(_) | PaymentError::Conflict(_) => {
                (400, json!({ "message": err.to_string() }))
            }
            PaymentError::Io(_) | PaymentError::Json(_) | PaymentError::Internal(_) => {
                (500, json!({ "message": err.to_string() }))
            }
        };
        Response { status, body }
    }
}

/// Writes responses as JSON Lines.
pub struct ResponseWriter<W: Write> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, response: &Response) -> Result<()> {
        serde_json::to_writer(&mut self.writer, response)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
