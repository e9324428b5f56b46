//! JSON Lines request/response interface: one request object per input line,
//! one `{status, body}` response per output line, mirroring the HTTP status
//! contract of the payments API.

pub mod handler;
pub mod request;
pub mod response;
