//! Wire codec for the control bus
//!
//! Bodies travel as EDN (`application/edn`). Every payload has an explicit
//! schema implementing [`EdnEncode`] and/or [`EdnDecode`], so malformed
//! documents are rejected here rather than deeper in the client.
//!
//! # Key convention
//!
//! All payloads use bare keywords:
//!
//! | Payload     | Document                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | credentials | `{:username "…" :password "…"}`                                 |
//! | descriptor  | `{:name "…" :description "…" :classpaths ["file:///…" …]}`      |
//! | auth reply  | `{:token "…"}`                                                  |
//!
//! `:name` is left out when the application has no name; `:description` is
//! always written and is `nil` when absent.

pub mod edn;
mod schema;

pub use edn::{Edn, EdnError, Keyword};
pub use schema::AuthResponse;

use thiserror::Error;

/// Media type sent as `Content-Type` and `Accept`
pub const EDN_MEDIA_TYPE: &str = "application/edn";

/// Errors raised at the codec boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed EDN document: {0}")]
    Syntax(#[from] EdnError),

    #[error("expected a map, found {found}")]
    NotAMap { found: &'static str },

    #[error("missing field {field}")]
    MissingField { field: String },

    #[error("field {field} must be {expected}, found {found}")]
    InvalidField {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A payload that can be written to the wire
pub trait EdnEncode {
    fn to_edn(&self) -> Edn;
}

/// A payload that can be read back from the wire
pub trait EdnDecode: Sized {
    fn from_edn(value: &Edn) -> Result<Self, CodecError>;
}

/// Encode a payload as an EDN document
pub fn encode<T: EdnEncode + ?Sized>(payload: &T) -> String {
    payload.to_edn().to_string()
}

/// Decode an EDN document into a payload
pub fn decode<T: EdnDecode>(body: &str) -> Result<T, CodecError> {
    let value = edn::parse(body)?;
    T::from_edn(&value)
}
