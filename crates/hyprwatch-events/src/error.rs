//! Error types for catalog lookup and line decoding

use thiserror::Error;

/// Errors raised by [`EventCatalog`](crate::EventCatalog) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No descriptor carries this exact wire name
    #[error("unknown event {name:?}")]
    UnknownEvent { name: String },

    /// Two descriptors share the same wire name
    #[error("event {name:?} is registered more than once")]
    DuplicateEvent { name: String },
}

/// Errors that make a single protocol line undecodable
///
/// Both variants are local to one line. Callers are expected to skip the line
/// and keep reading; field conversion failures are not errors at all (see
/// [`FieldValue::Invalid`](crate::FieldValue::Invalid)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line has no `>>` delimiter between name and payload
    #[error("malformed event line (missing '>>'): {line:?}")]
    MalformedLine { line: String },

    /// The event name is not listed in the catalog
    ///
    /// Routine whenever Hyprland ships an event the catalog does not know yet.
    #[error("unsupported event {name:?}")]
    UnsupportedEvent { name: String },
}
