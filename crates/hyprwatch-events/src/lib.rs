//! Event catalog and line decoder for the Hyprland event socket
//!
//! Hyprland publishes compositor events on its second IPC socket as
//! newline-terminated text lines:
//!
//! ```text
//! <event-name>>><field1>,<field2>,...,<fieldN>
//! ```
//!
//! This crate turns such lines into typed records.
//!
//! ## Architecture
//!
//! - [`Entity`]: subscriber categories (workspace, window, monitor) as bit flags
//! - [`EventCatalog`]: immutable registry of [`EventDescriptor`]s, one per wire name
//! - [`LineDecoder`]: splits a line, resolves the event and decodes its payload
//! - [`EntityFilter`]: decides whether a resolved event is forwarded
//!
//! ```text
//! raw line --> LineDecoder --(EventCatalog)--> EntityFilter --> DecodedEvent
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use hyprwatch_events::{EventCatalog, FieldValue, LineDecoder};
//!
//! let decoder = LineDecoder::new(Arc::new(EventCatalog::builtin()));
//! let event = decoder.decode("workspacev2>>3,web\n").unwrap();
//!
//! assert_eq!(event.event_name(), "workspacev2");
//! assert_eq!(event.get("workspace_id"), Some(&FieldValue::Int(3)));
//! ```

mod catalog;
mod decoder;
mod entity;
mod error;
mod field;
mod filter;

pub use catalog::{EventCatalog, EventDescriptor, BUILTIN_EVENTS};
pub use decoder::{split_line, DecodedEvent, LineDecoder, EVENT_DELIMITER, EVENT_NAME_KEY};
pub use entity::{belongs_to, Entity, UnknownEntity};
pub use error::{CatalogError, DecodeError};
pub use field::{FieldSpec, FieldType, FieldValue, ERROR_BOOL_MARKER, ERROR_INT_MARKER};
pub use filter::EntityFilter;
