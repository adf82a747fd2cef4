//! Line decoder for the Hyprland event socket
//!
//! ## Protocol
//!
//! Hyprland writes one event per line on socket2:
//!
//! ```text
//! openwindow>>0x5581e2c0,1,firefox,Mozilla Firefox
//! ```
//!
//! The name is separated from the payload by the first `>>`, payload fields
//! are separated by `,`. There is no escaping, so a string field containing a
//! comma spills into the next position; that is how the protocol works and the
//! decoder keeps it that way.
//!
//! ## Partial decoding
//!
//! A payload is decoded best-effort against the event's schema:
//!
//! - surplus tokens are ignored
//! - missing tokens end the record early (the result is a schema prefix)
//! - a token that does not convert to its field's type is kept as
//!   `<raw>#ERROR_INT` / `<raw>#ERROR_BOOL` and decoding continues
//!
//! Only a missing delimiter or an unknown event name rejects a line.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::catalog::{EventCatalog, EventDescriptor};
use crate::entity::Entity;
use crate::error::DecodeError;
use crate::field::FieldValue;
use crate::filter::EntityFilter;

/// Separator between event name and payload
pub const EVENT_DELIMITER: &str = ">>";

/// Key of the synthetic first entry of every [`DecodedEvent`]
pub const EVENT_NAME_KEY: &str = "event_name";

const FIELD_SEPARATOR: char = ',';

/// Split a raw line into its name and payload segments
///
/// Splits at the first `>>`; trailing newlines are stripped from the payload.
///
/// # Errors
///
/// Returns `DecodeError::MalformedLine` if the line has no `>>`.
pub fn split_line(raw: &str) -> Result<(&str, &str), DecodeError> {
    let (name, payload) =
        raw.split_once(EVENT_DELIMITER)
            .ok_or_else(|| DecodeError::MalformedLine {
                line: raw.trim_end_matches('\n').to_string(),
            })?;

    Ok((name, payload.trim_end_matches('\n')))
}

/// One decoded protocol line
///
/// An ordered mapping from field name to value. The first entry is always
/// `event_name`, followed by the decoded payload fields in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    descriptor: EventDescriptor,
    entries: Vec<(&'static str, FieldValue)>,
}

impl DecodedEvent {
    /// Wire name of the event
    pub fn event_name(&self) -> &'static str {
        self.descriptor.name()
    }

    pub fn entity(&self) -> Entity {
        self.descriptor.entity()
    }

    /// Descriptor the payload was decoded against
    pub fn descriptor(&self) -> &EventDescriptor {
        &self.descriptor
    }

    /// Value of the entry named `name`, including `event_name`
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Number of entries, counting the synthetic `event_name`
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: `event_name` is present in every record
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of decoded payload fields
    pub fn field_count(&self) -> usize {
        self.entries.len() - 1
    }

    /// Whether any payload field failed type conversion
    pub fn has_invalid_fields(&self) -> bool {
        self.entries.iter().any(|(_, value)| value.is_invalid())
    }

    /// Entries in order, starting with `event_name`
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }
}

impl Serialize for DecodedEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl EventDescriptor {
    /// Decode a payload (without the `name>>` prefix) against this schema
    ///
    /// Never fails; see the module docs for how short, long and malformed
    /// payloads are handled. An empty payload is a single empty token.
    pub fn decode_payload(&self, payload: &str) -> DecodedEvent {
        let fields = self.fields();
        let mut entries = Vec::with_capacity(fields.len() + 1);
        entries.push((EVENT_NAME_KEY, FieldValue::Str(self.name().to_string())));

        for (spec, raw) in fields.iter().zip(payload.split(FIELD_SEPARATOR)) {
            let value = spec.ty().convert(raw);
            if value.is_invalid() {
                debug!(
                    event = self.name(),
                    field = spec.name(),
                    expected = %spec.ty(),
                    raw,
                    "field conversion failed"
                );
            }
            entries.push((spec.name(), value));
        }

        DecodedEvent {
            descriptor: *self,
            entries,
        }
    }
}

/// Turns raw socket2 lines into [`DecodedEvent`]s
///
/// Holds a shared reference to an immutable [`EventCatalog`]; cloning is cheap
/// and clones may decode concurrently.
#[derive(Debug, Clone)]
pub struct LineDecoder {
    catalog: Arc<EventCatalog>,
}

impl LineDecoder {
    pub fn new(catalog: Arc<EventCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Resolve an event name segment against the catalog
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::UnsupportedEvent` for names not in the catalog.
    pub fn resolve(&self, name: &str) -> Result<&EventDescriptor, DecodeError> {
        self.catalog
            .lookup(name)
            .map_err(|_| DecodeError::UnsupportedEvent {
                name: name.to_string(),
            })
    }

    /// Decode one raw line
    ///
    /// # Errors
    ///
    /// - `DecodeError::MalformedLine` if the line has no `>>` delimiter
    /// - `DecodeError::UnsupportedEvent` if the event name is unknown
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use hyprwatch_events::{DecodeError, EventCatalog, LineDecoder};
    ///
    /// let decoder = LineDecoder::new(Arc::new(EventCatalog::builtin()));
    /// let err = decoder.decode("bogusevent>>1,2\n").unwrap_err();
    /// assert!(matches!(err, DecodeError::UnsupportedEvent { .. }));
    /// ```
    pub fn decode(&self, raw: &str) -> Result<DecodedEvent, DecodeError> {
        let (name, payload) = split_line(raw)?;
        let descriptor = self.resolve(name)?;
        Ok(descriptor.decode_payload(payload))
    }

    /// Decode one raw line if its event passes `filter`
    ///
    /// The filter runs after the name is resolved and before the payload is
    /// decoded. Returns `Ok(None)` for events the filter rejects.
    ///
    /// # Errors
    ///
    /// Same as [`LineDecoder::decode`].
    pub fn decode_filtered(
        &self,
        raw: &str,
        filter: &EntityFilter,
    ) -> Result<Option<DecodedEvent>, DecodeError> {
        let (name, payload) = split_line(raw)?;
        let descriptor = self.resolve(name)?;

        if !filter.should_forward(descriptor) {
            return Ok(None);
        }

        Ok(Some(descriptor.decode_payload(payload)))
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(Arc::new(EventCatalog::builtin()))
    }
}
