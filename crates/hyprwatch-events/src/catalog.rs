//! Registry of known Hyprland events
//!
//! Each [`EventDescriptor`] keeps an event's wire name, its entity membership
//! and its payload schema together, so supporting a new compositor event is a
//! single new entry in [`BUILTIN_EVENTS`].

use std::collections::HashMap;

use crate::entity::Entity;
use crate::error::CatalogError;
use crate::field::FieldSpec;

/// Wire name, entity membership and ordered payload schema of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventDescriptor {
    name: &'static str,
    entity: Entity,
    fields: &'static [FieldSpec],
}

impl EventDescriptor {
    pub const fn new(name: &'static str, entity: Entity, fields: &'static [FieldSpec]) -> Self {
        Self {
            name,
            entity,
            fields,
        }
    }

    /// The wire identifier, e.g. `openwindow`
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn entity(&self) -> Entity {
        self.entity
    }

    /// Payload fields in wire order
    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }
}

const WORKSPACE_ID_NAME: &[FieldSpec] = &[
    FieldSpec::int("workspace_id"),
    FieldSpec::string("workspace_name"),
];

const WINDOW_ADDRESS: &[FieldSpec] = &[FieldSpec::string("window_address")];

/// The events understood out of the box
///
/// Wire and field names must match what Hyprland emits on socket2.
pub const BUILTIN_EVENTS: &[EventDescriptor] = &[
    // Workspace
    EventDescriptor::new("workspacev2", Entity::WORKSPACE, WORKSPACE_ID_NAME),
    EventDescriptor::new("createworkspacev2", Entity::WORKSPACE, WORKSPACE_ID_NAME),
    EventDescriptor::new("destroyworkspacev2", Entity::WORKSPACE, WORKSPACE_ID_NAME),
    EventDescriptor::new(
        "moveworkspacev2",
        Entity::WORKSPACE,
        &[
            FieldSpec::int("workspace_id"),
            FieldSpec::string("monitor_name"),
        ],
    ),
    // Window
    EventDescriptor::new("urgent", Entity::WINDOW, WINDOW_ADDRESS),
    EventDescriptor::new("activewindowv2", Entity::WINDOW, WINDOW_ADDRESS),
    EventDescriptor::new(
        "openwindow",
        Entity::WINDOW,
        &[
            FieldSpec::string("window_address"),
            FieldSpec::string("workspace_name"),
            FieldSpec::string("window_class"),
            FieldSpec::string("window_title"),
        ],
    ),
    EventDescriptor::new("closewindow", Entity::WINDOW, WINDOW_ADDRESS),
    EventDescriptor::new(
        "movewindowv2",
        Entity::WINDOW,
        &[
            FieldSpec::string("window_address"),
            FieldSpec::int("workspace_id"),
            FieldSpec::string("workspace_name"),
        ],
    ),
    EventDescriptor::new(
        "minimize",
        Entity::WINDOW,
        &[
            FieldSpec::string("window_address"),
            FieldSpec::bool("window_minimized"),
        ],
    ),
    EventDescriptor::new("windowtitle", Entity::WINDOW, WINDOW_ADDRESS),
    EventDescriptor::new(
        "fullscreen",
        Entity::WINDOW,
        &[FieldSpec::bool("window_fullscreened")],
    ),
    EventDescriptor::new(
        "changefloatingmode",
        Entity::WINDOW,
        &[
            FieldSpec::string("window_address"),
            FieldSpec::bool("window_floating"),
        ],
    ),
    EventDescriptor::new(
        "pin",
        Entity::WINDOW,
        &[
            FieldSpec::string("window_address"),
            FieldSpec::bool("window_pinned"),
        ],
    ),
    // Monitor
    EventDescriptor::new(
        "focusedmon",
        Entity::MONITOR,
        &[
            FieldSpec::string("monitor_name"),
            FieldSpec::string("workspace_name"),
        ],
    ),
    EventDescriptor::new(
        "monitoraddedv2",
        Entity::MONITOR,
        &[
            FieldSpec::string("monitor_id"),
            FieldSpec::string("monitor_name"),
            FieldSpec::string("monitor_description"),
        ],
    ),
    EventDescriptor::new(
        "monitorremoved",
        Entity::MONITOR,
        &[FieldSpec::string("monitor_name")],
    ),
];

/// Immutable, ordered set of event descriptors with exact-name lookup
///
/// Build it once at startup and share it (typically behind an `Arc`); it is
/// never mutated after construction.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<EventDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl EventCatalog {
    /// Build a catalog from an ordered descriptor list
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateEvent` if two descriptors share a name.
    pub fn new<I>(descriptors: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = EventDescriptor>,
    {
        let events: Vec<EventDescriptor> = descriptors.into_iter().collect();
        let mut index = HashMap::with_capacity(events.len());

        for (position, event) in events.iter().enumerate() {
            if index.insert(event.name(), position).is_some() {
                return Err(CatalogError::DuplicateEvent {
                    name: event.name().to_string(),
                });
            }
        }

        Ok(Self { events, index })
    }

    /// The catalog of [`BUILTIN_EVENTS`]
    pub fn builtin() -> Self {
        let events = BUILTIN_EVENTS.to_vec();
        let index = events
            .iter()
            .enumerate()
            .map(|(position, event)| (event.name(), position))
            .collect();
        Self { events, index }
    }

    /// Find the descriptor whose wire name equals `name` exactly
    ///
    /// Matching is case-sensitive with no normalization.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownEvent` when no descriptor matches.
    pub fn lookup(&self, name: &str) -> Result<&EventDescriptor, CatalogError> {
        self.index
            .get(name)
            .map(|&position| &self.events[position])
            .ok_or_else(|| CatalogError::UnknownEvent {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.events.iter()
    }

    /// Wire names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.events.iter().map(EventDescriptor::name)
    }

    /// Descriptors belonging to at least one category of `entity`
    pub fn for_entity(&self, entity: Entity) -> impl Iterator<Item = &EventDescriptor> {
        self.events
            .iter()
            .filter(move |event| event.entity().intersects(entity))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
