//! Subscription filter applied to resolved events

use std::collections::HashSet;

use crate::catalog::EventDescriptor;
use crate::entity::{belongs_to, Entity};

/// Decides which resolved events are forwarded to the sink
///
/// An event passes when it belongs to one of the subscribed entities and its
/// name is not on the ignore list.
///
/// # Example
///
/// ```
/// use hyprwatch_events::{Entity, EntityFilter, EventCatalog};
///
/// let catalog = EventCatalog::builtin();
/// let monitor_added = catalog.lookup("monitoraddedv2").unwrap();
///
/// let filter = EntityFilter::new(Entity::WORKSPACE | Entity::WINDOW);
/// assert!(!filter.should_forward(monitor_added));
///
/// let filter = EntityFilter::new(Entity::MONITOR);
/// assert!(filter.should_forward(monitor_added));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilter {
    subscribed: Entity,
    ignored: HashSet<String>,
}

impl EntityFilter {
    pub fn new(subscribed: Entity) -> Self {
        Self {
            subscribed,
            ignored: HashSet::new(),
        }
    }

    /// Filter forwarding every event
    pub fn all() -> Self {
        Self::new(Entity::ALL)
    }

    /// Never forward events with these wire names
    pub fn ignoring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn subscribed(&self) -> Entity {
        self.subscribed
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    /// Whether `descriptor` should reach the sink
    pub fn should_forward(&self, descriptor: &EventDescriptor) -> bool {
        belongs_to(descriptor, self.subscribed) && !self.is_ignored(descriptor.name())
    }
}
