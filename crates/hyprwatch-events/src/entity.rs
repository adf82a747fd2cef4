//! Subscriber categories for compositor events
//!
//! An [`Entity`] is a small bit set over the closed category enumeration
//! {workspace, window, monitor}. Events carry an entity value naming the
//! categories they belong to, subscribers carry one naming the categories they
//! want, and membership is a non-zero intersection.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::catalog::EventDescriptor;

/// Bit set of subscriber categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Entity(u8);

impl Entity {
    /// Matches nothing
    pub const NONE: Self = Self(0);
    pub const WORKSPACE: Self = Self(1 << 0);
    pub const WINDOW: Self = Self(1 << 1);
    pub const MONITOR: Self = Self(1 << 2);
    /// Every known category
    pub const ALL: Self = Self(Self::WORKSPACE.0 | Self::WINDOW.0 | Self::MONITOR.0);

    /// The single-category values, in display order
    pub const BASE: [Self; 3] = [Self::WORKSPACE, Self::WINDOW, Self::MONITOR];

    /// Raw bit representation
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Union of two entity sets, usable in `const` context
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether the two sets share at least one category
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether every category of `other` is also in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the base categories contained in this set
    pub fn iter(self) -> impl Iterator<Item = Entity> {
        Self::BASE.into_iter().filter(move |e| self.contains(*e))
    }

    /// Canonical name of a single category, `None` for unions and `NONE`
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0b001 => Some("workspace"),
            0b010 => Some("window"),
            0b100 => Some("monitor"),
            _ => None,
        }
    }
}

/// Returns true iff `event` belongs to at least one category in `filter`
///
/// `Entity::NONE` as a filter matches nothing.
pub fn belongs_to(event: &EventDescriptor, filter: Entity) -> bool {
    event.entity().intersects(filter)
}

impl BitOr for Entity {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Entity {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl FromIterator<Entity> for Entity {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::union)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }

        let mut first = true;
        for entity in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            first = false;
            // base entities always have a name
            f.write_str(entity.name().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Returned when parsing an entity name that is not in the category set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity {0:?} (expected workspace, window, monitor, all or none)")]
pub struct UnknownEntity(pub String);

impl FromStr for Entity {
    type Err = UnknownEntity;

    /// Accepts singular and plural category names, `all`, `none`, and
    /// `|`-joined unions as produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(Self::NONE);
        }

        s.split('|')
            .map(|token| match token.to_lowercase().as_str() {
                "workspace" | "workspaces" => Ok(Self::WORKSPACE),
                "window" | "windows" => Ok(Self::WINDOW),
                "monitor" | "monitors" => Ok(Self::MONITOR),
                "all" => Ok(Self::ALL),
                _ => Err(UnknownEntity(s.to_string())),
            })
            .collect()
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_intersection() {
        let set = Entity::WORKSPACE | Entity::WINDOW;
        assert!(set.intersects(Entity::WINDOW));
        assert!(set.intersects(Entity::WORKSPACE));
        assert!(!set.intersects(Entity::MONITOR));
        assert!(set.intersects(Entity::MONITOR | Entity::WINDOW));
    }

    #[test]
    fn test_none_matches_nothing() {
        for entity in Entity::BASE {
            assert!(!Entity::NONE.intersects(entity));
            assert!(!entity.intersects(Entity::NONE));
        }
        assert!(!Entity::NONE.intersects(Entity::ALL));
    }

    #[test]
    fn test_all_contains_every_base_entity() {
        for entity in Entity::BASE {
            assert!(Entity::ALL.contains(entity));
        }
        assert_eq!(Entity::ALL.iter().count(), 3);
        assert_eq!(Entity::BASE.into_iter().collect::<Entity>(), Entity::ALL);
    }

    #[test]
    fn test_base_entities_are_distinct_single_bits() {
        for entity in Entity::BASE {
            assert_eq!(entity.bits().count_ones(), 1);
        }
    }

    #[test]
    fn test_bitor_assign() {
        let mut set = Entity::NONE;
        set |= Entity::MONITOR;
        assert_eq!(set, Entity::MONITOR);
        set |= Entity::WINDOW;
        assert_eq!(set, Entity::MONITOR | Entity::WINDOW);
    }

    #[test]
    fn test_parse_entity_names() {
        assert_eq!("workspace".parse::<Entity>().unwrap(), Entity::WORKSPACE);
        assert_eq!("windows".parse::<Entity>().unwrap(), Entity::WINDOW);
        assert_eq!("Monitor".parse::<Entity>().unwrap(), Entity::MONITOR);
        assert_eq!("all".parse::<Entity>().unwrap(), Entity::ALL);

        assert_eq!("none".parse::<Entity>().unwrap(), Entity::NONE);
        assert_eq!(
            "window|monitor".parse::<Entity>().unwrap(),
            Entity::WINDOW | Entity::MONITOR
        );

        let err = "layer".parse::<Entity>().unwrap_err();
        assert_eq!(err, UnknownEntity("layer".to_string()));

        assert!("window|".parse::<Entity>().is_err());
        assert!("none|window".parse::<Entity>().is_err());
        assert!("".parse::<Entity>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let values = [
            Entity::NONE,
            Entity::WORKSPACE,
            Entity::WINDOW,
            Entity::MONITOR,
            Entity::WORKSPACE | Entity::MONITOR,
            Entity::ALL,
        ];

        for entity in values {
            assert_eq!(entity.to_string().parse::<Entity>().unwrap(), entity);
        }
    }

    #[test]
    fn test_serialize_as_display_string() {
        assert_eq!(
            serde_json::to_string(&(Entity::WORKSPACE | Entity::WINDOW)).unwrap(),
            "\"workspace|window\""
        );
        assert_eq!(serde_json::to_string(&Entity::NONE).unwrap(), "\"none\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(Entity::WINDOW.to_string(), "window");
        assert_eq!(
            (Entity::MONITOR | Entity::WORKSPACE).to_string(),
            "workspace|monitor"
        );
        assert_eq!(Entity::NONE.to_string(), "none");
    }

    #[test]
    fn test_name_only_for_single_entities() {
        assert_eq!(Entity::WORKSPACE.name(), Some("workspace"));
        assert_eq!(Entity::ALL.name(), None);
        assert_eq!(Entity::NONE.name(), None);
    }
}
