//! Slot registry
//!
//! A slot is one tracked unit of the manifest: a packet in a given
//! direction and state, or a shared type. Slots are declared by the
//! operator and resolved once into a sorted, duplicate-free registry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::errors::{Result, WireGroupError};
use crate::naming::{normalize_key, snake_to_pascal_case};

/// Operator-declared (direction, state, packet) triple
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PacketSlot {
    pub direction: Direction,
    pub state: String,
    pub packet: String,
}

impl PacketSlot {
    pub fn new(direction: Direction, state: impl Into<String>, packet: impl Into<String>) -> Self {
        Self {
            direction,
            state: state.into(),
            packet: packet.into(),
        }
    }

    /// Dotted label, e.g. `c2s.handshaking.set_protocol`
    pub fn label(&self) -> String {
        format!("{}.{}.{}", self.direction, self.state, self.packet)
    }
}

/// Where a shared type is resolved
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeScope {
    /// Document-global `types` section
    Common,
    /// A direction/state `types` section, falling back to the global one
    Scoped { direction: Direction, state: String },
}

/// Operator-declared shared type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeSlot {
    pub scope: TypeScope,
    pub name: String,
}

impl TypeSlot {
    pub fn common(name: impl Into<String>) -> Self {
        Self {
            scope: TypeScope::Common,
            name: name.into(),
        }
    }

    pub fn scoped(direction: Direction, state: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: TypeScope::Scoped {
                direction,
                state: state.into(),
            },
            name: name.into(),
        }
    }

    /// Parse a dotted type path: `name` or `direction.state.name`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTypePath` for any other segment count, for empty
    /// segments, or for a common type named like a direction (its manifest
    /// table would collide with the scoped tables). Returns
    /// `UnknownDirection` when the first of three segments is not a
    /// direction.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || WireGroupError::InvalidTypePath {
            path: path.to_string(),
        };
        let segments: Vec<&str> = path.trim().split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }

        match segments.as_slice() {
            [name] => {
                if Direction::parse(name).is_ok() {
                    return Err(invalid());
                }
                Ok(Self::common(*name))
            }
            [direction, state, name] => {
                Ok(Self::scoped(Direction::parse(direction)?, *state, *name))
            }
            _ => Err(invalid()),
        }
    }

    /// Dotted path, e.g. `tags` or `s2c.play.spawn_info`
    pub fn path(&self) -> String {
        match &self.scope {
            TypeScope::Common => self.name.clone(),
            TypeScope::Scoped { direction, state } => {
                format!("{}.{}.{}", direction, state, self.name)
            }
        }
    }

    pub fn pascal_name(&self) -> String {
        snake_to_pascal_case(&self.name)
    }

    /// Names under which a subtree may reference this type
    pub fn reference_names(&self) -> [String; 2] {
        [self.name.clone(), self.pascal_name()]
    }

    /// Dotted label, e.g. `type.tags`
    pub fn label(&self) -> String {
        format!("type.{}", self.path())
    }
}

/// A tracked manifest unit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    Packet(PacketSlot),
    Type(TypeSlot),
}

impl Slot {
    /// Human-readable label used in logs and errors
    pub fn label(&self) -> String {
        match self {
            Slot::Packet(p) => p.label(),
            Slot::Type(t) => t.label(),
        }
    }

    /// Case-insensitive identity key
    pub fn key(&self) -> String {
        normalize_key(&self.label())
    }

    /// Name passed to the generator: packet name or type name
    pub fn name(&self) -> &str {
        match self {
            Slot::Packet(p) => &p.packet,
            Slot::Type(t) => &t.name,
        }
    }

    pub fn as_packet(&self) -> Option<&PacketSlot> {
        match self {
            Slot::Packet(p) => Some(p),
            Slot::Type(_) => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeSlot> {
        match self {
            Slot::Type(t) => Some(t),
            Slot::Packet(_) => None,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Validated, sorted set of slots
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
    types: Vec<TypeSlot>,
}

impl SlotRegistry {
    /// Build a registry from declared slots
    ///
    /// # Errors
    ///
    /// - `DuplicateSlot` when two slots share a normalized key
    /// - `InvalidConfig` when a state or name is empty
    pub fn new(slots: Vec<Slot>) -> Result<Self> {
        let mut seen = HashSet::new();
        for slot in &slots {
            let has_empty = match slot {
                Slot::Packet(p) => p.state.trim().is_empty() || p.packet.trim().is_empty(),
                Slot::Type(t) => {
                    t.name.trim().is_empty()
                        || matches!(&t.scope, TypeScope::Scoped { state, .. } if state.trim().is_empty())
                }
            };
            if has_empty {
                return Err(WireGroupError::InvalidConfig {
                    reason: format!("slot {} has an empty segment", slot.label()),
                });
            }
            if !seen.insert(slot.key()) {
                return Err(WireGroupError::DuplicateSlot { slot: slot.label() });
            }
        }

        let mut slots = slots;
        slots.sort();
        let types = slots.iter().filter_map(Slot::as_type).cloned().collect();

        Ok(Self { slots, types })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Tracked shared types, consulted by the equivalence checker
    pub fn types(&self) -> &[TypeSlot] {
        &self.types
    }

    pub fn packets(&self) -> impl Iterator<Item = &PacketSlot> {
        self.slots.iter().filter_map(Slot::as_packet)
    }

    /// Whether a packet is tracked (case-insensitive)
    pub fn tracks_packet(&self, direction: Direction, state: &str, packet: &str) -> bool {
        let key = normalize_key(&PacketSlot::new(direction, state, packet).label());
        self.packets()
            .any(|p| normalize_key(&p.label()) == key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_type() {
        let ty = TypeSlot::parse("tags").unwrap();
        assert_eq!(ty.scope, TypeScope::Common);
        assert_eq!(ty.path(), "tags");
        assert_eq!(ty.label(), "type.tags");
    }

    #[test]
    fn test_parse_scoped_type() {
        let ty = TypeSlot::parse("s2c.play.spawn_info").unwrap();
        assert_eq!(
            ty.scope,
            TypeScope::Scoped {
                direction: Direction::S2C,
                state: "play".to_string()
            }
        );
        assert_eq!(ty.path(), "s2c.play.spawn_info");
        assert_eq!(ty.reference_names(), ["spawn_info".to_string(), "SpawnInfo".to_string()]);
    }

    #[test]
    fn test_parse_type_path_rejects_bad_shapes() {
        for path in ["a.b", "a.b.c.d", "", "s2c..x", "c2s"] {
            assert!(
                matches!(
                    TypeSlot::parse(path),
                    Err(WireGroupError::InvalidTypePath { .. })
                ),
                "expected {path:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_type_path_rejects_unknown_direction() {
        let err = TypeSlot::parse("up.play.x").unwrap_err();
        assert!(matches!(err, WireGroupError::UnknownDirection { .. }));
    }

    #[test]
    fn test_registry_rejects_case_insensitive_duplicates() {
        // Given two packet slots differing only in case
        let slots = vec![
            Slot::Packet(PacketSlot::new(Direction::C2S, "play", "chat")),
            Slot::Packet(PacketSlot::new(Direction::C2S, "Play", "CHAT")),
        ];

        // When building the registry
        let result = SlotRegistry::new(slots);

        // Then it fails with DuplicateSlot
        assert!(matches!(result, Err(WireGroupError::DuplicateSlot { .. })));
    }

    #[test]
    fn test_registry_sorts_slots() {
        let registry = SlotRegistry::new(vec![
            Slot::Packet(PacketSlot::new(Direction::S2C, "login", "success")),
            Slot::Type(TypeSlot::common("tags")),
            Slot::Packet(PacketSlot::new(Direction::C2S, "handshaking", "set_protocol")),
        ])
        .unwrap();

        let labels: Vec<String> = registry.slots().iter().map(Slot::label).collect();
        assert_eq!(
            labels,
            vec![
                "c2s.handshaking.set_protocol",
                "s2c.login.success",
                "type.tags"
            ]
        );
        assert_eq!(registry.types().len(), 1);
    }

    #[test]
    fn test_registry_rejects_empty_segments() {
        let result = SlotRegistry::new(vec![Slot::Packet(PacketSlot::new(
            Direction::C2S,
            "",
            "chat",
        ))]);
        assert!(matches!(result, Err(WireGroupError::InvalidConfig { .. })));
    }

    #[test]
    fn test_tracks_packet() {
        let registry = SlotRegistry::new(vec![Slot::Packet(PacketSlot::new(
            Direction::C2S,
            "status",
            "ping_start",
        ))])
        .unwrap();

        assert!(registry.tracks_packet(Direction::C2S, "status", "ping_start"));
        assert!(!registry.tracks_packet(Direction::S2C, "status", "ping_start"));
    }
}
