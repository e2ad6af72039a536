//! Spec tree accessor
//!
//! Read-only lookups into one version's document. A direction's packet
//! table has the shape
//!
//! ```json
//! ["container", [
//!   {"name": "name", "type": ["mapper", {"type": "varint", "mappings": {"0x00": "set_protocol"}}]},
//!   {"name": "params", "type": ["switch", {"compareTo": "name", "fields": {"set_protocol": "packet_set_protocol"}}]}
//! ]]
//! ```
//!
//! The mapper assigns wire ids to packet names, the switch routes each
//! name to the type that defines it.

use serde_json::{Map, Value};

use crate::errors::{Result, WireGroupError};
use crate::model::{Direction, ProtocolVersion, Slot, SpecDocument, TypeScope, TypeSlot, WireId};
use crate::naming::snake_to_pascal_case;

/// Parsed view of a direction's packet table
struct PacketTable<'a> {
    mappings: &'a Map<String, Value>,
    fields: &'a Map<String, Value>,
}

/// A document scoped to the version it belongs to
///
/// The version is only used to name the offending version in errors.
#[derive(Debug, Clone, Copy)]
pub struct SpecView<'a> {
    version: ProtocolVersion,
    doc: &'a SpecDocument,
}

impl<'a> SpecView<'a> {
    pub fn new(version: ProtocolVersion, doc: &'a SpecDocument) -> Self {
        Self { version, doc }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Definition subtree of a packet
    ///
    /// Returns `Ok(None)` when the state, the direction or the packet is
    /// absent from this version.
    ///
    /// # Errors
    ///
    /// - `UnresolvedPacket` when the packet is mapped but its definition
    ///   cannot be found in the direction-local or global types
    /// - `MalformedPacketTable` when the packet table is not shaped as a
    ///   mapper plus switch container
    pub fn packet_spec(
        &self,
        direction: Direction,
        state: &str,
        packet: &str,
    ) -> Result<Option<&'a Value>> {
        let Some(table) = self.packet_table(direction, state)? else {
            return Ok(None);
        };
        if !table.mappings.values().any(|v| v.as_str() == Some(packet)) {
            return Ok(None);
        }

        let unresolved = || WireGroupError::UnresolvedPacket {
            version: self.version.get(),
            direction: direction.to_string(),
            state: state.to_string(),
            packet: packet.to_string(),
        };

        match table.fields.get(packet) {
            Some(Value::String(type_name)) => self
                .local_types(direction, state)
                .and_then(|types| types.get(type_name))
                .or_else(|| self.doc.global_types().and_then(|types| types.get(type_name)))
                .map(Some)
                .ok_or_else(unresolved),
            // Inline definition in the switch
            Some(inline) => Ok(Some(inline)),
            None => Err(unresolved()),
        }
    }

    /// Wire id the direction's mapping assigns to a packet
    ///
    /// # Errors
    ///
    /// - `ConflictingWireId` when the name appears under two different ids
    /// - `MalformedWireId` when a key naming the packet is not hexadecimal
    /// - `MalformedPacketTable` as for [`SpecView::packet_spec`]
    pub fn packet_wire_id(
        &self,
        direction: Direction,
        state: &str,
        packet: &str,
    ) -> Result<Option<WireId>> {
        let Some(table) = self.packet_table(direction, state)? else {
            return Ok(None);
        };

        let mut found: Option<WireId> = None;
        for (key, name) in table.mappings {
            if name.as_str() != Some(packet) {
                continue;
            }
            let id = WireId::parse_hex(key).ok_or_else(|| WireGroupError::MalformedWireId {
                version: self.version.get(),
                direction: direction.to_string(),
                state: state.to_string(),
                key: key.clone(),
            })?;
            match found {
                Some(first) if first != id => {
                    let (first, second) = if first < id { (first, id) } else { (id, first) };
                    return Err(WireGroupError::ConflictingWireId {
                        version: self.version.get(),
                        direction: direction.to_string(),
                        state: state.to_string(),
                        packet: packet.to_string(),
                        first: first.get(),
                        second: second.get(),
                    });
                }
                _ => found = Some(id),
            }
        }

        Ok(found)
    }

    /// Every (wire id, packet name) pair of a direction, ordered by id
    ///
    /// # Errors
    ///
    /// Fails on malformed tables or keys, like [`SpecView::packet_wire_id`].
    pub fn packet_names(&self, direction: Direction, state: &str) -> Result<Vec<(WireId, String)>> {
        let Some(table) = self.packet_table(direction, state)? else {
            return Ok(Vec::new());
        };

        let mut names = Vec::with_capacity(table.mappings.len());
        for (key, name) in table.mappings {
            let id = WireId::parse_hex(key).ok_or_else(|| WireGroupError::MalformedWireId {
                version: self.version.get(),
                direction: direction.to_string(),
                state: state.to_string(),
                key: key.clone(),
            })?;
            if let Some(name) = name.as_str() {
                names.push((id, name.to_string()));
            }
        }
        names.sort();
        Ok(names)
    }

    /// Definition subtree of a shared type
    ///
    /// Scoped types are looked up in their direction/state section first,
    /// then in the global section. Within a section the exact name wins over
    /// its PascalCase form.
    pub fn type_spec(&self, ty: &TypeSlot) -> Option<&'a Value> {
        let pascal = snake_to_pascal_case(&ty.name);
        let lookup = |types: &'a Map<String, Value>| {
            types.get(&ty.name).or_else(|| types.get(&pascal))
        };

        let local = match &ty.scope {
            TypeScope::Common => None,
            TypeScope::Scoped { direction, state } => {
                self.local_types(*direction, state).and_then(lookup)
            }
        };
        local.or_else(|| self.doc.global_types().and_then(lookup))
    }

    /// Definition subtree of any slot
    ///
    /// # Errors
    ///
    /// Packet slots fail as [`SpecView::packet_spec`] does.
    pub fn slot_spec(&self, slot: &Slot) -> Result<Option<&'a Value>> {
        match slot {
            Slot::Packet(p) => self.packet_spec(p.direction, &p.state, &p.packet),
            Slot::Type(t) => Ok(self.type_spec(t)),
        }
    }

    /// Wire id of a packet slot; always `None` for type slots
    ///
    /// # Errors
    ///
    /// Packet slots fail as [`SpecView::packet_wire_id`] does.
    pub fn slot_wire_id(&self, slot: &Slot) -> Result<Option<WireId>> {
        match slot {
            Slot::Packet(p) => self.packet_wire_id(p.direction, &p.state, &p.packet),
            Slot::Type(_) => Ok(None),
        }
    }

    fn local_types(&self, direction: Direction, state: &str) -> Option<&'a Map<String, Value>> {
        self.doc
            .root()
            .get(state)?
            .get(direction.doc_key())?
            .get("types")?
            .as_object()
    }

    fn packet_table(&self, direction: Direction, state: &str) -> Result<Option<PacketTable<'a>>> {
        let Some(table) = self.local_types(direction, state).and_then(|t| t.get("packet")) else {
            return Ok(None);
        };

        let malformed = |reason: &str| WireGroupError::MalformedPacketTable {
            version: self.version.get(),
            direction: direction.to_string(),
            state: state.to_string(),
            reason: reason.to_string(),
        };

        let fields = table
            .get(1)
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("expected [\"container\", [...]]"))?;

        let mut mappings = None;
        let mut switch_fields = None;
        for field in fields {
            let Some(kind) = field.get("type").and_then(|t| t.get(0)).and_then(Value::as_str)
            else {
                continue;
            };
            let options = field.get("type").and_then(|t| t.get(1));
            match kind {
                "mapper" => mappings = options.and_then(|o| o.get("mappings")).and_then(Value::as_object),
                "switch" => switch_fields = options.and_then(|o| o.get("fields")).and_then(Value::as_object),
                _ => {}
            }
        }

        let mappings = mappings.ok_or_else(|| malformed("missing id mapper"))?;
        let fields = switch_fields.ok_or_else(|| malformed("missing name switch"))?;
        Ok(Some(PacketTable { mappings, fields }))
    }
}
