//! Deterministic TOML rendering.
//!
//! TOML has no integer map keys, so versions and wire ids are written as
//! decimal string keys. They are emitted in numeric order, never in string
//! order, which keeps `5` ahead of `47`.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::errors::{Result, WireGroupError};
use crate::manifest::model::Manifest;
use crate::model::{Slot, TypeScope};

/// Leading comment of every rendered manifest
pub const MANIFEST_HEADER: &str = "# AUTOMATICALLY GENERATED. DO NOT EDIT BY HAND.\n\n";

/// Map with integer keys serialized as decimal strings in numeric order
struct NumericKeys<V>(BTreeMap<u32, V>);

impl<V: Serialize> Serialize for NumericKeys<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// Representative → versions (types)
type TypeGroups = NumericKeys<Vec<u32>>;
/// Representative → wire id → versions (packets)
type PacketGroups = NumericKeys<NumericKeys<Vec<u32>>>;

/// `[type]` subtree: common types at the top, scoped ones under direction and state
#[derive(serde::Serialize)]
#[serde(untagged)]
enum TypeNode {
    Groups(TypeGroups),
    Nested(BTreeMap<String, TypeNode>),
}

struct Document {
    versions: Vec<u32>,
    version_aliases: NumericKeys<u32>,
    types: BTreeMap<String, TypeNode>,
    packets: BTreeMap<String, BTreeMap<String, BTreeMap<String, PacketGroups>>>,
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("versions", &self.versions)?;
        map.serialize_entry("version_aliases", &self.version_aliases)?;
        map.serialize_entry("type", &self.types)?;
        for (direction, states) in &self.packets {
            map.serialize_entry(direction, states)?;
        }
        map.end()
    }
}

/// Render a manifest as TOML text
///
/// Identical manifests render to byte-identical text.
///
/// # Errors
///
/// - `Internal` when a packet bucket has no wire id
/// - `Serialization` when TOML serialization fails
pub fn render_manifest(manifest: &Manifest) -> Result<String> {
    let mut doc = Document {
        versions: manifest.versions.iter().map(|v| v.get()).collect(),
        version_aliases: NumericKeys(
            manifest
                .version_aliases
                .iter()
                .map(|(a, t)| (a.get(), t.get()))
                .collect(),
        ),
        types: BTreeMap::new(),
        packets: BTreeMap::new(),
    };

    for (slot, groups) in &manifest.slots {
        match slot {
            Slot::Type(ty) => {
                let table = NumericKeys(
                    groups
                        .iter()
                        .map(|g| {
                            let versions = g.versions().into_iter().map(|v| v.get()).collect();
                            (g.representative.get(), versions)
                        })
                        .collect(),
                );
                match &ty.scope {
                    TypeScope::Common => {
                        doc.types.insert(ty.name.clone(), TypeNode::Groups(table));
                    }
                    TypeScope::Scoped { direction, state } => {
                        let by_state = nested(&mut doc.types, direction.as_str())?;
                        let by_name = nested(by_state, state)?;
                        by_name.insert(ty.name.clone(), TypeNode::Groups(table));
                    }
                }
            }
            Slot::Packet(packet) => {
                let mut table = BTreeMap::new();
                for group in groups {
                    let mut buckets = BTreeMap::new();
                    for (wire_id, versions) in &group.buckets {
                        let wire_id = wire_id.ok_or_else(|| WireGroupError::Internal {
                            message: format!("packet slot {} has a bucket without wire id", packet.label()),
                        })?;
                        buckets.insert(wire_id.get(), versions.iter().map(|v| v.get()).collect());
                    }
                    table.insert(group.representative.get(), NumericKeys(buckets));
                }
                doc.packets
                    .entry(packet.direction.as_str().to_string())
                    .or_default()
                    .entry(packet.state.clone())
                    .or_default()
                    .insert(packet.packet.clone(), NumericKeys(table));
            }
        }
    }

    let body = toml::to_string(&doc)?;
    Ok(format!("{}{}", MANIFEST_HEADER, body))
}

fn nested<'m>(
    parent: &'m mut BTreeMap<String, TypeNode>,
    key: &str,
) -> Result<&'m mut BTreeMap<String, TypeNode>> {
    let node = parent
        .entry(key.to_string())
        .or_insert_with(|| TypeNode::Nested(BTreeMap::new()));
    match node {
        TypeNode::Nested(children) => Ok(children),
        TypeNode::Groups(_) => Err(WireGroupError::Internal {
            message: format!("type table {} is both a type and a scope", key),
        }),
    }
}
