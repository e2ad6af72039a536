use std::collections::BTreeMap;

use crate::model::{AliasTable, ProtocolVersion, Slot, WireId};

/// One group of a slot, alias-expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestGroup {
    /// Earliest member; the only version an artifact is generated for
    pub representative: ProtocolVersion,
    /// Wire id → versions using it, sorted ascending
    pub buckets: BTreeMap<Option<WireId>, Vec<ProtocolVersion>>,
}

impl ManifestGroup {
    /// Every version of the group, aliases included, ascending
    pub fn versions(&self) -> Vec<ProtocolVersion> {
        let mut all: Vec<_> = self.buckets.values().flatten().copied().collect();
        all.sort();
        all.dedup();
        all
    }
}

/// The equivalence manifest of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Every considered version, aliases included, ascending
    pub versions: Vec<ProtocolVersion>,
    pub version_aliases: AliasTable,
    /// Per slot groups ordered by representative
    pub slots: BTreeMap<Slot, Vec<ManifestGroup>>,
}

impl Manifest {
    pub fn groups(&self, slot: &Slot) -> Option<&[ManifestGroup]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    /// Union of all bucket versions of a slot, ascending
    pub fn slot_versions(&self, slot: &Slot) -> Vec<ProtocolVersion> {
        let mut all: Vec<_> = self
            .groups(slot)
            .unwrap_or_default()
            .iter()
            .flat_map(ManifestGroup::versions)
            .collect();
        all.sort();
        all
    }

    pub fn group_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }
}
