//! Equivalence grouping engine
//!
//! Partitions the versions defining one slot into groups of mutually
//! equivalent versions. Each group remembers which wire id every member
//! used, so a packet that only moved ids still shares one implementation.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::accessor::SpecView;
use crate::equivalence::Equivalence;
use crate::errors::{Result, WireGroupError};
use crate::model::{ProtocolVersion, Slot, VersionCorpus, WireId};
use crate::{log_op_end, log_op_error, log_op_start};

/// A maximal set of mutually equivalent versions of one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceGroup {
    representative: ProtocolVersion,
    buckets: BTreeMap<Option<WireId>, Vec<ProtocolVersion>>,
}

impl EquivalenceGroup {
    fn open(representative: ProtocolVersion, wire_id: Option<WireId>) -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(wire_id, vec![representative]);
        Self {
            representative,
            buckets,
        }
    }

    fn add(&mut self, wire_id: Option<WireId>, version: ProtocolVersion) {
        self.buckets.entry(wire_id).or_default().push(version);
    }

    /// The earliest member
    pub fn representative(&self) -> ProtocolVersion {
        self.representative
    }

    /// Members keyed by wire id; type slots have a single `None` bucket
    pub fn buckets(&self) -> &BTreeMap<Option<WireId>, Vec<ProtocolVersion>> {
        &self.buckets
    }

    /// All members, ascending
    pub fn members(&self) -> Vec<ProtocolVersion> {
        let mut members: Vec<_> = self.buckets.values().flatten().copied().collect();
        members.sort();
        members
    }

    pub fn contains(&self, version: ProtocolVersion) -> bool {
        self.buckets.values().any(|b| b.contains(&version))
    }
}

/// All groups of one slot, in creation order (ascending representative)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroups {
    pub slot: Slot,
    pub groups: Vec<EquivalenceGroup>,
}

/// Group every version of `corpus` that defines `slot`
///
/// # Errors
///
/// - Corpus inconsistencies from the accessor
/// - `TypeCycle` from the equivalence checker
/// - `AmbiguousGroup` when a version matches two group representatives
pub fn group_slot<E: Equivalence + ?Sized>(
    corpus: &VersionCorpus,
    checker: &E,
    slot: &Slot,
) -> Result<SlotGroups> {
    let label = slot.label();
    log_op_start!("group_slot", slot = %label);
    let start = std::time::Instant::now();

    let result = group_slot_impl(corpus, checker, slot).map_err(|e| {
        log_op_error!(
            "group_slot",
            e,
            duration_ms = start.elapsed().as_millis() as u64,
            slot = %label
        );
        e
    })?;

    log_op_end!(
        "group_slot",
        duration_ms = start.elapsed().as_millis() as u64,
        slot = %label,
        group_count = result.groups.len()
    );

    Ok(result)
}

fn group_slot_impl<E: Equivalence + ?Sized>(
    corpus: &VersionCorpus,
    checker: &E,
    slot: &Slot,
) -> Result<SlotGroups> {
    let mut groups: Vec<EquivalenceGroup> = Vec::new();
    // Representative subtrees, parallel to `groups`
    let mut heads: Vec<&Value> = Vec::new();

    for (version, doc) in corpus.iter() {
        let view = SpecView::new(version, doc);
        let Some(spec) = view.slot_spec(slot)? else {
            continue;
        };
        let wire_id = view.slot_wire_id(slot)?;

        let mut matched: Option<usize> = None;
        for (index, group) in groups.iter().enumerate() {
            if !checker.equivalent(group.representative, heads[index], version, spec)? {
                continue;
            }
            match matched {
                None => matched = Some(index),
                Some(first) => {
                    return Err(WireGroupError::AmbiguousGroup {
                        slot: slot.label(),
                        version: version.get(),
                        first: groups[first].representative.get(),
                        second: group.representative.get(),
                    });
                }
            }
        }

        match matched {
            Some(index) => groups[index].add(wire_id, version),
            None => {
                tracing::debug!(
                    slot = %slot,
                    representative = version.get(),
                    wire_id = ?wire_id,
                    "new group"
                );
                groups.push(EquivalenceGroup::open(version, wire_id));
                heads.push(spec);
            }
        }
    }

    Ok(SlotGroups {
        slot: slot.clone(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalence::EquivalenceChecker;
    use crate::model::{Direction, PacketSlot, SpecDocument, TypeSlot};
    use serde_json::json;

    fn packet_doc(id: &str, body: Value) -> Value {
        json!({
            "types": {"tags": "string"},
            "play": {"toServer": {"types": {
                "packet_chat": body,
                "packet": ["container", [
                    {"name": "name", "type": ["mapper", {"type": "varint", "mappings": {id: "chat"}}]},
                    {"name": "params", "type": ["switch", {"compareTo": "name", "fields": {"chat": "packet_chat"}}]}
                ]]
            }}}
        })
    }

    fn chat_slot() -> Slot {
        Slot::Packet(PacketSlot::new(Direction::C2S, "play", "chat"))
    }

    fn corpus(entries: Vec<(u32, Value)>) -> VersionCorpus {
        entries
            .into_iter()
            .map(|(v, d)| (ProtocolVersion(v), SpecDocument::new(d)))
            .collect()
    }

    #[test]
    fn test_wire_id_change_stays_in_one_group() {
        // Given chat defined identically in 1..=3, with id 0x01 then 0x02
        let body = json!(["container", [{"name": "message", "type": "string"}]]);
        let corpus = corpus(vec![
            (1, packet_doc("0x01", body.clone())),
            (2, packet_doc("0x01", body.clone())),
            (3, packet_doc("0x02", body)),
        ]);
        let checker = EquivalenceChecker::new(&corpus, &[]);

        // When grouping
        let result = group_slot(&corpus, &checker, &chat_slot()).unwrap();

        // Then there is one group with two buckets
        assert_eq!(result.groups.len(), 1);
        let group = &result.groups[0];
        assert_eq!(group.representative(), ProtocolVersion(1));
        assert_eq!(
            group.buckets().get(&Some(WireId(1))),
            Some(&vec![ProtocolVersion(1), ProtocolVersion(2)])
        );
        assert_eq!(
            group.buckets().get(&Some(WireId(2))),
            Some(&vec![ProtocolVersion(3)])
        );
    }

    #[test]
    fn test_reverted_definition_rejoins_first_group() {
        let a = json!(["container", [{"name": "a", "type": "string"}]]);
        let b = json!(["container", [{"name": "b", "type": "string"}]]);
        let corpus = corpus(vec![
            (1, packet_doc("0x01", a.clone())),
            (2, packet_doc("0x01", b)),
            (3, packet_doc("0x01", a)),
        ]);
        let checker = EquivalenceChecker::new(&corpus, &[]);

        let result = group_slot(&corpus, &checker, &chat_slot()).unwrap();

        assert_eq!(result.groups.len(), 2);
        assert_eq!(
            result.groups[0].members(),
            vec![ProtocolVersion(1), ProtocolVersion(3)]
        );
        assert_eq!(result.groups[1].representative(), ProtocolVersion(2));
    }

    #[test]
    fn test_versions_without_slot_are_skipped() {
        let body = json!(["container", []]);
        let corpus = corpus(vec![
            (1, json!({"types": {}})),
            (2, packet_doc("0x05", body)),
        ]);
        let checker = EquivalenceChecker::new(&corpus, &[]);

        let result = group_slot(&corpus, &checker, &chat_slot()).unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].representative(), ProtocolVersion(2));
        assert!(!result.groups[0].contains(ProtocolVersion(1)));
    }

    #[test]
    fn test_type_slot_has_single_unkeyed_bucket() {
        let corpus = corpus(vec![
            (1, json!({"types": {"tags": "string"}})),
            (2, json!({"types": {"tags": "string"}, "other": 1})),
        ]);
        let types = [TypeSlot::common("tags")];
        let checker = EquivalenceChecker::new(&corpus, &types);
        let slot = Slot::Type(TypeSlot::common("tags"));

        let result = group_slot(&corpus, &checker, &slot).unwrap();

        assert_eq!(result.groups.len(), 1);
        let buckets = result.groups[0].buckets();
        assert_eq!(buckets.len(), 1);
        assert_eq!(
            buckets.get(&None),
            Some(&vec![ProtocolVersion(1), ProtocolVersion(2)])
        );
    }

    #[test]
    fn test_type_presence_splits_groups() {
        // Given a packet whose referenced type disappears in version 3
        let packet = json!({"type": "tags"});
        let corpus = corpus(vec![
            (1, packet_doc("0x01", packet.clone())),
            (2, packet_doc("0x01", packet.clone())),
            (3, {
                let mut doc = packet_doc("0x01", packet);
                doc["types"] = json!({});
                doc
            }),
        ]);
        let types = [TypeSlot::common("tags")];
        let checker = EquivalenceChecker::new(&corpus, &types);

        // When grouping
        let groups = group_slot(&corpus, &checker, &chat_slot()).unwrap().groups;

        // Then version 3 opens its own group
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].representative(), ProtocolVersion(3));
    }

    /// Non-transitive relation: versions at least two apart are equivalent
    struct FarApart;

    impl Equivalence for FarApart {
        fn equivalent(
            &self,
            v1: ProtocolVersion,
            _spec1: &Value,
            v2: ProtocolVersion,
            _spec2: &Value,
        ) -> Result<bool> {
            Ok(v1.get().abs_diff(v2.get()) >= 2)
        }
    }

    #[test]
    fn test_ambiguous_match_fails_slot() {
        // Given 1 and 2 in separate groups and 4 matching both
        let body = json!(["container", []]);
        let corpus = corpus(vec![
            (1, packet_doc("0x01", body.clone())),
            (2, packet_doc("0x01", body.clone())),
            (4, packet_doc("0x01", body)),
        ]);

        // When grouping
        let err = group_slot(&corpus, &FarApart, &chat_slot()).unwrap_err();

        // Then the slot fails naming both representatives
        assert_eq!(
            err,
            WireGroupError::AmbiguousGroup {
                slot: "c2s.play.chat".into(),
                version: 4,
                first: 1,
                second: 2,
            }
        );
    }
}
