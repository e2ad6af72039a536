/// Scenario 1: Identical Packet Across A Wire Id Change
///
/// A packet defined identically in versions 1..=3 forms one group even
/// though its wire id moved from 0x01 to 0x02 in version 3.
mod common;

use common::{corpus_of, versions, DocBuilder};
use serde_json::json;
use wiregroup_core::model::{Direction, PacketSlot, ProtocolVersion, Slot, WireId};
use wiregroup_core::{build_manifest, deduplicate, group_slot, EquivalenceChecker};

fn doc(id: &str, marker: u32) -> wiregroup_core::SpecDocument {
    DocBuilder::new()
        .global_type("marker", json!(marker))
        .packet(
            "toServer",
            "handshaking",
            "set_protocol",
            id,
            json!(["container", [{"name": "protocolVersion", "type": "varint"}]]),
        )
        .build()
}

#[test]
fn test_scenario_01_one_group_two_buckets() {
    // GIVEN versions 1..=3 defining P identically, id 0x01 in {1,2} and 0x02 in {3}
    let corpus = corpus_of(vec![(1, doc("0x01", 1)), (2, doc("0x01", 2)), (3, doc("0x02", 3))]);
    let slot = Slot::Packet(PacketSlot::new(Direction::C2S, "handshaking", "set_protocol"));

    // WHEN grouping the slot
    let checker = EquivalenceChecker::new(&corpus, &[]);
    let result = group_slot(&corpus, &checker, &slot).expect("grouping succeeds");

    // THEN there is one group with representative 1
    assert_eq!(result.groups.len(), 1);
    let group = &result.groups[0];
    assert_eq!(group.representative(), ProtocolVersion(1));

    // AND buckets {0x01: [1,2], 0x02: [3]}
    assert_eq!(group.buckets().len(), 2);
    assert_eq!(group.buckets()[&Some(WireId(0x01))], versions(&[1, 2]));
    assert_eq!(group.buckets()[&Some(WireId(0x02))], versions(&[3]));
}

#[test]
fn test_scenario_01_manifest_lists_buckets_by_wire_id() {
    // GIVEN the same corpus run through deduplication
    let corpus = corpus_of(vec![(1, doc("0x01", 1)), (2, doc("0x01", 2)), (3, doc("0x02", 3))]);
    let dedup = deduplicate(&corpus, ProtocolVersion(1), None).unwrap();
    let slot = Slot::Packet(PacketSlot::new(Direction::C2S, "handshaking", "set_protocol"));
    let checker = EquivalenceChecker::new(&dedup.corpus, &[]);
    let groups = group_slot(&dedup.corpus, &checker, &slot).unwrap();

    // WHEN building and rendering the manifest
    let manifest = build_manifest(&dedup, &[groups]).unwrap();
    let text = wiregroup_core::render_manifest(&manifest).unwrap();

    // THEN the packet table is keyed by representative then decimal wire id
    let parsed: toml::Table = toml::from_str(&text).unwrap();
    let table = &parsed["c2s"]["handshaking"]["set_protocol"]["1"];
    assert_eq!(table["1"].as_array().unwrap().len(), 2);
    assert_eq!(table["2"].as_array().unwrap().len(), 1);
}
