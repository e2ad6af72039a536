//! Untracked packet report.
//!
//! Lists every packet that appears in the corpus but has no packet slot,
//! which is how an operator finds what is still unimplemented.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use wiregroup_core::errors::ExError;
use wiregroup_core::model::{Direction, ProtocolVersion, SlotRegistry, VersionCorpus, WireId};
use wiregroup_core::SpecView;
use wiregroup_core::{log_op_end, log_op_error, log_op_start};
use wiregroup_store::Result;

/// A packet no slot tracks, at the first version that defines it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntrackedPacket {
    pub direction: Direction,
    pub state: String,
    pub packet: String,
    pub first_version: ProtocolVersion,
    pub wire_id: WireId,
}

impl UntrackedPacket {
    pub fn label(&self) -> String {
        format!("{}.{}.{}", self.direction, self.state, self.packet)
    }
}

/// Every untracked packet, ordered by direction, state and name
///
/// # Errors
///
/// Fails with `CorpusInconsistency` when a packet table is malformed.
pub fn untracked_packets(
    corpus: &VersionCorpus,
    registry: &SlotRegistry,
) -> Result<Vec<UntrackedPacket>> {
    log_op_start!("untracked_packets", version_count = corpus.len());
    let start = Instant::now();

    let result = untracked_packets_impl(corpus, registry).map_err(|e| {
        log_op_error!(
            "untracked_packets",
            e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "untracked_packets",
        duration_ms = start.elapsed().as_millis() as u64,
        untracked = result.len()
    );

    Ok(result)
}

fn untracked_packets_impl(
    corpus: &VersionCorpus,
    registry: &SlotRegistry,
) -> Result<Vec<UntrackedPacket>> {
    let mut found: BTreeMap<(Direction, String, String), UntrackedPacket> = BTreeMap::new();

    for (version, doc) in corpus.iter() {
        let view = SpecView::new(version, doc);
        for state in doc.states() {
            for direction in Direction::ALL {
                let names = view
                    .packet_names(direction, state)
                    .map_err(|e| ExError::from(e).with_op("untracked_packets"))?;
                for (wire_id, packet) in names {
                    if registry.tracks_packet(direction, state, &packet) {
                        continue;
                    }
                    found
                        .entry((direction, state.to_string(), packet.clone()))
                        .or_insert_with(|| UntrackedPacket {
                            direction,
                            state: state.to_string(),
                            packet,
                            first_version: version,
                            wire_id,
                        });
                }
            }
        }
    }

    Ok(found.into_values().collect())
}
