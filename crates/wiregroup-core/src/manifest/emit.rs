//! Manifest assembly from grouping results.

use std::collections::BTreeMap;

use crate::dedup::Deduplicated;
use crate::errors::{Result, WireGroupError};
use crate::grouping::SlotGroups;
use crate::manifest::model::{Manifest, ManifestGroup};

/// Merge per-slot groups with the alias table into a manifest
///
/// Every bucket member gains the aliases that point at it; bucket lists
/// are sorted ascending.
///
/// # Errors
///
/// Returns `StaleAlias` when an alias targets a version that is not a kept
/// document, or that is itself an alias.
pub fn build_manifest(dedup: &Deduplicated, slot_groups: &[SlotGroups]) -> Result<Manifest> {
    for (alias, target) in dedup.aliases.iter() {
        if !dedup.corpus.contains(target) || dedup.aliases.is_alias(target) {
            return Err(WireGroupError::StaleAlias {
                alias: alias.get(),
                target: target.get(),
            });
        }
    }

    let mut slots = BTreeMap::new();
    for entry in slot_groups {
        let groups = entry
            .groups
            .iter()
            .map(|group| ManifestGroup {
                representative: group.representative(),
                buckets: group
                    .buckets()
                    .iter()
                    .map(|(wire_id, members)| {
                        let mut expanded = members.clone();
                        for member in members {
                            expanded.extend(dedup.aliases.aliases_of(*member));
                        }
                        expanded.sort();
                        expanded.dedup();
                        (*wire_id, expanded)
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();
        slots.insert(entry.slot.clone(), groups);
    }

    Ok(Manifest {
        versions: dedup.considered.clone(),
        version_aliases: dedup.aliases.clone(),
        slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalence::EquivalenceChecker;
    use crate::grouping::group_slot;
    use crate::model::{
        AliasTable, ProtocolVersion, Slot, SpecDocument, TypeSlot, VersionCorpus,
    };
    use serde_json::json;

    fn dedup_with(versions: &[(u32, serde_json::Value)], aliases: &[(u32, u32)]) -> Deduplicated {
        let corpus: VersionCorpus = versions
            .iter()
            .map(|(v, d)| (ProtocolVersion(*v), SpecDocument::new(d.clone())))
            .collect();
        let mut table = AliasTable::new();
        for (a, t) in aliases {
            table.insert(ProtocolVersion(*a), ProtocolVersion(*t));
        }
        let mut considered: Vec<_> = corpus.versions().chain(table.iter().map(|(a, _)| a)).collect();
        considered.sort();
        Deduplicated {
            corpus,
            aliases: table,
            considered,
        }
    }

    #[test]
    fn test_aliases_expand_into_buckets() {
        // Given 4 aliasing 3 and tags identical in 1 and 3
        let dedup = dedup_with(
            &[
                (1, json!({"types": {"tags": "a"}})),
                (3, json!({"types": {"tags": "a"}, "x": 1})),
            ],
            &[(4, 3)],
        );
        let types = [TypeSlot::common("tags")];
        let checker = EquivalenceChecker::new(&dedup.corpus, &types);
        let slot = Slot::Type(TypeSlot::common("tags"));
        let groups = group_slot(&dedup.corpus, &checker, &slot).unwrap();

        // When building the manifest
        let manifest = build_manifest(&dedup, &[groups]).unwrap();

        // Then 4 appears next to 3 and is never a representative
        let slot_groups = manifest.groups(&slot).unwrap();
        assert_eq!(slot_groups.len(), 1);
        assert_eq!(slot_groups[0].representative, ProtocolVersion(1));
        assert_eq!(
            slot_groups[0].versions(),
            vec![ProtocolVersion(1), ProtocolVersion(3), ProtocolVersion(4)]
        );
        assert_eq!(manifest.versions.len(), 3);
    }

    #[test]
    fn test_stale_alias_target_missing() {
        let dedup = dedup_with(&[(1, json!({}))], &[(4, 3)]);

        let err = build_manifest(&dedup, &[]).unwrap_err();

        assert_eq!(err, WireGroupError::StaleAlias { alias: 4, target: 3 });
    }

    #[test]
    fn test_stale_alias_chained() {
        let dedup = dedup_with(&[(1, json!({}))], &[(2, 1), (3, 2)]);

        let err = build_manifest(&dedup, &[]).unwrap_err();

        assert_eq!(err, WireGroupError::StaleAlias { alias: 3, target: 2 });
    }
}
