//! Structural equivalence checker
//!
//! Two subtrees are equivalent when they are deeply equal and every tracked
//! shared type they reference is itself equivalent between the two
//! versions. Type resolution recurses through the same procedure.

use std::collections::HashMap;

use serde_json::Value;

use crate::accessor::SpecView;
use crate::errors::{Result, WireGroupError};
use crate::model::{ProtocolVersion, TypeSlot, VersionCorpus};

type PairKey = (String, ProtocolVersion, ProtocolVersion);

/// Per top-level call bookkeeping
#[derive(Default)]
struct CheckState {
    visiting: Vec<PairKey>,
    memo: HashMap<PairKey, bool>,
}

/// Equivalence relation used by the grouping engine
pub trait Equivalence {
    /// Whether `spec1` under `v1` is equivalent to `spec2` under `v2`
    ///
    /// # Errors
    ///
    /// Implementations fail on corpus-level problems such as cycles.
    fn equivalent(
        &self,
        v1: ProtocolVersion,
        spec1: &Value,
        v2: ProtocolVersion,
        spec2: &Value,
    ) -> Result<bool>;
}

/// Equivalence checker over one (deduplicated) corpus
pub struct EquivalenceChecker<'a> {
    corpus: &'a VersionCorpus,
    types: &'a [TypeSlot],
}

impl<'a> EquivalenceChecker<'a> {
    pub fn new(corpus: &'a VersionCorpus, types: &'a [TypeSlot]) -> Self {
        Self { corpus, types }
    }

    /// Decide whether `spec1` under `v1` is equivalent to `spec2` under `v2`
    ///
    /// A tracked type absent from both versions counts as equivalent; absent
    /// from only one it does not.
    ///
    /// # Errors
    ///
    /// - `TypeCycle` when tracked types reference each other in a loop; the
    ///   error carries the loop as `type@v1/v2` labels
    /// - `Internal` when a version is not part of the corpus
    pub fn equivalent(
        &self,
        v1: ProtocolVersion,
        spec1: &Value,
        v2: ProtocolVersion,
        spec2: &Value,
    ) -> Result<bool> {
        let mut state = CheckState::default();
        self.compare(v1, spec1, v2, spec2, &mut state)
    }

    fn compare(
        &self,
        v1: ProtocolVersion,
        spec1: &Value,
        v2: ProtocolVersion,
        spec2: &Value,
        state: &mut CheckState,
    ) -> Result<bool> {
        if spec1 != spec2 {
            return Ok(false);
        }

        for ty in self.types {
            if !references_type(spec1, ty) {
                continue;
            }

            let key: PairKey = (ty.path(), v1, v2);
            if let Some(&known) = state.memo.get(&key) {
                if known {
                    continue;
                }
                return Ok(false);
            }

            if let Some(pos) = state.visiting.iter().position(|k| *k == key) {
                let path = state.visiting[pos..]
                    .iter()
                    .chain(std::iter::once(&key))
                    .map(|(name, a, b)| format!("{}@{}/{}", name, a, b))
                    .collect();
                return Err(WireGroupError::TypeCycle { path });
            }

            let t1 = self.view(v1)?.type_spec(ty);
            let t2 = self.view(v2)?.type_spec(ty);

            state.visiting.push(key.clone());
            let same = match (t1, t2) {
                (None, None) => true,
                (Some(a), Some(b)) => self.compare(v1, a, v2, b, state)?,
                _ => false,
            };
            state.visiting.pop();
            state.memo.insert(key, same);

            if !same {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn view(&self, version: ProtocolVersion) -> Result<SpecView<'a>> {
        self.corpus
            .get(version)
            .map(|doc| SpecView::new(version, doc))
            .ok_or_else(|| WireGroupError::Internal {
                message: format!("version {} is not part of the corpus", version),
            })
    }
}

impl Equivalence for EquivalenceChecker<'_> {
    fn equivalent(
        &self,
        v1: ProtocolVersion,
        spec1: &Value,
        v2: ProtocolVersion,
        spec2: &Value,
    ) -> Result<bool> {
        EquivalenceChecker::equivalent(self, v1, spec1, v2, spec2)
    }
}

/// Whether `spec` references `ty` anywhere
///
/// A reference is any `"type"` key whose string value is the type's name or
/// its PascalCase form.
pub fn references_type(spec: &Value, ty: &TypeSlot) -> bool {
    let names = ty.reference_names();
    uses_any(spec, &names)
}

fn uses_any(spec: &Value, names: &[String]) -> bool {
    match spec {
        Value::Object(map) => map.iter().any(|(key, value)| {
            (key == "type" && value.as_str().is_some_and(|s| names.iter().any(|n| n == s)))
                || uses_any(value, names)
        }),
        Value::Array(items) => items.iter().any(|item| uses_any(item, names)),
        _ => false,
    }
}
