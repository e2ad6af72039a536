use std::collections::BTreeMap;

use serde_json::Value;

use super::version::ProtocolVersion;

/// One version's protocol specification document
///
/// Immutable JSON tree. Equality is deep structural equality; object key
/// order does not matter.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument(Value);

impl SpecDocument {
    pub fn new(root: Value) -> Self {
        Self(root)
    }

    pub fn root(&self) -> &Value {
        &self.0
    }

    /// Document-global `types` section
    pub fn global_types(&self) -> Option<&serde_json::Map<String, Value>> {
        self.0.get("types").and_then(Value::as_object)
    }

    /// Names of the protocol states this document defines
    ///
    /// Every top-level key other than `types` is a state.
    pub fn states(&self) -> Vec<&str> {
        match self.0.as_object() {
            Some(map) => map
                .keys()
                .filter(|k| k.as_str() != "types")
                .map(String::as_str)
                .collect(),
            None => Vec::new(),
        }
    }
}

impl From<Value> for SpecDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Ordered mapping from protocol version to its document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionCorpus {
    documents: BTreeMap<ProtocolVersion, SpecDocument>,
}

impl VersionCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, returning the previous one for that version
    pub fn insert(
        &mut self,
        version: ProtocolVersion,
        document: SpecDocument,
    ) -> Option<SpecDocument> {
        self.documents.insert(version, document)
    }

    pub fn get(&self, version: ProtocolVersion) -> Option<&SpecDocument> {
        self.documents.get(&version)
    }

    pub fn contains(&self, version: ProtocolVersion) -> bool {
        self.documents.contains_key(&version)
    }

    /// Versions in ascending order
    pub fn versions(&self) -> impl Iterator<Item = ProtocolVersion> + '_ {
        self.documents.keys().copied()
    }

    /// Documents in ascending version order
    pub fn iter(&self) -> impl Iterator<Item = (ProtocolVersion, &SpecDocument)> {
        self.documents.iter().map(|(v, d)| (*v, d))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<(ProtocolVersion, SpecDocument)> for VersionCorpus {
    fn from_iter<I: IntoIterator<Item = (ProtocolVersion, SpecDocument)>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

/// Whole-document duplicates: alias version → representative version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<ProtocolVersion, ProtocolVersion>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: ProtocolVersion, target: ProtocolVersion) {
        self.entries.insert(alias, target);
    }

    pub fn target_of(&self, alias: ProtocolVersion) -> Option<ProtocolVersion> {
        self.entries.get(&alias).copied()
    }

    pub fn is_alias(&self, version: ProtocolVersion) -> bool {
        self.entries.contains_key(&version)
    }

    /// Every alias whose target is `target`, ascending
    pub fn aliases_of(
        &self,
        target: ProtocolVersion,
    ) -> impl Iterator<Item = ProtocolVersion> + '_ {
        self.entries
            .iter()
            .filter(move |(_, t)| **t == target)
            .map(|(a, _)| *a)
    }

    /// (alias, target) pairs ordered by alias
    pub fn iter(&self) -> impl Iterator<Item = (ProtocolVersion, ProtocolVersion)> + '_ {
        self.entries.iter().map(|(a, t)| (*a, *t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
