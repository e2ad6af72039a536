use serde_json::{json, Map, Value};
use wiregroup_core::model::{ProtocolVersion, SpecDocument, VersionCorpus};

/// Builder for one version's spec document
///
/// Packets are registered per (direction key, state); the packet table
/// (mapper + switch) is assembled on `build`.
#[allow(dead_code)]
#[derive(Default, Clone)]
pub struct DocBuilder {
    global_types: Map<String, Value>,
    // (state, direction key, packet name, wire id key, definition)
    packets: Vec<(String, String, String, String, Value)>,
    // (state, direction key, type name, definition)
    local_types: Vec<(String, String, String, Value)>,
}

#[allow(dead_code)]
impl DocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document-global type
    pub fn global_type(mut self, name: &str, definition: Value) -> Self {
        self.global_types.insert(name.to_string(), definition);
        self
    }

    /// Add a direction/state local type
    pub fn local_type(mut self, direction_key: &str, state: &str, name: &str, definition: Value) -> Self {
        self.local_types.push((
            state.to_string(),
            direction_key.to_string(),
            name.to_string(),
            definition,
        ));
        self
    }

    /// Add a packet with its wire id (hex key) and definition
    pub fn packet(mut self, direction_key: &str, state: &str, name: &str, id: &str, definition: Value) -> Self {
        self.packets.push((
            state.to_string(),
            direction_key.to_string(),
            name.to_string(),
            id.to_string(),
            definition,
        ));
        self
    }

    pub fn build(self) -> SpecDocument {
        let mut root = Map::new();
        root.insert("types".to_string(), Value::Object(self.global_types));

        for (state, dir, name, definition) in self.local_types {
            types_of(&mut root, &state, &dir).insert(name, definition);
        }

        for (state, dir, name, id, definition) in self.packets {
            let type_name = format!("packet_{}", name);
            let types = types_of(&mut root, &state, &dir);
            types.insert(type_name.clone(), definition);

            let table = types
                .entry("packet".to_string())
                .or_insert_with(|| {
                    json!(["container", [
                        {"name": "name", "type": ["mapper", {"type": "varint", "mappings": {}}]},
                        {"name": "params", "type": ["switch", {"compareTo": "name", "fields": {}}]}
                    ]])
                });
            table[1][0]["type"][1]["mappings"][&id] = json!(name);
            table[1][1]["type"][1]["fields"][&name] = json!(type_name);
        }

        SpecDocument::new(Value::Object(root))
    }
}

fn types_of<'a>(root: &'a mut Map<String, Value>, state: &str, dir: &str) -> &'a mut Map<String, Value> {
    let state_entry = root
        .entry(state.to_string())
        .or_insert_with(|| json!({}));
    let dir_entry = state_entry
        .as_object_mut()
        .unwrap()
        .entry(dir.to_string())
        .or_insert_with(|| json!({"types": {}}));
    dir_entry["types"].as_object_mut().unwrap()
}

/// Build a corpus from (version, document) pairs
#[allow(dead_code)]
pub fn corpus_of(entries: Vec<(u32, SpecDocument)>) -> VersionCorpus {
    entries
        .into_iter()
        .map(|(v, d)| (ProtocolVersion(v), d))
        .collect()
}

#[allow(dead_code)]
pub fn versions(list: &[u32]) -> Vec<ProtocolVersion> {
    list.iter().copied().map(ProtocolVersion).collect()
}
