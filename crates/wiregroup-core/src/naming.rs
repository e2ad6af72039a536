//! Identifier normalization helpers

/// Convert a snake_case identifier to PascalCase
///
/// Each underscore-separated word gets an upper-case first letter and a
/// lower-case remainder, so `spawn_info` becomes `SpawnInfo`.
pub fn snake_to_pascal_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Normalize a slot key for case-insensitive comparison
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}
