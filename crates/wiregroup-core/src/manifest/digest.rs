//! Digest computation for rendered manifests.
//!
//! The build system compares digests to decide whether the checked-in
//! manifest is stale.

use sha2::{Digest, Sha256};

/// Compute the manifest digest.
///
/// Creates a SHA256 hash of the rendered manifest text.
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Example
///
/// ```
/// use wiregroup_core::manifest::digest::manifest_digest;
///
/// let digest = manifest_digest("versions = [5]\n");
/// assert_eq!(digest.len(), 64);
/// ```
pub fn manifest_digest(rendered: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rendered.as_bytes());
    hex::encode(hasher.finalize())
}
