//! External chunk key encoding
//!
//! A stored chunk is addressed in the object store by a version-specific string
//! key. Three historical formats co-exist and all remain writable here, chosen
//! by the schema version governing the chunk's start time. Hex versus decimal
//! rendering and field order are part of the on-disk contract; the decoder
//! elsewhere inverts them exactly, so they must never be normalized.

use crate::schema::registry::SchemaConfig;
use crate::time::Timestamp;

/// Identity of a stored chunk, as consumed by the key encoder
///
/// The chunk's own lifecycle is managed elsewhere; this is just the part of
/// its identity that goes into the external key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Owning tenant
    pub user_id: String,
    /// Series fingerprint
    pub fingerprint: u64,
    /// First instant covered by the chunk, inclusive
    pub from: Timestamp,
    /// Last instant covered by the chunk
    pub through: Timestamp,
    /// Data checksum; only meaningful when `checksum_set` is true
    pub checksum: u32,
    /// Whether the chunk was written with a checksum (legacy chunks were not)
    pub checksum_set: bool,
}

impl SchemaConfig {
    /// Generate the external key for a chunk
    ///
    /// Dispatches on the schema version governing `chunk.from` and on whether
    /// the chunk carries a checksum.
    pub fn external_key(&self, chunk: &Chunk) -> String {
        let version = self
            .schema_for_time(chunk.from)
            .and_then(|p| p.version_as_int());
        match version {
            Ok(v) if v >= 12 => newer_external_key(chunk),
            _ if chunk.checksum_set => new_external_key(chunk),
            _ => legacy_external_key(chunk),
        }
    }

    /// The schema version governing a chunk's start time
    ///
    /// The registry and chunk must already be valid and compatible; resolution
    /// failures fall back to version 0.
    pub fn version_for_chunk(&self, chunk: &Chunk) -> i32 {
        self.schema_for_time(chunk.from)
            .and_then(|p| p.version_as_int())
            .unwrap_or(0)
    }
}

// Pre-checksum chunks: decimal fields, no tenant prefix. Legacy chunks carried
// the tenant prefix on the object store side but not in the index.
fn legacy_external_key(chunk: &Chunk) -> String {
    format!(
        "{}:{}:{}",
        chunk.fingerprint,
        chunk.from.millis(),
        chunk.through.millis()
    )
}

// Post-checksum, pre-v12.
fn new_external_key(chunk: &Chunk) -> String {
    format!(
        "{}/{:x}:{:x}:{:x}:{:x}",
        chunk.user_id,
        chunk.fingerprint,
        chunk.from.millis(),
        chunk.through.millis(),
        chunk.checksum
    )
}

// v12 and later: fingerprint split into its own path segment.
fn newer_external_key(chunk: &Chunk) -> String {
    format!(
        "{}/{:x}/{:x}:{:x}:{:x}",
        chunk.user_id,
        chunk.fingerprint,
        chunk.from.millis(),
        chunk.through.millis(),
        chunk.checksum
    )
}
