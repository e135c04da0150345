//! Fingerprint index
//!
//! An append-only store mapping hash tokens to the (track, anchor-time)
//! occurrences that produced them, plus per-track metadata. The index is
//! built incrementally during an indexing pass, treated as immutable during
//! querying, and snapshotted to an opaque byte blob between runs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::hashing::TokenFingerprint;

/// One stored token occurrence: which track emitted it, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Track that emitted the token
    pub track_id: u32,
    /// Anchor time bin within that track's constellation
    pub anchor_time: u32,
}

/// Metadata stored alongside an indexed track
///
/// `title` and `artist` are the recognized fields; anything else a caller
/// wants to carry goes into `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title
    pub title: String,
    /// Artist, when known
    pub artist: Option<String>,
    /// Unrecognized caller-defined fields
    pub extra: BTreeMap<String, String>,
}

impl TrackMetadata {
    /// Metadata with just a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Searchable token -> occurrences store with per-track metadata
///
/// The index assumes a build phase that completes before any querying
/// begins; it is not safe to insert and look up concurrently. Insertion
/// order across tracks does not affect query results because lookup returns
/// an unordered occurrence collection and the matcher's histogram
/// aggregation is commutative.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FingerprintIndex {
    table: HashMap<u32, Vec<Occurrence>>,
    metadata: HashMap<u32, TrackMetadata>,
    next_track_id: u32,
}

impl FingerprintIndex {
    /// An empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token stream under an explicit track id
    ///
    /// No duplicate suppression is applied: re-inserting the same track
    /// simply adds more occurrences under its id and inflates its future
    /// vote counts. Callers that do not want that must avoid double
    /// indexing; scoring stays correct either way because it is relative.
    pub fn insert(&mut self, track_id: u32, hashes: &[TokenFingerprint]) {
        for fingerprint in hashes {
            self.table
                .entry(fingerprint.token)
                .or_default()
                .push(Occurrence {
                    track_id,
                    anchor_time: fingerprint.anchor_time,
                });
        }
        // Keep the allocator ahead of explicitly chosen ids; saturate so an
        // insert under u32::MAX cannot overflow it
        self.next_track_id = self.next_track_id.max(track_id.saturating_add(1));
        log::debug!(
            "Indexed {} tokens under track {} ({} distinct tokens total)",
            hashes.len(),
            track_id,
            self.table.len()
        );
    }

    /// Insert a token stream under a freshly allocated sequential track id,
    /// store its metadata, and return the id
    pub fn add_track(&mut self, hashes: &[TokenFingerprint], metadata: TrackMetadata) -> u32 {
        let track_id = self.next_track_id;
        self.insert(track_id, hashes);
        self.set_metadata(track_id, metadata);
        track_id
    }

    /// Store or replace a track's metadata
    pub fn set_metadata(&mut self, track_id: u32, metadata: TrackMetadata) {
        self.metadata.insert(track_id, metadata);
    }

    /// Metadata for a track, if any was stored
    pub fn get_metadata(&self, track_id: u32) -> Option<&TrackMetadata> {
        self.metadata.get(&track_id)
    }

    /// All occurrences recorded under a token; empty for unseen tokens
    pub fn lookup(&self, token: u32) -> &[Occurrence] {
        self.table.get(&token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct tokens in the index
    pub fn token_count(&self) -> usize {
        self.table.len()
    }

    /// Total number of stored occurrences
    pub fn occurrence_count(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Number of tracks with stored metadata
    pub fn track_count(&self) -> usize {
        self.metadata.len()
    }

    /// True if nothing has been indexed
    pub fn is_empty(&self) -> bool {
        self.table.is_empty() && self.metadata.is_empty()
    }

    /// Snapshot the whole index to an opaque byte blob
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CorruptIndex`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        bincode::serialize(self)
            .map_err(|e| EngineError::CorruptIndex(format!("failed to encode snapshot: {}", e)))
    }

    /// Restore an index from a snapshot produced by [`Self::to_bytes`]
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CorruptIndex`] on malformed data; no partial
    /// index state is recovered.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        bincode::deserialize(bytes)
            .map_err(|e| EngineError::CorruptIndex(format!("failed to decode snapshot: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(entries: &[(u32, u32)]) -> Vec<TokenFingerprint> {
        entries
            .iter()
            .map(|&(token, anchor_time)| TokenFingerprint { token, anchor_time })
            .collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut index = FingerprintIndex::new();
        index.insert(7, &stream(&[(100, 0), (200, 3), (100, 9)]));

        assert_eq!(
            index.lookup(100),
            &[
                Occurrence {
                    track_id: 7,
                    anchor_time: 0
                },
                Occurrence {
                    track_id: 7,
                    anchor_time: 9
                },
            ]
        );
        assert_eq!(index.lookup(200).len(), 1);
        assert_eq!(index.token_count(), 2);
        assert_eq!(index.occurrence_count(), 3);
    }

    #[test]
    fn test_lookup_miss_is_empty_not_error() {
        let index = FingerprintIndex::new();
        assert!(index.lookup(42).is_empty());
    }

    #[test]
    fn test_duplicate_insert_inflates_occurrences() {
        let mut index = FingerprintIndex::new();
        let hashes = stream(&[(100, 0)]);
        index.insert(1, &hashes);
        index.insert(1, &hashes);
        assert_eq!(index.lookup(100).len(), 2);
    }

    #[test]
    fn test_add_track_allocates_sequential_ids() {
        let mut index = FingerprintIndex::new();
        let a = index.add_track(&stream(&[(1, 0)]), TrackMetadata::with_title("a"));
        let b = index.add_track(&stream(&[(2, 0)]), TrackMetadata::with_title("b"));
        assert_eq!((a, b), (0, 1));
        assert_eq!(index.get_metadata(a).unwrap().title, "a");
        assert_eq!(index.get_metadata(b).unwrap().title, "b");
        assert_eq!(index.track_count(), 2);
    }

    #[test]
    fn test_explicit_ids_keep_allocator_ahead() {
        let mut index = FingerprintIndex::new();
        index.insert(10, &stream(&[(1, 0)]));
        let next = index.add_track(&stream(&[(2, 0)]), TrackMetadata::default());
        assert_eq!(next, 11);
    }

    #[test]
    fn test_insert_under_max_track_id_saturates_allocator() {
        let mut index = FingerprintIndex::new();
        index.insert(u32::MAX, &stream(&[(1, 0)]));
        assert_eq!(index.lookup(1)[0].track_id, u32::MAX);

        // The allocator pins at u32::MAX instead of wrapping to 0
        let next = index.add_track(&stream(&[(2, 0)]), TrackMetadata::default());
        assert_eq!(next, u32::MAX);
    }

    #[test]
    fn test_metadata_extra_fields() {
        let mut metadata = TrackMetadata::with_title("song");
        metadata.artist = Some("band".to_string());
        metadata
            .extra
            .insert("album".to_string(), "record".to_string());

        let mut index = FingerprintIndex::new();
        index.set_metadata(3, metadata.clone());
        assert_eq!(index.get_metadata(3), Some(&metadata));
        assert_eq!(index.get_metadata(4), None);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut index = FingerprintIndex::new();
        index.add_track(
            &stream(&[(100, 0), (200, 3), (100, 9)]),
            TrackMetadata::with_title("first"),
        );
        index.add_track(&stream(&[(100, 1), (300, 5)]), {
            let mut m = TrackMetadata::with_title("second");
            m.artist = Some("someone".to_string());
            m
        });

        let bytes = index.to_bytes().unwrap();
        let restored = FingerprintIndex::from_bytes(&bytes).unwrap();
        assert_eq!(restored, index);

        // The id allocator is part of the snapshot
        let mut restored = restored;
        assert_eq!(
            restored.add_track(&stream(&[(9, 0)]), TrackMetadata::default()),
            2
        );
    }

    #[test]
    fn test_malformed_snapshot_is_corrupt_index() {
        let result = FingerprintIndex::from_bytes(&[0xde, 0xad, 0xbe]);
        assert!(matches!(result, Err(EngineError::CorruptIndex(_))));
    }
}
