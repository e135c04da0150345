//! # Constellate
//!
//! An acoustic fingerprinting and matching engine. Audio clips are reduced
//! to a sparse constellation of spectral peaks, peak pairs are packed into
//! compact 32-bit tokens, and unknown clips are identified by looking their
//! tokens up in an index and voting on time-offset alignment.
//!
//! ## Features
//!
//! - **Spectral Peak Extraction**: Hann-windowed STFT with strict local
//!   maximum selection over configurable neighborhoods
//! - **Pair Hashing**: bounded-fan combinatorial pairing packed into
//!   32-bit tokens (10/10/12-bit layout)
//! - **Fingerprint Index**: append-only token store with track metadata and
//!   whole-snapshot persistence
//! - **Offset-Vote Matching**: per-track time-offset histograms with a
//!   configurable confidence floor
//!
//! ## Quick Start
//!
//! ```
//! use constellate::{EngineConfig, Fingerprinter, FingerprintIndex, TrackMetadata};
//!
//! let engine = Fingerprinter::new(EngineConfig::default())?;
//! let mut index = FingerprintIndex::new();
//!
//! // Index a track (mono f32 samples, normalized to [-1.0, 1.0])
//! let samples = vec![0.0f32; 44100];
//! let track_id = engine.index_track(
//!     &mut index,
//!     &samples,
//!     44100,
//!     TrackMetadata::with_title("demo"),
//! )?;
//!
//! // Identify an unknown clip against the index
//! let result = engine.identify(&index, &samples, 44100)?;
//! println!("match: {:?} (track {} indexed)", result.outcome, track_id);
//! # Ok::<(), constellate::EngineError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PCM samples → Spectral Peak Extractor → Pair Hasher → token stream
//!                                       index: insert ↙   ↘ query: offset-vote match
//! ```
//!
//! The same configuration must be used to build an index and to query it;
//! mismatched parameters silently degrade match quality.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod hashing;
pub mod index;
pub mod matching;
pub mod preprocessing;
pub mod spectral;

// Re-export main types
pub use config::EngineConfig;
pub use error::EngineError;
pub use hashing::TokenFingerprint;
pub use index::{FingerprintIndex, Occurrence, TrackMetadata};
pub use matching::{MatchOutcome, MatchResult, QueryReport};
pub use spectral::{Constellation, Peak};

/// Fingerprinting engine facade
///
/// Holds a validated configuration and drives the extract → hash pipeline
/// for both indexing and querying. Construction fails fast on invalid
/// parameters so bad window geometry never reaches the spectral stage.
///
/// All operations are pure, synchronous, CPU-bound computations; the engine
/// itself holds no mutable state and can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    config: EngineConfig,
}

impl Fingerprinter {
    /// Create an engine, validating the configuration once
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] describing the first
    /// out-of-range parameter.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fingerprint a sample buffer into its token stream
    ///
    /// # Arguments
    ///
    /// * `samples` - Mono samples, normalized to [-1.0, 1.0]
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] for an empty buffer, non-finite
    /// samples, or a zero sample rate.
    pub fn fingerprint(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<TokenFingerprint>, EngineError> {
        let constellation = spectral::extract_peaks(samples, sample_rate, &self.config)?;
        Ok(hashing::hash_pairs(&constellation, &self.config))
    }

    /// Fingerprint a track and add it to an index under a fresh track id
    ///
    /// # Returns
    ///
    /// The allocated track id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the samples are rejected;
    /// the index is left untouched in that case.
    pub fn index_track(
        &self,
        index: &mut FingerprintIndex,
        samples: &[f32],
        sample_rate: u32,
        metadata: TrackMetadata,
    ) -> Result<u32, EngineError> {
        let hashes = self.fingerprint(samples, sample_rate)?;
        Ok(index.add_track(&hashes, metadata))
    }

    /// Identify an unknown clip against an index
    ///
    /// The index must have been built with this engine's configuration.
    /// A query that scores below `min_score` returns
    /// [`MatchOutcome::NoMatch`] inside a normal result, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the samples are rejected.
    pub fn identify(
        &self,
        index: &FingerprintIndex,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<MatchResult, EngineError> {
        let hashes = self.fingerprint(samples, sample_rate)?;
        Ok(matching::match_tokens(&hashes, index, self.config.min_score))
    }
}
