//! Combinatorial pair hashing
//!
//! Each constellation peak acts as an anchor and is paired with up to
//! `fan_out` later peaks inside a bounded look-ahead window. Every pair is
//! packed into a 32-bit token: anchor frequency, partner frequency, and the
//! time delta between them. Pairing two peaks instead of hashing single
//! peaks roughly doubles the frequency entropy per token, which keeps
//! accidental cross-track collisions rare while the per-anchor bound keeps
//! the index compact.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::spectral::Constellation;

/// Bits allotted to each frequency field of a token
pub const FREQ_BITS: u32 = 10;

/// Bits allotted to the time-delta field of a token
pub const DELTA_BITS: u32 = 12;

/// Largest frequency bin count the token layout can address
pub const MAX_FREQ_BINS: usize = 1 << FREQ_BITS;

const FREQ_MASK: u32 = (1 << FREQ_BITS) - 1;
const DELTA_MASK: u32 = (1 << DELTA_BITS) - 1;

/// One hashed peak pair: the token and the anchor's time bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenFingerprint {
    /// Packed (anchor_freq, partner_freq, time_delta) token
    pub token: u32,
    /// Time bin of the anchor (the earlier peak of the pair)
    pub anchor_time: u32,
}

/// Pack a peak pair into a 32-bit token
///
/// Layout, high to low: `anchor_freq` (10 bits) | `partner_freq` (10 bits) |
/// `time_delta` (12 bits). Frequencies are masked to 10 bits and deltas above
/// 4095 clamp to 4095. Both truncations are deliberate: they trade a bounded
/// rate of token collisions for a fixed-width key, and the matcher's
/// histogram voting absorbs the resulting false-positive occurrences.
pub fn pack_token(anchor_freq: u32, partner_freq: u32, time_delta: u32) -> u32 {
    let delta = time_delta.min(DELTA_MASK);
    ((anchor_freq & FREQ_MASK) << (FREQ_BITS + DELTA_BITS))
        | ((partner_freq & FREQ_MASK) << DELTA_BITS)
        | delta
}

/// Hash a constellation into its token stream
///
/// Anchors are processed in the constellation's (time, freq) order and each
/// peak anchors exactly once. Partners are peaks strictly later in time,
/// within `max_time_delta` bins of the anchor, taken earliest-first until
/// `fan_out` of them have been paired. The selection is fully deterministic,
/// so identical constellations always produce identical token streams.
pub fn hash_pairs(constellation: &Constellation, config: &EngineConfig) -> Vec<TokenFingerprint> {
    let peaks = constellation.peaks();
    let mut hashes = Vec::new();

    for (i, anchor) in peaks.iter().enumerate() {
        let mut paired = 0usize;
        for partner in &peaks[i + 1..] {
            let delta = partner.time - anchor.time;
            if delta == 0 {
                // Same frame: not strictly after the anchor
                continue;
            }
            if delta > config.max_time_delta {
                // Peaks are time-sorted, nothing closer follows
                break;
            }

            hashes.push(TokenFingerprint {
                token: pack_token(anchor.freq, partner.freq, delta),
                anchor_time: anchor.time,
            });
            paired += 1;
            if paired == config.fan_out {
                break;
            }
        }
    }

    log::debug!(
        "Hashed {} peaks into {} tokens (fan_out={}, max_time_delta={})",
        peaks.len(),
        hashes.len(),
        config.fan_out,
        config.max_time_delta
    );

    hashes
}
