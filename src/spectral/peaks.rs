//! Constellation peak selection
//!
//! A time-frequency bin survives as a peak iff it is the strict maximum over
//! its rectangular neighborhood AND exceeds the absolute amplitude floor.
//! Strict-maximum selection makes the representation invariant to overall
//! loudness; the floor suppresses peaks in silent passages.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// One constellation point: a locally-maximal spectral magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peak {
    /// Frame index within the spectrogram
    pub time: u32,
    /// Frequency bin index within the frame
    pub freq: u32,
}

/// Sparse constellation map of spectral peaks, sorted by (time, freq)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constellation {
    peaks: Vec<Peak>,
}

impl Constellation {
    /// Build a constellation from arbitrary peaks, sorting them into
    /// canonical (time, freq) order
    pub fn from_peaks(mut peaks: Vec<Peak>) -> Self {
        peaks.sort_unstable_by_key(|p| (p.time, p.freq));
        Self { peaks }
    }

    /// Peaks in (time, freq) order
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// True if no peaks survived selection
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Select constellation peaks from a dB magnitude grid
///
/// All grid rows must have the same length, as produced by
/// [`magnitude_spectrogram_db`](super::spectrogram::magnitude_spectrogram_db).
/// The scan only visits bins whose full neighborhood fits inside the grid;
/// boundary frames and edge bins are excluded from candidacy rather than
/// padded. At most one peak can survive per neighborhood because survival
/// requires being strictly greater than every other bin in it.
pub fn find_peaks(grid: &[Vec<f32>], config: &EngineConfig) -> Constellation {
    let time_half = config.neighborhood_time_span / 2;
    let freq_half = config.neighborhood_freq_span / 2;

    let frames = grid.len();
    if frames < config.neighborhood_time_span {
        return Constellation::default();
    }
    let bins = grid[0].len();
    if bins < config.neighborhood_freq_span {
        return Constellation::default();
    }

    let mut peaks = Vec::new();
    for t in time_half..frames - time_half {
        for f in freq_half..bins - freq_half {
            let value = grid[t][f];
            if value <= config.amp_min {
                continue;
            }

            let mut is_strict_max = true;
            'neighborhood: for nt in t - time_half..=t + time_half {
                for nf in f - freq_half..=f + freq_half {
                    if (nt, nf) == (t, f) {
                        continue;
                    }
                    if grid[nt][nf] >= value {
                        is_strict_max = false;
                        break 'neighborhood;
                    }
                }
            }

            if is_strict_max {
                peaks.push(Peak {
                    time: t as u32,
                    freq: f as u32,
                });
            }
        }
    }

    // Scan order already yields (time, freq) order
    Constellation { peaks }
}
