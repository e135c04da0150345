//! Configuration parameters for the fingerprinting engine

use crate::error::EngineError;

/// Engine configuration parameters
///
/// Every parameter must be identical between index-build time and query time
/// for a given index. A mismatch does not error; it silently degrades match
/// quality because the two sides no longer produce comparable tokens.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // Spectral analysis
    /// FFT window size in samples (default: 4096)
    ///
    /// Windows above 2048 samples produce more frequency bins than the
    /// token's 10-bit frequency fields can address; the excess bits are
    /// masked off at packing time (see
    /// [`pack_token`](crate::hashing::pack_token)). Both sides of a query
    /// mask identically, so alignment is unaffected.
    pub window_size: usize,

    /// Hop length between successive windows in samples (default: 512)
    ///
    /// Must be strictly smaller than `window_size`; typical values are
    /// `window_size / 8` to `window_size / 2`.
    pub hop_length: usize,

    // Peak selection
    /// Neighborhood extent along the time axis, in frames (default: 3)
    ///
    /// Must be odd; the neighborhood is centered on the candidate bin.
    pub neighborhood_time_span: usize,

    /// Neighborhood extent along the frequency axis, in bins (default: 3)
    ///
    /// Must be odd; the neighborhood is centered on the candidate bin.
    pub neighborhood_freq_span: usize,

    /// Absolute amplitude floor in dB for peak candidacy (default: -50.0)
    ///
    /// Suppresses peaks generated purely by noise in silent passages.
    pub amp_min: f32,

    // Pair hashing
    /// Maximum time-bin distance between an anchor and a partner peak
    /// (default: 200)
    pub max_time_delta: u32,

    /// Maximum number of partner peaks paired with each anchor (default: 10)
    pub fan_out: usize,

    // Matching
    /// Minimum winning histogram score for a query to count as a match
    /// (default: 5)
    ///
    /// There is no principled derivation for this value; it is a tunable
    /// threshold that should be calibrated empirically per deployment.
    pub min_score: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: 4096,
            hop_length: 512,
            neighborhood_time_span: 3,
            neighborhood_freq_span: 3,
            amp_min: -50.0,
            max_time_delta: 200,
            fan_out: 10,
            min_score: 5,
        }
    }
}

impl EngineConfig {
    /// Validate all parameters, failing fast on anything out of range
    ///
    /// Called once at [`Fingerprinter`](crate::Fingerprinter) construction so
    /// that bad parameters surface as an error instead of a degenerate
    /// spectrogram or an empty token stream later.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] describing the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.window_size < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "window_size must be >= 2, got {}",
                self.window_size
            )));
        }
        if self.hop_length == 0 {
            return Err(EngineError::InvalidConfig(
                "hop_length must be > 0".to_string(),
            ));
        }
        if self.hop_length >= self.window_size {
            return Err(EngineError::InvalidConfig(format!(
                "hop_length ({}) must be smaller than window_size ({})",
                self.hop_length, self.window_size
            )));
        }
        if self.neighborhood_time_span == 0 || self.neighborhood_time_span % 2 == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "neighborhood_time_span must be odd and > 0, got {}",
                self.neighborhood_time_span
            )));
        }
        if self.neighborhood_freq_span == 0 || self.neighborhood_freq_span % 2 == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "neighborhood_freq_span must be odd and > 0, got {}",
                self.neighborhood_freq_span
            )));
        }
        if !self.amp_min.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "amp_min must be finite, got {}",
                self.amp_min
            )));
        }
        if self.max_time_delta == 0 {
            return Err(EngineError::InvalidConfig(
                "max_time_delta must be > 0".to_string(),
            ));
        }
        if self.fan_out == 0 {
            return Err(EngineError::InvalidConfig(
                "fan_out must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of frequency bins produced per spectral frame
    pub fn freq_bins(&self) -> usize {
        self.window_size / 2
    }
}
