//! Spectral peak extraction
//!
//! Turns a PCM sample buffer into a sparse constellation map of
//! time-frequency peaks:
//! 1. Slice the buffer into overlapping Hann-windowed frames
//! 2. Take the FFT magnitude of each frame, in dB
//! 3. Keep the bins that are strict local maxima over their rectangular
//!    neighborhood and above the configured amplitude floor

pub mod peaks;
pub mod spectrogram;

pub use peaks::{Constellation, Peak};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Extract the constellation map of an audio buffer
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Engine configuration (window/hop/neighborhood/floor)
///
/// # Returns
///
/// The constellation of surviving peaks, sorted by (time, frequency).
/// A buffer shorter than one analysis window yields an empty constellation.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the buffer is empty, contains
/// non-finite values, or the sample rate is zero.
///
/// # Determinism
///
/// Identical input and configuration always produce an identical
/// constellation; there is no randomness anywhere in the pipeline.
pub fn extract_peaks(
    samples: &[f32],
    sample_rate: u32,
    config: &EngineConfig,
) -> Result<Constellation, EngineError> {
    if samples.is_empty() {
        return Err(EngineError::InvalidInput(
            "empty sample buffer".to_string(),
        ));
    }
    if sample_rate == 0 {
        return Err(EngineError::InvalidInput(
            "sample rate must be > 0".to_string(),
        ));
    }
    if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
        return Err(EngineError::InvalidInput(format!(
            "non-finite sample at position {}",
            pos
        )));
    }

    log::debug!(
        "Extracting peaks: {} samples at {} Hz, window={}, hop={}",
        samples.len(),
        sample_rate,
        config.window_size,
        config.hop_length
    );

    if samples.len() < config.window_size {
        log::debug!(
            "Buffer shorter than one window ({} < {}), returning empty constellation",
            samples.len(),
            config.window_size
        );
        return Ok(Constellation::default());
    }

    let grid = spectrogram::magnitude_spectrogram_db(samples, config);
    let constellation = peaks::find_peaks(&grid, config);

    log::debug!(
        "Constellation: {} peaks from {} frames",
        constellation.len(),
        grid.len()
    );

    Ok(constellation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EngineConfig {
        EngineConfig {
            window_size: 512,
            hop_length: 128,
            ..EngineConfig::default()
        }
    }

    /// 1 kHz tone with a slow amplitude wobble so frames differ along time
    fn wobbling_tone(seconds: f32, sample_rate: u32) -> Vec<f32> {
        let n = (seconds * sample_rate as f32) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let envelope = 0.6 + 0.4 * (2.0 * std::f32::consts::PI * 1.3 * t).sin();
                envelope * (2.0 * std::f32::consts::PI * 1000.0 * t).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let result = extract_peaks(&[], 8000, &test_config());
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let samples = vec![0.1f32; 8000];
        let result = extract_peaks(&samples, 0, &test_config());
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_samples_rejected() {
        let mut samples = vec![0.1f32; 8000];
        samples[1234] = f32::NAN;
        let result = extract_peaks(&samples, 8000, &test_config());
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));

        samples[1234] = f32::INFINITY;
        let result = extract_peaks(&samples, 8000, &test_config());
        assert!(result.is_err());
    }

    #[test]
    fn test_short_buffer_yields_empty_constellation() {
        let samples = vec![0.1f32; 100];
        let constellation = extract_peaks(&samples, 8000, &test_config()).unwrap();
        assert!(constellation.is_empty());
    }

    #[test]
    fn test_silence_yields_no_peaks() {
        let samples = vec![0.0f32; 16000];
        let constellation = extract_peaks(&samples, 8000, &test_config()).unwrap();
        assert!(constellation.is_empty(), "silence is below the amplitude floor");
    }

    #[test]
    fn test_tone_peaks_cluster_at_tone_bin() {
        // 1000 Hz at 8 kHz with a 512 window lands exactly on bin 64
        let samples = wobbling_tone(2.0, 8000);
        let constellation = extract_peaks(&samples, 8000, &test_config()).unwrap();
        assert!(!constellation.is_empty(), "tone should produce peaks");

        let near_tone = constellation
            .peaks()
            .iter()
            .filter(|p| (63..=65).contains(&p.freq))
            .count();
        assert!(
            near_tone > 0,
            "expected peaks at the tone's frequency bin, got {:?}",
            constellation.peaks()
        );
    }

    #[test]
    fn test_determinism() {
        let samples = wobbling_tone(2.0, 8000);
        let a = extract_peaks(&samples, 8000, &test_config()).unwrap();
        let b = extract_peaks(&samples, 8000, &test_config()).unwrap();
        assert_eq!(a, b);
    }
}
