//! Channel mixing utilities (multichannel to mono conversion)

use crate::error::EngineError;

/// Downmix interleaved multichannel samples to mono by averaging channels
///
/// # Arguments
///
/// * `samples` - Interleaved samples (frame-major: c0, c1, ..., c0, c1, ...)
/// * `channels` - Channel count; 1 returns the input unchanged
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `channels` is zero.
pub fn downmix_interleaved(samples: &[f32], channels: u16) -> Result<Vec<f32>, EngineError> {
    if channels == 0 {
        return Err(EngineError::InvalidInput(
            "channel count must be > 0".to_string(),
        ));
    }
    if channels == 1 {
        return Ok(samples.to_vec());
    }

    let channels = channels as usize;
    let mono = samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok(mono)
}
