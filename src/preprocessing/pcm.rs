//! Integer PCM to normalized float conversion

/// Convert 16-bit PCM samples to `f32` in `[-1.0, 1.0)`
pub fn i16_to_f32(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}

/// Convert 32-bit PCM samples to `f32` in `[-1.0, 1.0)`
pub fn i32_to_f32(samples: &[i32]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 2147483648.0).collect()
}
