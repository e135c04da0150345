//! Short-time magnitude spectrogram
//!
//! Overlapping Hann-windowed frames, forward FFT, magnitudes in dB.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::config::EngineConfig;

/// Keeps log10 defined for zero-magnitude bins
const DB_EPSILON: f32 = 1e-10;

/// Compute the dB magnitude spectrogram of a sample buffer
///
/// # Arguments
///
/// * `samples` - Mono samples; must be at least `config.window_size` long
/// * `config` - Supplies `window_size` and `hop_length`
///
/// # Returns
///
/// One row per frame, each row holding `window_size / 2` dB magnitudes
/// (`20 * log10(|X| + epsilon)`). The redundant upper half of the spectrum
/// is discarded.
pub fn magnitude_spectrogram_db(samples: &[f32], config: &EngineConfig) -> Vec<Vec<f32>> {
    let window_size = config.window_size;
    let freq_bins = config.freq_bins();

    let window_coefficients = hann_window(window_size);
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(window_size);

    let mut grid = Vec::new();
    let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); window_size];

    for chunk in samples.windows(window_size).step_by(config.hop_length) {
        for (slot, (&sample, &coeff)) in buffer
            .iter_mut()
            .zip(chunk.iter().zip(window_coefficients.iter()))
        {
            *slot = Complex::new(sample * coeff, 0.0);
        }

        fft.process(&mut buffer);

        let magnitudes_db: Vec<f32> = buffer[..freq_bins]
            .iter()
            .map(|c| 20.0 * (c.norm() + DB_EPSILON).log10())
            .collect();
        grid.push(magnitudes_db);
    }

    grid
}

/// Hann window coefficients of the given length
fn hann_window(window_size: usize) -> Vec<f32> {
    (0..window_size)
        .map(|n| {
            let phase = 2.0 * std::f32::consts::PI * n as f32 / (window_size as f32 - 1.0);
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}
