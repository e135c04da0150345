//! Example: Identify a single WAV clip against a saved index
//!
//! Usage:
//!   cargo run --release --example identify_clip -- <index.bin> <clip.wav>

use std::env;
use std::fs;
use std::path::Path;

use constellate::preprocessing::downmix_interleaved;
use constellate::{EngineConfig, Fingerprinter, FingerprintIndex, MatchOutcome};

/// Load a WAV file as (mono f32 samples, sample rate)
fn load_wav(path: &Path) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mono = downmix_interleaved(&interleaved, spec.channels)?;
    Ok((mono, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [index_path, clip_path] = args.as_slice() else {
        return Err("usage: identify_clip <index.bin> <clip.wav>".into());
    };

    let index = FingerprintIndex::from_bytes(&fs::read(index_path)?)?;
    println!(
        "Loaded index: {} tracks, {} distinct tokens",
        index.track_count(),
        index.token_count()
    );

    let (samples, sample_rate) = load_wav(Path::new(clip_path))?;
    let engine = Fingerprinter::new(EngineConfig::default())?;
    let result = engine.identify(&index, &samples, sample_rate)?;

    match result.outcome {
        MatchOutcome::Match {
            track_id,
            score,
            offset,
        } => {
            let title = index
                .get_metadata(track_id)
                .map(|m| m.title.as_str())
                .unwrap_or("<unknown>");
            let artist = index
                .get_metadata(track_id)
                .and_then(|m| m.artist.as_deref())
                .unwrap_or("<unknown artist>");
            println!("Matched: {} by {} (track {})", title, artist, track_id);
            println!("  Score: {} aligned tokens", score);
            println!("  Offset: {} bins into the track", offset);
        }
        MatchOutcome::NoMatch { best_score } => {
            println!("No match (best score {})", best_score);
        }
    }
    println!(
        "  Query: {} tokens, {} candidates, {:.2} ms",
        result.report.query_tokens, result.report.candidates, result.report.processing_time_ms
    );

    Ok(())
}
