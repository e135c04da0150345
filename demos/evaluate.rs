//! Example: Evaluate recognition accuracy over a WAV corpus
//!
//! Builds an in-memory index from every WAV under a directory, then queries
//! a short excerpt cut from each track and reports top-1 accuracy and the
//! rejection rate.
//!
//! Usage:
//!   cargo run --release --example evaluate -- <music_dir> \
//!       [--clip-seconds 5] [--max-tracks 100] [--seed 42]

use rayon::prelude::*;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use constellate::preprocessing::downmix_interleaved;
use constellate::{EngineConfig, Fingerprinter, FingerprintIndex, TrackMetadata};

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

fn collect_wav_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_wav_files(&path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("wav"))
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    out.sort();
    Ok(())
}

/// Deterministic generator for reproducible excerpt positions
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut music_dir: Option<PathBuf> = None;
    let mut clip_seconds = 5.0f32;
    let mut max_tracks = 100usize;
    let mut seed = 42u64;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--clip-seconds" => {
                i += 1;
                clip_seconds = args.get(i).ok_or("--clip-seconds needs a value")?.parse()?;
            }
            "--max-tracks" => {
                i += 1;
                max_tracks = args.get(i).ok_or("--max-tracks needs a value")?.parse()?;
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).ok_or("--seed needs a value")?.parse()?;
            }
            other => music_dir = Some(PathBuf::from(other)),
        }
        i += 1;
    }
    let music_dir = music_dir.ok_or(
        "usage: evaluate <music_dir> [--clip-seconds 5] [--max-tracks 100] [--seed 42]",
    )?;

    let mut wav_files = Vec::new();
    collect_wav_files(&music_dir, &mut wav_files)?;
    if wav_files.is_empty() {
        return Err(format!("no .wav files found under {}", music_dir.display()).into());
    }
    wav_files.truncate(max_tracks);

    println!("Building index from {} tracks...", wav_files.len());
    let engine = Fingerprinter::new(EngineConfig::default())?;

    let loaded: Vec<_> = wav_files
        .par_iter()
        .map(|path| (path.clone(), load_wav(path).map_err(|e| e.to_string())))
        .collect();

    let mut index = FingerprintIndex::new();
    let mut audio_by_id: Vec<(u32, Vec<f32>, u32)> = Vec::new();
    for (path, result) in loaded {
        let (samples, sample_rate) = match result {
            Ok(audio) => audio,
            Err(e) => {
                eprintln!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let hashes = engine.fingerprint(&samples, sample_rate)?;
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        let track_id = index.add_track(&hashes, TrackMetadata::with_title(title));
        audio_by_id.push((track_id, samples, sample_rate));
    }

    println!("Running recognition queries...");
    let mut rng = Rng(seed);
    let mut attempts = 0usize;
    let mut correct = 0usize;
    let mut rejected = 0usize;

    for (track_id, samples, sample_rate) in &audio_by_id {
        let clip_len = ((clip_seconds * *sample_rate as f32) as usize).max(1);
        let clip = if samples.len() <= clip_len {
            &samples[..]
        } else {
            let start = (rng.next_u64() % (samples.len() - clip_len) as u64) as usize;
            &samples[start..start + clip_len]
        };

        let result = engine.identify(&index, clip, *sample_rate)?;
        attempts += 1;
        match result.track_id() {
            None => rejected += 1,
            Some(predicted) if predicted == *track_id => correct += 1,
            Some(_) => {}
        }
    }

    let accuracy = if attempts > 0 {
        correct as f32 / attempts as f32 * 100.0
    } else {
        0.0
    };
    let rejection_rate = if attempts > 0 {
        rejected as f32 / attempts as f32 * 100.0
    } else {
        0.0
    };
    println!("Tracks evaluated: {}", attempts);
    println!("Top-1 accuracy: {:.2}%", accuracy);
    println!(
        "Rejected (score < {}): {:.2}%",
        engine.config().min_score,
        rejection_rate
    );

    Ok(())
}
