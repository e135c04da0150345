//! Example: Build a fingerprint index from a directory of WAV files
//!
//! Usage:
//!   cargo run --release --example build_index -- <music_dir> [--output index.bin]
//!
//! Notes:
//! - The directory is scanned recursively for .wav files.
//! - Fingerprinting is parallelized across tracks; insertion into the index
//!   stays sequential, which does not affect query results.

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

/// Recursively collect .wav files under a directory, sorted for determinism
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

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut music_dir: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--output" => {
                i += 1;
                output = Some(PathBuf::from(args.get(i).ok_or("--output needs a path")?));
            }
            other => music_dir = Some(PathBuf::from(other)),
        }
        i += 1;
    }
    let music_dir = music_dir.ok_or("usage: build_index <music_dir> [--output index.bin]")?;
    let output = output.unwrap_or_else(|| music_dir.join("fingerprints.bin"));

    let mut wav_files = Vec::new();
    collect_wav_files(&music_dir, &mut wav_files)?;
    if wav_files.is_empty() {
        return Err(format!("no .wav files found under {}", music_dir.display()).into());
    }
    println!("Found {} WAV files in {}", wav_files.len(), music_dir.display());

    let engine = Fingerprinter::new(EngineConfig::default())?;

    // Extraction and hashing are independent per track; only insertion
    // touches shared state.
    let fingerprinted: Vec<_> = wav_files
        .par_iter()
        .map(|path| {
            let result = load_wav(path)
                .map_err(|e| e.to_string())
                .and_then(|(samples, sample_rate)| {
                    engine
                        .fingerprint(&samples, sample_rate)
                        .map_err(|e| e.to_string())
                });
            (path, result)
        })
        .collect();

    let mut index = FingerprintIndex::new();
    let mut skipped = 0usize;
    for (path, result) in fingerprinted {
        match result {
            Ok(hashes) => {
                let title = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string();
                let mut metadata = TrackMetadata::with_title(title);
                if let Ok(rel) = path.strip_prefix(&music_dir) {
                    metadata
                        .extra
                        .insert("filename".to_string(), rel.display().to_string());
                }
                let track_id = index.add_track(&hashes, metadata);
                println!("Indexed {} as track {}", path.display(), track_id);
            }
            Err(e) => {
                eprintln!("Skipping {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    fs::write(&output, index.to_bytes()?)?;
    println!(
        "Wrote {} tracks ({} distinct tokens, {} occurrences) to {}{}",
        index.track_count(),
        index.token_count(),
        index.occurrence_count(),
        output.display(),
        if skipped > 0 {
            format!(", skipped {}", skipped)
        } else {
            String::new()
        }
    );

    Ok(())
}
