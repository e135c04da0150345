//! Audio preprocessing utilities
//!
//! The engine core consumes mono `f32` samples in `[-1.0, 1.0]`. This module
//! contains the thin conversions callers need to get there:
//! - Channel downmixing (stereo/multichannel to mono)
//! - Integer PCM to normalized float conversion

pub mod channel_mixer;
pub mod pcm;

pub use channel_mixer::downmix_interleaved;
pub use pcm::{i16_to_f32, i32_to_f32};
