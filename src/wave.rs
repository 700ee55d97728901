//! WAV decode and level conversion for stimulus presentation.

use std::path::Path;

use anyhow::{Context, Result};

use crate::audio::AudioEngine;

/// dB full-scale to linear amplitude, with a silence floor at -80 dB.
pub fn db_to_amp(db: f32) -> f32 {
    if db <= -80.0 {
        0.0
    } else {
        (10.0f32).powf(db / 20.0)
    }
}

/// Linear amplitude to dB full-scale, floored at the same -80 dB silence
/// level as [`db_to_amp`].
pub fn amp_to_db(amp: f32) -> f32 {
    if amp > 0.0 {
        (20.0 * amp.log10()).max(-80.0)
    } else {
        -80.0
    }
}

/// Decodes a WAV file to mono samples in [-1, 1] plus its sample rate.
/// Multi-channel sources are averaged down; 16/24/32-bit int and f32 PCM
/// are accepted.
pub fn decode_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("open wav {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let mut mono: Vec<f32> = Vec::with_capacity(reader.duration() as usize);
    match spec.sample_format {
        hound::SampleFormat::Float => {
            let mut acc = 0.0f32;
            let mut ch = 0usize;
            for sample in reader.samples::<f32>() {
                acc += sample.with_context(|| format!("decode wav {}", path.display()))?;
                ch += 1;
                if ch == channels {
                    mono.push(acc / channels as f32);
                    acc = 0.0;
                    ch = 0;
                }
            }
        }
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            let mut acc = 0.0f32;
            let mut ch = 0usize;
            for sample in reader.samples::<i32>() {
                let v = sample.with_context(|| format!("decode wav {}", path.display()))?;
                acc += v as f32 / scale;
                ch += 1;
                if ch == channels {
                    mono.push(acc / channels as f32);
                    acc = 0.0;
                    ch = 0;
                }
            }
        }
    }
    Ok((mono, spec.sample_rate))
}

/// Linear-interpolation resampler; good enough for speech playback.
pub fn resample_linear(mono: &[f32], in_sr: u32, out_sr: u32) -> Vec<f32> {
    if in_sr == out_sr || in_sr == 0 || out_sr == 0 || mono.is_empty() {
        return mono.to_vec();
    }
    let ratio = out_sr as f64 / in_sr as f64;
    let out_len = ((mono.len() as f64) * ratio).ceil() as usize;
    let len = mono.len();
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let src_pos = (i as f64) / ratio;
        let i0 = src_pos.floor() as usize;
        if i0 >= len {
            out.push(mono[len - 1]);
            continue;
        }
        let i1 = (i0 + 1).min(len - 1);
        let t = (src_pos - i0 as f64).clamp(0.0, 1.0) as f32;
        out.push(mono[i0] * (1.0 - t) + mono[i1] * t);
    }
    out
}

/// Decodes `path`, resamples to the device rate, and loads it into the engine
/// with a gain of `level_db` (dB FS). Does not start playback.
pub fn prepare_stimulus(path: &Path, audio: &AudioEngine, level_db: f32) -> Result<()> {
    let (mono, in_sr) = decode_wav_mono(path)?;
    let samples = resample_linear(&mono, in_sr, audio.shared.out_sample_rate);
    audio.set_samples_mono(samples);
    audio.set_gain(db_to_amp(level_db));
    Ok(())
}
