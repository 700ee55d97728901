use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use hound::{SampleFormat, WavSpec, WavWriter};
use speechtask::audio::AudioEngine;
use speechtask::wave::{amp_to_db, db_to_amp, decode_wav_mono, prepare_stimulus, resample_linear};

fn make_temp_dir(tag: &str) -> PathBuf {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "speechtask_{tag}_{}_{}_{}",
        std::process::id(),
        now_ms,
        seq
    ));
    std::fs::create_dir_all(&dir).expect("create temp test dir");
    dir
}

fn write_wav_i16_stereo(path: &Path, sr: u32, frames: usize, left: f32, right: f32) {
    let spec = WavSpec {
        channels: 2,
        sample_rate: sr,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create wav");
    for _ in 0..frames {
        writer.write_sample((left * i16::MAX as f32) as i16).expect("write");
        writer.write_sample((right * i16::MAX as f32) as i16).expect("write");
    }
    writer.finalize().expect("finalize");
}

fn write_wav_f32_mono(path: &Path, sr: u32, samples: &[f32]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).expect("create wav");
    for &s in samples {
        writer.write_sample(s).expect("write");
    }
    writer.finalize().expect("finalize");
}

#[test]
fn db_to_amp_has_silence_floor_and_unity_at_zero() {
    assert_eq!(db_to_amp(-80.0), 0.0);
    assert_eq!(db_to_amp(-100.0), 0.0);
    assert!((db_to_amp(0.0) - 1.0).abs() < 1e-6);
    assert!((db_to_amp(-20.0) - 0.1).abs() < 1e-6);
    assert!((db_to_amp(6.0) - 1.9953).abs() < 1e-3);
}

#[test]
fn amp_to_db_floors_silence_at_minus_80() {
    assert_eq!(amp_to_db(0.0), -80.0);
    assert_eq!(amp_to_db(-0.5), -80.0);
    // Below the floor clamps to it rather than running off to -infinity.
    assert_eq!(amp_to_db(1e-9), -80.0);
    assert!((amp_to_db(1.0) - 0.0).abs() < 1e-6);
    assert!((amp_to_db(0.1) + 20.0).abs() < 1e-4);
}

#[test]
fn stereo_int_decodes_to_channel_average() {
    let dir = make_temp_dir("decode_stereo");
    let path = dir.join("stim.wav");
    write_wav_i16_stereo(&path, 16_000, 100, 0.5, -0.1);

    let (mono, sr) = decode_wav_mono(&path).expect("decode");
    assert_eq!(sr, 16_000);
    assert_eq!(mono.len(), 100);
    // Average of 0.5 and -0.1.
    assert!((mono[0] - 0.2).abs() < 1e-3, "got {}", mono[0]);
}

#[test]
fn float_mono_decodes_verbatim() {
    let dir = make_temp_dir("decode_f32");
    let path = dir.join("stim.wav");
    let samples = [0.0f32, 0.25, -0.5, 1.0];
    write_wav_f32_mono(&path, 44_100, &samples);

    let (mono, sr) = decode_wav_mono(&path).expect("decode");
    assert_eq!(sr, 44_100);
    assert_eq!(mono.len(), samples.len());
    for (got, want) in mono.iter().zip(samples.iter()) {
        assert!((got - want).abs() < 1e-6);
    }
}

#[test]
fn missing_file_is_an_error() {
    assert!(decode_wav_mono(Path::new("/nonexistent/stim.wav")).is_err());
}

#[test]
fn resample_scales_length_by_rate_ratio() {
    let mono: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
    let out = resample_linear(&mono, 16_000, 48_000);
    assert_eq!(out.len(), 3000);
    let same = resample_linear(&mono, 48_000, 48_000);
    assert_eq!(same.len(), mono.len());
}

#[test]
fn prepare_stimulus_loads_buffer_at_level_gain() {
    let dir = make_temp_dir("prepare");
    let path = dir.join("stim.wav");
    write_wav_f32_mono(&path, 48_000, &[0.1; 480]);

    let engine = AudioEngine::new_for_test();
    prepare_stimulus(&path, &engine, -20.0).expect("prepare");
    let gain = engine.shared.gain.load(Ordering::Relaxed);
    assert!((gain - 0.1).abs() < 1e-6, "-20 dB FS is gain 0.1, got {gain}");
    let samples = engine.shared.samples.load();
    assert_eq!(samples.as_ref().map(|s| s.len()), Some(480));
    assert!(!engine.is_playing(), "prepare must not start playback");
}
