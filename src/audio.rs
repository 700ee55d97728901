use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use atomic_float::AtomicF32;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Playback state shared with the cpal callback. The stimulus is mono; the
/// callback routes it to one output channel and leaves the rest silent.
pub struct SharedAudio {
    pub samples: ArcSwapOption<Vec<f32>>, // mono samples in [-1, 1]
    pub gain: AtomicF32,                  // linear gain from the presentation level
    pub playing: AtomicBool,
    pub finished: AtomicBool, // set once when the buffer end is reached
    pub play_pos: AtomicUsize,
    pub route_channel: AtomicUsize, // 0-based output channel
    pub meter_rms: AtomicF32,
    pub out_channels: usize,
    pub out_sample_rate: u32,
}

pub struct AudioEngine {
    _stream: Option<cpal::Stream>,
    pub shared: Arc<SharedAudio>,
    pub device_name: Option<String>,
}

impl AudioEngine {
    fn new_shared(out_channels: usize, out_sample_rate: u32) -> Arc<SharedAudio> {
        Arc::new(SharedAudio {
            samples: ArcSwapOption::from(None),
            gain: AtomicF32::new(0.0),
            playing: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            play_pos: AtomicUsize::new(0),
            route_channel: AtomicUsize::new(0),
            meter_rms: AtomicF32::new(0.0),
            out_channels,
            out_sample_rate,
        })
    }

    /// Opens an output stream on the named device, or the host default when
    /// `device_name` is empty/unknown.
    pub fn new(device_name: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match device_name.filter(|n| !n.is_empty()) {
            Some(name) => host
                .output_devices()
                .context("enumerate output devices")?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .or_else(|| host.default_output_device()),
            None => host.default_output_device(),
        }
        .context("No output device")?;
        let resolved = device.name().ok();
        let cfg = device
            .default_output_config()
            .context("No default output config")?;

        let shared = Self::new_shared(cfg.channels() as usize, cfg.sample_rate());

        let stream = match cfg.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &cfg.into(), shared.clone())?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &cfg.into(), shared.clone())?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &cfg.into(), shared.clone())?
            }
            _ => anyhow::bail!("Unsupported sample format"),
        };

        Ok(Self {
            _stream: Some(stream),
            shared,
            device_name: resolved,
        })
    }

    /// Engine without a device, for tests and headless use.
    pub fn new_for_test() -> Self {
        Self {
            _stream: None,
            shared: Self::new_shared(2, 48_000),
            device_name: None,
        }
    }

    /// Names of all output devices on the default host.
    pub fn output_device_names() -> Vec<String> {
        let host = cpal::default_host();
        match host.output_devices() {
            Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn build_stream<T>(
        device: &cpal::Device,
        cfg: &cpal::StreamConfig,
        shared: Arc<SharedAudio>,
    ) -> Result<cpal::Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = cfg.channels as usize;
        let err_fn = |e| eprintln!("cpal stream error: {e}");
        let stream = device.build_output_stream(
            cfg,
            move |data: &mut [T], _| {
                let playing = shared.playing.load(Ordering::Relaxed);
                let maybe_samples = shared.samples.load();
                let samples = match (playing, maybe_samples.as_ref()) {
                    (true, Some(s)) if !s.is_empty() => s,
                    _ => {
                        for frame in data.chunks_mut(channels) {
                            for ch in frame.iter_mut() {
                                *ch = T::from_sample(0.0);
                            }
                        }
                        shared.meter_rms.store(0.0, Ordering::Relaxed);
                        return;
                    }
                };
                let gain = shared.gain.load(Ordering::Relaxed);
                let route = shared.route_channel.load(Ordering::Relaxed).min(channels - 1);
                let len = samples.len();
                let mut pos = shared.play_pos.load(Ordering::Relaxed);
                let mut sum_sq = 0.0f32;
                let mut n = 0usize;
                for frame in data.chunks_mut(channels) {
                    if pos >= len {
                        shared.playing.store(false, Ordering::Relaxed);
                        shared.finished.store(true, Ordering::Relaxed);
                        for ch in frame.iter_mut() {
                            *ch = T::from_sample(0.0);
                        }
                        continue;
                    }
                    let s = (samples[pos] * gain).clamp(-1.0, 1.0);
                    for (out_ch, out_sample) in frame.iter_mut().enumerate() {
                        let v = if out_ch == route { s } else { 0.0 };
                        *out_sample = T::from_sample(v);
                    }
                    sum_sq += s * s;
                    n += 1;
                    pos += 1;
                }
                shared.play_pos.store(pos, Ordering::Relaxed);
                let rms = if n > 0 { (sum_sq / n as f32).sqrt() } else { 0.0 };
                shared.meter_rms.store(rms, Ordering::Relaxed);
            },
            err_fn,
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }

    pub fn set_samples_mono(&self, mono: Vec<f32>) {
        self.shared.samples.store(Some(Arc::new(mono)));
        self.shared.play_pos.store(0, Ordering::Relaxed);
        self.shared.finished.store(false, Ordering::Relaxed);
    }

    pub fn set_gain(&self, gain: f32) {
        self.shared.gain.store(gain.clamp(0.0, 16.0), Ordering::Relaxed);
    }

    pub fn set_route_channel(&self, ch: usize) {
        self.shared.route_channel.store(ch, Ordering::Relaxed);
    }

    /// Starts playback from the top of the loaded buffer.
    pub fn play(&self) {
        if self.shared.samples.load().is_none() {
            return;
        }
        self.shared.play_pos.store(0, Ordering::Relaxed);
        self.shared.finished.store(false, Ordering::Relaxed);
        self.shared.playing.store(true, Ordering::Relaxed);
    }

    pub fn stop(&self) {
        self.shared.playing.store(false, Ordering::Relaxed);
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::Relaxed)
    }

    /// True once after the buffer has sounded to its end.
    pub fn take_finished(&self) -> bool {
        self.shared.finished.swap(false, Ordering::Relaxed)
    }
}
