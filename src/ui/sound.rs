//! Sound engine: procedural effects for core events via rodio.
//!
//! Buffers are generated once at init. Playback is fire-and-forget.
//! Without the "sound" feature the engine is a no-op stub.

use crate::sim::event::CoreEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_hit_head: Arc<Vec<u8>>,
        sfx_cling: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_hit_head: Arc::new(make_wav(&gen_thud())),
                sfx_cling: Arc::new(make_wav(&gen_clink())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let Ok(sink) = Sink::try_new(&self.handle) else { return };
            match rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                Ok(src) => {
                    sink.append(src);
                    sink.detach();
                }
                Err(e) => tracing::warn!("sound decode failed: {e}"),
            }
        }

        pub fn play_hit_head(&self) { self.play(&self.sfx_hit_head); }
        pub fn play_cling(&self) { self.play(&self.sfx_cling); }
    }

    // ── Waveform generators (mono f32) ──

    /// Hit head: short low square thud dropping in pitch.
    fn gen_thud() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.08) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 160.0 - t * 80.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let square = if (ti * freq).fract() < 0.5 { 1.0 } else { -1.0 };
                square * (1.0 - t).powf(1.5) * 0.25
            })
            .collect()
    }

    /// Cling to hooks: two bright metallic clinks.
    fn gen_clink() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[1760.0_f32, 2349.0] {
            let n = (SAMPLE_RATE as f32 * 0.05) as usize;
            samples.extend((0..n).map(|i| {
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - i as f32 / n as f32).powf(2.0);
                let wave = (ti * freq * std::f32::consts::TAU).sin() * 0.6
                    + (ti * freq * 2.76 * std::f32::consts::TAU).sin() * 0.4;
                wave * env * 0.2
            }));
        }
        samples
    }

    /// Wrap mono samples in a 16-bit PCM WAV container.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_size = samples.len() as u32 * 2;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_hit_head(&self) {}
    pub fn play_cling(&self) {}
}

/// Play the effect for each event.
pub fn play_events(sound: Option<&SoundEngine>, events: &[CoreEvent]) {
    let Some(sfx) = sound else { return };
    for event in events {
        match event {
            CoreEvent::HitHead => sfx.play_hit_head(),
            CoreEvent::ClingToHooks => sfx.play_cling(),
        }
    }
}
