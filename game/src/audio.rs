//! Cue playback over rodio.
//!
//! Every cue is a short synthesized tone (no binary sound assets) appended
//! to a detached sink: fire-and-forget, nothing awaits completion. A
//! persistent sink loops the procedural soundtrack. If no output device is
//! available the whole thing degrades to a silent no-op.

use std::cell::Cell;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use crate::sfx::{MUSIC_VOLUME, SfxCue};

const SAMPLE_RATE: u32 = 44_100;

/// A single frequency sweep with a click-free envelope.
#[derive(Debug, Clone)]
struct Tone {
    start_hz: f32,
    end_hz: f32,
    square: bool,
    total_samples: u64,
    sample: u64,
    phase: f32,
}

impl Tone {
    fn sweep(start_hz: f32, end_hz: f32, seconds: f32, square: bool) -> Self {
        Self {
            start_hz,
            end_hz,
            square,
            total_samples: (SAMPLE_RATE as f32 * seconds) as u64,
            sample: 0,
            phase: 0.0,
        }
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.sample >= self.total_samples {
            return None;
        }
        let progress = self.sample as f32 / self.total_samples as f32;
        let freq = self.start_hz + (self.end_hz - self.start_hz) * progress;
        self.phase = (self.phase + std::f32::consts::TAU * freq / SAMPLE_RATE as f32)
            % std::f32::consts::TAU;

        // 10ms attack, 30% release keep the tone from clicking.
        let attack = (SAMPLE_RATE / 100) as f32;
        let env = if (self.sample as f32) < attack {
            self.sample as f32 / attack
        } else {
            (1.0 - progress).min(0.3) / 0.3
        };

        let base = if self.square {
            if self.phase.sin() >= 0.0 { 1.0 } else { -1.0 }
        } else {
            self.phase.sin()
        };

        self.sample += 1;
        Some(base * env * 0.8)
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples as f32 / SAMPLE_RATE as f32,
        ))
    }
}

/// Endless pentatonic arpeggio so the game has background audio without
/// shipping a music file.
#[derive(Debug, Clone)]
struct Soundtrack {
    frame: u64,
    phase: f32,
}

impl Soundtrack {
    const NOTES_HZ: [f32; 8] = [261.63, 329.63, 392.0, 523.25, 392.0, 329.63, 293.66, 196.0];
    const NOTE_LEN: u64 = (SAMPLE_RATE as u64) * 3 / 10;

    fn new() -> Self {
        Self {
            frame: 0,
            phase: 0.0,
        }
    }
}

impl Iterator for Soundtrack {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let note = ((self.frame / Self::NOTE_LEN) % Self::NOTES_HZ.len() as u64) as usize;
        let freq = Self::NOTES_HZ[note];
        self.phase =
            (self.phase + std::f32::consts::TAU * freq / SAMPLE_RATE as f32) % std::f32::consts::TAU;

        let pos = self.frame % Self::NOTE_LEN;
        let attack = (SAMPLE_RATE / 100) as u64;
        let release_start = Self::NOTE_LEN - Self::NOTE_LEN / 8;
        let env = if pos < attack {
            pos as f32 / attack as f32
        } else if pos >= release_start {
            (Self::NOTE_LEN - pos) as f32 / (Self::NOTE_LEN - release_start) as f32
        } else {
            1.0
        };

        let base = self.phase.sin();
        let harmonic = (self.phase * 2.0).sin() * 0.25;

        self.frame = self.frame.wrapping_add(1);
        Some((base + harmonic) * env * 0.3)
    }
}

impl Source for Soundtrack {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

fn tone_for(cue: SfxCue) -> Tone {
    match cue {
        SfxCue::Grow => Tone::sweep(180.0, 520.0, 0.12, false),
        SfxCue::Shrink => Tone::sweep(520.0, 140.0, 0.18, false),
        SfxCue::BoingHigh => Tone::sweep(740.0, 520.0, 0.15, false),
        SfxCue::BoingMid => Tone::sweep(520.0, 370.0, 0.15, false),
        SfxCue::BoingLow => Tone::sweep(370.0, 260.0, 0.15, false),
        SfxCue::Buzz => Tone::sweep(120.0, 110.0, 0.25, true),
        SfxCue::StreakBonus => Tone::sweep(440.0, 880.0, 0.3, false),
    }
}

pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music_sink: Option<Sink>,
    music_playing: Cell<bool>,
}

impl AudioOutput {
    /// `None` when no output device is available; callers treat that as
    /// "audio off" rather than an error.
    pub fn try_new(music_enabled: bool) -> Option<Self> {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(err) => {
                log::warn!("no audio output available: {err}");
                return None;
            }
        };

        let music_sink = Sink::try_new(&handle).ok().map(|sink| {
            sink.set_volume(MUSIC_VOLUME);
            sink.append(Soundtrack::new());
            if !music_enabled {
                sink.pause();
            }
            sink
        });

        Some(Self {
            _stream: stream,
            handle,
            music_playing: Cell::new(music_enabled && music_sink.is_some()),
            music_sink,
        })
    }

    pub fn play(&self, cue: SfxCue) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(cue.volume());
        sink.append(tone_for(cue));
        sink.detach();
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing.get()
    }

    pub fn toggle_music(&self) {
        let Some(sink) = self.music_sink.as_ref() else {
            return;
        };
        if self.music_playing.get() {
            sink.pause();
            self.music_playing.set(false);
        } else {
            sink.play();
            self.music_playing.set(true);
        }
    }
}
