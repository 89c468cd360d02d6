//! Alert tone synthesis
//!
//! Tones are rendered as mono `f32` samples: an oscillator shaped by a
//! piecewise-linear gain envelope.

use std::f32::consts::TAU;
use std::time::Duration;

use crate::timer::Alert;

/// Output sample rate for rendered tones
pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// Everything needed to render one alert tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub duration_secs: f32,
    /// `(seconds, gain)` breakpoints, linear in between
    pub envelope: &'static [(f32, f32)],
}

const WARNING_ENVELOPE: &[(f32, f32)] = &[(0.0, 0.50), (0.75, 0.125), (1.0, 0.01)];
const END_ENVELOPE: &[(f32, f32)] = &[(0.0, 0.20), (1.0, 0.20), (1.5, 0.0)];

impl ToneSpec {
    pub const WARNING: ToneSpec = ToneSpec {
        waveform: Waveform::Sine,
        frequency_hz: 880.0,
        duration_secs: 1.0,
        envelope: WARNING_ENVELOPE,
    };

    pub const END: ToneSpec = ToneSpec {
        waveform: Waveform::Square,
        frequency_hz: 440.0,
        duration_secs: 1.5,
        envelope: END_ENVELOPE,
    };

    pub fn for_alert(alert: Alert) -> Self {
        match alert {
            Alert::Warning => Self::WARNING,
            Alert::End => Self::END,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.duration_secs)
    }

    pub fn sample_count(&self) -> usize {
        (self.duration_secs * SAMPLE_RATE as f32).round() as usize
    }

    /// Envelope gain at `t` seconds; holds the last breakpoint past the end
    pub fn gain_at(&self, t: f32) -> f32 {
        let Some(&(first_t, first_gain)) = self.envelope.first() else {
            return 0.0;
        };
        if t <= first_t {
            return first_gain;
        }
        for pair in self.envelope.windows(2) {
            let (t0, g0) = pair[0];
            let (t1, g1) = pair[1];
            if t <= t1 {
                if t1 <= t0 {
                    return g1;
                }
                return g0 + (g1 - g0) * (t - t0) / (t1 - t0);
            }
        }
        self.envelope.last().map(|&(_, gain)| gain).unwrap_or(0.0)
    }

    /// Raw oscillator output in `[-1, 1]` at `t` seconds
    pub fn oscillator_at(&self, t: f32) -> f32 {
        let phase = (self.frequency_hz * t).fract();
        match self.waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    pub fn sample_at(&self, t: f32) -> f32 {
        self.oscillator_at(t) * self.gain_at(t)
    }
}

/// Finite sample stream for one tone
#[derive(Debug, Clone)]
pub struct Tone {
    spec: ToneSpec,
    position: usize,
    total: usize,
}

impl Tone {
    pub fn new(spec: ToneSpec) -> Self {
        Self {
            spec,
            position: 0,
            total: spec.sample_count(),
        }
    }

    pub fn spec(&self) -> &ToneSpec {
        &self.spec
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.position >= self.total {
            return None;
        }
        let t = self.position as f32 / SAMPLE_RATE as f32;
        self.position += 1;
        Some(self.spec.sample_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.position;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Tone {}

#[cfg(feature = "playback")]
impl rodio::Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total - self.position)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.spec.duration())
    }
}
