use std::f32::consts::TAU;

use crate::synth::envelope::PercussiveEnvelope;

/// Output gain of a single ping.
pub const PING_GAIN: f32 = 0.2;

/// A sine oscillator under a percussive envelope.
pub struct PingVoice {
    frequency: f32,
    phase: f32,
    age: u64,
    sample_rate: f32,
    envelope: PercussiveEnvelope,
}

impl PingVoice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frequency: 0.0,
            phase: 0.0,
            age: 0,
            sample_rate,
            envelope: PercussiveEnvelope::new(0.01, 0.6),
        }
    }

    pub fn start(&mut self, frequency: f32, attack: f32, release: f32, age: u64) {
        self.frequency = frequency;
        self.phase = 0.0;
        self.age = age;
        self.envelope.trigger(attack, release);
    }

    /// Add this voice's output into `out`.
    pub fn render(&mut self, out: &mut [f32]) {
        let increment = self.frequency / self.sample_rate;
        for sample in out.iter_mut() {
            let level = self.envelope.next_sample(self.sample_rate);
            *sample += (TAU * self.phase).sin() * level * PING_GAIN;

            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn age(&self) -> u64 {
        self.age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_until_started() {
        let mut voice = PingVoice::new(48_000.0);
        let mut out = [0.0; 64];
        voice.render(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
        assert!(!voice.is_active());
    }

    #[test]
    fn ping_stays_under_gain_and_dies_out() {
        let sample_rate = 1_000.0;
        let mut voice = PingVoice::new(sample_rate);
        voice.start(110.0, 0.01, 0.1, 0);

        let mut out = vec![0.0; 200];
        voice.render(&mut out);
        assert!(out.iter().any(|s| s.abs() > 0.05));
        assert!(out.iter().all(|s| s.abs() <= PING_GAIN + 1e-6));
        assert!(!voice.is_active());
    }
}
