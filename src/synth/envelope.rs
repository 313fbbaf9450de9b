use crate::MIN_TIME;

/*
Percussive Envelope
===================

A struck node has no gate to hold: the note starts, peaks and dies on its
own. The envelope is two linear ramps and nothing else.

  Level
    1.0 ┐  ╱╲
        │ ╱  ╲
        │╱    ╲
    0.0 └──────╲──→ Time
        Attack  Release
         (A)      (R)

Both ramps are converted to per-sample increments the usual way:

    increment = 1.0 / (time_seconds * sample_rate)

so a 10 ms attack at 48 kHz climbs in 480 samples and a 600 ms release
falls in 28 800.


The State Machine
-----------------

    ┌──────┐ trigger ┌────────┐ level=1 ┌─────────┐ level=0 ┌──────┐
    │ Idle │ ──────→ │ Attack │ ──────→ │ Release │ ──────→ │ Idle │
    └──────┘         └────────┘         └─────────┘         └──────┘

Retriggering restarts the attack from zero; a struck node that is struck
again should sound as a fresh ping.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercussiveStage {
    Idle,
    Attack,
    Release,
}

pub struct PercussiveEnvelope {
    attack_time: f32,
    release_time: f32,

    stage: PercussiveStage,
    level: f32,
}

impl PercussiveEnvelope {
    pub fn new(attack: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            release_time: release.max(MIN_TIME),
            stage: PercussiveStage::Idle,
            level: 0.0,
        }
    }

    /// Restart from silence with a new shape.
    pub fn trigger(&mut self, attack: f32, release: f32) {
        self.attack_time = attack.max(MIN_TIME);
        self.release_time = release.max(MIN_TIME);
        self.level = 0.0;
        self.stage = PercussiveStage::Attack;
    }

    /// Advance one sample and return the new level.
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.stage {
            PercussiveStage::Idle => {
                self.level = 0.0;
            }

            PercussiveStage::Attack => {
                self.level += 1.0 / (self.attack_time * sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = PercussiveStage::Release;
                }
            }

            PercussiveStage::Release => {
                self.level -= 1.0 / (self.release_time * sample_rate);
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = PercussiveStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.stage != PercussiveStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> PercussiveStage {
        self.stage
    }
}
