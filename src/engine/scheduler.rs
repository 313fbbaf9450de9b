//! Scheduler - tick-clocked queue of delayed effects.
//!
//! The engine never relies on a host timer. Anything that should happen
//! "a little later" is queued with a fire time on the simulation clock and
//! executed at the start of the first tick whose clock has reached it.

use std::collections::VecDeque;

/// Work the scheduler can defer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Flash the node at this row-major index.
    Highlight(usize),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    fire_at: f64,
    effect: Effect,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    clock: f64,
    // Sorted by fire time; equal times keep insertion order
    queue: VecDeque<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            queue: VecDeque::new(),
        }
    }

    /// Current simulation time in nominal ticks.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Queue `effect` to fire `delay` ticks from now.
    pub fn enqueue(&mut self, delay: f64, effect: Effect) {
        let fire_at = self.clock + delay.max(0.0);
        let at = self.queue.partition_point(|s| s.fire_at <= fire_at);
        self.queue.insert(at, Scheduled { fire_at, effect });
    }

    /// Advance the clock by `delta` ticks.
    pub fn tick(&mut self, delta: f64) {
        self.clock += delta;
    }

    /// Pop the next effect that is due, in fire order.
    pub fn pop_due(&mut self) -> Option<Effect> {
        match self.queue.front() {
            Some(s) if s.fire_at <= self.clock => self.queue.pop_front().map(|s| s.effect),
            _ => None,
        }
    }

    /// Drop every pending effect. The clock keeps running.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
