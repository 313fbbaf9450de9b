#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use crate::grid::NodeId;

/// A node was struck by a wave and wants to sound.
///
/// `frequency`, `attack` and `release` are all an audio backend needs; the
/// rest identifies what fired.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaybackEvent {
    pub node: NodeId,
    /// Row-major index of the node in the grid
    pub grid_index: usize,
    pub note_index: usize,
    /// Generation id of the wave that struck
    pub generation: u64,
    pub frequency: f64,
    pub attack: f64,
    pub release: f64,
}

/// Where the simulation sends playback events.
///
/// Delivery is fire-and-forget: a sink must not block, and an event it
/// cannot take is dropped.
pub trait PlaybackSink {
    fn node_triggered(&mut self, event: PlaybackEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl PlaybackSink for Muted {
    fn node_triggered(&mut self, _event: PlaybackEvent) {}
}

impl PlaybackSink for Vec<PlaybackEvent> {
    fn node_triggered(&mut self, event: PlaybackEvent) {
        self.push(event);
    }
}

#[cfg(feature = "rtrb")]
impl PlaybackSink for Producer<PlaybackEvent> {
    fn node_triggered(&mut self, event: PlaybackEvent) {
        // Full ring: the audio side is behind, drop rather than stall the tick
        let _ = self.push(event);
    }
}

/// The audio side of a playback channel.
pub trait PlaybackReceiver {
    fn pop(&mut self) -> Option<PlaybackEvent>;
}

#[cfg(feature = "rtrb")]
impl PlaybackReceiver for Consumer<PlaybackEvent> {
    fn pop(&mut self) -> Option<PlaybackEvent> {
        Consumer::pop(self).ok()
    }
}

impl PlaybackReceiver for std::collections::VecDeque<PlaybackEvent> {
    fn pop(&mut self) -> Option<PlaybackEvent> {
        self.pop_front()
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    fn event(frequency: f64) -> PlaybackEvent {
        PlaybackEvent {
            node: NodeId(1),
            grid_index: 0,
            note_index: 0,
            generation: 2,
            frequency,
            attack: 0.01,
            release: 0.6,
        }
    }

    #[test]
    fn ring_buffer_drops_when_full() {
        let (mut tx, mut rx) = RingBuffer::<PlaybackEvent>::new(2);
        for f in [220.0, 330.0, 440.0] {
            tx.node_triggered(event(f));
        }
        assert_eq!(PlaybackReceiver::pop(&mut rx).map(|e| e.frequency), Some(220.0));
        assert_eq!(PlaybackReceiver::pop(&mut rx).map(|e| e.frequency), Some(330.0));
        assert_eq!(PlaybackReceiver::pop(&mut rx), None);
    }
}
