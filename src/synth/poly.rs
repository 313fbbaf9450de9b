use crate::{
    io::playback::PlaybackReceiver,
    synth::voice::PingVoice,
    MAX_BLOCK_SIZE,
};

/// A fixed pool of [`PingVoice`]s fed by playback events.
///
/// Lives on the audio thread. Events are drained at the top of every block;
/// with every voice busy the oldest ping is cut short for the new one.
pub struct PingSynth<R: PlaybackReceiver> {
    voices: Vec<PingVoice>,
    rx: R,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
}

impl<R: PlaybackReceiver> PingSynth<R> {
    pub fn new(sample_rate: f32, max_voices: usize, rx: R) -> Self {
        let voices = (0..max_voices.max(1))
            .map(|_| PingVoice::new(sample_rate))
            .collect();

        Self {
            voices,
            rx,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
        }
    }

    /// Render up to `MAX_BLOCK_SIZE` mono samples; longer buffers are
    /// rendered in chunks.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(event) = self.rx.pop() {
            let age = self.frame_counter;
            let voice = self.allocate_voice();
            voice.start(
                event.frequency as f32,
                event.attack as f32,
                event.release as f32,
                age,
            );
        }

        out.fill(0.0);
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let temp = &mut self.temp_buffer[..chunk.len()];
            temp.fill(0.0);
            for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
                voice.render(temp);
            }
            chunk.copy_from_slice(temp);
        }

        self.frame_counter += out.len() as u64;
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    fn allocate_voice(&mut self) -> &mut PingVoice {
        // Free voice first, otherwise steal the oldest
        let index = self
            .voices
            .iter()
            .position(|v| !v.is_active())
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, v)| v.age())
                    .map(|(index, _)| index)
            })
            .unwrap_or(0);

        &mut self.voices[index]
    }
}
