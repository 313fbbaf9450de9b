//! Session setup and the two ways to run it

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use ratatui::DefaultTerminal;
use rtrb::{Producer, RingBuffer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pulsefield::{
    io::{
        input::NodeCommand,
        playback::{Muted, PlaybackEvent},
    },
    synth::PingSynth,
    SimConfig, Simulation, MAX_BLOCK_SIZE,
};

use crate::{cli::Args, ui::UiApp};

/// Playback ring capacity; a full field struck at once fits
const PLAYBACK_RING: usize = 256;
const MAX_VOICES: usize = 24;

/// Build the session described on the command line.
pub fn build_simulation(args: &Args) -> EyreResult<Simulation> {
    let mut config = SimConfig::default()
        .grid(args.columns, args.rows)
        .max_nodes(args.max_nodes)
        .beat_frequency(args.beat_frequency);
    if !args.beats.is_empty() {
        config = config.default_beats(args.beats.clone());
    }

    let mut sim = match args.seed {
        Some(seed) => Simulation::with_seed(config, seed),
        None => Simulation::new(config),
    }
    .wrap_err("failed to set up the simulation")?;

    if let Some(state) = &args.state {
        sim.restore_state(state)
            .wrap_err_with(|| format!("failed to restore `{state}`"))?;
        return Ok(sim);
    }

    for &index in &args.nodes {
        let id = sim
            .grid()
            .node(index)
            .map(|node| node.id())
            .ok_or_else(|| eyre!("node {index} is outside the {}-node grid", sim.grid().len()))?;
        sim.submit(NodeCommand::activate(id))?;
    }

    Ok(sim)
}

/// Step the simulation without a terminal UI, printing strikes to stdout.
pub fn run_headless(mut sim: Simulation, ticks: u64) -> EyreResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!(seed = sim.seed(), ticks, "running headless");

    let mut events: Vec<PlaybackEvent> = Vec::new();
    let mut total = 0;
    for _ in 0..ticks {
        events.clear();
        sim.step(&mut events);
        for event in &events {
            println!(
                "{:>6}  node {:<6} cell {:>3}  note {}  {:>7.2} Hz  wave {}",
                sim.tick_count(),
                event.node.to_string(),
                event.grid_index,
                event.note_index,
                event.frequency,
                event.generation
            );
        }
        total += events.len();
    }

    info!(strikes = total, "done");
    println!("?{}", sim.serialize_state());
    Ok(())
}

/// Take over the terminal: field on the left, sequencer on the right,
/// pings through the default output device.
pub fn run_interactive(mut terminal: DefaultTerminal, sim: Simulation) -> EyreResult<()> {
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let res = match start_audio() {
        Ok((stream, tx)) => {
            let res = UiApp::new(sim, tx, None).run(&mut terminal);
            drop(stream);
            res
        }
        Err(err) => UiApp::new(sim, Muted, Some(format!("audio off: {err}"))).run(&mut terminal),
    };

    execute!(std::io::stdout(), DisableMouseCapture)?;
    res
}

fn start_audio() -> EyreResult<(cpal::Stream, Producer<PlaybackEvent>)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let (tx, rx) = RingBuffer::<PlaybackEvent>::new(PLAYBACK_RING);

    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
    let stream = device.build_output_stream(
        &config.into(),
        {
            let mut synth = PingSynth::new(sample_rate, MAX_VOICES, rx);
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    let block = &mut render_buf[..frames_to_render];
                    synth.render_block(block);

                    // Mono to every channel
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }
            }
        },
        |err| eprintln!("Audio error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok((stream, tx))
}
