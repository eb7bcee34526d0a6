// Demonstration of the look-ahead transport driving the built-in synth
// Run with: cargo run --bin demo_transport [composition.json|.ron] [config.ron]
// Add `--features audio-output` to hear it on the default output device.

use std::path::Path;
use std::time::Duration;

use pianoroll::sequencer::ticker::DEFAULT_FRAME_INTERVAL;
use pianoroll::{
    Composition, EditorConfig, FrameTicker, Note, SoundEngine, SynthEngine, Transport,
    TransportEvent,
};
use ringbuf::traits::Consumer;

/// C major arpeggio over two bars, then a held chord
fn demo_composition(config: &EditorConfig) -> Composition {
    let mut comp = Composition::with_defaults(config.composition.clone());
    comp.set_bars(4);
    for (i, pitch) in [60, 64, 67, 72, 67, 64, 60, 55].into_iter().enumerate() {
        comp.add_note(Note::new(pitch, i as f64, 0.9, 100));
    }
    for pitch in [48, 60, 64, 67] {
        comp.add_note(Note::new(pitch, 8.0, 4.0, 80));
    }
    comp
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.get(1) {
        Some(path) => EditorConfig::load(Path::new(path))?,
        None => EditorConfig::default(),
    };

    let mut comp = match args.first() {
        Some(path) => {
            let mut comp = Composition::with_defaults(config.composition.clone());
            comp.load_from_file(Path::new(path))?;
            comp
        }
        None => demo_composition(&config),
    };

    println!("Piano roll - transport demo");
    println!("===========================");
    println!(
        "{} notes, {} bars of {}/4 at {:.1} BPM",
        comp.note_count(),
        comp.bars(),
        comp.beats_per_bar(),
        comp.tempo()
    );

    let engine = if cfg!(feature = "audio-output") {
        SynthEngine::device(config.synth.clone())
    } else {
        SynthEngine::offline(config.synth.clone())
    };
    let mut transport = Transport::new(engine, config.transport.clone());
    let mut events = transport.subscribe();

    transport.play(&comp);
    if !transport.is_playing() {
        return Err("sound engine failed to start".into());
    }

    // One pass through the composition, then stop
    let duration = pianoroll::sequencer::beat_to_time(comp.total_beats(), comp.tempo());
    let frames = (duration / DEFAULT_FRAME_INTERVAL.as_secs_f64()).ceil() as usize;

    let mut peak = 0.0f32;
    let mut buffer = Vec::new();
    let ticker = if cfg!(feature = "audio-output") {
        FrameTicker::new(DEFAULT_FRAME_INTERVAL)
    } else {
        FrameTicker::offline(DEFAULT_FRAME_INTERVAL)
    };
    let mut last_whole_beat = -1.0;

    ticker.run(&mut transport, &mut comp, frames, |transport, _, dt| {
        for event in events.pop_iter() {
            match event {
                TransportEvent::PositionChange(beat) if beat.floor() > last_whole_beat => {
                    last_whole_beat = beat.floor();
                    println!(
                        "  beat {:>5.2}  t={:.3}s  voices={}",
                        beat,
                        transport.engine().current_time(),
                        transport.engine().active_voice_count()
                    );
                }
                TransportEvent::PositionChange(_) => {}
                other => println!("  [{}]", other.name()),
            }
        }

        // Offline: pull this frame's audio, which moves the engine clock
        let engine = transport.engine_mut();
        if let Some(rate) = engine.sample_rate() {
            buffer.resize((dt.as_secs_f64() * rate as f64).round() as usize, 0.0);
            if engine.render(&mut buffer) > 0 {
                peak = buffer.iter().fold(peak, |p, s| p.max(s.abs()));
            }
        }
    });

    transport.stop();
    for event in events.pop_iter() {
        if !matches!(event, TransportEvent::PositionChange(_)) {
            println!("  [{}]", event.name());
        }
    }

    if cfg!(feature = "audio-output") {
        // Let the release tails ring out
        std::thread::sleep(Duration::from_millis(200));
    } else {
        println!("\nRendered {:.2}s offline, peak level {:.3}", duration, peak);
    }

    Ok(())
}
