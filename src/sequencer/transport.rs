// Transport - Playback control, position tracking and look-ahead scheduling
//
// Position is never accumulated frame by frame. While playing it is
// extrapolated from an anchor (engine time, beat) at the anchored tempo, and
// the anchor is reset on play, seek, tempo change and loop wrap. Each tick
// fires the pending events that came due, publishes the position and commits
// sound events for the notes entering a short look-ahead window.

use std::collections::HashSet;

use crate::audio::engine::SoundEngine;
use crate::config::TransportConfig;
use crate::messaging::channels::{EventBus, EventConsumer};
use crate::messaging::notification::TransportEvent;
use crate::sequencer::composition::Composition;
use crate::sequencer::note::NoteId;
use crate::sequencer::scheduler::{Action, PendingEvents, ScheduledEvent};
use crate::sequencer::timeline::{DEFAULT_TEMPO, beat_to_time, time_to_beat};

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Not playing; the position may be anywhere (e.g. after a pause)
    #[default]
    Stopped,
    Playing,
}

impl TransportState {
    pub fn is_playing(&self) -> bool {
        matches!(self, TransportState::Playing)
    }
}

/// Snapshot of playback bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Last committed position in beats
    pub position: f64,
    /// Engine time (seconds) of the anchor
    pub anchor_time: f64,
    /// Beat position at `anchor_time`
    pub anchor_beat: f64,
}

/// Drives a `SoundEngine` from a `Composition`
pub struct Transport<E: SoundEngine> {
    engine: E,
    config: TransportConfig,
    state: PlaybackState,
    /// Tempo the current anchor extrapolates with
    anchor_tempo: f64,
    /// Composition length seen on the last query
    total_beats: f64,
    pending: PendingEvents,
    /// Notes whose events were committed since the last clear
    scheduled: HashSet<NoteId>,
    events: EventBus<TransportEvent>,
}

impl<E: SoundEngine> Transport<E> {
    pub fn new(engine: E, config: TransportConfig) -> Self {
        let config = config.validated();
        let events = EventBus::new(config.event_capacity);
        Self {
            engine,
            config,
            state: PlaybackState::default(),
            anchor_tempo: DEFAULT_TEMPO,
            total_beats: 0.0,
            pending: PendingEvents::new(),
            scheduled: HashSet::new(),
            events,
        }
    }

    /// Receive `play`, `pause`, `stop` and `positionChange` notifications
    pub fn subscribe(&mut self) -> EventConsumer<TransportEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct engine access, e.g. to audition a key press
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn state(&self) -> TransportState {
        if self.state.is_playing {
            TransportState::Playing
        } else {
            TransportState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    /// Position committed by the last tick, pause, stop or seek
    pub fn last_position(&self) -> f64 {
        self.state.position
    }

    /// Events committed but not yet fired
    pub fn pending_events(&self) -> impl Iterator<Item = &ScheduledEvent> + '_ {
        self.pending.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_scheduled(&self, id: NoteId) -> bool {
        self.scheduled.contains(&id)
    }

    /// STOPPED -> PLAYING. No-op while already playing.
    ///
    /// If the engine cannot be brought up the error is logged and the
    /// transport stays stopped.
    pub fn play(&mut self, composition: &Composition) {
        if self.state.is_playing {
            return;
        }
        if let Err(e) = self.engine.initialize() {
            log::error!("cannot start playback: {}", e);
            return;
        }
        if let Err(e) = self.engine.resume() {
            log::error!("cannot resume sound engine: {}", e);
            return;
        }

        let now = self.engine.current_time();
        self.total_beats = composition.total_beats();
        self.anchor(now, self.state.position, composition.tempo());
        self.state.is_playing = true;
        log::debug!("play from beat {:.3} at {:.3}s", self.state.position, now);
        self.events.publish(TransportEvent::Play);

        let position = self.current_position(composition);
        self.schedule_pass(composition, position);
    }

    /// PLAYING -> STOPPED, keeping the current position. No-op while stopped.
    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        let position = self.extrapolate(self.engine.current_time());
        self.halt();
        self.state.position = position;
        log::debug!("paused at beat {:.3}", position);
        self.events.publish(TransportEvent::Pause);
    }

    /// Any state -> STOPPED at beat 0.
    ///
    /// Not a no-op when already stopped: voices are silenced again and `stop`
    /// and `positionChange(0)` are published every time, so a paused playhead
    /// can be sent home.
    pub fn stop(&mut self) {
        self.halt();
        self.state.position = 0.0;
        log::debug!("stopped");
        self.events.publish(TransportEvent::Stop);
        self.events.publish(TransportEvent::PositionChange(0.0));
    }

    /// Play when stopped, pause when playing
    pub fn toggle(&mut self, composition: &Composition) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play(composition);
        }
    }

    /// Move the playhead to `beat`, clamped to the composition.
    ///
    /// While playing this is a pause followed by a play from the new position,
    /// so nothing committed for the old position survives.
    pub fn seek(&mut self, composition: &Composition, beat: f64) {
        let was_playing = self.state.is_playing;
        if was_playing {
            self.pause();
        }

        self.total_beats = composition.total_beats();
        let target = if beat.is_nan() {
            0.0
        } else {
            beat.clamp(0.0, self.total_beats)
        };
        self.state.position = target;
        log::debug!("seek to beat {:.3}", target);
        self.events.publish(TransportEvent::PositionChange(target));

        if was_playing {
            self.play(composition);
        }
    }

    /// Current position in beats.
    ///
    /// While playing this is derived from the engine clock. Reaching the end
    /// of the composition wraps to beat 0 and rebuilds the schedule; a tempo
    /// change since the last query re-anchors first.
    pub fn position(&mut self, composition: &Composition) -> f64 {
        let position = self.current_position(composition);
        if self.state.is_playing {
            self.state.position = position;
        }
        position
    }

    /// One step of the update cycle.
    ///
    /// Fires due events, publishes the position and runs a scheduling pass.
    /// Returns whether playback is still running; a stopped transport does
    /// nothing.
    pub fn tick(&mut self, composition: &Composition) -> bool {
        if !self.state.is_playing {
            return false;
        }
        self.dispatch_due();

        let position = self.current_position(composition);
        self.state.position = position;
        self.events.publish(TransportEvent::PositionChange(position));

        self.schedule_pass(composition, position);
        true
    }

    fn anchor(&mut self, time: f64, beat: f64, tempo: f64) {
        self.state.anchor_time = time;
        self.state.anchor_beat = beat;
        self.anchor_tempo = tempo;
    }

    /// Position at engine time `now` from the current anchor, without side
    /// effects; the end of the composition reads as beat 0.
    fn extrapolate(&self, now: f64) -> f64 {
        let beat = self.state.anchor_beat
            + time_to_beat(now - self.state.anchor_time, self.anchor_tempo);
        if beat >= self.total_beats {
            0.0
        } else {
            beat.max(0.0)
        }
    }

    fn current_position(&mut self, composition: &Composition) -> f64 {
        self.total_beats = composition.total_beats();
        if !self.state.is_playing {
            return self.state.position;
        }

        let now = self.engine.current_time();
        let tempo = composition.tempo();
        if tempo != self.anchor_tempo {
            let beat = self.state.anchor_beat
                + time_to_beat(now - self.state.anchor_time, self.anchor_tempo);
            log::debug!(
                "tempo {:.1} -> {:.1} BPM, re-anchoring at beat {:.3}",
                self.anchor_tempo,
                tempo,
                beat
            );
            self.rebase_to_tempo(now, beat, tempo);
        }

        let beat = self.state.anchor_beat + time_to_beat(now - self.state.anchor_time, tempo);
        if beat < self.total_beats {
            return beat.max(0.0);
        }

        log::debug!("end of composition at {:.3}s, looping to beat 0", now);
        self.release_and_clear();
        self.anchor(now, 0.0, tempo);
        self.schedule_pass(composition, 0.0);
        0.0
    }

    /// Commit events for every note entering the look-ahead window, then
    /// fire anything already due.
    fn schedule_pass(&mut self, composition: &Composition, position: f64) {
        let tempo = self.anchor_tempo;
        // The window stops at the loop point; the next pass starts at the wrap
        let window_end = (position + time_to_beat(self.config.look_ahead_secs, tempo))
            .min(self.total_beats);
        let (anchor_time, anchor_beat) = (self.state.anchor_time, self.state.anchor_beat);

        for note in composition.all_notes() {
            if self.scheduled.contains(&note.id)
                || note.end() <= position
                || note.start > window_end
                || note.start >= self.total_beats
            {
                continue;
            }
            let on_at = anchor_time + beat_to_time(note.start - anchor_beat, tempo);
            let off_at = anchor_time + beat_to_time(note.end() - anchor_beat, tempo);
            self.pending.insert(ScheduledEvent::note_on(
                note.id,
                on_at,
                note.pitch,
                note.velocity,
                off_at,
            ));
            self.scheduled.insert(note.id);
        }

        self.dispatch_due();
    }

    /// Fire every pending event due at the engine's current time. A note-on
    /// registers its note-off, which fires in the same call if already due.
    fn dispatch_due(&mut self) {
        let now = self.engine.current_time();
        loop {
            let due = self.pending.take_due(now);
            if due.is_empty() {
                break;
            }
            for event in due {
                self.fire(event);
            }
        }
    }

    fn fire(&mut self, event: ScheduledEvent) {
        match event.action {
            Action::NoteOn {
                pitch,
                velocity,
                off_at,
            } => {
                self.engine.note_on(pitch, velocity);
                self.pending
                    .insert(ScheduledEvent::note_off(event.note, off_at, pitch));
            }
            Action::NoteOff { pitch } => self.engine.note_off(pitch),
        }
    }

    /// Re-anchor at `beat` under a new tempo.
    ///
    /// Notes already sounding keep their voice; their note-off moves to the
    /// time the rest of the note takes at `tempo`. Note-ons not yet fired are
    /// dropped and come back with the next scheduling pass.
    fn rebase_to_tempo(&mut self, now: f64, beat: f64, tempo: f64) {
        let old_tempo = self.anchor_tempo;
        let sounding = self.pending.take_note_offs();
        self.clear_schedule();
        self.anchor(now, beat, tempo);

        for event in sounding {
            let remaining = time_to_beat(event.at - now, old_tempo).max(0.0);
            let at = now + beat_to_time(remaining, tempo);
            self.scheduled.insert(event.note);
            self.pending.insert(ScheduledEvent { at, ..event });
        }
    }

    /// Release voices still waiting for their note-off, then cancel the rest
    fn release_and_clear(&mut self) {
        for event in self.pending.take_note_offs() {
            self.fire(event);
        }
        self.clear_schedule();
    }

    fn clear_schedule(&mut self) {
        let cancelled = self.pending.clear();
        if cancelled > 0 {
            log::debug!("cancelled {} pending events", cancelled);
        }
        self.scheduled.clear();
    }

    /// Shared tail of pause and stop
    fn halt(&mut self) {
        self.state.is_playing = false;
        self.engine.all_off();
        self.clear_schedule();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioError;
    use crate::sequencer::note::Note;
    use ringbuf::traits::Consumer;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        On(u8),
        Off(u8),
        AllOff,
    }

    /// Engine whose clock only moves when the test says so
    #[derive(Default)]
    struct ManualEngine {
        now: f64,
        fail_init: bool,
        calls: Vec<(f64, Call)>,
    }

    impl SoundEngine for ManualEngine {
        fn initialize(&mut self) -> Result<(), AudioError> {
            if self.fail_init {
                Err(AudioError::NoDevice)
            } else {
                Ok(())
            }
        }

        fn resume(&mut self) -> Result<(), AudioError> {
            Ok(())
        }

        fn note_on(&mut self, pitch: u8, _velocity: u8) {
            self.calls.push((self.now, Call::On(pitch)));
        }

        fn note_off(&mut self, pitch: u8) {
            self.calls.push((self.now, Call::Off(pitch)));
        }

        fn all_off(&mut self) {
            self.calls.push((self.now, Call::AllOff));
        }

        fn current_time(&self) -> f64 {
            self.now
        }
    }

    fn transport() -> Transport<ManualEngine> {
        Transport::new(ManualEngine::default(), TransportConfig::default())
    }

    /// Move the clock to `time` and run one tick
    fn tick_at(transport: &mut Transport<ManualEngine>, comp: &Composition, time: f64) {
        transport.engine_mut().now = time;
        transport.tick(comp);
    }

    fn ons(transport: &Transport<ManualEngine>) -> Vec<u8> {
        transport
            .engine()
            .calls
            .iter()
            .filter_map(|(_, c)| match c {
                Call::On(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn calls(transport: &Transport<ManualEngine>) -> Vec<Call> {
        transport.engine().calls.iter().map(|(_, c)| c.clone()).collect()
    }

    #[test]
    fn test_initial_state() {
        let transport = transport();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert!(!transport.state().is_playing());
        assert_eq!(transport.last_position(), 0.0);
        assert_eq!(transport.pending_count(), 0);
    }

    #[test]
    fn test_play_fires_note_at_anchor() {
        let mut comp = Composition::new();
        let id = comp.add_note(Note::new(60, 0.0, 1.0, 100));
        let mut transport = transport();

        transport.play(&comp);

        assert!(transport.is_playing());
        assert!(transport.is_scheduled(id));
        assert_eq!(ons(&transport), vec![60]);
        // Only the note-off is left waiting
        assert_eq!(transport.pending_count(), 1);
    }

    #[test]
    fn test_note_off_fires_after_duration() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 0.0, 1.0, 100));
        let mut transport = transport();
        transport.play(&comp);

        tick_at(&mut transport, &comp, 0.4);
        assert_eq!(calls(&transport), vec![Call::On(60)]);

        tick_at(&mut transport, &comp, 0.51);
        assert_eq!(calls(&transport), vec![Call::On(60), Call::Off(60)]);
    }

    #[test]
    fn test_notes_beyond_look_ahead_wait() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(64, 2.0, 1.0, 100));
        let mut transport = transport();
        transport.play(&comp);
        assert_eq!(transport.pending_count(), 0);

        // Beat 2 is 1.0s away at 120 BPM and the window is 0.1s
        tick_at(&mut transport, &comp, 0.8);
        assert_eq!(transport.pending_count(), 0);

        tick_at(&mut transport, &comp, 0.95);
        assert_eq!(transport.pending_count(), 1);
        assert!(ons(&transport).is_empty());

        tick_at(&mut transport, &comp, 1.01);
        assert_eq!(ons(&transport), vec![64]);
    }

    #[test]
    fn test_repeated_passes_do_not_duplicate() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 0.1, 1.0, 100));
        let mut transport = transport();
        transport.play(&comp);

        for _ in 0..5 {
            transport.tick(&comp);
        }
        assert_eq!(transport.pending_count(), 1);

        tick_at(&mut transport, &comp, 0.06);
        tick_at(&mut transport, &comp, 0.07);
        tick_at(&mut transport, &comp, 0.08);
        assert_eq!(ons(&transport), vec![60]);
    }

    #[test]
    fn test_play_is_idempotent() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 0.0, 1.0, 100));
        let mut transport = transport();
        let mut events = transport.subscribe();

        transport.play(&comp);
        let anchor = transport.playback_state();
        transport.engine_mut().now = 0.2;
        transport.play(&comp);

        assert_eq!(transport.playback_state().anchor_time, anchor.anchor_time);
        assert_eq!(ons(&transport), vec![60]);
        let plays = std::iter::from_fn(|| events.try_pop())
            .filter(|e| *e == TransportEvent::Play)
            .count();
        assert_eq!(plays, 1);
    }

    #[test]
    fn test_pause_freezes_position_and_cancels() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 0.0, 4.0, 100));
        comp.add_note(Note::new(62, 0.2, 1.0, 100));
        let mut transport = transport();
        transport.play(&comp);
        tick_at(&mut transport, &comp, 0.05);
        assert_eq!(transport.pending_count(), 2);

        transport.engine_mut().now = 0.25;
        transport.pause();

        assert_eq!(transport.state(), TransportState::Stopped);
        assert!((transport.last_position() - 0.5).abs() < 1e-9);
        assert_eq!(transport.pending_count(), 0);
        assert_eq!(transport.engine().calls.last(), Some(&(0.25, Call::AllOff)));

        let before = transport.engine().calls.len();
        tick_at(&mut transport, &comp, 5.0);
        assert_eq!(transport.engine().calls.len(), before);
        assert!((transport.position(&comp) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_resume_after_pause_continues_from_position() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(62, 1.0, 1.0, 100));
        let mut transport = transport();
        transport.play(&comp);
        transport.engine_mut().now = 0.25;
        transport.pause();

        transport.engine_mut().now = 10.0;
        transport.play(&comp);
        assert_eq!(transport.playback_state().anchor_time, 10.0);
        assert!((transport.playback_state().anchor_beat - 0.5).abs() < 1e-9);

        tick_at(&mut transport, &comp, 10.2);
        assert!(ons(&transport).is_empty());
        tick_at(&mut transport, &comp, 10.26);
        assert_eq!(ons(&transport), vec![62]);
    }

    #[test]
    fn test_pause_while_stopped_is_noop() {
        let mut transport = transport();
        let mut events = transport.subscribe();
        transport.pause();
        assert!(events.try_pop().is_none());
        assert!(transport.engine().calls.is_empty());
    }

    #[test]
    fn test_stop_resets_position() {
        let comp = Composition::new();
        let mut transport = transport();
        transport.seek(&comp, 8.0);
        let mut events = transport.subscribe();

        transport.stop();

        assert_eq!(transport.last_position(), 0.0);
        assert_eq!(events.try_pop(), Some(TransportEvent::Stop));
        assert_eq!(events.try_pop(), Some(TransportEvent::PositionChange(0.0)));
    }

    #[test]
    fn test_seek_clamps() {
        let comp = Composition::new();
        let mut transport = transport();

        transport.seek(&comp, -3.0);
        assert_eq!(transport.last_position(), 0.0);
        transport.seek(&comp, 1000.0);
        assert_eq!(transport.last_position(), comp.total_beats());
        transport.seek(&comp, f64::NAN);
        assert_eq!(transport.last_position(), 0.0);
    }

    #[test]
    fn test_seek_while_playing_skips_earlier_notes() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 0.0, 1.0, 100));
        comp.add_note(Note::new(62, 4.0, 1.0, 100));
        comp.add_note(Note::new(64, 5.0, 1.0, 100));
        let mut transport = transport();
        transport.play(&comp);
        transport.engine_mut().calls.clear();

        transport.seek(&comp, 5.0);
        for i in 1..=8 {
            tick_at(&mut transport, &comp, i as f64 * 0.05);
        }

        assert!(transport.is_playing());
        assert_eq!(transport.engine().calls[0].1, Call::AllOff);
        assert_eq!(ons(&transport), vec![64]);
    }

    #[test]
    fn test_wrap_reschedules_first_note() {
        let mut comp = Composition::new();
        comp.set_bars(1);
        comp.add_note(Note::new(60, 0.0, 0.5, 100));
        let mut transport = transport();
        transport.play(&comp);

        // 4 beats at 120 BPM last 2 seconds
        for i in 1..=39 {
            tick_at(&mut transport, &comp, i as f64 * 0.05);
        }
        assert_eq!(ons(&transport), vec![60]);

        tick_at(&mut transport, &comp, 2.01);
        assert!(transport.last_position() < 0.1);
        assert!((transport.playback_state().anchor_time - 2.01).abs() < 1e-9);
        assert_eq!(ons(&transport), vec![60, 60]);
    }

    #[test]
    fn test_wrap_releases_pending_offs() {
        let mut comp = Composition::new();
        comp.set_bars(1);
        // Runs past the end of the composition
        comp.add_note(Note::new(67, 3.5, 2.0, 100));
        let mut transport = transport();
        transport.seek(&comp, 3.5);
        transport.play(&comp);
        assert_eq!(ons(&transport), vec![67]);

        tick_at(&mut transport, &comp, 0.3);
        assert_eq!(transport.last_position(), 0.0);
        assert_eq!(calls(&transport), vec![Call::On(67), Call::Off(67)]);
        assert_eq!(transport.pending_count(), 0);
    }

    #[test]
    fn test_tempo_change_reanchors() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 2.0, 1.0, 100));
        let mut transport = transport();
        transport.play(&comp);
        tick_at(&mut transport, &comp, 0.5);
        assert!((transport.last_position() - 1.0).abs() < 1e-9);

        comp.set_tempo(60.0);
        tick_at(&mut transport, &comp, 0.5);
        assert_eq!(transport.playback_state().anchor_time, 0.5);
        assert!((transport.playback_state().anchor_beat - 1.0).abs() < 1e-9);

        // One beat per second from here on
        tick_at(&mut transport, &comp, 1.0);
        assert!((transport.last_position() - 1.5).abs() < 1e-9);

        // Would have been due at 1.0s at the old tempo
        tick_at(&mut transport, &comp, 1.2);
        tick_at(&mut transport, &comp, 1.45);
        assert!(ons(&transport).is_empty());

        tick_at(&mut transport, &comp, 1.51);
        assert_eq!(ons(&transport), vec![60]);
    }

    #[test]
    fn test_tempo_change_keeps_held_note() {
        let mut comp = Composition::new();
        let id = comp.add_note(Note::new(60, 0.0, 8.0, 100));
        let mut transport = transport();
        transport.play(&comp);
        tick_at(&mut transport, &comp, 1.0);

        // Beat 2 of 8; the remaining 6 beats take 6s at 60 BPM
        comp.set_tempo(60.0);
        tick_at(&mut transport, &comp, 1.0);
        assert!(transport.is_scheduled(id));
        assert_eq!(transport.pending_count(), 1);

        for time in [1.5, 3.0, 5.0, 6.9] {
            tick_at(&mut transport, &comp, time);
        }
        assert_eq!(calls(&transport), vec![Call::On(60)]);

        tick_at(&mut transport, &comp, 7.01);
        assert_eq!(calls(&transport), vec![Call::On(60), Call::Off(60)]);
    }

    #[test]
    fn test_notes_past_the_end_never_sound() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 0.0, 0.5, 100));
        comp.add_note(Note::new(72, 4.0, 1.0, 100));
        comp.set_bars(1);
        let mut transport = transport();
        transport.play(&comp);

        for time in [0.5, 1.0, 1.5, 1.95, 2.01] {
            tick_at(&mut transport, &comp, time);
        }
        assert!(transport.last_position() < 0.1);
        assert_eq!(ons(&transport), vec![60, 60]);
    }

    #[test]
    fn test_invalid_look_ahead_falls_back() {
        let mut comp = Composition::new();
        for beat in 0..60 {
            comp.add_note(Note::new(60, beat as f64, 0.5, 100));
        }
        let config = TransportConfig {
            look_ahead_secs: f64::NAN,
            ..Default::default()
        };
        let mut transport = Transport::new(ManualEngine::default(), config);
        assert_eq!(transport.config().look_ahead_secs, 0.1);

        transport.play(&comp);
        // Only the first note's off is waiting
        assert_eq!(transport.pending_count(), 1);
    }

    #[test]
    fn test_failed_initialize_stays_stopped() {
        let comp = Composition::new();
        let engine = ManualEngine {
            fail_init: true,
            ..Default::default()
        };
        let mut transport = Transport::new(engine, TransportConfig::default());
        let mut events = transport.subscribe();

        transport.play(&comp);
        assert!(!transport.is_playing());
        assert!(!transport.tick(&comp));
        assert!(events.try_pop().is_none());
    }

    #[test]
    fn test_toggle() {
        let comp = Composition::new();
        let mut transport = transport();

        transport.toggle(&comp);
        assert!(transport.is_playing());
        transport.toggle(&comp);
        assert!(!transport.is_playing());
    }

    #[test]
    fn test_back_to_back_same_pitch() {
        let mut comp = Composition::new();
        comp.add_note(Note::new(60, 0.0, 0.5, 100));
        comp.add_note(Note::new(60, 0.5, 0.5, 100));
        let mut transport = transport();
        transport.play(&comp);
        for time in [0.1, 0.2, 0.26, 0.3, 0.4] {
            tick_at(&mut transport, &comp, time);
        }

        assert_eq!(
            calls(&transport),
            vec![Call::On(60), Call::Off(60), Call::On(60)]
        );
    }
}
