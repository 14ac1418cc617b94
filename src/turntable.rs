use std::ops::ControlFlow;
use std::time::Duration;

use crate::audiooutput::AudioOutput;
use crate::config::TurntableConfig;
use crate::event::{Event, Pointer};
use crate::intervaltimer::{Scheduler, TimerId};
use crate::playbackstate::{PlaybackState, TonearmPose, VolumeLevel};
use crate::surface::Surface;

/// How far along its track the tonearm has to be to reach the record.
const PLAY_THRESHOLD: f32 = 0.64;

/// Drives the record, the tonearm and the arpeggio from control surface
/// events. Holds at most one sequencer registration at a time.
pub struct Turntable<A: AudioOutput, S: Surface, T: Scheduler> {
    state: PlaybackState,
    timer: Option<TimerId>,
    base_interval_ms: f64,
    speeds: Vec<f32>,
    audio: A,
    surface: S,
    scheduler: T,
    disposed: bool,
}

impl<A: AudioOutput, S: Surface, T: Scheduler> Turntable<A, S, T> {
    pub fn new(config: &TurntableConfig, audio: A, surface: S, scheduler: T) -> Self {
        let mut turntable = Turntable {
            state: PlaybackState::new(),
            timer: None,
            base_interval_ms: config.base_interval_ms,
            speeds: config.speeds.clone(),
            audio,
            surface,
            scheduler,
            disposed: false,
        };

        turntable.surface.set_active_speed(turntable.state.current_speed);
        turntable.on_volume_input(config.initial_volume);
        turntable
    }

    pub fn handle(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::SpeedButton(speed) => self.on_speed_button(speed),
            Event::VolumeInput(raw) => self.on_volume_input(raw),
            Event::PointerDown(pointer) => self.on_pointer_down(pointer),
            Event::PointerMove(pointer) => self.on_pointer_move(pointer),
            Event::PointerUp => self.on_pointer_up(),
            Event::SpineClick(album) => self.on_spine_click(&album),
            Event::Tick(id) => self.on_tick(id),
            Event::Unload => {
                self.dispose();
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    pub fn set_speed(&mut self, speed: f32) {
        log::debug!("Speed set to {}", speed);
        self.state.current_speed = speed;
        self.surface.set_active_speed(speed);

        if speed == 0.0 {
            self.set_playing(false);
            self.state.tonearm_down = false;
            self.surface.set_tonearm_pose(TonearmPose::Resting);
            return;
        }

        if self.state.tonearm_down {
            self.set_playing(true);
        }
    }

    pub fn set_playing(&mut self, next_state: bool) {
        self.state.is_playing = next_state && self.state.current_speed != 0.0;
        let playing = self.state.is_playing;
        log::debug!("Playing: {}", playing);

        self.surface.set_record_spinning(playing);
        self.state.tonearm_down = playing;
        self.surface.set_tonearm_pose(if playing {
            TonearmPose::Lowered
        } else {
            TonearmPose::Resting
        });

        self.restart_sequencer();
    }

    pub fn restart_sequencer(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }

        if !self.state.is_effectively_playing() {
            return;
        }

        match self.scheduler.schedule(self.step_period()) {
            Ok(id) => self.timer = Some(id),
            Err(err) => log::error!("Cannot start sequencer: {}", err),
        }
        self.play_step();
    }

    pub fn play_step(&mut self) {
        // A tick can still arrive after playback stopped.
        if !self.state.is_effectively_playing() {
            return;
        }

        let note = self.state.advance();
        log::trace!("Step {}: {} Hz", self.state.sequence_index, note);
        self.audio.play_tone(note);
    }

    fn step_period(&self) -> Duration {
        let nanos = self.base_interval_ms * 1_000_000.0 / self.state.current_speed as f64;
        Duration::from_nanos(nanos.round() as u64)
    }

    pub fn on_volume_input(&mut self, raw: f32) {
        let volume = VolumeLevel::from_raw(raw);
        self.audio.set_gain(volume.gain());
        self.surface.set_dial_rotation(volume.rotation_degrees());
    }

    pub fn on_speed_button(&mut self, speed: f32) {
        if !self.speeds.contains(&speed) {
            log::warn!("Ignoring unknown speed {}", speed);
            return;
        }

        self.resume_audio();
        self.set_speed(speed);
    }

    pub fn on_spine_click(&mut self, album: &str) {
        self.surface.set_readout(&format!("Reading spine: {album}"));
    }

    pub fn on_pointer_down(&mut self, pointer: Pointer) {
        self.resume_audio();
        self.state.dragging = true;
        self.surface.set_tonearm_dragging(true);
        self.update_tonearm_from_pointer(pointer);
    }

    pub fn on_pointer_move(&mut self, pointer: Pointer) {
        if !self.state.dragging {
            return;
        }

        self.update_tonearm_from_pointer(pointer);
    }

    /// Ends a drag. The tonearm stays wherever the drag left it.
    pub fn on_pointer_up(&mut self) {
        self.state.dragging = false;
        self.surface.set_tonearm_dragging(false);
    }

    pub fn on_tick(&mut self, id: TimerId) {
        if self.timer == Some(id) {
            self.play_step();
        } else {
            log::trace!("Dropping tick from cancelled sequencer {:?}", id);
        }
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
        self.audio.close();
        self.disposed = true;
        log::info!("Turntable stopped");
    }

    fn update_tonearm_from_pointer(&mut self, pointer: Pointer) {
        let on_record = pointer.ratio() > PLAY_THRESHOLD && self.state.current_speed != 0.0;
        self.set_playing(on_record);
    }

    fn resume_audio(&mut self) {
        if let Err(err) = self.audio.resume() {
            log::warn!("Cannot resume audio output: {}", err);
        }
    }
}
