/// The arpeggio played while the record spins, in Hz.
pub const NOTES: [f32; 8] = [261.63, 293.66, 329.63, 392.0, 329.63, 293.66, 261.63, 220.0];

pub struct PlaybackState {
    pub is_playing: bool,
    pub current_speed: f32,
    pub sequence_index: u64,
    pub tonearm_down: bool,
    pub dragging: bool,
}

impl PlaybackState {
    pub fn new() -> PlaybackState {
        PlaybackState {
            is_playing: false,
            current_speed: 1.0,
            sequence_index: 0,
            tonearm_down: false,
            dragging: false,
        }
    }

    pub fn is_effectively_playing(&self) -> bool {
        self.is_playing && self.current_speed != 0.0
    }

    /// Returns the note for the current step and moves on to the next one.
    pub fn advance(&mut self) -> f32 {
        let note = NOTES[(self.sequence_index % NOTES.len() as u64) as usize];
        self.sequence_index += 1;
        note
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeLevel {
    gain: f32,
}

impl VolumeLevel {
    pub fn from_raw(raw: f32) -> VolumeLevel {
        let raw = if raw.is_finite() { raw.clamp(0.0, 100.0) } else { 0.0 };
        VolumeLevel { gain: raw / 100.0 }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.gain * 260.0 - 130.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonearmPose {
    Resting,
    Lowered,
}

impl TonearmPose {
    pub fn aria_value(&self) -> &'static str {
        match self {
            TonearmPose::Resting => "0",
            TonearmPose::Lowered => "1",
        }
    }

    pub fn transform(&self) -> &'static str {
        match self {
            TonearmPose::Resting => "rotate(-36deg)",
            TonearmPose::Lowered => "rotate(8deg)",
        }
    }
}
