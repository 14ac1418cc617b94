use crate::intervaltimer::TimerId;

/// Horizontal extent of the tonearm's track in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRect {
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub track: TrackRect,
}

impl Pointer {
    /// Position of the pointer along the track, clamped to 0..=1.
    pub fn ratio(&self) -> f32 {
        let ratio = (self.x - self.track.left) / self.track.width;
        if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SpeedButton(f32),
    VolumeInput(f32),
    PointerDown(Pointer),
    PointerMove(Pointer),
    PointerUp,
    SpineClick(String),
    Tick(TimerId),
    Unload,
}
