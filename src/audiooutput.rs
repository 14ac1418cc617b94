use crate::error::Result;

/// Where the turntable's tones end up.
pub trait AudioOutput {
    /// Start or unsuspend output. Tones played while suspended are silent.
    fn resume(&mut self) -> Result<()>;
    /// Fire-and-forget: the tone runs its envelope to the end on its own.
    fn play_tone(&mut self, frequency: f32);
    /// Target for the shared output gain, 0.0 to 1.0.
    fn set_gain(&mut self, gain: f32);
    fn close(&mut self);
}
