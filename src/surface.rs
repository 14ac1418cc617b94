use crate::playbackstate::TonearmPose;

/// The visible parts of the turntable.
pub trait Surface {
    fn set_record_spinning(&mut self, spinning: bool);
    fn set_tonearm_pose(&mut self, pose: TonearmPose);
    fn set_tonearm_dragging(&mut self, dragging: bool);
    /// Highlight the speed button for `speed`, clearing all others.
    fn set_active_speed(&mut self, speed: f32);
    fn set_dial_rotation(&mut self, degrees: f32);
    fn set_readout(&mut self, text: &str);
}
