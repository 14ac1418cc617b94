// Square-wave tone generator for the arpeggio. Runs inside the audio callback.

pub const PEAK_GAIN: f32 = 0.65;
pub const FLOOR_GAIN: f32 = 0.001;
const ATTACK_END_SECS: f32 = 0.02;
const DECAY_END_SECS: f32 = 0.24;
const TONE_LENGTH_SECS: f32 = 0.26;
const GAIN_TIME_CONSTANT_SECS: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthCommand {
    PlayTone(f32),
    SetGain(f32),
}

/// Envelope value `secs` after the tone started: linear attack, exponential
/// decay down to the floor, then held until the tone stops.
pub fn envelope(secs: f32) -> f32 {
    if secs < ATTACK_END_SECS {
        PEAK_GAIN * secs / ATTACK_END_SECS
    } else if secs < DECAY_END_SECS {
        let progress = (secs - ATTACK_END_SECS) / (DECAY_END_SECS - ATTACK_END_SECS);
        PEAK_GAIN * (FLOOR_GAIN / PEAK_GAIN).powf(progress)
    } else {
        FLOOR_GAIN
    }
}

pub struct Tone {
    phase: f32,
    phase_increment: f32,
    age: u32,
    length: u32,
    sample_rate: f32,
}

impl Tone {
    pub fn new(frequency: f32, sample_rate: f32) -> Tone {
        Tone {
            phase: 0.0,
            phase_increment: frequency / sample_rate,
            age: 0,
            length: (TONE_LENGTH_SECS * sample_rate).round() as u32,
            sample_rate,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.age >= self.length
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }

        let square = if self.phase < 0.5 { 1.0 } else { -1.0 };
        let sample = square * envelope(self.age as f32 / self.sample_rate);

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        self.age += 1;

        sample
    }
}

/// Master gain that approaches its target exponentially instead of jumping.
pub struct MasterGain {
    value: f32,
    target: f32,
    coefficient: f32,
}

impl MasterGain {
    pub fn new(value: f32, sample_rate: f32) -> MasterGain {
        MasterGain {
            value,
            target: value,
            coefficient: 1.0 - (-1.0 / (GAIN_TIME_CONSTANT_SECS * sample_rate)).exp(),
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    #[cfg(test)]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn next_value(&mut self) -> f32 {
        self.value += (self.target - self.value) * self.coefficient;
        self.value
    }
}

pub struct Synth {
    sample_rate: f32,
    tones: Vec<Tone>,
    gain: MasterGain,
}

impl Synth {
    pub fn new(sample_rate: f32) -> Synth {
        Synth {
            sample_rate,
            tones: Vec::with_capacity(8),
            gain: MasterGain::new(PEAK_GAIN, sample_rate),
        }
    }

    pub fn apply(&mut self, command: SynthCommand) {
        match command {
            SynthCommand::PlayTone(frequency) => {
                self.tones.push(Tone::new(frequency, self.sample_rate))
            }
            SynthCommand::SetGain(gain) => self.gain.set_target(gain),
        }
    }

    #[cfg(test)]
    pub fn active_tones(&self) -> usize {
        self.tones.len()
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let mix: f32 = self.tones.iter_mut().map(|tone| tone.next_sample()).sum();
            *sample = (mix * self.gain.next_value()).clamp(-1.0, 1.0);
        }

        self.tones.retain(|tone| !tone.is_finished());
    }
}
