extern crate sdl2;

use sdl2::{audio::*, AudioSubsystem, Sdl};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::audiooutput::AudioOutput;
use crate::error::{Error, Result};
use crate::synth::{Synth, SynthCommand};

struct SynthCallback {
    synth: Synth,
    commands: Receiver<SynthCommand>,
}

impl AudioCallback for SynthCallback {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        while let Ok(command) = self.commands.try_recv() {
            self.synth.apply(command);
        }

        self.synth.render(out);
    }
}

pub struct SDLPlayer {
    _sdl_context: Sdl,
    _sdl_audio: AudioSubsystem,
    device: Option<AudioDevice<SynthCallback>>,
    commands: Sender<SynthCommand>,
}

impl SDLPlayer {
    pub fn new(sample_rate: u32) -> Result<SDLPlayer> {
        let sdl_context = sdl2::init().map_err(Error::Audio)?;
        let sdl_audio = sdl_context.audio().map_err(Error::Audio)?;
        let desired_spec = AudioSpecDesired {
            freq: Some(sample_rate as i32),
            channels: Some(1),
            samples: None, // Default sample buffer size
        };

        let (commands, receiver) = mpsc::channel();
        let device = sdl_audio
            .open_playback(None, &desired_spec, |spec| {
                log::info!(
                    "Opened audio device at {} Hz, {} channel(s)",
                    spec.freq,
                    spec.channels
                );

                SynthCallback {
                    synth: Synth::new(spec.freq as f32),
                    commands: receiver,
                }
            })
            .map_err(Error::Audio)?;

        // Paused until the first user gesture, like a suspended audio context.
        Ok(SDLPlayer {
            _sdl_context: sdl_context,
            _sdl_audio: sdl_audio,
            device: Some(device),
            commands,
        })
    }

    fn send(&self, command: SynthCommand) {
        if self.commands.send(command).is_err() {
            log::debug!("Audio callback is gone, dropping {:?}", command);
        }
    }
}

impl AudioOutput for SDLPlayer {
    fn resume(&mut self) -> Result<()> {
        match &self.device {
            Some(device) => {
                device.resume();
                Ok(())
            }
            None => Err(Error::AudioClosed),
        }
    }

    fn play_tone(&mut self, frequency: f32) {
        self.send(SynthCommand::PlayTone(frequency));
    }

    fn set_gain(&mut self, gain: f32) {
        self.send(SynthCommand::SetGain(gain));
    }

    fn close(&mut self) {
        if let Some(device) = self.device.take() {
            device.pause();
            log::info!("Closed audio device");
        }
    }
}
