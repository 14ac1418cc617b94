pub(crate) mod audiooutput;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod event;
pub(crate) mod intervaltimer;
pub(crate) mod osc;
pub(crate) mod playbackstate;
pub(crate) mod sdlplayer;
pub(crate) mod surface;
pub(crate) mod synth;
pub(crate) mod turntable;

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use config::TurntableConfig;
use event::Event;
use intervaltimer::ThreadScheduler;
use sdlplayer::SDLPlayer;
use turntable::Turntable;

use crate::osc::OscReceiver;
use crate::osc::OscSender;

#[derive(Parser)]
struct Cli {
    /// Configuration file (toml, json or yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,

    /// Address to receive control surface input on
    #[arg(short, long, value_name = "ADDR")]
    listen: Option<SocketAddr>,

    /// Address to send surface feedback to
    #[arg(short, long, value_name = "ADDR")]
    feedback: Option<SocketAddr>,
}

fn load_config(args: &Cli) -> error::Result<TurntableConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => TurntableConfig::load(path)?,
        None => TurntableConfig::default(),
    };

    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(feedback) = args.feedback {
        config.feedback_addr = feedback;
    }

    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => panic!("Cannot load configuration: {}", err),
    };

    let (events, event_loop) = mpsc::channel();

    let unload = events.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        let _ = unload.send(Event::Unload);
    }) {
        panic!("Cannot install shutdown handler: {}", err);
    }

    let player = match SDLPlayer::new(config.sample_rate) {
        Ok(player) => player,
        Err(err) => panic!("Cannot set up audio output: {}", err),
    };

    let osc_sender = match OscSender::new(config.feedback_addr) {
        Ok(osc_sender) => osc_sender,
        Err(msg) => panic!("Cannot set up OSC: {}", msg),
    };

    let osc_receiver = match OscReceiver::new(config.listen_addr, events.clone()) {
        Ok(osc_receiver) => osc_receiver,
        Err(msg) => panic!("Cannot set up OSC: {}", msg),
    };

    let res = thread::Builder::new()
        .name("OSC".to_string())
        .spawn(move || {
            osc_receiver.run();
        });
    if let Err(error) = res {
        panic!("Failed to create thread: {}", error);
    }

    let scheduler = ThreadScheduler::new(events);
    let mut turntable = Turntable::new(&config, player, osc_sender, scheduler);

    for event in event_loop.iter() {
        if turntable.handle(event).is_break() {
            break;
        }
    }

    turntable.dispose();
}
