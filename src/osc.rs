use std::{
    net::{SocketAddr, UdpSocket},
    sync::mpsc::Sender,
};

use rosc::{decoder, encoder, OscMessage, OscPacket, OscType};

use crate::error::Result;
use crate::event::{Event, Pointer, TrackRect};
use crate::playbackstate::TonearmPose;
use crate::surface::Surface;

pub struct OscSender {
    sock: UdpSocket,
    dst_addr: SocketAddr,
}

pub struct OscReceiver {
    sock: UdpSocket,
    events: Sender<Event>,
}

impl OscSender {
    pub fn new(dst_addr: SocketAddr) -> Result<Self> {
        let sock = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0)))?;

        Ok(OscSender { sock, dst_addr })
    }

    fn send(&self, addr: &str, arg: OscType) {
        let packet = OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args: vec![arg],
        });

        let msg_buf = match encoder::encode(&packet) {
            Ok(msg_buf) => msg_buf,
            Err(err) => {
                log::warn!("Cannot encode {}: {:?}", addr, err);
                return;
            }
        };

        if let Err(err) = self.sock.send_to(&msg_buf, self.dst_addr) {
            log::warn!("Cannot send {} to {}: {}", addr, self.dst_addr, err);
        }
    }

    fn send_string(&self, addr: &str, value: &str) {
        self.send(addr, OscType::String(value.to_string()));
    }
}

impl Surface for OscSender {
    fn set_record_spinning(&mut self, spinning: bool) {
        let play_state = if spinning { "running" } else { "paused" };
        self.send_string("/turntable/record/animationPlayState", play_state);
    }

    fn set_tonearm_pose(&mut self, pose: TonearmPose) {
        self.send_string("/turntable/tonearm/ariaValueNow", pose.aria_value());
        self.send_string("/turntable/tonearm/transform", pose.transform());
    }

    fn set_tonearm_dragging(&mut self, dragging: bool) {
        self.send("/turntable/tonearm/dragging", OscType::Int(dragging as i32));
    }

    fn set_active_speed(&mut self, speed: f32) {
        self.send("/turntable/speed/active", OscType::Float(speed));
    }

    fn set_dial_rotation(&mut self, degrees: f32) {
        self.send_string(
            "/turntable/volumeDial/transform",
            &format!("rotate({degrees}deg)"),
        );
    }

    fn set_readout(&mut self, text: &str) {
        self.send_string("/turntable/albumReadout/textContent", text);
    }
}

impl OscReceiver {
    pub fn new(listen_addr: SocketAddr, events: Sender<Event>) -> Result<Self> {
        let sock = UdpSocket::bind(listen_addr)?;
        log::info!("Listening for OSC input on {}", listen_addr);

        Ok(OscReceiver { sock, events })
    }

    pub fn run(&self) {
        let mut buf = [0u8; rosc::decoder::MTU];

        loop {
            match self.sock.recv_from(&mut buf) {
                Ok((size, addr)) => {
                    log::trace!("Received packet with size {} from: {}", size, addr);
                    match decoder::decode(&buf[..size]) {
                        Ok(packet) => {
                            if !self.handle_packet(packet) {
                                break;
                            }
                        }
                        Err(err) => log::warn!("Malformed OSC packet from {}: {:?}", addr, err),
                    }
                }
                Err(e) => {
                    log::error!("Error receiving from socket: {}", e);
                    break;
                }
            }
        }
    }

    /// Returns false once the event loop has gone away.
    fn handle_packet(&self, packet: OscPacket) -> bool {
        match packet {
            OscPacket::Message(msg) => match parse_message(&msg) {
                Ok(Some(event)) => self.events.send(event).is_ok(),
                Ok(None) => {
                    log::debug!("Ignoring OSC address {} {:?}", msg.addr, msg.args);
                    true
                }
                Err(err) => {
                    log::warn!("{}", err);
                    true
                }
            },
            OscPacket::Bundle(bundle) => bundle
                .content
                .into_iter()
                .all(|packet| self.handle_packet(packet)),
        }
    }
}

/// Translates one control surface message into an event. Unknown addresses
/// yield `Ok(None)`.
pub fn parse_message(msg: &OscMessage) -> std::result::Result<Option<Event>, String> {
    let event = match msg.addr.as_str() {
        "/turntable/speed" => Event::SpeedButton(float_argument(msg, 0)?),
        "/turntable/volume" => Event::VolumeInput(float_argument(msg, 0)?),
        "/turntable/tonearm/pointerdown" => Event::PointerDown(pointer_arguments(msg)?),
        "/turntable/tonearm/pointermove" => Event::PointerMove(pointer_arguments(msg)?),
        "/turntable/tonearm/pointerup" | "/turntable/tonearm/pointercancel" => Event::PointerUp,
        "/turntable/spine" => match msg.args.first() {
            Some(OscType::String(album)) => Event::SpineClick(album.clone()),
            Some(arg) => {
                return Err(format!(
                    "{} Unexpected OSC parameter type: {:?}",
                    msg.addr, arg
                ))
            }
            None => return Err(format!("{} Missing OSC parameter: string", msg.addr)),
        },
        _ => return Ok(None),
    };

    Ok(Some(event))
}

fn float_argument(msg: &OscMessage, index: usize) -> std::result::Result<f32, String> {
    match msg.args.get(index) {
        Some(OscType::Float(value)) => Ok(*value),
        Some(OscType::Double(value)) => Ok(*value as f32),
        Some(OscType::Int(value)) => Ok(*value as f32),
        Some(arg) => Err(format!(
            "{} Unexpected OSC parameter type: {:?}",
            msg.addr, arg
        )),
        None => Err(format!("{} Missing OSC parameter: float", msg.addr)),
    }
}

fn pointer_arguments(msg: &OscMessage) -> std::result::Result<Pointer, String> {
    if msg.args.len() != 3 {
        return Err(format!(
            "{} expected three float parameters: x, left, width",
            msg.addr
        ));
    }

    Ok(Pointer {
        x: float_argument(msg, 0)?,
        track: TrackRect {
            left: float_argument(msg, 1)?,
            width: float_argument(msg, 2)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(addr: &str, args: Vec<OscType>) -> OscMessage {
        OscMessage {
            addr: addr.to_string(),
            args,
        }
    }

    #[test]
    fn parses_speed_as_float_or_int() {
        let float = message("/turntable/speed", vec![OscType::Float(2.0)]);
        assert_eq!(parse_message(&float), Ok(Some(Event::SpeedButton(2.0))));

        let int = message("/turntable/speed", vec![OscType::Int(0)]);
        assert_eq!(parse_message(&int), Ok(Some(Event::SpeedButton(0.0))));
    }

    #[test]
    fn parses_pointer_events() {
        let args = vec![
            OscType::Float(170.0),
            OscType::Float(100.0),
            OscType::Float(100.0),
        ];
        let expected = Pointer {
            x: 170.0,
            track: TrackRect {
                left: 100.0,
                width: 100.0,
            },
        };

        let down = message("/turntable/tonearm/pointerdown", args.clone());
        assert_eq!(parse_message(&down), Ok(Some(Event::PointerDown(expected))));

        let moved = message("/turntable/tonearm/pointermove", args);
        assert_eq!(parse_message(&moved), Ok(Some(Event::PointerMove(expected))));

        let cancel = message("/turntable/tonearm/pointercancel", vec![]);
        assert_eq!(parse_message(&cancel), Ok(Some(Event::PointerUp)));
    }

    #[test]
    fn parses_spine_and_volume() {
        let spine = message(
            "/turntable/spine",
            vec![OscType::String("Blue Train".to_string())],
        );
        assert_eq!(
            parse_message(&spine),
            Ok(Some(Event::SpineClick("Blue Train".to_string())))
        );

        let volume = message("/turntable/volume", vec![OscType::Int(50)]);
        assert_eq!(parse_message(&volume), Ok(Some(Event::VolumeInput(50.0))));
    }

    #[test]
    fn rejects_malformed_arguments() {
        let missing = message("/turntable/volume", vec![]);
        assert!(parse_message(&missing).is_err());

        let wrong_type = message("/turntable/spine", vec![OscType::Float(1.0)]);
        assert!(parse_message(&wrong_type).is_err());

        let short_pointer = message("/turntable/tonearm/pointerdown", vec![OscType::Float(1.0)]);
        assert!(parse_message(&short_pointer).is_err());
    }

    #[test]
    fn ignores_unknown_addresses() {
        let other = message("/main/lightbar", vec![]);
        assert_eq!(parse_message(&other), Ok(None));
    }
}
