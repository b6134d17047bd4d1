//! Event emitters
//!
//! Each emitter encodes one event into a fresh owned message and queues it on
//! the link. Encoding and transmit failures are logged and dropped.

use bitlink_protocol::{ButtonId, ButtonState, DeviceEvent, Gesture, PROTOCOL_VERSION};

use crate::error::CommandError;
use crate::state::ButtonCache;
use crate::traits::FrameSink;

/// Encode and queue one event
pub fn send<L: FrameSink>(link: &mut L, event: DeviceEvent<'_>) {
    match event.encode() {
        Ok(msg) => swallow!("link send", link.send(msg.wire_bytes())),
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("event encode failed: {}", _e);
        }
    }
}

/// Acknowledge ping and start
pub fn ping_reply<L: FrameSink>(link: &mut L) {
    send(
        link,
        DeviceEvent::PingReply {
            version: PROTOCOL_VERSION,
        },
    );
}

/// Free-form system message
pub fn sysmsg<L: FrameSink>(link: &mut L, text: &[u8]) {
    send(link, DeviceEvent::SysMsg { text });
}

/// Report a rejected command
///
/// Busy rejections go out as a system message; everything else echoes the
/// raw frame after the error code.
pub fn report<L: FrameSink>(link: &mut L, err: &CommandError, frame: &[u8]) {
    #[cfg(feature = "defmt")]
    defmt::debug!("command rejected: {}", err);

    if err.echoes_frame() {
        send(
            link,
            DeviceEvent::Diagnostic {
                code: err.code(),
                frame,
            },
        );
    } else {
        sysmsg(link, err.code());
    }
}

/// Record a button transition and forward it
pub fn button<L: FrameSink>(link: &mut L, cache: &ButtonCache, id: ButtonId, state: ButtonState) {
    cache.record(id, state);
    send(link, DeviceEvent::Button { id, state });
}

/// Forward an accelerometer gesture
pub fn gesture<L: FrameSink>(link: &mut L, gesture: Gesture) {
    send(link, DeviceEvent::Gesture(gesture));
}
