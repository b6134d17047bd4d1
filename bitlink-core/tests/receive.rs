//! Serial line assembly feeding the dispatcher

mod common;

use bitlink_core::pin::PinId;
use bitlink_core::{DeviceState, Job};
use bitlink_protocol::MAX_FRAME_LEN;
use common::{Call, Rig};

fn state() -> DeviceState {
    DeviceState::new(50)
}

fn never(_job: Job<'_>) -> bool {
    panic!("no job expected")
}

/// Scroll-text line of exactly `len` bytes
fn scroll_text_line(len: usize) -> Vec<u8> {
    let text_len = len - b"C|0064|FF|00||".len();
    let mut line = format!("C|0064|FF|{:02X}|", text_len).into_bytes();
    line.extend(std::iter::repeat(b'A').take(text_len));
    line.push(b'|');
    assert_eq!(line.len(), len);
    line
}

#[test]
fn crlf_line_endings_are_accepted() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.feed(b"P|\r\nP|\n", never);
    assert_eq!(rig.sent(), ["p|04|\n", "p|04|\n"]);
}

#[test]
fn blank_lines_are_ignored() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.feed(b"\n\r\n\n", never);
    assert!(rig.sent().is_empty());
    assert_eq!(state.telemetry.remaining(), 0);
}

#[test]
fn full_length_line_dispatches() {
    let state = state();
    let mut rig = Rig::new(&state);
    let mut line = scroll_text_line(MAX_FRAME_LEN);
    line.push(b'\n');

    let mut jobs = Vec::new();
    rig.feed(&line, |job| {
        jobs.push(job);
        true
    });
    assert_eq!(jobs.len(), 1);
    assert!(rig.sent().is_empty());

    rig.run(jobs.remove(0));
    assert_eq!(
        rig.log.take(),
        [
            Call::Clear,
            Call::Brightness(0xFF),
            Call::ScrollText(vec![b'A'; MAX_FRAME_LEN - 14], 100),
        ]
    );
}

#[test]
fn overlong_line_is_a_parse_error() {
    let state = state();
    let mut rig = Rig::new(&state);
    let mut line = scroll_text_line(MAX_FRAME_LEN + 1);
    line.push(b'\n');

    rig.feed(&line, never);
    let sent = rig.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("m|09ERR_PARSE|C|0064|FF|73|AAAA"));
    assert!(sent[0].ends_with("|\n"));
    assert!(!state.busy.is_display_busy());
    assert_eq!(state.telemetry.remaining(), state.telemetry.window());
}

#[test]
fn receiver_recovers_after_overlong_line() {
    let state = state();
    let mut rig = Rig::new(&state);
    let mut bytes = vec![b'x'; MAX_FRAME_LEN + 20];
    bytes.extend_from_slice(b"\nP|\n");

    rig.feed(&bytes, never);
    let sent = rig.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("m|09ERR_PARSE|xxxx"));
    assert_eq!(sent[1], "p|04|\n");
}

#[test]
fn display_job_that_cannot_start_reports_busy() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.feed(b"A|0064|FF|01|V0001|\n", |_job| false);

    assert_eq!(rig.sent(), ["m|10ERR_DISPLAY_BUSY|\n"]);
    assert!(rig.log.is_empty());
    // The dropped job gave its flag back
    assert!(!state.busy.is_display_busy());
}

#[test]
fn tone_job_that_cannot_start_reports_busy() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.feed(b"H|01|0064|01|01B8|\n", |_job| false);

    assert_eq!(rig.sent(), ["m|0CERR_PIN_BUSY|\n"]);
    assert!(!state.busy.is_pin_busy(PinId::P1));
}

#[test]
fn started_job_keeps_its_flag() {
    let state = state();
    let mut rig = Rig::new(&state);
    let mut jobs = Vec::new();
    rig.feed(b"H|02|0064|01|01B8|\n", |job| {
        jobs.push(job);
        true
    });

    assert!(rig.sent().is_empty());
    assert!(state.busy.is_pin_busy(PinId::P2));
    rig.run(jobs.remove(0));
    assert!(!state.busy.is_pin_busy(PinId::P2));
}
