//! Telemetry sampler and hardware event forwarding

mod common;

use bitlink_core::traits::{AccelSample, SensorError};
use bitlink_core::{emit, telemetry, DeviceState};
use bitlink_protocol::{ButtonId, ButtonState, Gesture};
use common::{MockAccel, Rig};

#[test]
fn idle_board_sends_no_telemetry() {
    let state = DeviceState::new(50);
    let mut rig = Rig::new(&state);
    let mut accel = MockAccel(Ok(AccelSample::new(0, 0, -1000)));
    for _ in 0..100 {
        assert!(!telemetry::tick(&state, &mut accel, &mut rig.pins, &mut rig.link));
    }
    assert!(rig.sent().is_empty());
}

#[test]
fn any_command_opens_a_fifty_tick_window() {
    let state = DeviceState::new(50);
    let mut rig = Rig::new(&state);
    let mut accel = MockAccel(Ok(AccelSample::new(0, 0, -1000)));
    rig.dispatch(b"P|");
    rig.sent();

    let mut sent = 0;
    for _ in 0..80 {
        if telemetry::tick(&state, &mut accel, &mut rig.pins, &mut rig.link) {
            sent += 1;
        }
    }
    assert_eq!(sent, 50);
    assert_eq!(rig.sent().len(), 50);

    rig.dispatch(b"I|00|00|00|");
    assert_eq!(state.telemetry.remaining(), 50);
}

#[test]
fn telemetry_reports_buttons_accel_and_input_pins() {
    let state = DeviceState::new(50);
    let mut rig = Rig::new(&state);
    rig.dispatch(b"E|01|04|");
    rig.dispatch(b"E|02|01|00|");
    rig.pins.table.borrow_mut().values = [0, 0x200, 1];
    state.buttons.record(ButtonId::A, ButtonState::Down);

    let mut accel = MockAccel(Ok(AccelSample::new(16, -16, -1024)));
    assert!(telemetry::tick(&state, &mut accel, &mut rig.pins, &mut rig.link));
    assert_eq!(
        rig.sent(),
        ["c|b|01|02|a|0010|FFF0|FC00|p|02|01|a|0200|02|d|0001|\n"]
    );
}

#[test]
fn accelerometer_failure_reports_zeros() {
    let state = DeviceState::new(50);
    let mut rig = Rig::new(&state);
    rig.dispatch(b"P|");
    rig.sent();

    let mut accel = MockAccel(Err(SensorError::Bus));
    assert!(telemetry::tick(&state, &mut accel, &mut rig.pins, &mut rig.link));
    assert_eq!(rig.sent(), ["c|b|02|02|a|0000|0000|0000|p|00|\n"]);
}

#[test]
fn button_events_update_cache_and_forward() {
    let state = DeviceState::new(50);
    let mut rig = Rig::new(&state);
    emit::button(&mut rig.link, &state.buttons, ButtonId::B, ButtonState::Down);
    assert_eq!(state.buttons.get(ButtonId::B), 1);
    emit::button(&mut rig.link, &state.buttons, ButtonId::B, ButtonState::Up);
    assert_eq!(rig.sent(), ["a|02|01|\n", "a|02|02|\n"]);
}

#[test]
fn gestures_forward_immediately() {
    let state = DeviceState::new(50);
    let mut rig = Rig::new(&state);
    emit::gesture(&mut rig.link, Gesture::FaceUp);
    assert_eq!(rig.sent(), ["b|05|\n"]);
}
