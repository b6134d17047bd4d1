//! Synchronous command handling

mod common;

use bitlink_core::pin::{PinId, Pull};
use bitlink_core::DeviceState;
use bitlink_protocol::{ButtonId, ButtonState};
use common::{Call, Rig};

fn state() -> DeviceState {
    DeviceState::new(50)
}

#[test]
fn ping_replies_with_version() {
    let state = state();
    let mut rig = Rig::new(&state);
    assert!(rig.dispatch(b"P|").is_none());
    assert_eq!(rig.sent(), ["p|04|\n"]);
    assert!(rig.log.is_empty());
}

#[test]
fn ping_with_trailing_garbage_is_a_parse_error() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"PX");
    assert_eq!(rig.sent(), ["m|09ERR_PARSE|PX|\n"]);
}

#[test]
fn unknown_tag_echoes_frame() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"Z|01|");
    assert_eq!(rig.sent(), ["m|0BERR_UNKNOWN|Z|01||\n"]);
}

#[test]
fn empty_line_is_a_parse_error() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"");
    assert_eq!(rig.sent(), ["m|09ERR_PARSE||\n"]);
}

#[test]
fn set_pixel_is_silent() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"I|02|03|FF");
    assert_eq!(rig.log.take(), [Call::Pixel(2, 3, 255)]);
    assert!(rig.sent().is_empty());
}

#[test]
fn set_pixel_missing_separator_takes_no_action() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"I|02|03FF|");
    assert!(rig.log.is_empty());
    assert_eq!(rig.sent(), ["m|09ERR_PARSE|I|02|03FF||\n"]);
}

#[test]
fn pin_out_of_range_reports_constraint_and_frame() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"F|03|00|0001");
    assert_eq!(rig.sent(), ["m|12ERR_ARGUMENT:pin>2|F|03|00|0001|\n"]);
    assert!(rig.log.is_empty());
}

#[test]
fn parse_error_takes_precedence_over_range() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"F|03|00|00");
    assert_eq!(rig.sent(), ["m|09ERR_PARSE|F|03|00|00|\n"]);
}

#[test]
fn set_pin_value_digital_and_analog() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"F|00|02|0005|");
    rig.dispatch(b"F|01|08|03FF|");
    rig.dispatch(b"F|02|08|0400|");
    assert_eq!(rig.log.take(), [Call::Digital(0, true), Call::Analog(1, 1023)]);
    assert_eq!(rig.sent(), ["m|1AERR_ARGUMENT:pinValue>1023|F|02|08|0400||\n"]);
}

#[test]
fn set_pin_value_rejects_input_mode() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"F|00|01|0001|");
    assert_eq!(rig.sent(), ["m|14ERR_ARGUMENT:pinMode|F|00|01|0001||\n"]);
}

#[test]
fn configure_input_pins() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"E|00|01|03|");
    rig.dispatch(b"E|02|04|");
    assert_eq!(
        rig.log.take(),
        [Call::DigitalInput(0, Pull::Up), Call::AnalogInput(2)]
    );
    assert!(rig.sent().is_empty());
}

#[test]
fn configure_input_bad_pin_without_pull() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"E|03|01|");
    assert_eq!(rig.sent(), ["m|12ERR_ARGUMENT:pin>2|E|03|01||\n"]);
    assert!(rig.log.is_empty());
}

#[test]
fn servo_and_pwm() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"G|01|005A|");
    rig.dispatch(b"K|02|0032|0001|0200|");
    assert_eq!(
        rig.log.take(),
        [Call::Servo(1, 90), Call::Analog(2, 512), Call::Period(2, 20_000)]
    );
}

#[test]
fn pwm_zero_frequency() {
    let state = state();
    let mut rig = Rig::new(&state);
    rig.dispatch(b"K|02|0000|0001|0200|");
    assert_eq!(
        rig.sent(),
        ["m|1BERR_ARGUMENT:frequencyHz==0|K|02|0000|0001|0200||\n"]
    );
    assert!(rig.log.is_empty());
}

#[test]
fn start_resets_outputs_busy_flags_and_buttons() {
    let state = state();
    let mut rig = Rig::new(&state);
    let _held = rig.dispatch(b"A|0064|FF|01|V0001|").unwrap();
    state.buttons.record(ButtonId::A, ButtonState::Down);
    assert!(state.busy.is_display_busy());

    rig.dispatch(b"S|");
    assert!(!state.busy.is_display_busy());
    assert_eq!(state.buttons.snapshot(), [2, 2]);
    assert_eq!(
        rig.log.take(),
        [
            Call::Digital(0, false),
            Call::Digital(1, false),
            Call::Digital(2, false),
            Call::Brightness(255),
            Call::Clear,
        ]
    );
    assert_eq!(rig.sent(), ["p|04|\n"]);
}

#[test]
fn every_line_rearms_telemetry() {
    let state = state();
    let mut rig = Rig::new(&state);
    assert_eq!(state.telemetry.remaining(), 0);
    rig.dispatch(b"garbage");
    assert_eq!(state.telemetry.remaining(), 50);
}

#[test]
fn display_header_errors_do_not_take_the_display() {
    let state = state();
    let mut rig = Rig::new(&state);
    assert!(rig.dispatch(b"A|0064|FF|").is_none());
    assert!(!state.busy.is_display_busy());
    assert_eq!(rig.sent(), ["m|09ERR_PARSE|A|0064|FF||\n"]);
}

#[test]
fn tone_pin_out_of_range() {
    let state = state();
    let mut rig = Rig::new(&state);
    assert!(rig.dispatch(b"H|05|0064|01|01B8|").is_none());
    assert_eq!(rig.sent(), ["m|12ERR_ARGUMENT:pin>2|H|05|0064|01|01B8||\n"]);
}

#[test]
fn tone_busy_is_per_pin() {
    let state = state();
    let mut rig = Rig::new(&state);
    let first = rig.dispatch(b"H|01|0064|01|01B8|");
    assert!(first.is_some());
    assert!(state.busy.is_pin_busy(PinId::P1));

    assert!(rig.dispatch(b"H|01|0064|01|01B8|").is_none());
    assert_eq!(rig.sent(), ["m|0CERR_PIN_BUSY|\n"]);

    assert!(rig.dispatch(b"H|02|0064|01|01B8|").is_some());
    assert!(rig.sent().is_empty());
}
