//! Push button task
//!
//! Buttons are active low. A press sends `Down` right away and the release
//! sends `Up`. A press lasting past the hold threshold also sends `Hold`
//! while the button is still down.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Timer};

use bitlink_core::{emit, DeviceState};
use bitlink_protocol::{ButtonId, ButtonState};

use crate::channels::LinkSender;

/// Contact bounce settle time
const DEBOUNCE: Duration = Duration::from_millis(20);

/// Press length after which the button reports `Hold`
const HOLD: Duration = Duration::from_millis(1500);

#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(mut btn: Input<'static>, id: ButtonId, state: &'static DeviceState) {
    info!("Button {} task started", id);

    let mut link = LinkSender;

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(DEBOUNCE).await;
        if btn.is_high() {
            continue;
        }

        emit::button(&mut link, &state.buttons, id, ButtonState::Down);
        debug!("Button {}: Down", id);

        if with_timeout(HOLD, btn.wait_for_rising_edge()).await.is_err() {
            emit::button(&mut link, &state.buttons, id, ButtonState::Hold);
            debug!("Button {}: Hold", id);
            btn.wait_for_rising_edge().await;
        }

        emit::button(&mut link, &state.buttons, id, ButtonState::Up);
        debug!("Button {}: Up", id);

        Timer::after(DEBOUNCE).await;
    }
}
