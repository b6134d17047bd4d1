//! Startup banner
//!
//! Scrolls the configured banner once while holding the display lease, so a
//! host that connects early is told the display is busy.

use defmt::*;
use heapless::String;

use bitlink_core::config::MAX_BANNER_LEN;
use bitlink_core::traits::LedDisplay;
use bitlink_core::DeviceState;

use crate::board::LedMatrix;

#[embassy_executor::task]
pub async fn banner_task(state: &'static DeviceState, text: String<MAX_BANNER_LEN>, delay_ms: u16) {
    let Some(_lease) = state.busy.try_acquire_display() else {
        return;
    };

    let mut matrix = LedMatrix;
    if let Err(e) = matrix.scroll_text(text.as_bytes(), delay_ms).await {
        warn!("Banner failed: {:?}", e);
    }
    if let Err(e) = matrix.clear() {
        warn!("Clear failed: {:?}", e);
    }
}
