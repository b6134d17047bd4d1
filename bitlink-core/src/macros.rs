/// Discard the error of a hardware call, logging it when `defmt` is enabled
///
/// Hardware failures never abort a command.
macro_rules! swallow {
    ($what:literal, $result:expr) => {
        if let Err(_e) = $result {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} failed: {}", $what, _e);
        }
    };
}
