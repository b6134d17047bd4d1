//! Device configuration
//!
//! The firmware embeds `device.toml` and parses it at boot with
//! [`parse_config`]. Only the small TOML subset the file uses is supported:
//!
//! - `[section]` headers
//! - `key = value` pairs with integer or quoted string values
//! - `#` comments, including trailing comments
//!
//! Keys that are absent keep their default value. Unknown sections or keys
//! are rejected so that typos do not go unnoticed.

use heapless::String;

/// Longest banner that fits the config buffer
pub const MAX_BANNER_LEN: usize = 32;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown `[section]`
    InvalidSection,
    /// Unknown key inside a known section
    UnknownKey,
    /// Value does not have the expected type or range
    InvalidValue,
    /// Line is neither a header nor `key = value`
    Malformed,
    /// Banner longer than [`MAX_BANNER_LEN`]
    BannerTooLong,
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Serial link baud rate
    pub baudrate: u32,
    /// Telemetry sample rate
    pub telemetry_rate_hz: u8,
    /// How long telemetry keeps flowing after the last command
    pub telemetry_window_secs: u8,
    /// Text scrolled at boot
    pub banner: String<MAX_BANNER_LEN>,
    /// Scroll speed of the banner
    pub banner_delay_ms: u16,
    /// Initial display brightness
    pub brightness: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let mut banner = String::new();
        // Fits: the default is shorter than MAX_BANNER_LEN
        let _ = banner.push_str("Kodu");
        Self {
            baudrate: 115_200,
            telemetry_rate_hz: 10,
            telemetry_window_secs: 5,
            banner,
            banner_delay_ms: 80,
            brightness: 255,
        }
    }
}

impl DeviceConfig {
    /// Telemetry window length in ticks
    pub fn telemetry_window_ticks(&self) -> u16 {
        self.telemetry_rate_hz as u16 * self.telemetry_window_secs as u16
    }

    /// Time between telemetry ticks
    pub fn telemetry_period_ms(&self) -> u64 {
        1000 / self.telemetry_rate_hz.max(1) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Telemetry,
    Display,
}

/// Parse `device.toml` contents
pub fn parse_config(input: &str) -> Result<DeviceConfig, ConfigError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(line[1..line.len() - 1].trim())?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::Malformed)?;
        apply_value(&mut config, section, key, value)?;
    }

    if config.telemetry_rate_hz == 0 {
        return Err(ConfigError::InvalidValue);
    }
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header {
        "serial" => Ok(Section::Serial),
        "telemetry" => Ok(Section::Telemetry),
        "display" => Ok(Section::Display),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn strip_comment(line: &str) -> &str {
    // A '#' inside a quoted string is not a comment
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ConfigError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ConfigError::InvalidValue)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    // Integer literals may use `_` separators (`115_200`)
    let mut digits: String<16> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ConfigError::InvalidValue)
}

fn apply_value(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Serial, "baudrate") => config.baudrate = parse_int(value)?,
        (Section::Telemetry, "rate_hz") => config.telemetry_rate_hz = parse_int(value)?,
        (Section::Telemetry, "window_secs") => config.telemetry_window_secs = parse_int(value)?,
        (Section::Display, "banner") => {
            let text = parse_string(value)?;
            config.banner.clear();
            config
                .banner
                .push_str(text)
                .map_err(|_| ConfigError::BannerTooLong)?;
        }
        (Section::Display, "banner_delay_ms") => config.banner_delay_ms = parse_int(value)?,
        (Section::Display, "brightness") => config.brightness = parse_int(value)?,
        (Section::Root, _) => return Err(ConfigError::InvalidSection),
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}
