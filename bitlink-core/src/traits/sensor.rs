//! Accelerometer trait

/// Errors that can occur while sampling the accelerometer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed
    Bus,
    /// Sensor did not identify as expected
    NotDetected,
    /// No sample has been taken yet
    NoData,
}

/// One accelerometer reading in milli-g
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl AccelSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude in milli-g²
    pub fn magnitude_squared(&self) -> u32 {
        let square = |v: i16| (v as i32 * v as i32) as u32;
        square(self.x) + square(self.y) + square(self.z)
    }

    pub fn axes(&self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

/// Trait for a three-axis accelerometer
pub trait Accelerometer {
    /// Read the most recent sample
    fn read(&mut self) -> Result<AccelSample, SensorError>;
}
