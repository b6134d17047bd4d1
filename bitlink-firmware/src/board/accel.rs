//! LIS3DH accelerometer over I²C
//!
//! Configured for 100 Hz, ±2 g, high-resolution output, which gives 1 mg per
//! digit once the 12-bit value is right-aligned.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use bitlink_core::traits::{AccelSample, Accelerometer, SensorError};

const LIS3DH_ADDR: u8 = 0x19;
const LIS3DH_ID: u8 = 0x33;

mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL_REG1: u8 = 0x20;
    pub const CTRL_REG4: u8 = 0x23;
    pub const OUT_X_L: u8 = 0x28;
    /// Register address auto-increment
    pub const AUTO_INC: u8 = 0x80;
}

/// LIS3DH driver
pub struct Lis3dh<I2C> {
    i2c: I2C,
}

impl<I2C> Lis3dh<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Check the device ID and start continuous conversion
    pub async fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8];
        self.i2c
            .write_read(LIS3DH_ADDR, &[reg::WHO_AM_I], &mut id)
            .await
            .map_err(|_| SensorError::Bus)?;
        if id[0] != LIS3DH_ID {
            return Err(SensorError::NotDetected);
        }

        // 100 Hz, X/Y/Z enabled
        self.write(reg::CTRL_REG1, 0x57).await?;
        // Block data update, ±2 g, high resolution
        self.write(reg::CTRL_REG4, 0x88).await
    }

    async fn write(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(LIS3DH_ADDR, &[register, value])
            .await
            .map_err(|_| SensorError::Bus)
    }

    /// Read one sample in milli-g
    pub async fn read(&mut self) -> Result<AccelSample, SensorError> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(LIS3DH_ADDR, &[reg::OUT_X_L | reg::AUTO_INC], &mut raw)
            .await
            .map_err(|_| SensorError::Bus)?;

        let axis = |i: usize| i16::from_le_bytes([raw[i], raw[i + 1]]) >> 4;
        Ok(AccelSample::new(axis(0), axis(2), axis(4)))
    }
}

/// Most recent sample taken by the accelerometer task
static LATEST: Mutex<CriticalSectionRawMutex, Cell<Option<AccelSample>>> =
    Mutex::new(Cell::new(None));

/// Publish a new sample, or `None` after a failed read
pub fn publish(sample: Option<AccelSample>) {
    LATEST.lock(|latest| latest.set(sample));
}

/// Reads the cached sample instead of touching the bus
#[derive(Debug, Clone, Copy, Default)]
pub struct CachedAccel;

impl Accelerometer for CachedAccel {
    fn read(&mut self) -> Result<AccelSample, SensorError> {
        LATEST.lock(|latest| latest.get()).ok_or(SensorError::NoData)
    }
}
