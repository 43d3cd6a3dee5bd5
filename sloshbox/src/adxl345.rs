//! ADXL345 three-axis accelerometer over I2C.
//!
//! Written against the `embedded-hal` 1.0 blocking I2C trait, so it runs on
//! anything that provides one.  On the Pi that is `linux-embedded-hal`'s
//! `I2cdev` (feature `rpi`).
//!
//! The part is run in full-resolution mode at ±16 g, where every range has
//! the same 4 mg/LSB scale.

use embedded_hal::i2c::I2c;
use slosh_field::Acceleration;

use crate::sensor::{AccelSource, SensorError};

/// Default address (ALT ADDRESS pin low).
pub const DEFAULT_ADDRESS: u8 = 0x53;

/// g per LSB in full-resolution mode.
pub const SCALE_G_PER_LSB: f32 = 0.004;

const DEVICE_ID: u8 = 0xE5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum Register {
    DevId      = 0x00,
    BwRate     = 0x2C,
    PowerCtl   = 0x2D,
    DataFormat = 0x31,
    DataX0     = 0x32,
}

const BW_RATE_100HZ:     u8 = 0x0A;
const POWER_CTL_MEASURE: u8 = 0x08;
const FULL_RES_16G:      u8 = 0x08 | 0x03;

pub struct Adxl345<I>
where
    I: I2c,
{
    i2c:     I,
    address: u8,
}

impl<I> Adxl345<I>
where
    I: I2c,
{
    /// Check the device id and put the part into measurement mode.
    pub fn new(i2c: I, address: u8) -> Result<Self, SensorError> {
        let mut sensor = Adxl345 { i2c, address };
        let id = sensor.read_register(Register::DevId)?;
        if id != DEVICE_ID {
            return Err(SensorError::WrongDevice(id));
        }
        sensor.write_register(Register::BwRate, BW_RATE_100HZ)?;
        sensor.write_register(Register::DataFormat, FULL_RES_16G)?;
        sensor.write_register(Register::PowerCtl, POWER_CTL_MEASURE)?;
        Ok(sensor)
    }

    /// Returns the underlying I2C peripheral, consuming this driver.
    pub fn release(self) -> I {
        self.i2c
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, SensorError> {
        let mut buf = [0; 1];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut buf)
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg as u8, value])
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))
    }

    /// One reading in g.
    pub fn read_axes(&mut self) -> Result<Acceleration, SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[Register::DataX0 as u8], &mut buf)
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))?;
        let axis = |lo: usize| i16::from_le_bytes([buf[lo], buf[lo + 1]]) as f32 * SCALE_G_PER_LSB;
        Ok(Acceleration::new(axis(0), axis(2), axis(4)))
    }
}

impl<I> AccelSource for Adxl345<I>
where
    I: I2c + Send + 'static,
{
    fn sample(&mut self) -> Result<Acceleration, SensorError> {
        self.read_axes()
    }
}

/// Open the ADXL345 on a Linux I2C character device (e.g. `/dev/i2c-1`).
#[cfg(feature = "rpi")]
pub fn open_linux(path: &str) -> Result<Adxl345<linux_embedded_hal::I2cdev>, SensorError> {
    let dev = linux_embedded_hal::I2cdev::new(path).map_err(|e| SensorError::Open {
        path:   path.to_string(),
        reason: e.to_string(),
    })?;
    Adxl345::new(dev, DEFAULT_ADDRESS)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
