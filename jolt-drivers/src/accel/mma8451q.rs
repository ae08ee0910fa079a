//! NXP MMA8451Q 3-axis accelerometer
//!
//! 14-bit samples, ±2 g full scale (the power-on default), read over I2C.
//! Only the X and Y axes are used: the board is expected to lie flat, so the
//! planar magnitude excludes gravity.
//!
//! Register map (subset):
//!
//! | Reg  | Name       | Use                                  |
//! |------|------------|--------------------------------------|
//! | 0x01 | OUT_X_MSB  | X/Y samples, 4 bytes auto-increment  |
//! | 0x0D | WHO_AM_I   | Device ID, reads 0x1A                |
//! | 0x2A | CTRL_REG1  | Bit 0 = ACTIVE                       |

use embedded_hal::i2c::I2c;
use jolt_core::traits::Accelerometer;

/// 7-bit bus address with SA0 pulled high
pub const DEFAULT_ADDRESS: u8 = 0x1D;

/// Expected WHO_AM_I value
pub const DEVICE_ID: u8 = 0x1A;

mod reg {
    pub const OUT_X_MSB: u8 = 0x01;
    pub const WHO_AM_I: u8 = 0x0D;
    pub const CTRL_REG1: u8 = 0x2A;
}

/// CTRL_REG1 value: active mode, 800 Hz output data rate, 14-bit samples
const CTRL_REG1_ACTIVE: u8 = 0x01;

/// MMA8451Q driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mma8451qError<E> {
    /// Bus transaction failed
    Bus(E),
    /// WHO_AM_I returned an unexpected ID
    WrongDevice(u8),
}

/// MMA8451Q on an I2C bus
pub struct Mma8451q<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mma8451q<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a driver at a specific address (0x1C when SA0 is low)
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Verify the device ID and switch to active mode
    pub fn init(&mut self) -> Result<(), Mma8451qError<I2C::Error>> {
        let id = self.read_register(reg::WHO_AM_I)?;
        if id != DEVICE_ID {
            return Err(Mma8451qError::WrongDevice(id));
        }

        self.i2c
            .write(self.address, &[reg::CTRL_REG1, CTRL_REG1_ACTIVE])
            .map_err(Mma8451qError::Bus)
    }

    /// Read the X and Y axes in milli-g
    pub fn read_xy_mg(&mut self) -> Result<(i16, i16), Mma8451qError<I2C::Error>> {
        let mut data = [0u8; 4];
        self.i2c
            .write_read(self.address, &[reg::OUT_X_MSB], &mut data)
            .map_err(Mma8451qError::Bus)?;

        Ok((
            sample_to_mg([data[0], data[1]]),
            sample_to_mg([data[2], data[3]]),
        ))
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Mma8451qError<I2C::Error>> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .map_err(Mma8451qError::Bus)?;
        Ok(value[0])
    }
}

impl<I2C: I2c> Accelerometer for Mma8451q<I2C> {
    type Error = Mma8451qError<I2C::Error>;

    fn read_linear_mg(&mut self) -> Result<u32, Self::Error> {
        let (x, y) = self.read_xy_mg()?;
        let (x, y) = (x as i32, y as i32);
        Ok(isqrt((x * x + y * y) as u32))
    }
}

/// Convert a left-aligned 14-bit sample (MSB first) to milli-g at ±2 g
///
/// The full scale is 4096 counts per g; dividing the aligned value by 4
/// approximates milli-g (truncated toward zero).
fn sample_to_mg(bytes: [u8; 2]) -> i16 {
    (i16::from_be_bytes(bytes) >> 2) / 4
}

/// Integer square root, rounded down
fn isqrt(n: u32) -> u32 {
    let mut rem = n;
    let mut root = 0u32;
    let mut bit = 1u32 << 30;

    while bit > rem {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use std::vec::Vec;

    /// Mock bus backed by a register file
    struct MockBus {
        regs: [u8; 0x40],
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl MockBus {
        fn new() -> Self {
            let mut regs = [0u8; 0x40];
            regs[reg::WHO_AM_I as usize] = DEVICE_ID;
            Self {
                regs,
                writes: Vec::new(),
                fail: false,
            }
        }

        fn set_xy(&mut self, x_counts: i16, y_counts: i16) {
            let x = (x_counts << 2).to_be_bytes();
            let y = (y_counts << 2).to_be_bytes();
            self.regs[1..5].copy_from_slice(&[x[0], x[1], y[0], y[1]]);
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(ErrorKind::Other);
            }

            let mut pointer = 0usize;
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        pointer = bytes[0] as usize;
                        for (i, &b) in bytes[1..].iter().enumerate() {
                            self.regs[pointer + i] = b;
                        }
                        self.writes.push((address, bytes.to_vec()));
                    }
                    Operation::Read(buf) => {
                        for (i, slot) in buf.iter_mut().enumerate() {
                            *slot = self.regs[pointer + i];
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_init_activates_device() {
        let mut accel = Mma8451q::new(MockBus::new());
        assert_eq!(accel.init(), Ok(()));

        let bus = accel.release();
        assert_eq!(bus.regs[reg::CTRL_REG1 as usize], 0x01);
        assert_eq!(bus.writes.last(), Some(&(0x1D, vec![0x2A, 0x01])));
    }

    #[test]
    fn test_init_rejects_wrong_device() {
        let mut bus = MockBus::new();
        bus.regs[reg::WHO_AM_I as usize] = 0x2A;
        let mut accel = Mma8451q::new(bus);
        assert_eq!(accel.init(), Err(Mma8451qError::WrongDevice(0x2A)));
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut bus = MockBus::new();
        bus.fail = true;
        let mut accel = Mma8451q::new(bus);
        assert_eq!(accel.init(), Err(Mma8451qError::Bus(ErrorKind::Other)));
        assert_eq!(
            accel.read_linear_mg(),
            Err(Mma8451qError::Bus(ErrorKind::Other))
        );
    }

    #[test]
    fn test_read_xy_scaling() {
        let mut bus = MockBus::new();
        bus.set_xy(4000, -2000);
        let mut accel = Mma8451q::new(bus);
        assert_eq!(accel.read_xy_mg(), Ok((1000, -500)));
    }

    #[test]
    fn test_read_linear_magnitude() {
        let mut bus = MockBus::new();
        bus.set_xy(1229, -1638);
        let mut accel = Mma8451q::new(bus);
        // x = 1229/4 = 307, y = -1638/4 = -409 (truncated), |v| = 511.4
        assert_eq!(accel.read_linear_mg(), Ok(511));
    }

    #[test]
    fn test_sample_to_mg() {
        assert_eq!(sample_to_mg([0x00, 0x00]), 0);
        assert_eq!(sample_to_mg([0x40, 0x00]), 1024);
        assert_eq!(sample_to_mg([0xc0, 0x00]), -1024);
        // Largest positive 14-bit sample is just under 2 g
        assert_eq!(sample_to_mg([0x7f, 0xfc]), 2047);
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(24), 4);
        assert_eq!(isqrt(25), 5);
        assert_eq!(isqrt(u32::MAX), 65_535);
        for n in 0..10_000u32 {
            let r = isqrt(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n, "isqrt({n}) = {r}");
        }
    }
}
