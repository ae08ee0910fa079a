//! Accelerometer trait and acceleration units

use core::fmt;

/// Acceleration magnitude in fixed-point milli-m/s^2
///
/// For example, 9.81 m/s^2 is stored as 9810.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Acceleration(u32);

impl Acceleration {
    /// Zero acceleration
    pub const ZERO: Self = Self(0);

    /// Create from milli-m/s^2
    pub const fn from_milli(milli: u32) -> Self {
        Self(milli)
    }

    /// Create from whole m/s^2
    pub const fn from_meters_per_s2(value: u32) -> Self {
        Self(value.saturating_mul(1000))
    }

    /// Convert a reading in milli-g (1 g = 9.80665 m/s^2)
    pub fn from_milli_g(milli_g: u32) -> Self {
        let milli = (milli_g as u64 * 980_665 + 50_000) / 100_000;
        Self(milli.min(u32::MAX as u64) as u32)
    }

    /// Parse a non-negative decimal value in m/s^2, e.g. `"10.2"`
    ///
    /// Returns `None` for malformed, negative or non-finite input.
    pub fn parse(text: &str) -> Option<Self> {
        let value: f32 = text.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let milli = value * 1000.0 + 0.5;
        if milli >= u32::MAX as f32 {
            return None;
        }
        Some(Self(milli as u32))
    }

    /// Value in milli-m/s^2
    pub const fn as_milli(self) -> u32 {
        self.0
    }
}

/// Formats as m/s^2 with three decimals (`10.000`)
impl fmt::Display for Acceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

/// Trait for accelerometers that report planar acceleration
///
/// Implementations handle the bus transactions and sample scaling of a
/// specific part.
pub trait Accelerometer {
    /// Error type for sensor reads
    type Error;

    /// Read the magnitude of the linear acceleration in milli-g
    fn read_linear_mg(&mut self) -> Result<u32, Self::Error>;

    /// Read the magnitude of the linear acceleration in milli-m/s^2
    fn read_acceleration(&mut self) -> Result<Acceleration, Self::Error> {
        self.read_linear_mg().map(Acceleration::from_milli_g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_from_milli_g() {
        assert_eq!(Acceleration::from_milli_g(0), Acceleration::ZERO);
        assert_eq!(Acceleration::from_milli_g(1000).as_milli(), 9_807);
        assert_eq!(Acceleration::from_milli_g(2000).as_milli(), 19_613);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Acceleration::parse("10"), Some(Acceleration::from_milli(10_000)));
        assert_eq!(Acceleration::parse("10.2"), Some(Acceleration::from_milli(10_200)));
        assert_eq!(Acceleration::parse("0"), Some(Acceleration::ZERO));
        assert_eq!(Acceleration::parse("1.5"), Some(Acceleration::from_milli(1_500)));
        assert_eq!(Acceleration::parse("-1"), None);
        assert_eq!(Acceleration::parse("abc"), None);
        assert_eq!(Acceleration::parse("inf"), None);
        assert_eq!(Acceleration::parse("NaN"), None);
        assert_eq!(Acceleration::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Acceleration::from_milli(10_000).to_string(), "10.000");
        assert_eq!(Acceleration::from_milli(9_807).to_string(), "9.807");
        assert_eq!(Acceleration::from_milli(5).to_string(), "0.005");
    }

    #[test]
    fn test_ordering() {
        assert!(Acceleration::from_meters_per_s2(10) > Acceleration::from_milli(9_999));
        assert!(Acceleration::from_meters_per_s2(10) >= Acceleration::from_milli(10_000));
    }

    struct FixedSensor(u32);

    impl Accelerometer for FixedSensor {
        type Error = ();

        fn read_linear_mg(&mut self) -> Result<u32, ()> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_default_read_acceleration_converts_units() {
        let mut sensor = FixedSensor(500);
        assert_eq!(
            sensor.read_acceleration(),
            Ok(Acceleration::from_milli(4_903))
        );
    }
}
