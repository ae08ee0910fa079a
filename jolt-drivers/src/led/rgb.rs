//! PWM RGB LED
//!
//! Each colour channel is driven by one PWM output. The LED can be wired
//! active-high (anode to the pin) or active-low (common anode, cathode to
//! the pin), in which case duty cycles are inverted.

use embedded_hal::pwm::SetDutyCycle;
use jolt_core::traits::{ColorOutput, Rgb};

/// Electrical polarity of the LED channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Higher duty cycle = brighter
    #[default]
    ActiveHigh,
    /// Lower duty cycle = brighter (common-anode LEDs)
    ActiveLow,
}

/// RGB LED on three PWM channels
pub struct RgbLed<P> {
    red: P,
    green: P,
    blue: P,
    polarity: Polarity,
    color: Rgb,
}

impl<P: SetDutyCycle> RgbLed<P> {
    /// Create the driver and switch the LED off
    pub fn new(red: P, green: P, blue: P, polarity: Polarity) -> Result<Self, P::Error> {
        let mut led = Self {
            red,
            green,
            blue,
            polarity,
            color: Rgb::BLACK,
        };
        led.apply(Rgb::BLACK)?;
        Ok(led)
    }

    /// Colour last written
    pub fn color(&self) -> Rgb {
        self.color
    }

    fn apply(&mut self, color: Rgb) -> Result<(), P::Error> {
        let polarity = self.polarity;
        set_channel(&mut self.red, color.r, polarity)?;
        set_channel(&mut self.green, color.g, polarity)?;
        set_channel(&mut self.blue, color.b, polarity)?;
        self.color = color;
        Ok(())
    }
}

fn set_channel<P: SetDutyCycle>(pwm: &mut P, value: u8, polarity: Polarity) -> Result<(), P::Error> {
    let level = match polarity {
        Polarity::ActiveHigh => value,
        Polarity::ActiveLow => u8::MAX - value,
    };
    pwm.set_duty_cycle_fraction(level as u16, u8::MAX as u16)
}

impl<P: SetDutyCycle> ColorOutput for RgbLed<P> {
    type Error = P::Error;

    fn set_color(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.apply(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    /// Mock PWM channel with a 1000-step counter
    #[derive(Default)]
    struct MockPwm {
        duty: u16,
    }

    impl ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    fn duties(led: &RgbLed<MockPwm>) -> [u16; 3] {
        [led.red.duty, led.green.duty, led.blue.duty]
    }

    #[test]
    fn test_active_high() {
        let mut led = RgbLed::new(
            MockPwm::default(),
            MockPwm::default(),
            MockPwm::default(),
            Polarity::ActiveHigh,
        )
        .unwrap();
        assert_eq!(duties(&led), [0, 0, 0]);

        led.set_color(Rgb::new(255, 0, 51)).unwrap();
        assert_eq!(duties(&led), [1000, 0, 200]);
        assert_eq!(led.color(), Rgb::new(255, 0, 51));
    }

    #[test]
    fn test_active_low_inverts() {
        let mut led = RgbLed::new(
            MockPwm::default(),
            MockPwm::default(),
            MockPwm::default(),
            Polarity::ActiveLow,
        )
        .unwrap();
        // Off means fully high on a common-anode LED
        assert_eq!(duties(&led), [1000, 1000, 1000]);

        led.set_color(Rgb::WHITE).unwrap();
        assert_eq!(duties(&led), [0, 0, 0]);

        led.set_color(Rgb::new(0, 255, 204)).unwrap();
        assert_eq!(duties(&led), [1000, 0, 200]);
    }
}
