use embedded_hal::digital::v2::InputPin;

use crate::hw::{AuxKey, LineLevels};

/// The discrete key lines on plain GPIO inputs
pub struct AuxPins<PowerT, OkT, VolumeUpT, VolumeDownT> {
    pub power: PowerT,
    pub ok: OkT,
    pub volume_up: VolumeUpT,
    pub volume_down: VolumeDownT,
}

impl<E, PowerT, OkT, VolumeUpT, VolumeDownT> LineLevels
    for AuxPins<PowerT, OkT, VolumeUpT, VolumeDownT>
where
    PowerT: InputPin<Error = E>,
    OkT: InputPin<Error = E>,
    VolumeUpT: InputPin<Error = E>,
    VolumeDownT: InputPin<Error = E>,
{
    type Error = E;

    fn is_high(&mut self, key: AuxKey) -> Result<bool, E> {
        match key {
            AuxKey::Power => self.power.is_high(),
            AuxKey::Ok => self.ok.is_high(),
            AuxKey::VolumeUp => self.volume_up.is_high(),
            AuxKey::VolumeDown => self.volume_down.is_high(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::convert::Infallible;

    struct Level(bool);

    impl InputPin for Level {
        type Error = Infallible;
        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(self.0)
        }
        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[test]
    fn reads_the_matching_pin() {
        let mut pins = AuxPins {
            power: Level(false),
            ok: Level(true),
            volume_up: Level(false),
            volume_down: Level(true),
        };
        assert_eq!(pins.is_high(AuxKey::Power), Ok(false));
        assert_eq!(pins.is_high(AuxKey::Ok), Ok(true));
        assert_eq!(pins.is_high(AuxKey::VolumeUp), Ok(false));
        assert_eq!(pins.is_high(AuxKey::VolumeDown), Ok(true));
    }
}
