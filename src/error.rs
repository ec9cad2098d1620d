use core::convert::Infallible;
use thiserror::Error;

/// Errors returned while identifying probes and converting readings.
///
/// `E` is the error type of the [`Acquisition`](crate::Acquisition)
/// adapter. Operations that never sample the hardware use the default
/// `Infallible`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error<E = Infallible> {
    /// The measured voltage ID is not within tolerance of any catalog entry.
    #[error("no known sensor within tolerance of voltage id {voltage} V")]
    UnknownSensor { voltage: f32 },

    /// The channel has no successfully identified sensor.
    #[error("no sensor bound to channel {channel}")]
    ChannelNotBound { channel: u8 },

    /// The bound sensor names an equation this crate cannot evaluate.
    #[error("unsupported calibration equation type {tag}")]
    UnsupportedEquationType { tag: u8 },

    /// The equation produced NaN or infinity for this sample.
    #[error("calibration of raw sample {raw} is not a finite number")]
    NonFiniteReading { raw: f32 },

    /// Every channel slot is already in use.
    #[error("no free slot to reserve channel {channel}")]
    NoFreeSlot { channel: u8 },

    /// The acquisition adapter failed; passed through unchanged.
    #[error("acquisition failed: {0:?}")]
    Acquisition(E),
}

impl Error {
    /// Re-types an adapter-free error for an operation that samples through `E`.
    pub(crate) fn widen<E>(self) -> Error<E> {
        match self {
            Error::UnknownSensor { voltage } => Error::UnknownSensor { voltage },
            Error::ChannelNotBound { channel } => Error::ChannelNotBound { channel },
            Error::UnsupportedEquationType { tag } => Error::UnsupportedEquationType { tag },
            Error::NonFiniteReading { raw } => Error::NonFiniteReading { raw },
            Error::NoFreeSlot { channel } => Error::NoFreeSlot { channel },
            Error::Acquisition(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_keeps_variant_and_payload() {
        let error: Error<&str> = Error::<Infallible>::ChannelNotBound { channel: 3 }.widen();
        assert_eq!(error, Error::ChannelNotBound { channel: 3 });

        let error: Error<&str> = Error::<Infallible>::UnsupportedEquationType { tag: 99 }.widen();
        assert_eq!(error, Error::UnsupportedEquationType { tag: 99 });
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::<Infallible>::ChannelNotBound { channel: 2 }.to_string(),
            "no sensor bound to channel 2"
        );
        assert_eq!(
            Error::Acquisition("timeout").to_string(),
            "acquisition failed: \"timeout\""
        );
    }
}
