use core::{fmt, marker::PhantomData};
use embedded_hal::adc::{Channel, OneShot};
use thiserror::Error;

/// Source of analog samples, one channel at a time.
///
/// Both methods block until the sample is available.
pub trait Acquisition {
    type Error: fmt::Debug;

    /// Samples `channel` and returns its voltage (V).
    fn sample_voltage(&mut self, channel: u8) -> Result<f32, Self::Error>;

    /// Samples `channel` and returns the raw ADC count.
    fn sample_raw_count(&mut self, channel: u8) -> Result<f32, Self::Error>;
}

/// Scaling of ADC counts to volts.
///
/// - `max_voltage`: The voltage corresponding to the largest value possible for the ADC (mV)
/// - `precision`: The precision of the ADC in bits (eg. for 10-bit precision, use `10`)
///
/// # Examples
///
/// ```
/// use probe_autoid::AdcConfig;
///
/// let config = AdcConfig {
///     max_voltage: 5000, // 5 V
///     precision: 10,     // 10 bits of precision
/// };
///
/// assert_eq!(config.volts(512.0), 2.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcConfig {
    pub max_voltage: u32,
    pub precision: u32,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            max_voltage: 5000,
            precision: 10,
        }
    }
}

impl AdcConfig {
    /// Converts an ADC count to volts.
    pub fn volts(&self, count: f32) -> f32 {
        let exponent = i32::try_from(self.precision).unwrap_or(i32::MAX);
        let max_adc_value = libm::ldexpf(1.0, exponent);
        count * self.max_voltage as f32 / max_adc_value / 1000.0
    }
}

/// Errors from [`OneShotAcquisition`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AdcError<E> {
    /// The ADC reported an error.
    #[error("adc read failed: {0:?}")]
    Read(E),

    /// The requested channel is not the one the adapter is wired to.
    #[error("channel {requested} requested but adapter is wired to channel {wired}")]
    WrongChannel { requested: u8, wired: u8 },
}

/// An [`Acquisition`] over one `embedded-hal` ADC pin.
#[derive(Debug)]
pub struct OneShotAcquisition<Adc, ADC, Word, Pin> {
    adc: Adc,
    pin: Pin,
    config: AdcConfig,
    _marker: PhantomData<fn() -> (ADC, Word)>,
}

impl<Adc, ADC, Word, Pin> OneShotAcquisition<Adc, ADC, Word, Pin>
where
    Pin: Channel<ADC, ID = u8>,
    Adc: OneShot<ADC, Word, Pin>,
{
    /// Returns an adapter sampling `pin` through `adc`.
    ///
    /// # Examples
    ///
    /// ```
    /// use probe_autoid::{Acquisition, AdcConfig, OneShotAcquisition};
    /// # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
    /// #
    /// # let expectations: [Transaction<u16>; 1] = [Transaction::read(0, 512)];
    /// # let adc = Mock::new(&expectations);
    /// # let pin = MockChan0 {};
    ///
    /// let config = AdcConfig {
    ///     max_voltage: 5000,
    ///     precision: 10,
    /// };
    ///
    /// let mut acquisition = OneShotAcquisition::new(adc, pin, config);
    ///
    /// // A count of 512 on a 10-bit, 5 V ADC is 2.5 V
    /// assert_eq!(acquisition.sample_voltage(0), Ok(2.5));
    /// ```
    pub fn new(adc: Adc, pin: Pin, config: AdcConfig) -> Self {
        Self {
            adc,
            pin,
            config,
            _marker: PhantomData,
        }
    }

    /// Destroys the adapter and returns the ADC and the `Pin`.
    pub fn free(self) -> (Adc, Pin) {
        (self.adc, self.pin)
    }

    /// The channel this adapter is wired to.
    pub fn channel(&self) -> u8 {
        Pin::channel()
    }
}

impl<Adc, ADC, Word, Pin> Acquisition for OneShotAcquisition<Adc, ADC, Word, Pin>
where
    Word: Into<u32>,
    Pin: Channel<ADC, ID = u8>,
    Adc: OneShot<ADC, Word, Pin>,
    <Adc as OneShot<ADC, Word, Pin>>::Error: fmt::Debug,
{
    type Error = AdcError<<Adc as OneShot<ADC, Word, Pin>>::Error>;

    fn sample_voltage(&mut self, channel: u8) -> Result<f32, Self::Error> {
        let count = self.sample_raw_count(channel)?;
        Ok(self.config.volts(count))
    }

    fn sample_raw_count(&mut self, channel: u8) -> Result<f32, Self::Error> {
        let wired = Pin::channel();
        if channel != wired {
            return Err(AdcError::WrongChannel {
                requested: channel,
                wired,
            });
        }

        let word = nb::block!(self.adc.read(&mut self.pin)).map_err(AdcError::Read)?;
        let count: u32 = word.into();
        log::trace!("channel {} count {}", channel, count);

        Ok(count as f32)
    }
}
