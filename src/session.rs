use crate::{
    acquisition::Acquisition,
    binding::ChannelBinding,
    catalog::Catalog,
    equation,
    state::CalibrationState,
    Error,
};

/// Which adapter sample feeds the calibration equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleKind {
    /// [`Acquisition::sample_voltage`]
    #[default]
    Voltage,
    /// [`Acquisition::sample_raw_count`]
    RawCount,
}

/// Configuration for a [`Session`].
///
/// - `id_samples`: Voltage samples averaged per identification
/// - `reading_samples`: Samples averaged per [`Session::read_sensor`]
/// - `reading_input`: Which sample the calibration equation is applied to
///
/// Sample counts of `0` are treated as `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub id_samples: u8,
    pub reading_samples: u8,
    pub reading_input: SampleKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_samples: 1,
            reading_samples: 1,
            reading_input: SampleKind::Voltage,
        }
    }
}

/// Identifies probes on up to `CHANNELS` analog channels and converts
/// their readings.
#[derive(Debug)]
pub struct Session<'a, const CHANNELS: usize> {
    catalog: Catalog<'a>,
    config: Config,
    state: CalibrationState<CHANNELS>,
}

impl<'a, const CHANNELS: usize> Session<'a, CHANNELS> {
    pub fn new(catalog: Catalog<'a>, config: Config) -> Self {
        Self {
            catalog,
            config,
            state: CalibrationState::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &CalibrationState<CHANNELS> {
        &self.state
    }

    /// Reserves `channel` in the unbound state.
    pub fn begin(&mut self, channel: u8) -> Result<(), Error> {
        self.state.begin(channel)
    }

    /// Binds the sensor matching `voltage` to `channel`.
    ///
    /// On failure any earlier binding of `channel` is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use probe_autoid::{Catalog, Config, Error, Session};
    ///
    /// let mut session = Session::<2>::new(Catalog::builtin(), Config::default());
    ///
    /// let binding = session.identify(0, 2.52).unwrap();
    /// assert_eq!(binding.sensor_name(), "pH Sensor");
    ///
    /// assert_eq!(session.identify(1, 4.9), Err(Error::UnknownSensor { voltage: 4.9 }));
    /// ```
    pub fn identify(&mut self, channel: u8, voltage: f32) -> Result<&ChannelBinding, Error> {
        let Some(sensor) = self.catalog.lookup_by_voltage(voltage) else {
            log::warn!("channel {}: no sensor matches voltage id {} V", channel, voltage);
            return Err(Error::UnknownSensor { voltage });
        };

        let binding = self
            .state
            .bind(ChannelBinding::bound(channel, voltage, sensor))?;
        log::debug!(
            "channel {}: voltage id {} V identified sensor {} ({})",
            channel,
            voltage,
            binding.sensor_number(),
            binding.sensor_name()
        );

        Ok(binding)
    }

    /// Samples the voltage ID on `channel` and binds the matching sensor.
    pub fn auto_id<A: Acquisition>(
        &mut self,
        channel: u8,
        acquisition: &mut A,
    ) -> Result<&ChannelBinding, Error<A::Error>> {
        let voltage = average(self.config.id_samples, || {
            acquisition.sample_voltage(channel)
        })
        .map_err(|error| acquisition_failed(channel, error))?;

        self.identify(channel, voltage).map_err(|error| error.widen())
    }

    /// The channel's binding, if a sensor has been identified on it.
    pub fn binding(&self, channel: u8) -> Result<&ChannelBinding, Error> {
        self.state.binding(channel)
    }

    /// The channel's slot, bound or not, for displaying sentinel values.
    pub fn slot(&self, channel: u8) -> Option<&ChannelBinding> {
        self.state.slot(channel)
    }

    /// Converts `raw` with the channel's calibration and caches the result.
    pub fn convert(&mut self, channel: u8, raw: f32) -> Result<f32, Error> {
        let binding = self.state.binding(channel)?;
        let value = equation::convert(binding, raw).inspect_err(|error| {
            log::warn!("channel {}: cannot convert {}: {}", channel, raw, error);
        })?;
        log::debug!("channel {}: {} -> {} {}", channel, raw, value, binding.sensor_units());

        self.state.update_reading(channel, raw, value)?;
        Ok(value)
    }

    /// Samples `channel`, converts the sample and caches the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use probe_autoid::{AdcConfig, Catalog, Config, OneShotAcquisition, Session};
    /// # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
    /// #
    /// # let expectations: [Transaction<u16>; 2] = [
    /// #     Transaction::read(0, 154),
    /// #     Transaction::read(0, 512),
    /// # ];
    /// # let adc = Mock::new(&expectations);
    /// # let pin = MockChan0 {};
    ///
    /// let mut acquisition = OneShotAcquisition::new(adc, pin, AdcConfig::default());
    /// let mut session = Session::<1>::new(Catalog::builtin(), Config::default());
    ///
    /// // 0.75 V identifies the +/-10 V voltage probe
    /// session.auto_id(0, &mut acquisition).unwrap();
    ///
    /// // With 2.5 V on the input, the reading is 0 V
    /// assert_eq!(session.read_sensor(0, &mut acquisition), Ok(0.0));
    /// assert_eq!(session.sensor_reading(0), Ok(Some(0.0)));
    /// ```
    pub fn read_sensor<A: Acquisition>(
        &mut self,
        channel: u8,
        acquisition: &mut A,
    ) -> Result<f32, Error<A::Error>> {
        self.state.binding(channel).map_err(|error| error.widen())?;

        let input = self.config.reading_input;
        let raw = average(self.config.reading_samples, || match input {
            SampleKind::Voltage => acquisition.sample_voltage(channel),
            SampleKind::RawCount => acquisition.sample_raw_count(channel),
        })
        .map_err(|error| acquisition_failed(channel, error))?;

        self.convert(channel, raw).map_err(|error| error.widen())
    }

    /// The latest calibrated value on `channel`, without sampling.
    pub fn sensor_reading(&self, channel: u8) -> Result<Option<f32>, Error> {
        self.state
            .binding(channel)
            .map(ChannelBinding::sensor_reading)
    }
}

fn acquisition_failed<E: core::fmt::Debug>(channel: u8, error: E) -> Error<E> {
    log::warn!("channel {}: acquisition failed: {:?}", channel, error);
    Error::Acquisition(error)
}

fn average<E>(samples: u8, mut sample: impl FnMut() -> Result<f32, E>) -> Result<f32, E> {
    let samples = samples.max(1);
    let mut sum: f32 = 0.0;
    for _ in 0..samples {
        sum += sample()?;
    }

    Ok(sum / f32::from(samples))
}
