use crate::{binding::ChannelBinding, Error};

/// Bias resistor in series with thermistor probes (Ω).
pub const THERMISTOR_BIAS_OHMS: f32 = 15_000.0;
/// Supply across the thermistor divider (V).
pub const THERMISTOR_SUPPLY_VOLTS: f32 = 5.0;

const STEINHART_K0: f32 = 1.021_19e-3;
const STEINHART_K1: f32 = 2.224_68e-4;
const STEINHART_K2: f32 = 1.333_42e-7;
const KELVIN_OFFSET: f32 = 273.15;

/// Calibration equations, tagged the way catalogs store them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EquationType {
    /// `slope * x + intercept`
    Linear = 1,
    /// `intercept * x^slope`
    Power = 2,
    /// `intercept * e^(slope * x)`
    Exponential = 3,
    /// `intercept + slope * ln(x)`
    Logarithmic = 4,
    /// Thermistor temperature (°C) from the divider voltage, trimmed by
    /// `slope * t + intercept`.
    SteinhartHart = 12,
}

impl TryFrom<u8> for EquationType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Linear),
            2 => Ok(Self::Power),
            3 => Ok(Self::Exponential),
            4 => Ok(Self::Logarithmic),
            12 => Ok(Self::SteinhartHart),
            tag => Err(Error::UnsupportedEquationType { tag }),
        }
    }
}

impl EquationType {
    /// Evaluates the equation, then applies the correction factor.
    pub fn evaluate(self, slope: f32, intercept: f32, c_factor: f32, x: f32) -> f32 {
        let value = match self {
            Self::Linear => slope * x + intercept,
            Self::Power => intercept * libm::powf(x, slope),
            Self::Exponential => intercept * libm::expf(slope * x),
            Self::Logarithmic => intercept + slope * libm::logf(x),
            Self::SteinhartHart => slope * thermistor_celsius(x) + intercept,
        };

        value * c_factor
    }
}

// NaN outside the open interval between ground and the supply rail,
// where the probe is shorted or disconnected.
fn thermistor_celsius(volts: f32) -> f32 {
    if !(volts > 0.0 && volts < THERMISTOR_SUPPLY_VOLTS) {
        return f32::NAN;
    }

    let ohms = THERMISTOR_BIAS_OHMS * volts / (THERMISTOR_SUPPLY_VOLTS - volts);
    if !(ohms.is_finite() && ohms > 0.0) {
        return f32::NAN;
    }

    let ln_r = libm::logf(ohms);

    1.0 / (STEINHART_K0 + STEINHART_K1 * ln_r + STEINHART_K2 * ln_r * ln_r * ln_r)
        - KELVIN_OFFSET
}

/// Converts `raw` with the calibration bound to `binding`.
///
/// Fails if the binding is unbound, names an unknown equation, or the
/// result is not finite. Does not touch the binding's cached readings.
pub fn convert(binding: &ChannelBinding, raw: f32) -> Result<f32, Error> {
    if !binding.is_bound() {
        return Err(Error::ChannelNotBound {
            channel: binding.channel(),
        });
    }

    let equation = EquationType::try_from(binding.cal_equation_type())?;
    let value = equation.evaluate(binding.slope(), binding.intercept(), binding.c_factor(), raw);

    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteReading { raw })
    }
}
