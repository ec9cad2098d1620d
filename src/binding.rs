use crate::catalog::{SensorDefinition, NAME_CAPACITY, SHORT_NAME_CAPACITY, UNITS_CAPACITY};
use heapless::String;

/// The sensor identified on one analog channel.
///
/// Calibration fields are copied out of the catalog when the channel
/// is identified, so the binding never changes behind the caller's
/// back. An unbound binding reports sentinel values: a NaN voltage ID,
/// sensor number `0`, empty strings, zero slope and intercept, a unit
/// correction factor and equation tag `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBinding {
    channel: u8,
    bound: bool,
    voltage_id: f32,
    expected_voltage_id: f32,
    sensor_number: u8,
    sensor_name: String<NAME_CAPACITY>,
    short_name: String<SHORT_NAME_CAPACITY>,
    sensor_units: String<UNITS_CAPACITY>,
    slope: f32,
    intercept: f32,
    c_factor: f32,
    cal_equation_type: u8,
    page: u16,
    last_raw_reading: Option<f32>,
    sensor_reading: Option<f32>,
}

impl ChannelBinding {
    /// A reserved channel with no sensor identified yet.
    pub fn unbound(channel: u8) -> Self {
        Self {
            channel,
            bound: false,
            voltage_id: f32::NAN,
            expected_voltage_id: f32::NAN,
            sensor_number: 0,
            sensor_name: String::new(),
            short_name: String::new(),
            sensor_units: String::new(),
            slope: 0.0,
            intercept: 0.0,
            c_factor: 1.0,
            cal_equation_type: 0,
            page: 0,
            last_raw_reading: None,
            sensor_reading: None,
        }
    }

    /// Binds `sensor` to `channel`, recording the measured `voltage_id`.
    pub fn bound(channel: u8, voltage_id: f32, sensor: &SensorDefinition) -> Self {
        Self {
            channel,
            bound: true,
            voltage_id,
            expected_voltage_id: sensor.expected_voltage_id,
            sensor_number: sensor.sensor_number,
            sensor_name: bounded(sensor.name),
            short_name: bounded(sensor.short_name),
            sensor_units: bounded(sensor.units),
            slope: sensor.slope,
            intercept: sensor.intercept,
            c_factor: sensor.c_factor,
            cal_equation_type: sensor.equation,
            page: sensor.page,
            last_raw_reading: None,
            sensor_reading: None,
        }
    }

    pub(crate) fn record(&mut self, raw: f32, calibrated: f32) {
        self.last_raw_reading = Some(raw);
        self.sensor_reading = Some(calibrated);
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// The voltage ID measured when the sensor was identified (V).
    pub fn voltage_id(&self) -> f32 {
        self.voltage_id
    }

    /// The catalog's nominal voltage ID for the bound sensor (V).
    pub fn expected_voltage_id(&self) -> f32 {
        self.expected_voltage_id
    }

    pub fn sensor_number(&self) -> u8 {
        self.sensor_number
    }

    pub fn sensor_name(&self) -> &str {
        &self.sensor_name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn sensor_units(&self) -> &str {
        &self.sensor_units
    }

    pub fn slope(&self) -> f32 {
        self.slope
    }

    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    pub fn c_factor(&self) -> f32 {
        self.c_factor
    }

    pub fn cal_equation_type(&self) -> u8 {
        self.cal_equation_type
    }

    pub fn page(&self) -> u16 {
        self.page
    }

    /// The raw sample behind the latest conversion, if any.
    pub fn last_raw_reading(&self) -> Option<f32> {
        self.last_raw_reading
    }

    /// The latest calibrated value, if any.
    pub fn sensor_reading(&self) -> Option<f32> {
        self.sensor_reading
    }
}

// Truncates at a char boundary once the buffer is full.
fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
