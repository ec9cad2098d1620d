use crate::equation::EquationType;

/// Longest sensor name a binding can hold.
pub const NAME_CAPACITY: usize = 15;
/// Longest short name a binding can hold.
pub const SHORT_NAME_CAPACITY: usize = 11;
/// Longest units label a binding can hold.
pub const UNITS_CAPACITY: usize = 6;

/// Largest distance (V) between a measured voltage ID and a catalog
/// entry that still counts as a match. Covers divider resistor
/// tolerance and ADC noise.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// A known probe model and its calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorDefinition {
    /// Nominal divider voltage identifying this model (V).
    pub expected_voltage_id: f32,
    pub sensor_number: u8,
    pub name: &'static str,
    pub short_name: &'static str,
    pub units: &'static str,
    pub slope: f32,
    pub intercept: f32,
    /// Multiplied into the result last. Use `1.0` when unused.
    pub c_factor: f32,
    /// Tag decoded by [`EquationType::try_from`].
    pub equation: u8,
    /// Documentation reference; not used in any computation.
    pub page: u16,
}

impl SensorDefinition {
    /// A linear probe without correction factor.
    #[allow(clippy::too_many_arguments)]
    pub const fn linear(
        expected_voltage_id: f32,
        sensor_number: u8,
        name: &'static str,
        short_name: &'static str,
        units: &'static str,
        slope: f32,
        intercept: f32,
        page: u16,
    ) -> Self {
        Self {
            expected_voltage_id,
            sensor_number,
            name,
            short_name,
            units,
            slope,
            intercept,
            c_factor: 1.0,
            equation: EquationType::Linear as u8,
            page,
        }
    }

    /// Replaces the equation tag.
    pub const fn with_equation(mut self, equation: u8) -> Self {
        self.equation = equation;
        self
    }

    /// Replaces the correction factor.
    pub const fn with_c_factor(mut self, c_factor: f32) -> Self {
        self.c_factor = c_factor;
        self
    }
}

const POWER: u8 = EquationType::Power as u8;
const EXPONENTIAL: u8 = EquationType::Exponential as u8;
const LOGARITHMIC: u8 = EquationType::Logarithmic as u8;
const STEINHART_HART: u8 = EquationType::SteinhartHart as u8;

/// Resistor-ID probes known at build time, spaced 0.25 V apart.
pub static SENSORS: [SensorDefinition; 14] = [
    SensorDefinition::linear(0.50, 1, "Thermocouple", "TC Temp", "Deg C", 320.0, -200.0, 11),
    SensorDefinition::linear(0.75, 2, "Voltage +/-10V", "Voltage", "V", 4.0, -10.0, 14),
    SensorDefinition::linear(1.00, 3, "Current", "Current", "A", -2.5, 6.25, 15),
    SensorDefinition::linear(1.25, 8, "Diff Voltage", "Diff Volt", "V", -2.5, 6.25, 19),
    SensorDefinition::linear(1.50, 10, "Stainless Temp", "Temp", "Deg C", 1.0, 0.0, 21)
        .with_equation(STEINHART_HART),
    SensorDefinition::linear(1.75, 11, "Surface Temp", "Surf Temp", "Deg C", 1.0, 0.0, 22)
        .with_equation(STEINHART_HART),
    SensorDefinition::linear(2.00, 12, "TI Light", "Light", "rel", 1.0, 0.0, 23),
    SensorDefinition::linear(2.25, 14, "Raw Voltage", "Raw V", "V", 1.0, 0.0, 25),
    SensorDefinition::linear(2.50, 18, "pH Sensor", "pH", "pH", -3.838, 13.72, 29),
    SensorDefinition::linear(2.75, 20, "Force +/-10N", "Force", "N", -4.9, 12.25, 31),
    SensorDefinition::linear(3.00, 23, "Conductivity", "Cond", "uS/cm", 400.0, 0.0, 34)
        .with_c_factor(0.98),
    SensorDefinition::linear(3.25, 36, "Ammonium ISE", "NH4 ISE", "mg/L", 9.5, 0.05, 47)
        .with_equation(EXPONENTIAL),
    SensorDefinition::linear(3.50, 38, "Sound Level", "Sound", "dB", 8.686, 90.0, 49)
        .with_equation(LOGARITHMIC),
    SensorDefinition::linear(3.75, 40, "Anemometer", "Wind", "m/s", 1.5, 12.0, 51)
        .with_equation(POWER),
];

/// An immutable table of sensor definitions and its match tolerance.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    entries: &'a [SensorDefinition],
    tolerance: f32,
}

impl Catalog<'static> {
    /// The compiled-in [`SENSORS`] table with [`DEFAULT_TOLERANCE`].
    pub fn builtin() -> Self {
        Catalog::new(&SENSORS, DEFAULT_TOLERANCE)
    }
}

impl<'a> Catalog<'a> {
    /// Returns a catalog over `entries`.
    ///
    /// No two entries may lie within `tolerance` of each other, and
    /// every string must fit its binding capacity, or this function
    /// will panic when running in debug mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use probe_autoid::{Catalog, SensorDefinition};
    ///
    /// static PROBES: [SensorDefinition; 2] = [
    ///     SensorDefinition::linear(1.0, 1, "Voltage", "V", "V", 4.0, -10.0, 1),
    ///     SensorDefinition::linear(2.0, 2, "Current", "I", "A", -2.5, 6.25, 2),
    /// ];
    ///
    /// let catalog = Catalog::new(&PROBES, 0.2);
    /// assert_eq!(catalog.lookup_by_voltage(1.9).map(|s| s.sensor_number), Some(2));
    /// assert_eq!(catalog.lookup_by_voltage(1.5), None);
    /// ```
    pub fn new(entries: &'a [SensorDefinition], tolerance: f32) -> Self {
        debug_assert!(
            entries.iter().enumerate().all(|(index, a)| {
                entries[index + 1..].iter().all(|b| {
                    libm::fabsf(a.expected_voltage_id - b.expected_voltage_id) > tolerance
                })
            }),
            "Catalog entries must be further apart than the tolerance"
        );
        debug_assert!(
            entries.iter().all(|s| s.name.len() <= NAME_CAPACITY
                && s.short_name.len() <= SHORT_NAME_CAPACITY
                && s.units.len() <= UNITS_CAPACITY),
            "Catalog strings must fit their binding capacity"
        );

        Self { entries, tolerance }
    }

    pub fn entries(&self) -> &'a [SensorDefinition] {
        self.entries
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Returns the entry whose voltage ID is closest to `candidate`, if
    /// it lies within the tolerance. Equidistant entries resolve to the
    /// lower sensor number.
    pub fn lookup_by_voltage(&self, candidate: f32) -> Option<&'a SensorDefinition> {
        self.entries
            .iter()
            .map(|sensor| (libm::fabsf(sensor.expected_voltage_id - candidate), sensor))
            .filter(|(distance, _)| *distance <= self.tolerance)
            .min_by(|(da, a), (db, b)| {
                da.total_cmp(db)
                    .then_with(|| a.sensor_number.cmp(&b.sensor_number))
            })
            .map(|(_, sensor)| sensor)
    }

    /// Returns the entry with the given catalog number.
    pub fn find(&self, sensor_number: u8) -> Option<&'a SensorDefinition> {
        self.entries
            .iter()
            .find(|sensor| sensor.sensor_number == sensor_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    static TIED: [SensorDefinition; 2] = [
        SensorDefinition::linear(1.5, 7, "High", "High", "V", 1.0, 0.0, 0),
        SensorDefinition::linear(1.0, 4, "Low", "Low", "V", 1.0, 0.0, 0),
    ];

    static OVERLAPPING: [SensorDefinition; 2] = [
        SensorDefinition::linear(1.00, 1, "A", "A", "V", 1.0, 0.0, 0),
        SensorDefinition::linear(1.05, 2, "B", "B", "V", 1.0, 0.0, 0),
    ];

    static LONG_NAME: [SensorDefinition; 1] = [SensorDefinition::linear(
        1.0,
        1,
        "A Very Long Sensor Name",
        "A",
        "V",
        1.0,
        0.0,
        0,
    )];

    #[test]
    #[should_panic]
    fn panics_if_entries_overlap() {
        Catalog::new(&OVERLAPPING, DEFAULT_TOLERANCE);
    }

    #[test]
    #[should_panic]
    fn panics_if_name_too_long() {
        Catalog::new(&LONG_NAME, DEFAULT_TOLERANCE);
    }

    #[test]
    fn builtin_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.entries().len(), SENSORS.len());
        assert_eq!(catalog.tolerance(), DEFAULT_TOLERANCE);
    }

    #[test]
    fn builtin_sensor_numbers_are_unique() {
        for (index, a) in SENSORS.iter().enumerate() {
            assert!(SENSORS[index + 1..]
                .iter()
                .all(|b| a.sensor_number != b.sensor_number));
        }
    }

    #[test]
    fn matching_exact_values() {
        let catalog = Catalog::builtin();
        for sensor in SENSORS.iter() {
            assert_eq!(catalog.lookup_by_voltage(sensor.expected_voltage_id), Some(sensor));
        }
    }

    #[test]
    fn nearest_entry_wins() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.lookup_by_voltage(0.79).map(|s| s.sensor_number), Some(2));
        assert_eq!(catalog.lookup_by_voltage(0.96).map(|s| s.sensor_number), Some(3));
    }

    #[test]
    fn outside_tolerance() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.lookup_by_voltage(0.0), None);
        assert_eq!(catalog.lookup_by_voltage(0.625), None);
        assert_eq!(catalog.lookup_by_voltage(4.9), None);
        assert_eq!(catalog.lookup_by_voltage(f32::NAN), None);
    }

    #[test]
    fn tie_prefers_lower_sensor_number() {
        let catalog = Catalog::new(&TIED, 0.375);
        assert_eq!(catalog.lookup_by_voltage(1.25).map(|s| s.sensor_number), Some(4));
    }

    #[test]
    fn find_by_number() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find(18).map(|s| s.name), Some("pH Sensor"));
        assert_eq!(catalog.find(99), None);
    }

    #[test]
    fn builtin_equations_are_supported() {
        for sensor in SENSORS.iter() {
            assert!(EquationType::try_from(sensor.equation).is_ok());
        }
    }

    proptest! {
        #[test]
        fn jitter_within_tolerance_matches(index in 0..SENSORS.len(), jitter in -0.09f32..0.09) {
            let sensor = &SENSORS[index];
            let found = Catalog::builtin().lookup_by_voltage(sensor.expected_voltage_id + jitter);
            prop_assert_eq!(found, Some(sensor));
        }

        #[test]
        fn far_from_every_entry_never_matches(voltage in -10.0f32..10.0) {
            let far = SENSORS
                .iter()
                .all(|s| libm::fabsf(s.expected_voltage_id - voltage) > DEFAULT_TOLERANCE);
            prop_assume!(far);
            prop_assert_eq!(Catalog::builtin().lookup_by_voltage(voltage), None);
        }
    }
}
