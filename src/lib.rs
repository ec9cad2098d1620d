//! Auto-identification and calibration of plug-in analog sensor probes.
//!
//! Each probe carries a divider resistor that puts a fixed "voltage ID"
//! on its identification line. A [`Session`] samples that voltage through
//! an [`Acquisition`] adapter, matches it against a [`Catalog`] of known
//! probes, binds the probe's calibration to the channel and then turns
//! raw samples into calibrated values.
//!
//! # Examples
//!
//! ```
//! use probe_autoid::{AdcConfig, Catalog, Config, OneShotAcquisition, Session};
//! # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
//! #
//! # let expectations: [Transaction<u16>; 2] = [
//! #     Transaction::read(0, 512),
//! #     Transaction::read(0, 389),
//! # ];
//! # let adc = Mock::new(&expectations);
//! # let pin = MockChan0 {};
//!
//! let mut acquisition = OneShotAcquisition::new(adc, pin, AdcConfig::default());
//! let mut session = Session::<4>::new(Catalog::builtin(), Config::default());
//!
//! session.begin(0).unwrap();
//! let probe = session.auto_id(0, &mut acquisition).unwrap();
//! assert_eq!(probe.sensor_name(), "pH Sensor");
//! assert_eq!(probe.sensor_units(), "pH");
//!
//! let ph = session.read_sensor(0, &mut acquisition).unwrap();
//! assert!((ph - 6.43).abs() < 0.01);
//! ```
#![cfg_attr(not(test), no_std)]

mod acquisition;
mod binding;
mod catalog;
mod equation;
mod error;
mod session;
mod state;

pub use acquisition::{Acquisition, AdcConfig, AdcError, OneShotAcquisition};
pub use binding::ChannelBinding;
pub use catalog::{
    Catalog, SensorDefinition, DEFAULT_TOLERANCE, NAME_CAPACITY, SENSORS, SHORT_NAME_CAPACITY,
    UNITS_CAPACITY,
};
pub use equation::{convert, EquationType, THERMISTOR_BIAS_OHMS, THERMISTOR_SUPPLY_VOLTS};
pub use error::Error;
pub use session::{Config, SampleKind, Session};
pub use state::CalibrationState;
