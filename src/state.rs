use crate::{binding::ChannelBinding, Error};
use heapless::LinearMap;

/// Per-channel bindings for up to `CHANNELS` analog channels.
///
/// Each channel is only ever touched through its own slot.
#[derive(Debug)]
pub struct CalibrationState<const CHANNELS: usize> {
    slots: LinearMap<u8, ChannelBinding, CHANNELS>,
}

impl<const CHANNELS: usize> Default for CalibrationState<CHANNELS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CHANNELS: usize> CalibrationState<CHANNELS> {
    pub fn new() -> Self {
        Self {
            slots: LinearMap::new(),
        }
    }

    /// Reserves `channel` in the unbound state, discarding any binding
    /// it held.
    pub fn begin(&mut self, channel: u8) -> Result<(), Error> {
        self.store(ChannelBinding::unbound(channel))
    }

    /// Replaces the binding for `binding.channel()`.
    pub fn bind(&mut self, binding: ChannelBinding) -> Result<&ChannelBinding, Error> {
        let channel = binding.channel();
        self.store(binding)?;
        self.binding(channel)
    }

    fn store(&mut self, binding: ChannelBinding) -> Result<(), Error> {
        let channel = binding.channel();
        self.slots
            .insert(channel, binding)
            .map(|_| ())
            .map_err(|_| Error::NoFreeSlot { channel })
    }

    /// The channel's slot, bound or not. `None` if never reserved.
    pub fn slot(&self, channel: u8) -> Option<&ChannelBinding> {
        self.slots.get(&channel)
    }

    /// The channel's binding, if a sensor has been identified on it.
    pub fn binding(&self, channel: u8) -> Result<&ChannelBinding, Error> {
        self.slots
            .get(&channel)
            .filter(|binding| binding.is_bound())
            .ok_or(Error::ChannelNotBound { channel })
    }

    /// Caches the latest raw and calibrated readings for a bound channel.
    pub fn update_reading(&mut self, channel: u8, raw: f32, calibrated: f32) -> Result<(), Error> {
        let binding = self
            .slots
            .get_mut(&channel)
            .filter(|binding| binding.is_bound())
            .ok_or(Error::ChannelNotBound { channel })?;
        binding.record(raw, calibrated);
        Ok(())
    }

    /// Number of reserved channels.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SENSORS;

    #[test]
    fn begin_reserves_unbound_slot() {
        let mut state = CalibrationState::<2>::new();
        state.begin(0).unwrap();

        assert_eq!(state.len(), 1);
        assert!(state.slot(0).is_some_and(|slot| !slot.is_bound()));
        assert_eq!(state.binding(0), Err(Error::ChannelNotBound { channel: 0 }));
        assert_eq!(state.slot(1), None);
    }

    #[test]
    fn bind_then_get() {
        let mut state = CalibrationState::<2>::new();
        state
            .bind(ChannelBinding::bound(1, 0.75, &SENSORS[1]))
            .unwrap();

        assert_eq!(state.binding(1).map(|b| b.sensor_number()), Ok(2));
        assert_eq!(state.binding(2), Err(Error::ChannelNotBound { channel: 2 }));
    }

    #[test]
    fn begin_discards_binding() {
        let mut state = CalibrationState::<1>::new();
        state
            .bind(ChannelBinding::bound(0, 0.75, &SENSORS[1]))
            .unwrap();
        state.begin(0).unwrap();

        assert_eq!(state.binding(0), Err(Error::ChannelNotBound { channel: 0 }));
    }

    #[test]
    fn full() {
        let mut state = CalibrationState::<1>::new();
        state.begin(0).unwrap();
        state.begin(0).unwrap();

        assert_eq!(state.begin(1), Err(Error::NoFreeSlot { channel: 1 }));
    }

    #[test]
    fn update_reading() {
        let mut state = CalibrationState::<2>::new();
        state
            .bind(ChannelBinding::bound(0, 0.75, &SENSORS[1]))
            .unwrap();
        state.begin(1).unwrap();

        state.update_reading(0, 3.0, 2.0).unwrap();
        assert_eq!(state.binding(0).unwrap().sensor_reading(), Some(2.0));
        assert_eq!(
            state.update_reading(1, 3.0, 2.0),
            Err(Error::ChannelNotBound { channel: 1 })
        );
        assert_eq!(
            state.update_reading(5, 3.0, 2.0),
            Err(Error::ChannelNotBound { channel: 5 })
        );
    }
}
