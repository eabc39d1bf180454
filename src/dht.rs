use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::error::DhtError;

/// Granularity of the busy-poll loops, in microseconds.
///
/// Every wait burns at least one full interval before sampling the line,
/// so an edge has settled by the time the level is read.
const POLL_INTERVAL_US: u32 = 2;

/// Duration of the host start pulse, in microseconds.
const START_PULSE_US: u32 = 20_000;

/// Time budget for the sensor to pull the line low after the start pulse.
const ACK_BEGIN_US: u32 = 40;

/// Time budget for each of the sensor's ~80us acknowledgment pulses.
const ACK_PULSE_US: u32 = 88;

/// Time budget for the low phase that leads every data bit.
const BIT_LOW_PHASE_US: u32 = 65;

/// Time budget for the width-modulated high phase of a data bit.
const BIT_HIGH_PHASE_US: u32 = 75;

/// Sensor variants supported by the driver.
///
/// Both variants speak the same single-wire protocol; they differ only in
/// how the transmitted bytes encode the measured values.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorKind {
    /// DHT11: whole degrees/percent only, the fractional bytes are unused.
    Dht11,
    /// DHT22 (AM2302): 16-bit sign-magnitude values in tenths.
    Dht22,
}

/// Driver for the DHT11/DHT22 family of temperature and humidity sensors.
pub struct Dht<PIN, D> {
    pin: PIN,
    delay: D,
    kind: SensorKind,
}

/// Reading returned by the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl<PIN, DELAY, E> Dht<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the DHT driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the sensor's data line. Must
    ///   support both input and output (open drain on real hardware).
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `kind` - Which sensor variant is wired to the pin.
    pub fn new(pin: PIN, delay: DELAY, kind: SensorKind) -> Self {
        Dht { pin, delay, kind }
    }

    /// Reads a temperature and humidity measurement from the sensor.
    ///
    /// Performs the complete communication sequence: the start pulse, the
    /// sensor's three-edge acknowledgment, 40 width-modulated data bits,
    /// checksum validation, and value decoding per sensor variant.
    ///
    /// The data line is driven high again before returning, on the error
    /// paths as well, since the sensor expects a released line between
    /// reads. The sensors also need at least 1-2 seconds between reads;
    /// pacing (and any retry policy) is left to the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read succeeds and the checksum is valid.
    /// * `Err(DhtError)` on a timeout, checksum, or pin error.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        // Resting state of the bus is high.
        self.pin.set_high()?;

        let result = self.read_frame();

        // Restore the idle level whether or not the transfer worked.
        self.pin.set_high()?;
        let frame = result?;

        let sum = frame[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v));
        if sum != frame[4] {
            Err(DhtError::ChecksumMismatch)
        } else {
            Ok(self.decode_frame(&frame))
        }
    }

    /// Runs the handshake and clocks in the raw 5-byte frame.
    fn read_frame(&mut self) -> Result<[u8; 5], DhtError<E>> {
        self.start()?;

        let mut frame = [0u8; 5];
        for b in frame.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(frame)
    }

    /// Sends the start pulse and waits for the sensor's acknowledgment.
    ///
    /// The host holds the line low for 20 ms, then releases it. The sensor
    /// answers by pulling the line low, driving it high for about 80us,
    /// then pulling it low again to begin the data transfer.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        self.pin.set_low()?;
        self.delay.delay_us(START_PULSE_US);
        self.pin.set_high()?;

        self.wait_for_low(ACK_BEGIN_US)?;
        self.wait_for_high(ACK_PULSE_US)?;
        self.wait_for_low(ACK_PULSE_US)?;
        Ok(())
    }

    /// Reads one byte (8 bits, MSB first) from the sensor.
    fn read_byte(&mut self) -> Result<u8, DhtError<E>> {
        let mut byte: u8 = 0;

        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << (7 - i);
            }
        }

        Ok(byte)
    }

    /// Reads a single width-modulated bit.
    ///
    /// Each bit is a fixed-length low phase followed by a variable-length
    /// high pulse. A high pulse that outlasts the preceding low phase is a
    /// 1; a shorter (or equal) pulse is a 0. Comparing the two measured
    /// durations avoids depending on absolute timing accuracy.
    fn read_bit(&mut self) -> Result<bool, DhtError<E>> {
        let low_duration = self.wait_for_high(BIT_LOW_PHASE_US)?;
        let high_duration = self.wait_for_low(BIT_HIGH_PHASE_US)?;

        Ok(high_duration > low_duration)
    }

    /// Waits until the data line goes high, returning the elapsed time.
    fn wait_for_high(&mut self, budget_us: u32) -> Result<u32, DhtError<E>> {
        Self::wait_for_state(&mut self.delay, budget_us, || self.pin.is_high())
    }

    /// Waits until the data line goes low, returning the elapsed time.
    fn wait_for_low(&mut self, budget_us: u32) -> Result<u32, DhtError<E>> {
        Self::wait_for_state(&mut self.delay, budget_us, || self.pin.is_low())
    }

    /// Polls a pin condition at a fixed granularity until it holds or the
    /// time budget runs out.
    ///
    /// Returns the time in microseconds spent waiting before the condition
    /// held, measured in whole poll intervals. The line is only sampled
    /// after a full interval has passed, so a level read here is never the
    /// jitter right after a transition.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::Timeout` once `budget_us` is exhausted.
    fn wait_for_state<F>(
        delay: &mut DELAY,
        budget_us: u32,
        mut condition: F,
    ) -> Result<u32, DhtError<E>>
    where
        F: FnMut() -> Result<bool, E>,
    {
        let mut elapsed_us = 0;
        while elapsed_us < budget_us {
            delay.delay_us(POLL_INTERVAL_US);
            if condition()? {
                return Ok(elapsed_us);
            }
            elapsed_us += POLL_INTERVAL_US;
        }
        Err(DhtError::Timeout)
    }

    /// Converts the raw frame into a `Reading` for this sensor variant.
    fn decode_frame(&self, frame: &[u8; 5]) -> Reading {
        let humidity = Self::decode_value(self.kind, frame[0], frame[1]);
        let temperature = Self::decode_value(self.kind, frame[2], frame[3]);

        Reading {
            temperature: f32::from(temperature) / 10.0,
            relative_humidity: f32::from(humidity) / 10.0,
        }
    }

    /// Decodes one value pair into signed tenths of a degree/percent.
    ///
    /// The DHT11 sends whole units in the first byte of each pair. The
    /// DHT22 sends a 15-bit magnitude in tenths with a sign bit in the top
    /// bit of the high byte. The sensor does not use two's-complement, so
    /// the magnitude is negated as-is when the sign bit is set.
    fn decode_value(kind: SensorKind, msb: u8, lsb: u8) -> i16 {
        match kind {
            SensorKind::Dht11 => i16::from(msb) * 10,
            SensorKind::Dht22 => {
                let tenths = i16::from(msb & 0x7F) << 8 | i16::from(lsb);
                if msb & 0x80 != 0 { -tenths } else { tenths }
            }
        }
    }
}
