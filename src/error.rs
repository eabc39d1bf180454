/// Possible errors from the DHT driver.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// A handshake phase or bit pulse exceeded its timing budget.
    Timeout,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}
