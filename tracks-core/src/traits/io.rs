//! Input and timing traits for the control loop

/// Non-blocking byte input from the host link
pub trait ByteSource {
    /// Return the next received byte, or `None` if nothing is pending
    ///
    /// Must return in bounded time whether or not a byte is available.
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Monotonic time source
///
/// Never wall-clock time: the value must not jump when the calendar
/// clock is adjusted.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&self) -> u64;
}
