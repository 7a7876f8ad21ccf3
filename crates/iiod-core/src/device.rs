//! The device handle seam.

use crate::error::Result;

/// One physical IIO device.
///
/// The engine only ever talks to hardware through this object-safe seam, so
/// platform backends and simulated devices plug in the same way. `open` and
/// `close` bracket a streaming session; the registry guarantees each is
/// called exactly once per session regardless of how many clients share the
/// stream. Attribute access does not require the device to be open.
pub trait IioDevice: Send + Sync {
    /// Stable device identifier (e.g. `iio:device0`).
    fn id(&self) -> &str;

    /// Human-readable device name.
    fn name(&self) -> &str;

    /// Claim the device for streaming.
    fn open(&self) -> Result<()>;

    /// Release the device after streaming.
    fn close(&self) -> Result<()>;

    /// Read up to `buf.len()` bytes of raw sample data. Returns the number
    /// of bytes read, which may be less than requested but is always a
    /// whole number of samples.
    fn read_raw(&self, buf: &mut [u8]) -> Result<usize>;

    /// Read the value of attribute `attr` into `buf`; returns bytes read.
    fn attr_read(&self, attr: &str, buf: &mut [u8]) -> Result<usize>;

    /// Write `value` to attribute `attr`; returns bytes accepted.
    fn attr_write(&self, attr: &str, value: &str) -> Result<usize>;
}
