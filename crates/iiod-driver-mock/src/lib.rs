//! Simulated IIO devices for testing without physical hardware.
//!
//! [`MockDevice`] implements the core device seam with a deterministic
//! byte-ramp sample stream, an in-memory attribute store, and scripted
//! failure injection for the open and read paths. Lifecycle counters expose
//! how often the device was opened and closed, which the engine's
//! at-most-once invariants are asserted against.

mod mock_device;
mod pattern;

pub use mock_device::{MockDevice, MockDeviceBuilder};
pub use pattern::{expected_pattern, fill_pattern};
