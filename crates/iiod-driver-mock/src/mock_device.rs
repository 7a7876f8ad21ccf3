//! A simulated IIO device.

use crate::pattern::fill_pattern;
use iiod_core::{Error, IioDevice, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted read failure: succeed `reads` times, then keep failing with
/// `errno`.
#[derive(Debug, Clone, Copy)]
struct FailAfter {
    reads: usize,
    errno: i32,
}

#[derive(Default)]
struct MockState {
    open: bool,
    /// Byte offset into the pattern stream. Survives close/open, the way a
    /// free-running acquisition source would.
    cursor: u64,
    /// Successful `read_raw` calls so far.
    reads: usize,
    attrs: HashMap<String, String>,
}

/// Simulated IIO device producing a deterministic byte-ramp stream.
///
/// Behavior is scripted through [`MockDevice::builder`]: per-read byte
/// limits simulate trickling hardware, read delays simulate blocking I/O,
/// and failure injection covers the open and read error paths. Open/close
/// counters let lifecycle tests assert that a streaming session touched the
/// hardware exactly once.
pub struct MockDevice {
    id: String,
    name: String,
    read_limit: Option<usize>,
    read_delay: Option<Duration>,
    fail_open: Option<i32>,
    fail_read_after: Option<FailAfter>,
    opens: AtomicUsize,
    closes: AtomicUsize,
    state: Mutex<MockState>,
}

impl MockDevice {
    /// Create a new builder for a mock device with the given id.
    pub fn builder(id: impl Into<String>) -> MockDeviceBuilder {
        MockDeviceBuilder {
            id: id.into(),
            name: None,
            read_limit: None,
            read_delay: None,
            fail_open: None,
            fail_read_after: None,
            attrs: HashMap::new(),
        }
    }

    /// Successful `open` calls so far.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Successful `close` calls so far.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }
}

impl IioDevice for MockDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<()> {
        if let Some(errno) = self.fail_open {
            return Err(Error::DeviceOpen { errno });
        }
        let mut state = self.state.lock();
        if state.open {
            return Err(Error::DeviceOpen { errno: libc::EBUSY });
        }
        state.open = true;
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(Error::DeviceOpen {
                errno: libc::EBADF,
            });
        }
        state.open = false;
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read_raw(&self, buf: &mut [u8]) -> Result<usize> {
        if let Some(delay) = self.read_delay {
            std::thread::sleep(delay);
        }

        let mut state = self.state.lock();
        if !state.open {
            return Err(Error::DeviceRead {
                errno: libc::EBADF,
            });
        }
        if let Some(fail) = self.fail_read_after {
            if state.reads >= fail.reads {
                return Err(Error::DeviceRead { errno: fail.errno });
            }
        }

        let n = match self.read_limit {
            Some(limit) => buf.len().min(limit),
            None => buf.len(),
        };
        fill_pattern(&mut buf[..n], state.cursor);
        state.cursor += n as u64;
        state.reads += 1;
        Ok(n)
    }

    fn attr_read(&self, attr: &str, buf: &mut [u8]) -> Result<usize> {
        let state = self.state.lock();
        let value = state.attrs.get(attr).ok_or(Error::DeviceRead {
            errno: libc::ENOENT,
        })?;
        let n = value.len().min(buf.len());
        buf[..n].copy_from_slice(&value.as_bytes()[..n]);
        Ok(n)
    }

    fn attr_write(&self, attr: &str, value: &str) -> Result<usize> {
        let mut state = self.state.lock();
        state.attrs.insert(attr.to_string(), value.to_string());
        Ok(value.len())
    }
}

/// Builder for [`MockDevice`].
pub struct MockDeviceBuilder {
    id: String,
    name: Option<String>,
    read_limit: Option<usize>,
    read_delay: Option<Duration>,
    fail_open: Option<i32>,
    fail_read_after: Option<FailAfter>,
    attrs: HashMap<String, String>,
}

impl MockDeviceBuilder {
    /// Set the device name (defaults to the id).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Cap the bytes returned by a single `read_raw`, simulating hardware
    /// that trickles data.
    pub fn read_limit(mut self, bytes: usize) -> Self {
        self.read_limit = Some(bytes);
        self
    }

    /// Block each `read_raw` for `delay` before returning.
    pub fn read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Make `open` fail with the given errno.
    pub fn fail_open(mut self, errno: i32) -> Self {
        self.fail_open = Some(errno);
        self
    }

    /// Succeed `reads` times, then fail every `read_raw` with `errno`.
    pub fn fail_read_after(mut self, reads: usize, errno: i32) -> Self {
        self.fail_read_after = Some(FailAfter { reads, errno });
        self
    }

    /// Seed an attribute value.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> MockDevice {
        let name = self.name.unwrap_or_else(|| self.id.clone());
        MockDevice {
            id: self.id,
            name,
            read_limit: self.read_limit,
            read_delay: self.read_delay,
            fail_open: self.fail_open,
            fail_read_after: self.fail_read_after,
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            state: Mutex::new(MockState {
                attrs: self.attrs,
                ..MockState::default()
            }),
        }
    }
}
