//! The command dispatcher: operations the command parser invokes.

use crate::client::Client;
use crate::framing;
use crate::registry::DeviceRegistry;
use crate::subscriber::{Completion, Subscriber};
use iiod_core::{EngineConfig, Error, IioDevice, Result};
use std::sync::Arc;
use tracing::debug;

/// Public face of the streaming core.
///
/// One dispatcher serves every client of the daemon. Each operation runs on
/// the calling client's thread: streaming reads park there until the reader
/// task retires their subscriber, attribute accesses complete inline.
pub struct Dispatcher {
    registry: Arc<DeviceRegistry>,
}

impl Dispatcher {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: Arc::new(DeviceRegistry::new(config)),
        }
    }

    /// The registry backing this dispatcher.
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Stream `nb` samples of raw data from a device to the client's sink.
    ///
    /// Returns the total payload byte count, `nb * sample_size`. Device
    /// lookup failures are framed to the client; a sample-size mismatch
    /// with an already-streaming device is only returned.
    pub fn read_dev(
        &self,
        client: &Client,
        id: &str,
        nb: usize,
        sample_size: usize,
    ) -> Result<usize> {
        let Some(dev) = client.context().find_device(id) else {
            return Err(self.report_no_device(client));
        };
        self.read_buffer(client, &dev, nb, sample_size)
    }

    fn read_buffer(
        &self,
        client: &Client,
        dev: &Arc<dyn IioDevice>,
        nb: usize,
        sample_size: usize,
    ) -> Result<usize> {
        let total = nb
            .checked_mul(sample_size)
            .ok_or(Error::InvalidArgument)?;

        let done = Arc::new(Completion::new());
        let sub = Subscriber {
            remaining: nb,
            sink: client.sink(),
            verbose: client.verbose(),
            done: Arc::clone(&done),
        };
        self.registry.subscribe(dev, sample_size, sub)?;

        debug!(device = dev.id(), nb, "waiting for stream completion");
        let status = done.wait();
        client.flush();
        status.map(|()| total)
    }

    /// Read a named device attribute and frame it to the client.
    ///
    /// On success the client sees the byte-count header, the raw value
    /// bytes, and a closing newline.
    pub fn read_dev_attr(&self, client: &Client, id: &str, attr: &str) -> Result<usize> {
        let Some(dev) = client.context().find_device(id) else {
            return Err(self.report_no_device(client));
        };

        let mut buf = vec![0u8; self.registry.config.attr_buf_size];
        match dev.attr_read(attr, &mut buf) {
            Ok(n) => {
                let sink = client.sink();
                framing::status_line(&sink, n as i64);
                framing::attr_payload(&sink, &buf[..n])
            }
            Err(e) => {
                self.report_error(client, &e);
                Err(e)
            }
        }
    }

    /// Write a named device attribute and frame the result to the client.
    pub fn write_dev_attr(
        &self,
        client: &Client,
        id: &str,
        attr: &str,
        value: &str,
    ) -> Result<usize> {
        let Some(dev) = client.context().find_device(id) else {
            return Err(self.report_no_device(client));
        };

        match dev.attr_write(attr, value) {
            Ok(n) => {
                framing::status_line(&client.sink(), n as i64);
                Ok(n)
            }
            Err(e) => {
                self.report_error(client, &e);
                Err(e)
            }
        }
    }

    fn report_no_device(&self, client: &Client) -> Error {
        let err = Error::NoDevice;
        self.report_error(client, &err);
        err
    }

    /// Frame an error per the client's verbosity convention.
    fn report_error(&self, client: &Client, err: &Error) {
        let sink = client.sink();
        if client.verbose() {
            framing::error_line(&sink, err);
        } else {
            framing::status_line(&sink, -i64::from(err.errno()));
        }
    }
}
