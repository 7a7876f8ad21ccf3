//! Registry of actively-streamed devices.
//!
//! Each device with at least one pending read has exactly one entry here
//! and exactly one reader task bound to it. The registry lock serializes
//! entry creation, lookup, and removal; when both locks are needed, the
//! order is always registry lock first, then the entry's subscriber-list
//! lock.

use crate::reader;
use crate::subscriber::Subscriber;
use iiod_core::{EngineConfig, Error, IioDevice, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// Registry record for one streaming device.
///
/// Owned by its reader task once created; the registry keeps a lookup
/// handle only. The entry dies when the reader task observes an empty
/// subscriber list or a sticky error and dismantles it under the registry
/// lock.
pub(crate) struct DevEntry {
    pub(crate) dev: Arc<dyn IioDevice>,
    pub(crate) sample_size: usize,
    /// Pending reads on this device, newest at the front. Mutated only
    /// under this lock, which is never held across a hardware read.
    pub(crate) subscribers: Mutex<VecDeque<Subscriber>>,
}

/// Map of devices that currently have a live reader task.
pub struct DeviceRegistry {
    pub(crate) entries: Mutex<Vec<Arc<DevEntry>>>,
    pub(crate) config: EngineConfig,
}

impl DeviceRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            config,
        }
    }

    /// Number of devices currently streaming.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// The engine configuration this registry runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Attach `sub` to the entry for `dev`, creating the entry and its
    /// reader task if this is the device's first subscriber.
    ///
    /// The whole operation runs under the registry lock, so a terminating
    /// reader task can never observe the entry between lookup and attach,
    /// and no duplicate entry can be inserted.
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        dev: &Arc<dyn IioDevice>,
        sample_size: usize,
        sub: Subscriber,
    ) -> Result<()> {
        if sample_size == 0 {
            return Err(Error::InvalidArgument);
        }

        let mut entries = self.entries.lock();

        let entry = match entries.iter().find(|e| e.dev.id() == dev.id()) {
            Some(existing) => {
                // Everyone reading one device must agree on the sample
                // framing.
                if existing.sample_size != sample_size {
                    return Err(Error::InvalidArgument);
                }
                Arc::clone(existing)
            }
            None => {
                debug!(device = dev.id(), sample_size, "creating registry entry");
                dev.open()?;

                let entry = Arc::new(DevEntry {
                    dev: Arc::clone(dev),
                    sample_size,
                    subscribers: Mutex::new(VecDeque::new()),
                });

                // Detached: nobody joins the reader, it owns its cleanup.
                // Its first iteration blocks on the registry lock we hold,
                // so the entry is fully published before it runs.
                let registry = Arc::clone(self);
                let task_entry = Arc::clone(&entry);
                let spawned = thread::Builder::new()
                    .name(format!("iiod-read-{}", dev.id()))
                    .spawn(move || reader::run(registry, task_entry));
                if let Err(e) = spawned {
                    let _ = dev.close();
                    return Err(Error::ThreadSpawn {
                        errno: e.raw_os_error().unwrap_or(libc::EAGAIN),
                    });
                }

                entries.push(Arc::clone(&entry));
                entry
            }
        };

        entry.subscribers.lock().push_front(sub);
        Ok(())
    }
}
