//! The per-device reader task.
//!
//! One detached thread per registry entry pulls sample data from the
//! hardware and fans each read out to every subscriber. Two rules shape the
//! loop: the decision to terminate is made with the registry lock held, so
//! a concurrent attach can never land on an entry past its point of no
//! return; and the subscriber-list lock is never held across the hardware
//! read, so a slow device does not block joins or departures.

use crate::framing;
use crate::registry::{DevEntry, DeviceRegistry};
use iiod_core::Error;
use std::io;
use std::sync::Arc;
use tracing::{debug, warn};

/// What to do with a subscriber after one delivery pass.
enum Fate {
    Keep,
    Done,
    Broken(io::Error),
}

pub(crate) fn run(registry: Arc<DeviceRegistry>, entry: Arc<DevEntry>) {
    let sample_size = entry.sample_size;
    let max_samples = registry.config.max_samples_per_read(sample_size);
    let mut sticky: Option<Error> = None;

    // The loop exits holding the registry guard; teardown needs it.
    let mut entries = loop {
        let entries = registry.entries.lock();

        if sticky.is_some() {
            break entries;
        }

        let nb_samples = {
            let subs = entry.subscribers.lock();
            if subs.is_empty() {
                break entries;
            }
            subs.iter()
                .map(|s| s.remaining)
                .min()
                .unwrap_or(0)
                .min(max_samples)
        };

        let len = nb_samples * sample_size;
        let mut buf = Vec::new();
        if buf.try_reserve_exact(len).is_err() {
            sticky = Some(Error::OutOfMemory);
            continue;
        }
        buf.resize(len, 0);

        drop(entries);

        debug!(device = entry.dev.id(), bytes = len, "reading from device");
        let ret = entry.dev.read_raw(&mut buf);

        let mut subs = entry.subscribers.lock();
        let mut idx = 0;
        while idx < subs.len() {
            let fate = {
                let sub = &mut subs[idx];
                match &ret {
                    Err(e) => {
                        if sub.verbose {
                            framing::read_error_line(&sub.sink, e);
                        } else {
                            framing::status_line(&sub.sink, -i64::from(e.errno()));
                        }
                        // Stays linked; teardown delivers the status.
                        Fate::Keep
                    }
                    Ok(nread) => {
                        if !sub.verbose {
                            framing::status_line(&sub.sink, *nread as i64);
                        }

                        // A subscriber that joined after nb_samples was
                        // fixed gets fed on the next iteration.
                        let got = nread / sample_size;
                        if got > sub.remaining {
                            Fate::Keep
                        } else {
                            let (written, err) =
                                framing::write_all(&sub.sink, &buf[..*nread]);
                            sub.remaining -= written / sample_size;
                            match err {
                                Some(e) => Fate::Broken(e),
                                None if sub.remaining == 0 => Fate::Done,
                                None => Fate::Keep,
                            }
                        }
                    }
                }
            };

            match fate {
                Fate::Keep => idx += 1,
                Fate::Done => {
                    if let Some(sub) = subs.remove(idx) {
                        sub.done.signal(Ok(()));
                    }
                }
                Fate::Broken(e) => {
                    warn!(device = entry.dev.id(), error = %e, "dropping subscriber, sink write failed");
                    if let Some(sub) = subs.remove(idx) {
                        sub.done.signal(Err(Error::sink_write(&e)));
                    }
                }
            }
        }
        drop(subs);

        if let Err(e) = ret {
            sticky = Some(e);
        }
    };

    // Teardown. The registry guard has been held since the break, so no new
    // subscriber can slip in while the entry is dismantled.
    {
        let mut subs = entry.subscribers.lock();
        while let Some(sub) = subs.pop_front() {
            let status = match &sticky {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            };
            sub.done.signal(status);
        }
    }

    debug!(device = entry.dev.id(), "removing device from registry");
    entries.retain(|e| !Arc::ptr_eq(e, &entry));
    drop(entries);

    if let Err(e) = entry.dev.close() {
        warn!(device = entry.dev.id(), error = %e, "device close failed");
    }
    debug!(device = entry.dev.id(), "reader task finished");
}
