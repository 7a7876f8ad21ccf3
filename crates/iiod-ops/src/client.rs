//! Per-client connection state shared with the streaming engine.

use iiod_core::Context;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A client's output sink, shared between its caller thread and the reader
/// tasks serving it.
///
/// Writers are already serialized by the engine's locking protocol: a
/// reader task writes only while holding the owning entry's subscriber-list
/// lock, and the caller thread writes only before a subscriber is linked
/// and after its completion signal.
pub type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// State for one connected client.
///
/// Built by the connection layer, handed by reference into every dispatcher
/// operation issued on this client's behalf.
pub struct Client {
    ctx: Arc<Context>,
    out: SharedSink,
    verbose: bool,
    stop: AtomicBool,
}

impl Client {
    pub fn new(ctx: Arc<Context>, out: Box<dyn Write + Send>, verbose: bool) -> Self {
        Self {
            ctx,
            out: Arc::new(Mutex::new(out)),
            verbose,
            stop: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn sink(&self) -> SharedSink {
        Arc::clone(&self.out)
    }

    /// Whether this client asked for human-readable framing.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Flush buffered output. Flush failures surface on the next write.
    pub fn flush(&self) {
        let _ = self.out.lock().flush();
    }

    /// Mark the session for termination. The outer command loop checks this
    /// between commands; the streaming engine does not.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}
