//! The enumerated device set handed to the daemon at startup.

use crate::device::IioDevice;
use std::sync::Arc;

/// An already-enumerated collection of devices.
///
/// The core does not discover hardware. The platform layer builds a context
/// once and the dispatcher resolves client-supplied identifiers against it;
/// a lookup matches either the device id or its name, in enumeration order.
#[derive(Clone, Default)]
pub struct Context {
    devices: Vec<Arc<dyn IioDevice>>,
}

impl Context {
    pub fn new(devices: Vec<Arc<dyn IioDevice>>) -> Self {
        Self { devices }
    }

    /// Resolve `id` against device ids and names.
    pub fn find_device(&self, id: &str) -> Option<Arc<dyn IioDevice>> {
        self.devices
            .iter()
            .find(|d| d.id() == id || d.name() == id)
            .cloned()
    }

    /// All enumerated devices.
    pub fn devices(&self) -> &[Arc<dyn IioDevice>] {
        &self.devices
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}
