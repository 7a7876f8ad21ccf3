//! Streaming core of the rust-iiod daemon.
//!
//! This crate multiplexes concurrent client read requests over a shared set
//! of IIO devices. Each device with pending reads gets exactly one reader
//! task, which batches hardware reads by the smallest outstanding request
//! and fans the bytes out to every subscribed client; a registry guards the
//! entry lifecycle so a device is opened when its first subscriber arrives
//! and closed after its last one is retired. Attribute read/write commands
//! ride the same device-lookup path but carry no concurrency.
//!
//! The command grammar and the transport live outside this crate. The
//! surface consumed by that layer is [`Dispatcher`] plus the per-client
//! [`Client`] record.

pub mod client;
pub mod dispatch;
mod framing;
mod reader;
pub mod registry;
mod subscriber;

pub use client::{Client, SharedSink};
pub use dispatch::Dispatcher;
pub use registry::DeviceRegistry;
