//! Core types for the rust-iiod daemon.
//!
//! This crate provides the foundation the streaming engine is built on:
//!
//! - [`IioDevice`]: the object-safe seam to one physical device
//! - [`Context`]: the enumerated device set, with id-or-name lookup
//! - [`Error`]: the errno-mapped error taxonomy shared by every layer
//! - [`EngineConfig`]: validated tuning knobs for the read engine
//!
//! Nothing in here performs I/O by itself; hardware backends implement
//! [`IioDevice`] and the engine crates drive them.

pub mod config;
pub mod context;
pub mod device;
pub mod error;

pub use config::{
    EngineConfig, EngineConfigBuilder, DEFAULT_ATTR_BUF_SIZE, DEFAULT_READ_CHUNK_BYTES,
};
pub use context::Context;
pub use device::IioDevice;
pub use error::{strerror, Error, Result};
