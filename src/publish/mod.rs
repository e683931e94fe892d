//! Batch image publisher engine

pub mod publisher;

pub use publisher::{EventHandler, PublishEvent, PublishStrategy, Publisher};
