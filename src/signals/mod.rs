//! Signal pipeline: fetch a series, run a detector, report the outcome.

pub mod error;
pub mod observer;
pub mod pipeline;

pub use error::{SignalError, SignalResult, SignalResultExt};
pub use observer::{NoopObserver, SignalObserver, TracingObserver};
pub use pipeline::SignalPipeline;
