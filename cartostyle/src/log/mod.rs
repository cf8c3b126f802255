//! Logging abstraction layer.
//!
//! Library components log through the [`Logger`] trait instead of calling
//! `tracing` directly, so the compiler and the render bridge can run silently
//! in tests and benchmarks.
//!
//! - [`Logger`]: the interface components accept as `Arc<dyn Logger>`
//! - [`TracingLogger`]: production adapter delegating to `tracing`
//! - [`NoOpLogger`]: discards everything
//!
//! ```
//! use cartostyle::log::{Logger, NoOpLogger};
//! use cartostyle::{log_debug, log_info};
//! use std::sync::Arc;
//!
//! struct Compiler {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Compiler {
//!     fn run(&self) {
//!         log_info!(self.logger, "compiling {} styles", 3);
//!         log_debug!(self.logger, "done");
//!     }
//! }
//!
//! Compiler { logger: Arc::new(NoOpLogger) }.run();
//! ```

mod noop;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
