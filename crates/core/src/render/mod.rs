//! Map rendering and publishing.
//!
//! Both steps shell out to external tools through the [`CommandRunner`]
//! trait, so tests can swap in a fake runner instead of the real renderer and
//! `rsync`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use realmsync_core::render::{MapPublisher, MapRenderer, ProcessRunner};
//!
//! let runner = Arc::new(ProcessRunner::new(false));
//! MapRenderer::new(config.render.clone(), runner.clone()).render().await?;
//! MapPublisher::new(config.publish.clone(), runner).publish().await?;
//! ```

mod error;
mod publisher;
mod renderer;
mod runner;

pub use error::ProcessError;
pub use publisher::MapPublisher;
pub use renderer::MapRenderer;
pub use runner::{CommandInvocation, CommandOutput, CommandRunner, ProcessRunner};
