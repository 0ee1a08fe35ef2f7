//! reelstate - Processing State for Media Pipelines
//!
//! File-backed state shared by media pipeline steps: a content-addressed
//! cache answering "was this file already processed, and are the results
//! still there?", and durable cursors that let a stateless step walk a
//! directory one item per invocation.

pub mod batch;
pub mod cache;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod error;
pub mod store;
pub mod ui;

pub use error::{ReelError, ReelResult};
