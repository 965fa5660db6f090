//! Triptych - Three-Pane Web Playground Engine
//!
//! Triptych provides two parallel interfaces for building a web page:
//! 1. Direct Editing - three source panes (markup, style, script) merged
//!    into one live-previewable HTML document
//! 2. AI Generation - natural language prompts producing code for a pane
//!    or placeholder image assets
//!
//! # Architecture
//!
//! The engine is organized around an editing session:
//! - `compose`: pure composition of the three panes into one document
//! - `session`: source buffers, render scheduling, render surfaces
//! - `generate`: generation providers behind a per-pane request bridge
//! - `store`: project persistence, caching and crash-recovery snapshots

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod generate;
pub mod session;
pub mod store;

pub use error::{Result, TriptychError};
