//! Dot-matrix sequence comparison engine and plot persistence format.
//!
//! This crate is the computational core of a Dotter-style viewer: it turns
//! two biological sequences and a substitution matrix into a greyscale
//! pixmap, maps that pixmap through a user-controlled greyramp, overlays
//! pre-computed HSPs, and reads/writes the binary save-file format. The
//! surrounding window chrome, dialogs, and the alignment text tool are not
//! part of this crate; see `src/cli.rs` for the thin batch-mode driver that
//! does consume it.

pub mod alphabet;
pub mod coords;
pub mod engine;
pub mod error;
pub mod greyramp;
pub mod hsp;
pub mod karlin;
pub mod logging;
pub mod matrix;
pub mod persist;
pub mod sequence;
pub mod view;

pub use error::{DotterError, Result};
