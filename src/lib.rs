//! Processing-style sketches rendered in the terminal.
//!
//! A [`sketch::Sketch`] is sized and set up through [`sketch::launch`] and
//! then drawn frame by frame onto a [`sketch::Surface`]. The terminal host
//! lives in [`internal::ui`]; [`testing`] provides recording doubles.

pub mod app;
pub mod config;
pub mod geometry;
pub mod internal;
pub mod sketch;
pub mod testing;
pub mod tui;
