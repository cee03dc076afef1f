//! TrackReplay command line library
//!
//! Command implementations shared by the `trackreplay` binary and its
//! integration tests.

pub mod artifact;
pub mod build;
pub mod config;
pub mod inspect;
pub mod play;
