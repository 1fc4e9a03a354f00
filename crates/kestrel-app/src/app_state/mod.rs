//! Top-level application state.
//!
//! Wires the feed session to the console surface and drives the surface's
//! run loop. See [`ChatApp::launch`] for the startup order.

mod commands;
mod core;
mod feed;
mod init;
mod polling;
mod session;
mod shutdown;
mod types;
mod views;


pub use self::core::ChatShell;
pub use self::init::ChatApp;
