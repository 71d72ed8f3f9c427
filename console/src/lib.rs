//! Administrative console for the studio booking platform.
//!
//! The crate is split along hexagonal lines:
//! - [`domain`]: resources, the generic CRUD controller, the session guard,
//!   and the ports they depend on.
//! - [`outbound`]: reqwest, cap-std, and tracing adapters for those ports.
//! - [`inbound`]: the clap command-line front end.
//! - [`app`] and [`config`]: wiring and OrthoConfig settings.

pub mod app;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
