//! Studio REST API outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `ResourceApi` port.

mod client;
mod dto;

pub use client::HttpResourceApi;
