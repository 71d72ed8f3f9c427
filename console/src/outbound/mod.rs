//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed studio REST API client
//! - **storage**: cap-std file store for the bearer credential
//! - **notify**: tracing-backed notification buffer
//! - **navigation**: navigation recorder for the terminal front end
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod http;
pub mod navigation;
pub mod notify;
pub mod storage;
