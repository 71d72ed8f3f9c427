//! Inbound adapters translating operator input into domain calls.

pub mod cli;
