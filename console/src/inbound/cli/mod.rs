//! Terminal front end: argument parsing, command execution, and rendering.

mod args;
pub mod render;
mod runner;

pub use args::{
    CliArgs, Command, CreateArgs, InvitationArgs, ListArgs, LoginArgs, ResourceKind, ReviewArgs,
    TargetArgs, UpdateArgs, UploadArgs,
};
pub use runner::{Report, run};
