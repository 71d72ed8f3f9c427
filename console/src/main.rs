//! `admin-console` entry point: loads settings, wires adapters, runs one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use admin_console::app::ConsoleApp;
use admin_console::config::ConsoleSettings;
use admin_console::inbound::cli::{self, CliArgs};
use admin_console::inbound::cli::render::render_notifications;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = ConsoleSettings::load_from_iter([OsString::from("admin-console")])
        .map_err(|error| eyre!("load console settings: {error}"))?;
    let app = ConsoleApp::from_settings(&settings).wrap_err("wire console adapters")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    let report = runtime.block_on(cli::run(&app, args.command));

    let notifications = render_notifications(&app.drain_notifications());
    if !notifications.is_empty() {
        eprintln!("{notifications}");
    }
    println!("{}", report.body);
    if app.login_requested() {
        eprintln!("Sign in with `admin-console login --token <token>`.");
    }

    Ok(if report.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
