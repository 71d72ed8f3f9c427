//! Unit tests for the layering rules.

use std::path::{Path, PathBuf};

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

fn messages(result: Result<(), ArchitectureLintError>) -> Vec<String> {
    match result {
        Err(ArchitectureLintError::Violations(violations)) => violations
            .into_iter()
            .map(|violation| violation.message)
            .collect(),
        other => panic!("expected violations, got {other:?}"),
    }
}

#[rstest]
#[case::inbound_uses_domain(
    "inbound/cli/runner.rs",
    "use crate::domain::ResourceId; fn run() { let _ = ResourceId::new(\"x\"); }"
)]
#[case::inbound_uses_the_composition_root(
    "inbound/cli/runner.rs",
    "use crate::app::ConsoleApp; fn run(_app: &ConsoleApp) {}"
)]
#[case::inbound_reads_files_with_cap_std(
    "inbound/cli/runner.rs",
    "use cap_std::{ambient_authority, fs::Dir}; fn run() {}"
)]
#[case::domain_uses_sibling_via_super(
    "domain/resources/package.rs",
    "use super::Amount; use crate::domain::schema::Draft;"
)]
#[case::domain_tests_glob_their_parent(
    "domain/decode.rs",
    "fn f() {} #[cfg(test)] mod tests { use super::*; }"
)]
#[case::domain_waits_with_tokio_time(
    "domain/invitation.rs",
    "async fn f() { tokio::time::sleep(std::time::Duration::ZERO).await; }"
)]
#[case::outbound_uses_reqwest(
    "outbound/http/client.rs",
    "use reqwest::Client; use crate::domain::ports::ResourceApi;"
)]
#[case::composition_root_is_unrestricted(
    "main.rs",
    "use admin_console::outbound::http::HttpResourceApi; fn main() { println!(\"x\"); }"
)]
fn well_layered_sources_pass(#[case] file: &str, #[case] contents: &str) {
    let result = lint_one(file, contents);
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
#[case::inbound_uses_outbound(
    "inbound/cli/runner.rs",
    "use crate::outbound::http::HttpResourceApi;",
    "found crate::outbound"
)]
#[case::inbound_uses_bare_outbound(
    "inbound/cli/runner.rs",
    "use outbound::storage::FileCredentialStore;",
    "found crate::outbound"
)]
#[case::inbound_uses_crate_name_outbound(
    "inbound/cli/runner.rs",
    "fn run() { let _ = admin_console::outbound::http::HttpResourceApi::new; }",
    "found crate::outbound"
)]
#[case::inbound_climbs_into_outbound(
    "inbound/cli/runner.rs",
    "use super::super::super::outbound::notify::TracingNotifier;",
    "found crate::outbound"
)]
#[case::inbound_uses_reqwest(
    "inbound/cli/runner.rs",
    "fn run() { let _ = reqwest::Client::new(); }",
    "must not use `reqwest`"
)]
#[case::domain_uses_app(
    "domain/controller.rs",
    "use crate::app::ConsoleApp;",
    "found crate::app"
)]
#[case::domain_uses_config(
    "domain/display.rs",
    "use crate::config::ConsoleSettings;",
    "found crate::config"
)]
#[case::domain_uses_clap(
    "domain/resource.rs",
    "fn thing() { let _ = clap::Command::new(\"x\"); }",
    "must not use `clap`"
)]
#[case::domain_reads_files(
    "domain/session.rs",
    "use std::fs; fn f() { let _ = std::fs::read(\"x\"); }",
    "must not use `std::fs`"
)]
#[case::domain_opens_sockets(
    "domain/invitation.rs",
    "async fn f() { let _ = tokio::net::TcpStream::connect(\"x\").await; }",
    "must not use `tokio::net`"
)]
#[case::domain_prints(
    "domain/pending.rs",
    "fn f() { println!(\"pending\"); }",
    "must not write to the terminal with `println!`"
)]
#[case::outbound_uses_inbound(
    "outbound/http/client.rs",
    "use crate::inbound::cli::render;",
    "found crate::inbound"
)]
#[case::outbound_uses_clap(
    "outbound/notify.rs",
    "use clap::Parser;",
    "must not use `clap`"
)]
#[case::outbound_prints(
    "outbound/notify.rs",
    "fn f() { eprintln!(\"x\"); }",
    "must not write to the terminal with `eprintln!`"
)]
fn boundary_violations_are_reported(
    #[case] file: &str,
    #[case] contents: &str,
    #[case] expected: &str,
) {
    let found = messages(lint_one(file, contents));
    assert!(
        found.iter().any(|message| message.contains(expected)),
        "expected `{expected}` in {found:?}"
    );
}

#[rstest]
fn repeated_references_are_reported_once() {
    let found = messages(lint_one(
        "domain/controller.rs",
        "use reqwest::Client; fn f(_c: reqwest::Client) { let _ = reqwest::Client::new(); }",
    ));
    assert_eq!(found, vec!["domain must not use `reqwest`".to_owned()]);
}

#[rstest]
fn files_outside_the_layers_are_rejected() {
    let result = lint_one("support/helpers.rs", "fn f() {}");
    assert!(matches!(result, Err(ArchitectureLintError::UnknownLayer { .. })));
}

#[rstest]
fn invalid_rust_is_a_parse_error() {
    let result = lint_one("domain/broken.rs", "fn f( {");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
#[case("domain/resources/mod.rs", &["domain", "resources"])]
#[case("domain/error/tests.rs", &["domain", "error", "tests"])]
#[case("lib.rs", &["lib"])]
fn module_paths_follow_the_file_layout(#[case] file: &str, #[case] expected: &[&str]) {
    assert_eq!(module_path(Path::new(file)), expected);
}
