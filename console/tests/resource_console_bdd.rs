//! Behavioural tests for the resource console command flow.
//!
//! Scenarios drive the CLI runner against a scripted API double and an
//! in-memory credential store, checking the rendered output and the requests
//! that reached the API.

use std::sync::Arc;

use admin_console::app::ConsoleApp;
use admin_console::domain::AuthToken;
use admin_console::domain::ports::{
    ApiError, CredentialStore, InMemoryCredentialStore, NotificationLevel,
};
use admin_console::inbound::cli::{self, CliArgs, Report};
use clap::Parser;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::{Builder, Runtime};

#[path = "support/doubles.rs"]
mod doubles;

use doubles::{Method, ScriptedApi};

struct ConsoleWorld {
    runtime: Runtime,
    api: Arc<ScriptedApi>,
    store: Arc<InMemoryCredentialStore>,
    app: ConsoleApp,
    report: Option<Report>,
    notifications: Vec<admin_console::domain::ports::Notification>,
    pending_redemptions: Vec<Value>,
    pending_orders: Vec<Value>,
}

impl ConsoleWorld {
    fn run(&mut self, command_line: &str) {
        let args = CliArgs::try_parse_from(
            std::iter::once("admin-console").chain(command_line.split_whitespace()),
        )
        .expect("command line should parse");
        let report = self.runtime.block_on(cli::run(&self.app, args.command));
        self.notifications.extend(self.app.drain_notifications());
        self.report = Some(report);
    }

    fn report(&self) -> &Report {
        self.report.as_ref().expect("a command should have run")
    }

    fn script_pending(&self) {
        self.api.respond(
            Method::Get,
            "/api/redemptions/pending",
            Ok(Value::Array(self.pending_redemptions.clone())),
        );
        self.api.respond(
            Method::Get,
            "/api/orders/pending",
            Ok(Value::Array(self.pending_orders.clone())),
        );
    }
}

#[fixture]
fn world() -> ConsoleWorld {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("create runtime");
    let api = Arc::new(ScriptedApi::default());
    let store = Arc::new(InMemoryCredentialStore::default());
    let app = ConsoleApp::new(api.clone(), store.clone(), Arc::new(DefaultClock));
    ConsoleWorld {
        runtime,
        api,
        store,
        app,
        report: None,
        notifications: Vec::new(),
        pending_redemptions: Vec::new(),
        pending_orders: Vec::new(),
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an operator is signed in")]
fn an_operator_is_signed_in(world: &mut ConsoleWorld) {
    let token = AuthToken::new("tok-1").expect("valid token");
    world
        .app
        .guard()
        .sign_in(token, Some("admin@studio.test".to_owned()), Some("ADMIN".to_owned()))
        .expect("sign in");
}

#[given("no credential is stored")]
fn no_credential_is_stored(world: &mut ConsoleWorld) {
    world.store.clear().expect("clear store");
}

#[given("the packages endpoint answers with an error object")]
fn the_packages_endpoint_answers_with_an_error_object(world: &mut ConsoleWorld) {
    world.api.respond(
        Method::Get,
        "/api/packages",
        Ok(json!({"error": "not a list"})),
    );
}

#[given("the API rejects new packages with {message}")]
fn the_api_rejects_new_packages_with(world: &mut ConsoleWorld, message: String) {
    world.api.respond(
        Method::Post,
        "/api/packages",
        Err(ApiError::status(400_u16, unquote(&message))),
    );
}

#[given("the package {id} named {name} exists")]
fn the_package_exists(world: &mut ConsoleWorld, id: String, name: String) {
    world.api.respond(
        Method::Get,
        "/api/packages",
        Ok(json!([{
            "id": unquote(&id),
            "code": "TEN",
            "name": unquote(&name),
            "type": "MULTI_RIDE",
            "price": "1200.00",
            "credits": 10,
            "is_active": true
        }])),
    );
}

#[given("the API rejects the stored credential")]
fn the_api_rejects_the_stored_credential(world: &mut ConsoleWorld) {
    for path in ["/api/sessions", "/api/classes", "/api/instructors"] {
        world.api.respond(Method::Get, path, Err(ApiError::unauthorized()));
    }
}

#[given("pending redemptions {ids} exist")]
fn pending_redemptions_exist(world: &mut ConsoleWorld, ids: String) {
    world.pending_redemptions = unquote(&ids)
        .split(',')
        .map(|id| json!({"id": id.trim(), "amount": "450.00"}))
        .collect();
    world.script_pending();
}

#[given("a pending order {id} referencing redemption {redemption} exists")]
fn a_pending_order_referencing_redemption_exists(
    world: &mut ConsoleWorld,
    id: String,
    redemption: String,
) {
    world.pending_orders.push(json!({
        "order_id": unquote(&id),
        "redemption_id": unquote(&redemption),
    }));
    world.script_pending();
}

#[given("a standalone pending order {id} exists")]
fn a_standalone_pending_order_exists(world: &mut ConsoleWorld, id: String) {
    world.pending_orders.push(json!({"order_id": unquote(&id)}));
    world.script_pending();
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the operator runs {command}")]
fn the_operator_runs(world: &mut ConsoleWorld, command: String) {
    world.run(unquote(&command));
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the output is {expected}")]
fn the_output_is(world: &mut ConsoleWorld, expected: String) {
    assert_eq!(world.report().body, unquote(&expected));
}

#[then("the output mentions {expected}")]
fn the_output_mentions(world: &mut ConsoleWorld, expected: String) {
    let body = &world.report().body;
    assert!(body.contains(unquote(&expected)), "unexpected output: {body}");
}

#[then("the command succeeds")]
fn the_command_succeeds(world: &mut ConsoleWorld) {
    assert!(!world.report().failed, "{}", world.report().body);
}

#[then("the command fails")]
fn the_command_fails(world: &mut ConsoleWorld) {
    assert!(world.report().failed, "{}", world.report().body);
}

#[then("no POST was sent to {path}")]
fn no_post_was_sent_to(world: &mut ConsoleWorld, path: String) {
    assert_eq!(world.api.count(Method::Post, unquote(&path)), 0);
}

#[then("no DELETE was sent to {path}")]
fn no_delete_was_sent_to(world: &mut ConsoleWorld, path: String) {
    assert_eq!(world.api.count(Method::Delete, unquote(&path)), 0);
}

#[then("one DELETE was sent to {path}")]
fn one_delete_was_sent_to(world: &mut ConsoleWorld, path: String) {
    assert_eq!(world.api.count(Method::Delete, unquote(&path)), 1);
}

#[then("no request reached the API")]
fn no_request_reached_the_api(world: &mut ConsoleWorld) {
    assert!(world.api.calls().is_empty(), "{:?}", world.api.calls());
}

#[then("an error notification reads {message}")]
fn an_error_notification_reads(world: &mut ConsoleWorld, message: String) {
    let expected = unquote(&message);
    assert!(
        world
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Error && n.message == expected),
        "{:?}",
        world.notifications
    );
}

#[then("a success notification reads {message}")]
fn a_success_notification_reads(world: &mut ConsoleWorld, message: String) {
    let expected = unquote(&message);
    assert!(
        world
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Success && n.message == expected),
        "{:?}",
        world.notifications
    );
}

#[then("the stored credential is cleared")]
fn the_stored_credential_is_cleared(world: &mut ConsoleWorld) {
    assert_eq!(world.store.load().expect("load"), None);
}

#[then("the login view was requested")]
fn the_login_view_was_requested(world: &mut ConsoleWorld) {
    assert!(world.app.login_requested());
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/resource_console.feature",
    name = "Non-array list responses render as empty"
)]
fn non_array_list_responses_render_as_empty(world: ConsoleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resource_console.feature",
    name = "Empty required fields never reach the API"
)]
fn empty_required_fields_never_reach_the_api(world: ConsoleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resource_console.feature",
    name = "Server validation errors render as a banner"
)]
fn server_validation_errors_render_as_a_banner(world: ConsoleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resource_console.feature",
    name = "Deleting waits for confirmation"
)]
fn deleting_waits_for_confirmation(world: ConsoleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resource_console.feature",
    name = "Rejected credentials sign the operator out once"
)]
fn rejected_credentials_sign_the_operator_out_once(world: ConsoleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resource_console.feature",
    name = "Signed-out operators are sent to sign in"
)]
fn signed_out_operators_are_sent_to_sign_in(world: ConsoleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resource_console.feature",
    name = "Pending purchases are counted once"
)]
fn pending_purchases_are_counted_once(world: ConsoleWorld) {
    let _ = world;
}
