//! Command-line surface of the console.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::ResourceId;

/// `admin-console` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "admin-console",
    about = "Manage studio classes, packages, bookings, and payments",
    version
)]
pub struct CliArgs {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Store a bearer token for later commands.
    Login(LoginArgs),
    /// Forget the stored token and session metadata.
    Logout,
    /// Print the records of a resource.
    List(ListArgs),
    /// Create a record from `--set field=value` pairs.
    Create(CreateArgs),
    /// Update a record; fields not named keep their current value.
    Update(UpdateArgs),
    /// Delete a record once its id is repeated with `--confirm`.
    Delete(TargetArgs),
    /// Print the reconciled queue of pending purchases.
    Pending,
    /// Approve a pending purchase.
    Approve(ReviewArgs),
    /// Reject a pending purchase.
    Reject(ReviewArgs),
    /// Upload an instructor photo.
    UploadPhoto(UploadArgs),
    /// Upload a payment receipt for a redemption.
    UploadReceipt(UploadArgs),
    /// Report whether a user accepted their invitation.
    InvitationStatus(InvitationArgs),
}

/// Resources reachable through the generic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    /// Seat bookings.
    Bookings,
    /// Class definitions.
    Classes,
    /// Discount coupons.
    Coupons,
    /// Instructor profiles.
    Instructors,
    /// Studio locations.
    Locations,
    /// Seat layouts below a location (`--parent <location-id>`).
    Layouts,
    /// Seats below a layout (`--parent <layout-id>`).
    Seats,
    /// Organization settings.
    Organization,
    /// Credit packages.
    Packages,
    /// Package redemptions.
    Redemptions,
    /// Scheduled class sessions.
    Sessions,
    /// Accounts.
    Users,
}

/// Arguments for `login`.
#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// Bearer token issued by the API.
    #[arg(long, value_name = "token")]
    pub token: String,
    /// Account email shown in session metadata.
    #[arg(long, value_name = "email")]
    pub email: Option<String>,
    /// Account role shown in session metadata.
    #[arg(long, value_name = "role")]
    pub role: Option<String>,
}

/// Arguments for `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Resource to list.
    pub resource: ResourceKind,
    /// Parent id for nested resources.
    #[arg(long, value_name = "id", value_parser = parse_resource_id)]
    pub parent: Option<ResourceId>,
}

/// Arguments for `create`.
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Resource to create.
    pub resource: ResourceKind,
    /// Parent id for nested resources.
    #[arg(long, value_name = "id", value_parser = parse_resource_id)]
    pub parent: Option<ResourceId>,
    /// Field assignment; repeat for each field.
    #[arg(long = "set", value_name = "field=value", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
}

/// Arguments for `update`.
#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Resource to update.
    pub resource: ResourceKind,
    /// Record id; ignored for organization settings.
    #[arg(value_parser = parse_resource_id)]
    pub id: Option<ResourceId>,
    /// Parent id for nested resources.
    #[arg(long, value_name = "id", value_parser = parse_resource_id)]
    pub parent: Option<ResourceId>,
    /// Field assignment; an empty value clears an optional field.
    #[arg(long = "set", value_name = "field=value", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
}

/// Arguments for `delete`.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Resource holding the record.
    pub resource: ResourceKind,
    /// Record id.
    #[arg(value_parser = parse_resource_id)]
    pub id: ResourceId,
    /// Parent id for nested resources.
    #[arg(long, value_name = "id", value_parser = parse_resource_id)]
    pub parent: Option<ResourceId>,
    /// Repeat the record id to execute; without it only the prompt is shown.
    #[arg(long, value_name = "id", value_parser = parse_resource_id)]
    pub confirm: Option<ResourceId>,
}

/// Arguments for `approve` and `reject`.
#[derive(Debug, Clone, Args)]
pub struct ReviewArgs {
    /// Pending redemption id or order id.
    #[arg(value_parser = parse_resource_id)]
    pub id: ResourceId,
    /// Repeat the id to execute; without it only the prompt is shown.
    #[arg(long, value_name = "id", value_parser = parse_resource_id)]
    pub confirm: Option<ResourceId>,
}

/// Arguments for the upload commands.
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// Owning record id.
    #[arg(value_parser = parse_resource_id)]
    pub id: ResourceId,
    /// File to upload.
    #[arg(value_name = "path")]
    pub path: PathBuf,
}

/// Arguments for `invitation-status`.
#[derive(Debug, Clone, Args)]
pub struct InvitationArgs {
    /// User id.
    #[arg(value_parser = parse_resource_id)]
    pub user_id: ResourceId,
}

fn parse_resource_id(raw: &str) -> Result<ResourceId, String> {
    ResourceId::new(raw).map_err(|error| error.to_string())
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_owned(), value.to_owned()))
}
