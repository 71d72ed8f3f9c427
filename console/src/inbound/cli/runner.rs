//! Executes parsed commands against the domain controllers.
//!
//! Each invocation is one page visit: the controller loads, the requested
//! action runs, and the resulting list state is rendered. Failures are
//! rendered as `Error: ...` banners rather than propagated.

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use tracing::info;

use super::args::{
    Command, CreateArgs, ListArgs, LoginArgs, ResourceKind, ReviewArgs, TargetArgs, UpdateArgs,
    UploadArgs,
};
use super::render::{render_list, render_table};
use crate::app::ConsoleApp;
use crate::domain::confirm::DestructiveKind;
use crate::domain::ports::FileUpload;
use crate::domain::resources::{
    Booking, ClassRecord, ClassSession, Coupon, Instructor, Location, Organization, Package,
    PendingEntry, Redemption, Seat, SeatLayout, User,
};
use crate::domain::{
    AuthToken, CollectionShape, Error, InvitationProbe, ListState, PendingQueue, Resource,
    ResourceContext, ResourceController, ResourceId, fetch_options,
};

/// Text produced by one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Rendered output.
    pub body: String,
    /// Whether the command failed.
    pub failed: bool,
}

impl Report {
    fn ok(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            failed: false,
        }
    }

    fn failed(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            failed: true,
        }
    }

    fn then(mut self, section: impl AsRef<str>) -> Self {
        let section = section.as_ref();
        if !section.is_empty() {
            if !self.body.is_empty() {
                self.body.push_str("\n\n");
            }
            self.body.push_str(section);
        }
        self
    }
}

macro_rules! with_resource {
    ($kind:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            ResourceKind::Bookings => $func::<Booking>($($arg),*).await,
            ResourceKind::Classes => $func::<ClassRecord>($($arg),*).await,
            ResourceKind::Coupons => $func::<Coupon>($($arg),*).await,
            ResourceKind::Instructors => $func::<Instructor>($($arg),*).await,
            ResourceKind::Locations => $func::<Location>($($arg),*).await,
            ResourceKind::Layouts => $func::<SeatLayout>($($arg),*).await,
            ResourceKind::Seats => $func::<Seat>($($arg),*).await,
            ResourceKind::Organization => $func::<Organization>($($arg),*).await,
            ResourceKind::Packages => $func::<Package>($($arg),*).await,
            ResourceKind::Redemptions => $func::<Redemption>($($arg),*).await,
            ResourceKind::Sessions => $func::<ClassSession>($($arg),*).await,
            ResourceKind::Users => $func::<User>($($arg),*).await,
        }
    };
}

/// Run `command` and render its outcome.
pub async fn run(app: &ConsoleApp, command: Command) -> Report {
    match execute(app, command).await {
        Ok(report) => report,
        Err(error) => Report::failed(error.banner()),
    }
}

async fn execute(app: &ConsoleApp, command: Command) -> Result<Report, Error> {
    match command {
        Command::Login(args) => login(app, args),
        Command::Logout => {
            app.guard().sign_out()?;
            Ok(Report::ok("Signed out"))
        }
        Command::List(ListArgs { resource, parent }) => {
            let ctx = app.context()?;
            Ok(list(resource, ctx, parent).await)
        }
        Command::Create(CreateArgs {
            resource,
            parent,
            fields,
        }) => {
            let ctx = app.context()?;
            with_resource!(resource, create_record(ctx, parent, fields))
        }
        Command::Update(UpdateArgs {
            resource,
            id,
            parent,
            fields,
        }) => {
            let ctx = app.context()?;
            with_resource!(resource, update_record(ctx, parent, id, fields))
        }
        Command::Delete(TargetArgs {
            resource,
            id,
            parent,
            confirm,
        }) => {
            let ctx = app.context()?;
            with_resource!(resource, delete_record(ctx, parent, id, confirm))
        }
        Command::Pending => {
            let mut queue = PendingQueue::new(app.context()?);
            queue.load().await;
            Ok(pending_report(&queue))
        }
        Command::Approve(args) => review(app, DestructiveKind::Approve, args).await,
        Command::Reject(args) => review(app, DestructiveKind::Reject, args).await,
        Command::UploadPhoto(args) => {
            let ctx = app.context()?;
            upload::<Instructor>(ctx, "photo", args).await
        }
        Command::UploadReceipt(args) => {
            let ctx = app.context()?;
            upload::<Redemption>(ctx, "receipt", args).await
        }
        Command::InvitationStatus(args) => {
            let probe = InvitationProbe::new(app.context()?, app.invitation_timeout());
            let status = probe.check(&args.user_id).await;
            Ok(Report::ok(format!("{}: {status}", args.user_id)))
        }
    }
}

fn login(app: &ConsoleApp, args: LoginArgs) -> Result<Report, Error> {
    let token = AuthToken::new(&args.token).map_err(|err| Error::invalid_request(err.to_string()))?;
    let session = app.guard().sign_in(token, args.email, args.role)?;
    let who = session.metadata().email.as_deref().unwrap_or("operator");
    info!(email = who, "signed in");
    Ok(Report::ok(format!("Signed in as {who}")))
}

fn controller<R: Resource>(
    ctx: ResourceContext,
    parent: Option<ResourceId>,
) -> ResourceController<R> {
    match parent {
        Some(parent) => ResourceController::nested(ctx, parent),
        None => ResourceController::new(ctx),
    }
}

fn list_report<R: Resource>(controller: &ResourceController<R>) -> Report {
    let display = controller.context().display().clone();
    let body = render_list(controller.list().view(), R::columns(), |record| {
        record.row(&display)
    });
    if matches!(controller.list(), ListState::Failed(_)) {
        Report::failed(body)
    } else {
        Report::ok(body)
    }
}

/// Banner report when the initial load failed.
fn load_failure<R: Resource>(controller: &ResourceController<R>) -> Option<Report> {
    match controller.list() {
        ListState::Failed(banner) => Some(Report::failed(banner.clone())),
        ListState::Loading | ListState::Loaded(_) => None,
    }
}

fn options_section<O: Resource>(heading: &str, options: &[O]) -> String {
    if options.is_empty() {
        return format!("{heading}: none available");
    }
    let rows = options
        .iter()
        .map(|option| vec![option.id().to_string(), option.label()])
        .collect::<Vec<_>>();
    format!("{heading}:\n{}", render_table(&["Id", "Label"], &rows))
}

async fn list(kind: ResourceKind, ctx: ResourceContext, parent: Option<ResourceId>) -> Report {
    match kind {
        ResourceKind::Sessions => {
            list_with_options::<ClassSession, ClassRecord, Instructor>(
                ctx,
                parent,
                ("Classes", "Instructors"),
            )
            .await
        }
        ResourceKind::Bookings => {
            list_with_options::<Booking, User, ClassSession>(ctx, parent, ("Users", "Sessions"))
                .await
        }
        ResourceKind::Redemptions => {
            list_with_options::<Redemption, User, Package>(ctx, parent, ("Users", "Packages"))
                .await
        }
        ResourceKind::Instructors => {
            let mut page = controller::<Instructor>(ctx.clone(), parent);
            let users = page.load_alongside(fetch_options::<User>(ctx, None)).await;
            list_report(&page).then(options_section("Users", &users))
        }
        _ => with_resource!(kind, list_records(ctx, parent)),
    }
}

async fn list_records<R: Resource>(ctx: ResourceContext, parent: Option<ResourceId>) -> Report {
    let mut page = controller::<R>(ctx, parent);
    page.load().await;
    list_report(&page)
}

/// Load `R` while two dropdown sources load independently.
async fn list_with_options<R: Resource, A: Resource, B: Resource>(
    ctx: ResourceContext,
    parent: Option<ResourceId>,
    headings: (&str, &str),
) -> Report {
    let mut page = controller::<R>(ctx.clone(), parent);
    let (first, second) = page
        .load_alongside(async {
            futures_util::join!(
                fetch_options::<A>(ctx.clone(), None),
                fetch_options::<B>(ctx.clone(), None),
            )
        })
        .await;
    list_report(&page)
        .then(options_section(headings.0, &first))
        .then(options_section(headings.1, &second))
}

fn apply_fields<R: Resource>(
    page: &mut ResourceController<R>,
    fields: Vec<(String, String)>,
) -> Result<(), Error> {
    for (field, value) in fields {
        page.set_field(&field, value)?;
    }
    Ok(())
}

async fn create_record<R: Resource>(
    ctx: ResourceContext,
    parent: Option<ResourceId>,
    fields: Vec<(String, String)>,
) -> Result<Report, Error> {
    let mut page = controller::<R>(ctx, parent);
    page.open_create()?;
    apply_fields(&mut page, fields)?;
    page.submit().await?;
    Ok(list_report(&page))
}

async fn update_record<R: Resource>(
    ctx: ResourceContext,
    parent: Option<ResourceId>,
    id: Option<ResourceId>,
    fields: Vec<(String, String)>,
) -> Result<Report, Error> {
    let mut page = controller::<R>(ctx, parent);
    page.load().await;
    if let Some(report) = load_failure(&page) {
        return Ok(report);
    }
    let target = match id {
        Some(id) => id,
        None => page
            .list()
            .rows()
            .first()
            .filter(|_| R::SHAPE == CollectionShape::Singleton)
            .map(|record| record.id().clone())
            .ok_or_else(|| Error::invalid_request(format!("{} id is required", R::NAME)))?,
    };
    page.open_edit(&target)?;
    apply_fields(&mut page, fields)?;
    page.submit().await?;
    Ok(list_report(&page))
}

async fn delete_record<R: Resource>(
    ctx: ResourceContext,
    parent: Option<ResourceId>,
    id: ResourceId,
    confirm: Option<ResourceId>,
) -> Result<Report, Error> {
    let mut page = controller::<R>(ctx, parent);
    page.load().await;
    if let Some(report) = load_failure(&page) {
        return Ok(report);
    }
    let prompt = page.request_destructive(DestructiveKind::Delete, &id)?;
    let Some(confirmed) = confirm else {
        return Ok(Report::ok(format!(
            "{prompt}\nRe-run with --confirm {id} to proceed."
        )));
    };
    page.confirm_destructive(&confirmed).await?;
    Ok(list_report(&page))
}

fn pending_report(queue: &PendingQueue) -> Report {
    let display = queue.context().display().clone();
    let body = render_list(queue.list().view(), PendingEntry::columns(), |entry| {
        entry.row(&display)
    });
    let failed = matches!(queue.list(), ListState::Failed(_));
    let report = Report {
        body: format!("Pending purchases: {}", queue.count()),
        failed,
    };
    report.then(body)
}

async fn review(
    app: &ConsoleApp,
    kind: DestructiveKind,
    args: ReviewArgs,
) -> Result<Report, Error> {
    let mut queue = PendingQueue::new(app.context()?);
    queue.load().await;
    if let ListState::Failed(banner) = queue.list() {
        return Ok(Report::failed(banner.clone()));
    }
    let prompt = queue.request(kind, &args.id)?;
    let Some(confirmed) = args.confirm else {
        return Ok(Report::ok(format!(
            "{prompt}\nRe-run with --confirm {} to proceed.",
            args.id
        )));
    };
    queue.confirm(&confirmed).await?;
    Ok(pending_report(&queue))
}

async fn upload<R: Resource>(
    ctx: ResourceContext,
    field: &str,
    args: UploadArgs,
) -> Result<Report, Error> {
    let file = read_upload(&args.path, field).map_err(|error| {
        Error::invalid_request(format!("cannot read {}: {error}", args.path.display()))
    })?;
    let mut page = controller::<R>(ctx, None);
    page.upload_file(&args.id, field, file).await?;
    Ok(list_report(&page))
}

/// Read `path` into a multipart file part named `field`.
fn read_upload(path: &Path, field: &str) -> io::Result<FileUpload> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "upload path must name a file")
    })?;
    let directory = Dir::open_ambient_dir(parent.unwrap_or_else(|| Path::new(".")), ambient_authority())?;
    let bytes = directory.read(Path::new(file_name))?;
    let file_name = file_name.to_string_lossy().into_owned();
    Ok(FileUpload {
        field: field.to_owned(),
        content_type: content_type_for(&file_name).to_owned(),
        file_name,
        bytes,
    })
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
