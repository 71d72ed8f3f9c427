//! Generic list/form/confirmation controller shared by every resource.
//!
//! A [`ResourceController`] owns one page worth of state: the fetched list,
//! the create/edit form, and the staged destructive action. API failures are
//! converted to controller state (an `Error: ...` banner) or notifications;
//! nothing propagates as a panic. Every `401` goes through
//! [`SessionGuard::handle_unauthorized`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::domain::confirm::{ConfirmError, ConfirmationGate, DestructiveKind, PendingAction};
use crate::domain::decode::{DecodeError, decode_list, decode_object};
use crate::domain::display::DisplayOptions;
use crate::domain::form::{FormController, FormError, Submission};
use crate::domain::ports::{ApiError, FileUpload, Notification, Notifier, ResourceApi};
use crate::domain::resource::CollectionShape;
use crate::domain::schema::FormMode;
use crate::domain::{ApiPath, Error, Resource, ResourceId, SessionContext, SessionGuard};

/// Collaborators injected into every controller.
#[derive(Clone)]
pub struct ResourceContext {
    api: Arc<dyn ResourceApi>,
    guard: Arc<SessionGuard>,
    notifier: Arc<dyn Notifier>,
    session: Arc<SessionContext>,
    display: DisplayOptions,
}

impl ResourceContext {
    /// Bundle the API port, guard, notifier, and established session.
    pub fn new(
        api: Arc<dyn ResourceApi>,
        guard: Arc<SessionGuard>,
        notifier: Arc<dyn Notifier>,
        session: Arc<SessionContext>,
    ) -> Self {
        Self {
            api,
            guard,
            notifier,
            session,
            display: DisplayOptions::default(),
        }
    }

    /// Override locale and currency used for rendering.
    #[must_use]
    pub fn with_display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    /// Established session.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Rendering options.
    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }

    /// Publish a notification.
    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Convert a port error into a domain error, expiring the session on 401.
    pub fn map_api_error(&self, error: ApiError) -> Error {
        match error {
            ApiError::Unauthorized => self.guard.handle_unauthorized(&self.session),
            ApiError::Status { status, message } => Error::server(status, message),
            ApiError::Transport { message } | ApiError::Timeout { message } => {
                Error::service_unavailable(message)
            }
            ApiError::Decode { message } => Error::decode(message),
        }
    }

    fn ensure_live(&self) -> Result<(), Error> {
        if self.session.is_expired() {
            return Err(Error::unauthorized("session expired, sign in again"));
        }
        Ok(())
    }

    /// Authenticated `GET`.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn get(&self, path: &ApiPath, timeout: Option<Duration>) -> Result<Value, Error> {
        self.ensure_live()?;
        debug!(%path, "GET");
        self.api
            .get_json(self.session.token(), path, timeout)
            .await
            .map_err(|err| self.map_api_error(err))
    }

    /// Authenticated `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn post(&self, path: &ApiPath, body: &Value) -> Result<Value, Error> {
        self.ensure_live()?;
        debug!(%path, "POST");
        self.api
            .post_json(self.session.token(), path, body)
            .await
            .map_err(|err| self.map_api_error(err))
    }

    /// Authenticated `PATCH` with a partial JSON body.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn patch(&self, path: &ApiPath, body: &Value) -> Result<Value, Error> {
        self.ensure_live()?;
        debug!(%path, "PATCH");
        self.api
            .patch_json(self.session.token(), path, body)
            .await
            .map_err(|err| self.map_api_error(err))
    }

    /// Authenticated `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn delete(&self, path: &ApiPath) -> Result<(), Error> {
        self.ensure_live()?;
        debug!(%path, "DELETE");
        self.api
            .delete(self.session.token(), path)
            .await
            .map_err(|err| self.map_api_error(err))
    }

    /// Authenticated multipart upload.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn upload(&self, path: &ApiPath, file: FileUpload) -> Result<Value, Error> {
        self.ensure_live()?;
        debug!(%path, field = %file.field, bytes = file.bytes.len(), "POST multipart");
        self.api
            .upload(self.session.token(), path, file)
            .await
            .map_err(|err| self.map_api_error(err))
    }
}

/// Fetch state of a list view.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    /// A fetch is in flight or has not started.
    Loading,
    /// Rows as last fetched.
    Loaded(Vec<T>),
    /// The fetch failed; holds the banner text.
    Failed(String),
}

/// What the presentation layer should draw.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    /// Spinner.
    Loading,
    /// Persistent `Error: ...` banner.
    Error(&'a str),
    /// Empty-state message.
    Empty,
    /// Table rows.
    Rows(&'a [T]),
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> ListState<T> {
    /// View consumed by the renderer.
    pub fn view(&self) -> ListView<'_, T> {
        match self {
            Self::Loading => ListView::Loading,
            Self::Failed(banner) => ListView::Error(banner),
            Self::Loaded(rows) if rows.is_empty() => ListView::Empty,
            Self::Loaded(rows) => ListView::Rows(rows),
        }
    }

    /// Loaded rows, empty while loading or failed.
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Loaded(rows) => rows.as_slice(),
            Self::Loading | Self::Failed(_) => &[],
        }
    }

    pub(crate) fn from_outcome(outcome: Result<Vec<T>, Error>) -> Self {
        match outcome {
            Ok(rows) => Self::Loaded(rows),
            Err(error) => Self::Failed(error.banner()),
        }
    }

    pub(crate) fn remove_where(&mut self, mut matches: impl FnMut(&T) -> bool) {
        if let Self::Loaded(rows) = self {
            rows.retain(|row| !matches(row));
        }
    }
}

fn decode_failure(error: &DecodeError) -> Error {
    Error::decode(error.to_string())
}

/// Decode a list payload, treating a non-array body as an empty list.
pub(crate) fn decode_rows<T: serde::de::DeserializeOwned>(
    name: &str,
    payload: Value,
) -> Result<Vec<T>, Error> {
    match decode_list::<T>(payload) {
        Ok(rows) => Ok(rows),
        Err(DecodeError::NotAnArray { found }) => {
            warn!(resource = name, found, "list endpoint returned a non-array body; showing no rows");
            Ok(Vec::new())
        }
        Err(error) => Err(decode_failure(&error)),
    }
}

async fn fetch_list<R: Resource>(
    ctx: &ResourceContext,
    parent: Option<&ResourceId>,
) -> Result<Vec<R>, Error> {
    let path = R::collection_path(parent)?;
    let payload = ctx.get(&path, None).await?;
    match R::SHAPE {
        CollectionShape::List => decode_rows(R::NAME, payload),
        CollectionShape::Singleton => decode_object::<R>(payload)
            .map(|record| vec![record])
            .map_err(|err| decode_failure(&err)),
    }
}

/// Fetch auxiliary records (e.g. dropdown options), degrading to none.
///
/// A failure is logged and never affects the primary list. Run it alongside
/// the primary fetch with [`ResourceController::load_alongside`].
pub async fn fetch_options<O: Resource>(ctx: ResourceContext, parent: Option<ResourceId>) -> Vec<O> {
    match fetch_list::<O>(&ctx, parent.as_ref()).await {
        Ok(options) => options,
        Err(error) => {
            warn!(
                resource = O::NAME,
                code = ?error.code(),
                %error,
                "auxiliary fetch failed; showing no options"
            );
            Vec::new()
        }
    }
}

fn form_error(error: FormError) -> Error {
    match error {
        FormError::Invalid(invalid) => Error::invalid_request(invalid.to_string())
            .with_details(json!({ "field": invalid.field() })),
        other => Error::invalid_request(other.to_string()),
    }
}

fn confirm_error(error: &ConfirmError) -> Error {
    Error::invalid_request(error.to_string())
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// One resource page: list, form, and confirmation gate.
pub struct ResourceController<R: Resource> {
    ctx: ResourceContext,
    parent: Option<ResourceId>,
    list: ListState<R>,
    form: FormController<R>,
    gate: ConfirmationGate,
}

impl<R: Resource> ResourceController<R> {
    /// Controller for a top-level resource.
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            parent: None,
            list: ListState::Loading,
            form: FormController::default(),
            gate: ConfirmationGate::default(),
        }
    }

    /// Controller for a resource nested under `parent`.
    pub fn nested(ctx: ResourceContext, parent: ResourceId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(ctx)
        }
    }

    /// Injected collaborators.
    pub fn context(&self) -> &ResourceContext {
        &self.ctx
    }

    /// Parent id for nested resources.
    pub fn parent(&self) -> Option<&ResourceId> {
        self.parent.as_ref()
    }

    /// Current list state.
    pub fn list(&self) -> &ListState<R> {
        &self.list
    }

    /// Form state machine.
    pub fn form(&self) -> &FormController<R> {
        &self.form
    }

    /// Staged destructive action.
    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.gate.pending()
    }

    /// Fetch the primary list and replace the list state.
    pub async fn load(&mut self) {
        self.list = ListState::Loading;
        let outcome = fetch_list::<R>(&self.ctx, self.parent.as_ref()).await;
        self.finish_load(outcome);
    }

    /// Fetch the primary list while `auxiliary` runs concurrently.
    ///
    /// Neither side waits for the other, and the auxiliary outcome never
    /// alters the list state.
    pub async fn load_alongside<F: Future>(&mut self, auxiliary: F) -> F::Output {
        self.list = ListState::Loading;
        let primary = fetch_list::<R>(&self.ctx, self.parent.as_ref());
        let (outcome, options) = futures_util::join!(primary, auxiliary);
        self.finish_load(outcome);
        options
    }

    fn finish_load(&mut self, outcome: Result<Vec<R>, Error>) {
        if let Err(error) = &outcome {
            warn!(resource = R::NAME, code = ?error.code(), %error, "list fetch failed");
        }
        self.list = ListState::from_outcome(outcome);
    }

    fn find(&self, id: &ResourceId) -> Result<&R, Error> {
        self.list
            .rows()
            .iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| Error::not_found(format!("{} {id} is not in the loaded list", R::NAME)))
    }

    /// Open an empty create form.
    ///
    /// # Errors
    ///
    /// Fails when another form is open or the resource is a singleton.
    pub fn open_create(&mut self) -> Result<(), Error> {
        if R::SHAPE == CollectionShape::Singleton {
            return Err(Error::invalid_request(format!(
                "{} settings are edited in place",
                R::NAME
            )));
        }
        self.form.open_create().map_err(form_error)
    }

    /// Open an edit form seeded from the loaded record `id`.
    ///
    /// # Errors
    ///
    /// Fails when the record is not loaded or another form is open.
    pub fn open_edit(&mut self, id: &ResourceId) -> Result<(), Error> {
        let record = self.find(id)?.clone();
        self.form.open_edit(&record).map_err(form_error)
    }

    /// Update one field of the open draft.
    ///
    /// # Errors
    ///
    /// Fails when no form is open or a submission is in flight.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), Error> {
        self.form.set_field(field, value).map_err(form_error)
    }

    /// Close the form without submitting.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight.
    pub fn close_form(&mut self) -> Result<(), Error> {
        self.form.close().map_err(form_error)
    }

    async fn send(&self, submission: &Submission) -> Result<Value, Error> {
        match (submission.mode, submission.target.as_ref()) {
            (FormMode::Create, _) => {
                let path = R::collection_path(self.parent.as_ref())?;
                self.ctx.post(&path, &submission.body).await
            }
            (FormMode::Edit, Some(target)) => {
                let path = R::member_path(target, self.parent.as_ref())?;
                self.ctx.patch(&path, &submission.body).await
            }
            (FormMode::Edit, None) => Err(Error::internal("edit form has no target")),
        }
    }

    /// Validate and submit the open form.
    ///
    /// Validation failures set the inline message and issue no request. On
    /// success the form closes and the list is refetched. On failure the form
    /// reopens with the draft intact and an error notification is published.
    ///
    /// # Errors
    ///
    /// Returns the validation or API error.
    pub async fn submit(&mut self) -> Result<(), Error> {
        let submission = self.form.begin_submit().map_err(form_error)?;
        match self.send(&submission).await {
            Ok(_) => {
                self.form.finish_success();
                let verb = match submission.mode {
                    FormMode::Create => "created",
                    FormMode::Edit => "updated",
                };
                info!(resource = R::NAME, verb, "form submitted");
                self.ctx
                    .notify(Notification::success(format!("{} {verb}", capitalise(R::NAME))));
                self.load().await;
                Ok(())
            }
            Err(error) => {
                warn!(resource = R::NAME, code = ?error.code(), %error, "form submission failed");
                self.form.finish_failure(error.message());
                self.ctx.notify(Notification::error(error.message()));
                Err(error)
            }
        }
    }

    /// Stage a destructive action on the loaded record `id`.
    ///
    /// No request is issued; the returned prompt names the target.
    ///
    /// # Errors
    ///
    /// Fails when the record is not loaded or the resource is a singleton.
    pub fn request_destructive(
        &mut self,
        kind: DestructiveKind,
        id: &ResourceId,
    ) -> Result<String, Error> {
        if R::SHAPE == CollectionShape::Singleton {
            return Err(Error::invalid_request(format!(
                "{} settings cannot be {}",
                R::NAME,
                kind.past_tense()
            )));
        }
        let target_label = self.find(id)?.label();
        Ok(self.gate.request(PendingAction {
            kind,
            target_id: id.clone(),
            target_label,
        }))
    }

    /// Drop the staged destructive action.
    pub fn cancel_destructive(&mut self) -> Option<PendingAction> {
        self.gate.cancel()
    }

    /// Execute the staged action after the operator repeats its target id.
    ///
    /// On success the row is removed locally; approvals also refetch. On
    /// failure the list is untouched and an error notification is published.
    ///
    /// # Errors
    ///
    /// Returns the confirmation or API error.
    pub async fn confirm_destructive(&mut self, confirmed_id: &ResourceId) -> Result<(), Error> {
        let action = self.gate.confirm(confirmed_id).map_err(|err| confirm_error(&err))?;
        let outcome = self.execute(&action).await;
        match outcome {
            Ok(()) => {
                info!(
                    resource = R::NAME,
                    action = action.kind.verb(),
                    id = %action.target_id,
                    "destructive action applied"
                );
                self.list.remove_where(|record| record.id() == &action.target_id);
                self.ctx.notify(Notification::success(format!(
                    "{} {}",
                    capitalise(&action.target_label),
                    action.kind.past_tense()
                )));
                if action.kind == DestructiveKind::Approve {
                    self.load().await;
                }
                Ok(())
            }
            Err(error) => {
                warn!(resource = R::NAME, code = ?error.code(), %error, "destructive action failed");
                self.ctx.notify(Notification::error(error.message()));
                Err(error)
            }
        }
    }

    async fn execute(&self, action: &PendingAction) -> Result<(), Error> {
        let member = R::member_path(&action.target_id, self.parent.as_ref())?;
        match action.kind {
            DestructiveKind::Delete => self.ctx.delete(&member).await,
            DestructiveKind::Approve | DestructiveKind::Reject => self
                .ctx
                .post(&member.join(action.kind.verb()), &json!({}))
                .await
                .map(|_| ()),
        }
    }

    /// Upload a file to a member sub-resource such as `photo` or `receipt`.
    ///
    /// # Errors
    ///
    /// Returns the API error after publishing an error notification.
    pub async fn upload_file(
        &mut self,
        id: &ResourceId,
        segment: &str,
        file: FileUpload,
    ) -> Result<Value, Error> {
        let path = R::member_path(id, self.parent.as_ref())?.join(segment);
        let file_name = file.file_name.clone();
        match self.ctx.upload(&path, file).await {
            Ok(body) => {
                info!(resource = R::NAME, %id, file = %file_name, "file uploaded");
                self.ctx
                    .notify(Notification::success(format!("Uploaded {file_name}")));
                self.load().await;
                Ok(body)
            }
            Err(error) => {
                self.ctx.notify(Notification::error(error.message()));
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
