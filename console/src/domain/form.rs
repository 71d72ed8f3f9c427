//! Create/edit form lifecycle.
//!
//! `Closed -> Open(Create | Edit) -> Submitting -> {Closed | Open}`. At most
//! one form is open per controller, and a submission is strictly sequential.

use std::marker::PhantomData;

use serde_json::Value;
use thiserror::Error;

use crate::domain::schema::{Draft, FormMode, ValidationError};
use crate::domain::{Resource, ResourceId};

/// An open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenForm {
    /// Create or edit.
    pub mode: FormMode,
    /// Record being edited; `None` for create forms.
    pub target: Option<ResourceId>,
    /// Current operator input.
    pub draft: Draft,
    /// Draft as first seeded, used to detect cleared fields.
    pub seed: Draft,
    /// Inline message from the last failed validation or submission.
    pub message: Option<String>,
}

/// Form lifecycle state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    /// No form is shown.
    #[default]
    Closed,
    /// Accepting input.
    Open(OpenForm),
    /// A request is in flight; input is frozen.
    Submitting(OpenForm),
}

/// A validated body ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Create (`POST`) or edit (`PATCH`).
    pub mode: FormMode,
    /// Record being edited.
    pub target: Option<ResourceId>,
    /// Sparse JSON object.
    pub body: Value,
}

/// Form transitions that are not allowed in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No form is open.
    #[error("no form is open")]
    NotOpen,
    /// Another form is already open.
    #[error("another form is already open")]
    AlreadyOpen,
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    Busy,
    /// The draft failed validation; no request was issued.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Form state machine for resource `R`.
#[derive(Debug)]
pub struct FormController<R> {
    state: FormState,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Default for FormController<R> {
    fn default() -> Self {
        Self {
            state: FormState::Closed,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> FormController<R> {
    /// Current state.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Open form, whether accepting input or submitting.
    pub fn current(&self) -> Option<&OpenForm> {
        match &self.state {
            FormState::Closed => None,
            FormState::Open(form) | FormState::Submitting(form) => Some(form),
        }
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting(_))
    }

    fn open(&mut self, form: OpenForm) -> Result<(), FormError> {
        match self.state {
            FormState::Closed => {
                self.state = FormState::Open(form);
                Ok(())
            }
            FormState::Open(_) => Err(FormError::AlreadyOpen),
            FormState::Submitting(_) => Err(FormError::Busy),
        }
    }

    /// Open an empty create form.
    ///
    /// # Errors
    ///
    /// Fails when another form is open.
    pub fn open_create(&mut self) -> Result<(), FormError> {
        self.open(OpenForm {
            mode: FormMode::Create,
            target: None,
            draft: Draft::empty(),
            seed: Draft::empty(),
            message: None,
        })
    }

    /// Open an edit form seeded from `record`.
    ///
    /// # Errors
    ///
    /// Fails when another form is open.
    pub fn open_edit(&mut self, record: &R) -> Result<(), FormError> {
        let seed = record.to_draft();
        self.open(OpenForm {
            mode: FormMode::Edit,
            target: Some(record.id().clone()),
            draft: seed.clone(),
            seed,
            message: None,
        })
    }

    /// Update one field of the open draft.
    ///
    /// # Errors
    ///
    /// Fails when no form is open or a submission is in flight.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        match &mut self.state {
            FormState::Open(form) => {
                form.draft.set(field, value);
                Ok(())
            }
            FormState::Submitting(_) => Err(FormError::Busy),
            FormState::Closed => Err(FormError::NotOpen),
        }
    }

    /// Validate the draft and move to `Submitting`.
    ///
    /// On validation failure the form stays open with the inline message set
    /// and no request must be issued.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Invalid`], [`FormError::Busy`], or
    /// [`FormError::NotOpen`].
    pub fn begin_submit(&mut self) -> Result<Submission, FormError> {
        let form = match &mut self.state {
            FormState::Open(form) => form,
            FormState::Submitting(_) => return Err(FormError::Busy),
            FormState::Closed => return Err(FormError::NotOpen),
        };
        let schema = R::schema();
        let body = schema
            .to_body(&form.draft, form.mode, Some(&form.seed))
            .and_then(|body| R::validate(&form.draft, form.mode).map(|()| body));
        let body = match body {
            Ok(body) => body,
            Err(error) => {
                form.message = Some(error.to_string());
                return Err(FormError::Invalid(error));
            }
        };
        form.message = None;
        let submission = Submission {
            mode: form.mode,
            target: form.target.clone(),
            body: Value::Object(body),
        };
        let open = std::mem::take(&mut self.state);
        if let FormState::Open(form) = open {
            self.state = FormState::Submitting(form);
        }
        Ok(submission)
    }

    /// Close the form after a successful submission.
    pub fn finish_success(&mut self) {
        self.state = FormState::Closed;
    }

    /// Reopen the form with the draft intact after a failed submission.
    pub fn finish_failure(&mut self, message: impl Into<String>) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            FormState::Submitting(mut form) | FormState::Open(mut form) => {
                form.message = Some(message.into());
                FormState::Open(form)
            }
            FormState::Closed => FormState::Closed,
        };
    }

    /// Discard the form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Busy`] while a submission is in flight.
    pub fn close(&mut self) -> Result<(), FormError> {
        if self.is_submitting() {
            return Err(FormError::Busy);
        }
        self.state = FormState::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! State machine coverage using the package resource.

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::domain::resources::Package;

    #[fixture]
    fn package() -> Package {
        serde_json::from_value(json!({
            "id": "pkg-1",
            "code": "TEN",
            "name": "Ten rides",
            "type": "MULTI_RIDE",
            "price": "1200.00",
            "credits": 10,
            "validity_days": 90,
            "description": "Best value",
            "is_active": true
        }))
        .expect("package fixture")
    }

    fn filled_create() -> FormController<Package> {
        let mut form = FormController::<Package>::default();
        form.open_create().expect("opens");
        form.set_field("code", "ONE").expect("set");
        form.set_field("name", "Single ride").expect("set");
        form.set_field("type", "SINGLE_RIDE").expect("set");
        form.set_field("price", "150").expect("set");
        form
    }

    #[rstest]
    fn only_one_form_may_be_open(package: Package) {
        let mut form = FormController::<Package>::default();
        form.open_create().expect("opens");
        assert_eq!(form.open_edit(&package), Err(FormError::AlreadyOpen));
    }

    #[rstest]
    fn empty_required_field_blocks_submission() {
        let mut form = filled_create();
        form.set_field("code", "").expect("set");
        let err = form.begin_submit().expect_err("code required");
        assert!(matches!(err, FormError::Invalid(ValidationError::Missing { field: "code", .. })));
        let open = form.current().expect("still open");
        assert_eq!(open.message.as_deref(), Some("Code is required"));
        assert!(!form.is_submitting());
    }

    #[rstest]
    fn second_submit_while_submitting_is_busy() {
        let mut form = filled_create();
        let submission = form.begin_submit().expect("valid");
        assert_eq!(submission.mode, FormMode::Create);
        assert_eq!(form.begin_submit(), Err(FormError::Busy));
        assert_eq!(form.set_field("name", "x"), Err(FormError::Busy));
    }

    #[rstest]
    fn failure_reopens_with_draft_intact() {
        let mut form = filled_create();
        form.begin_submit().expect("valid");
        form.finish_failure("code already exists");
        let open = form.current().expect("reopened");
        assert_eq!(open.draft.get("code"), "ONE");
        assert_eq!(open.message.as_deref(), Some("code already exists"));
        assert!(matches!(form.state(), FormState::Open(_)));
    }

    #[rstest]
    fn success_closes() {
        let mut form = filled_create();
        form.begin_submit().expect("valid");
        form.finish_success();
        assert_eq!(form.state(), &FormState::Closed);
    }

    #[rstest]
    fn unchanged_edit_sends_the_seeded_values(package: Package) {
        let mut form = FormController::<Package>::default();
        form.open_edit(&package).expect("opens");
        let submission = form.begin_submit().expect("valid");
        assert_eq!(submission.target, Some(package.id.clone()));
        assert_eq!(submission.body["code"], json!("TEN"));
        assert_eq!(submission.body["price"], json!(1200.0));
        assert_eq!(submission.body["credits"], json!(10));
    }

    #[rstest]
    fn unchanged_edit_keeps_sub_cent_prices(mut package: Package) {
        package.price = serde_json::from_value(json!("19.999")).expect("amount");
        let mut form = FormController::<Package>::default();
        form.open_edit(&package).expect("opens");
        let open = form.current().expect("open");
        assert_eq!(open.draft.get("price"), "19.999");

        let submission = form.begin_submit().expect("valid");
        assert_eq!(submission.body["price"], json!(19.999));
    }

    #[rstest]
    fn clearing_a_clearable_field_sends_null(package: Package) {
        let mut form = FormController::<Package>::default();
        form.open_edit(&package).expect("opens");
        form.set_field("description", "  ").expect("set");
        let submission = form.begin_submit().expect("valid");
        assert_eq!(submission.body["description"], Value::Null);
    }
}
