//! Create/edit form lifecycles and field-to-payload normalization.
//!
//! One [`FormController`] exists per entity kind. It owns its modal surface,
//! remembers whether it is creating or editing (and which id), and turns the
//! raw field strings into backend payloads.

mod claimant;
mod service;

pub use claimant::{ClaimantFields, ClaimantForm};
pub use service::{ServiceFields, ServiceForm};

/// Client-side validation failures. Raised before any request is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    MissingField(&'static str),
    #[error("{field} must be a number (got \"{value}\").")]
    InvalidNumber { field: &'static str, value: String },
}

/// A create/edit dialog on screen.
pub trait ModalSurface<F> {
    /// Show the dialog with the given field values.
    fn open(&mut self, fields: &F);
    fn close(&mut self);
    /// Blank every field.
    fn reset(&mut self);
    /// Current field values as entered by the user.
    fn read(&self) -> F;
    fn show_error(&mut self, message: &str);
}

/// Per-entity behaviour plugged into a [`FormController`].
pub trait FormKind {
    type Entity;
    type Fields: Default;
    type Create;
    type Update;

    /// Capitalized entity name used in messages.
    const LABEL: &'static str;

    fn entity_id(entity: &Self::Entity) -> i64;

    /// Field values pre-filled from a snapshot.
    fn fields_from(entity: &Self::Entity) -> Self::Fields;

    fn create_payload(fields: &Self::Fields) -> Result<Self::Create, ValidationError>;

    fn update_payload(fields: &Self::Fields) -> Result<Self::Update, ValidationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: i64 },
}

/// A validated submission, ready for the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<C, U> {
    Create(C),
    Update { id: i64, payload: U },
}

pub struct FormController<K: FormKind> {
    modal: Box<dyn ModalSurface<K::Fields>>,
    mode: FormMode,
}

impl<K: FormKind> FormController<K> {
    pub fn new(modal: Box<dyn ModalSurface<K::Fields>>) -> Self {
        Self {
            modal,
            mode: FormMode::Create,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Open the form blank, in create mode.
    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.modal.reset();
        self.modal.open(&K::Fields::default());
    }

    /// Open the form pre-filled from the snapshot captured by an edit affordance.
    pub fn open_edit(&mut self, entity: &K::Entity) {
        self.mode = FormMode::Edit {
            id: K::entity_id(entity),
        };
        self.modal.open(&K::fields_from(entity));
    }

    /// Read and validate the current fields.
    pub fn prepare(&self) -> Result<Submission<K::Create, K::Update>, ValidationError> {
        let fields = self.modal.read();
        match self.mode {
            FormMode::Create => Ok(Submission::Create(K::create_payload(&fields)?)),
            FormMode::Edit { id } => Ok(Submission::Update {
                id,
                payload: K::update_payload(&fields)?,
            }),
        }
    }

    /// A create form is reset for the next entry; an edit dialog closes.
    pub fn succeeded(&mut self) {
        match self.mode {
            FormMode::Create => self.modal.reset(),
            FormMode::Edit { .. } => {
                self.modal.close();
                self.mode = FormMode::Create;
            }
        }
    }

    /// Keep the form open and show why the submission failed.
    pub fn failed(&mut self, message: &str) {
        self.modal.show_error(message);
    }
}

/// A numeric input field as typed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumberInput {
    Empty,
    Valid(f64),
    Invalid,
}

impl NumberInput {
    pub(crate) fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return NumberInput::Empty;
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => NumberInput::Valid(v),
            _ => NumberInput::Invalid,
        }
    }
}

pub(crate) fn required_text(raw: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Empty input means "absent", never an empty string.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn required_number(raw: &str, field: &'static str) -> Result<f64, ValidationError> {
    match NumberInput::parse(raw) {
        NumberInput::Valid(v) => Ok(v),
        NumberInput::Empty => Err(ValidationError::MissingField(field)),
        NumberInput::Invalid => Err(ValidationError::InvalidNumber {
            field,
            value: raw.trim().to_string(),
        }),
    }
}
