use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::schema::FormSchema;
use super::submit::{SubmissionAdapter, SubmitSuccess};
use super::validation::{ErrorMessage, FieldLens, FormModel};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifies one submission attempt. Reset and teardown move past the
/// current ticket so a result that arrives later is dropped.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubmitTicket(pub u64);

impl SubmitTicket {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded(SubmitSuccess),
    Failed(String),
}

impl SubmitState {
    pub fn phase(&self) -> SubmitPhase {
        match self {
            SubmitState::Idle => SubmitPhase::Idle,
            SubmitState::Submitting => SubmitPhase::Submitting,
            SubmitState::Succeeded(_) => SubmitPhase::Succeeded,
            SubmitState::Failed(_) => SubmitPhase::Failed,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// What a call to `submit` ended up doing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// At least one field failed validation; nothing was sent.
    Rejected { first_error: FieldKey },
    /// Another submission is still in flight.
    Suppressed,
    Succeeded(SubmitSuccess),
    Failed(String),
    /// The form was reset or torn down before the result arrived.
    Stale,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    pub dirty: bool,
    pub touched: bool,
    pub error: Option<ErrorMessage>,
}

impl FieldMeta {
    pub fn display_error(&self) -> Option<&ErrorMessage> {
        self.error.as_ref().filter(|_| self.touched)
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta>,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitPhase, to: SubmitPhase },
    #[error("form `{form}` has no field named `{name}`")]
    UnknownField { form: &'static str, name: String },
    #[error("form {0} has been torn down")]
    Unmounted(FormId),
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct FormState<T> {
    pub(super) id: FormId,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta>,
    pub(super) ticket: SubmitTicket,
    /// The adapter call still running, even if reset has already made its
    /// result stale.
    pub(super) in_flight: Option<SubmitTicket>,
    pub(super) mounted: bool,
}

impl<T> FormState<T> {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta {
        self.field_meta.entry(key).or_default()
    }

    fn ensure_mounted(&self) -> FormResult<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(FormError::Unmounted(self.id))
        }
    }
}

/// Owns one mounted form: its values, touched flags, derived errors and
/// submit status. Cloning yields another handle to the same form.
pub struct FormController<T>
where
    T: FormModel,
{
    pub(super) schema: Arc<FormSchema<T>>,
    pub(super) adapter: Arc<dyn SubmissionAdapter<T>>,
    pub(super) state: Arc<RwLock<FormState<T>>>,
}

impl<T> Clone for FormController<T>
where
    T: FormModel,
{
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            adapter: self.adapter.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn new(schema: FormSchema<T>, adapter: impl SubmissionAdapter<T> + 'static) -> Self {
        Self::with_adapter(Arc::new(schema), Arc::new(adapter))
    }

    pub fn with_adapter(schema: Arc<FormSchema<T>>, adapter: Arc<dyn SubmissionAdapter<T>>) -> Self {
        let initial = T::default();
        let mut state = FormState {
            id: FormId::next(),
            initial_model: initial.clone(),
            model: initial,
            submit_state: SubmitState::Idle,
            submit_count: 0,
            field_meta: BTreeMap::new(),
            ticket: SubmitTicket(0),
            in_flight: None,
            mounted: true,
        };
        recompute_all(&schema, &mut state);
        debug!(form = %state.id, schema = schema.name(), "form mounted");
        Self {
            schema,
            adapter,
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn schema(&self) -> &FormSchema<T> {
        &self.schema
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn is_mounted(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading mount state")?.mounted)
    }

    /// Records an edit of the field called `name`.
    pub fn change(&self, name: &str, value: impl Into<String>) -> FormResult<()> {
        let key = self.resolve(name)?;
        self.change_by_key(key, value.into())
    }

    /// Records that the field called `name` lost focus.
    pub fn blur(&self, name: &str) -> FormResult<()> {
        let key = self.resolve(name)?;
        self.blur_by_key(key)
    }

    pub fn set<L>(&self, lens: L, value: impl Into<String>) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        self.change_by_key(lens.key(), value.into())
    }

    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        self.blur_by_key(lens.key())
    }

    /// Validates every field and, when all pass, hands a copy of the values
    /// to the submission adapter.
    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        let (id, ticket, model) = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            state.ensure_mounted()?;
            match state.submit_state.phase() {
                SubmitPhase::Submitting => {
                    debug!(form = %state.id, "submit ignored, already submitting");
                    return Ok(SubmitOutcome::Suppressed);
                }
                SubmitPhase::Succeeded => {
                    return Err(FormError::InvalidStateTransition {
                        from: SubmitPhase::Succeeded,
                        to: SubmitPhase::Submitting,
                    });
                }
                SubmitPhase::Idle | SubmitPhase::Failed => {}
            }
            if let Some(pending) = state.in_flight {
                debug!(form = %state.id, ticket = pending.0, "submit ignored, discarded call still pending");
                return Ok(SubmitOutcome::Suppressed);
            }

            state.submit_count = state.submit_count.saturating_add(1);
            for key in self.schema.keys() {
                state.ensure_meta(key).touched = true;
            }
            recompute_all(&self.schema, &mut state);
            if let Some(first_error) = first_error_key(&self.schema, &state.field_meta) {
                debug!(form = %state.id, field = %first_error, "submit rejected by validation");
                return Ok(SubmitOutcome::Rejected { first_error });
            }

            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.ticket = state.ticket.next();
            state.in_flight = Some(state.ticket);
            (state.id, state.ticket, state.model.clone())
        };

        let in_flight = InFlight {
            state: &*self.state,
            ticket,
        };
        debug!(form = %id, ticket = ticket.0, "submitting");
        let result = self.adapter.submit(&model).await;
        drop(in_flight);

        let mut state = write_lock(&self.state, "completing submit")?;
        if !state.mounted || state.ticket != ticket {
            debug!(form = %id, ticket = ticket.0, "dropping result of a discarded submission");
            return Ok(SubmitOutcome::Stale);
        }
        match result {
            Ok(success) => {
                transition_submit_state(&mut state, SubmitState::Succeeded(success.clone()))?;
                info!(form = %id, message = %success.message, "submission succeeded");
                Ok(SubmitOutcome::Succeeded(success))
            }
            Err(error) => {
                transition_submit_state(&mut state, SubmitState::Failed(error.message.clone()))?;
                warn!(form = %id, error = %error, "submission failed");
                Ok(SubmitOutcome::Failed(error.message))
            }
        }
    }

    /// Returns the form to its freshly mounted state. An adapter call still
    /// running keeps new submits suppressed until it resolves.
    pub fn reset(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.model = state.initial_model.clone();
        state.submit_state = SubmitState::Idle;
        state.submit_count = 0;
        state.ticket = state.ticket.next();
        state.field_meta.clear();
        recompute_all(&self.schema, &mut state);
        debug!(form = %state.id, "form reset");
        Ok(())
    }

    /// Detaches the form from its screen. Results still in flight are dropped
    /// and further events are refused.
    pub fn teardown(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "tearing down form")?;
        if state.mounted {
            state.mounted = false;
            state.ticket = state.ticket.next();
            debug!(form = %state.id, "form torn down");
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state.clone(),
            submit_count: state.submit_count,
            is_dirty: state.field_meta.values().any(|meta| meta.dirty),
            is_valid: state.field_meta.values().all(|meta| meta.error.is_none()),
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?
            .submit_state
            .clone())
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(self.submit_state()?.phase() == SubmitPhase::Submitting)
    }

    pub fn value(&self, name: &str) -> FormResult<String> {
        let key = self.resolve(name)?;
        let state = read_lock(&self.state, "reading field value")?;
        Ok(state.model.value(key).unwrap_or_default().to_string())
    }

    pub fn field_meta(&self, name: &str) -> FormResult<FieldMeta> {
        let key = self.resolve(name)?;
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    /// The field's current error, whether or not it is visible yet.
    pub fn field_error(&self, name: &str) -> FormResult<Option<ErrorMessage>> {
        Ok(self.field_meta(name)?.error)
    }

    /// The error to render under the field: only once it has been touched.
    pub fn display_error(&self, name: &str) -> FormResult<Option<ErrorMessage>> {
        Ok(self.field_meta(name)?.display_error().cloned())
    }

    pub fn first_error(&self) -> FormResult<Option<FieldKey>> {
        let state = read_lock(&self.state, "reading first error key")?;
        Ok(first_error_key(&self.schema, &state.field_meta))
    }

    fn resolve(&self, name: &str) -> FormResult<FieldKey> {
        self.schema.key(name).ok_or_else(|| FormError::UnknownField {
            form: self.schema.name(),
            name: name.to_string(),
        })
    }

    pub(super) fn change_by_key(&self, key: FieldKey, value: String) -> FormResult<()> {
        let mut state = write_lock(&self.state, "writing field value")?;
        state.ensure_mounted()?;
        let Some(slot) = state.model.value_mut(key) else {
            return Err(FormError::UnknownField {
                form: self.schema.name(),
                name: key.to_string(),
            });
        };
        *slot = value;

        let is_dirty = state.model.value(key) != state.initial_model.value(key);
        state.ensure_meta(key).dirty = is_dirty;
        recompute_field(&self.schema, &mut state, key);
        for dependent in self.schema.dependents(key) {
            recompute_field(&self.schema, &mut state, *dependent);
        }

        if state.submit_state.phase() == SubmitPhase::Failed {
            transition_submit_state(&mut state, SubmitState::Idle)?;
        }
        debug!(form = %state.id, field = %key, "field changed");
        Ok(())
    }

    pub(super) fn blur_by_key(&self, key: FieldKey) -> FormResult<()> {
        let mut state = write_lock(&self.state, "touching field")?;
        state.ensure_mounted()?;
        state.ensure_meta(key).touched = true;
        recompute_field(&self.schema, &mut state, key);
        Ok(())
    }
}

fn recompute_field<T: FormModel>(schema: &FormSchema<T>, state: &mut FormState<T>, key: FieldKey) {
    let error = schema.validate_field(key, &state.model);
    state.ensure_meta(key).error = error;
}

fn recompute_all<T: FormModel>(schema: &FormSchema<T>, state: &mut FormState<T>) {
    for key in schema.keys() {
        recompute_field(schema, state, key);
    }
}

/// Clears `in_flight` once the adapter call ends, including when the submit
/// future is dropped before it resolves.
struct InFlight<'a, T> {
    state: &'a RwLock<FormState<T>>,
    ticket: SubmitTicket,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.in_flight == Some(self.ticket) {
            state.in_flight = None;
        }
    }
}

pub(super) fn transition_submit_state<T>(
    state: &mut FormState<T>,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state.phase();
    let target = next.phase();

    let allowed = matches!(
        (current, target),
        (SubmitPhase::Idle, SubmitPhase::Submitting)
            | (SubmitPhase::Failed, SubmitPhase::Submitting)
            | (SubmitPhase::Submitting, SubmitPhase::Succeeded)
            | (SubmitPhase::Submitting, SubmitPhase::Failed)
            | (_, SubmitPhase::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: target,
        });
    }
    debug!(form = %state.id, from = ?current, to = ?target, "submit state transition");
    state.submit_state = next;
    Ok(())
}

pub(super) fn first_error_key<T: FormModel>(
    schema: &FormSchema<T>,
    field_meta: &BTreeMap<FieldKey, FieldMeta>,
) -> Option<FieldKey> {
    schema.keys().find(|key| {
        field_meta
            .get(key)
            .is_some_and(|meta| meta.error.is_some())
    })
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
