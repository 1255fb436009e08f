//! Client side of the contact form: field and focus state plus the
//! `Idle -> Sending -> Sent | Error` submission lifecycle, independent of
//! whatever renders it.

use std::{
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use portfolio_core_contact_contracts::ContactService;
use portfolio_models::contact::{ContactField, ContactSubmission, SubmissionResult};
use tokio::{sync::watch, task::AbortHandle};
use tracing::{debug, trace};

pub use rest::RestContactService;
pub use state::{FormState, FormStatus};

mod rest;
mod state;

/// How long an error message stays visible before the form returns to
/// [`FormStatus::Idle`].
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct ContactFormConfig {
    pub error_display: Duration,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            error_display: ERROR_DISPLAY_DURATION,
        }
    }
}

/// Handle to a contact form. Clones share the same form; the pending error
/// timer is cancelled once the last handle is dropped.
#[derive(Debug)]
pub struct ContactForm<Contact> {
    inner: Arc<Inner<Contact>>,
}

impl<Contact> Clone for ContactForm<Contact> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug)]
struct Inner<Contact> {
    contact: Contact,
    config: ContactFormConfig,
    state: watch::Sender<FormState>,
    error_timer: Mutex<Option<AbortHandle>>,
}

impl<Contact> ContactForm<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: ContactFormConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                contact,
                config,
                state: watch::Sender::new(FormState::default()),
                error_timer: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> FormState {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> FormStatus {
        self.inner.state.borrow().status.clone()
    }

    pub fn fields(&self) -> ContactSubmission {
        self.inner.state.borrow().fields.clone()
    }

    pub fn is_active(&self, field: ContactField) -> bool {
        self.inner.state.borrow().is_active(field)
    }

    /// Replace the value of a field. Ignored after the form has been sent.
    pub fn set_field(&self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        self.inner.state.send_if_modified(|state| {
            if !state.status.is_editable() {
                trace!(?field, status = ?state.status, "ignoring field change");
                return false;
            }
            let current = state.fields.field_mut(field);
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    pub fn focus(&self, field: ContactField) {
        self.inner
            .state
            .send_if_modified(|state| state.focused.replace(field) != Some(field));
    }

    /// Remove the focus from `field`, if it is the focused one.
    pub fn blur(&self, field: ContactField) {
        self.inner.state.send_if_modified(|state| {
            if state.focused != Some(field) {
                return false;
            }
            state.focused = None;
            true
        });
    }

    /// Submit the current field values.
    ///
    /// Returns `None` without contacting the service if the form is already
    /// sending or has been sent. On success the fields are cleared; on failure
    /// they are kept and the error message is shown until the configured
    /// display duration elapses, the form is submitted again or
    /// [`reset`](Self::reset) is called. If the returned future is dropped
    /// before the service answers, the form goes back to
    /// [`FormStatus::Idle`].
    pub async fn submit(&self) -> Option<SubmissionResult> {
        let mut submission = None;
        self.inner.state.send_if_modified(|state| {
            if !state.status.can_submit() {
                return false;
            }
            submission = Some(state.fields.clone());
            state.status = FormStatus::Sending;
            true
        });
        let Some(submission) = submission else {
            debug!("submission already in progress or sent");
            return None;
        };
        self.inner.cancel_error_timer();

        let guard = SendingGuard(&self.inner.state);
        let result = self.inner.contact.submit(submission).await;
        std::mem::forget(guard);

        if result.success {
            self.inner.state.send_modify(|state| {
                state.fields = ContactSubmission::default();
                state.status = FormStatus::Sent {
                    message: result.message.clone(),
                };
            });
        } else {
            let mut epoch = 0;
            self.inner.state.send_modify(|state| {
                state.error_epoch += 1;
                epoch = state.error_epoch;
                state.status = FormStatus::Error {
                    message: result.message.clone(),
                };
            });
            Inner::schedule_error_clear(&self.inner, epoch);
        }

        Some(result)
    }

    /// Dismiss a shown error immediately.
    pub fn reset(&self) {
        self.inner.cancel_error_timer();
        self.inner.state.send_if_modified(|state| {
            if !matches!(state.status, FormStatus::Error { .. }) {
                return false;
            }
            state.status = FormStatus::Idle;
            true
        });
    }

    /// Leave the success screen to write another message.
    pub fn send_another(&self) {
        self.inner.state.send_if_modified(|state| {
            if !matches!(state.status, FormStatus::Sent { .. }) {
                return false;
            }
            state.status = FormStatus::Idle;
            true
        });
    }
}

impl<Contact> Inner<Contact>
where
    Contact: ContactService,
{
    fn schedule_error_clear(this: &Arc<Self>, epoch: u64) {
        let inner = Arc::downgrade(this);
        let delay = this.config.error_display;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = Weak::upgrade(&inner) {
                inner.clear_error(epoch);
            }
        })
        .abort_handle();

        if let Some(previous) = this.lock_error_timer().replace(handle) {
            previous.abort();
        }
    }

    fn clear_error(&self, epoch: u64) {
        self.state.send_if_modified(|state| {
            if state.error_epoch != epoch || !matches!(state.status, FormStatus::Error { .. }) {
                return false;
            }
            state.status = FormStatus::Idle;
            true
        });
    }
}

impl<Contact> Inner<Contact> {
    fn cancel_error_timer(&self) {
        if let Some(handle) = self.lock_error_timer().take() {
            handle.abort();
        }
    }

    fn lock_error_timer(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.error_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts an abandoned submission back to [`FormStatus::Idle`].
struct SendingGuard<'a>(&'a watch::Sender<FormState>);

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|state| {
            if state.status != FormStatus::Sending {
                return false;
            }
            debug!("submission abandoned");
            state.status = FormStatus::Idle;
            true
        });
    }
}

impl<Contact> Drop for Inner<Contact> {
    fn drop(&mut self) {
        self.cancel_error_timer();
    }
}
