use portfolio_models::contact::{ContactField, ContactSubmission};

/// Snapshot of everything the contact form renders.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub fields: ContactSubmission,
    pub focused: Option<ContactField>,
    pub status: FormStatus,
    /// Incremented whenever the form enters [`FormStatus::Error`], so a stale
    /// auto-clear timer can tell that it has been superseded.
    pub(crate) error_epoch: u64,
}

impl FormState {
    /// A field is active (its label floats) while it is focused or has
    /// content.
    pub fn is_active(&self, field: ContactField) -> bool {
        self.focused == Some(field) || !self.fields.field(field).is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Sending,
    Sent {
        message: String,
    },
    Error {
        message: String,
    },
}

impl FormStatus {
    /// Whether a new submission may be started from this status.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Error { .. })
    }

    /// The inputs stay editable while sending; only the success view hides
    /// them.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Sent { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Sent { message } | Self::Error { message } => Some(message),
            Self::Idle | Self::Sending => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_when_focused_or_filled() {
        let mut state = FormState::default();
        assert!(ContactField::ALL.iter().all(|&f| !state.is_active(f)));

        state.focused = Some(ContactField::Email);
        state.fields.subject = "Hi".into();

        assert!(state.is_active(ContactField::Email));
        assert!(state.is_active(ContactField::Subject));
        assert!(!state.is_active(ContactField::Name));
        assert!(!state.is_active(ContactField::Message));
    }

    #[test]
    fn submit_and_edit_permissions() {
        for (status, can_submit, is_editable) in [
            (FormStatus::Idle, true, true),
            (FormStatus::Sending, false, true),
            (
                FormStatus::Sent {
                    message: "ok".into(),
                },
                false,
                false,
            ),
            (
                FormStatus::Error {
                    message: "nope".into(),
                },
                true,
                true,
            ),
        ] {
            assert_eq!(status.can_submit(), can_submit, "{status:?}");
            assert_eq!(status.is_editable(), is_editable, "{status:?}");
        }
    }
}
