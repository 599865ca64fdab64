/// Lifecycle of a form dialog.
///
/// `Closed -> Open -> Submitting -> Closed` on success, back to `Open` on failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// Form values together with the dialog holding them.
///
/// The values only matter for one submission; there is no dirty tracking.
#[derive(Debug, Default)]
pub struct FormSession<F> {
    pub form: F,
    state: ModalState,
}

impl<F: Default> FormSession<F> {
    /// Opens the dialog on the given values.
    pub fn open_with(&mut self, form: F) {
        self.form = form;
        self.state = ModalState::Open;
    }

    /// Opens the dialog on a blank form.
    pub fn open(&mut self) {
        self.open_with(F::default());
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    /// Moves an open dialog to `Submitting`. Returns false if it was not open.
    pub(crate) fn begin_submit(&mut self) -> bool {
        if self.state != ModalState::Open {
            return false;
        }
        self.state = ModalState::Submitting;
        true
    }

    /// Closes the dialog and resets the form after an accepted submission.
    pub(crate) fn succeed(&mut self) {
        self.form = F::default();
        self.state = ModalState::Closed;
    }

    /// Returns to `Open` with the values untouched.
    pub(crate) fn fail(&mut self) {
        self.state = ModalState::Open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path_resets_form() {
        let mut session: FormSession<String> = FormSession::default();
        assert_eq!(session.state(), ModalState::Closed);

        session.open_with("draft".to_string());
        assert_eq!(session.state(), ModalState::Open);
        assert!(session.begin_submit());
        assert_eq!(session.state(), ModalState::Submitting);

        session.succeed();
        assert_eq!(session.state(), ModalState::Closed);
        assert!(session.form.is_empty());
    }

    #[test]
    fn test_failure_keeps_form_open() {
        let mut session: FormSession<String> = FormSession::default();
        session.open_with("draft".to_string());
        assert!(session.begin_submit());

        session.fail();
        assert_eq!(session.state(), ModalState::Open);
        assert_eq!(session.form, "draft");
    }

    #[test]
    fn test_submit_requires_open_dialog() {
        let mut session: FormSession<String> = FormSession::default();
        assert!(!session.begin_submit());

        session.open();
        assert!(session.begin_submit());
        assert!(!session.begin_submit());
    }
}
