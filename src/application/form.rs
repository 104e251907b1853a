use crate::domain::payment::{FieldUpdate, PaymentDraft};

/// Owner of the new-payment form.
///
/// The draft is the only source of what the form displays, so resetting it
/// clears every input at once.
#[derive(Debug, Default)]
pub struct FormState {
    draft: PaymentDraft,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &PaymentDraft {
        &self.draft
    }

    /// Replaces the draft with a copy that has one field changed.
    pub fn update_field(&mut self, update: FieldUpdate) -> &PaymentDraft {
        self.draft = self.draft.with(update);
        &self.draft
    }

    pub fn validate(draft: &PaymentDraft) -> bool {
        draft.is_valid()
    }

    pub fn reset(&mut self) -> &PaymentDraft {
        self.draft = PaymentDraft::default();
        &self.draft
    }
}
