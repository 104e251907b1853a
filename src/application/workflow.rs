use super::form::FormState;
use super::reactive::QueryHandle;
use super::selection::SelectionState;
use crate::domain::account::AccountId;
use crate::domain::notification::Notification;
use crate::domain::payment::Payment;
use crate::domain::ports::{NotificationSinkRef, PaymentSourceRef};
use crate::error::{PaymentError, Result};
use crate::sync::lock;
use std::sync::Mutex;
use tracing::{info, warn};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill all required fields.";
pub const CREATED_MESSAGE: &str = "Payment created successfully!";

pub type PaymentsQuery = QueryHandle<Option<AccountId>, Vec<Payment>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Submitting,
}

/// Puts the workflow back to `Idle` when dropped, whatever way the submission ends.
struct SubmissionGuard<'a> {
    status: &'a Mutex<WorkflowStatus>,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        *lock(self.status) = WorkflowStatus::Idle;
    }
}

/// Validate, create, refresh the payment list, then reset the form.
///
/// Only one submission runs at a time. Every outcome except a rejected
/// re-entry is reported through the notification sink exactly once.
pub struct CreatePaymentWorkflow {
    source: PaymentSourceRef,
    notifier: NotificationSinkRef,
    payments: PaymentsQuery,
    status: Mutex<WorkflowStatus>,
}

impl CreatePaymentWorkflow {
    pub fn new(
        source: PaymentSourceRef,
        notifier: NotificationSinkRef,
        payments: PaymentsQuery,
    ) -> Self {
        Self {
            source,
            notifier,
            payments,
            status: Mutex::new(WorkflowStatus::Idle),
        }
    }

    pub fn status(&self) -> WorkflowStatus {
        *lock(&self.status)
    }

    /// Submits the current draft for the selected account.
    ///
    /// On failure the draft is left untouched so the user can correct it.
    pub async fn submit(
        &self,
        form: &Mutex<FormState>,
        selection: &SelectionState,
    ) -> Result<Payment> {
        if self.status() == WorkflowStatus::Submitting {
            warn!("Ignoring payment submission while another one is in flight");
            return Err(PaymentError::SubmissionInProgress);
        }

        let draft = lock(form).draft().clone();
        let record = match draft.to_new_payment(selection.account_id()) {
            Ok(record) => record,
            Err(err) => {
                info!(error = %err, "Payment draft rejected");
                self.notifier
                    .notify(Notification::error("Error", REQUIRED_FIELDS_MESSAGE));
                return Err(err);
            }
        };

        let _guard = self.begin()?;
        info!(account = ?record.account_id, payment_type = %record.payment_type, "Creating payment");

        match self.source.create_payment(record).await {
            Ok(payment) => {
                info!(payment = %payment.id, "Payment created");
                self.notifier
                    .notify(Notification::success("Success", CREATED_MESSAGE));
                // the refresh is issued before the form is cleared
                self.payments.refresh();
                lock(form).reset();
                Ok(payment)
            }
            Err(err) => {
                warn!(error = %err, "Payment creation failed");
                self.notifier
                    .notify(Notification::error("Error Creating Payment", err.message.clone()));
                Err(PaymentError::RemoteWriteError(err))
            }
        }
    }

    fn begin(&self) -> Result<SubmissionGuard<'_>> {
        let mut status = lock(&self.status);
        if *status == WorkflowStatus::Submitting {
            return Err(PaymentError::SubmissionInProgress);
        }
        *status = WorkflowStatus::Submitting;
        Ok(SubmissionGuard {
            status: &self.status,
        })
    }
}
