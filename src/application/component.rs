use super::form::FormState;
use super::reactive::{QueryHandle, QueryResult, ReactiveQuery};
use super::selection::SelectionState;
use super::workflow::{CreatePaymentWorkflow, PaymentsQuery, WorkflowStatus};
use crate::domain::account::{Account, AccountId};
use crate::domain::notification::Notification;
use crate::domain::payment::{FieldUpdate, Payment, PaymentDraft, PicklistOption};
use crate::domain::ports::{ErrorInfo, NotificationSinkRef, PaymentSourceRef};
use crate::error::Result;
use crate::sync::lock;
use futures::FutureExt;
use std::sync::{Arc, Mutex};
use tracing::info;

pub const ACCOUNT_COLUMNS: [&str; 1] = ["Account Name"];
pub const PAYMENT_COLUMNS: [&str; 4] = ["Payment Name", "Payment Type", "Amount", "Due Date"];

/// The account payments screen: an account list, the payments of the selected
/// account and a form creating new payments for it.
///
/// Construction issues the account and picklist fetches; the payments query
/// follows the selection from then on.
pub struct AccountPayments {
    selection: SelectionState,
    accounts: QueryHandle<(), Vec<Account>>,
    payment_types: QueryHandle<(), Vec<PicklistOption>>,
    payments: PaymentsQuery,
    form: Mutex<FormState>,
    workflow: CreatePaymentWorkflow,
}

impl AccountPayments {
    /// Mounts the component. Must be called within a tokio runtime.
    pub fn mount(source: PaymentSourceRef, notifier: NotificationSinkRef) -> Self {
        let selection = SelectionState::new();

        let accounts = {
            let source = Arc::clone(&source);
            let notifier = Arc::clone(&notifier);
            ReactiveQuery::new("accounts", move |()| {
                let source = Arc::clone(&source);
                async move { source.list_accounts().await }.boxed()
            })
            .on_error(move |err| {
                notifier.notify(Notification::error("Error Loading Accounts", err.message.clone()))
            })
            .start(())
        };

        let payment_types = {
            let source = Arc::clone(&source);
            let notifier = Arc::clone(&notifier);
            ReactiveQuery::new("payment_types", move |()| {
                let source = Arc::clone(&source);
                async move {
                    let values = source.list_payment_type_options().await?;
                    let options = values.into_iter().map(PicklistOption::from).collect();
                    Ok::<Vec<PicklistOption>, ErrorInfo>(options)
                }
                .boxed()
            })
            .on_error(move |err| {
                notifier.notify(Notification::error("Error loading picklist", err.message.clone()))
            })
            .start(())
        };

        let payments = {
            let source = Arc::clone(&source);
            let notifier = Arc::clone(&notifier);
            ReactiveQuery::new("payments", move |account_id: Option<AccountId>| {
                let source = Arc::clone(&source);
                async move { source.list_payments_by_account(account_id).await }.boxed()
            })
            .on_error(move |err| {
                notifier.notify(Notification::error("Error Loading Payments", err.message.clone()))
            })
            .bind(selection.cell(), |selected: &Option<Account>| {
                selected.as_ref().map(|account| account.id.clone())
            })
        };

        let workflow = CreatePaymentWorkflow::new(source, notifier, payments.clone());
        info!("Account payments component mounted");

        Self {
            selection,
            accounts,
            payment_types,
            payments,
            form: Mutex::new(FormState::new()),
            workflow,
        }
    }

    pub fn handle_account_selection(&self, rows: &[Account]) {
        self.selection.set_selection(rows);
    }

    pub fn handle_form_change(&self, update: FieldUpdate) -> PaymentDraft {
        lock(&self.form).update_field(update).clone()
    }

    pub async fn handle_create_payment(&self) -> Result<Payment> {
        self.workflow.submit(&self.form, &self.selection).await
    }

    /// Waits until every query has a result for its current key.
    pub async fn settled(&self) {
        self.accounts.settled().await;
        self.payment_types.settled().await;
        self.payments.settled().await;
    }

    pub fn selected_account_id(&self) -> Option<AccountId> {
        self.selection.account_id()
    }

    pub fn selected_account_name(&self) -> String {
        self.selection.account_name()
    }

    pub fn accounts(&self) -> QueryResult<Vec<Account>> {
        self.accounts.result()
    }

    pub fn payment_type_options(&self) -> QueryResult<Vec<PicklistOption>> {
        self.payment_types.result()
    }

    pub fn payments(&self) -> QueryResult<Vec<Payment>> {
        self.payments.result()
    }

    pub fn payments_query(&self) -> &PaymentsQuery {
        &self.payments
    }

    pub fn is_loading_payments(&self) -> bool {
        self.payments.is_pending()
    }

    pub fn draft(&self) -> PaymentDraft {
        lock(&self.form).draft().clone()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.workflow.status()
    }
}
