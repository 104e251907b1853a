use super::account::{Account, AccountId};
use super::notification::Notification;
use super::payment::{NewPayment, Payment};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by the remote data layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ErrorInfo {
    pub message: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, ErrorInfo>;

/// Read and write endpoints backing the account payments screen.
///
/// Implementations are opaque remote calls. Every failure must come back as an
/// `ErrorInfo`, never as a panic or an empty success.
#[async_trait]
pub trait PaymentSource: Send + Sync {
    async fn list_accounts(&self) -> RemoteResult<Vec<Account>>;

    /// Lists the payments of `account_id`. `None` yields an empty list, not an error.
    async fn list_payments_by_account(
        &self,
        account_id: Option<AccountId>,
    ) -> RemoteResult<Vec<Payment>>;

    async fn list_payment_type_options(&self) -> RemoteResult<Vec<String>>;

    /// Persists a new payment. Not idempotent: callers guard against duplicates.
    async fn create_payment(&self, payment: NewPayment) -> RemoteResult<Payment>;
}

/// Fire-and-forget receiver of user-facing outcome messages.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub type PaymentSourceRef = std::sync::Arc<dyn PaymentSource>;
pub type NotificationSinkRef = std::sync::Arc<dyn NotificationSink>;
