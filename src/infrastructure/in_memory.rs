use crate::domain::account::{Account, AccountId};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::ports::{ErrorInfo, PaymentSource, RemoteResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Ledger {
    by_account: HashMap<AccountId, Vec<Payment>>,
    ids: HashSet<String>,
    sequence: u64,
}

impl Ledger {
    fn next_id(&mut self) -> (String, String) {
        loop {
            self.sequence += 1;
            let id = format!("P{}", self.sequence);
            if !self.ids.contains(&id) {
                return (id, format!("PAY-{:04}", self.sequence));
            }
        }
    }

    fn insert(&mut self, payment: Payment) {
        self.ids.insert(payment.id.clone());
        self.by_account
            .entry(payment.account_id.clone())
            .or_default()
            .push(payment);
    }
}

/// A thread-safe in-memory payment backend.
///
/// Uses `Arc<RwLock<..>>` so clones share the same data. Payments are listed
/// in insertion order per account.
#[derive(Default, Clone)]
pub struct InMemoryPaymentSource {
    accounts: Arc<RwLock<Vec<Account>>>,
    ledger: Arc<RwLock<Ledger>>,
    payment_types: Arc<RwLock<Vec<String>>>,
}

impl InMemoryPaymentSource {
    /// Creates a source seeded with accounts, payments and picklist values.
    pub fn new(accounts: Vec<Account>, payments: Vec<Payment>, payment_types: Vec<String>) -> Self {
        let mut ledger = Ledger::default();
        for payment in payments {
            ledger.insert(payment);
        }
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
            ledger: Arc::new(RwLock::new(ledger)),
            payment_types: Arc::new(RwLock::new(payment_types)),
        }
    }
}

#[async_trait]
impl PaymentSource for InMemoryPaymentSource {
    async fn list_accounts(&self) -> RemoteResult<Vec<Account>> {
        Ok(self.accounts.read().await.clone())
    }

    async fn list_payments_by_account(
        &self,
        account_id: Option<AccountId>,
    ) -> RemoteResult<Vec<Payment>> {
        let Some(account_id) = account_id else {
            return Ok(Vec::new());
        };
        let ledger = self.ledger.read().await;
        Ok(ledger
            .by_account
            .get(&account_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_payment_type_options(&self) -> RemoteResult<Vec<String>> {
        Ok(self.payment_types.read().await.clone())
    }

    async fn create_payment(&self, payment: NewPayment) -> RemoteResult<Payment> {
        let account_id = payment
            .account_id
            .ok_or_else(|| ErrorInfo::new("An account must be selected before creating a payment"))?;

        if !self
            .accounts
            .read()
            .await
            .iter()
            .any(|account| account.id == account_id)
        {
            return Err(ErrorInfo::new(format!("Account not found: {}", account_id)));
        }
        if !self
            .payment_types
            .read()
            .await
            .contains(&payment.payment_type)
        {
            return Err(ErrorInfo::new(format!(
                "Invalid payment type: {}",
                payment.payment_type
            )));
        }

        let mut ledger = self.ledger.write().await;
        let (id, name) = ledger.next_id();
        let created = Payment {
            id,
            name,
            payment_type: payment.payment_type,
            amount: payment.amount.into(),
            due_date: payment.due_date,
            notes: payment.notes,
            account_id,
        };
        ledger.insert(created.clone());
        debug!(payment = %created.id, account = %created.account_id, "Stored payment");
        Ok(created)
    }
}
