#![allow(dead_code)]

use account_payments::domain::account::{Account, AccountId};
use account_payments::domain::payment::{NewPayment, Payment};
use account_payments::domain::ports::{ErrorInfo, PaymentSource, RemoteResult};
use account_payments::infrastructure::in_memory::InMemoryPaymentSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::{oneshot, watch};

pub fn acme() -> Account {
    Account::new("A1", "Acme")
}

pub fn globex() -> Account {
    Account::new("A2", "Globex")
}

pub fn invoice_p1() -> Payment {
    Payment {
        id: "P1".to_string(),
        name: "PAY-0001".to_string(),
        payment_type: "Invoice".to_string(),
        amount: dec!(100),
        due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        notes: String::new(),
        account_id: AccountId::new("A1"),
    }
}

pub fn seeded_source() -> InMemoryPaymentSource {
    InMemoryPaymentSource::new(
        vec![acme(), globex()],
        vec![invoice_p1()],
        vec!["Invoice".to_string(), "Refund".to_string()],
    )
}

/// Wraps the in-memory source with call recording, gates that hold a call
/// until released, and injectable failures.
pub struct TestSource {
    pub inner: InMemoryPaymentSource,
    payment_calls: Mutex<Vec<Option<AccountId>>>,
    create_calls: Mutex<Vec<NewPayment>>,
    payment_gates: Mutex<HashMap<Option<AccountId>, VecDeque<oneshot::Receiver<()>>>>,
    create_gate: Mutex<Option<oneshot::Receiver<()>>>,
    accounts_failure: Mutex<Option<String>>,
    picklist_failure: Mutex<Option<String>>,
    payment_failure: Mutex<Option<String>>,
    create_failure: Mutex<Option<String>>,
    payment_completions: watch::Sender<usize>,
}

impl TestSource {
    pub fn new(inner: InMemoryPaymentSource) -> Self {
        Self {
            inner,
            payment_calls: Mutex::default(),
            create_calls: Mutex::default(),
            payment_gates: Mutex::default(),
            create_gate: Mutex::default(),
            accounts_failure: Mutex::default(),
            picklist_failure: Mutex::default(),
            payment_failure: Mutex::default(),
            create_failure: Mutex::default(),
            payment_completions: watch::channel(0).0,
        }
    }

    /// Holds the next payments call for `account_id` until the sender fires.
    pub fn hold_payments(&self, account_id: Option<&str>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.payment_gates
            .lock()
            .unwrap()
            .entry(account_id.map(AccountId::from))
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn hold_create(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.create_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn fail_accounts(&self, message: &str) {
        *self.accounts_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_picklist(&self, message: &str) {
        *self.picklist_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_payments(&self, message: &str) {
        *self.payment_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_create(&self, message: &str) {
        *self.create_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn clear_create_failure(&self) {
        *self.create_failure.lock().unwrap() = None;
    }

    pub fn payment_calls(&self) -> Vec<Option<AccountId>> {
        self.payment_calls.lock().unwrap().clone()
    }

    pub fn payment_calls_for(&self, account_id: &str) -> usize {
        self.payment_calls()
            .iter()
            .filter(|call| call.as_ref().map(AccountId::as_str) == Some(account_id))
            .count()
    }

    pub fn create_calls(&self) -> Vec<NewPayment> {
        self.create_calls.lock().unwrap().clone()
    }

    /// Waits until `n` payments calls have returned, successfully or not.
    ///
    /// On the current-thread runtime the query has applied or discarded each
    /// returned result by the time this wakes up.
    pub async fn payment_calls_completed(&self, n: usize) {
        let mut rx = self.payment_completions.subscribe();
        let _ = rx.wait_for(|completed| *completed >= n).await;
    }
}

#[async_trait]
impl PaymentSource for TestSource {
    async fn list_accounts(&self) -> RemoteResult<Vec<Account>> {
        let failure = self.accounts_failure.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(ErrorInfo::new(message));
        }
        self.inner.list_accounts().await
    }

    async fn list_payments_by_account(
        &self,
        account_id: Option<AccountId>,
    ) -> RemoteResult<Vec<Payment>> {
        self.payment_calls.lock().unwrap().push(account_id.clone());
        let gate = self
            .payment_gates
            .lock()
            .unwrap()
            .get_mut(&account_id)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let failure = self.payment_failure.lock().unwrap().clone();
        let result = match failure {
            Some(message) => Err(ErrorInfo::new(message)),
            None => self.inner.list_payments_by_account(account_id).await,
        };
        self.payment_completions.send_modify(|completed| *completed += 1);
        result
    }

    async fn list_payment_type_options(&self) -> RemoteResult<Vec<String>> {
        let failure = self.picklist_failure.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(ErrorInfo::new(message));
        }
        self.inner.list_payment_type_options().await
    }

    async fn create_payment(&self, payment: NewPayment) -> RemoteResult<Payment> {
        self.create_calls.lock().unwrap().push(payment.clone());
        let gate = self.create_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let failure = self.create_failure.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(ErrorInfo::new(message));
        }
        self.inner.create_payment(payment).await
    }
}
