mod common;

use account_payments::domain::account::AccountId;
use account_payments::domain::notification::Notification;
use account_payments::domain::ports::{
    NotificationSink, NotificationSinkRef, PaymentSource, PaymentSourceRef,
};
use account_payments::infrastructure::notifications::InMemoryNotificationSink;
use common::seeded_source;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let source: PaymentSourceRef = Arc::new(seeded_source());
    let sink = InMemoryNotificationSink::new();
    let notifier: NotificationSinkRef = Arc::new(sink.clone());

    // Verify Send + Sync by spawning tasks
    let accounts = tokio::spawn({
        let source = Arc::clone(&source);
        async move { source.list_accounts().await.unwrap() }
    });
    let payments = tokio::spawn({
        let source = Arc::clone(&source);
        async move {
            source
                .list_payments_by_account(Some(AccountId::new("A1")))
                .await
                .unwrap()
        }
    });
    let notified = tokio::spawn(async move {
        notifier.notify(Notification::success("Success", "from a task"));
    });

    assert_eq!(accounts.await.unwrap().len(), 2);
    assert_eq!(payments.await.unwrap().len(), 1);
    notified.await.unwrap();
    assert_eq!(sink.notifications().len(), 1);
}
