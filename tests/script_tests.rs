mod common;

use account_payments::application::component::AccountPayments;
use account_payments::domain::ports::{NotificationSinkRef, PaymentSourceRef};
use account_payments::error::PaymentError;
use account_payments::infrastructure::notifications::InMemoryNotificationSink;
use account_payments::interfaces::script::{OutputFormat, ScriptRunner, parse_script};
use common::{TestSource, seeded_source};
use std::sync::Arc;

fn mount(source: TestSource) -> (AccountPayments, InMemoryNotificationSink) {
    let sink = InMemoryNotificationSink::new();
    let source_ref: PaymentSourceRef = Arc::new(source);
    let notifier: NotificationSinkRef = Arc::new(sink.clone());
    (AccountPayments::mount(source_ref, notifier), sink)
}

#[tokio::test]
async fn test_script_continues_when_accounts_fail_to_load() {
    let source = TestSource::new(seeded_source());
    source.fail_accounts("Accounts unavailable");
    let (component, sink) = mount(source);

    let lines = parse_script("select A1\nset type Refund\nshow\ntypes").unwrap();
    let mut out = Vec::new();
    ScriptRunner::new(&component, &mut out, OutputFormat::Csv)
        .run(&lines)
        .await
        .unwrap();

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Payment Name,Payment Type,Amount,Due Date"));
    assert!(output.ends_with("Invoice\nRefund\n"));
    assert_eq!(component.selected_account_id(), None);
    assert_eq!(component.draft().payment_type, "Refund");

    let notifications = sink.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Error Loading Accounts");
}

#[tokio::test]
async fn test_script_stops_on_unknown_account() {
    let (component, _sink) = mount(TestSource::new(seeded_source()));

    let lines = parse_script("types\nselect ZZ\ntypes").unwrap();
    let mut out = Vec::new();
    let err = ScriptRunner::new(&component, &mut out, OutputFormat::Csv)
        .run(&lines)
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::ScriptError { line: 2, .. }));
    assert_eq!(String::from_utf8(out).unwrap(), "Invoice\nRefund\n");
}
