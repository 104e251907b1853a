use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::io::Write;

fn cli() -> Command {
    let mut cmd = Command::new(cargo_bin!("account-payments"));
    cmd.arg("--accounts")
        .arg("tests/fixtures/accounts.csv")
        .arg("--payments")
        .arg("tests/fixtures/payments.csv");
    cmd
}

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = cli();
    cmd.arg("tests/fixtures/session.txt");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Payment Name,Payment Type,Amount,Due Date",
        ))
        .stdout(predicate::str::contains("PAY-0001,Invoice,100,2024-01-01"))
        .stdout(predicate::str::contains(
            "[success] Success: Payment created successfully!",
        ))
        .stdout(predicate::str::contains("PAY-0003,Refund,50,2024-02-01"))
        // Globex's payment never shows for Acme
        .stdout(predicate::str::contains("PAY-0002").not());

    Ok(())
}

#[test]
fn test_cli_reads_script_from_stdin() {
    let mut cmd = cli();
    cmd.write_stdin("accounts\ntypes\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Account Name\nAcme\nGlobex\n"))
        .stdout(predicate::str::contains("Invoice\nRefund\nCredit Note\n"));
}

#[test]
fn test_cli_incomplete_form() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "select A1").unwrap();
    writeln!(script, "set type Refund").unwrap();
    writeln!(script, "submit").unwrap();
    writeln!(script, "show").unwrap();

    let mut cmd = cli();
    cmd.arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "[error] Error: Please fill all required fields.",
        ))
        .stdout(predicate::str::contains("Refund").not());
}

#[test]
fn test_cli_rejected_payment_type() {
    let mut cmd = cli();
    cmd.arg("--payment-types").arg("Invoice").write_stdin(
        "select A2\nset type Refund\nset amount 10\nset due_date 2024-06-30\nsubmit\n",
    );

    cmd.assert().success().stdout(predicate::str::contains(
        "[error] Error Creating Payment: Invalid payment type: Refund",
    ));
}

#[test]
fn test_cli_json_output() {
    let mut cmd = cli();
    cmd.arg("--format").arg("json").write_stdin("select A2\nshow\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"Credit Note\""))
        .stdout(predicate::str::contains("\"notes\": \"goodwill\""));
}

#[test]
fn test_cli_unknown_account() {
    let mut cmd = cli();
    cmd.write_stdin("select ZZ\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown account 'ZZ'"));
}
