use account_payments::application::component::AccountPayments;
use account_payments::domain::account::Account;
use account_payments::domain::payment::Payment;
use account_payments::domain::ports::{NotificationSinkRef, PaymentSourceRef};
use account_payments::infrastructure::in_memory::InMemoryPaymentSource;
use account_payments::infrastructure::notifications::ConsoleNotificationSink;
use account_payments::interfaces::csv::seed_reader::SeedReader;
use account_payments::interfaces::script::{OutputFormat, ScriptRunner, parse_script};
use account_payments::logging;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session script to replay (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Accounts CSV file (id,name)
    #[arg(long)]
    accounts: PathBuf,

    /// Payments CSV file (id,name,type,amount,due_date,notes,account_id)
    #[arg(long)]
    payments: Option<PathBuf>,

    /// Allowed payment types, comma separated
    #[arg(long, value_delimiter = ',', default_value = "Invoice,Refund,Credit Note")]
    payment_types: Vec<String>,

    /// Output format for tables
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let accounts: Vec<Account> = SeedReader::new(File::open(&cli.accounts).into_diagnostic()?)
        .read_all()
        .into_diagnostic()?;
    let payments: Vec<Payment> = match &cli.payments {
        Some(path) => SeedReader::new(File::open(path).into_diagnostic()?)
            .read_all()
            .into_diagnostic()?,
        None => Vec::new(),
    };

    let mut text = String::new();
    let read = match &cli.script {
        Some(path) => File::open(path).into_diagnostic()?.read_to_string(&mut text),
        None => io::stdin().read_to_string(&mut text),
    };
    read.into_diagnostic()?;
    let lines = parse_script(&text).into_diagnostic()?;

    let source: PaymentSourceRef = Arc::new(InMemoryPaymentSource::new(
        accounts,
        payments,
        cli.payment_types,
    ));
    let notifier: NotificationSinkRef = Arc::new(ConsoleNotificationSink::new(io::stdout()));
    let component = AccountPayments::mount(source, notifier);

    let mut runner = ScriptRunner::new(&component, io::stdout(), cli.format);
    runner.run(&lines).await.into_diagnostic()?;

    Ok(())
}
