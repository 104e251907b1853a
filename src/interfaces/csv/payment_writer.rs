use crate::application::component::{ACCOUNT_COLUMNS, PAYMENT_COLUMNS};
use crate::domain::account::Account;
use crate::domain::payment::Payment;
use crate::error::{PaymentError, Result};
use std::io::Write;

/// Writes the account and payment tables as CSV, headed by their column labels.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_payments(&mut self, payments: &[Payment]) -> Result<()> {
        self.writer.write_record(PAYMENT_COLUMNS)?;
        for payment in payments {
            let amount = payment.amount.normalize().to_string();
            let due_date = payment.due_date.to_string();
            self.writer.write_record([
                payment.name.as_str(),
                payment.payment_type.as_str(),
                amount.as_str(),
                due_date.as_str(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_accounts(&mut self, accounts: &[Account]) -> Result<()> {
        self.writer.write_record(ACCOUNT_COLUMNS)?;
        for account in accounts {
            self.writer.write_record([account.name.as_str()])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| PaymentError::IoError(e.into_error()))
    }
}
