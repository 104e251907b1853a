//! Line-oriented session scripts driving an `AccountPayments` component.
//!
//! ```text
//! select A1
//! set type Refund
//! set amount 50
//! set due_date 2024-02-01
//! submit
//! show
//! ```

use crate::application::component::AccountPayments;
use crate::application::reactive::QueryResult;
use crate::domain::account::AccountId;
use crate::domain::payment::FieldUpdate;
use crate::error::{PaymentError, Result};
use crate::interfaces::csv::payment_writer::PaymentWriter;
use clap::ValueEnum;
use std::io::Write;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(AccountId),
    Clear,
    Set(FieldUpdate),
    Submit,
    Show,
    Accounts,
    Types,
}

/// A command together with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

fn script_error(line: usize, message: impl Into<String>) -> PaymentError {
    PaymentError::ScriptError {
        line,
        message: message.into(),
    }
}

fn parse_line(line: usize, text: &str) -> Result<Option<Command>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let rest = rest.trim();

    let command = match verb {
        "select" if !rest.is_empty() => Command::Select(AccountId::new(rest)),
        "select" => return Err(script_error(line, "select needs an account id")),
        "clear" => Command::Clear,
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(script_error(line, "set needs a field name"));
            }
            let update = FieldUpdate::parse(field, value.trim())
                .map_err(|e| script_error(line, e.to_string()))?;
            Command::Set(update)
        }
        "submit" => Command::Submit,
        "show" => Command::Show,
        "accounts" => Command::Accounts,
        "types" => Command::Types,
        other => return Err(script_error(line, format!("unknown command '{}'", other))),
    };
    Ok(Some(command))
}

/// Parses a whole script, skipping blank lines and `#` comments.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (idx, text) in text.lines().enumerate() {
        if let Some(command) = parse_line(idx + 1, text)? {
            lines.push(ScriptLine {
                line: idx + 1,
                command,
            });
        }
    }
    Ok(lines)
}

/// Replays script lines against a mounted component, writing tables to `out`.
pub struct ScriptRunner<'a, W: Write> {
    component: &'a AccountPayments,
    out: W,
    format: OutputFormat,
}

impl<'a, W: Write> ScriptRunner<'a, W> {
    pub fn new(component: &'a AccountPayments, out: W, format: OutputFormat) -> Self {
        Self {
            component,
            out,
            format,
        }
    }

    /// Runs every line, waiting for queries to settle after each one.
    ///
    /// Remote failures are reported through notifications and do not stop the
    /// script. Only script errors, such as an unknown account, and output
    /// errors end the run.
    pub async fn run(&mut self, lines: &[ScriptLine]) -> Result<()> {
        self.component.settled().await;
        for ScriptLine { line, command } in lines {
            debug!(line, ?command, "Running script command");
            self.execute(*line, command).await?;
            self.component.settled().await;
        }
        Ok(())
    }

    async fn execute(&mut self, line: usize, command: &Command) -> Result<()> {
        match command {
            Command::Select(id) => {
                let accounts = match self.component.accounts() {
                    QueryResult::Data(accounts) => accounts,
                    QueryResult::Error(err) => {
                        // already notified when the accounts query failed
                        let err = PaymentError::RemoteReadError(err);
                        warn!(line, account = %id, error = %err, "Cannot select an account");
                        return Ok(());
                    }
                    QueryResult::Pending => Vec::new(),
                };
                let Some(account) = accounts.into_iter().find(|a| &a.id == id) else {
                    return Err(script_error(line, format!("unknown account '{}'", id)));
                };
                self.component.handle_account_selection(&[account]);
            }
            Command::Clear => self.component.handle_account_selection(&[]),
            Command::Set(update) => {
                self.component.handle_form_change(update.clone());
            }
            Command::Submit => {
                if let Err(e) = self.component.handle_create_payment().await {
                    info!(line, error = %e, "Submission did not create a payment");
                }
            }
            Command::Show => {
                if let QueryResult::Data(payments) = self.component.payments() {
                    match self.format {
                        OutputFormat::Csv => {
                            PaymentWriter::new(&mut self.out).write_payments(&payments)?;
                        }
                        OutputFormat::Json => {
                            serde_json::to_writer_pretty(&mut self.out, &payments)?;
                            writeln!(self.out)?;
                        }
                    }
                }
            }
            Command::Accounts => {
                if let QueryResult::Data(accounts) = self.component.accounts() {
                    match self.format {
                        OutputFormat::Csv => {
                            PaymentWriter::new(&mut self.out).write_accounts(&accounts)?;
                        }
                        OutputFormat::Json => {
                            serde_json::to_writer_pretty(&mut self.out, &accounts)?;
                            writeln!(self.out)?;
                        }
                    }
                }
            }
            Command::Types => {
                if let QueryResult::Data(options) = self.component.payment_type_options() {
                    match self.format {
                        OutputFormat::Csv => {
                            for option in &options {
                                writeln!(self.out, "{}", option.value)?;
                            }
                        }
                        OutputFormat::Json => {
                            serde_json::to_writer_pretty(&mut self.out, &options)?;
                            writeln!(self.out)?;
                        }
                    }
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
