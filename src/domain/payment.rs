use super::account::AccountId;
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Represents a positive monetary amount for a new payment.
///
/// Zero and negative values are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A persisted payment as returned by the remote layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    pub account_id: AccountId,
}

/// The record handed to `PaymentSource::create_payment`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub account_id: Option<AccountId>,
    pub payment_type: String,
    pub amount: Amount,
    pub due_date: NaiveDate,
    pub notes: String,
}

/// A picklist entry for the payment type combobox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PicklistOption {
    pub label: String,
    pub value: String,
}

impl From<String> for PicklistOption {
    fn from(value: String) -> Self {
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// The in-progress new payment as edited in the form.
///
/// The default value is the empty form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentDraft {
    pub payment_type: String,
    pub amount: Option<Decimal>,
    pub due_date: String,
    pub notes: String,
}

/// A single-field edit of a `PaymentDraft`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    PaymentType(String),
    Amount(Option<Decimal>),
    DueDate(String),
    Notes(String),
}

impl FieldUpdate {
    /// Builds an update from a form control's name and raw value.
    ///
    /// An empty amount clears the field.
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        match name {
            "type" | "payment_type" => Ok(Self::PaymentType(value.to_string())),
            "amount" => {
                let value = value.trim();
                if value.is_empty() {
                    return Ok(Self::Amount(None));
                }
                Decimal::from_str(value).map(|d| Self::Amount(Some(d))).map_err(|_| {
                    PaymentError::ValidationError(format!("Invalid amount: {}", value))
                })
            }
            "due_date" | "dueDate" => Ok(Self::DueDate(value.trim().to_string())),
            "notes" => Ok(Self::Notes(value.to_string())),
            other => Err(PaymentError::ValidationError(format!(
                "Unknown payment field: {}",
                other
            ))),
        }
    }
}

impl PaymentDraft {
    /// Returns a new draft with exactly one field replaced.
    pub fn with(&self, update: FieldUpdate) -> Self {
        match update {
            FieldUpdate::PaymentType(payment_type) => Self {
                payment_type,
                ..self.clone()
            },
            FieldUpdate::Amount(amount) => Self {
                amount,
                ..self.clone()
            },
            FieldUpdate::DueDate(due_date) => Self {
                due_date,
                ..self.clone()
            },
            FieldUpdate::Notes(notes) => Self {
                notes,
                ..self.clone()
            },
        }
    }

    /// Validates the draft and builds the record sent to the remote layer.
    ///
    /// Type, amount and due date are required; notes may be empty.
    pub fn to_new_payment(&self, account_id: Option<AccountId>) -> Result<NewPayment> {
        let mut missing = Vec::new();
        if self.payment_type.trim().is_empty() {
            missing.push("type");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }
        if self.due_date.is_empty() {
            missing.push("due date");
        }
        if !missing.is_empty() {
            return Err(PaymentError::ValidationError(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let amount = Amount::new(self.amount.unwrap_or_default())?;
        let due_date = NaiveDate::parse_from_str(&self.due_date, DATE_FORMAT).map_err(|_| {
            PaymentError::ValidationError(format!("Invalid due date: {}", self.due_date))
        })?;

        Ok(NewPayment {
            account_id,
            payment_type: self.payment_type.clone(),
            amount,
            due_date,
            notes: self.notes.clone(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.to_new_payment(None).is_ok()
    }
}
