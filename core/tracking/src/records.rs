//! Tracking record types and the per-user document aggregate.
//!
//! Field names serialize in camelCase to match the persisted document
//! shape. Sensitive fields (`BankAccount::account_number`,
//! `BankAccount::ifsc_code`, `Document::number`) hold ciphertext once a
//! record has been through [`crate::TrackingManager`]; the schema does not
//! distinguish encrypted from plain fields structurally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lock::LockSettings;
use wealthsense_common::{Error, Result};

/// Kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Current,
    Salary,
}

/// A bank account record.
///
/// `account_number` and `ifsc_code` are stored encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub account_type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a bank account, with plaintext sensitive fields.
#[derive(Debug, Clone)]
pub struct NewBankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub account_type: AccountType,
    pub balance: Option<f64>,
}

/// Kind of identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Aadhaar,
    Pan,
    Upi,
}

/// An identity document record. `number` is stored encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for adding an identity document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub number: String,
    pub name: Option<String>,
    pub upi_id: Option<String>,
}

/// Kind of payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Cash,
    Card,
    Upi,
    BankTransfer,
}

/// A payment method record. Not encrypted: holds at most the last four
/// digits of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last4_digits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a payment method.
#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
    pub kind: PaymentKind,
    pub name: String,
    pub last4_digits: Option<String>,
    pub bank_name: Option<String>,
}

/// A scanned receipt record. Not encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    /// Date as extracted from the receipt, if any; free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a receipt.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub transaction_id: Option<String>,
    pub image_url: String,
    pub ocr_text: Option<String>,
    pub amount: Option<f64>,
    pub merchant: Option<String>,
    pub date: Option<String>,
}

/// Per-user tracking document: all record collections plus lock settings.
///
/// This is the unit of persistence; the document store holds its JSON
/// serialization keyed by user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingData {
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub receipts: Vec<Receipt>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub lock_settings: LockSettings,
}

impl TrackingData {
    /// Serialize to bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from stored bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }
}
