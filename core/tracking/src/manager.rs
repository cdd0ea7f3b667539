//! Tracking lifecycle manager.
//!
//! Orchestrates record CRUD against an injected document store, encrypting
//! sensitive fields with the user's derived key before a record ever
//! reaches the store and decrypting them transiently for display.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::records::{
    BankAccount, Document, NewBankAccount, NewDocument, NewPaymentMethod, NewReceipt,
    PaymentMethod, Receipt, TrackingData,
};
use wealthsense_common::{Error, Result, UserId};
use wealthsense_crypto::{cipher, pin, FieldKey};
use wealthsense_store::DocumentStore;

/// Manager for a user's tracking document.
///
/// Store failures propagate untouched; the manager never retries or wraps
/// them. All sensitive values are encrypted in memory before the store sees
/// them, and plaintext is never logged.
pub struct TrackingManager {
    store: Arc<dyn DocumentStore>,
}

impl TrackingManager {
    /// Create a manager over the given document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Load a user's tracking document, creating the default if absent.
    ///
    /// # Postconditions
    /// - First call for a new user yields empty collections with the lock
    ///   disabled; the default is not persisted until a write happens
    pub async fn load(&self, user: &UserId) -> Result<TrackingData> {
        match self.store.load(user).await? {
            Some(bytes) => TrackingData::from_bytes(&bytes),
            None => {
                debug!(user = %user, "No tracking document, using default");
                Ok(TrackingData::default())
            }
        }
    }

    async fn save(&self, user: &UserId, data: &TrackingData) -> Result<()> {
        self.store.save(user, data.to_bytes()?).await
    }

    /// Add a bank account, encrypting its account number and IFSC code.
    ///
    /// # Postconditions
    /// - The persisted record's `account_number` and `ifsc_code` are
    ///   ciphertext, never the input plaintext
    pub async fn add_bank_account(
        &self,
        user: &UserId,
        input: NewBankAccount,
    ) -> Result<BankAccount> {
        let key = FieldKey::derive(user);
        let account = BankAccount {
            id: Uuid::new_v4().to_string(),
            bank_name: input.bank_name,
            account_number: cipher::encrypt(&input.account_number, &key),
            ifsc_code: cipher::encrypt(&input.ifsc_code, &key),
            account_holder_name: input.account_holder_name,
            account_type: input.account_type,
            balance: input.balance,
            created_at: Utc::now(),
        };

        let mut data = self.load(user).await?;
        data.bank_accounts.push(account.clone());
        self.save(user, &data).await?;

        info!(user = %user, id = %account.id, "Bank account added");
        Ok(account)
    }

    /// Add an identity document, encrypting its number.
    pub async fn add_document(&self, user: &UserId, input: NewDocument) -> Result<Document> {
        let key = FieldKey::derive(user);
        let document = Document {
            id: Uuid::new_v4().to_string(),
            kind: input.kind,
            number: cipher::encrypt(&input.number, &key),
            name: input.name,
            upi_id: input.upi_id,
            created_at: Utc::now(),
        };

        let mut data = self.load(user).await?;
        data.documents.push(document.clone());
        self.save(user, &data).await?;

        info!(user = %user, id = %document.id, "Document added");
        Ok(document)
    }

    /// Add a payment method. Fields are stored as-is (lower sensitivity).
    pub async fn add_payment_method(
        &self,
        user: &UserId,
        input: NewPaymentMethod,
    ) -> Result<PaymentMethod> {
        let method = PaymentMethod {
            id: Uuid::new_v4().to_string(),
            kind: input.kind,
            name: input.name,
            last4_digits: input.last4_digits,
            bank_name: input.bank_name,
            created_at: Utc::now(),
        };

        let mut data = self.load(user).await?;
        data.payment_methods.push(method.clone());
        self.save(user, &data).await?;

        info!(user = %user, id = %method.id, "Payment method added");
        Ok(method)
    }

    /// Add a receipt. Fields are stored as-is.
    pub async fn add_receipt(&self, user: &UserId, input: NewReceipt) -> Result<Receipt> {
        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            transaction_id: input.transaction_id,
            image_url: input.image_url,
            ocr_text: input.ocr_text,
            amount: input.amount,
            merchant: input.merchant,
            date: input.date,
            created_at: Utc::now(),
        };

        let mut data = self.load(user).await?;
        data.receipts.push(receipt.clone());
        self.save(user, &data).await?;

        info!(user = %user, id = %receipt.id, "Receipt added");
        Ok(receipt)
    }

    /// Delete a bank account by id. Absent ids are a silent no-op.
    pub async fn delete_bank_account(&self, user: &UserId, id: &str) -> Result<()> {
        let mut data = self.load(user).await?;
        data.bank_accounts.retain(|a| a.id != id);
        self.save(user, &data).await?;

        debug!(user = %user, id = %id, "Bank account deleted");
        Ok(())
    }

    /// Delete a document by id. Absent ids are a silent no-op.
    pub async fn delete_document(&self, user: &UserId, id: &str) -> Result<()> {
        let mut data = self.load(user).await?;
        data.documents.retain(|d| d.id != id);
        self.save(user, &data).await?;

        debug!(user = %user, id = %id, "Document deleted");
        Ok(())
    }

    /// Delete a payment method by id. Absent ids are a silent no-op.
    pub async fn delete_payment_method(&self, user: &UserId, id: &str) -> Result<()> {
        let mut data = self.load(user).await?;
        data.payment_methods.retain(|m| m.id != id);
        self.save(user, &data).await?;

        debug!(user = %user, id = %id, "Payment method deleted");
        Ok(())
    }

    /// Delete a receipt by id. Absent ids are a silent no-op.
    pub async fn delete_receipt(&self, user: &UserId, id: &str) -> Result<()> {
        let mut data = self.load(user).await?;
        data.receipts.retain(|r| r.id != id);
        self.save(user, &data).await?;

        debug!(user = %user, id = %id, "Receipt deleted");
        Ok(())
    }

    /// Set up the PIN lock, storing only the digest.
    ///
    /// # Errors
    /// - `Error::Validation` if the PIN is malformed or the confirmation
    ///   copy differs
    pub async fn setup_lock(&self, user: &UserId, new_pin: &str, confirm: &str) -> Result<()> {
        pin::validate_pin(new_pin)?;
        if new_pin != confirm {
            return Err(Error::Validation("PINs do not match".to_string()));
        }

        let mut data = self.load(user).await?;
        data.lock_settings.pin_hash = Some(pin::hash_pin(new_pin));
        data.lock_settings.enabled = true;
        data.lock_settings.created_at = Some(Utc::now());
        data.lock_settings.last_unlock = None;
        self.save(user, &data).await?;

        info!(user = %user, "PIN lock configured");
        Ok(())
    }

    /// Verify a PIN against the stored digest.
    ///
    /// On success, stamps `last_unlock` and persists it so the idle-timeout
    /// rule sees this unlock. Returns `Ok(false)` if no PIN is configured or
    /// the PIN does not verify.
    pub async fn verify_lock_pin(&self, user: &UserId, pin_input: &str) -> Result<bool> {
        let mut data = self.load(user).await?;
        let Some(digest) = &data.lock_settings.pin_hash else {
            return Ok(false);
        };

        if !pin::verify_pin(pin_input, digest) {
            debug!(user = %user, "PIN verification failed");
            return Ok(false);
        }

        data.lock_settings.last_unlock = Some(Utc::now());
        self.save(user, &data).await?;

        debug!(user = %user, "PIN verified");
        Ok(true)
    }

    /// Enable or disable the PIN lock.
    ///
    /// Disabling retains the stored digest for reuse on re-enable.
    ///
    /// # Errors
    /// - `Error::NotPermitted` when enabling without a stored digest;
    ///   callers must run [`TrackingManager::setup_lock`] first
    pub async fn set_lock_enabled(&self, user: &UserId, enabled: bool) -> Result<()> {
        let mut data = self.load(user).await?;

        if enabled && data.lock_settings.pin_hash.is_none() {
            return Err(Error::NotPermitted(
                "No PIN configured; set one up first".to_string(),
            ));
        }

        data.lock_settings.enabled = enabled;
        if !enabled {
            data.lock_settings.last_unlock = None;
        }
        self.save(user, &data).await?;

        info!(user = %user, enabled, "Lock settings updated");
        Ok(())
    }

    /// Decrypt a stored sensitive field for display.
    ///
    /// Soft-fails to an empty string on corrupt ciphertext so the UI can
    /// show a masked indicator instead of an error.
    pub fn reveal(&self, user: &UserId, ciphertext: &str) -> String {
        let key = FieldKey::derive(user);
        cipher::decrypt(ciphertext, &key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AccountType, DocumentKind, PaymentKind};
    use wealthsense_store::MemoryStore;

    fn manager() -> TrackingManager {
        TrackingManager::new(Arc::new(MemoryStore::new()))
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn bank_input(number: &str) -> NewBankAccount {
        NewBankAccount {
            bank_name: "Test Bank".to_string(),
            account_number: number.to_string(),
            ifsc_code: "TEST0001234".to_string(),
            account_holder_name: "A. Holder".to_string(),
            account_type: AccountType::Savings,
            balance: Some(1500.0),
        }
    }

    #[tokio::test]
    async fn test_load_creates_default() {
        let manager = manager();
        let data = manager.load(&user("u1")).await.unwrap();

        assert_eq!(data, TrackingData::default());
    }

    #[tokio::test]
    async fn test_bank_account_stored_encrypted() {
        let manager = manager();
        let u = user("u1");

        manager.add_bank_account(&u, bank_input("000111222333")).await.unwrap();

        let data = manager.load(&u).await.unwrap();
        let stored = &data.bank_accounts[0];
        assert_ne!(stored.account_number, "000111222333");
        assert_ne!(stored.ifsc_code, "TEST0001234");
        // Non-sensitive fields stay in the clear
        assert_eq!(stored.bank_name, "Test Bank");
    }

    #[tokio::test]
    async fn test_end_to_end_setup_add_reveal() {
        let manager = manager();
        let u = user("u1");

        manager.setup_lock(&u, "1357", "1357").await.unwrap();
        manager.add_bank_account(&u, bank_input("000111222333")).await.unwrap();

        let data = manager.load(&u).await.unwrap();
        let stored = &data.bank_accounts[0];
        assert_ne!(stored.account_number, "000111222333");

        assert!(manager.verify_lock_pin(&u, "1357").await.unwrap());
        assert_eq!(manager.reveal(&u, &stored.account_number), "000111222333");
    }

    #[tokio::test]
    async fn test_reveal_wrong_user_does_not_leak() {
        let manager = manager();
        let u = user("u1");

        let account = manager
            .add_bank_account(&u, bank_input("000111222333"))
            .await
            .unwrap();

        let other = manager.reveal(&user("u2"), &account.account_number);
        assert_ne!(other, "000111222333");
    }

    #[tokio::test]
    async fn test_document_number_encrypted_and_revealed() {
        let manager = manager();
        let u = user("u1");

        let doc = manager
            .add_document(
                &u,
                NewDocument {
                    kind: DocumentKind::Pan,
                    number: "ABCDE1234F".to_string(),
                    name: Some("A. Holder".to_string()),
                    upi_id: None,
                },
            )
            .await
            .unwrap();

        assert_ne!(doc.number, "ABCDE1234F");
        assert_eq!(manager.reveal(&u, &doc.number), "ABCDE1234F");
    }

    #[tokio::test]
    async fn test_payment_method_stored_plain() {
        let manager = manager();
        let u = user("u1");

        manager
            .add_payment_method(
                &u,
                NewPaymentMethod {
                    kind: PaymentKind::Card,
                    name: "Everyday card".to_string(),
                    last4_digits: Some("4242".to_string()),
                    bank_name: None,
                },
            )
            .await
            .unwrap();

        let data = manager.load(&u).await.unwrap();
        assert_eq!(data.payment_methods[0].last4_digits.as_deref(), Some("4242"));
    }

    #[tokio::test]
    async fn test_receipt_lifecycle() {
        let manager = manager();
        let u = user("u1");

        let receipt = manager
            .add_receipt(
                &u,
                NewReceipt {
                    transaction_id: None,
                    image_url: "data:image/png;base64,AAAA".to_string(),
                    ocr_text: Some("TOTAL 12.50".to_string()),
                    amount: Some(12.5),
                    merchant: Some("Grocer".to_string()),
                    date: None,
                },
            )
            .await
            .unwrap();

        manager.delete_receipt(&u, &receipt.id).await.unwrap();
        assert!(manager.load(&u).await.unwrap().receipts.is_empty());
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_noop() {
        let manager = manager();
        let u = user("u1");

        manager.add_bank_account(&u, bank_input("111")).await.unwrap();
        manager.delete_bank_account(&u, "no-such-id").await.unwrap();

        assert_eq!(manager.load(&u).await.unwrap().bank_accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_setup_lock_validation() {
        let manager = manager();
        let u = user("u1");

        assert!(matches!(
            manager.setup_lock(&u, "135", "135").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            manager.setup_lock(&u, "1357", "7531").await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_stamps_last_unlock() {
        let manager = manager();
        let u = user("u1");

        manager.setup_lock(&u, "1357", "1357").await.unwrap();
        assert!(manager.load(&u).await.unwrap().lock_settings.last_unlock.is_none());

        assert!(manager.verify_lock_pin(&u, "1357").await.unwrap());
        assert!(manager.load(&u).await.unwrap().lock_settings.last_unlock.is_some());
    }

    #[tokio::test]
    async fn test_verify_wrong_pin() {
        let manager = manager();
        let u = user("u1");

        // No PIN configured yet
        assert!(!manager.verify_lock_pin(&u, "1357").await.unwrap());

        manager.setup_lock(&u, "1357", "1357").await.unwrap();
        assert!(!manager.verify_lock_pin(&u, "9999").await.unwrap());
        assert!(manager.load(&u).await.unwrap().lock_settings.last_unlock.is_none());
    }

    #[tokio::test]
    async fn test_disable_retains_digest() {
        let manager = manager();
        let u = user("u1");

        manager.setup_lock(&u, "1357", "1357").await.unwrap();
        manager.set_lock_enabled(&u, false).await.unwrap();

        let settings = manager.load(&u).await.unwrap().lock_settings;
        assert!(!settings.enabled);
        assert!(settings.pin_hash.is_some());

        manager.set_lock_enabled(&u, true).await.unwrap();
        assert!(manager.verify_lock_pin(&u, "1357").await.unwrap());
    }

    #[tokio::test]
    async fn test_enable_without_pin_fails() {
        let manager = manager();

        assert!(matches!(
            manager.set_lock_enabled(&user("u1"), true).await,
            Err(Error::NotPermitted(_))
        ));
    }

    #[tokio::test]
    async fn test_reveal_corrupt_ciphertext_is_masked() {
        let manager = manager();
        assert_eq!(manager.reveal(&user("u1"), "not-valid-base64!!"), "");
    }
}
