// 🔐 Auth Gateway - password digests and credential checks
//
// Digests are plain unsalted SHA-256, hex encoded. That is weak (identical
// passwords share a digest and precomputed tables apply) but it is the
// format every existing account store uses, so it stays until a migration
// path exists.

use crate::entities::{Account, AccountRepository};
use anyhow::Result;
use sha2::{Digest, Sha256};

/// One-way digest of a password, 64 lowercase hex chars
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct AuthGateway<'a> {
    accounts: &'a AccountRepository,
}

impl<'a> AuthGateway<'a> {
    pub fn new(accounts: &'a AccountRepository) -> Self {
        AuthGateway { accounts }
    }

    /// First account matching both number and password digest
    ///
    /// Unknown account and wrong password both give `None`, so callers
    /// cannot tell which account numbers exist.
    pub fn authenticate(&self, account_number: &str, password: &str) -> Result<Option<Account>> {
        let digest = hash_password(password);

        let account = self
            .accounts
            .load()?
            .into_iter()
            .find(|a| a.account_number == account_number && a.password_hash == digest);

        match &account {
            Some(_) => tracing::info!(account = account_number, "login succeeded"),
            None => tracing::warn!("login failed"),
        }

        Ok(account)
    }
}
