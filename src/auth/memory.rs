use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::{AuthClient, AuthError, BoxedAuthFuture, UserId};
use crate::form::is_valid_email;

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user_id: UserId,
    password: String,
}

struct AccountBook {
    accounts: BTreeMap<String, Account>,
    next_uid: u64,
    online: bool,
}

/// An in-process provider with Firebase-style error codes, for tests and
/// local runs without a backend.
#[derive(Clone)]
pub struct InMemoryAuthClient {
    state: Arc<RwLock<AccountBook>>,
}

impl InMemoryAuthClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(AccountBook {
                accounts: BTreeMap::new(),
                next_uid: 1,
                online: true,
            })),
        }
    }

    /// Simulates losing connectivity: every call fails until switched back.
    pub fn set_online(&self, online: bool) {
        write(&self.state).online = online;
    }

    pub fn account_count(&self) -> usize {
        read(&self.state).accounts.len()
    }

    pub fn user_id(&self, email: &str) -> Option<UserId> {
        read(&self.state)
            .accounts
            .get(&normalize(email))
            .map(|account| account.user_id.clone())
    }

    fn create_account(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let mut book = write(&self.state);
        check_online(&book)?;
        if !is_valid_email(email) {
            return Err(provider_error("auth/invalid-email"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::with_code(
                "auth/weak-password",
                "Firebase: Password should be at least 6 characters (auth/weak-password).",
            ));
        }
        let email = normalize(email);
        if book.accounts.contains_key(&email) {
            return Err(provider_error("auth/email-already-in-use"));
        }

        let user_id = UserId::new(format!("uid-{:06}", book.next_uid));
        book.next_uid += 1;
        book.accounts.insert(
            email,
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        debug!(user = %user_id, "account created");
        Ok(user_id)
    }

    fn verify(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let book = read(&self.state);
        check_online(&book)?;
        if !is_valid_email(email) {
            return Err(provider_error("auth/invalid-email"));
        }
        match book.accounts.get(&normalize(email)) {
            Some(account) if account.password == password => Ok(account.user_id.clone()),
            _ => Err(provider_error("auth/invalid-credential")),
        }
    }
}

impl Default for InMemoryAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthClient for InMemoryAuthClient {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> BoxedAuthFuture<'a> {
        Box::pin(async move { self.verify(email, password) })
    }

    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> BoxedAuthFuture<'a> {
        Box::pin(async move { self.create_account(email, password) })
    }
}

fn check_online(book: &AccountBook) -> Result<(), AuthError> {
    if book.online {
        Ok(())
    } else {
        Err(provider_error("auth/network-request-failed"))
    }
}

fn provider_error(code: &'static str) -> AuthError {
    AuthError::with_code(code, format!("Firebase: Error ({code})."))
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn read(lock: &RwLock<AccountBook>) -> RwLockReadGuard<'_, AccountBook> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write(lock: &RwLock<AccountBook>) -> RwLockWriteGuard<'_, AccountBook> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
