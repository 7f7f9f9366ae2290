//! Identity store module
//!
//! This module provides the `IdentityStore` which owns the users file (login
//! rows) and the students file (wallet passwords), and hands out role-tagged
//! identities on login.
//!
//! Student ids are assigned as `STD` followed by the next number after the
//! largest numeric suffix already in use, starting at `STD101`.
//!
//! # Registration
//!
//! Registering writes three records in order: the login row, the wallet
//! password row and an empty wallet. The writes are not transactional; if a
//! later one fails the earlier ones stay on disk and the registration is
//! reported as failed.

use crate::core::account_ledger::AccountLedger;
use crate::core::traits::CredentialLookup;
use crate::io::record_format::{ensure_non_empty_field, CredentialsRow, UserRow};
use crate::io::record_store::{self, WriteLock};
use crate::types::{
    CanteenError, Identity, Result, Role, StudentCredentials, StudentId, UserRecord,
};
use std::path::PathBuf;
use tracing::{info, warn};

const STUDENT_ID_PREFIX: &str = "STD";
const FIRST_STUDENT_NUMBER: u32 = 101;

/// Login rows and student wallet passwords
#[derive(Debug)]
pub struct IdentityStore {
    users_path: PathBuf,
    students_path: PathBuf,
    write_lock: WriteLock,
}

impl IdentityStore {
    pub fn new(users_path: impl Into<PathBuf>, students_path: impl Into<PathBuf>) -> Self {
        IdentityStore {
            users_path: users_path.into(),
            students_path: students_path.into(),
            write_lock: WriteLock::default(),
        }
    }

    /// All login rows in file order
    pub fn users(&self) -> Result<Vec<UserRecord>> {
        record_store::load::<UserRow, _>(&self.users_path)
    }

    /// All wallet password rows in file order
    pub fn credentials(&self) -> Result<Vec<StudentCredentials>> {
        record_store::load::<CredentialsRow, _>(&self.students_path)
    }

    pub fn find_user(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users()?
            .into_iter()
            .find(|user| user.username == username))
    }

    /// Check a username/password pair and return the matching identity
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no row has `username`
    /// - `InvalidPassword` if the stored password differs
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity> {
        let user = self
            .find_user(username)?
            .ok_or_else(|| CanteenError::user_not_found(username))?;

        if user.password != password {
            warn!(username, "login rejected");
            return Err(CanteenError::InvalidPassword);
        }

        info!(username, role = %user.role, "login accepted");
        Ok(user.identity())
    }

    /// Whether a student login row carries `student_id`
    pub fn student_exists(&self, student_id: &str) -> Result<bool> {
        Ok(self.users()?.iter().any(|user| {
            user.role == Role::Student && user.student_id.as_deref() == Some(student_id)
        }))
    }

    /// The id the next registration will receive
    pub fn next_student_id(&self) -> Result<StudentId> {
        let users = self.users()?;
        let credentials = self.credentials()?;

        let used = users
            .iter()
            .filter_map(|user| user.student_id.as_deref())
            .chain(credentials.iter().map(|c| c.student_id.as_str()))
            .filter_map(student_number);

        let next = used
            .max()
            .map_or(Some(FIRST_STUDENT_NUMBER), |max| max.checked_add(1))
            .ok_or_else(|| CanteenError::arithmetic_overflow("student id assignment"))?;

        Ok(format!("{}{:03}", STUDENT_ID_PREFIX, next))
    }

    /// Register a new student and open an empty wallet for them
    ///
    /// Returns the assigned student id.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if any value is empty or contains `|`/line breaks
    /// - `UserAlreadyExists` if `username` is taken
    /// - `StoreUnavailable` if one of the three writes fails
    pub fn register(
        &self,
        username: &str,
        password: &str,
        wallet_password: &str,
        ledger: &AccountLedger,
    ) -> Result<StudentId> {
        ensure_non_empty_field("Username", username)?;
        ensure_non_empty_field("Password", password)?;
        ensure_non_empty_field("Wallet password", wallet_password)?;

        let _guard = self.write_lock.hold();

        if self.find_user(username)?.is_some() {
            return Err(CanteenError::user_already_exists(username));
        }

        let student_id = self.next_student_id()?;
        let user = UserRecord::student(username, password, student_id.clone());
        let credentials = StudentCredentials {
            student_id: student_id.clone(),
            wallet_password: wallet_password.to_string(),
        };

        record_store::append::<UserRow, _>(&self.users_path, &user)?;

        if let Err(e) = record_store::append::<CredentialsRow, _>(&self.students_path, &credentials)
        {
            warn!(%student_id, error = %e, "registration incomplete: login row written without credentials");
            return Err(e);
        }

        if let Err(e) = ledger.open_account(&student_id) {
            warn!(%student_id, error = %e, "registration incomplete: no wallet opened");
            return Err(e);
        }

        info!(username, %student_id, "student registered");
        Ok(student_id)
    }
}

impl CredentialLookup for IdentityStore {
    fn wallet_password(&self, student_id: &str) -> Result<Option<String>> {
        Ok(self
            .credentials()?
            .into_iter()
            .find(|c| c.student_id == student_id)
            .map(|c| c.wallet_password))
    }
}

/// Numeric suffix of a canonical student id
fn student_number(student_id: &str) -> Option<u32> {
    student_id
        .strip_prefix(STUDENT_ID_PREFIX)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
}
