//! Credential and identity types
//!
//! `UserRecord` is the persisted login row, `StudentCredentials` the separate
//! wallet-password row, and `Identity` the role-tagged value handed out by a
//! successful login.

use std::fmt;
use std::str::FromStr;

/// Canonical student identifier, e.g. `STD101`
pub type StudentId = String;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Manages the catalog and student wallets
    Admin,
    /// Shops from the catalog and pays from a wallet or in cash
    Student,
}

impl Role {
    /// Literal used in the users file
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            other => Err(format!("Invalid role '{}'", other)),
        }
    }
}

/// A persisted login row
///
/// Passwords are stored as plaintext to stay compatible with existing data
/// files.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub role: Role,

    /// Set for students only
    pub student_id: Option<StudentId>,

    /// Set for admins only
    pub canteen_name: Option<String>,
}

impl UserRecord {
    /// Build a student login row
    pub fn student(
        username: impl Into<String>,
        password: impl Into<String>,
        student_id: impl Into<StudentId>,
    ) -> Self {
        UserRecord {
            username: username.into(),
            password: password.into(),
            role: Role::Student,
            student_id: Some(student_id.into()),
            canteen_name: None,
        }
    }

    /// Build an admin login row
    pub fn admin(
        username: impl Into<String>,
        password: impl Into<String>,
        canteen_name: impl Into<String>,
    ) -> Self {
        UserRecord {
            username: username.into(),
            password: password.into(),
            role: Role::Admin,
            student_id: None,
            canteen_name: Some(canteen_name.into()),
        }
    }

    /// Role-tagged identity for this record
    pub fn identity(&self) -> Identity {
        match self.role {
            Role::Admin => Identity::Admin {
                username: self.username.clone(),
                canteen_name: self.canteen_name.clone().unwrap_or_default(),
            },
            Role::Student => Identity::Student {
                username: self.username.clone(),
                student_id: self.student_id.clone().unwrap_or_default(),
            },
        }
    }
}

/// Wallet password of one student, kept apart from the login row
#[derive(Debug, Clone, PartialEq)]
pub struct StudentCredentials {
    pub student_id: StudentId,
    pub wallet_password: String,
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Admin {
        username: String,
        canteen_name: String,
    },
    Student {
        username: String,
        student_id: StudentId,
    },
}

impl Identity {
    pub fn username(&self) -> &str {
        match self {
            Identity::Admin { username, .. } | Identity::Student { username, .. } => username,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Identity::Admin { .. } => Role::Admin,
            Identity::Student { .. } => Role::Student,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("student", Role::Student)]
    #[case("STUDENT", Role::Student)]
    fn test_role_parsing(#[case] input: &str, #[case] expected: Role) {
        assert_eq!(input.parse::<Role>().unwrap(), expected);
    }

    #[test]
    fn test_role_parsing_rejects_unknown() {
        assert!("cashier".parse::<Role>().is_err());
    }

    #[test]
    fn test_identity_from_records() {
        let admin = UserRecord::admin("admin1", "admin123", "Main Canteen");
        assert_eq!(
            admin.identity(),
            Identity::Admin {
                username: "admin1".to_string(),
                canteen_name: "Main Canteen".to_string(),
            }
        );

        let student = UserRecord::student("student1", "pass123", "STD101");
        let identity = student.identity();
        assert_eq!(identity.role(), Role::Student);
        assert_eq!(identity.username(), "student1");
    }
}
