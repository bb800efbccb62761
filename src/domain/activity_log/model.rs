use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Kind of audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Register,
    Login,
    LoginFailed,
    Logout,
    ProfileUpdate,
    PasswordChange,
    Delete,
    CreateAdmin,
    ChangeRole,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Register => "register",
            ActivityType::Login => "login",
            ActivityType::LoginFailed => "login_failed",
            ActivityType::Logout => "logout",
            ActivityType::ProfileUpdate => "profile_update",
            ActivityType::PasswordChange => "password_change",
            ActivityType::Delete => "delete",
            ActivityType::CreateAdmin => "create_admin",
            ActivityType::ChangeRole => "change_role",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "register" => ActivityType::Register,
            "login" => ActivityType::Login,
            "login_failed" => ActivityType::LoginFailed,
            "logout" => ActivityType::Logout,
            "profile_update" => ActivityType::ProfileUpdate,
            "password_change" => ActivityType::PasswordChange,
            "delete" => ActivityType::Delete,
            "create_admin" => ActivityType::CreateAdmin,
            "change_role" => ActivityType::ChangeRole,
            other => return Err(format!("unknown activity type: {}", other)),
        })
    }
}

/// Append-only audit record
#[derive(Clone, Debug)]
pub struct ActivityLogEntry {
    pub id: i32,
    pub user_id: String,
    pub activity_type: ActivityType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
