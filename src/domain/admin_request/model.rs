use chrono::{DateTime, Utc};

/// Self-service request to become an admin.
///
/// Pending while `is_validated` is false and `deleted_at` is unset. Approval
/// sets `is_validated`, rejection sets `deleted_at`; neither is ever undone.
#[derive(Clone, Debug)]
pub struct AdminRequest {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub is_validated: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AdminRequest {
    pub fn is_pending(&self) -> bool {
        !self.is_validated && self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct CreateAdminRequestDto {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AdminRequest {
        AdminRequest {
            id: "req-1".into(),
            username: "root_candidate".into(),
            email: "root@example.com".into(),
            full_name: None,
            password_hash: "$2b$10$hash".into(),
            is_validated: false,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn pending_until_resolved() {
        let mut r = request();
        assert!(r.is_pending());

        r.is_validated = true;
        assert!(!r.is_pending());

        let mut r = request();
        r.deleted_at = Some(Utc::now());
        assert!(!r.is_pending());
    }
}
