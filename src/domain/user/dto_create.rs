use super::UserRole;

/// Insert payload. The password is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}
