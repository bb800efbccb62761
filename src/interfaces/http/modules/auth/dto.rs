//! Authentication DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{UpdateProfileDto, User};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Public identity fields
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.to_string(),
        }
    }
}

/// Full profile, never including the credential hash
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_picture: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
    pub language_preference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.to_string(),
            date_of_birth: user.date_of_birth,
            profile_picture: user.profile_picture.clone(),
            phone_number: user.phone_number.clone(),
            address: user.address.clone(),
            timezone: user.timezone.clone(),
            language_preference: user.language_preference.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile edit; omitted fields keep their current value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct EditProfileRequest {
    pub username: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    pub full_name: Option<String>,
    /// `YYYY-MM-DD`; an empty string counts as omitted
    pub date_of_birth: Option<String>,
    pub profile_picture: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
    pub language_preference: Option<String>,
}

impl EditProfileRequest {
    /// Convert to the domain update, parsing the birth date
    pub fn into_update(self) -> Result<UpdateProfileDto, String> {
        let date_of_birth = match self.date_of_birth.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("Invalid date_of_birth: {}", raw))?,
            ),
        };

        Ok(UpdateProfileDto {
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            date_of_birth,
            profile_picture: self.profile_picture,
            phone_number: self.phone_number,
            address: self.address,
            timezone: self.timezone,
            language_preference: self.language_preference,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "old password is required"))]
    pub old_password: String,
    pub new_password: String,
}
