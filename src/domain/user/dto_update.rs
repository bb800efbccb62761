use chrono::NaiveDate;

/// Profile edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_picture: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
    pub language_preference: Option<String>,
}
