use serde::{Deserialize, Serialize};

use super::{Model, UacModel};

/// User account row (`users`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub date_created: String, // ISO date string
    pub last_login: Option<String>,
    pub is_active: bool,
    pub user_level_id: Option<i64>,
    pub reports_to_user_id: Option<i64>,
    pub photo: Option<String>,
    pub mobile_number: Option<String>,
    pub profile: Option<String>,
}

impl User {
    /// "First Last" when both names are set, otherwise the username
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{} {}", first, last)
            }
            _ => self.username.clone(),
        }
    }
}

/// Editable user fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserFormData {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
    pub user_level_id: Option<i64>,
    pub reports_to_user_id: Option<i64>,
    pub photo: Option<String>,
    pub mobile_number: Option<String>,
    pub profile: Option<String>,
}

impl From<&User> for UserFormData {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            country: user.country.clone(),
            is_active: user.is_active,
            user_level_id: user.user_level_id,
            reports_to_user_id: user.reports_to_user_id,
            photo: user.photo.clone(),
            mobile_number: user.mobile_number.clone(),
            profile: user.profile.clone(),
        }
    }
}

impl Model for User {
    const NAME: &'static str = "users";
    type FormData = UserFormData;
}

impl UacModel for User {}

/// Access level row (`user_levels`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserLevel {
    pub user_level_id: i64,
    pub user_level_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserLevelFormData {
    pub user_level_name: String,
}

impl From<&UserLevel> for UserLevelFormData {
    fn from(level: &UserLevel) -> Self {
        Self {
            user_level_name: level.user_level_name.clone(),
        }
    }
}

impl Model for UserLevel {
    const NAME: &'static str = "user_levels";
    type FormData = UserLevelFormData;
}

impl UacModel for UserLevel {}

/// User joined with its level and manager, as returned by master/detail views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserWithRelations {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_levels: Option<UserLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_to_user: Option<Box<User>>,
}
