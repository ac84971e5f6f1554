/**
 * User Documents
 *
 * A user is either a senior homeowner (who may post listings) or a
 * prospective roommate. The password hash lives on the document but is never
 * serialized, so every rendered user is already stripped.
 */

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_max_chars, require_non_blank, SharedError};
use crate::shared::models::location::{GenderPreference, Location};
use crate::shared::update::{non_null, nullable, WhitelistedUpdate};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum bio length in characters
pub const MAX_BIO_LEN: usize = 1000;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Homeowner offering housing
    Senior,
    /// Person looking for housing
    Roommate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Senior => "senior",
            Role::Roommate => "roommate",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive age bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

/// Roommate matching preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub smoking: bool,
    #[serde(default)]
    pub pets: bool,
    #[serde(default)]
    pub gender: GenderPreference,
    pub age_range: AgeRange,
    pub max_rent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<NaiveDate>,
}

impl Preferences {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.age_range.min > self.age_range.max {
            return Err(SharedError::validation(
                "preferences.ageRange",
                "min must not exceed max",
            ));
        }
        if !self.max_rent.is_finite() || self.max_rent < 0.0 {
            return Err(SharedError::validation(
                "preferences.maxRent",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Verification flags; all start out false
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    pub email_verified: bool,
    pub phone_verified: bool,
    pub identity_verified: bool,
    pub background_checked: bool,
}

/// User struct representing a stored user document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Email address, trimmed and lowercased; unique across users
    pub email: String,
    /// bcrypt hash; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub location: Location,
    pub preferences: Preferences,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sign up request
///
/// Fields not listed here (including `verificationStatus`) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    /// Plain-text password, hashed before storage
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    pub location: Location,
    pub preferences: Preferences,
}

impl RegisterRequest {
    /// Email in its stored form
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }

    pub fn validate(&self) -> Result<(), SharedError> {
        let email = self.normalized_email();
        if email.is_empty() || !email.contains('@') {
            return Err(SharedError::validation("email", "Invalid email format"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SharedError::validation(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        require_non_blank("firstName", &self.first_name)?;
        require_non_blank("lastName", &self.last_name)?;
        require_non_blank("phoneNumber", &self.phone_number)?;
        self.location.validate()?;
        self.preferences.validate()?;
        Ok(())
    }

    /// Build the insertable document once the password has been hashed
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            email: normalize_email(&self.email),
            password_hash,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            role: self.role,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
            location: self.location,
            preferences: self.preferences,
        }
    }
}

/// A user document before the store assigns id and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    pub location: Location,
    pub preferences: Preferences,
}

/// Profile patch; any other field rejects the whole update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "non_null")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub phone_number: Option<String>,
    /// `null` removes the picture
    #[serde(default, deserialize_with = "nullable")]
    pub profile_picture: Option<Option<String>>,
    /// `null` removes the bio
    #[serde(default, deserialize_with = "nullable")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "non_null")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "non_null")]
    pub preferences: Option<Preferences>,
}

impl WhitelistedUpdate for ProfileUpdate {
    const ALLOWED_FIELDS: &'static [&'static str] = &[
        "firstName",
        "lastName",
        "phoneNumber",
        "profilePicture",
        "bio",
        "location",
        "preferences",
    ];
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), SharedError> {
        if let Some(first_name) = &self.first_name {
            require_non_blank("firstName", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            require_non_blank("lastName", last_name)?;
        }
        if let Some(phone_number) = &self.phone_number {
            require_non_blank("phoneNumber", phone_number)?;
        }
        if let Some(Some(bio)) = &self.bio {
            require_max_chars("bio", bio, MAX_BIO_LEN)?;
        }
        if let Some(location) = &self.location {
            location.validate()?;
        }
        if let Some(preferences) = &self.preferences {
            preferences.validate()?;
        }
        Ok(())
    }

    /// Validate, then overwrite every provided field on `user`
    pub fn apply(self, user: &mut User) -> Result<(), SharedError> {
        self.validate()?;
        if let Some(first_name) = self.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(profile_picture) = self.profile_picture {
            user.profile_picture = profile_picture;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(location) = self.location {
            user.location = location;
        }
        if let Some(preferences) = self.preferences {
            user.preferences = preferences;
        }
        user.updated_at = Utc::now();
        Ok(())
    }
}

/// Emails are stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_payload() -> serde_json::Value {
        json!({
            "email": "  Margaret@Example.com ",
            "password": "password123",
            "firstName": "Margaret",
            "lastName": "Hale",
            "role": "senior",
            "dateOfBirth": "1948-03-14",
            "phoneNumber": "555-0100",
            "location": {
                "address": "12 Elm St",
                "city": "Portland",
                "state": "OR",
                "zipCode": "97201"
            },
            "preferences": {
                "ageRange": { "min": 25, "max": 60 },
                "maxRent": 900
            },
            "verificationStatus": { "emailVerified": true }
        })
    }

    fn user() -> User {
        let request: RegisterRequest = serde_json::from_value(register_payload()).unwrap();
        let new_user = request.into_new_user("hash".to_string());
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            date_of_birth: new_user.date_of_birth,
            phone_number: new_user.phone_number,
            profile_picture: None,
            bio: None,
            location: new_user.location,
            preferences: new_user.preferences,
            verification_status: VerificationStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_register_request_defaults_and_normalization() {
        let request: RegisterRequest = serde_json::from_value(register_payload()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.normalized_email(), "margaret@example.com");
        assert_eq!(request.preferences.gender, GenderPreference::NoPreference);
        assert!(!request.preferences.smoking);
    }

    #[test]
    fn test_short_password_rejected() {
        let mut payload = register_payload();
        payload["password"] = json!("short");
        let request: RegisterRequest = serde_json::from_value(payload).unwrap();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, SharedError::ValidationError { ref field, .. } if field == "password"));
    }

    #[test]
    fn test_unknown_role_fails_to_parse() {
        let mut payload = register_payload();
        payload["role"] = json!("admin");
        assert!(serde_json::from_value::<RegisterRequest>(payload).is_err());
    }

    #[test]
    fn test_serialized_user_has_no_password() {
        let value = serde_json::to_value(user()).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "margaret@example.com");
        assert_eq!(value["role"], "senior");
        assert_eq!(value["verificationStatus"]["emailVerified"], false);
        assert!(value.get("_id").is_some());
    }

    #[test]
    fn test_profile_update_rejects_role() {
        let err = ProfileUpdate::from_payload(json!({ "bio": "Hi", "role": "senior" })).unwrap_err();
        assert!(matches!(err, SharedError::DisallowedFields { .. }));
    }

    #[test]
    fn test_profile_update_applies_fields() {
        let mut user = user();
        let update =
            ProfileUpdate::from_payload(json!({ "bio": "Retired teacher", "firstName": " Maggie " }))
                .unwrap();
        update.apply(&mut user).unwrap();
        assert_eq!(user.first_name, "Maggie");
        assert_eq!(user.bio.as_deref(), Some("Retired teacher"));
        assert_eq!(user.last_name, "Hale");
    }

    #[test]
    fn test_profile_update_null_clears_bio() {
        let mut user = user();
        user.bio = Some("hello".to_string());
        user.profile_picture = Some("https://img.example/me.png".to_string());

        ProfileUpdate::from_payload(json!({ "bio": null }))
            .unwrap()
            .apply(&mut user)
            .unwrap();
        assert_eq!(user.bio, None);
        assert!(user.profile_picture.is_some());

        ProfileUpdate::from_payload(json!({ "profilePicture": null }))
            .unwrap()
            .apply(&mut user)
            .unwrap();
        assert_eq!(user.profile_picture, None);
    }

    #[test]
    fn test_profile_update_rejects_null_required_fields() {
        for field in ["firstName", "lastName", "phoneNumber", "location", "preferences"] {
            let err = ProfileUpdate::from_payload(json!({ field: null })).unwrap_err();
            assert!(
                matches!(err, SharedError::MalformedPayload { .. }),
                "{field}: {err:?}"
            );
        }
    }

    #[test]
    fn test_profile_update_validation_leaves_user_untouched() {
        let mut user = user();
        let before = user.clone();
        let update = ProfileUpdate::from_payload(json!({
            "firstName": "Maggie",
            "bio": "x".repeat(MAX_BIO_LEN + 1)
        }))
        .unwrap();
        assert!(update.apply(&mut user).is_err());
        assert_eq!(user, before);
    }
}
