use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::validation::{normalize_tags, ValidationErrors};

/// User record in the store.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never serialized
    pub bio: String,
    pub location: String,
    pub website: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Wire representation of a user; everything but the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    pub website: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            bio: u.bio,
            location: u.location,
            website: u.website,
            github: u.github,
            linkedin: u.linkedin,
            twitter: u.twitter,
            skills: u.skills,
            interests: u.interests,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Body of a profile update. Absent fields are left untouched; an empty link clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

pub const MAX_BIO_CHARS: usize = 500;

/// Validated form of [`ProfileUpdate`]. Link fields use `Some(None)` for "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    name: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    website: Option<Option<String>>,
    github: Option<Option<String>>,
    linkedin: Option<Option<String>>,
    twitter: Option<Option<String>>,
    skills: Option<Vec<String>>,
    interests: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<ProfileChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.as_deref().map(|n| errors.required("name", n));
        let bio = self.bio.as_deref().map(|b| b.trim().to_owned());
        if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_CHARS) {
            errors.push("bio", format!("bio must not exceed {MAX_BIO_CHARS} characters"));
        }
        let location = self.location.as_deref().map(|l| l.trim().to_owned());

        let mut link = |field: &'static str, value: &Option<String>| {
            value
                .as_deref()
                .map(|v| errors.optional_url(field, Some(v)))
        };
        let website = link("website", &self.website);
        let github = link("github", &self.github);
        let linkedin = link("linkedin", &self.linkedin);
        let twitter = link("twitter", &self.twitter);

        let changes = ProfileChanges {
            name,
            bio,
            location,
            website,
            github,
            linkedin,
            twitter,
            skills: self.skills.as_deref().map(normalize_tags),
            interests: self.interests.as_deref().map(normalize_tags),
        };
        errors.into_result().map(|_| changes)
    }
}

impl ProfileChanges {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(location) = self.location {
            user.location = location;
        }
        if let Some(website) = self.website {
            user.website = website;
        }
        if let Some(github) = self.github {
            user.github = github;
        }
        if let Some(linkedin) = self.linkedin {
            user.linkedin = linkedin;
        }
        if let Some(twitter) = self.twitter {
            user.twitter = twitter;
        }
        if let Some(skills) = self.skills {
            user.skills = skills;
        }
        if let Some(interests) = self.interests {
            user.interests = interests;
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_user(name: &str, skills: &[&str]) -> User {
    let now = OffsetDateTime::now_utc();
    User {
        id: Uuid::new_v4(),
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: String::new(),
        bio: String::new(),
        location: String::new(),
        website: None,
        github: None,
        linkedin: None,
        twitter: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        interests: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_hides_password_hash() {
        let mut user = sample_user("Ada", &["Rust"]);
        user.password_hash = "$argon2id$secret".into();
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn partial_update_touches_only_given_fields() {
        let mut user = sample_user("Ada", &["Rust"]);
        user.github = Some("https://github.com/ada".into());

        let update = ProfileUpdate {
            bio: Some("  Systems programmer ".into()),
            github: Some(String::new()),
            skills: Some(vec!["Rust".into(), "Go".into(), "Rust".into()]),
            ..Default::default()
        };
        update.validate().expect("valid").apply(&mut user);

        assert_eq!(user.name, "Ada");
        assert_eq!(user.bio, "Systems programmer");
        assert_eq!(user.github, None);
        assert_eq!(user.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn invalid_update_reports_each_field() {
        let update = ProfileUpdate {
            name: Some("   ".into()),
            bio: Some("x".repeat(MAX_BIO_CHARS + 1)),
            twitter: Some("twitter dot com".into()),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["name", "bio", "twitter"]);
    }
}
