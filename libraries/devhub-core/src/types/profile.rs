/// Profile aggregate and its nested records
use super::ids::{ItemId, ProfileId, UserId};
use super::user::UserSummary;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Developer profile, one per user.
///
/// `U` is the representation of the owning user: a bare [`UserId`] as
/// stored, or a [`UserSummary`] once populated for reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile<U = UserId> {
    #[serde(rename = "_id")]
    pub id: ProfileId,
    pub user: U,
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub social: SocialLinks,
    pub date: DateTime<Utc>,
}

/// Profile with the owning user's name and avatar filled in
pub type PopulatedProfile = Profile<UserSummary>;

impl Profile<UserId> {
    /// Create a profile for `user` from already validated fields
    pub fn new(user: UserId, fields: ProfileFields) -> Self {
        let mut profile = Self {
            id: ProfileId::generate(),
            user,
            handle: String::new(),
            company: None,
            website: None,
            location: None,
            status: String::new(),
            skills: Vec::new(),
            bio: None,
            github_username: None,
            experience: Vec::new(),
            education: Vec::new(),
            social: SocialLinks::default(),
            date: Utc::now(),
        };
        profile.apply_fields(fields);
        profile
    }

    /// Replace the user reference with its public summary
    pub fn populate(self, user: UserSummary) -> PopulatedProfile {
        Profile {
            id: self.id,
            user,
            handle: self.handle,
            company: self.company,
            website: self.website,
            location: self.location,
            status: self.status,
            skills: self.skills,
            bio: self.bio,
            github_username: self.github_username,
            experience: self.experience,
            education: self.education,
            social: self.social,
            date: self.date,
        }
    }
}

/// Links to the user's social accounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Allow-listed profile fields from a create or update request.
///
/// `None` means "not provided": on update the stored value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub handle: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
}

/// Work history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated experience input, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl NewExperience {
    pub(crate) fn into_experience(self) -> Experience {
        Experience {
            id: ItemId::generate(),
            title: self.title,
            company: self.company,
            location: self.location,
            from: self.from,
            to: self.to,
            current: self.current,
            description: self.description,
        }
    }
}

/// Education entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated education input, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl NewEducation {
    pub(crate) fn into_education(self) -> Education {
        Education {
            id: ItemId::generate(),
            school: self.school,
            degree: self.degree,
            field_of_study: self.field_of_study,
            from: self.from,
            to: self.to,
            current: self.current,
            description: self.description,
        }
    }
}
