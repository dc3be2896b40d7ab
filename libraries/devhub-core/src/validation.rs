//! Input validation.
//!
//! Each validator checks a raw request body against a fixed schema and
//! returns either the typed value the mutation model accepts or a
//! [`FieldErrors`] mapping keyed by the offending field. Validation always
//! runs before anything is read from or written to the store.

use crate::error::FieldErrors;
use crate::types::{
    EducationInput, ExperienceInput, LoginInput, NewEducation, NewExperience, NewPost,
    ProfileFields, ProfileInput, RegisterInput, SocialLinks, TextInput,
};
use chrono::{DateTime, NaiveDate};

/// Validated registration data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validated login data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Which profile schema applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    /// First save: handle, status and skills are required
    Create,
    /// Later saves: every field is optional
    Update,
}

pub fn validate_register(input: &RegisterInput) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = trimmed(input.name.as_deref());
    let email = trimmed(input.email.as_deref());
    let password = input.password.clone().unwrap_or_default();
    let password2 = input.password2.clone().unwrap_or_default();

    if name.is_empty() {
        errors.insert("name", "Name field is required");
    } else if !char_len_between(&name, 2, 30) {
        errors.insert("name", "Name must be between 2 and 30 characters");
    }

    check_email(&mut errors, &email);

    if password.is_empty() {
        errors.insert("password", "Password field is required");
    } else if !char_len_between(&password, 6, 30) {
        errors.insert("password", "Password must be at least 6 characters");
    }

    if password2.is_empty() {
        errors.insert("password2", "Confirm password field is required");
    } else if password != password2 {
        errors.insert("password2", "Passwords must match");
    }

    errors.into_result(Registration {
        name,
        email,
        password,
    })
}

pub fn validate_login(input: &LoginInput) -> Result<Login, FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = trimmed(input.email.as_deref());
    let password = input.password.clone().unwrap_or_default();

    check_email(&mut errors, &email);
    if password.is_empty() {
        errors.insert("password", "Password field is required");
    }

    errors.into_result(Login { email, password })
}

pub fn validate_profile(
    input: &ProfileInput,
    mode: ProfileMode,
) -> Result<ProfileFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let handle = provided(input.handle.as_deref());
    match &handle {
        Some(handle) if !char_len_between(handle, 2, 40) => {
            errors.insert("handle", "Handle needs to be between 2 and 40 characters");
        }
        None if mode == ProfileMode::Create => {
            errors.insert("handle", "Profile handle is required");
        }
        _ => {}
    }

    let status = provided(input.status.as_deref());
    if status.is_none() && mode == ProfileMode::Create {
        errors.insert("status", "Status field is required");
    }

    let skills = input.skills.as_deref().map(split_skills);
    if mode == ProfileMode::Create && skills.as_ref().map_or(true, Vec::is_empty) {
        errors.insert("skills", "Skills field is required");
    }

    let website = provided(input.website.as_deref());
    check_url(&mut errors, "website", website.as_deref());

    let social = SocialLinks {
        youtube: provided(input.youtube.as_deref()),
        twitter: provided(input.twitter.as_deref()),
        facebook: provided(input.facebook.as_deref()),
        linkedin: provided(input.linkedin.as_deref()),
        instagram: provided(input.instagram.as_deref()),
    };
    check_url(&mut errors, "youtube", social.youtube.as_deref());
    check_url(&mut errors, "twitter", social.twitter.as_deref());
    check_url(&mut errors, "facebook", social.facebook.as_deref());
    check_url(&mut errors, "linkedin", social.linkedin.as_deref());
    check_url(&mut errors, "instagram", social.instagram.as_deref());

    errors.into_result(ProfileFields {
        handle,
        company: provided(input.company.as_deref()),
        website,
        location: provided(input.location.as_deref()),
        status,
        skills,
        bio: provided(input.bio.as_deref()),
        github_username: provided(input.github_username.as_deref()),
        social,
    })
}

pub fn validate_experience(input: &ExperienceInput) -> Result<NewExperience, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = required(
        &mut errors,
        "title",
        input.title.as_deref(),
        "Job title field is required",
    );
    let company = required(
        &mut errors,
        "company",
        input.company.as_deref(),
        "Company field is required",
    );
    let (from, to) = date_range(&mut errors, input.from.as_deref(), input.to.as_deref());

    match from {
        Some(from) if errors.is_empty() => Ok(NewExperience {
            title,
            company,
            location: provided(input.location.as_deref()),
            from,
            to,
            current: input.current,
            description: provided(input.description.as_deref()),
        }),
        _ => Err(errors),
    }
}

pub fn validate_education(input: &EducationInput) -> Result<NewEducation, FieldErrors> {
    let mut errors = FieldErrors::new();

    let school = required(
        &mut errors,
        "school",
        input.school.as_deref(),
        "School field is required",
    );
    let degree = required(
        &mut errors,
        "degree",
        input.degree.as_deref(),
        "Degree field is required",
    );
    let field_of_study = required(
        &mut errors,
        "fieldOfStudy",
        input.field_of_study.as_deref(),
        "Field of study field is required",
    );
    let (from, to) = date_range(&mut errors, input.from.as_deref(), input.to.as_deref());

    match from {
        Some(from) if errors.is_empty() => Ok(NewEducation {
            school,
            degree,
            field_of_study,
            from,
            to,
            current: input.current,
            description: provided(input.description.as_deref()),
        }),
        _ => Err(errors),
    }
}

/// Post bodies and comment bodies share one schema
pub fn validate_text(input: &TextInput) -> Result<NewPost, FieldErrors> {
    let mut errors = FieldErrors::new();
    let text = trimmed(input.text.as_deref());

    if text.is_empty() {
        errors.insert("text", "Text field is required");
    } else if !char_len_between(&text, 10, 300) {
        errors.insert("text", "Post must be between 10 and 300 characters");
    }

    errors.into_result(NewPost { text })
}

/// Split a comma-separated skill list, trimming entries and dropping blanks
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn date_range(
    errors: &mut FieldErrors,
    from: Option<&str>,
    to: Option<&str>,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let from = match provided(from) {
        None => {
            errors.insert("from", "From date field is required");
            None
        }
        Some(raw) => {
            let parsed = parse_date(&raw);
            if parsed.is_none() {
                errors.insert("from", "From date is not a valid date");
            }
            parsed
        }
    };

    let to = provided(to).and_then(|raw| {
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            errors.insert("to", "To date is not a valid date");
        }
        parsed
    });

    if let (Some(from), Some(to)) = (from, to) {
        if to < from {
            errors.insert("to", "To date must not be before the from date");
        }
    }

    (from, to)
}

fn required(errors: &mut FieldErrors, field: &str, value: Option<&str>, message: &str) -> String {
    let value = trimmed(value);
    if value.is_empty() {
        errors.insert(field, message);
    }
    value
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.insert("email", "Email field is required");
    } else if !is_email(email) {
        errors.insert("email", "Email is invalid");
    }
}

fn check_url(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !is_url(value) {
            errors.insert(field, "Not a valid URL");
        }
    }
}

fn is_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Scheme-less values such as `example.com/me` are accepted as https URLs
fn is_url(value: &str) -> bool {
    let candidate = if value.contains("://") {
        value.to_string()
    } else {
        format!("https://{}", value)
    };
    match url::Url::parse(&candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| host.contains('.'))
        }
        Err(_) => false,
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn provided(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    (min..=max).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str, password2: &str) -> RegisterInput {
        RegisterInput {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            password2: Some(password2.into()),
        }
    }

    #[test]
    fn register_accepts_valid_input() {
        let registration =
            validate_register(&register(" Jane ", "jane@x.com", "secret1", "secret1")).unwrap();
        assert_eq!(registration.name, "Jane");
        assert_eq!(registration.email, "jane@x.com");
    }

    #[test]
    fn register_reports_each_field() {
        let errors = validate_register(&RegisterInput::default()).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name field is required"));
        assert_eq!(errors.get("email"), Some("Email field is required"));
        assert_eq!(errors.get("password"), Some("Password field is required"));
        assert_eq!(errors.get("password2"), Some("Confirm password field is required"));
    }

    #[test]
    fn register_rejects_mismatched_passwords_and_bad_email() {
        let errors = validate_register(&register("Jane", "jane.x.com", "secret1", "secret2"))
            .unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("password2"), Some("Passwords must match"));
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(&LoginInput {
            email: Some("a@x.com".into()),
            password: None,
        })
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("password"), Some("Password field is required"));
    }

    #[test]
    fn create_profile_requires_handle_status_skills() {
        let errors = validate_profile(&ProfileInput::default(), ProfileMode::Create).unwrap_err();
        assert_eq!(errors.get("handle"), Some("Profile handle is required"));
        assert_eq!(errors.get("status"), Some("Status field is required"));
        assert_eq!(errors.get("skills"), Some("Skills field is required"));
    }

    #[test]
    fn update_profile_accepts_partial_input() {
        let fields = validate_profile(
            &ProfileInput {
                bio: Some("Hello".into()),
                ..Default::default()
            },
            ProfileMode::Update,
        )
        .unwrap();
        assert_eq!(fields.bio.as_deref(), Some("Hello"));
        assert!(fields.handle.is_none());
        assert!(fields.skills.is_none());
    }

    #[test]
    fn profile_skills_are_split_and_links_checked() {
        let input = ProfileInput {
            handle: Some("jdoe".into()),
            status: Some("Developer".into()),
            skills: Some(" rust, sql ,,tokio ".into()),
            website: Some("jdoe.dev".into()),
            twitter: Some("not a url".into()),
            ..Default::default()
        };
        let errors = validate_profile(&input, ProfileMode::Create).unwrap_err();
        assert_eq!(errors.get("twitter"), Some("Not a valid URL"));
        assert!(errors.get("website").is_none());

        let fields = validate_profile(
            &ProfileInput {
                twitter: None,
                ..input
            },
            ProfileMode::Create,
        )
        .unwrap();
        assert_eq!(
            fields.skills,
            Some(vec!["rust".to_string(), "sql".to_string(), "tokio".to_string()])
        );
    }

    #[test]
    fn handle_length_is_checked_in_both_modes() {
        let input = ProfileInput {
            handle: Some("j".into()),
            ..Default::default()
        };
        let errors = validate_profile(&input, ProfileMode::Update).unwrap_err();
        assert_eq!(
            errors.get("handle"),
            Some("Handle needs to be between 2 and 40 characters")
        );
    }

    #[test]
    fn experience_requires_title_company_from() {
        let errors = validate_experience(&ExperienceInput::default()).unwrap_err();
        assert_eq!(errors.get("title"), Some("Job title field is required"));
        assert_eq!(errors.get("company"), Some("Company field is required"));
        assert_eq!(errors.get("from"), Some("From date field is required"));
    }

    #[test]
    fn experience_parses_dates() {
        let experience = validate_experience(&ExperienceInput {
            title: Some("Engineer".into()),
            company: Some("Acme".into()),
            from: Some("2018-01-15".into()),
            to: Some("2020-06-01T00:00:00Z".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(experience.from, NaiveDate::from_ymd_opt(2018, 1, 15).unwrap());
        assert_eq!(experience.to, NaiveDate::from_ymd_opt(2020, 6, 1));
    }

    #[test]
    fn experience_rejects_inverted_range() {
        let errors = validate_experience(&ExperienceInput {
            title: Some("Engineer".into()),
            company: Some("Acme".into()),
            from: Some("2020-01-01".into()),
            to: Some("2019-01-01".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(errors.get("to"), Some("To date must not be before the from date"));
    }

    #[test]
    fn education_uses_camel_case_field_key() {
        let errors = validate_education(&EducationInput {
            school: Some("MIT".into()),
            degree: Some("BSc".into()),
            from: Some("garbage".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(errors.get("fieldOfStudy"), Some("Field of study field is required"));
        assert_eq!(errors.get("from"), Some("From date is not a valid date"));
    }

    #[test]
    fn text_length_bounds() {
        assert!(validate_text(&TextInput {
            text: Some("too short".into())
        })
        .is_err());
        assert!(validate_text(&TextInput {
            text: Some("x".repeat(301))
        })
        .is_err());
        let post = validate_text(&TextInput {
            text: Some("  just long enough  ".into()),
        })
        .unwrap();
        assert_eq!(post.text, "just long enough");
    }
}
