/// Profile API routes
///
/// Nested experience and education entries are changed by loading the
/// caller's profile, applying the change in memory and saving it back.
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use devhub_core::types::{
    EducationInput, ExperienceInput, ItemId, PopulatedProfile, Profile, ProfileInput, UserId,
};
use devhub_core::validation::{
    validate_education, validate_experience, validate_profile, ProfileMode,
};
use devhub_core::Storage;
use serde_json::{json, Value};

const NO_PROFILE: &str = "There is no profile for this user";

/// GET /api/profile
pub async fn current(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PopulatedProfile>> {
    let profile = own_profile(&app_state, auth.user_id()).await?;
    populated(&app_state, profile).await
}

/// POST /api/profile
/// Create the caller's profile, or update the fields the request provides
pub async fn save(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ProfileInput>,
) -> Result<Json<PopulatedProfile>> {
    let existing = app_state.db.find_profile_by_user(auth.user_id()).await?;
    let mode = if existing.is_some() {
        ProfileMode::Update
    } else {
        ProfileMode::Create
    };
    let fields = validate_profile(&req, mode)?;

    if let Some(handle) = &fields.handle {
        if let Some(holder) = app_state.db.find_profile_by_handle(handle).await? {
            if &holder.user != auth.user_id() {
                return Err(ServerError::validation(
                    "handle",
                    "That handle already exists",
                ));
            }
        }
    }

    let profile = match existing {
        Some(_) => {
            let mut change = |profile: &mut Profile| {
                profile.apply_fields(fields.clone());
                true
            };
            let profile = modify_own_profile(&app_state, auth.user_id(), &mut change).await?;
            tracing::info!(profile_id = %profile.id, "Profile updated");
            profile
        }
        None => {
            let profile = Profile::new(auth.user_id().clone(), fields);
            let profile = app_state.db.create_profile(profile).await?;
            tracing::info!(profile_id = %profile.id, handle = %profile.handle, "Profile created");
            profile
        }
    };

    populated(&app_state, profile).await
}

/// DELETE /api/profile
/// Delete the caller's profile and account. Their posts stay.
pub async fn delete_account(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    app_state.db.delete_profile_by_user(auth.user_id()).await?;
    app_state.db.delete_user(auth.user_id()).await?;

    tracing::info!(user_id = %auth.user_id(), "Account deleted");

    Ok(Json(json!({ "success": true })))
}

/// GET /api/profile/all
pub async fn list(State(app_state): State<AppState>) -> Result<Json<Vec<PopulatedProfile>>> {
    let profiles = app_state.db.get_all_profiles().await?;
    let profiles = app_state.db.populate_profiles(profiles).await?;

    if profiles.is_empty() {
        return Err(ServerError::not_found("noprofile", "There are no profiles"));
    }

    Ok(Json(profiles))
}

/// GET /api/profile/handle/:handle
pub async fn by_handle(
    State(app_state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<PopulatedProfile>> {
    let profile = app_state
        .db
        .find_profile_by_handle(&handle)
        .await?
        .ok_or_else(|| ServerError::not_found("noprofile", NO_PROFILE))?;

    populated(&app_state, profile).await
}

/// GET /api/profile/user/:user_id
pub async fn by_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PopulatedProfile>> {
    let profile = own_profile(&app_state, &UserId::new(user_id)).await?;
    populated(&app_state, profile).await
}

/// POST /api/profile/experience
pub async fn add_experience(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ExperienceInput>,
) -> Result<Json<PopulatedProfile>> {
    let experience = validate_experience(&req)?;

    let mut change = |profile: &mut Profile| {
        profile.add_experience(experience.clone());
        true
    };
    let profile = modify_own_profile(&app_state, auth.user_id(), &mut change).await?;

    populated(&app_state, profile).await
}

/// DELETE /api/profile/experience/:exp_id
pub async fn remove_experience(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(exp_id): Path<String>,
) -> Result<Json<PopulatedProfile>> {
    let exp_id = ItemId::new(exp_id);
    let mut change = |profile: &mut Profile| profile.remove_experience(&exp_id);
    let profile = modify_own_profile(&app_state, auth.user_id(), &mut change).await?;

    populated(&app_state, profile).await
}

/// POST /api/profile/education
pub async fn add_education(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<EducationInput>,
) -> Result<Json<PopulatedProfile>> {
    let education = validate_education(&req)?;

    let mut change = |profile: &mut Profile| {
        profile.add_education(education.clone());
        true
    };
    let profile = modify_own_profile(&app_state, auth.user_id(), &mut change).await?;

    populated(&app_state, profile).await
}

/// DELETE /api/profile/education/:edu_id
pub async fn remove_education(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(edu_id): Path<String>,
) -> Result<Json<PopulatedProfile>> {
    let edu_id = ItemId::new(edu_id);
    let mut change = |profile: &mut Profile| profile.remove_education(&edu_id);
    let profile = modify_own_profile(&app_state, auth.user_id(), &mut change).await?;

    populated(&app_state, profile).await
}

async fn modify_own_profile(
    app_state: &AppState,
    user_id: &UserId,
    change: &mut (dyn FnMut(&mut Profile) -> bool + Send),
) -> Result<Profile> {
    app_state
        .db
        .modify_profile(user_id, change)
        .await?
        .ok_or_else(|| ServerError::not_found("noprofile", NO_PROFILE))
}

async fn own_profile(app_state: &AppState, user_id: &UserId) -> Result<Profile> {
    app_state
        .db
        .find_profile_by_user(user_id)
        .await?
        .ok_or_else(|| ServerError::not_found("noprofile", NO_PROFILE))
}

async fn populated(app_state: &AppState, profile: Profile) -> Result<Json<PopulatedProfile>> {
    Ok(Json(app_state.db.populate_profile(profile).await?))
}
