//! DevHub Core
//!
//! Platform-agnostic domain types, the nested-aggregate mutation model,
//! input validation and error handling for DevHub.
//!
//! This crate is shared by the storage layer, the HTTP server and the
//! client library so that every side applies the same rules.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Profile`, `Post` and their nested records
//! - **Mutation Model**: insert-front / remove-by-id over nested collections
//! - **Validation**: field-keyed checks run before any mutation
//! - **Storage Trait**: the document operations the server relies on
//! - **Error Handling**: unified `HubError`, `FieldErrors` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use devhub_core::types::{NewExperience, Profile, ProfileFields, UserId};
//! use chrono::NaiveDate;
//!
//! let mut profile = Profile::new(UserId::generate(), ProfileFields::default());
//! let first = profile
//!     .add_experience(NewExperience {
//!         title: "Engineer".into(),
//!         company: "Acme".into(),
//!         location: None,
//!         from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!         to: None,
//!         current: true,
//!         description: None,
//!     })
//!     .id
//!     .clone();
//!
//! assert!(profile.remove_experience(&first));
//! assert!(!profile.remove_experience(&first));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod error;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use aggregate::Identified;
pub use error::{FieldErrors, HubError, Result};
pub use storage::Storage;

pub use types::{
    Comment, CreateUser, Education, Experience, ItemId, Like, NewComment, NewEducation,
    NewExperience, NewPost, PopulatedProfile, Post, PostId, Profile, ProfileFields, ProfileId,
    SocialLinks, User, UserCredentials, UserId, UserSummary,
};
