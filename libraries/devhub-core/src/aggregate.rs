//! Mutation model for aggregates with nested collections.
//!
//! Profiles own their experience and education entries; posts own their
//! likes and comments. Nested records are never addressed on their own:
//! they are inserted at the front of their collection with a freshly
//! generated id and removed by filtering on that id.
//!
//! Every removal reports whether the collection changed. Callers use that to
//! skip the persistence write entirely when nothing matched.

use crate::types::{
    Comment, Education, Experience, ItemId, Like, NewComment, NewEducation, NewExperience, Post,
    Profile, ProfileFields, UserId,
};

/// A nested record carrying its own stable identifier
pub trait Identified {
    /// The record's identifier
    fn id(&self) -> &ItemId;
}

impl Identified for Experience {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl Identified for Education {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl Identified for Comment {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl Identified for Like {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// Prepend `item`; it becomes `collection[0]` and the rest keep their order.
pub fn insert_front<T>(collection: &mut Vec<T>, item: T) -> &T {
    collection.insert(0, item);
    &collection[0]
}

/// Drop every item whose id equals `id`.
///
/// Returns `false` (leaving the collection untouched) when nothing matched,
/// detected by comparing lengths before and after filtering.
pub fn remove_by_id<T: Identified>(collection: &mut Vec<T>, id: &ItemId) -> bool {
    let before = collection.len();
    collection.retain(|item| item.id() != id);
    collection.len() != before
}

impl<U> Profile<U> {
    /// Insert a new experience entry at the front
    pub fn add_experience(&mut self, experience: NewExperience) -> &Experience {
        insert_front(&mut self.experience, experience.into_experience())
    }

    /// Remove the experience entry with `id`; `false` when absent
    pub fn remove_experience(&mut self, id: &ItemId) -> bool {
        remove_by_id(&mut self.experience, id)
    }

    /// Insert a new education entry at the front
    pub fn add_education(&mut self, education: NewEducation) -> &Education {
        insert_front(&mut self.education, education.into_education())
    }

    /// Remove the education entry with `id`; `false` when absent
    pub fn remove_education(&mut self, id: &ItemId) -> bool {
        remove_by_id(&mut self.education, id)
    }

    /// Overwrite the provided fields, keeping the rest (`$set` semantics).
    /// Nested collections are never touched here.
    pub fn apply_fields(&mut self, fields: ProfileFields) {
        let ProfileFields {
            handle,
            company,
            website,
            location,
            status,
            skills,
            bio,
            github_username,
            social,
        } = fields;

        if let Some(handle) = handle {
            self.handle = handle;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(skills) = skills {
            self.skills = skills;
        }
        set_if_some(&mut self.company, company);
        set_if_some(&mut self.website, website);
        set_if_some(&mut self.location, location);
        set_if_some(&mut self.bio, bio);
        set_if_some(&mut self.github_username, github_username);

        set_if_some(&mut self.social.youtube, social.youtube);
        set_if_some(&mut self.social.twitter, social.twitter);
        set_if_some(&mut self.social.facebook, social.facebook);
        set_if_some(&mut self.social.linkedin, social.linkedin);
        set_if_some(&mut self.social.instagram, social.instagram);
    }
}

fn set_if_some(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

impl Post {
    /// Whether `user` already likes this post
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.iter().any(|like| &like.user == user)
    }

    /// Record a like from `user`.
    ///
    /// A user likes a post at most once: returns `false` and leaves the
    /// likes untouched when the user is already present.
    pub fn add_like(&mut self, user: UserId) -> bool {
        if self.is_liked_by(&user) {
            return false;
        }
        self.likes.push(Like {
            id: ItemId::generate(),
            user,
        });
        true
    }

    /// Remove `user`'s like; `false` when the user had not liked the post
    pub fn remove_like(&mut self, user: &UserId) -> bool {
        let before = self.likes.len();
        self.likes.retain(|like| &like.user != user);
        self.likes.len() != before
    }

    /// Insert a comment at the front
    pub fn add_comment(&mut self, comment: NewComment) -> &Comment {
        insert_front(&mut self.comments, comment.into_comment())
    }

    /// Remove the comment with `id`; `false` when absent
    pub fn remove_comment(&mut self, id: &ItemId) -> bool {
        remove_by_id(&mut self.comments, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewPost, SocialLinks, User};
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;

    fn experience(title: &str) -> NewExperience {
        NewExperience {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            from: NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
            to: None,
            current: true,
            description: None,
        }
    }

    fn education(school: &str) -> NewEducation {
        NewEducation {
            school: school.to_string(),
            degree: "BSc".to_string(),
            field_of_study: "CS".to_string(),
            from: NaiveDate::from_ymd_opt(2012, 9, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2016, 6, 30),
            current: false,
            description: None,
        }
    }

    fn author(id: &str) -> User {
        User {
            id: UserId::new(id),
            name: format!("user {}", id),
            email: format!("{}@x.com", id),
            avatar: "https://avatar".to_string(),
            date: Utc::now(),
        }
    }

    fn profile() -> Profile {
        Profile::new(
            UserId::new("u1"),
            ProfileFields {
                handle: Some("jdoe".into()),
                status: Some("Developer".into()),
                ..Default::default()
            },
        )
    }

    fn post() -> Post {
        Post::new(
            &author("u1"),
            NewPost {
                text: "Hello from the feed".to_string(),
            },
        )
    }

    #[test]
    fn add_experience_prepends_with_generated_id() {
        let mut profile = profile();
        profile.add_experience(experience("first"));
        let second_id = profile.add_experience(experience("second")).id.clone();

        assert_eq!(profile.experience.len(), 2);
        assert_eq!(profile.experience[0].title, "second");
        assert_eq!(profile.experience[0].id, second_id);
        assert_eq!(profile.experience[1].title, "first");
        assert_ne!(profile.experience[0].id, profile.experience[1].id);
    }

    #[test]
    fn add_experience_is_not_idempotent() {
        let mut profile = profile();
        profile.add_experience(experience("same"));
        profile.add_experience(experience("same"));
        assert_eq!(profile.experience.len(), 2);
    }

    #[test]
    fn remove_unknown_experience_reports_no_change() {
        let mut profile = profile();
        profile.add_experience(experience("a"));
        let before = profile.experience.clone();

        assert!(!profile.remove_experience(&ItemId::new("missing")));
        assert_eq!(profile.experience, before);
    }

    #[test]
    fn remove_education_keeps_order_of_the_rest() {
        let mut profile = profile();
        profile.add_education(education("c"));
        let middle = profile.add_education(education("b")).id.clone();
        profile.add_education(education("a"));

        assert!(profile.remove_education(&middle));
        let schools: Vec<_> = profile.education.iter().map(|e| e.school.as_str()).collect();
        assert_eq!(schools, vec!["a", "c"]);
    }

    #[test]
    fn remove_by_id_drops_every_match() {
        let mut profile = profile();
        profile.add_experience(experience("x"));
        let id = profile.experience[0].id.clone();
        let duplicate = profile.experience[0].clone();
        profile.experience.push(duplicate);

        assert!(profile.remove_experience(&id));
        assert!(profile.experience.is_empty());
    }

    #[test]
    fn apply_fields_only_overwrites_provided_values() {
        let mut profile = profile();
        profile.company = Some("Old Co".into());
        profile.skills = vec!["rust".into()];
        profile.add_experience(experience("kept"));

        profile.apply_fields(ProfileFields {
            location: Some("Berlin".into()),
            social: SocialLinks {
                twitter: Some("https://twitter.com/jdoe".into()),
                ..Default::default()
            },
            ..Default::default()
        });

        assert_eq!(profile.handle, "jdoe");
        assert_eq!(profile.company.as_deref(), Some("Old Co"));
        assert_eq!(profile.location.as_deref(), Some("Berlin"));
        assert_eq!(profile.skills, vec!["rust"]);
        assert_eq!(
            profile.social.twitter.as_deref(),
            Some("https://twitter.com/jdoe")
        );
        assert_eq!(profile.experience.len(), 1);
    }

    #[test]
    fn like_is_recorded_once_per_user() {
        let mut post = post();
        assert!(post.add_like(UserId::new("u2")));
        assert!(!post.add_like(UserId::new("u2")));
        assert!(post.add_like(UserId::new("u3")));

        assert_eq!(post.likes.len(), 2);
        assert_eq!(post.likes[0].user, UserId::new("u2"));
        assert!(post.is_liked_by(&UserId::new("u3")));
    }

    #[test]
    fn unlike_without_like_reports_no_change() {
        let mut post = post();
        post.add_like(UserId::new("u2"));

        assert!(!post.remove_like(&UserId::new("u3")));
        assert!(post.remove_like(&UserId::new("u2")));
        assert!(post.likes.is_empty());
    }

    #[test]
    fn comments_are_newest_first() {
        let mut post = post();
        post.add_comment(NewComment::by(&author("u2"), "first comment here"));
        let newest = post
            .add_comment(NewComment::by(&author("u3"), "second comment here"))
            .id
            .clone();

        assert_eq!(post.comments[0].id, newest);
        assert_eq!(post.comments[0].name, "user u3");
        assert!(post.remove_comment(&newest));
        assert!(!post.remove_comment(&newest));
        assert_eq!(post.comments.len(), 1);
    }

    proptest! {
        /// Property: insert-front puts the new item first and grows by one
        #[test]
        fn insert_front_grows_by_one(titles in prop::collection::vec("[a-z]{1,8}", 0..20), new_title in "[a-z]{1,8}") {
            let mut profile = profile();
            for title in &titles {
                profile.add_experience(experience(title));
            }
            let before: Vec<_> = profile.experience.iter().map(|e| e.id.clone()).collect();

            let inserted = profile.add_experience(experience(&new_title)).clone();

            prop_assert_eq!(profile.experience.len(), before.len() + 1);
            prop_assert_eq!(&profile.experience[0], &inserted);
            let after: Vec<_> = profile.experience[1..].iter().map(|e| e.id.clone()).collect();
            prop_assert_eq!(after, before);
        }

        /// Property: removing one existing id shrinks by one and keeps order
        #[test]
        fn remove_existing_shrinks_by_one(count in 1usize..20, pick in any::<prop::sample::Index>()) {
            let mut profile = profile();
            for i in 0..count {
                profile.add_education(education(&format!("school {}", i)));
            }
            let target = pick.index(count);
            let id = profile.education[target].id.clone();
            let mut expected: Vec<_> = profile.education.iter().map(|e| e.id.clone()).collect();
            expected.remove(target);

            prop_assert!(profile.remove_education(&id));
            let remaining: Vec<_> = profile.education.iter().map(|e| e.id.clone()).collect();
            prop_assert_eq!(remaining, expected);
        }

        /// Property: removing an unknown id never changes the collection
        #[test]
        fn remove_unknown_is_noop(count in 0usize..20, unknown in "[a-z]{1,12}") {
            let mut profile = profile();
            for i in 0..count {
                profile.add_experience(experience(&format!("job {}", i)));
            }
            let before = profile.experience.clone();

            prop_assert!(!profile.remove_experience(&ItemId::new(unknown)));
            prop_assert_eq!(profile.experience, before);
        }
    }
}
