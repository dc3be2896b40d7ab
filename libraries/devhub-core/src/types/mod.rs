mod ids;
mod input;
mod post;
mod profile;
mod user;

pub use ids::{ItemId, PostId, ProfileId, UserId};
pub use input::{
    EducationInput, ExperienceInput, LoginInput, ProfileInput, RegisterInput, TextInput,
};
pub use post::{Comment, Like, NewComment, NewPost, Post};
pub use profile::{
    Education, Experience, NewEducation, NewExperience, PopulatedProfile, Profile, ProfileFields,
    SocialLinks,
};
pub use user::{gravatar_url, CreateUser, User, UserCredentials, UserSummary};
