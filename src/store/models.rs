//! # Data Model
//!
//! Rows of the relational tables behind the platform. Every row carries an
//! integer surrogate key and a created/updated timestamp pair. Field names
//! serialize in camelCase, matching the column names clients already see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate primary key
pub type RowId = i64;

fn default_profile_picture() -> String {
    "avatar".to_string()
}

fn default_true() -> bool {
    true
}

/// Platform user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RowId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Password hash, never serialized back out
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub about_me: Option<String>,
    #[serde(default)]
    pub accomplishments: Option<String>,
    #[serde(default)]
    pub is_suspended: bool,
    /// Used by local sign-up
    #[serde(default = "default_profile_picture")]
    pub profile_picture: String,
    /// Used by social sign-up
    #[serde(default)]
    pub social_image: Option<String>,
    /// Direct messages restricted
    #[serde(default)]
    pub profile_privacy: bool,
    #[serde(default = "default_true")]
    pub protect_post: bool,
    #[serde(default)]
    pub facebook_id: Option<String>,
    #[serde(default)]
    pub linkedin_id: Option<String>,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub year_of_incorporation: Option<DateTime<Utc>>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub user_type_id: Option<RowId>,
    #[serde(default)]
    pub user_privacy_id: Option<RowId>,
    #[serde(default)]
    pub campus_id: Option<RowId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Minimal user with the given id, everything else defaulted
    pub fn new(id: RowId) -> Self {
        let now = Utc::now();
        Self {
            id,
            first_name: None,
            last_name: None,
            password: None,
            email: None,
            language: None,
            about_me: None,
            accomplishments: None,
            is_suspended: false,
            profile_picture: default_profile_picture(),
            social_image: None,
            profile_privacy: false,
            protect_post: true,
            facebook_id: None,
            linkedin_id: None,
            google_id: None,
            school_name: None,
            birth_date: None,
            city: None,
            gender: None,
            role: None,
            company: None,
            institution_name: None,
            year_of_incorporation: None,
            website: None,
            user_type_id: None,
            user_privacy_id: None,
            campus_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Public profile projection: no credentials, no social-login ids
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: RowId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub language: Option<String>,
    pub about_me: Option<String>,
    pub accomplishments: Option<String>,
    pub profile_picture: String,
    pub social_image: Option<String>,
    pub school_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub institution_name: Option<String>,
    pub year_of_incorporation: Option<DateTime<Utc>>,
    pub website: Option<String>,
    pub campus_id: Option<RowId>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            language: user.language.clone(),
            about_me: user.about_me.clone(),
            accomplishments: user.accomplishments.clone(),
            profile_picture: user.profile_picture.clone(),
            social_image: user.social_image.clone(),
            school_name: user.school_name.clone(),
            birth_date: user.birth_date,
            city: user.city.clone(),
            gender: user.gender.clone(),
            role: user.role.clone(),
            company: user.company.clone(),
            institution_name: user.institution_name.clone(),
            year_of_incorporation: user.year_of_incorporation,
            website: user.website.clone(),
            campus_id: user.campus_id,
            created_at: user.created_at,
        }
    }
}

/// Category of a personal post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCategory {
    pub id: RowId,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Category code that makes `title` mandatory
pub const STORY_CATEGORY_CODE: &str = "story";

impl PostCategory {
    pub fn is_story(&self) -> bool {
        self.code == STORY_CATEGORY_CODE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: RowId,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Personal post. A post with `share_post_id` is a share of another post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: RowId,
    pub user_id: RowId,
    #[serde(default)]
    pub post_category_id: Option<RowId>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Addressee, direct-message style
    #[serde(default)]
    pub post_to: Option<RowId>,
    #[serde(default)]
    pub share_post_id: Option<RowId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Post inside a community, or a personal community post when
/// `community_id` is absent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: RowId,
    pub user_id: RowId,
    #[serde(default)]
    pub community_id: Option<RowId>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPost {
    pub id: RowId,
    pub user_id: RowId,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Which post table an engagement row points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostKind {
    Post,
    CommunityPost,
    EventPost,
}

impl PostKind {
    /// Table name prefix, e.g. `communityPost`
    pub fn table(&self) -> &'static str {
        match self {
            PostKind::Post => "post",
            PostKind::CommunityPost => "communityPost",
            PostKind::EventPost => "eventPost",
        }
    }

    /// Route parameter carrying the target id, e.g. `eventPostId`
    pub fn id_param(&self) -> &'static str {
        match self {
            PostKind::Post => "postId",
            PostKind::CommunityPost => "communityPostId",
            PostKind::EventPost => "eventPostId",
        }
    }

    /// Route segment, e.g. `event-post`
    pub fn route_segment(&self) -> &'static str {
        match self {
            PostKind::Post => "post",
            PostKind::CommunityPost => "community-post",
            PostKind::EventPost => "event-post",
        }
    }

    /// Human readable name used in validation messages
    pub fn label(&self) -> &'static str {
        match self {
            PostKind::Post => "Post",
            PostKind::CommunityPost => "Community Post",
            PostKind::EventPost => "Event Post",
        }
    }
}

/// One rating event (postRating, communityPostRating, eventPostRating)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RowId,
    pub kind: PostKind,
    pub post_id: RowId,
    pub user_id: RowId,
    pub rating: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Like or pageview event row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub id: RowId,
    pub kind: PostKind,
    pub post_id: RowId,
    pub user_id: RowId,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Flavour of an engagement row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementKind {
    Like,
    Pageview,
}

impl EngagementKind {
    /// Table suffix, e.g. `Like` in `postLike`
    pub fn suffix(&self) -> &'static str {
        match self {
            EngagementKind::Like => "Like",
            EngagementKind::Pageview => "Pageview",
        }
    }
}

/// Threaded reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: RowId,
    pub kind: PostKind,
    pub post_id: RowId,
    pub user_id: RowId,
    pub comment: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

// ==================
// Insert payloads
// ==================

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub user_id: RowId,
    pub post_category_id: Option<RowId>,
    pub message: Option<String>,
    pub title: Option<String>,
    pub post_to: Option<RowId>,
    pub share_post_id: Option<RowId>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCommunityPost {
    pub user_id: RowId,
    pub community_id: Option<RowId>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
    pub kind: PostKind,
    pub post_id: RowId,
    pub user_id: RowId,
    pub rating: f64,
}

#[derive(Debug, Clone)]
pub struct NewEngagement {
    pub kind: PostKind,
    pub post_id: RowId,
    pub user_id: RowId,
}

#[derive(Debug, Clone)]
pub struct NewReply {
    pub kind: PostKind,
    pub post_id: RowId,
    pub user_id: RowId,
    pub comment: String,
}
