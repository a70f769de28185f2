//! Request Context
//!
//! Context carried through the handler pipeline. Stages read what earlier
//! stages resolved and attach what later stages need.

use std::time::Instant;

use uuid::Uuid;

use crate::store::{
    CommunityPost, CommunityPostSummary, Engagement, Post, PostCategory, PostSummary, Rating,
    Reply, RowId, User,
};

/// Context carried through the handler pipeline
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for log correlation
    pub request_id: Uuid,

    /// Endpoint name, used in log tags (e.g. `post-post`)
    pub operation: &'static str,

    /// Values resolved by earlier stages
    pub scope: Scope,

    /// Start time for duration tracking
    started_at: Instant,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(operation: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            operation,
            scope: Scope::default(),
            started_at: Instant::now(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// Id of the authenticated caller, once the auth gate has run
    pub fn user_id(&self) -> Option<RowId> {
        self.scope.user.as_ref().map(|u| u.id)
    }

    /// Attach a caller directly, bypassing the auth gate (tests, tooling)
    pub fn with_user(mut self, user: User) -> Self {
        self.scope.user = Some(user);
        self
    }
}

/// Per-request values shared between stages
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Authenticated caller
    pub user: Option<User>,

    /// Category referenced by a new post; absent when the id matched nothing
    pub post_category: Option<PostCategory>,

    /// Source post of a share; absent when the id matched nothing
    pub shared_post: Option<Post>,

    /// Profile requested by id
    pub profile: Option<User>,

    /// Row inserted by a create stage
    pub created: Option<Created>,

    /// Personal timeline rows
    pub posts: Vec<PostSummary>,

    /// Community timeline rows
    pub community_posts: Vec<CommunityPostSummary>,
}

/// Row produced by a create stage
#[derive(Debug, Clone)]
pub enum Created {
    Post(Post),
    CommunityPost(CommunityPost),
    Rating(Rating),
    Engagement(Engagement),
    Reply(Reply),
}
