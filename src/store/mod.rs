//! # Data Access Layer
//!
//! The handlers talk to the database only through [`Store`]: primary-key
//! lookups, single-row inserts and the two aggregating timeline reads.
//! [`MemoryStore`] keeps the tables in process and reproduces the relational
//! behaviour the handlers depend on (auto-increment keys, foreign keys,
//! grouped aggregates).

pub mod aggregate;
pub mod errors;
pub mod fault;
pub mod fixtures;
pub mod memory;
pub mod models;

pub use aggregate::{
    merge_timeline, CommunityPostSummary, PostSummary, TimelineEntry, TimelineQuery,
};
pub use errors::{StoreError, StoreResult};
pub use fixtures::Fixtures;
pub use memory::MemoryStore;
pub use models::{
    CommunityPost, Engagement, EngagementKind, EventPost, NewCommunityPost, NewEngagement,
    NewPost, NewRating, NewReply, Post, PostCategory, PostKind, Rating, Reply, RowId, User,
    UserProfile,
};

/// Database operations used by the handler pipelines
pub trait Store: Send + Sync {
    /// Find a user by primary key
    fn find_user(&self, id: RowId) -> StoreResult<Option<User>>;

    /// Find a post category by primary key
    fn find_post_category(&self, id: RowId) -> StoreResult<Option<PostCategory>>;

    /// Find a personal post by primary key
    fn find_post(&self, id: RowId) -> StoreResult<Option<Post>>;

    /// Insert a personal post (or a share when `share_post_id` is set)
    fn create_post(&self, new: NewPost) -> StoreResult<Post>;

    /// Insert a community post
    fn create_community_post(&self, new: NewCommunityPost) -> StoreResult<CommunityPost>;

    /// Insert a rating row for any post kind
    fn create_rating(&self, new: NewRating) -> StoreResult<Rating>;

    /// Insert a like or pageview row
    fn create_engagement(&self, kind: EngagementKind, new: NewEngagement)
        -> StoreResult<Engagement>;

    /// Insert a reply
    fn create_reply(&self, new: NewReply) -> StoreResult<Reply>;

    /// Posts authored by or addressed to the user, with aggregates
    fn list_posts(&self, query: &TimelineQuery) -> StoreResult<Vec<PostSummary>>;

    /// Personal community posts authored by the user, with aggregates
    fn list_community_posts(&self, query: &TimelineQuery)
        -> StoreResult<Vec<CommunityPostSummary>>;
}
