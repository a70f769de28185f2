//! In-memory store
//!
//! Tables live behind a single `RwLock`. Inserts take the write lock for
//! exactly one row, so every create is isolated but nothing spans writes.

use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::aggregate::{
    newest_first, rating_stats, CommunityPostSummary, PostAuthor, PostSummary, ReplySummary,
    TimelineQuery, UserBrief,
};
use super::errors::{StoreError, StoreResult};
use super::fault::{points, FaultPoints};
use super::fixtures::Fixtures;
use super::models::{
    Community, CommunityPost, Engagement, EngagementKind, EventPost, NewCommunityPost,
    NewEngagement, NewPost, NewRating, NewReply, Post, PostCategory, PostKind, Rating, Reply,
    RowId, User,
};
use super::Store;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    post_categories: Vec<PostCategory>,
    communities: Vec<Community>,
    posts: Vec<Post>,
    community_posts: Vec<CommunityPost>,
    event_posts: Vec<EventPost>,
    ratings: Vec<Rating>,
    likes: Vec<Engagement>,
    pageviews: Vec<Engagement>,
    replies: Vec<Reply>,
}

/// Next auto-increment value for a table
fn next_id(ids: impl Iterator<Item = RowId>) -> RowId {
    ids.max().unwrap_or(0) + 1
}

fn ensure_unique(table: &'static str, ids: impl Iterator<Item = RowId>) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::DuplicateKey { table, id });
        }
    }
    Ok(())
}

impl Tables {
    fn user(&self, id: RowId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn post_exists(&self, kind: PostKind, id: RowId) -> bool {
        match kind {
            PostKind::Post => self.posts.iter().any(|p| p.id == id),
            PostKind::CommunityPost => self.community_posts.iter().any(|p| p.id == id),
            PostKind::EventPost => self.event_posts.iter().any(|p| p.id == id),
        }
    }

    fn require_user(&self, table: &'static str, column: &'static str, id: RowId) -> StoreResult<()> {
        if self.user(id).is_none() {
            return Err(StoreError::ForeignKey {
                table,
                column,
                value: id,
            });
        }
        Ok(())
    }

    fn require_post(&self, table: &'static str, kind: PostKind, id: RowId) -> StoreResult<()> {
        if !self.post_exists(kind, id) {
            let column = match kind {
                PostKind::Post => "postId",
                PostKind::CommunityPost => "communityPostId",
                PostKind::EventPost => "eventPostId",
            };
            return Err(StoreError::ForeignKey {
                table,
                column,
                value: id,
            });
        }
        Ok(())
    }

    fn engagements(&self, kind: EngagementKind) -> &Vec<Engagement> {
        match kind {
            EngagementKind::Like => &self.likes,
            EngagementKind::Pageview => &self.pageviews,
        }
    }

    fn engagements_mut(&mut self, kind: EngagementKind) -> &mut Vec<Engagement> {
        match kind {
            EngagementKind::Like => &mut self.likes,
            EngagementKind::Pageview => &mut self.pageviews,
        }
    }

    fn count_engagements(&self, engagement: EngagementKind, kind: PostKind, id: RowId) -> u64 {
        self.engagements(engagement)
            .iter()
            .filter(|e| e.kind == kind && e.post_id == id)
            .count() as u64
    }

    fn ratings_for(&self, kind: PostKind, id: RowId) -> (Option<f64>, u64) {
        rating_stats(
            self.ratings
                .iter()
                .filter(|r| r.kind == kind && r.post_id == id)
                .map(|r| r.rating),
        )
    }

    fn replies_for(&self, kind: PostKind, id: RowId) -> Vec<ReplySummary> {
        let mut replies: Vec<&Reply> = self
            .replies
            .iter()
            .filter(|r| r.kind == kind && r.post_id == id)
            .collect();
        replies.sort_by_key(|r| r.id);

        replies
            .into_iter()
            .map(|r| ReplySummary {
                comment: r.comment.clone(),
                created_at: r.created_at,
                user: self.user(r.user_id).map(UserBrief::from),
            })
            .collect()
    }

    fn summarize_post(&self, post: &Post) -> PostSummary {
        let (rounded_rating, rating_count) = self.ratings_for(PostKind::Post, post.id);
        PostSummary {
            id: post.id,
            message: post.message.clone(),
            title: post.title.clone(),
            created_at: post.created_at,
            rounded_rating,
            rating_count,
            like_count: self.count_engagements(EngagementKind::Like, PostKind::Post, post.id),
            pageview_count: self.count_engagements(
                EngagementKind::Pageview,
                PostKind::Post,
                post.id,
            ),
            share_count: self
                .posts
                .iter()
                .filter(|p| p.share_post_id == Some(post.id))
                .count() as u64,
            user: self.user(post.user_id).map(PostAuthor::from),
            post_reply: self.replies_for(PostKind::Post, post.id),
        }
    }

    fn summarize_community_post(&self, post: &CommunityPost) -> CommunityPostSummary {
        let kind = PostKind::CommunityPost;
        let (rounded_rating, rating_count) = self.ratings_for(kind, post.id);
        CommunityPostSummary {
            id: post.id,
            message: post.message.clone(),
            created_at: post.created_at,
            rounded_rating,
            rating_count,
            like_count: self.count_engagements(EngagementKind::Like, kind, post.id),
            pageview_count: self.count_engagements(EngagementKind::Pageview, kind, post.id),
            user: self.user(post.user_id).map(UserBrief::from),
            post_reply: self.replies_for(kind, post.id),
        }
    }
}

/// Process-local store backed by plain vectors
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    faults: FaultPoints,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with fixtures. Primary keys must be unique per
    /// table; references are not checked for seed rows.
    pub fn from_fixtures(fixtures: Fixtures) -> StoreResult<Self> {
        ensure_unique("user", fixtures.users.iter().map(|r| r.id))?;
        ensure_unique("postCategory", fixtures.post_categories.iter().map(|r| r.id))?;
        ensure_unique("community", fixtures.communities.iter().map(|r| r.id))?;
        ensure_unique("post", fixtures.posts.iter().map(|r| r.id))?;
        ensure_unique("communityPost", fixtures.community_posts.iter().map(|r| r.id))?;
        ensure_unique("eventPost", fixtures.event_posts.iter().map(|r| r.id))?;

        let tables = Tables {
            users: fixtures.users,
            post_categories: fixtures.post_categories,
            communities: fixtures.communities,
            posts: fixtures.posts,
            community_posts: fixtures.community_posts,
            event_posts: fixtures.event_posts,
            ratings: fixtures.ratings,
            likes: fixtures.likes,
            pageviews: fixtures.pageviews,
            replies: fixtures.replies,
        };

        Ok(Self {
            tables: RwLock::new(tables),
            faults: FaultPoints::new(),
        })
    }

    /// Fault points of this store
    pub fn faults(&self) -> &FaultPoints {
        &self.faults
    }

    /// Number of personal posts (shares included)
    pub fn post_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.posts.len())
    }

    /// Number of rating rows for one post kind
    pub fn rating_count(&self, kind: PostKind) -> StoreResult<usize> {
        Ok(self.read()?.ratings.iter().filter(|r| r.kind == kind).count())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::unavailable("tables lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::unavailable("tables lock poisoned"))
    }
}

impl Store for MemoryStore {
    fn find_user(&self, id: RowId) -> StoreResult<Option<User>> {
        self.faults.check(points::USER_FIND_ONE)?;
        Ok(self.read()?.user(id).cloned())
    }

    fn find_post_category(&self, id: RowId) -> StoreResult<Option<PostCategory>> {
        self.faults.check(points::POST_CATEGORY_FIND_ONE)?;
        let tables = self.read()?;
        Ok(tables.post_categories.iter().find(|c| c.id == id).cloned())
    }

    fn find_post(&self, id: RowId) -> StoreResult<Option<Post>> {
        self.faults.check(points::POST_FIND_ONE)?;
        Ok(self.read()?.posts.iter().find(|p| p.id == id).cloned())
    }

    fn create_post(&self, new: NewPost) -> StoreResult<Post> {
        self.faults.check(points::POST_CREATE)?;
        let mut tables = self.write()?;

        tables.require_user("post", "userId", new.user_id)?;
        if let Some(category_id) = new.post_category_id {
            if !tables.post_categories.iter().any(|c| c.id == category_id) {
                return Err(StoreError::ForeignKey {
                    table: "post",
                    column: "postCategoryId",
                    value: category_id,
                });
            }
        }
        if let Some(post_to) = new.post_to {
            tables.require_user("post", "postTo", post_to)?;
        }
        if let Some(share_post_id) = new.share_post_id {
            if !tables.post_exists(PostKind::Post, share_post_id) {
                return Err(StoreError::ForeignKey {
                    table: "post",
                    column: "sharePostId",
                    value: share_post_id,
                });
            }
        }

        let now = Utc::now();
        let post = Post {
            id: next_id(tables.posts.iter().map(|p| p.id)),
            user_id: new.user_id,
            post_category_id: new.post_category_id,
            message: new.message,
            title: new.title,
            post_to: new.post_to,
            share_post_id: new.share_post_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    fn create_community_post(&self, new: NewCommunityPost) -> StoreResult<CommunityPost> {
        self.faults.check(points::COMMUNITY_POST_CREATE)?;
        let mut tables = self.write()?;

        tables.require_user("communityPost", "userId", new.user_id)?;
        if let Some(community_id) = new.community_id {
            if !tables.communities.iter().any(|c| c.id == community_id) {
                return Err(StoreError::ForeignKey {
                    table: "communityPost",
                    column: "communityId",
                    value: community_id,
                });
            }
        }

        let now = Utc::now();
        let post = CommunityPost {
            id: next_id(tables.community_posts.iter().map(|p| p.id)),
            user_id: new.user_id,
            community_id: new.community_id,
            message: new.message,
            created_at: now,
            updated_at: now,
        };
        tables.community_posts.push(post.clone());
        Ok(post)
    }

    fn create_rating(&self, new: NewRating) -> StoreResult<Rating> {
        self.faults.check(points::RATING_CREATE)?;
        let mut tables = self.write()?;

        tables.require_post("rating", new.kind, new.post_id)?;
        tables.require_user("rating", "userId", new.user_id)?;

        let now = Utc::now();
        let rating = Rating {
            id: next_id(
                tables
                    .ratings
                    .iter()
                    .filter(|r| r.kind == new.kind)
                    .map(|r| r.id),
            ),
            kind: new.kind,
            post_id: new.post_id,
            user_id: new.user_id,
            rating: new.rating,
            created_at: now,
            updated_at: now,
        };
        tables.ratings.push(rating.clone());
        Ok(rating)
    }

    fn create_engagement(
        &self,
        kind: EngagementKind,
        new: NewEngagement,
    ) -> StoreResult<Engagement> {
        self.faults.check(points::ENGAGEMENT_CREATE)?;
        let mut tables = self.write()?;

        tables.require_post("engagement", new.kind, new.post_id)?;
        tables.require_user("engagement", "userId", new.user_id)?;

        let now = Utc::now();
        let rows = tables.engagements_mut(kind);
        let engagement = Engagement {
            id: next_id(rows.iter().filter(|e| e.kind == new.kind).map(|e| e.id)),
            kind: new.kind,
            post_id: new.post_id,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        rows.push(engagement.clone());
        Ok(engagement)
    }

    fn create_reply(&self, new: NewReply) -> StoreResult<Reply> {
        self.faults.check(points::REPLY_CREATE)?;
        let mut tables = self.write()?;

        tables.require_post("reply", new.kind, new.post_id)?;
        tables.require_user("reply", "userId", new.user_id)?;

        let now = Utc::now();
        let reply = Reply {
            id: next_id(
                tables
                    .replies
                    .iter()
                    .filter(|r| r.kind == new.kind)
                    .map(|r| r.id),
            ),
            kind: new.kind,
            post_id: new.post_id,
            user_id: new.user_id,
            comment: new.comment,
            created_at: now,
            updated_at: now,
        };
        tables.replies.push(reply.clone());
        Ok(reply)
    }

    fn list_posts(&self, query: &TimelineQuery) -> StoreResult<Vec<PostSummary>> {
        self.faults.check(points::POST_FIND_ALL)?;
        let tables = self.read()?;

        let mut rows: Vec<&Post> = tables
            .posts
            .iter()
            .filter(|p| p.user_id == query.user_id || p.post_to == Some(query.user_id))
            .collect();
        rows.sort_by(|a, b| newest_first(a.created_at, a.id, b.created_at, b.id));

        Ok(rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|p| tables.summarize_post(p))
            .collect())
    }

    fn list_community_posts(
        &self,
        query: &TimelineQuery,
    ) -> StoreResult<Vec<CommunityPostSummary>> {
        self.faults.check(points::COMMUNITY_POST_FIND_ALL)?;
        let tables = self.read()?;

        let mut rows: Vec<&CommunityPost> = tables
            .community_posts
            .iter()
            .filter(|p| p.community_id.is_none() && p.user_id == query.user_id)
            .collect();
        rows.sort_by(|a, b| newest_first(a.created_at, a.id, b.created_at, b.id));

        Ok(rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|p| tables.summarize_community_post(p))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn post(id: RowId, user_id: RowId, created: i64) -> Post {
        Post {
            id,
            user_id,
            post_category_id: None,
            message: Some(format!("post {}", id)),
            title: None,
            post_to: None,
            share_post_id: None,
            created_at: at(created),
            updated_at: at(created),
        }
    }

    fn seeded() -> MemoryStore {
        MemoryStore::from_fixtures(Fixtures {
            users: vec![
                User::new(1).with_name("Ada", "Lovelace"),
                User::new(2).with_name("Alan", "Turing"),
                User::new(3),
            ],
            post_categories: vec![PostCategory {
                id: 1,
                code: "story".to_string(),
                name: None,
                created_at: at(0),
                updated_at: at(0),
            }],
            posts: vec![post(1, 1, 100), post(2, 1, 300), post(3, 2, 200)],
            ..Fixtures::default()
        })
        .unwrap()
    }

    fn query(user_id: RowId) -> TimelineQuery {
        TimelineQuery {
            user_id,
            offset: 0,
            limit: 10,
        }
    }

    #[test]
    fn test_auto_increment_continues_after_fixtures() {
        let store = seeded();
        let created = store
            .create_post(NewPost {
                user_id: 1,
                message: Some("hello".to_string()),
                ..NewPost::default()
            })
            .unwrap();
        assert_eq!(created.id, 4);
    }

    #[test]
    fn test_duplicate_fixture_keys_rejected() {
        let result = MemoryStore::from_fixtures(Fixtures {
            users: vec![User::new(1), User::new(1)],
            ..Fixtures::default()
        });
        assert!(matches!(
            result,
            Err(StoreError::DuplicateKey { table: "user", id: 1 })
        ));
    }

    #[test]
    fn test_rating_requires_existing_post() {
        let store = seeded();
        let result = store.create_rating(NewRating {
            kind: PostKind::Post,
            post_id: 99,
            user_id: 1,
            rating: 4.0,
        });
        assert!(matches!(result, Err(StoreError::ForeignKey { value: 99, .. })));
        assert_eq!(store.rating_count(PostKind::Post).unwrap(), 0);
    }

    #[test]
    fn test_share_requires_existing_source() {
        let store = seeded();
        let result = store.create_post(NewPost {
            user_id: 1,
            share_post_id: Some(42),
            ..NewPost::default()
        });
        assert!(matches!(
            result,
            Err(StoreError::ForeignKey {
                column: "sharePostId",
                ..
            })
        ));
    }

    #[test]
    fn test_list_posts_includes_addressed_posts() {
        let store = seeded();
        store
            .create_post(NewPost {
                user_id: 2,
                post_to: Some(1),
                ..NewPost::default()
            })
            .unwrap();

        let rows = store.list_posts(&query(1)).unwrap();
        let ids: Vec<RowId> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn test_counts_are_independent() {
        let store = seeded();
        for user_id in [1, 2, 3] {
            store
                .create_engagement(
                    EngagementKind::Like,
                    NewEngagement {
                        kind: PostKind::Post,
                        post_id: 1,
                        user_id,
                    },
                )
                .unwrap();
        }
        for user_id in [1, 2] {
            store
                .create_engagement(
                    EngagementKind::Pageview,
                    NewEngagement {
                        kind: PostKind::Post,
                        post_id: 1,
                        user_id,
                    },
                )
                .unwrap();
        }
        for rating in [2.0, 4.0, 5.0] {
            store
                .create_rating(NewRating {
                    kind: PostKind::Post,
                    post_id: 1,
                    user_id: 2,
                    rating,
                })
                .unwrap();
        }

        let rows = store.list_posts(&query(1)).unwrap();
        let row = rows.iter().find(|r| r.id == 1).unwrap();
        assert_eq!(row.like_count, 3);
        assert_eq!(row.pageview_count, 2);
        assert_eq!(row.rating_count, 3);
        assert_eq!(row.rounded_rating, Some(3.67));
    }

    #[test]
    fn test_share_count_and_replies() {
        let store = seeded();
        store
            .create_post(NewPost {
                user_id: 2,
                share_post_id: Some(2),
                ..NewPost::default()
            })
            .unwrap();
        store
            .create_reply(NewReply {
                kind: PostKind::Post,
                post_id: 2,
                user_id: 2,
                comment: "nice".to_string(),
            })
            .unwrap();

        let rows = store.list_posts(&query(1)).unwrap();
        let row = rows.iter().find(|r| r.id == 2).unwrap();
        assert_eq!(row.share_count, 1);
        assert_eq!(row.post_reply.len(), 1);
        assert_eq!(row.post_reply[0].comment, "nice");
        assert_eq!(row.post_reply[0].user.as_ref().map(|u| u.id), Some(2));
    }

    #[test]
    fn test_community_timeline_skips_community_scoped_posts() {
        let store = MemoryStore::from_fixtures(Fixtures {
            users: vec![User::new(1)],
            communities: vec![Community {
                id: 5,
                name: "chess".to_string(),
                created_at: at(0),
                updated_at: at(0),
            }],
            ..Fixtures::default()
        })
        .unwrap();

        store
            .create_community_post(NewCommunityPost {
                user_id: 1,
                community_id: None,
                message: Some("personal".to_string()),
            })
            .unwrap();
        store
            .create_community_post(NewCommunityPost {
                user_id: 1,
                community_id: Some(5),
                message: Some("in chess".to_string()),
            })
            .unwrap();

        let rows = store.list_community_posts(&query(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message.as_deref(), Some("personal"));
    }

    #[test]
    fn test_offset_and_limit_page_newest_first() {
        let store = seeded();
        let rows = store
            .list_posts(&TimelineQuery {
                user_id: 1,
                offset: 1,
                limit: 1,
            })
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn test_injected_fault_fails_create() {
        let store = seeded();
        store.faults().arm(points::POST_CREATE);
        let result = store.create_post(NewPost {
            user_id: 1,
            ..NewPost::default()
        });
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.post_count().unwrap(), 3);
    }
}
