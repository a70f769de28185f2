//! # Timeline Aggregates
//!
//! Row shapes for aggregating reads and the arithmetic behind their computed
//! columns. Each count is taken over its own joined table, so ratings never
//! inflate like counts and vice versa.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::models::{RowId, User};

/// Author projection used by nested replies and community posts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBrief {
    pub id: RowId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<&User> for UserBrief {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Author projection used by personal posts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    #[serde(flatten)]
    pub brief: UserBrief,
    pub school_name: Option<String>,
}

impl From<&User> for PostAuthor {
    fn from(user: &User) -> Self {
        Self {
            brief: UserBrief::from(user),
            school_name: user.school_name.clone(),
        }
    }
}

/// Reply as nested under a timeline row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplySummary {
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<UserBrief>,
}

/// Personal post with its computed columns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: RowId,
    pub message: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub rounded_rating: Option<f64>,
    pub rating_count: u64,
    pub like_count: u64,
    pub pageview_count: u64,
    pub share_count: u64,
    pub user: Option<PostAuthor>,
    pub post_reply: Vec<ReplySummary>,
}

/// Community post with its computed columns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPostSummary {
    pub id: RowId,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub rounded_rating: Option<f64>,
    pub rating_count: u64,
    pub like_count: u64,
    pub pageview_count: u64,
    pub user: Option<UserBrief>,
    pub post_reply: Vec<ReplySummary>,
}

/// One row of the merged timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TimelineEntry {
    Post(PostSummary),
    CommunityPost(CommunityPostSummary),
}

impl TimelineEntry {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            TimelineEntry::Post(p) => p.created_at,
            TimelineEntry::CommunityPost(p) => p.created_at,
        }
    }
}

/// Filter and page for an aggregating timeline read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineQuery {
    pub user_id: RowId,
    pub offset: usize,
    pub limit: usize,
}

/// Rounds half away from zero to `places` decimals, like SQL `ROUND`
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `ROUND(AVG(rating), 2)` and `COUNT(rating)` over one post's ratings.
/// The average is `None` when there are no ratings.
pub fn rating_stats<I>(ratings: I) -> (Option<f64>, u64)
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0_f64, 0_u64), |(sum, count), r| (sum + r, count + 1));

    if count == 0 {
        (None, 0)
    } else {
        (Some(round_to(sum / count as f64, 2)), count)
    }
}

/// Newest first; ties broken by the higher id so paging is deterministic
pub fn newest_first(
    a_created: DateTime<Utc>,
    a_id: RowId,
    b_created: DateTime<Utc>,
    b_id: RowId,
) -> Ordering {
    b_created.cmp(&a_created).then_with(|| b_id.cmp(&a_id))
}

/// Concatenates personal and community rows, then re-sorts the whole list
/// by creation time descending. The sort is stable, so rows with equal
/// timestamps keep personal-before-community order.
pub fn merge_timeline(
    posts: Vec<PostSummary>,
    community_posts: Vec<CommunityPostSummary>,
) -> Vec<TimelineEntry> {
    let mut merged: Vec<TimelineEntry> = posts
        .into_iter()
        .map(TimelineEntry::Post)
        .chain(community_posts.into_iter().map(TimelineEntry::CommunityPost))
        .collect();

    merged.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn post(id: RowId, created: i64) -> PostSummary {
        PostSummary {
            id,
            message: None,
            title: None,
            created_at: at(created),
            rounded_rating: None,
            rating_count: 0,
            like_count: 0,
            pageview_count: 0,
            share_count: 0,
            user: None,
            post_reply: Vec::new(),
        }
    }

    fn community(id: RowId, created: i64) -> CommunityPostSummary {
        CommunityPostSummary {
            id,
            message: None,
            created_at: at(created),
            rounded_rating: None,
            rating_count: 0,
            like_count: 0,
            pageview_count: 0,
            user: None,
            post_reply: Vec::new(),
        }
    }

    #[test]
    fn test_rating_average_rounds_to_two_places() {
        let (avg, count) = rating_stats([2.0, 4.0, 5.0]);
        assert_eq!(avg, Some(3.67));
        assert_eq!(count, 3);
    }

    #[test]
    fn test_no_ratings_has_no_average() {
        let (avg, count) = rating_stats(Vec::<f64>::new());
        assert_eq!(avg, None);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.234, 2), 1.23);
    }

    #[test]
    fn test_merge_orders_across_sources() {
        let merged = merge_timeline(vec![post(1, 300), post(2, 100)], vec![community(9, 200)]);

        let stamps: Vec<i64> = merged.iter().map(|e| e.created_at().timestamp()).collect();
        assert_eq!(stamps, vec![300, 200, 100]);
        assert!(matches!(merged[1], TimelineEntry::CommunityPost(_)));
    }

    #[test]
    fn test_merge_is_stable_on_equal_timestamps() {
        let merged = merge_timeline(vec![post(1, 100)], vec![community(2, 100)]);
        assert!(matches!(merged[0], TimelineEntry::Post(_)));
        assert!(matches!(merged[1], TimelineEntry::CommunityPost(_)));
    }

    #[test]
    fn test_newest_first_breaks_ties_by_id() {
        assert_eq!(newest_first(at(5), 1, at(5), 2), Ordering::Greater);
        assert_eq!(newest_first(at(6), 1, at(5), 2), Ordering::Less);
    }

    #[test]
    fn test_post_author_flattens_brief() {
        let user = User::new(4).with_name("Ada", "Lovelace");
        let value = serde_json::to_value(PostAuthor::from(&user)).unwrap();
        assert_eq!(value["id"], 4);
        assert_eq!(value["firstName"], "Ada");
        assert!(value.get("schoolName").is_some());
    }
}
