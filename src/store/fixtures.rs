//! Seed data for the in-memory store
//!
//! A fixtures file is a single JSON object whose keys name tables. Every key
//! is optional; rows use the same camelCase columns the API returns.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::errors::StoreResult;
use super::models::{
    Community, CommunityPost, Engagement, EventPost, Post, PostCategory, Rating, Reply, User,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub post_categories: Vec<PostCategory>,
    pub communities: Vec<Community>,
    pub posts: Vec<Post>,
    pub community_posts: Vec<CommunityPost>,
    pub event_posts: Vec<EventPost>,
    pub ratings: Vec<Rating>,
    pub likes: Vec<Engagement>,
    pub pageviews: Vec<Engagement>,
    pub replies: Vec<Reply>,
}

impl Fixtures {
    /// Load fixtures from a JSON file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path)?;
        let fixtures = serde_json::from_str(&content)?;
        Ok(fixtures)
    }
}
