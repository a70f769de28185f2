//! Fault injection for store operations
//!
//! Each store operation checks a named fault point before touching its
//! tables. When the point is armed the operation fails with
//! `StoreError::Unavailable`, as a dropped database connection would.
//!
//! Points are armed per store instance so concurrent tests stay isolated.
//!
//! ```ignore
//! store.faults().arm(points::POST_CREATE);
//! ```

use std::collections::HashSet;
use std::sync::RwLock;

use super::errors::{StoreError, StoreResult};

/// Armed fault points of one store
#[derive(Debug, Default)]
pub struct FaultPoints {
    armed: RwLock<HashSet<String>>,
}

impl FaultPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `name` fail
    pub fn arm(&self, name: &str) {
        if let Ok(mut armed) = self.armed.write() {
            armed.insert(name.to_string());
        }
    }

    /// Disarm a single point
    pub fn disarm(&self, name: &str) {
        if let Ok(mut armed) = self.armed.write() {
            armed.remove(name);
        }
    }

    /// Check if a specific point is armed
    pub fn is_armed(&self, name: &str) -> bool {
        self.armed
            .read()
            .map(|armed| armed.contains(name))
            .unwrap_or(false)
    }

    /// Fail if the named point is armed
    pub fn check(&self, name: &str) -> StoreResult<()> {
        if self.is_armed(name) {
            return Err(StoreError::unavailable(format!("fault injected at {}", name)));
        }
        Ok(())
    }
}

/// All defined fault point names, one per store operation
pub mod points {
    pub const USER_FIND_ONE: &str = "user.findOne";
    pub const POST_CATEGORY_FIND_ONE: &str = "postCategory.findOne";
    pub const POST_FIND_ONE: &str = "post.findOne";
    pub const POST_CREATE: &str = "post.create";
    pub const POST_FIND_ALL: &str = "post.findAll";
    pub const COMMUNITY_POST_CREATE: &str = "communityPost.create";
    pub const COMMUNITY_POST_FIND_ALL: &str = "communityPost.findAll";
    pub const RATING_CREATE: &str = "rating.create";
    pub const ENGAGEMENT_CREATE: &str = "engagement.create";
    pub const REPLY_CREATE: &str = "reply.create";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_point_passes() {
        let faults = FaultPoints::new();
        assert!(faults.check(points::POST_CREATE).is_ok());
    }

    #[test]
    fn test_armed_point_fails_until_disarmed() {
        let faults = FaultPoints::new();
        faults.arm(points::POST_CREATE);

        assert!(matches!(
            faults.check(points::POST_CREATE),
            Err(StoreError::Unavailable(_))
        ));
        assert!(faults.check(points::POST_FIND_ALL).is_ok());

        faults.disarm(points::POST_CREATE);
        assert!(faults.check(points::POST_CREATE).is_ok());
    }
}
