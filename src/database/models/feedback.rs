use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::advisor::PerformanceEntry;

/// Customer rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Some(Rating(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating {} outside {}..={}", value, Self::MIN, Self::MAX))
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

/// A validated feedback submission for one advisor.
///
/// Submissions are stored as performance entries on the advisor record;
/// `customer_name` is accepted and logged but not persisted there.
#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub advisor_id: Uuid,
    pub customer_name: Option<String>,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(advisor_id: Uuid, rating: Rating, comment: Option<String>, customer_name: Option<String>) -> Self {
        Self {
            advisor_id,
            customer_name: customer_name.filter(|name| !name.trim().is_empty()),
            rating,
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            created_at: Utc::now(),
        }
    }

    pub fn to_entry(&self) -> PerformanceEntry {
        PerformanceEntry {
            date: self.created_at,
            rating: self.rating,
            comments: self.comment.iter().cloned().collect(),
        }
    }
}
