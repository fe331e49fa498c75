use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::feedback::Rating;
use crate::types::Role;

/// One customer rating appended to an advisor's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub date: DateTime<Utc>,
    pub rating: Rating,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub qr_code: Option<String>,
    pub performance_data: Vec<PerformanceEntry>,
    pub created_at: DateTime<Utc>,
}

impl Advisor {
    pub fn average_rating(&self) -> Option<f64> {
        if self.performance_data.is_empty() {
            return None;
        }
        let total: u32 = self
            .performance_data
            .iter()
            .map(|entry| u32::from(entry.rating.get()))
            .sum();
        Some(f64::from(total) / self.performance_data.len() as f64)
    }

    pub fn summary(&self) -> AdvisorSummary {
        AdvisorSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            qr_code: self.qr_code.clone(),
            feedback_count: self.performance_data.len(),
            average_rating: self.average_rating(),
        }
    }
}

/// Advisor listing row without the performance history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub qr_code: Option<String>,
    pub feedback_count: usize,
    pub average_rating: Option<f64>,
}

/// Fields required to create an advisor; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAdvisor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewAdvisor {
    pub fn into_advisor(self, id: Uuid) -> Advisor {
        Advisor {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            qr_code: None,
            performance_data: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
