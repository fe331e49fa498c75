use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::models::feedback::{Feedback, Rating};
use crate::store::{AdvisorStore, StoreError};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Advisor ID and rating are required")]
    MissingFields,
    #[error("Invalid Advisor ID format")]
    InvalidAdvisorId,
    #[error("Advisor not found")]
    AdvisorNotFound,
    #[error("Rating is required and must be between 1 and 5")]
    InvalidRating,
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

/// Rating as submitted: form fields arrive as text, JSON clients may send a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    Number(i64),
    Text(String),
}

impl RawRating {
    /// Whole numbers only; "4.5", "4 stars" and "" are rejected
    pub fn parse(&self) -> Option<Rating> {
        match self {
            RawRating::Number(n) => Rating::new(*n),
            RawRating::Text(s) => s.trim().parse::<i64>().ok().and_then(Rating::new),
        }
    }
}

/// Submission body, shared by the form-encoded and JSON endpoints.
/// Older forms post `comments`; when both are sent, a non-blank `comment` wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackForm {
    #[serde(rename = "advisorId", default)]
    pub advisor_id: Option<String>,
    #[serde(default)]
    pub rating: Option<RawRating>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(rename = "customerName", default)]
    pub customer_name: Option<String>,
}

impl FeedbackForm {
    fn into_comment(self) -> Option<String> {
        self.comment
            .filter(|c| !c.trim().is_empty())
            .or(self.comments)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReceipt {
    pub advisor_id: Uuid,
    pub rating: Rating,
    pub recorded_at: DateTime<Utc>,
    pub message: &'static str,
}

/// What a client needs to render the feedback form for one advisor
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackFormInfo {
    pub advisor_id: Uuid,
    pub advisor_name: String,
    pub submit_url: String,
    pub rating_scale: Vec<RatingOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingOption {
    pub value: u8,
    pub label: &'static str,
}

const RATING_LABELS: [&str; 5] = ["Poor", "Fair", "Good", "Very Good", "Excellent"];

pub struct FeedbackService {
    store: Arc<dyn AdvisorStore>,
    public_base_url: String,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn AdvisorStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn parse_advisor_id(raw: Option<&str>) -> Result<Uuid, FeedbackError> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(FeedbackError::MissingFields)?;
        Uuid::parse_str(raw).map_err(|_| FeedbackError::InvalidAdvisorId)
    }

    pub fn submit_url(&self, advisor_id: Uuid) -> String {
        format!("{}/api/feedback/submit/{}", self.public_base_url, advisor_id)
    }

    pub async fn form(&self, advisor_id: &str) -> Result<FeedbackFormInfo, FeedbackError> {
        let id = Self::parse_advisor_id(Some(advisor_id))?;
        let advisor = self
            .store
            .find_advisor(id)
            .await?
            .ok_or(FeedbackError::AdvisorNotFound)?;

        Ok(FeedbackFormInfo {
            advisor_id: advisor.id,
            advisor_name: advisor.name,
            submit_url: self.submit_url(advisor.id),
            rating_scale: (Rating::MIN..=Rating::MAX)
                .zip(RATING_LABELS)
                .map(|(value, label)| RatingOption { value, label })
                .collect(),
        })
    }

    /// Submission whose advisor id travels in the body. Both the id and the
    /// rating must be present before any lookup happens.
    pub async fn submit_from_body(&self, form: FeedbackForm) -> Result<FeedbackReceipt, FeedbackError> {
        let advisor_id = form
            .advisor_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(FeedbackError::MissingFields)?;
        if form.rating.is_none() {
            return Err(FeedbackError::MissingFields);
        }

        self.submit(Some(&advisor_id), form).await
    }

    /// Validate a submission and append it to the advisor's performance data.
    ///
    /// Checks run in order: advisor id format, advisor existence, rating.
    /// Nothing is written unless all three pass.
    pub async fn submit(
        &self,
        advisor_id: Option<&str>,
        form: FeedbackForm,
    ) -> Result<FeedbackReceipt, FeedbackError> {
        let id = Self::parse_advisor_id(advisor_id)?;

        let advisor = self
            .store
            .find_advisor(id)
            .await?
            .ok_or(FeedbackError::AdvisorNotFound)?;

        let rating = form
            .rating
            .as_ref()
            .and_then(RawRating::parse)
            .ok_or(FeedbackError::InvalidRating)?;

        let customer_name = form.customer_name.clone();
        let feedback = Feedback::new(advisor.id, rating, form.into_comment(), customer_name);
        if let Some(customer) = &feedback.customer_name {
            debug!("Feedback for {} left by {}", advisor.id, customer);
        }

        match self.store.append_performance(advisor.id, feedback.to_entry()).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => return Err(FeedbackError::AdvisorNotFound),
            Err(e) => return Err(e.into()),
        }

        info!("Feedback submitted for {}: rating {}", advisor.name, rating.get());

        Ok(FeedbackReceipt {
            advisor_id: advisor.id,
            rating,
            recorded_at: feedback.created_at,
            message: "Thank You for Your Feedback!",
        })
    }
}
