//! Opportunity models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Opportunity entity
///
/// A business-idea record with a unique title and a handful of optional
/// descriptive fields. `tam_estimate` is strictly positive and
/// `growth_rate` non-negative when present.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    pub market_description: Option<String>,
    pub tam_estimate: Option<f64>,
    pub growth_rate: Option<f64>,
    pub consumer_insight: Option<String>,
    pub hypothesis: Option<String>,
    /// Owning user, when the deployment tracks ownership
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for opportunity creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOpportunityRequest {
    pub title: String,
    pub market_description: Option<String>,
    pub tam_estimate: Option<f64>,
    pub growth_rate: Option<f64>,
    pub consumer_insight: Option<String>,
    pub hypothesis: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Request for partial opportunity update
///
/// Only the fields supplied by the caller are applied; absent fields keep
/// their stored values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOpportunityRequest {
    pub title: Option<String>,
    pub market_description: Option<String>,
    pub tam_estimate: Option<f64>,
    pub growth_rate: Option<f64>,
    pub consumer_insight: Option<String>,
    pub hypothesis: Option<String>,
}

impl UpdateOpportunityRequest {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.market_description.is_none()
            && self.tam_estimate.is_none()
            && self.growth_rate.is_none()
            && self.consumer_insight.is_none()
            && self.hypothesis.is_none()
    }
}

/// Query parameters for opportunity listing
#[derive(Debug, Clone, Deserialize)]
pub struct OpportunityQuery {
    /// Number of records to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of records to return (default: 100)
    pub limit: Option<i64>,
}

/// Query parameters for prompt generation
#[derive(Debug, Clone, Deserialize)]
pub struct PromptQuery {
    /// Template name, defaults to `opportunity_prompt`
    pub template: Option<String>,
}

/// Response for prompt generation
#[derive(Debug, Clone, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}
