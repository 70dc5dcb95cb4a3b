//! Input validation utilities

use crate::error::{ApiError, ApiResult};
use crate::models::opportunity::{CreateOpportunityRequest, UpdateOpportunityRequest};

/// Validate a user or opportunity display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 255 {
        return Err("Name must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate an opportunity title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.len() > 255 {
        return Err("Title must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate a total-addressable-market estimate
pub fn validate_tam_estimate(tam_estimate: f64) -> Result<(), String> {
    if !tam_estimate.is_finite() {
        return Err("TAM estimate must be a finite number".to_string());
    }

    if tam_estimate <= 0.0 {
        return Err("TAM estimate must be greater than zero".to_string());
    }

    Ok(())
}

/// Validate a growth rate
pub fn validate_growth_rate(growth_rate: f64) -> Result<(), String> {
    if !growth_rate.is_finite() {
        return Err("Growth rate must be a finite number".to_string());
    }

    if growth_rate < 0.0 {
        return Err("Growth rate must not be negative".to_string());
    }

    Ok(())
}

/// Validate an opportunity creation payload
pub fn validate_create_opportunity(payload: &CreateOpportunityRequest) -> ApiResult<()> {
    validate_title(&payload.title).map_err(ApiError::Validation)?;

    if let Some(tam_estimate) = payload.tam_estimate {
        validate_tam_estimate(tam_estimate).map_err(ApiError::Validation)?;
    }

    if let Some(growth_rate) = payload.growth_rate {
        validate_growth_rate(growth_rate).map_err(ApiError::Validation)?;
    }

    Ok(())
}

/// Validate a partial opportunity update payload
pub fn validate_update_opportunity(payload: &UpdateOpportunityRequest) -> ApiResult<()> {
    if let Some(title) = &payload.title {
        validate_title(title).map_err(ApiError::Validation)?;
    }

    if let Some(tam_estimate) = payload.tam_estimate {
        validate_tam_estimate(tam_estimate).map_err(ApiError::Validation)?;
    }

    if let Some(growth_rate) = payload.growth_rate {
        validate_growth_rate(growth_rate).map_err(ApiError::Validation)?;
    }

    Ok(())
}
