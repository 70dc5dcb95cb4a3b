//! Opportunity repository for database operations

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::opportunity::{
    CreateOpportunityRequest, Opportunity, UpdateOpportunityRequest,
};

/// Default page size for opportunity listings
pub const DEFAULT_LIMIT: i64 = 100;

/// Hard cap on the page size a caller may request
pub const MAX_LIMIT: i64 = 100;

/// Opportunity repository for database operations
#[derive(Clone)]
pub struct OpportunityRepository {
    pool: PgPool,
}

impl OpportunityRepository {
    /// Create a new opportunity repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new opportunity
    ///
    /// Fails with `Conflict` on a duplicate title and `NotFound` when the
    /// referenced owner does not exist. The insert is a single statement,
    /// so either the full record is persisted or none of it.
    pub async fn create(&self, payload: &CreateOpportunityRequest) -> ApiResult<Opportunity> {
        info!("Creating new opportunity: {}", payload.title);

        let opportunity = sqlx::query_as::<_, Opportunity>(
            r#"
            INSERT INTO opportunities
                (title, market_description, tam_estimate, growth_rate,
                 consumer_insight, hypothesis, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, market_description, tam_estimate, growth_rate,
                      consumer_insight, hypothesis, user_id, created_at, updated_at
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.market_description)
        .bind(payload.tam_estimate)
        .bind(payload.growth_rate)
        .bind(&payload.consumer_insight)
        .bind(&payload.hypothesis)
        .bind(payload.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(opportunity)
    }

    /// Find an opportunity by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Opportunity>> {
        let opportunity = sqlx::query_as::<_, Opportunity>(
            r#"
            SELECT id, title, market_description, tam_estimate, growth_rate,
                   consumer_insight, hypothesis, user_id, created_at, updated_at
            FROM opportunities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(opportunity)
    }

    /// List opportunities with skip/limit pagination
    ///
    /// An out-of-range skip yields an empty page, not an error.
    pub async fn list(&self, skip: i64, limit: i64) -> ApiResult<Vec<Opportunity>> {
        if skip < 0 {
            return Err(ApiError::Validation("skip must not be negative".to_string()));
        }
        if limit <= 0 {
            return Err(ApiError::Validation("limit must be greater than zero".to_string()));
        }

        let opportunities = sqlx::query_as::<_, Opportunity>(
            r#"
            SELECT id, title, market_description, tam_estimate, growth_rate,
                   consumer_insight, hypothesis, user_id, created_at, updated_at
            FROM opportunities
            ORDER BY created_at
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.min(MAX_LIMIT))
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(opportunities)
    }

    /// Apply a partial update, touching only the supplied fields
    ///
    /// Fails with `NotFound` for a missing id and `Conflict` if a new
    /// title collides with an existing one.
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateOpportunityRequest,
    ) -> ApiResult<Opportunity> {
        let opportunity = sqlx::query_as::<_, Opportunity>(
            r#"
            UPDATE opportunities
            SET title = COALESCE($2, title),
                market_description = COALESCE($3, market_description),
                tam_estimate = COALESCE($4, tam_estimate),
                growth_rate = COALESCE($5, growth_rate),
                consumer_insight = COALESCE($6, consumer_insight),
                hypothesis = COALESCE($7, hypothesis),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, market_description, tam_estimate, growth_rate,
                      consumer_insight, hypothesis, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.market_description)
        .bind(payload.tam_estimate)
        .bind(payload.growth_rate)
        .bind(&payload.consumer_insight)
        .bind(&payload.hypothesis)
        .fetch_optional(&self.pool)
        .await?;

        opportunity.ok_or_else(|| ApiError::NotFound(format!("opportunity {} not found", id)))
    }

    /// Delete an opportunity
    ///
    /// Fails with `NotFound` when the id is already absent; the owning
    /// user row is untouched.
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM opportunities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("opportunity {} not found", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    fn sample_create(title: String) -> CreateOpportunityRequest {
        CreateOpportunityRequest {
            title,
            market_description: Some("Description".to_string()),
            tam_estimate: Some(1000.0),
            growth_rate: Some(5.0),
            consumer_insight: Some("Insight".to_string()),
            hypothesis: Some("Hypothesis".to_string()),
            user_id: None,
        }
    }

    fn unique_title() -> String {
        format!("Opportunity {}", Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = OpportunityRepository::new(pool);
        let payload = sample_create(unique_title());

        let created = repo.create(&payload).await.expect("create should succeed");
        let fetched = repo
            .find_by_id(created.id)
            .await
            .expect("lookup should succeed")
            .expect("record should exist");

        assert_eq!(fetched.title, payload.title);
        assert_eq!(fetched.market_description, payload.market_description);
        assert_eq!(fetched.tam_estimate, payload.tam_estimate);
        assert_eq!(fetched.growth_rate, payload.growth_rate);
        assert_eq!(fetched.consumer_insight, payload.consumer_insight);
        assert_eq!(fetched.hypothesis, payload.hypothesis);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_conflict_and_first_row_unchanged() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = OpportunityRepository::new(pool);
        let title = unique_title();

        let first = repo
            .create(&sample_create(title.clone()))
            .await
            .expect("first create should succeed");

        let mut second = sample_create(title);
        second.hypothesis = Some("Another hypothesis".to_string());
        let err = repo
            .create(&second)
            .await
            .expect_err("second create should fail");
        assert!(matches!(err, ApiError::Conflict(_)));

        let still_there = repo
            .find_by_id(first.id)
            .await
            .expect("lookup")
            .expect("first record should remain");
        assert_eq!(still_there.hypothesis, first.hypothesis);
    }

    #[tokio::test]
    async fn test_unknown_owner_is_not_found() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = OpportunityRepository::new(pool);

        let mut payload = sample_create(unique_title());
        payload.user_id = Some(Uuid::new_v4());

        let err = repo.create(&payload).await.expect_err("create should fail");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = OpportunityRepository::new(pool);

        let created = repo
            .create(&sample_create(unique_title()))
            .await
            .expect("create should succeed");

        let new_title = unique_title();
        let update = UpdateOpportunityRequest {
            title: Some(new_title.clone()),
            ..Default::default()
        };
        let updated = repo
            .update(created.id, &update)
            .await
            .expect("update should succeed");

        assert_eq!(updated.title, new_title);
        assert_eq!(updated.market_description, created.market_description);
        assert_eq!(updated.tam_estimate, created.tam_estimate);
        assert_eq!(updated.growth_rate, created.growth_rate);
        assert_eq!(updated.consumer_insight, created.consumer_insight);
        assert_eq!(updated.hypothesis, created.hypothesis);

        // Response and a follow-up get agree
        let fetched = repo
            .find_by_id(created.id)
            .await
            .expect("lookup")
            .expect("record should exist");
        assert_eq!(fetched.title, updated.title);
        assert_eq!(fetched.hypothesis, updated.hypothesis);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = OpportunityRepository::new(pool);

        let update = UpdateOpportunityRequest {
            title: Some(unique_title()),
            ..Default::default()
        };
        let err = repo
            .update(Uuid::new_v4(), &update)
            .await
            .expect_err("update should fail");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = OpportunityRepository::new(pool);

        let created = repo
            .create(&sample_create(unique_title()))
            .await
            .expect("create should succeed");

        repo.delete(created.id).await.expect("delete should succeed");

        assert!(
            repo.find_by_id(created.id)
                .await
                .expect("lookup")
                .is_none(),
            "deleted record should be gone"
        );

        // Reflected immediately in a subsequent list
        let listed = repo.list(0, MAX_LIMIT).await.expect("list should succeed");
        assert!(listed.iter().all(|o| o.id != created.id));

        let err = repo
            .delete(created.id)
            .await
            .expect_err("second delete should fail");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_pagination_bounds() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = OpportunityRepository::new(pool);

        assert!(matches!(
            repo.list(-1, 10).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            repo.list(0, 0).await,
            Err(ApiError::Validation(_))
        ));

        // Out-of-range skip yields an empty page, not an error
        let page = repo
            .list(i64::MAX - 1, 10)
            .await
            .expect("list should succeed");
        assert!(page.is_empty());
    }
}
