//! Companies repository.

use crate::errors::CompanyError;
use crate::models::Company;
use crate::observability::metrics;
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// Repository for the `companies` table.
pub struct CompaniesRepository;

impl CompaniesRepository {
    /// Insert a new company row.
    ///
    /// The caller supplies `id` and `created_at`.
    #[instrument(skip_all, fields(company_id = %company.id))]
    pub async fn create(pool: &PgPool, company: &Company) -> Result<(), CompanyError> {
        let start = Instant::now();

        let result = sqlx::query(
            r#"
            INSERT INTO companies (id, name, code, country, website, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.code)
        .bind(&company.country)
        .bind(&company.website)
        .bind(&company.phone)
        .bind(company.created_at)
        .execute(pool)
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::record_db_query("create_company", status, start.elapsed());

        result?;
        Ok(())
    }

    /// Get a company by ID.
    ///
    /// Returns `Ok(None)` when no row matches.
    #[instrument(skip_all, fields(company_id = %id))]
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Company>, CompanyError> {
        let start = Instant::now();

        let query_result: Result<Option<Company>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT id, name, code, country, website, phone, created_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await;

        let status = if query_result.is_ok() { "success" } else { "error" };
        metrics::record_db_query("get_company", status, start.elapsed());

        Ok(query_result?)
    }

    /// Delete a company by ID, returning the number of rows removed.
    ///
    /// Deleting an unknown ID is not an error.
    #[instrument(skip_all, fields(company_id = %id))]
    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<u64, CompanyError> {
        let start = Instant::now();

        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await;

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::record_db_query("delete_company", status, start.elapsed());

        Ok(result?.rows_affected())
    }

    /// Fetch the companies whose IDs appear in `ids`, newest first.
    ///
    /// Unknown IDs are omitted. An empty `ids` slice returns an empty list
    /// without touching the database.
    #[instrument(skip_all, fields(requested = ids.len()))]
    pub async fn list_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Company>, CompanyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();

        let query_result: Result<Vec<Company>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT id, name, code, country, website, phone, created_at
            FROM companies
            WHERE id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await;

        let status = if query_result.is_ok() { "success" } else { "error" };
        metrics::record_db_query("list_companies", status, start.elapsed());

        Ok(query_result?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::CreateCompanyRequest;
    use chrono::Duration;

    fn company(name: &str) -> Company {
        Company::new(CreateCompanyRequest {
            name: name.to_string(),
            code: "007".to_string(),
            country: "md".to_string(),
            website: "http://google.com".to_string(),
            phone: "+995987655443".to_string(),
        })
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_then_get_returns_identical_record(pool: PgPool) {
        let created = company("ltd");
        CompaniesRepository::create(&pool, &created).await.unwrap();

        let fetched = CompaniesRepository::get_by_id(&pool, created.id)
            .await
            .unwrap()
            .expect("company should exist");

        assert_eq!(fetched, created);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_unknown_id_returns_none(pool: PgPool) {
        let fetched = CompaniesRepository::get_by_id(&pool, Uuid::new_v4())
            .await
            .unwrap();

        assert!(fetched.is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_duplicate_id_is_database_error(pool: PgPool) {
        let created = company("ltd");
        CompaniesRepository::create(&pool, &created).await.unwrap();

        let result = CompaniesRepository::create(&pool, &created).await;

        assert!(matches!(result, Err(CompanyError::Database(_))));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_by_id(pool: PgPool) {
        let created = company("ltd");
        CompaniesRepository::create(&pool, &created).await.unwrap();

        let removed = CompaniesRepository::delete_by_id(&pool, created.id)
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(CompaniesRepository::get_by_id(&pool, created.id)
            .await
            .unwrap()
            .is_none());

        // Second delete matches nothing and still succeeds
        let removed_again = CompaniesRepository::delete_by_id(&pool, created.id)
            .await
            .unwrap();
        assert_eq!(removed_again, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_list_by_ids_orders_newest_first_and_omits_unknown(pool: PgPool) {
        let mut older = company("older");
        older.created_at -= Duration::seconds(60);
        let newer = company("newer");
        let unrelated = company("unrelated");

        for c in [&older, &newer, &unrelated] {
            CompaniesRepository::create(&pool, c).await.unwrap();
        }

        let listed =
            CompaniesRepository::list_by_ids(&pool, &[older.id, Uuid::new_v4(), newer.id])
                .await
                .unwrap();

        assert_eq!(listed, vec![newer, older]);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_list_by_ids_empty_input(pool: PgPool) {
        CompaniesRepository::create(&pool, &company("ltd"))
            .await
            .unwrap();

        let listed = CompaniesRepository::list_by_ids(&pool, &[]).await.unwrap();

        assert!(listed.is_empty());
    }
}
