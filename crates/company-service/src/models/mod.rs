//! Company Service models.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Company record.
///
/// Maps to the `companies` table and is returned as-is in response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Server-generated identifier.
    pub id: Uuid,

    /// Server-generated creation time.
    pub created_at: DateTime<Utc>,

    pub name: String,
    pub code: String,
    pub country: String,
    pub website: String,
    pub phone: String,
}

impl Company {
    /// Build a new record from client input, assigning a fresh id and
    /// creation time.
    pub fn new(input: CreateCompanyRequest) -> Self {
        Self {
            id: new_company_id(),
            created_at: new_created_at(),
            name: input.name,
            code: input.code,
            country: input.country,
            website: input.website,
            phone: input.phone,
        }
    }
}

/// Request body for `POST /api/v1/companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub code: String,
    pub country: String,
    pub website: String,
    pub phone: String,
}

/// Request body for `POST /api/v1/search/companies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompaniesSearchRequest {
    /// Identifiers to look up. Entries that are not valid UUIDs are skipped.
    /// Absent or `null` means none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub companies_ids: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "unhealthy").
    pub status: String,

    /// Database connectivity status ("healthy" or "unhealthy").
    pub database: String,
}

/// Generate a new company identifier.
pub fn new_company_id() -> Uuid {
    Uuid::new_v4()
}

/// Current UTC time truncated to microseconds, the precision PostgreSQL
/// stores for `TIMESTAMPTZ`.
pub fn new_created_at() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
