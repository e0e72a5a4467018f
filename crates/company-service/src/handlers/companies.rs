//! Company handlers.
//!
//! - `POST /api/v1/companies` - Create a company (restricted)
//! - `DELETE /api/v1/companies/{company_id}` - Delete a company (restricted)
//! - `GET /api/v1/companies/{company_id}` - Get a company
//! - `POST /api/v1/search/companies` - Fetch companies by a list of IDs
//!
//! Request bodies are decoded as JSON regardless of the `Content-Type`
//! header. Database failures are logged here and surface to clients as a
//! fixed per-operation message.

use crate::envelope::{self, ApiResponse};
use crate::errors::CompanyError;
use crate::models::{CompaniesSearchRequest, Company, CreateCompanyRequest};
use crate::repositories::CompaniesRepository;
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, instrument, warn};
use uuid::Uuid;

const DECODE_FAILED: &str = "decode request failed";

/// Handler for POST /api/v1/companies
///
/// # Response
///
/// - 201 Created: `{"data": <company>}`
/// - 400 Bad Request: body missing, not JSON, or missing a field
/// - 500 Internal Server Error: insert failed
#[instrument(skip_all, name = "company.handlers.create_company")]
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<ApiResponse<Company>, CompanyError> {
    let input: CreateCompanyRequest = decode_body(&body)?;

    let company = Company::new(input);

    CompaniesRepository::create(&state.pool, &company)
        .await
        .map_err(|e| {
            error!(target: "company.handlers", error = %e, company_id = %company.id, "Create company failed");
            CompanyError::Internal("create company failed".to_string())
        })?;

    tracing::info!(target: "company.handlers", company_id = %company.id, "Company created");

    Ok(envelope::created(company))
}

/// Handler for GET /api/v1/companies/{company_id}
///
/// # Response
///
/// - 200 OK: `{"data": <company>}`
/// - 400 Bad Request: `company_id` is not a UUID
/// - 404 Not Found: no such company
/// - 500 Internal Server Error: query failed
#[instrument(skip(state), name = "company.handlers.get_company")]
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
) -> Result<ApiResponse<Company>, CompanyError> {
    let id = parse_company_id(&company_id)?;

    let company = CompaniesRepository::get_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            error!(target: "company.handlers", error = %e, "Get company failed");
            CompanyError::Internal("get company failed".to_string())
        })?
        .ok_or_else(|| CompanyError::NotFound("company not found".to_string()))?;

    Ok(envelope::ok(company))
}

/// Handler for DELETE /api/v1/companies/{company_id}
///
/// Deleting an unknown ID succeeds.
///
/// # Response
///
/// - 200 OK: `{}`
/// - 400 Bad Request: `company_id` is not a UUID
/// - 500 Internal Server Error: delete failed
#[instrument(skip(state), name = "company.handlers.delete_company")]
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
) -> Result<ApiResponse<()>, CompanyError> {
    let id = parse_company_id(&company_id)?;

    let removed = CompaniesRepository::delete_by_id(&state.pool, id)
        .await
        .map_err(|e| {
            error!(target: "company.handlers", error = %e, "Delete company failed");
            CompanyError::Internal("delete company failed".to_string())
        })?;

    tracing::info!(target: "company.handlers", company_id = %id, removed, "Company deleted");

    Ok(envelope::ok_empty())
}

/// Handler for POST /api/v1/search/companies
///
/// Malformed IDs are skipped and unknown IDs are omitted, so the result
/// may be shorter than the request. Results are newest first.
///
/// # Response
///
/// - 200 OK: `{"data": [<company>, ...]}`
/// - 400 Bad Request: body is not `{"companies_ids": [...]}`
/// - 500 Internal Server Error: query failed
#[instrument(skip_all, name = "company.handlers.search_companies")]
pub async fn search_companies(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<ApiResponse<Vec<Company>>, CompanyError> {
    let request: CompaniesSearchRequest = decode_body(&body)?;

    let ids = parse_search_ids(&request.companies_ids);

    let companies = CompaniesRepository::list_by_ids(&state.pool, &ids)
        .await
        .map_err(|e| {
            error!(target: "company.handlers", error = %e, "Select companies failed");
            CompanyError::Internal("select companies failed".to_string())
        })?;

    Ok(envelope::ok(companies))
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, CompanyError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(target: "company.handlers", error = %e, "Failed to decode request body");
        CompanyError::BadRequest(DECODE_FAILED.to_string())
    })
}

fn parse_company_id(raw: &str) -> Result<Uuid, CompanyError> {
    Uuid::parse_str(raw).map_err(|_| CompanyError::BadRequest("invalid companyID".to_string()))
}

/// Parse the requested IDs, dropping entries that are not UUIDs.
fn parse_search_ids(raw_ids: &[String]) -> Vec<Uuid> {
    raw_ids
        .iter()
        .filter_map(|raw| match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(target: "company.handlers", company_id = %raw, error = %e, "Skipping malformed company id");
                None
            }
        })
        .collect()
}
