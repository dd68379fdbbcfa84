//! 회사 목록 endpoint.
//!
//! - `GET /api/companies` - 등록된 회사 목록

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kospi_core::Company;

use crate::error::{error_response_with_empty_data, ApiFailure};
use crate::state::AppState;

/// 회사 목록 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompaniesResponse {
    pub success: bool,
    pub data: Vec<Company>,
    pub count: usize,
}

/// 등록된 회사 목록 조회.
///
/// GET /api/companies
pub async fn get_companies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CompaniesResponse>, ApiFailure> {
    let companies = state
        .store
        .companies()
        .await
        .map_err(error_response_with_empty_data)?;

    let count = companies.len();
    Ok(Json(CompaniesResponse {
        success: true,
        data: companies,
        count,
    }))
}
