use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use shopit_core::{Coordinate, ProductSearch, SearchError, SearchMatch};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) const MISSING_PARAMS: &str = "Missing required parameters: query, lat, lng";

/// Raw query string. Every field is optional so absence and malformed values
/// produce our own error bodies instead of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    pub query: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

/// Validated form of [`SearchParams`].
#[derive(Debug, PartialEq)]
pub(super) struct SearchRequest {
    pub query: String,
    pub origin: Coordinate,
    pub radius_km: f64,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_number(field: &str, raw: &str) -> Result<f64, ApiError> {
    raw.parse::<f64>().map_err(|_| {
        ApiError::bad_request(format!("Invalid parameter {field}: '{raw}' is not a number"))
    })
}

impl SearchParams {
    pub(super) fn validate(&self, default_radius_km: f64) -> Result<SearchRequest, ApiError> {
        let (Some(query), Some(lat), Some(lng)) = (
            present(self.query.as_ref()),
            present(self.lat.as_ref()),
            present(self.lng.as_ref()),
        ) else {
            return Err(ApiError::bad_request(MISSING_PARAMS));
        };

        let latitude = parse_number("lat", lat)?;
        let longitude = parse_number("lng", lng)?;
        let radius_km = match present(self.radius.as_ref()) {
            Some(raw) => parse_number("radius", raw)?,
            None => default_radius_km,
        };

        Ok(SearchRequest {
            query: query.to_string(),
            origin: Coordinate {
                latitude,
                longitude,
            },
            radius_km,
        })
    }
}

pub(super) fn map_search_error(error: &SearchError) -> ApiError {
    match error {
        SearchError::InvalidInput { field, reason } => {
            ApiError::bad_request(format!("Invalid parameter {field}: {reason}"))
        }
        SearchError::LocationUnavailable | SearchError::EngineUnavailable(_) => {
            tracing::error!(error = %error, "search failed");
            ApiError::internal()
        }
    }
}

pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchMatch>>, ApiError> {
    let request = params.validate(state.default_radius_km)?;

    let matches = state
        .engine
        .search(&request.query, request.origin, request.radius_km)
        .await
        .map_err(|e| map_search_error(&e))?;

    tracing::info!(
        request_id = %req_id.0,
        query = %request.query,
        origin = %request.origin,
        radius_km = request.radius_km,
        results = matches.len(),
        "search served"
    );
    Ok(Json(matches))
}
