//! HTTP handler functions for the tally API.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use tally_analytics::stats::survey_stats_by_locality;
use tally_analytics::trends::ratings_over_time as daily_ratings;
use tally_analytics::{AnalyticsError, LocalityTerm};
use tally_locality::registry::{LocalityCategory, list_display_values};
use tally_server_models::{
    ApiEmptySeries, ApiFailure, ApiHealth, ApiStatsResponse, ApiSuccess, ApiValidationError,
    LocalityQueryParams,
};
use tally_survey_models::SurveySubmission;

use crate::AppState;

fn bad_request(error: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiValidationError {
        error: error.to_string(),
    })
}

fn server_error(context: &str, error: &dyn std::error::Error) -> HttpResponse {
    log::error!("{context}: {error}");
    HttpResponse::InternalServerError().json(ApiFailure::new(error.to_string()))
}

fn analytics_error(context: &str, error: &AnalyticsError) -> HttpResponse {
    if error.is_validation() {
        bad_request(error)
    } else {
        server_error(context, error)
    }
}

/// Rejects unparseable JSON bodies with a 400 `{error}` response.
#[allow(clippy::needless_pass_by_value)]
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(&err);
    InternalError::from_response(err, response).into()
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/surveys/add`
///
/// Stores a survey and registers its locality.
pub async fn add_survey(
    state: web::Data<AppState>,
    body: web::Json<SurveySubmission>,
) -> HttpResponse {
    match tally_survey::submit(state.store.as_ref(), body.into_inner()).await {
        Ok(id) => {
            log::debug!("Created survey {id}");
            HttpResponse::Created().json(ApiSuccess::new())
        }
        Err(e) if e.is_validation() => bad_request(e),
        Err(e) => server_error("Failed to store survey", &e),
    }
}

/// `GET /api/surveys/getData?locality=<term>`
///
/// Returns aggregated statistics for every survey matching the term, or
/// `stats: null` when none match.
pub async fn survey_stats(
    state: web::Data<AppState>,
    params: web::Query<LocalityQueryParams>,
) -> HttpResponse {
    let term = match LocalityTerm::parse(params.locality.as_deref()) {
        Ok(term) => term,
        Err(e) => return bad_request(e),
    };

    match survey_stats_by_locality(state.store.as_ref(), &term).await {
        Ok(stats) => HttpResponse::Ok().json(ApiStatsResponse {
            success: true,
            stats,
        }),
        Err(e) => analytics_error("Failed to compute survey stats", &e),
    }
}

/// `GET /api/surveys/getRatingsOverTime?locality=<term>`
///
/// Returns the daily rating series as a bare array, or
/// `{success: true, data: []}` when no survey matches.
pub async fn ratings_over_time(
    state: web::Data<AppState>,
    params: web::Query<LocalityQueryParams>,
) -> HttpResponse {
    let term = match LocalityTerm::parse(params.locality.as_deref()) {
        Ok(term) => term,
        Err(e) => return bad_request(e),
    };

    match daily_ratings(state.store.as_ref(), &term).await {
        Ok(series) if series.is_empty() => HttpResponse::Ok().json(ApiEmptySeries::new()),
        Ok(series) => HttpResponse::Ok().json(series),
        Err(e) => analytics_error("Failed to compute ratings over time", &e),
    }
}

/// `GET /api/localities/{states|cities|areas|pincodes}`
///
/// Lists every known value of a locality field.
pub async fn localities(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let name = path.into_inner();
    let Ok(category) = name.parse::<LocalityCategory>() else {
        return HttpResponse::NotFound().json(ApiValidationError {
            error: format!("Unknown locality category '{name}'"),
        });
    };

    match list_display_values(state.store.as_ref(), category).await {
        Ok(values) => HttpResponse::Ok().json(values),
        Err(e) => server_error(&format!("Failed to list {category}"), &e),
    }
}
