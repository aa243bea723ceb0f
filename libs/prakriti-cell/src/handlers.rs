use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::bearer_token;

use crate::models::{ClassifyRequest, Dosha, DoshaDescription, DoshaResult, PrakritiProfile};
use crate::services::{DoshaClassifier, PrakritiProfileService};

/// Shared state for the prakriti routes.
#[derive(Clone)]
pub struct PrakritiState {
    pub config: Arc<AppConfig>,
    pub classifier: DoshaClassifier,
}

// Assessment handlers

pub async fn list_questions(State(state): State<PrakritiState>) -> Json<Value> {
    let bank = state.classifier.bank();
    Json(json!({
        "questions": bank.questions(),
        "total": bank.len(),
    }))
}

pub async fn classify_responses(
    State(state): State<PrakritiState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<DoshaResult> {
    debug!("Classifying {} responses", request.responses.len());
    Json(state.classifier.classify(&request.responses))
}

pub async fn get_dosha_description(
    Path(dosha): Path<String>,
) -> Result<Json<DoshaDescription>, AppError> {
    let dosha: Dosha = dosha
        .parse()
        .map_err(|e: crate::models::UnknownDosha| AppError::NotFound(e.to_string()))?;
    Ok(Json(dosha.description()))
}

// Profile handlers

pub async fn create_prakriti_profile(
    State(state): State<PrakritiState>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
    Json(request): Json<ClassifyRequest>,
) -> Result<(StatusCode, Json<PrakritiProfile>), AppError> {
    let token = bearer_token(&headers)?;

    Uuid::parse_str(&user.id)
        .map_err(|_| AppError::BadRequest("Authenticated user id is not a valid UUID".to_string()))?;

    let bank = state.classifier.bank();
    let answered = request
        .responses
        .iter()
        .filter(|(id, _)| bank.find(id).is_some())
        .count();
    if answered == 0 {
        return Err(AppError::ValidationError(
            "At least one assessment question must be answered".to_string(),
        ));
    }

    let result = state.classifier.classify(&request.responses);

    let profile_service = PrakritiProfileService::new(&state.config);
    let profile = profile_service
        .save_profile(&user.id, &request.responses, &result, &token)
        .await
        .map_err(|e| {
            warn!("Failed to store prakriti profile for {}: {}", user.id, e);
            AppError::Database(e.to_string())
        })?;

    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_prakriti_profile(
    State(state): State<PrakritiState>,
    Path(patient_id): Path<String>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
) -> Result<Json<PrakritiProfile>, AppError> {
    let token = bearer_token(&headers)?;

    // Patients see their own profile; practitioners may consult any patient's.
    if patient_id != user.id && !user.is_practitioner() {
        return Err(AppError::Forbidden(
            "Not authorized to access this prakriti profile".to_string(),
        ));
    }

    Uuid::parse_str(&patient_id)
        .map_err(|_| AppError::BadRequest("patient_id must be a valid UUID".to_string()))?;

    let profile_service = PrakritiProfileService::new(&state.config);
    match profile_service.latest_profile(&patient_id, &token).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(AppError::NotFound("Prakriti profile not found".to_string())),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}
