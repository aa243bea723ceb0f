use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, PrakritiState};
use crate::models::QuestionBank;
use crate::services::DoshaClassifier;

pub fn prakriti_routes(config: Arc<AppConfig>, bank: Arc<QuestionBank>) -> Router {
    let state = PrakritiState {
        config: config.clone(),
        classifier: DoshaClassifier::new(bank),
    };

    let public_routes = Router::new()
        .route("/assessment/questions", get(handlers::list_questions))
        .route("/assessment/classify", post(handlers::classify_responses))
        .route("/doshas/{dosha}", get(handlers::get_dosha_description));

    let protected_routes = Router::new()
        .route("/prakriti-profiles", post(handlers::create_prakriti_profile))
        .route("/prakriti-profiles/{patient_id}", get(handlers::get_prakriti_profile))
        .layer(middleware::from_fn_with_state(config, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
