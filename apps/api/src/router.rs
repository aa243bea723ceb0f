use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use prakriti_cell::router::prakriti_routes;
use prakriti_cell::models::QuestionBank;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>, bank: Arc<QuestionBank>) -> Router {
    Router::new()
        .route("/", get(|| async { "AyurSutra API is running!" }))
        .nest("/prakriti", prakriti_routes(state, bank))
}
