use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{DoshaResult, PrakritiProfile, ResponseSet};

const PROFILES_PATH: &str = "/rest/v1/prakriti_profiles";

/// Stores classification results in the `prakriti_profiles` table.
pub struct PrakritiProfileService {
    supabase: SupabaseClient,
}

impl PrakritiProfileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn save_profile(
        &self,
        patient_id: &str,
        responses: &ResponseSet,
        result: &DoshaResult,
        auth_token: &str,
    ) -> Result<PrakritiProfile> {
        debug!("Saving prakriti profile for patient: {}", patient_id);

        let record = profile_record(patient_id, responses, result);

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                PROFILES_PATH,
                Some(auth_token),
                Some(record),
                Some(return_representation()),
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to save prakriti profile"))?;

        let profile: PrakritiProfile = serde_json::from_value(row)
            .map_err(|e| anyhow!("Failed to deserialize prakriti profile: {}", e))?;

        info!(
            "Stored prakriti profile {} ({}) for patient {}",
            profile.id, profile.constitution, patient_id
        );
        Ok(profile)
    }

    /// Most recent profile for the patient, if any assessment was stored.
    pub async fn latest_profile(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Option<PrakritiProfile>> {
        debug!("Fetching latest prakriti profile for patient: {}", patient_id);

        let path = format!(
            "{}?patient_id=eq.{}&order=assessment_date.desc&limit=1",
            PROFILES_PATH, patient_id
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value::<PrakritiProfile>)
            .transpose()
            .map_err(|e| anyhow!("Failed to deserialize prakriti profile: {}", e))
    }
}

/// Shape written to the store: the result plus the owning patient and the
/// raw answers that produced it.
pub fn profile_record(patient_id: &str, responses: &ResponseSet, result: &DoshaResult) -> Value {
    json!({
        "patient_id": patient_id,
        "vata_percentage": result.vata_percentage,
        "pitta_percentage": result.pitta_percentage,
        "kapha_percentage": result.kapha_percentage,
        "dominant_dosha": result.dominant_dosha,
        "constitution": result.constitution,
        "recommendations": result.recommendations,
        "responses": responses,
        "assessment_date": chrono::Utc::now().to_rfc3339(),
    })
}
