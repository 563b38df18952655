//! Clinic directory used to populate the sign-up clinic selector

use serde::{Deserialize, Serialize};

use crate::core::auth::client::{ApiClient, ApiError};

pub const CLINICS_PATH: &str = "/api/v1/clinics";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: String,
    pub name: String,
}

/// The endpoint answers with either a bare list or a paged envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClinicsResponse {
    List(Vec<Clinic>),
    Paged {
        #[serde(default)]
        items: Vec<Clinic>,
    },
}

impl From<ClinicsResponse> for Vec<Clinic> {
    fn from(response: ClinicsResponse) -> Self {
        match response {
            ClinicsResponse::List(clinics) | ClinicsResponse::Paged { items: clinics } => clinics,
        }
    }
}

/// Fetch the clinics a new account can be attached to
pub async fn fetch_clinics(client: &ApiClient) -> Result<Vec<Clinic>, ApiError> {
    let response: ClinicsResponse = client.get_json(CLINICS_PATH).await?;
    let clinics: Vec<Clinic> = response.into();
    tracing::debug!("Loaded {} clinics", clinics.len());
    Ok(clinics)
}
