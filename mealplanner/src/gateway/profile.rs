use validator::Validate;

use crate::error::{PlannerError, Result};
use crate::http::ApiClient;
use crate::models::{NutritionToday, ProfileUpdate, UserProfile};

#[derive(Debug, Clone)]
pub struct ProfileGateway {
    api: ApiClient,
}

impl ProfileGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self) -> Result<UserProfile> {
        self.api.get("/profile/").send_json().await
    }

    pub async fn update(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        if update.is_empty() {
            return Err(PlannerError::Validation("No fields to update".to_string()));
        }
        update.validate()?;
        self.api.put("/profile/").json(update).send_json().await
    }

    pub async fn nutrition_today(&self) -> Result<NutritionToday> {
        self.api.get("/profile/nutrition/today").send_json().await
    }
}
