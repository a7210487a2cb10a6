use async_trait::async_trait;
use validator::Validate;

use super::ItemGateway;
use crate::error::{PlannerError, Result};
use crate::http::ApiClient;
use crate::models::{ListFilter, Meal, NewMeal};

#[derive(Debug, Clone)]
pub struct MealGateway {
    api: ApiClient,
}

impl MealGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches one meal. A 404 means the meal was deleted and is reported as
    /// [`PlannerError::ResolutionGap`].
    pub async fn get(&self, id: i64) -> Result<Meal> {
        self.api
            .get(format!("/meals/{id}"))
            .send_json()
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PlannerError::ResolutionGap { entity: "meal", id }
                } else {
                    e
                }
            })
    }
}

#[async_trait]
impl ItemGateway for MealGateway {
    type Item = Meal;
    type Draft = NewMeal;

    const NOUN: &'static str = "meal";
    const SERVER_SEARCH: bool = false;

    async fn list(&self, _filter: &ListFilter) -> Result<Vec<Meal>> {
        self.api.get("/meals/").send_json().await
    }

    async fn create(&self, draft: &NewMeal) -> Result<Meal> {
        draft.validate()?;
        self.api.post("/meals/").json(draft).send_json().await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(format!("/meals/{id}")).send_empty().await
    }
}
