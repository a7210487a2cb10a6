use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Day, MealType, NewPlan, Plan, PlanItem};

#[derive(Debug, Clone)]
pub struct PlanGateway {
    api: ApiClient,
}

impl PlanGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Plan>> {
        self.api.get("/plans/").send_json().await
    }

    pub async fn get(&self, id: i64) -> Result<Plan> {
        self.api.get(format!("/plans/{id}")).send_json().await
    }

    pub async fn create(&self, plan: &NewPlan) -> Result<Plan> {
        self.api.post("/plans/").json(plan).send_json().await
    }

    pub async fn add_meal(&self, plan_id: i64, item: &PlanItem) -> Result<()> {
        self.api
            .post(format!("/plans/{plan_id}/add-meal"))
            .json(item)
            .send_empty()
            .await
    }

    pub async fn remove_meal(
        &self,
        plan_id: i64,
        meal_id: i64,
        day: Day,
        meal_type: MealType,
    ) -> Result<()> {
        self.api
            .delete(format!("/plans/{plan_id}/meals/{meal_id}"))
            .query("day", day.index())
            .query("meal_type", meal_type)
            .send_empty()
            .await
    }

    pub async fn delete(&self, plan_id: i64) -> Result<()> {
        self.api.delete(format!("/plans/{plan_id}")).send_empty().await
    }
}
