use async_trait::async_trait;
use validator::Validate;

use super::ItemGateway;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{ListFilter, NewUtensil, Utensil};

#[derive(Debug, Clone)]
pub struct UtensilGateway {
    api: ApiClient,
}

impl UtensilGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ItemGateway for UtensilGateway {
    type Item = Utensil;
    type Draft = NewUtensil;

    const NOUN: &'static str = "utensil";
    const SERVER_SEARCH: bool = true;

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Utensil>> {
        self.api
            .get("/utensils/")
            .query_opt("search", filter.search.as_deref())
            .query_opt("category", filter.category.as_deref())
            .send_json()
            .await
    }

    async fn create(&self, draft: &NewUtensil) -> Result<Utensil> {
        draft.validate()?;
        self.api.post("/utensils/").json(draft).send_json().await
    }

    async fn update(&self, id: i64, draft: &NewUtensil) -> Result<Utensil> {
        draft.validate()?;
        self.api
            .put(format!("/utensils/{id}"))
            .json(draft)
            .send_json()
            .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(format!("/utensils/{id}")).send_empty().await
    }
}
