use async_trait::async_trait;
use validator::Validate;

use super::ItemGateway;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{ListFilter, NewItem, PantryItem};

#[derive(Debug, Clone)]
pub struct PantryGateway {
    api: ApiClient,
}

impl PantryGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ItemGateway for PantryGateway {
    type Item = PantryItem;
    type Draft = NewItem;

    const NOUN: &'static str = "item";
    const SERVER_SEARCH: bool = false;

    async fn list(&self, filter: &ListFilter) -> Result<Vec<PantryItem>> {
        self.api
            .get("/pantry/")
            .query_opt("search", filter.search.as_deref())
            .query_opt("category", filter.category.as_deref())
            .send_json()
            .await
    }

    async fn create(&self, draft: &NewItem) -> Result<PantryItem> {
        draft.validate()?;
        self.api.post("/pantry/").json(draft).send_json().await
    }

    async fn update(&self, id: i64, draft: &NewItem) -> Result<PantryItem> {
        draft.validate()?;
        self.api
            .put(format!("/pantry/{id}"))
            .json(draft)
            .send_json()
            .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(format!("/pantry/{id}")).send_empty().await
    }
}
