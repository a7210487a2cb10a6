use async_trait::async_trait;
use validator::Validate;

use super::ItemGateway;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{GroceryItem, ListFilter, NewItem};

#[derive(Debug, Clone)]
pub struct GroceryGateway {
    api: ApiClient,
}

impl GroceryGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ItemGateway for GroceryGateway {
    type Item = GroceryItem;
    type Draft = NewItem;

    const NOUN: &'static str = "item";
    const SERVER_SEARCH: bool = false;

    async fn list(&self, filter: &ListFilter) -> Result<Vec<GroceryItem>> {
        self.api
            .get("/grocery/")
            .query_opt("search", filter.search.as_deref())
            .send_json()
            .await
    }

    async fn create(&self, draft: &NewItem) -> Result<GroceryItem> {
        draft.validate()?;
        self.api.post("/grocery/").json(draft).send_json().await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(format!("/grocery/{id}")).send_empty().await
    }
}
