//! One thin façade per API resource.
//!
//! Gateways translate between typed drafts/entities and HTTP calls. They hold
//! no state beyond a clone of the shared [`ApiClient`](crate::http::ApiClient);
//! collections live in the screen-local stores.

mod auth;
mod chef;
mod detect;
mod grocery;
mod meals;
mod pantry;
mod plans;
mod profile;
mod utensils;

pub use auth::AuthGateway;
pub use chef::ChefGateway;
pub use detect::DetectionGateway;
pub use grocery::GroceryGateway;
pub use meals::MealGateway;
pub use pantry::PantryGateway;
pub use plans::PlanGateway;
pub use profile::ProfileGateway;
pub use utensils::UtensilGateway;

use async_trait::async_trait;

use crate::error::{PlannerError, Result};
use crate::models::{ListFilter, Meal, PantryItem, Utensil};

/// Entities with a server-assigned id and a display name.
pub trait Named {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

impl Named for PantryItem {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Utensil {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Meal {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// CRUD over one remote collection.
#[async_trait]
pub trait ItemGateway: Send + Sync {
    type Item: Named + Clone + Send + Sync;
    type Draft: Send + Sync;

    /// Singular noun used in notices, e.g. "item" or "utensil".
    const NOUN: &'static str;

    /// `true` when `list` applies `search`/`category` server-side.
    const SERVER_SEARCH: bool;

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Self::Item>>;
    async fn create(&self, draft: &Self::Draft) -> Result<Self::Item>;
    async fn delete(&self, id: i64) -> Result<()>;

    async fn update(&self, _id: i64, _draft: &Self::Draft) -> Result<Self::Item> {
        Err(PlannerError::Validation(format!(
            "This {} cannot be edited",
            Self::NOUN
        )))
    }
}

/// Result of creating several entities one after another.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub created: Vec<T>,
    /// The failure that stopped the batch, if any. Later drafts were not sent.
    pub error: Option<PlannerError>,
}

impl<T> BatchOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Creates drafts sequentially, stopping at the first failure.
pub async fn create_all<G: ItemGateway>(
    gateway: &G,
    drafts: &[G::Draft],
) -> BatchOutcome<G::Item> {
    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        match gateway.create(draft).await {
            Ok(item) => created.push(item),
            Err(e) => {
                tracing::warn!(
                    "Batch create stopped after {} {}(s): {}",
                    created.len(),
                    G::NOUN,
                    e
                );
                return BatchOutcome {
                    created,
                    error: Some(e),
                };
            }
        }
    }
    BatchOutcome {
        created,
        error: None,
    }
}
