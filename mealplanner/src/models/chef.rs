use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{NewMeal, Nutrients};

#[derive(Debug, Clone, Serialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, message = "Ask the chef something"))]
    pub question: String,
}

/// Raw `/ask-ai/` body. `answer` is free text or a JSON-encoded recipe list.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub follow_up: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeSuggestion {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub nutrients: Nutrients,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&RecipeSuggestion> for NewMeal {
    fn from(recipe: &RecipeSuggestion) -> Self {
        NewMeal {
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            nutrients: recipe.nutrients,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            image: recipe.image.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChefAnswer {
    Recipes(Vec<RecipeSuggestion>),
    Text(String),
}

impl ChefAnswer {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Vec<RecipeSuggestion>>(raw.trim()) {
            Ok(recipes) if !recipes.is_empty() => ChefAnswer::Recipes(recipes),
            _ => ChefAnswer::Text(raw.to_string()),
        }
    }

    /// Text shown in the chat bubble.
    pub fn message(&self) -> &str {
        match self {
            ChefAnswer::Recipes(_) => "Here are some recipe suggestions for you:",
            ChefAnswer::Text(text) => text,
        }
    }

    pub fn recipes(&self) -> &[RecipeSuggestion] {
        match self {
            ChefAnswer::Recipes(recipes) => recipes,
            ChefAnswer::Text(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChefReply {
    pub answer: ChefAnswer,
    pub follow_up: Option<String>,
}

impl From<AskResponse> for ChefReply {
    fn from(response: AskResponse) -> Self {
        Self {
            answer: ChefAnswer::parse(&response.answer),
            follow_up: response.follow_up.filter(|f| !f.trim().is_empty()),
        }
    }
}
