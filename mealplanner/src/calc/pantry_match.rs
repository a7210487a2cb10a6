use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A recipe the home screen can suggest from pantry contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub image: String,
    pub ingredients: Vec<String>,
}

impl Recipe {
    fn new(id: &str, name: &str, image: &str, ingredients: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    pub can_make: bool,
    /// Ingredients not in the pantry, in recipe order. Empty when `can_make`.
    pub missing: Vec<String>,
}

/// How ingredient names are compared against pantry names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Exact,
    CaseInsensitive,
}

impl MatchMode {
    fn key(self, name: &str) -> String {
        match self {
            MatchMode::Exact => name.to_string(),
            MatchMode::CaseInsensitive => name.to_lowercase(),
        }
    }
}

/// Recipes that can be made first, then those closest to makeable, capped at `limit`.
///
/// The "almost there" group is ordered by how many ingredients are missing;
/// ties keep catalog order.
pub fn match_recipes<S: AsRef<str>>(
    recipes: &[Recipe],
    pantry: &[S],
    mode: MatchMode,
    limit: usize,
) -> Vec<RecipeMatch> {
    let have: HashSet<String> = pantry.iter().map(|n| mode.key(n.as_ref())).collect();

    let (mut can_make, mut almost): (Vec<_>, Vec<_>) = recipes
        .iter()
        .map(|recipe| {
            let missing: Vec<String> = recipe
                .ingredients
                .iter()
                .filter(|ing| !have.contains(&mode.key(ing)))
                .cloned()
                .collect();
            RecipeMatch {
                recipe: recipe.clone(),
                can_make: missing.is_empty(),
                missing,
            }
        })
        .partition(|m| m.can_make);

    almost.sort_by_key(|m| m.missing.len());
    can_make.append(&mut almost);
    can_make.truncate(limit);
    can_make
}

/// The built-in catalog matched against the pantry on the home screen.
pub fn starter_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new(
            "1",
            "Tomato Rice",
            "https://images.unsplash.com/photo-1519708227418-c8fd9a32b7a2",
            &["Tomato Sauce", "Rice", "Olive Oil", "Black Pepper"],
        ),
        Recipe::new(
            "2",
            "Tuna Rice Bowl",
            "https://images.unsplash.com/photo-1512621776951-a57141f2eefd",
            &["Canned Tuna", "Rice", "Olive Oil"],
        ),
        Recipe::new(
            "3",
            "Pepper Pasta",
            "https://images.unsplash.com/photo-1550304943-4f24f54ddde9",
            &["Pasta", "Black Pepper", "Olive Oil"],
        ),
        Recipe::new(
            "4",
            "Simple Tuna",
            "https://images.unsplash.com/photo-1504674900247-0877df9cc836",
            &["Canned Tuna", "Olive Oil"],
        ),
        Recipe::new(
            "5",
            "Rice & Oil",
            "https://images.unsplash.com/photo-1464306076886-debca5e8a6b0",
            &["Rice", "Olive Oil"],
        ),
        Recipe::new(
            "6",
            "Tomato Pepper Mix",
            "https://images.unsplash.com/photo-1519864600265-abb23847ef2c",
            &["Tomato Sauce", "Black Pepper"],
        ),
        Recipe::new(
            "7",
            "Tuna Pasta",
            "https://images.unsplash.com/photo-1519864600265-abb23847ef2c",
            &["Canned Tuna", "Pasta", "Olive Oil"],
        ),
    ]
}
