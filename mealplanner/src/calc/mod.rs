//! Pure functions over current view state. Nothing here touches the network.

mod nutrition;
mod pantry_match;
mod recipe;
mod search;
mod share;

pub use nutrition::{percentage, MacroProgress, NutritionProgress};
pub use pantry_match::{match_recipes, starter_recipes, MatchMode, Recipe, RecipeMatch};
pub use recipe::{image_url, instruction_steps, total_time, FALLBACK_IMAGE};
pub use search::filter_by_name;
pub use share::share_text;
