use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub daily_calorie_goal: Option<f64>,
    #[serde(default)]
    pub daily_protein_goal: Option<f64>,
    #[serde(default)]
    pub daily_carbs_goal: Option<f64>,
    #[serde(default)]
    pub daily_fat_goal: Option<f64>,
    #[serde(default)]
    pub breakfast_time: Option<String>,
    #[serde(default)]
    pub lunch_time: Option<String>,
    #[serde(default)]
    pub dinner_time: Option<String>,
    #[serde(default)]
    pub snack_time: Option<String>,
    #[serde(default)]
    pub dietary_preferences: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub cuisine_preferences: Option<String>,
}

/// Partial profile update. Only fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub daily_calorie_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub daily_protein_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub daily_carbs_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub daily_fat_goal: Option<f64>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.height.is_none()
            && self.weight.is_none()
            && self.daily_calorie_goal.is_none()
            && self.daily_protein_goal.is_none()
            && self.daily_carbs_goal.is_none()
            && self.daily_fat_goal.is_none()
    }
}

/// Totals logged for the current day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionToday {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}
