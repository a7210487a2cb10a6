use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Nutrients {
    #[serde(default, deserialize_with = "null_as_default")]
    pub calories: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protein: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nutrients: Nutrients,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prep_time: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cook_time: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl Meal {
    pub fn summary(&self) -> MealSummary {
        MealSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Stored meals may carry `null` where a value is optional.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The projection of a meal that the weekly view renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealSummary {
    pub id: i64,
    pub name: String,
}

impl From<&Meal> for MealSummary {
    fn from(meal: &Meal) -> Self {
        meal.summary()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct NewMeal {
    #[validate(length(min = 1, message = "Meal name is required"))]
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub nutrients: Nutrients,
    pub prep_time: u32,
    pub cook_time: u32,
    pub image: String,
}
