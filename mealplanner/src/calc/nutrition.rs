use std::fmt;

use crate::models::{NutritionToday, UserProfile};

/// Share of `goal` reached by `current`, as a percentage in `[0, 100]`.
///
/// A missing, zero, negative or NaN goal yields 0.
pub fn percentage(current: f64, goal: f64) -> f64 {
    if goal.is_nan() || goal <= 0.0 || current.is_nan() {
        return 0.0;
    }
    (current / goal * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroProgress {
    pub label: &'static str,
    pub unit: &'static str,
    pub current: f64,
    pub goal: Option<f64>,
}

impl MacroProgress {
    pub fn percent(&self) -> f64 {
        percentage(self.current, self.goal.unwrap_or(0.0))
    }
}

impl fmt::Display for MacroProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.goal {
            Some(goal) => write!(
                f,
                "{:<9} {:>6.0}/{:.0}{} ({:.0}%)",
                self.label,
                self.current,
                goal,
                self.unit,
                self.percent()
            ),
            None => write!(f, "{:<9} {:>6.0}{} (no goal set)", self.label, self.current, self.unit),
        }
    }
}

/// Today's intake against the profile's daily goals.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionProgress {
    pub calories: MacroProgress,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
}

impl NutritionProgress {
    pub fn new(today: &NutritionToday, profile: &UserProfile) -> Self {
        let progress = |label, unit, current, goal| MacroProgress {
            label,
            unit,
            current,
            goal,
        };
        Self {
            calories: progress("Calories", " kcal", today.calories, profile.daily_calorie_goal),
            protein: progress("Protein", "g", today.protein, profile.daily_protein_goal),
            carbs: progress("Carbs", "g", today.carbs, profile.daily_carbs_goal),
            fat: progress("Fat", "g", today.fat, profile.daily_fat_goal),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MacroProgress> {
        [&self.calories, &self.protein, &self.carbs, &self.fat].into_iter()
    }
}
