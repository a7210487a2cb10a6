use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day of the plan week, 0 = Monday through 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(u8);

impl Day {
    pub const NAMES: [&'static str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    pub fn new(index: u8) -> Option<Self> {
        (index < 7).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self.0 as usize]
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.weekday().num_days_from_monday() as u8)
    }

    /// The day tab selected when the planner opens.
    pub fn today() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn all() -> impl Iterator<Item = Day> {
        (0..7).map(Day)
    }
}

impl TryFrom<u8> for Day {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Day::new(value).ok_or_else(|| format!("Day must be between 0 and 6, got {value}"))
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<u8>() {
            return Day::try_from(index);
        }
        let lower = s.to_lowercase();
        Day::NAMES
            .iter()
            .position(|name| lower.starts_with(&name.to_lowercase()))
            .map(|i| Day(i as u8))
            .ok_or_else(|| format!("Unknown day: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snacks => "Snacks",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" | "snacks" => Ok(Self::Snacks),
            _ => Err(format!("Unknown meal type: {s}")),
        }
    }
}

/// A weak reference from a plan slot to a meal. The meal may have been
/// deleted since the item was written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanItem {
    pub day: Day,
    pub meal_id: i64,
    pub meal_type: MealType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<PlanItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPlan {
    pub start_date: NaiveDate,
    pub items: Vec<PlanItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds() {
        assert!(Day::new(6).is_some());
        assert!(Day::new(7).is_none());
        assert_eq!(Day::all().count(), 7);
    }

    #[test]
    fn test_day_from_date_is_monday_based() {
        // 2024-01-01 was a Monday.
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(Day::from_date(monday).index(), 0);
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(Day::from_date(sunday).index(), 6);
    }

    #[test]
    fn test_day_parsing() {
        assert_eq!("2".parse::<Day>().unwrap().name(), "Wed");
        assert_eq!("friday".parse::<Day>().unwrap().index(), 4);
        assert!("9".parse::<Day>().is_err());
        assert!("someday".parse::<Day>().is_err());
    }

    #[test]
    fn test_plan_item_rejects_out_of_range_day() {
        let bad = r#"{"day": 7, "meal_id": 1, "meal_type": "Lunch"}"#;
        assert!(serde_json::from_str::<PlanItem>(bad).is_err());

        let good = r#"{"day": 0, "meal_id": 1, "meal_type": "Breakfast"}"#;
        let item: PlanItem = serde_json::from_str(good).unwrap();
        assert_eq!(item.meal_type, MealType::Breakfast);
    }

    #[test]
    fn test_meal_type_parsing_and_order() {
        assert_eq!("snack".parse::<MealType>().unwrap(), MealType::Snacks);
        assert!(MealType::Breakfast < MealType::Snacks);
        assert!("brunch".parse::<MealType>().is_err());
    }
}
