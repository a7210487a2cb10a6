//! Weekly meal plan: choosing the active plan, rebuilding the
//! day/meal-type view from plan items, and the planner screen store.

mod reconcile;
mod store;

pub use reconcile::{PlanReconciler, Reconciled, WeekView};
pub use store::MealPlannerStore;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::models::Plan;

/// Which of the user's plans the planner shows and edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ActivePlanPolicy {
    /// The first plan in the list response.
    #[default]
    First,
    /// The plan with the latest `start_date`; ties go to the highest id.
    Latest,
    /// One specific plan.
    Id(i64),
}

impl ActivePlanPolicy {
    pub fn select<'a>(&self, plans: &'a [Plan]) -> Option<&'a Plan> {
        match self {
            ActivePlanPolicy::First => plans.first(),
            ActivePlanPolicy::Latest => plans.iter().max_by_key(|p| (p.start_date, p.id)),
            ActivePlanPolicy::Id(id) => plans.iter().find(|p| p.id == *id),
        }
    }
}

impl FromStr for ActivePlanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "latest" => Ok(Self::Latest),
            other => other
                .parse::<i64>()
                .map(Self::Id)
                .map_err(|_| format!("expected 'first', 'latest' or a plan id, got '{s}'")),
        }
    }
}

impl TryFrom<String> for ActivePlanPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ActivePlanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Latest => f.write_str("latest"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}
