use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use super::ActivePlanPolicy;
use crate::error::Result;
use crate::gateway::{MealGateway, PlanGateway};
use crate::models::{Day, MealSummary, MealType, PlanItem};

/// Resolved meals grouped by day, then meal type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekView(BTreeMap<Day, BTreeMap<MealType, Vec<MealSummary>>>);

impl WeekView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends without checking for an existing entry.
    pub fn push(&mut self, day: Day, meal_type: MealType, meal: MealSummary) {
        self.0
            .entry(day)
            .or_default()
            .entry(meal_type)
            .or_default()
            .push(meal);
    }

    /// Appends unless a meal with the same id is already in the slot.
    /// Returns `false` when it was already there.
    pub fn insert(&mut self, day: Day, meal_type: MealType, meal: MealSummary) -> bool {
        let slot = self.0.entry(day).or_default().entry(meal_type).or_default();
        if slot.iter().any(|m| m.id == meal.id) {
            return false;
        }
        slot.push(meal);
        true
    }

    pub fn meals(&self, day: Day, meal_type: MealType) -> &[MealSummary] {
        self.0
            .get(&day)
            .and_then(|slots| slots.get(&meal_type))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn day(&self, day: Day) -> Option<&BTreeMap<MealType, Vec<MealSummary>>> {
        self.0.get(&day)
    }

    /// Drops a meal from its slot, pruning slots and days left empty.
    pub fn remove(&mut self, day: Day, meal_type: MealType, meal_id: i64) -> bool {
        let Some(slots) = self.0.get_mut(&day) else {
            return false;
        };
        let Some(slot) = slots.get_mut(&meal_type) else {
            return false;
        };
        let before = slot.len();
        slot.retain(|m| m.id != meal_id);
        let removed = slot.len() != before;
        if slot.is_empty() {
            slots.remove(&meal_type);
        }
        if slots.is_empty() {
            self.0.remove(&day);
        }
        removed
    }

    pub fn contains(&self, day: Day, meal_type: MealType, meal_id: i64) -> bool {
        self.meals(day, meal_type).iter().any(|m| m.id == meal_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Day, &BTreeMap<MealType, Vec<MealSummary>>)> {
        self.0.iter()
    }
}

/// The active plan as last fetched from the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    /// `None` when the user has no plan yet.
    pub plan_id: Option<i64>,
    pub week: WeekView,
    /// Set when the configured plan id is not among the user's plans.
    pub missing_plan: Option<i64>,
}

/// Rebuilds the week view from the server.
///
/// Meals referenced by plan items may have been deleted since the item was
/// written. Those items are dropped from the view; any other failure aborts
/// the whole reconciliation.
#[derive(Debug, Clone)]
pub struct PlanReconciler {
    plans: PlanGateway,
    meals: MealGateway,
    policy: ActivePlanPolicy,
    concurrency: usize,
}

impl PlanReconciler {
    pub fn new(plans: PlanGateway, meals: MealGateway) -> Self {
        Self {
            plans,
            meals,
            policy: ActivePlanPolicy::default(),
            concurrency: 1,
        }
    }

    pub fn with_policy(mut self, policy: ActivePlanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Meal lookups allowed in flight at once. Results are applied in plan
    /// order regardless.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn policy(&self) -> ActivePlanPolicy {
        self.policy
    }

    pub fn plans(&self) -> &PlanGateway {
        &self.plans
    }

    pub fn meals(&self) -> &MealGateway {
        &self.meals
    }

    pub async fn reconcile(&self) -> Result<Reconciled> {
        let plans = self.plans.list().await?;
        let Some(active) = self.policy.select(&plans) else {
            let missing_plan = match self.policy {
                ActivePlanPolicy::Id(id) => {
                    warn!(plan_id = id, plans = plans.len(), "Configured plan not found");
                    Some(id)
                }
                _ => {
                    debug!(policy = %self.policy, plans = plans.len(), "No active plan");
                    None
                }
            };
            return Ok(Reconciled {
                missing_plan,
                ..Reconciled::default()
            });
        };

        let plan = self.plans.get(active.id).await?;
        let week = self.resolve(&plan.items).await?;
        Ok(Reconciled {
            plan_id: Some(plan.id),
            week,
            missing_plan: None,
        })
    }

    async fn resolve(&self, items: &[PlanItem]) -> Result<WeekView> {
        let lookups: Vec<_> = stream::iter(items.iter().copied())
            .map(|item| async move { (item, self.meals.get(item.meal_id).await) })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut week = WeekView::new();
        for (item, lookup) in lookups {
            match lookup {
                Ok(meal) => week.push(item.day, item.meal_type, meal.summary()),
                Err(e) if e.is_not_found() => {
                    debug!(meal_id = item.meal_id, day = %item.day, "Skipping plan item: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(week)
    }
}
