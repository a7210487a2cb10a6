use std::sync::RwLock;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{ActivePlanPolicy, PlanReconciler, Reconciled, WeekView};
use crate::gateway::ItemGateway;
use crate::models::{Day, ListFilter, Meal, MealSummary, MealType, NewPlan, PlanItem};
use crate::store::{InFlight, Liveness, Notice, NoticeBoard, Outcome};

#[derive(Debug)]
struct PlannerState {
    plan_id: Option<i64>,
    plan_loaded: bool,
    week: WeekView,
    available: Vec<Meal>,
    selected_day: Day,
}

/// View state of the weekly planner screen.
pub struct MealPlannerStore {
    reconciler: PlanReconciler,
    state: RwLock<PlannerState>,
    busy: InFlight,
    liveness: Liveness,
    notices: NoticeBoard,
}

impl MealPlannerStore {
    pub fn new(reconciler: PlanReconciler) -> Self {
        Self {
            reconciler,
            state: RwLock::new(PlannerState {
                plan_id: None,
                plan_loaded: false,
                week: WeekView::new(),
                available: Vec::new(),
                selected_day: Day::today(),
            }),
            busy: InFlight::new(),
            liveness: Liveness::new(),
            notices: NoticeBoard::default(),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notices = NoticeBoard::new(ttl);
        self
    }

    pub fn plan_id(&self) -> Option<i64> {
        self.read(|s| s.plan_id)
    }

    /// Whether the week has been fetched at least once.
    pub fn is_plan_loaded(&self) -> bool {
        self.read(|s| s.plan_loaded)
    }

    pub fn week(&self) -> WeekView {
        self.read(|s| s.week.clone())
    }

    /// Meals saved by the user, offered when adding to a slot.
    pub fn available_meals(&self) -> Vec<Meal> {
        self.read(|s| s.available.clone())
    }

    pub fn meals_for(&self, day: Day, meal_type: MealType) -> Vec<MealSummary> {
        self.read(|s| s.week.meals(day, meal_type).to_vec())
    }

    pub fn selected_day(&self) -> Day {
        self.read(|s| s.selected_day)
    }

    pub fn select_day(&self, day: Day) {
        self.write(|s| s.selected_day = day);
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn unmount(&self) {
        self.liveness.unmount();
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.notices.last()
    }

    /// Fetches the active plan and the saved meals side by side.
    pub async fn load(&self) -> Outcome {
        let Ok(_guard) = self.busy.try_begin() else {
            return Outcome::Busy;
        };

        let all = ListFilter::default();
        let fetch = async {
            tokio::join!(
                self.reconciler.reconcile(),
                self.reconciler.meals().list(&all)
            )
        };
        let Some((plan, meals)) = self.liveness.run(fetch).await else {
            return Outcome::Unmounted;
        };

        let meals_error = match meals {
            Ok(meals) => {
                self.write(|s| s.available = meals);
                None
            }
            Err(e) => Some(e),
        };
        let missing_plan = match plan {
            Ok(reconciled) => {
                let missing = reconciled.missing_plan;
                self.apply(reconciled);
                missing
            }
            Err(e) => return self.notices.post(Err(e), "Failed to load meal plan"),
        };
        if let Some(id) = missing_plan {
            return self.notices.show(Notice::error(format!("Plan {id} not found")));
        }
        match meals_error {
            Some(e) => self.notices.post(Err(e), "Failed to load meals"),
            None => Outcome::Completed(None),
        }
    }

    /// Puts a saved meal into a day/meal-type slot.
    ///
    /// Creates the plan on first use, unless a specific plan id is configured.
    /// The slot holds each meal at most once, however often this is called.
    pub async fn add_meal(&self, day: Day, meal_type: MealType, meal_id: i64) -> Outcome {
        let plan_id = self.plan_id();
        if let (None, ActivePlanPolicy::Id(wanted)) = (plan_id, self.reconciler.policy()) {
            return self.notices.show(Notice::error(format!("Plan {wanted} not found")));
        }
        let Some(meal) = self.read(|s| s.available.iter().find(|m| m.id == meal_id).map(Meal::summary))
        else {
            return self.notices.show(Notice::error(format!(
                "Meal {meal_id} is not in your saved meals"
            )));
        };
        let Ok(_guard) = self.busy.try_begin() else {
            return Outcome::Busy;
        };

        let item = PlanItem {
            day,
            meal_id,
            meal_type,
        };
        let request = async {
            match plan_id {
                Some(id) => self.reconciler.plans().add_meal(id, &item).await.map(|()| id),
                None => {
                    let plan = NewPlan {
                        start_date: chrono::Local::now().date_naive(),
                        items: vec![item],
                    };
                    let created = self.reconciler.plans().create(&plan).await?;
                    info!(plan_id = created.id, "Created meal plan");
                    Ok(created.id)
                }
            }
        };
        let Some(result) = self.liveness.run(request).await else {
            return Outcome::Unmounted;
        };

        let result = result.map(|id| {
            let message = format!("Added {} to {} {}", meal.name, day, meal_type);
            let inserted = self.write(|s| {
                s.plan_id = Some(id);
                s.week.insert(day, meal_type, meal)
            });
            if !inserted {
                debug!(meal_id, %day, %meal_type, "Meal already in slot");
            }
            message
        });
        self.notices.post(result, "Failed to add meal to plan")
    }

    /// Removes a meal from a slot, then rebuilds the whole week from the server.
    ///
    /// A confirmed removal is applied locally before the refetch, so a failed
    /// refetch never shows the removed meal again.
    pub async fn remove_meal(&self, day: Day, meal_type: MealType, meal_id: i64) -> Outcome {
        let Some(plan_id) = self.plan_id() else {
            return self.notices.show(Notice::error("No meal plan to remove from"));
        };
        let Ok(_guard) = self.busy.try_begin() else {
            return Outcome::Busy;
        };

        let delete = self
            .reconciler
            .plans()
            .remove_meal(plan_id, meal_id, day, meal_type);
        let Some(deleted) = self.liveness.run(delete).await else {
            return Outcome::Unmounted;
        };
        if let Err(e) = deleted {
            return self.notices.post(Err(e), "Failed to remove meal");
        }
        self.write(|s| s.week.remove(day, meal_type, meal_id));

        let Some(refetched) = self.liveness.run(self.reconciler.reconcile()).await else {
            return Outcome::Unmounted;
        };
        match refetched {
            Ok(reconciled) => {
                self.apply(reconciled);
                self.notices.show(Notice::success("Meal removed from plan"))
            }
            Err(e) => {
                warn!(plan_id, meal_id, error = %e, "Refetch after removal failed");
                self.notices.show(Notice::error(format!(
                    "Meal removed from plan. {}",
                    e.user_message("Failed to reload meal plan")
                )))
            }
        }
    }

    fn apply(&self, reconciled: Reconciled) {
        self.write(|s| {
            s.plan_id = reconciled.plan_id;
            s.plan_loaded = true;
            s.week = reconciled.week;
        });
    }

    fn read<T>(&self, f: impl FnOnce(&PlannerState) -> T) -> T {
        f(&self.state.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn write<T>(&self, f: impl FnOnce(&mut PlannerState) -> T) -> T {
        f(&mut self.state.write().unwrap_or_else(|e| e.into_inner()))
    }
}
