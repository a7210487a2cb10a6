use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::planner::ActivePlanPolicy;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub planner: PlannerConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Default timeout for every request. Sized for the slow recipe and
    /// image-generation endpoints.
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    pub active_plan: ActivePlanPolicy,
    /// Meal lookups in flight at once during reconciliation. 1 keeps them sequential.
    pub resolve_concurrency: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            active_plan: ActivePlanPolicy::First,
            resolve_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub recipe_limit: usize,
    pub notice_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recipe_limit: 6,
            notice_secs: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("MEALPLANNER_API_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
                timeout_secs: parse_env_or("MEALPLANNER_TIMEOUT_SECS", 60),
            },
            session: SessionConfig {
                path: env::var("MEALPLANNER_SESSION_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".mealplanner/session.json")),
            },
            planner: PlannerConfig {
                active_plan: parse_env_or("MEALPLANNER_ACTIVE_PLAN", ActivePlanPolicy::First),
                resolve_concurrency: parse_env_or::<usize>("MEALPLANNER_RESOLVE_CONCURRENCY", 4)
                    .max(1),
            },
            display: DisplayConfig {
                recipe_limit: parse_env_or("MEALPLANNER_RECIPE_LIMIT", 6),
                notice_secs: parse_env_or("MEALPLANNER_NOTICE_SECS", 3),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
