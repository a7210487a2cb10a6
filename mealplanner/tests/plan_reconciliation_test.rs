use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mealplanner::error::PlannerError;
use mealplanner::gateway::{MealGateway, PlanGateway};
use mealplanner::models::{Day, MealSummary, MealType};
use mealplanner::planner::{ActivePlanPolicy, MealPlannerStore, PlanReconciler};
use mealplanner::store::{NoticeKind, Outcome};

mod common;
use common::{authed_client, meal, plan};

fn reconciler(server: &MockServer) -> PlanReconciler {
    let api = authed_client(server);
    PlanReconciler::new(PlanGateway::new(api.clone()), MealGateway::new(api))
}

fn day(index: u8) -> Day {
    Day::new(index).unwrap()
}

async fn mount_meal(server: &MockServer, id: i64, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/meals/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(meal(id, name)))
        .mount(server)
        .await;
}

async fn mount_missing_meal(server: &MockServer, id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/meals/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Meal not found" })))
        .mount(server)
        .await;
}

async fn mount_plan(server: &MockServer, id: i64, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([plan(id, "2024-03-04", json!([]))])),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/plans/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(id, "2024-03-04", items)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_deleted_meal_is_dropped_from_week() {
    let server = MockServer::start().await;
    mount_plan(
        &server,
        3,
        json!([
            { "day": 0, "meal_id": 1, "meal_type": "Breakfast" },
            { "day": 0, "meal_id": 999, "meal_type": "Breakfast" }
        ]),
    )
    .await;
    mount_meal(&server, 1, "Oatmeal").await;
    mount_missing_meal(&server, 999).await;

    let reconciled = reconciler(&server).reconcile().await.unwrap();

    assert_eq!(reconciled.plan_id, Some(3));
    assert_eq!(
        reconciled.week.meals(day(0), MealType::Breakfast),
        &[MealSummary {
            id: 1,
            name: "Oatmeal".to_string()
        }]
    );
    let days: Vec<Day> = reconciled.week.iter().map(|(d, _)| *d).collect();
    assert_eq!(days, vec![day(0)]);
    assert_eq!(reconciled.week.day(day(0)).unwrap().len(), 1);
}

#[tokio::test]
async fn test_parallel_resolution_keeps_plan_order() {
    let server = MockServer::start().await;
    mount_plan(
        &server,
        1,
        json!([
            { "day": 2, "meal_id": 10, "meal_type": "Dinner" },
            { "day": 2, "meal_id": 11, "meal_type": "Dinner" },
            { "day": 2, "meal_id": 12, "meal_type": "Dinner" },
            { "day": 4, "meal_id": 10, "meal_type": "Lunch" }
        ]),
    )
    .await;
    // The first lookup answers last.
    Mock::given(method("GET"))
        .and(path("/meals/10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(meal(10, "Curry"))
                .set_delay(std::time::Duration::from_millis(150)),
        )
        .mount(&server)
        .await;
    mount_meal(&server, 11, "Soup").await;
    mount_meal(&server, 12, "Tacos").await;

    let reconciled = reconciler(&server)
        .with_concurrency(4)
        .reconcile()
        .await
        .unwrap();

    let names: Vec<&str> = reconciled
        .week
        .meals(day(2), MealType::Dinner)
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["Curry", "Soup", "Tacos"]);
    assert!(reconciled.week.contains(day(4), MealType::Lunch, 10));
}

#[tokio::test]
async fn test_other_resolution_failures_abort() {
    let server = MockServer::start().await;
    mount_plan(
        &server,
        1,
        json!([
            { "day": 0, "meal_id": 1, "meal_type": "Lunch" },
            { "day": 1, "meal_id": 2, "meal_type": "Lunch" }
        ]),
    )
    .await;
    mount_meal(&server, 1, "Salad").await;
    Mock::given(method("GET"))
        .and(path("/meals/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = reconciler(&server).reconcile().await.unwrap_err();
    assert!(matches!(err, PlannerError::ServerRejection { .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_no_plans_yields_empty_week() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let reconciled = reconciler(&server).reconcile().await.unwrap();
    assert_eq!(reconciled.plan_id, None);
    assert!(reconciled.week.is_empty());
}

#[tokio::test]
async fn test_latest_policy_picks_newest_plan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            plan(1, "2024-02-26", json!([])),
            plan(2, "2024-03-11", json!([])),
            plan(3, "2024-03-04", json!([]))
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plans/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(2, "2024-03-11", json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let reconciled = reconciler(&server)
        .with_policy(ActivePlanPolicy::Latest)
        .reconcile()
        .await
        .unwrap();
    assert_eq!(reconciled.plan_id, Some(2));
}

async fn mount_saved_meals(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/meals/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([meal(1, "Oatmeal"), meal(2, "Tuna Pasta")])),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_first_add_creates_plan_then_uses_add_meal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    mount_saved_meals(&server).await;
    Mock::given(method("POST"))
        .and(path("/plans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(
            8,
            "2024-03-04",
            json!([{ "day": 1, "meal_id": 2, "meal_type": "Lunch" }]),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/plans/8/add-meal"))
        .and(body_json(json!({ "day": 1, "meal_id": 1, "meal_type": "Breakfast" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "added" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MealPlannerStore::new(reconciler(&server));
    store.load().await;
    assert_eq!(store.plan_id(), None);
    assert_eq!(store.available_meals().len(), 2);

    let first = store.add_meal(day(1), MealType::Lunch, 2).await;
    assert!(!first.is_error());
    assert_eq!(store.plan_id(), Some(8));

    let second = store.add_meal(day(1), MealType::Breakfast, 1).await;
    assert_eq!(
        second.notice().unwrap().message,
        "Added Oatmeal to Tue Breakfast"
    );

    let requests = server.received_requests().await.unwrap();
    let created = requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == "/plans/")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&created.body).unwrap();
    assert_eq!(
        body["items"],
        json!([{ "day": 1, "meal_id": 2, "meal_type": "Lunch" }])
    );
    assert!(body["start_date"].is_string());
}

#[tokio::test]
async fn test_adding_same_meal_twice_keeps_one_entry() {
    let server = MockServer::start().await;
    mount_plan(&server, 5, json!([])).await;
    mount_saved_meals(&server).await;
    Mock::given(method("POST"))
        .and(path("/plans/5/add-meal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "added" })))
        .expect(2)
        .mount(&server)
        .await;

    let store = MealPlannerStore::new(reconciler(&server));
    store.load().await;

    store.add_meal(day(3), MealType::Dinner, 2).await;
    store.add_meal(day(3), MealType::Dinner, 2).await;

    let ids: Vec<i64> = store
        .meals_for(day(3), MealType::Dinner)
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_unknown_meal_is_not_sent() {
    let server = MockServer::start().await;
    mount_plan(&server, 5, json!([])).await;
    mount_saved_meals(&server).await;

    let store = MealPlannerStore::new(reconciler(&server));
    store.load().await;
    let before = server.received_requests().await.unwrap().len();

    let outcome = store.add_meal(day(0), MealType::Snacks, 77).await;

    assert!(outcome.is_error());
    assert_eq!(server.received_requests().await.unwrap().len(), before);
}

#[tokio::test]
async fn test_remove_meal_refetches_whole_plan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([plan(4, "2024-03-04", json!([]))])),
        )
        .mount(&server)
        .await;
    // Before the removal the plan has two items, afterwards one.
    Mock::given(method("GET"))
        .and(path("/plans/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(
            4,
            "2024-03-04",
            json!([
                { "day": 0, "meal_id": 1, "meal_type": "Breakfast" },
                { "day": 0, "meal_id": 2, "meal_type": "Dinner" }
            ]),
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plans/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(
            4,
            "2024-03-04",
            json!([{ "day": 0, "meal_id": 2, "meal_type": "Dinner" }]),
        )))
        .mount(&server)
        .await;
    mount_meal(&server, 1, "Oatmeal").await;
    mount_meal(&server, 2, "Tuna Pasta").await;
    mount_saved_meals(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/plans/4/meals/1"))
        .and(query_param("day", "0"))
        .and(query_param("meal_type", "Breakfast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "removed" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MealPlannerStore::new(reconciler(&server));
    store.load().await;
    assert_eq!(store.meals_for(day(0), MealType::Breakfast).len(), 1);

    let outcome = store.remove_meal(day(0), MealType::Breakfast, 1).await;

    assert_eq!(outcome.notice().unwrap().message, "Meal removed from plan");
    assert!(store.meals_for(day(0), MealType::Breakfast).is_empty());
    assert_eq!(store.meals_for(day(0), MealType::Dinner).len(), 1);

    let plan_fetches = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/plans/4")
        .count();
    assert_eq!(plan_fetches, 2);
}

#[tokio::test]
async fn test_failed_plan_load_surfaces_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    mount_saved_meals(&server).await;

    let store = MealPlannerStore::new(reconciler(&server));
    let outcome = store.load().await;

    assert_eq!(outcome.notice().unwrap().message, "Failed to load meal plan");
    assert_eq!(store.available_meals().len(), 2);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_failed_refetch_after_removal_keeps_meal_removed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([plan(4, "2024-03-04", json!([]))])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plans/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(
            4,
            "2024-03-04",
            json!([{ "day": 0, "meal_id": 1, "meal_type": "Breakfast" }]),
        )))
        .mount(&server)
        .await;
    mount_meal(&server, 1, "Oatmeal").await;
    mount_saved_meals(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/plans/4/meals/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "removed" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MealPlannerStore::new(reconciler(&server));
    store.load().await;
    assert_eq!(store.meals_for(day(0), MealType::Breakfast).len(), 1);

    let outcome = store.remove_meal(day(0), MealType::Breakfast, 1).await;

    let notice = outcome.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(
        notice.message,
        "Meal removed from plan. Failed to reload meal plan"
    );
    assert!(store.meals_for(day(0), MealType::Breakfast).is_empty());
    assert_eq!(store.plan_id(), Some(4));
}

#[tokio::test]
async fn test_configured_plan_missing_never_creates_a_plan() {
    let server = MockServer::start().await;
    mount_plan(&server, 4, json!([])).await;
    mount_saved_meals(&server).await;
    Mock::given(method("POST"))
        .and(path("/plans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(9, "2024-03-04", json!([]))))
        .expect(0)
        .mount(&server)
        .await;

    let reconciled = reconciler(&server)
        .with_policy(ActivePlanPolicy::Id(42))
        .reconcile()
        .await
        .unwrap();
    assert_eq!(reconciled.plan_id, None);
    assert_eq!(reconciled.missing_plan, Some(42));

    // Two separate launches of the planner screen.
    for _ in 0..2 {
        let store =
            MealPlannerStore::new(reconciler(&server).with_policy(ActivePlanPolicy::Id(42)));
        let loaded = store.load().await;
        assert_eq!(loaded.notice().unwrap().message, "Plan 42 not found");
        assert!(store.is_plan_loaded());

        let added = store.add_meal(day(0), MealType::Lunch, 1).await;
        assert!(added.is_error());
        assert_eq!(added.notice().unwrap().message, "Plan 42 not found");
        assert_eq!(store.plan_id(), None);
    }
}

#[tokio::test]
async fn test_unmount_during_load_applies_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([plan(4, "2024-03-04", json!([]))]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plans/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan(
            4,
            "2024-03-04",
            json!([{ "day": 0, "meal_id": 1, "meal_type": "Breakfast" }]),
        )))
        .mount(&server)
        .await;
    mount_meal(&server, 1, "Oatmeal").await;
    mount_saved_meals(&server).await;

    let store = MealPlannerStore::new(reconciler(&server));
    let (outcome, ()) = tokio::join!(store.load(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        store.unmount();
    });

    assert_eq!(outcome, Outcome::Unmounted);
    assert_eq!(store.plan_id(), None);
    assert!(!store.is_plan_loaded());
    assert!(store.week().is_empty());
    assert!(store.available_meals().is_empty());
    assert!(store.last_notice().is_none());
}

#[tokio::test]
async fn test_unmount_during_add_meal_applies_nothing() {
    let server = MockServer::start().await;
    mount_plan(&server, 5, json!([])).await;
    mount_saved_meals(&server).await;
    Mock::given(method("POST"))
        .and(path("/plans/5/add-meal"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "added" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let store = MealPlannerStore::new(reconciler(&server));
    store.load().await;
    let (outcome, ()) = tokio::join!(store.add_meal(day(2), MealType::Dinner, 2), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        store.unmount();
    });

    assert_eq!(outcome, Outcome::Unmounted);
    assert_eq!(store.plan_id(), Some(5));
    assert!(store.week().is_empty());
    assert!(store.last_notice().is_none());
}

#[tokio::test]
async fn test_unmount_during_remove_meal_applies_nothing() {
    let server = MockServer::start().await;
    mount_plan(
        &server,
        4,
        json!([{ "day": 0, "meal_id": 1, "meal_type": "Breakfast" }]),
    )
    .await;
    mount_meal(&server, 1, "Oatmeal").await;
    mount_saved_meals(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/plans/4/meals/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "removed" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let store = MealPlannerStore::new(reconciler(&server));
    store.load().await;
    let week = store.week();
    let (outcome, ()) = tokio::join!(store.remove_meal(day(0), MealType::Breakfast, 1), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        store.unmount();
    });

    assert_eq!(outcome, Outcome::Unmounted);
    assert_eq!(store.week(), week);
    assert_eq!(store.meals_for(day(0), MealType::Breakfast).len(), 1);
    assert!(store.last_notice().is_none());
}

#[tokio::test]
async fn test_stored_meal_with_null_fields_still_resolves() {
    let server = MockServer::start().await;
    mount_plan(
        &server,
        6,
        json!([{ "day": 2, "meal_id": 3, "meal_type": "Lunch" }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/meals/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "name": "Leftover Soup",
            "ingredients": null,
            "instructions": null,
            "nutrients": null,
            "prep_time": null,
            "cook_time": null,
            "image": null
        })))
        .mount(&server)
        .await;

    let reconciled = reconciler(&server).reconcile().await.unwrap();

    let names: Vec<&str> = reconciled
        .week
        .meals(day(2), MealType::Lunch)
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["Leftover Soup"]);
}
