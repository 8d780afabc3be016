//! The fixed end-to-end scenario.
//!
//! Steps run in a fixed order. A step that needs the id of a task created
//! earlier is skipped, and reported as such, when that creation failed.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use todo_probe_domain::{
    Assertion, Category, Check, ComparisonOperator, NewTask, StatusFilter, TaskId, TaskUpdate,
    TestRun,
};

use super::tester::ApiTester;
use crate::ports::{Clock, HttpClient, Reporter};

/// Title of the task posted with a category the API must reject.
const INVALID_TASK_TITLE: &str = "Invalid task";

/// The five tasks the scenario creates, one per category.
///
/// Due dates cover tomorrow, today (twice), yesterday and none.
#[must_use]
pub fn fixtures(now: DateTime<Utc>) -> [NewTask; 5] {
    let today = now;
    let tomorrow = now + Duration::days(1);
    let yesterday = now - Duration::days(1);

    [
        NewTask::new(
            "Complete project report",
            "Write and submit the Q4 project report",
            Some(tomorrow),
            Category::Work,
        ),
        NewTask::new(
            "Buy groceries",
            "Milk, eggs, bread, vegetables",
            Some(today),
            Category::Shopping,
        ),
        NewTask::new(
            "Morning jog",
            "30 minutes cardio exercise",
            Some(today),
            Category::Health,
        ),
        NewTask::new(
            "Call mom",
            "Weekly catch-up call",
            Some(yesterday),
            Category::Personal,
        ),
        NewTask::new("Read book", "Finish chapter 5", None, Category::Other),
    ]
}

/// Ids returned for the fixtures, in fixture order.
struct Created {
    work: Option<TaskId>,
    shopping: Option<TaskId>,
    other: Option<TaskId>,
    count: usize,
    categories: Vec<Category>,
}

impl Created {
    fn has(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Runs the full scenario and returns the accumulated results.
///
/// Cleanup runs last whatever the outcome; the reporter receives the final
/// summary before this returns.
pub async fn run_scenario<C, R>(mut tester: ApiTester<C, R>, clock: &dyn Clock) -> (TestRun, R)
where
    C: HttpClient,
    R: Reporter,
{
    let base_url = tester.base_url().to_string();
    tester.reporter_mut().run_started(&base_url);

    tester.test_root_endpoint().await;

    let fixtures = fixtures(clock.now());
    let created = create_fixtures(&mut tester, &fixtures).await;

    // Listing
    tester
        .get_all_tasks(&[Check::blocking(Assertion::array_len(
            ComparisonOperator::GreaterThanOrEqual,
            fixtures.len(),
        ))])
        .await;
    tester.get_tasks_by_status(StatusFilter::All, &[]).await;
    tester
        .get_tasks_by_status(StatusFilter::Active, &[expect_count(created.count)])
        .await;

    // Completion toggle
    let mut completed = 0;
    if let Some(id) = require(&mut tester, created.work.as_ref(), "Toggle Task", &fixtures[0])
        && tester.toggle_task(id, true).await.success
    {
        completed = 1;
    }

    tester
        .get_tasks_by_status(StatusFilter::Completed, &[expect_count(completed)])
        .await;
    tester
        .get_tasks_by_status(
            StatusFilter::Active,
            &[expect_count(created.count.saturating_sub(completed))],
        )
        .await;

    // Category filters
    for category in [Category::Work, Category::Shopping] {
        let expected = usize::from(created.has(category));
        tester
            .get_tasks_by_category(category, &[expect_count(expected)])
            .await;
    }

    // Update
    if let Some(id) = require(&mut tester, created.shopping.as_ref(), "Update Task", &fixtures[1]) {
        let update = TaskUpdate::default()
            .title("Buy groceries - UPDATED")
            .description("Milk, eggs, bread, vegetables, fruits")
            .category(Category::Shopping);
        tester.update_task(id, &update).await;
    }

    // Toggle back to incomplete
    if let Some(id) = require(&mut tester, created.work.as_ref(), "Toggle Task", &fixtures[0]) {
        tester.toggle_task(id, false).await;
    }

    // Delete and verify
    if let Some(id) = require(&mut tester, created.other.as_ref(), "Delete Task", &fixtures[4]) {
        if tester.delete_task(id).await {
            let checks = [
                expect_count(created.count - 1),
                Check::blocking(Assertion::JsonArrayExcludes {
                    field: "id".to_string(),
                    value: Value::String(id.as_str().to_string()),
                }),
            ];
            tester.get_all_tasks(&checks).await;
        } else {
            skip(&mut tester, "Get All Tasks", format!("deletion of task {id} did not succeed"));
        }
    }

    // Validation
    tester
        .create_invalid(
            "Create Task with Invalid Category",
            json!({
                "title": INVALID_TASK_TITLE,
                "description": "This should fail",
                "category": "InvalidCategory"
            }),
        )
        .await;
    // A rejected task must not have been stored
    tester
        .get_all_tasks(&[Check::blocking(Assertion::JsonArrayExcludes {
            field: "title".to_string(),
            value: Value::String(INVALID_TASK_TITLE.to_string()),
        })])
        .await;
    tester
        .create_invalid(
            "Create Task without Title",
            json!({
                "description": "This should fail",
                "category": "Work"
            }),
        )
        .await;

    tester.cleanup().await;

    let (run, mut reporter) = tester.into_parts();
    reporter.run_finished(&run);
    (run, reporter)
}

async fn create_fixtures<C, R>(tester: &mut ApiTester<C, R>, fixtures: &[NewTask; 5]) -> Created
where
    C: HttpClient,
    R: Reporter,
{
    let mut ids = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        ids.push(tester.create_task(fixture).await);
    }

    let categories = fixtures
        .iter()
        .zip(&ids)
        .filter(|(_, id)| id.is_some())
        .map(|(fixture, _)| fixture.category)
        .collect();
    let count = ids.iter().flatten().count();
    let mut ids = ids.into_iter();

    let work = ids.next().flatten();
    let shopping = ids.next().flatten();
    let other = ids.nth(2).flatten();

    Created {
        work,
        shopping,
        other,
        count,
        categories,
    }
}

/// Returns the id or records the step as skipped.
fn require<'a, C, R>(
    tester: &mut ApiTester<C, R>,
    id: Option<&'a TaskId>,
    step: &str,
    source: &NewTask,
) -> Option<&'a TaskId>
where
    C: HttpClient,
    R: Reporter,
{
    if id.is_none() {
        skip(
            tester,
            step,
            format!("no task id from 'Create Task: {}'", source.title),
        );
    }
    id
}

fn skip<C, R>(tester: &mut ApiTester<C, R>, step: &str, reason: String)
where
    C: HttpClient,
    R: Reporter,
{
    tester.run_mut().skip(step, reason);
    if let Some(skipped) = tester.run().skipped().last().cloned() {
        tester.reporter_mut().step_skipped(&skipped);
    }
}

/// Exact result count that depends on server state outside the run.
fn expect_count(count: usize) -> Check {
    Check::advisory(Assertion::array_len(ComparisonOperator::Equals, count))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::harness::test_support::{
        FixedClock, MockHttpClient, RecordingReporter, json_response,
    };
    use pretty_assertions::assert_eq;
    use todo_probe_domain::HttpMethod;

    #[test]
    fn test_fixtures_cover_all_categories_and_due_dates() {
        let clock = FixedClock::noon();
        let fixtures = fixtures(clock.now());

        let categories: Vec<_> = fixtures.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Work,
                Category::Shopping,
                Category::Health,
                Category::Personal,
                Category::Other
            ]
        );
        assert_eq!(fixtures[0].due_date, Some(clock.0 + Duration::days(1)));
        assert_eq!(fixtures[1].due_date, Some(clock.0));
        assert_eq!(fixtures[3].due_date, Some(clock.0 - Duration::days(1)));
        assert_eq!(fixtures[4].due_date, None);
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_and_skips() {
        let client = Arc::new(MockHttpClient::unreachable());
        let tester = ApiTester::new(
            Arc::clone(&client),
            RecordingReporter::default(),
            "http://api.test",
        );

        let (run, reporter) = run_scenario(tester, &FixedClock::noon()).await;

        // root, 5 creates, list, 4 status filters, 2 categories, 2 invalid,
        // listing after the invalid category
        assert_eq!(run.tests_run(), 16);
        assert_eq!(run.tests_passed(), 0);
        let skipped: Vec<_> = run.skipped().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            skipped,
            vec!["Toggle Task", "Update Task", "Toggle Task", "Delete Task"]
        );
        assert!(run.created_ids().is_empty());
        assert!(!run.all_passed());
        assert_eq!(reporter.events.last().unwrap(), "finished 0/16");
        assert!(reporter.events.contains(&"cleanup 0".to_string()));
    }

    fn task_list(ids: &[&str]) -> String {
        let items: Vec<_> = ids
            .iter()
            .map(|id| format!(r#"{{"id": "{id}", "title": "Task {id}", "category": "Work"}}"#))
            .collect();
        format!("[{}]", items.join(","))
    }

    /// Responses of a compliant API, in scenario order.
    ///
    /// `after_invalid` is the listing returned right after the
    /// invalid-category create.
    fn scripted_api(after_invalid: &str) -> MockHttpClient {
        let all = task_list(&["t1", "t2", "t3", "t4", "t5"]);
        let after_delete = task_list(&["t1", "t2", "t3", "t4"]);
        MockHttpClient::with_responses(vec![
            Ok(json_response(200, r#"{"message": "Hello"}"#)),
            Ok(json_response(201, r#"{"id": "t1"}"#)),
            Ok(json_response(201, r#"{"id": "t2"}"#)),
            Ok(json_response(201, r#"{"id": "t3"}"#)),
            Ok(json_response(201, r#"{"id": "t4"}"#)),
            Ok(json_response(201, r#"{"id": "t5"}"#)),
            Ok(json_response(200, &all)),
            Ok(json_response(200, &all)),
            Ok(json_response(200, &all)),
            Ok(json_response(200, r#"{"id": "t1", "completed": true}"#)),
            Ok(json_response(200, &task_list(&["t1"]))),
            Ok(json_response(200, &task_list(&["t2", "t3", "t4", "t5"]))),
            Ok(json_response(200, &task_list(&["t1"]))),
            Ok(json_response(200, r#"[{"id": "t2", "category": "Shopping"}]"#)),
            Ok(json_response(
                200,
                r#"{"id": "t2", "title": "Buy groceries - UPDATED", "description": "Milk, eggs, bread, vegetables, fruits", "category": "Shopping"}"#,
            )),
            Ok(json_response(200, r#"{"id": "t1", "completed": false}"#)),
            Ok(json_response(204, "")),
            Ok(json_response(200, &after_delete)),
            Ok(json_response(422, r#"{"detail": "invalid category"}"#)),
            Ok(json_response(200, after_invalid)),
            Ok(json_response(422, r#"{"detail": "title required"}"#)),
        ])
    }

    #[tokio::test]
    async fn test_scripted_happy_path() {
        let client = Arc::new(scripted_api(&task_list(&["t1", "t2", "t3", "t4"])));
        let tester = ApiTester::new(
            Arc::clone(&client),
            RecordingReporter::default(),
            "http://api.test",
        );

        let (run, _) = run_scenario(tester, &FixedClock::noon()).await;

        let failures: Vec<_> = run
            .steps()
            .iter()
            .filter(|s| !s.passed)
            .map(|s| (s.name.clone(), s.failures.clone()))
            .collect();
        assert_eq!(failures, vec![]);
        assert_eq!(run.tests_run(), 21);
        assert_eq!(run.tests_passed(), 21);
        assert_eq!(run.warnings(), 0);
        assert!(run.all_passed());

        // The rejected task is looked for right after the invalid create.
        let requests = client.requests();
        assert_eq!(
            requests[19],
            (HttpMethod::Get, "http://api.test/api/tasks".to_string())
        );

        // Cleanup deletes every created id, including the one already deleted.
        let deletes = requests
            .into_iter()
            .skip(21)
            .filter(|(method, _)| *method == HttpMethod::Delete)
            .count();
        assert_eq!(deletes, 5);
    }

    #[tokio::test]
    async fn test_stored_rejected_task_fails_the_run() {
        let stored = r#"[
            {"id": "t1", "title": "Task t1", "category": "Work"},
            {"id": "x9", "title": "Invalid task", "category": "InvalidCategory"}
        ]"#;
        let tester = ApiTester::new(
            Arc::new(scripted_api(stored)),
            RecordingReporter::default(),
            "http://api.test",
        );

        let (run, _) = run_scenario(tester, &FixedClock::noon()).await;

        let failures: Vec<_> = run
            .steps()
            .iter()
            .filter(|s| !s.passed)
            .map(|s| (s.name.clone(), s.failures.clone()))
            .collect();
        assert_eq!(
            failures,
            vec![(
                "Get All Tasks".to_string(),
                vec![r#"Found an element with title = "Invalid task""#.to_string()]
            )]
        );
        assert_eq!(run.tests_run(), 21);
        assert!(!run.all_passed());
    }
}
