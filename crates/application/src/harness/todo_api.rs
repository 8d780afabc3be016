//! Scored operations against the to-do API.
//!
//! Each operation is one `run_test` call with the endpoint, expected status
//! and content checks of the corresponding API route.

use serde_json::Value;
use todo_probe_domain::{
    Assertion, Category, Check, HttpMethod, NewTask, QueryParams, RequestSpec, StatusCode,
    StatusFilter, TaskId, TaskUpdate,
};
use tracing::debug;

use super::tester::{ApiTester, StepResult};
use crate::ports::{HttpClient, Reporter};

/// Collection endpoint for tasks.
pub const TASKS_ENDPOINT: &str = "api/tasks";

/// Endpoint of a single task.
#[must_use]
pub fn task_endpoint(id: &TaskId) -> String {
    format!("{TASKS_ENDPOINT}/{id}")
}

/// Endpoint flipping a task's completion flag.
#[must_use]
pub fn toggle_endpoint(id: &TaskId) -> String {
    format!("{TASKS_ENDPOINT}/{id}/toggle")
}

impl<C: HttpClient, R: Reporter> ApiTester<C, R> {
    /// GET `/` expecting 200.
    pub async fn test_root_endpoint(&mut self) -> bool {
        self.run_test("Root Endpoint", RequestSpec::get(""), StatusCode::OK.as_u16(), &[])
            .await
            .success
    }

    /// POST a new task expecting 201 and a generated id.
    ///
    /// The id is remembered for cleanup.
    pub async fn create_task(&mut self, task: &NewTask) -> Option<TaskId> {
        let name = format!("Create Task: {}", task.title);
        let body = match serde_json::to_value(task) {
            Ok(body) => body,
            Err(e) => {
                self.run_mut().skip(name, format!("could not encode task: {e}"));
                return None;
            }
        };

        let checks = [Check::blocking(Assertion::field_exists("id"))];
        let result = self
            .run_test(
                &name,
                RequestSpec::new(HttpMethod::Post, TASKS_ENDPOINT).with_body(body),
                StatusCode::CREATED.as_u16(),
                &checks,
            )
            .await;

        if !result.success {
            return None;
        }
        let id = TaskId::from_json(&result.body)?;
        self.run_mut().track_created(id.clone());
        Some(id)
    }

    /// GET the whole collection expecting 200.
    pub async fn get_all_tasks(&mut self, checks: &[Check]) -> StepResult {
        let result = self
            .run_test(
                "Get All Tasks",
                RequestSpec::get(TASKS_ENDPOINT),
                StatusCode::OK.as_u16(),
                checks,
            )
            .await;
        self.note_count(&result, "");
        result
    }

    /// GET the collection filtered by completion status.
    pub async fn get_tasks_by_status(&mut self, status: StatusFilter, checks: &[Check]) -> StepResult {
        let result = self
            .run_test(
                &format!("Get Tasks by Status: {status}"),
                RequestSpec::get(TASKS_ENDPOINT)
                    .with_query(QueryParams::new().with("status", status.as_str())),
                StatusCode::OK.as_u16(),
                checks,
            )
            .await;
        self.note_count(&result, &format!("{status} "));
        result
    }

    /// GET the collection filtered by category.
    ///
    /// Every returned task must carry the requested category.
    pub async fn get_tasks_by_category(
        &mut self,
        category: Category,
        extra_checks: &[Check],
    ) -> StepResult {
        let mut checks = vec![Check::blocking(Assertion::JsonArrayEach {
            field: "category".to_string(),
            expected: Value::String(category.as_str().to_string()),
        })];
        checks.extend_from_slice(extra_checks);

        let result = self
            .run_test(
                &format!("Get Tasks by Category: {category}"),
                RequestSpec::get(TASKS_ENDPOINT)
                    .with_query(QueryParams::new().with("category", category.as_str())),
                StatusCode::OK.as_u16(),
                &checks,
            )
            .await;
        self.note_count(&result, &format!("{category} "));
        result
    }

    /// PUT a partial update expecting 200.
    ///
    /// Every submitted field must be echoed back unchanged.
    pub async fn update_task(&mut self, id: &TaskId, update: &TaskUpdate) -> StepResult {
        let name = format!("Update Task: {id}");
        let body = match serde_json::to_value(update) {
            Ok(body) => body,
            Err(e) => {
                self.run_mut().skip(name, format!("could not encode update: {e}"));
                return StepResult {
                    success: false,
                    body: Value::Object(serde_json::Map::new()),
                    status: None,
                };
            }
        };

        let checks: Vec<Check> = body
            .as_object()
            .into_iter()
            .flatten()
            .map(|(field, value)| Check::blocking(Assertion::field_equals(field.clone(), value.clone())))
            .collect();

        self.run_test(
            &name,
            RequestSpec::new(HttpMethod::Put, task_endpoint(id)).with_body(body),
            StatusCode::OK.as_u16(),
            &checks,
        )
        .await
    }

    /// PATCH the toggle sub-resource expecting 200 and the new flag value.
    pub async fn toggle_task(&mut self, id: &TaskId, expect_completed: bool) -> StepResult {
        let checks = [Check::blocking(Assertion::field_equals(
            "completed",
            Value::Bool(expect_completed),
        ))];
        self.run_test(
            &format!("Toggle Task: {id}"),
            RequestSpec::new(HttpMethod::Patch, toggle_endpoint(id)),
            StatusCode::OK.as_u16(),
            &checks,
        )
        .await
    }

    /// DELETE a task expecting 204.
    pub async fn delete_task(&mut self, id: &TaskId) -> bool {
        self.run_test(
            &format!("Delete Task: {id}"),
            RequestSpec::delete(task_endpoint(id)),
            StatusCode::NO_CONTENT.as_u16(),
            &[],
        )
        .await
        .success
    }

    /// POST a payload the API must reject with 422.
    ///
    /// If the API accepts it anyway, the created task is tracked so that
    /// cleanup removes it.
    pub async fn create_invalid(&mut self, name: &str, body: Value) -> bool {
        let result = self
            .run_test(
                name,
                RequestSpec::new(HttpMethod::Post, TASKS_ENDPOINT).with_body(body),
                StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                &[],
            )
            .await;

        if result.status == Some(StatusCode::CREATED.as_u16())
            && let Some(id) = TaskId::from_json(&result.body)
        {
            self.run_mut().track_created(id);
        }
        result.success
    }

    /// Deletes every task created during the run.
    ///
    /// Not scored; failures are logged and ignored.
    pub async fn cleanup(&mut self) {
        let ids = self.run().created_ids().to_vec();
        self.reporter_mut().cleanup_started(ids.len());

        for id in &ids {
            match self.send(&RequestSpec::delete(task_endpoint(id))).await {
                Ok(response) => debug!(task_id = %id, status = response.status, "Cleanup delete"),
                Err(e) => debug!(task_id = %id, error = %e, "Cleanup delete failed"),
            }
        }
    }

    fn note_count(&mut self, result: &StepResult, qualifier: &str) {
        if !result.success {
            return;
        }
        if let Some(count) = result.item_count() {
            self.note(&format!("Found {count} {qualifier}tasks"));
        }
    }
}
