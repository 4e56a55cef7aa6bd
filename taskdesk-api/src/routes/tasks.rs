/// Task endpoints: add-or-edit, remove, list, detail
///
/// Everything here runs behind the auth gate; handlers receive the caller's
/// identity through the `AuthContext` extension. Removal is a soft delete,
/// and listing excludes soft-deleted rows, so a "removed" title can be
/// reused immediately.

use crate::app::AppState;
use crate::error::{ApiError, ApiResponse, ApiResult};
use axum::{extract::State, Extension, Form, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::models::task::{
    CreateTask, Task, TaskFilter, TaskStatus, UpdateTask, PAGE_SIZE,
};
use tracing::info;

/// Form body for `POST /task/add-or-edit-task`
///
/// A present, non-blank `task_id` selects the edit branch; otherwise the
/// request creates a new task. Every field arrives as an optional string so
/// the two branches can enforce their own requirements.
#[derive(Debug, Deserialize)]
pub struct AddOrEditTaskForm {
    /// Existing task ID (edit) or absent/blank (create)
    pub task_id: Option<String>,

    /// Task title
    pub task_title: Option<String>,

    /// Task description
    pub task_description: Option<String>,

    /// Due date in `YYYY-MM-DD` format
    pub task_due_date: Option<String>,

    /// One of `pending`, `in-progress`, `completed`
    pub task_status: Option<String>,
}

/// Form body carrying just a task ID
#[derive(Debug, Deserialize)]
pub struct TaskIdForm {
    /// Target task ID
    pub task_id: Option<String>,
}

/// Form body for `POST /task/task-list`
#[derive(Debug, Deserialize)]
pub struct TaskListForm {
    /// 1-based page number (required)
    pub skip: Option<String>,

    /// Optional status filter
    pub status_filter: Option<String>,

    /// Optional case-insensitive search over title and description
    pub search: Option<String>,
}

/// Treats blank and whitespace-only form values as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parses a `YYYY-MM-DD` due date
fn parse_due_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::Validation("Task due date must be in 'YYYY-MM-DD' format.".to_string())
    })
}

/// Parses a wire status string
fn parse_status(value: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::parse(value).ok_or_else(|| {
        ApiError::Validation(format!(
            "Task status must be one of 'pending', 'in-progress', 'completed' (got '{}').",
            value
        ))
    })
}

/// Parses a numeric task ID
fn parse_task_id(value: &str) -> Result<i64, ApiError> {
    value
        .parse::<i64>()
        .map_err(|_| ApiError::Validation("Task Id must be a number.".to_string()))
}

/// Serializes a task into its wire shape
fn task_payload(task: &Task) -> Value {
    json!({
        "task_id": task.id,
        "task_title": task.title,
        "task_description": task.description,
        "task_due_date": task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        "task_status": task.status.as_str(),
    })
}

/// `POST /task/add-or-edit-task`
///
/// Create requires title, description, and status; edit updates only the
/// fields supplied. Duplicate live titles are rejected before insert, and
/// the partial unique index backstops the race.
pub async fn add_or_edit_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<AddOrEditTaskForm>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let title = present(&form.task_title);
    let description = present(&form.task_description);
    let status = present(&form.task_status).map(parse_status).transpose()?;
    let due_date = present(&form.task_due_date)
        .map(parse_due_date)
        .transpose()?;

    match present(&form.task_id) {
        // Edit branch
        Some(raw_id) => {
            let id = parse_task_id(raw_id)?;

            if let Some(new_title) = title {
                // A title change must not collide with another live task.
                if let Some(existing) = Task::find_by_title(&state.db, new_title).await? {
                    if existing.id != id {
                        return Err(ApiError::Conflict("Task already exists.".to_string()));
                    }
                }
            }

            let updated = Task::update(
                &state.db,
                id,
                UpdateTask {
                    title: title.map(String::from),
                    description: description.map(String::from),
                    due_date,
                    status,
                },
            )
            .await?;

            let Some(task) = updated else {
                return Err(ApiError::NotFound("Task does not exist.".to_string()));
            };

            info!(user_id = %auth.user_id, task_id = task.id, "Task updated");

            Ok(Json(ApiResponse::ok(
                "Task updated successfully",
                task_payload(&task),
            )))
        }

        // Create branch
        None => {
            let mut problems = Vec::new();
            if title.is_none() {
                problems.push("Task Title is required.");
            }
            if description.is_none() {
                problems.push("Task Description is required.");
            }
            if status.is_none() {
                problems.push("Task status is required.");
            }
            if !problems.is_empty() {
                return Err(ApiError::Validation(problems.join("; ")));
            }

            let (Some(title), Some(description), Some(status)) = (title, description, status)
            else {
                return Err(ApiError::Internal("Validation state mismatch".to_string()));
            };

            if Task::find_by_title(&state.db, title).await?.is_some() {
                return Err(ApiError::Conflict("Task already exists.".to_string()));
            }

            let task = Task::create(
                &state.db,
                CreateTask {
                    user_id: auth.user_id,
                    title: title.to_string(),
                    description: Some(description.to_string()),
                    due_date,
                    status,
                },
            )
            .await?;

            info!(user_id = %auth.user_id, task_id = task.id, "Task created");

            Ok(Json(ApiResponse::ok(
                "Task added successfully",
                task_payload(&task),
            )))
        }
    }
}

/// `POST /task/task-remove`
///
/// Soft delete: the row is stamped, never removed, and its title becomes
/// available for reuse at once.
pub async fn remove_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<TaskIdForm>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = present(&form.task_id)
        .ok_or_else(|| ApiError::Validation("Provide task Id.".to_string()))
        .and_then(|raw| parse_task_id(raw))?;

    let removed = Task::soft_delete(&state.db, id).await?;

    let Some(task) = removed else {
        return Err(ApiError::NotFound("Task does not exist.".to_string()));
    };

    info!(user_id = %auth.user_id, task_id = task.id, "Task removed");

    Ok(Json(ApiResponse::message(format!(
        "{} removed successfully.",
        task.title
    ))))
}

/// `POST /task/task-list`
///
/// Fixed page size of 15, newest-id-first. The page number is required; the
/// status filter and search are optional and combine with AND.
pub async fn task_list(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Form(form): Form<TaskListForm>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let page = present(&form.skip)
        .ok_or_else(|| ApiError::Validation("Please provide a page number.".to_string()))?
        .parse::<i64>()
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| {
            ApiError::Validation("Page number must be a positive integer.".to_string())
        })?;

    let filter = TaskFilter {
        status: present(&form.status_filter)
            .map(parse_status)
            .transpose()?,
        search: present(&form.search).map(String::from),
    };

    let (tasks, total_records) = Task::list(&state.db, &filter, page).await?;

    let task_list: Vec<Value> = tasks.iter().map(task_payload).collect();

    Ok(Json(ApiResponse::ok(
        "Task list fetched successfully.",
        json!({
            "task_list": task_list,
            "current_page": page,
            "per_page_records": PAGE_SIZE,
            "total_pages": Task::total_pages(total_records),
            "total_records": total_records,
        }),
    )))
}

/// `POST /task/task-detail`
pub async fn task_detail(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Form(form): Form<TaskIdForm>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let id = present(&form.task_id)
        .ok_or_else(|| ApiError::Validation("Provide task Id.".to_string()))
        .and_then(|raw| parse_task_id(raw))?;

    let task = Task::find_by_id(&state.db, id).await?;

    let Some(task) = task else {
        return Err(ApiError::NotFound("Task not found.".to_string()));
    };

    Ok(Json(ApiResponse::ok(
        format!("{} detail fetched successfully", task.title),
        json!({
            "task_title": task.title,
            "task_description": task.description,
            "task_due_date": task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            "task_status": task.status.as_str(),
        }),
    )))
}
