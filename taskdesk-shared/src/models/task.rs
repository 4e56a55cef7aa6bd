/// Task model and database operations
///
/// Tasks are the to-do items owned by users. Deleting a task stamps
/// `deleted_at` instead of removing the row; every query here excludes
/// soft-deleted rows, including the title-uniqueness check.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'completed');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT,
///     due_date DATE,
///     status task_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
///
/// CREATE UNIQUE INDEX idx_tasks_title_live ON tasks (title) WHERE deleted_at IS NULL;
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::task::{CreateTask, Task, TaskStatus};
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     user_id: Uuid::new_v4(),
///     title: "Write report".to_string(),
///     description: Some("Quarterly numbers".to_string()),
///     due_date: None,
///     status: TaskStatus::Pending,
/// }).await?;
///
/// let (page, total) = Task::list(&pool, &Default::default(), 1).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Fixed page size for the listing query
pub const PAGE_SIZE: i64 = 15;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses a wire string into a status
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "in-progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Task model representing a to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Sequential task ID; listing order is newest-id-first
    pub id: i64,

    /// Owning user
    pub user_id: Uuid,

    /// Title, unique among non-deleted tasks
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete timestamp (None while the task is live)
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user (the authenticated caller)
    pub user_id: Uuid,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Initial status
    pub status: TaskStatus,
}

/// Input for a partial task update
///
/// Only fields carrying `Some` are written; everything else keeps its
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New due date
    pub due_date: Option<NaiveDate>,

    /// New status
    pub status: Option<TaskStatus>,
}

/// Filter applied to the listing query
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Keep only tasks with this status
    pub status: Option<TaskStatus>,

    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
}

impl Task {
    /// Creates a new task
    ///
    /// The partial unique index on live titles makes a duplicate title a
    /// constraint violation even if two requests race past the handler's
    /// pre-check.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, due_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, due_date, status,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a non-deleted task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, status,
                   created_at, updated_at, deleted_at
            FROM tasks
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a non-deleted task by exact title
    ///
    /// Used as the duplicate-title pre-check before insert.
    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, status,
                   created_at, updated_at, deleted_at
            FROM tasks
            WHERE title = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(title)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update to a non-deleted task
    ///
    /// Returns `None` when the task does not exist or is soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, title, description, due_date, status,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Soft-deletes a task by stamping `deleted_at`
    ///
    /// Returns `None` when the task does not exist or was already deleted.
    pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET deleted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, title, description, due_date, status,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Row offset for a 1-based page number
    ///
    /// Saturates instead of overflowing; an absurdly large page number
    /// yields an offset past every row and therefore an empty page.
    fn page_offset(page: i64) -> i64 {
        page.max(1).saturating_sub(1).saturating_mul(PAGE_SIZE)
    }

    /// Lists non-deleted tasks matching the filter, newest-id-first
    ///
    /// `page` is 1-based; every page holds [`PAGE_SIZE`] items. The returned
    /// total count is computed from the same predicate so pagination numbers
    /// always agree with the items.
    pub async fn list(
        pool: &PgPool,
        filter: &TaskFilter,
        page: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let offset = Self::page_offset(page);

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, status,
                   created_at, updated_at, deleted_at
            FROM tasks
            WHERE deleted_at IS NULL
              AND ($1::task_status IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            ORDER BY id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.status)
        .bind(filter.search.as_deref())
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE deleted_at IS NULL
              AND ($1::task_status IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(filter.status)
        .bind(filter.search.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((tasks, total))
    }

    /// Total pages for a given record count at the fixed page size
    pub fn total_pages(total_records: i64) -> i64 {
        (total_records + PAGE_SIZE - 1) / PAGE_SIZE
    }
}
