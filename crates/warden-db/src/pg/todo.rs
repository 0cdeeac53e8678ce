//! PostgreSQL todo repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use warden_types::{AccountId, TodoChanges, TodoId};

use crate::error::{DbError, DbResult};
use crate::models::TodoRow;
use crate::repo::{CreateTodo, TodoRepository};

/// PostgreSQL todo repository
#[derive(Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    /// Create a new todo repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn find_by_id(&self, id: TodoId) -> DbResult<Option<TodoRow>> {
        let todo = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, description, completed, user_id, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn find_all(&self) -> DbResult<Vec<TodoRow>> {
        let todos = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, description, completed, user_id, created_at, updated_at
            FROM todos
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn find_by_owner(&self, owner_id: AccountId) -> DbResult<Vec<TodoRow>> {
        let todos = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, description, completed, user_id, created_at, updated_at
            FROM todos
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn create(&self, todo: CreateTodo) -> DbResult<TodoRow> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (title, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.owner_id.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: TodoId, changes: &TodoChanges) -> DbResult<TodoRow> {
        sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                completed = COALESCE($3, completed),
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, title, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.completed)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: TodoId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
