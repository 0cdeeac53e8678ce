//! In-memory todo repository

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use warden_types::{AccountId, TodoChanges, TodoId};

use crate::error::{DbError, DbResult};
use crate::models::TodoRow;
use crate::repo::{CreateTodo, TodoRepository};

/// In-memory todo repository
#[derive(Default, Clone)]
pub struct MemoryTodoRepository {
    todos: Arc<DashMap<i64, TodoRow>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, keep: impl Fn(&TodoRow) -> bool) -> Vec<TodoRow> {
        let mut todos: Vec<TodoRow> = self
            .todos
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        todos.sort_by_key(|t| t.id);
        todos
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn find_by_id(&self, id: TodoId) -> DbResult<Option<TodoRow>> {
        Ok(self.todos.get(&id.0).map(|r| r.value().clone()))
    }

    async fn find_all(&self) -> DbResult<Vec<TodoRow>> {
        Ok(self.sorted(|_| true))
    }

    async fn find_by_owner(&self, owner_id: AccountId) -> DbResult<Vec<TodoRow>> {
        Ok(self.sorted(|t| t.user_id == owner_id.0))
    }

    async fn create(&self, todo: CreateTodo) -> DbResult<TodoRow> {
        let now = Utc::now();
        let row = TodoRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: todo.title,
            description: todo.description,
            completed: false,
            user_id: todo.owner_id.0,
            created_at: now,
            updated_at: now,
        };
        self.todos.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: TodoId, changes: &TodoChanges) -> DbResult<TodoRow> {
        let mut todo = self.todos.get_mut(&id.0).ok_or(DbError::NotFound)?;
        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(description) = &changes.description {
            todo.description = description.clone();
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> DbResult<()> {
        self.todos
            .remove(&id.0)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }
}
