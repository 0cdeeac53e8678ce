//! Todo operations with ownership enforcement

use std::sync::Arc;

use warden_db::{CreateTodo, TodoRepository, TodoRow};
use warden_types::{Identity, Todo, TodoChanges, TodoId};

use crate::policy::ensure_can_mutate;
use crate::AuthError;

/// Todo use cases. Any authenticated identity may read; only the owner may
/// update or delete.
pub struct TodoService<T: TodoRepository + ?Sized> {
    todos: Arc<T>,
}

impl<T: TodoRepository + ?Sized> TodoService<T> {
    pub fn new(todos: Arc<T>) -> Self {
        Self { todos }
    }

    /// Create a todo owned by the caller
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        identity: &Identity,
    ) -> Result<Todo, AuthError> {
        validate_title(title)?;

        let row = self
            .todos
            .create(CreateTodo {
                owner_id: identity.account_id,
                title: title.to_string(),
                description: description.to_string(),
            })
            .await?;

        tracing::debug!(todo_id = row.id, owner_id = row.user_id, "Todo created");
        Ok(row.to_todo())
    }

    /// All todos, regardless of owner
    pub async fn list_all(&self) -> Result<Vec<Todo>, AuthError> {
        let rows = self.todos.find_all().await?;
        Ok(rows.iter().map(TodoRow::to_todo).collect())
    }

    /// Todos owned by the caller
    pub async fn list_mine(&self, identity: &Identity) -> Result<Vec<Todo>, AuthError> {
        let rows = self.todos.find_by_owner(identity.account_id).await?;
        Ok(rows.iter().map(TodoRow::to_todo).collect())
    }

    pub async fn find_by_id(&self, id: TodoId) -> Result<Todo, AuthError> {
        self.todos
            .find_by_id(id)
            .await?
            .map(|row| row.to_todo())
            .ok_or(AuthError::NotFound("todo"))
    }

    /// Update a todo. Absent → `NotFound`; not owned → `Forbidden`.
    ///
    /// A blank title leaves the stored title unchanged.
    pub async fn update(
        &self,
        id: TodoId,
        mut changes: TodoChanges,
        identity: &Identity,
    ) -> Result<Todo, AuthError> {
        let current = self.owned(id, identity).await?;

        changes.title = changes.title.filter(|title| !title.trim().is_empty());
        if changes.is_empty() {
            return Ok(current.to_todo());
        }

        let row = self.todos.update(id, &changes).await.map_err(not_found)?;
        Ok(row.to_todo())
    }

    /// Delete a todo. Absent → `NotFound`; not owned → `Forbidden`.
    pub async fn delete(&self, id: TodoId, identity: &Identity) -> Result<(), AuthError> {
        self.owned(id, identity).await?;
        self.todos.delete(id).await.map_err(not_found)?;
        tracing::debug!(todo_id = %id, "Todo deleted");
        Ok(())
    }

    async fn owned(&self, id: TodoId, identity: &Identity) -> Result<TodoRow, AuthError> {
        let row = self
            .todos
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound("todo"))?;
        ensure_can_mutate(identity, &row)?;
        Ok(row)
    }
}

fn validate_title(title: &str) -> Result<(), AuthError> {
    if title.trim().is_empty() {
        return Err(AuthError::InvalidInput("title is required".to_string()));
    }
    Ok(())
}

// The todo vanished between the ownership check and the write.
fn not_found(err: warden_db::DbError) -> AuthError {
    match err {
        warden_db::DbError::NotFound => AuthError::NotFound("todo"),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_db::MemoryTodoRepository;
    use warden_types::AccountId;

    fn service() -> TodoService<MemoryTodoRepository> {
        TodoService::new(Arc::new(MemoryTodoRepository::new()))
    }

    fn alice() -> Identity {
        Identity::new(AccountId(1), "alice")
    }

    fn bob() -> Identity {
        Identity::new(AccountId(2), "bob")
    }

    #[tokio::test]
    async fn test_create_sets_owner() {
        let service = service();
        let todo = service.create("buy milk", "", &alice()).await.unwrap();
        assert_eq!(todo.owner_id, AccountId(1));
        assert!(!todo.completed);
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let result = service().create("  ", "desc", &alice()).await;
        assert!(matches!(result, Err(AuthError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_owner_updates() {
        let service = service();
        let todo = service.create("buy milk", "", &alice()).await.unwrap();

        let changes = TodoChanges {
            completed: Some(true),
            ..Default::default()
        };
        let updated = service.update(todo.id, changes, &alice()).await.unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "buy milk");
        assert_eq!(updated.owner_id, AccountId(1));
    }

    #[tokio::test]
    async fn test_blank_title_keeps_current_title() {
        let service = service();
        let todo = service.create("buy milk", "2 litres", &alice()).await.unwrap();

        let changes = TodoChanges {
            title: Some("   ".into()),
            description: Some("1 litre".into()),
            completed: Some(true),
        };
        let updated = service.update(todo.id, changes, &alice()).await.unwrap();
        assert_eq!(updated.title, "buy milk");
        assert_eq!(updated.description, "1 litre");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let service = service();
        let todo = service.create("buy milk", "", &alice()).await.unwrap();

        let changes = TodoChanges {
            title: Some("hijacked".into()),
            ..Default::default()
        };
        let result = service.update(todo.id, changes, &bob()).await;
        assert!(matches!(result, Err(AuthError::Forbidden)));

        let result = service.delete(todo.id, &bob()).await;
        assert!(matches!(result, Err(AuthError::Forbidden)));

        let unchanged = service.find_by_id(todo.id).await.unwrap();
        assert_eq!(unchanged.title, "buy milk");
    }

    #[tokio::test]
    async fn test_missing_todo_is_not_found_before_forbidden() {
        let service = service();
        let result = service.delete(TodoId(404), &bob()).await;
        assert!(matches!(result, Err(AuthError::NotFound("todo"))));

        let result = service
            .update(TodoId(404), TodoChanges::default(), &bob())
            .await;
        assert!(matches!(result, Err(AuthError::NotFound("todo"))));
    }

    #[tokio::test]
    async fn test_list_mine_and_all() {
        let service = service();
        service.create("a", "", &alice()).await.unwrap();
        service.create("b", "", &bob()).await.unwrap();
        service.create("c", "", &alice()).await.unwrap();

        assert_eq!(service.list_all().await.unwrap().len(), 3);
        let mine = service.list_mine(&alice()).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.owner_id == AccountId(1)));
    }

    #[tokio::test]
    async fn test_owner_deletes() {
        let service = service();
        let todo = service.create("a", "", &alice()).await.unwrap();
        service.delete(todo.id, &alice()).await.unwrap();
        assert!(matches!(
            service.find_by_id(todo.id).await,
            Err(AuthError::NotFound(_))
        ));
    }
}
