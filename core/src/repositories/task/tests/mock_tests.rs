//! Unit tests for mock task repository

use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::task::Task;
use crate::errors::{DomainError, ResourceError};
use crate::repositories::task::{MockTaskRepository, TaskRepository};

#[tokio::test]
async fn test_tasks_listed_newest_first() {
    let repo = MockTaskRepository::new();
    let user_id = Uuid::new_v4();

    let mut first = Task::new(user_id, "first", None, None);
    first.created_at = first.created_at - Duration::minutes(10);
    let second = Task::new(user_id, "second", None, None);

    repo.create_task(first).await.unwrap();
    repo.create_task(second).await.unwrap();
    repo.create_task(Task::new(Uuid::new_v4(), "someone else", None, None))
        .await
        .unwrap();

    let tasks = repo.get_tasks(user_id).await.unwrap();
    let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["second", "first"]);
}

#[tokio::test]
async fn test_complete_and_uncomplete() {
    let repo = MockTaskRepository::new();
    let user_id = Uuid::new_v4();
    let task = repo
        .create_task(Task::new(user_id, "ship it", None, None))
        .await
        .unwrap();

    let done = repo.mark_task_completed(task.id, user_id).await.unwrap();
    assert!(done.is_completed);
    assert!(done.completed_at.is_some());

    let undone = repo.mark_task_uncompleted(task.id, user_id).await.unwrap();
    assert!(!undone.is_completed);
    assert!(undone.completed_at.is_none());
}

#[tokio::test]
async fn test_ownership_scoping() {
    let repo = MockTaskRepository::new();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let task = repo
        .create_task(Task::new(owner, "private", None, None))
        .await
        .unwrap();

    let result = repo.mark_task_completed(task.id, intruder).await;
    assert!(matches!(
        result,
        Err(DomainError::Resource(ResourceError::TaskNotFound))
    ));
    let result = repo.delete_task(task.id, intruder).await;
    assert!(matches!(
        result,
        Err(DomainError::Resource(ResourceError::TaskNotFound))
    ));
}

#[tokio::test]
async fn test_soft_delete_keeps_row() {
    let repo = MockTaskRepository::new();
    let user_id = Uuid::new_v4();
    let task = repo
        .create_task(Task::new(user_id, "temporary", None, None))
        .await
        .unwrap();

    repo.delete_task(task.id, user_id).await.unwrap();
    assert!(repo.get_tasks(user_id).await.unwrap().is_empty());

    let raw = repo.raw_task(task.id).await.unwrap();
    assert!(raw.is_deleted);
    assert!(raw.deleted_at.is_some());

    let again = repo.delete_task(task.id, user_id).await;
    assert!(matches!(
        again,
        Err(DomainError::Resource(ResourceError::TaskNotFound))
    ));
}

#[tokio::test]
async fn test_create_task_in_unknown_group() {
    let repo = MockTaskRepository::new();
    let user_id = Uuid::new_v4();

    let result = repo
        .create_task(Task::new(user_id, "orphan", Some(Uuid::new_v4()), None))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Resource(ResourceError::GroupNotFound))
    ));
}
