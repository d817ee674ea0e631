//! Unit tests for task and group entities

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{Group, Task};

#[test]
fn test_task_completion_toggle() {
    let mut task = Task::new(Uuid::new_v4(), "write report", None, None);
    assert!(!task.is_completed);

    let now = Utc::now();
    task.mark_completed(now);
    assert!(task.is_completed);
    assert_eq!(task.completed_at, Some(now));

    task.mark_uncompleted();
    assert!(!task.is_completed);
    assert!(task.completed_at.is_none());
}

#[test]
fn test_group_uncompleted_detection() {
    let user_id = Uuid::new_v4();
    let mut group = Group::new(user_id, "Chores", None);
    assert!(!group.has_uncompleted_tasks());

    let mut done = Task::new(user_id, "dishes", Some(group.id), None);
    done.mark_completed(Utc::now());
    group.tasks.push(done);
    assert!(!group.has_uncompleted_tasks());

    let mut deleted = Task::new(user_id, "laundry", Some(group.id), None);
    deleted.soft_delete(Utc::now());
    group.tasks.push(deleted);
    assert!(!group.has_uncompleted_tasks());

    group.tasks.push(Task::new(user_id, "vacuum", Some(group.id), None));
    assert!(group.has_uncompleted_tasks());
}

#[test]
fn test_group_update_touches_timestamp() {
    let mut group = Group::new(Uuid::new_v4(), "Old", Some("desc".to_string()));
    let before = group.updated_at;

    group.update("New", None);
    assert_eq!(group.name, "New");
    assert!(group.description.is_none());
    assert!(group.updated_at >= before);
}
