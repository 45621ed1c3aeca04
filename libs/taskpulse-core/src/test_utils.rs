//! Test utilities for taskpulse
//!
//! Only available in tests or with the `test-utils` feature.

use crate::{
    error::Result,
    models::{CreateTaskRequest, Priority, Task},
    store::TaskStore,
};

/// Owner id used by seeded fixtures
pub const TEST_OWNER: &str = "test-user";

/// Create an empty in-memory store
///
/// # Errors
/// Returns a database error if the connection fails
pub async fn create_test_store() -> Result<TaskStore> {
    TaskStore::in_memory().await
}

/// Create an in-memory store seeded with a few representative tasks
/// for `TEST_OWNER`: one plain, one with subtasks, one high-priority
/// with tags
///
/// # Errors
/// Returns a database error if the connection or any insert fails
pub async fn create_seeded_store() -> Result<(TaskStore, Vec<Task>)> {
    let store = create_test_store().await?;
    let mut tasks = Vec::new();

    tasks.push(
        store
            .create_task(
                TEST_OWNER,
                CreateTaskRequest::new("Water the plants", "Balcony and kitchen"),
            )
            .await?,
    );

    let mut with_subtasks = CreateTaskRequest::new("Ship the release", "Cut, build, publish");
    with_subtasks.template_subtasks = vec![
        "Tag the commit".to_string(),
        "Run the build".to_string(),
        "Publish artifacts".to_string(),
    ];
    tasks.push(store.create_task(TEST_OWNER, with_subtasks).await?);

    let mut tagged = CreateTaskRequest::new("File taxes", "Before the deadline");
    tagged.priority = Priority::High;
    tagged.category = "finance".to_string();
    tagged.tags = vec!["urgent".to_string(), "paperwork".to_string()];
    tasks.push(store.create_task(TEST_OWNER, tagged).await?);

    Ok((store, tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_test_store() {
        let store = create_test_store().await.unwrap();
        assert!(store.list_tasks(TEST_OWNER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seeded_store_has_fixtures() {
        let (store, tasks) = create_seeded_store().await.unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(store.list_tasks(TEST_OWNER).await.unwrap().len(), 3);
        assert!(tasks.iter().any(|t| t.subtasks.len() == 3));
    }
}
