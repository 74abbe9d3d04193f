//! Integration tests for the PostgreSQL repositories
//!
//! These tests need a reachable PostgreSQL instance named by `DATABASE_URL`
//! and are ignored by default. Run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    error::StoreError,
    models::{NewTask, NewUser, TaskPatch, TaskStatus},
    repositories::{PgStore, TaskStore, UserStore},
};
use uuid::Uuid;

async fn store() -> Result<PgStore, Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");
    run_migrations(&pool).await?;
    Ok(PgStore::new(pool))
}

fn unique_user() -> NewUser {
    let tag = Uuid::new_v4().simple().to_string();
    NewUser {
        username: format!("user_{}", &tag[..12]),
        email: format!("{}@example.com", &tag[..12]),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unique_violation_maps_to_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let user = unique_user();
    store.create_user(user.clone()).await?;

    let duplicate = NewUser {
        username: format!("{}_2", user.username),
        ..user
    };
    let result = store.create_user(duplicate).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_task_lifecycle_is_owner_scoped() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let alice = store.create_user(unique_user()).await?;
    let bob = store.create_user(unique_user()).await?;

    let task = store
        .create_task(
            alice.id,
            NewTask {
                title: "Buy milk".to_string(),
                description: String::new(),
                status: TaskStatus::Pending,
            },
        )
        .await?;

    assert!(store.find_task(task.id, bob.id).await?.is_none());
    assert!(!store.delete_task(task.id, bob.id).await?);

    let patch = TaskPatch {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    let updated = store
        .update_task(task.id, alice.id, patch)
        .await?
        .expect("owner can update");
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, "Buy milk");

    let listed = store.list_tasks(alice.id).await?;
    assert_eq!(listed.len(), 1);

    assert!(store.delete_task(task.id, alice.id).await?);
    assert!(!store.delete_task(task.id, alice.id).await?);

    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_task_without_owner_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let result = store
        .create_task(
            Uuid::new_v4(),
            NewTask {
                title: "orphan".to_string(),
                description: String::new(),
                status: TaskStatus::Pending,
            },
        )
        .await;
    assert!(matches!(result, Err(StoreError::MissingOwner)));

    Ok(())
}
