//! Service-level tests for credential verification and ownership scoping

use std::sync::Arc;

use api::{
    auth::AuthService,
    config::JwtConfig,
    error::ApiError,
    jwt::{TokenRole, TokenService},
    models::{LoginRequest, RegisterRequest, TaskRequest},
    tasks::TaskService,
};
use common::{models::TaskStatus, repositories::MemoryStore};
use uuid::Uuid;

struct Harness {
    auth: AuthService,
    tasks: TaskService,
    tokens: TokenService,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let tokens = TokenService::new(&JwtConfig::new("svc-access", "svc-refresh"));
    Harness {
        auth: AuthService::new(store.clone(), tokens.clone()),
        tasks: TaskService::new(store),
        tokens,
    }
}

fn registration(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: Some(username.to_string()),
        email: Some(email.to_string()),
        password: Some("secret1".to_string()),
    }
}

fn titled(title: &str) -> TaskRequest {
    TaskRequest {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

async fn user(h: &Harness, username: &str) -> Uuid {
    let email = format!("{}@example.com", username);
    h.auth
        .register(registration(username, &email))
        .await
        .unwrap()
        .user
        .id
}

#[tokio::test]
async fn test_register_issues_tokens_for_new_user() {
    let h = harness();
    let session = h
        .auth
        .register(registration("alice", "a@x.com"))
        .await
        .unwrap();

    assert_eq!(session.user.username, "alice");
    assert_eq!(
        h.tokens
            .validate(&session.tokens.access_token, TokenRole::Access),
        Ok(session.user.id)
    );
    assert_eq!(
        h.tokens
            .validate(&session.tokens.refresh_token, TokenRole::Refresh),
        Ok(session.user.id)
    );
}

#[tokio::test]
async fn test_register_normalizes_username_and_email() {
    let h = harness();
    let session = h
        .auth
        .register(registration("  alice  ", "  Alice@X.com "))
        .await
        .unwrap();
    assert_eq!(session.user.username, "alice");
    assert_eq!(session.user.email, "alice@x.com");

    // Case variants of the same email are duplicates
    let dup = h
        .auth
        .register(registration("alice2", "ALICE@x.com"))
        .await;
    assert!(matches!(dup, Err(ApiError::DuplicateUser)));

    let login = h
        .auth
        .login(LoginRequest {
            email: Some("ALICE@X.COM".to_string()),
            password: Some("secret1".to_string()),
        })
        .await;
    assert!(login.is_ok());
}

#[tokio::test]
async fn test_validation_runs_before_duplicate_check() {
    let h = harness();
    h.auth
        .register(registration("alice", "a@x.com"))
        .await
        .unwrap();

    let mut bad = registration("alice", "a@x.com");
    bad.password = Some("123".to_string());
    let result = h.auth.register(bad).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn test_concurrent_duplicate_registration_yields_one_user() {
    let h = harness();
    let (a, b) = tokio::join!(
        h.auth.register(registration("alice", "a@x.com")),
        h.auth.register(registration("alice", "a@x.com")),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    assert!(matches!(
        a.err().or(b.err()),
        Some(ApiError::DuplicateUser)
    ));
}

#[tokio::test]
async fn test_login_errors_do_not_distinguish_cause() {
    let h = harness();
    h.auth
        .register(registration("alice", "a@x.com"))
        .await
        .unwrap();

    let wrong_password = h
        .auth
        .login(LoginRequest {
            email: Some("a@x.com".to_string()),
            password: Some("nope-nope".to_string()),
        })
        .await
        .unwrap_err();
    let no_user = h
        .auth
        .login(LoginRequest {
            email: Some("ghost@x.com".to_string()),
            password: Some("secret1".to_string()),
        })
        .await
        .unwrap_err();
    let empty = h.auth.login(LoginRequest::default()).await.unwrap_err();

    for err in [&wrong_password, &no_user, &empty] {
        assert!(matches!(err, ApiError::InvalidCredentials));
        assert_eq!(err.message(), "Invalid credentials");
    }
}

#[tokio::test]
async fn test_refresh_rejects_unknown_user() {
    let h = harness();
    let pair = h.tokens.issue(Uuid::new_v4()).unwrap();

    let result = h.auth.refresh(&pair.refresh_token).await;
    assert!(matches!(result, Err(ApiError::TokenInvalid(_))));
}

#[tokio::test]
async fn test_cross_owner_access_is_not_found() {
    let h = harness();
    let users = [
        user(&h, "alice").await,
        user(&h, "bob").await,
        user(&h, "carol").await,
    ];

    let mut owned = Vec::new();
    for owner in users {
        owned.push((owner, h.tasks.create(titled("mine"), owner).await.unwrap()));
    }

    for (owner, task) in &owned {
        for other in users.iter().filter(|u| *u != owner) {
            assert!(matches!(
                h.tasks.get_one(task.id, *other).await,
                Err(ApiError::NotFound)
            ));
            assert!(matches!(
                h.tasks.update(task.id, *other, titled("taken")).await,
                Err(ApiError::NotFound)
            ));
            assert!(matches!(
                h.tasks.delete(task.id, *other).await,
                Err(ApiError::NotFound)
            ));
        }

        let listed = h.tasks.list(*owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(&listed[0], task);
    }
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let h = harness();
    let owner = user(&h, "alice").await;

    let created = h
        .tasks
        .create(
            TaskRequest {
                title: Some("Plan trip".to_string()),
                description: Some("Book flights".to_string()),
                status: Some("completed".to_string()),
            },
            owner,
        )
        .await
        .unwrap();
    let fetched = h.tasks.get_one(created.id, owner).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.title, "Plan trip");
    assert_eq!(fetched.description, "Book flights");
    assert_eq!(fetched.status, TaskStatus::Completed);
    assert_eq!(fetched.user_id, owner);
}

#[tokio::test]
async fn test_invalid_update_leaves_task_unchanged() {
    let h = harness();
    let owner = user(&h, "alice").await;
    let task = h.tasks.create(titled("Keep me"), owner).await.unwrap();

    let result = h
        .tasks
        .update(
            task.id,
            owner,
            TaskRequest {
                status: Some("done".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));

    let fetched = h.tasks.get_one(task.id, owner).await.unwrap();
    assert_eq!(fetched.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_delete_is_not_silently_repeated() {
    let h = harness();
    let owner = user(&h, "alice").await;
    let task = h.tasks.create(titled("Once"), owner).await.unwrap();

    h.tasks.delete(task.id, owner).await.unwrap();
    assert!(matches!(
        h.tasks.delete(task.id, owner).await,
        Err(ApiError::NotFound)
    ));
    assert!(matches!(
        h.tasks.get_one(task.id, owner).await,
        Err(ApiError::NotFound)
    ));
}
