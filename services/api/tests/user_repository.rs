//! PostgreSQL user repository tests
//!
//! These need a reachable PostgreSQL instance in `DATABASE_URL`; run them with
//! `cargo test -- --ignored`.

use common::database::{DatabaseConfig, init_pool, run_migrations};
use serial_test::serial;
use sqlx::PgPool;

use webud_api::{
    models::{NewUser, UpdateUser},
    repositories::{StoreError, UserRepository, UserStore},
};

async fn repository() -> (UserRepository, PgPool) {
    let config = DatabaseConfig::from_env().unwrap();
    let pool = init_pool(&config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    sqlx::query("TRUNCATE users RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();
    (UserRepository::new(pool.clone()), pool)
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "A".into(),
        email: email.into(),
        password_hash: "$argon2id$digest".into(),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_duplicate_email_is_rejected_by_index() {
    let (repo, _pool) = repository().await;

    let user = repo.create(&new_user("a@x.com")).await.unwrap();
    assert_eq!(user.id, 1);
    assert!(user.profile_picture.is_none());

    let err = repo.create(&new_user("a@x.com")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail));
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_profile_and_password_updates() {
    let (repo, _pool) = repository().await;
    let user = repo.create(&new_user("a@x.com")).await.unwrap();

    let updated = repo
        .update_profile(
            user.id,
            &UpdateUser {
                name: None,
                profile_picture: Some(Some("https://img/a.png".into())),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "A");
    assert_eq!(updated.profile_picture.as_deref(), Some("https://img/a.png"));

    let cleared = repo
        .update_profile(
            user.id,
            &UpdateUser {
                name: Some("B".into()),
                profile_picture: Some(None),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.name, "B");
    assert!(cleared.profile_picture.is_none());

    let rehashed = repo
        .update_password(user.id, "$argon2id$other")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rehashed.password, "$argon2id$other");

    assert!(repo.update_password(99, "x").await.unwrap().is_none());
    assert!(
        repo.update_profile(99, &UpdateUser::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_list_paginates_in_id_order() {
    let (repo, _pool) = repository().await;
    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        repo.create(&new_user(email)).await.unwrap();
    }

    let all = repo.list(0, 100).await.unwrap();
    assert_eq!(all.len(), 3);

    let page = repo.list(1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].email, "b@x.com");
    assert_eq!(
        repo.find_by_id(page[0].id).await.unwrap().unwrap().email,
        "b@x.com"
    );
}
