//! Integration tests for the credential store against a real database.

use assert_matches::assert_matches;
use authgate_core::error::AuthError;
use authgate_core::hashing::sha256_hex;
use authgate_db::models::user::CreateUser;
use authgate_db::repositories::UserRepo;
use sqlx::PgPool;

fn new_user(login: &str) -> CreateUser {
    CreateUser {
        userlogin: login.to_string(),
        password_hash: sha256_hex(b"correct-horse-battery-staple"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_find_by_login(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    assert_eq!(created.userlogin, "alice");
    assert_eq!(created.password_hash.len(), 64);

    let found = UserRepo::find_by_login(&pool, "alice")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(found.user_id, created.user_id);

    let by_id = UserRepo::find_by_id(&pool, created.user_id)
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(by_id.userlogin, "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_login_miss_is_none(pool: PgPool) {
    let found = UserRepo::find_by_login(&pool, "nobody").await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_login_is_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("bob")).await.unwrap();

    let result = UserRepo::create(&pool, &new_user("bob")).await;
    assert_matches!(result, Err(AuthError::DuplicateLogin));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overlong_login_is_rejected_before_insert(pool: PgPool) {
    let result = UserRepo::create(&pool, &new_user("a-login-of-more-than-twenty-chars")).await;
    assert_matches!(result, Err(AuthError::Validation(_)));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}
