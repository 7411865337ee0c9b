//! Integration tests for the identity crate with a real database.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use clubhouse_config::AuthConfig;
use clubhouse_database::{run_migrations, AccountError, AuthError, Role, UpdateProfileRequest};
use clubhouse_identity::{AccountService, AuthService, LoginRequest, RegisterRequest};

async fn create_services() -> (AuthService, AccountService, SqlitePool) {
    // A single connection keeps every caller on the same `:memory:` database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();

    let config = AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        issuer: "clubhouse-test".to_string(),
    };

    (
        AuthService::new(pool.clone(), &config),
        AccountService::new(pool.clone()),
        pool,
    )
}

fn register_request(email: &str, name: &str, role: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "password123".to_string(),
        display_name: name.to_string(),
        role: role.map(|r| r.to_string()),
    }
}

#[tokio::test]
async fn test_register_login_authenticate_round_trip() {
    let (auth, _, _pool) = create_services().await;

    let (account, token) = auth
        .register(&register_request("alice@example.com", "Alice", None))
        .await
        .unwrap();
    assert_eq!(account.role, Role::Member);

    let resolved = auth.authenticate(&token).await.unwrap();
    assert_eq!(resolved.id, account.id);

    let (logged_in, login_token) = auth
        .login(&LoginRequest {
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.id, account.id);

    let resolved_again = auth.authenticate(&login_token).await.unwrap();
    assert_eq!(resolved_again.id, account.id);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict_without_insert() {
    let (auth, accounts, _pool) = create_services().await;

    auth.register(&register_request("dup@example.com", "First", None))
        .await
        .unwrap();

    let err = auth
        .register(&register_request("dup@example.com", "Second", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailAlreadyRegistered));

    assert_eq!(accounts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_auth_failures_collapse_to_unauthorized() {
    let (auth, _, _pool) = create_services().await;

    auth.register(&register_request("bob@example.com", "Bob", None))
        .await
        .unwrap();

    // Wrong password and unknown email are the same failure kind.
    let wrong_password = auth
        .login(&LoginRequest {
            email: "bob@example.com".to_string(),
            password: "not-the-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(wrong_password, AuthError::Unauthorized));

    let unknown_email = auth
        .login(&LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(unknown_email, AuthError::Unauthorized));

    let bad_token = auth.authenticate("garbage.token.here").await.unwrap_err();
    assert!(matches!(bad_token, AuthError::Unauthorized));
}

#[tokio::test]
async fn test_registration_input_validation() {
    let (auth, _, _pool) = create_services().await;

    let bad_email = auth
        .register(&RegisterRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            display_name: "Name".to_string(),
            role: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(bad_email, AuthError::Validation(_)));

    let short_password = auth
        .register(&RegisterRequest {
            email: "ok@example.com".to_string(),
            password: "tiny".to_string(),
            display_name: "Name".to_string(),
            role: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(short_password, AuthError::Validation(_)));

    let unknown_role = auth
        .register(&register_request("ok@example.com", "Name", Some("owner")))
        .await
        .unwrap_err();
    assert!(matches!(unknown_role, AuthError::Validation(_)));
}

#[tokio::test]
async fn test_profile_update_is_self_or_admin() {
    let (auth, accounts, _pool) = create_services().await;

    let (admin, _) = auth
        .register(&register_request("admin@example.com", "Admin", Some("admin")))
        .await
        .unwrap();
    let (alice, _) = auth
        .register(&register_request("alice@example.com", "Alice", None))
        .await
        .unwrap();
    let (bob, _) = auth
        .register(&register_request("bob@example.com", "Bob", None))
        .await
        .unwrap();

    let update = UpdateProfileRequest {
        phone: Some("555-0100".to_string()),
        ..Default::default()
    };

    // Self-update works.
    let updated = accounts
        .update_profile(&alice, &alice.public_id, &update)
        .await
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));

    // Admin may update anyone.
    accounts
        .update_profile(&admin, &bob.public_id, &update)
        .await
        .unwrap();

    // A third account may not.
    let err = accounts
        .update_profile(&bob, &alice.public_id, &update)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));

    // Empty payloads are rejected.
    let err = accounts
        .update_profile(&alice, &alice.public_id, &UpdateProfileRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::EmptyUpdate));
}

#[tokio::test]
async fn test_role_change_is_admin_only() {
    let (auth, accounts, _pool) = create_services().await;

    let (admin, _) = auth
        .register(&register_request("admin@example.com", "Admin", Some("admin")))
        .await
        .unwrap();
    let (trainer, _) = auth
        .register(&register_request("trainer@example.com", "Trainer", Some("trainer")))
        .await
        .unwrap();
    let (alice, _) = auth
        .register(&register_request("alice@example.com", "Alice", None))
        .await
        .unwrap();

    let promoted = accounts
        .change_role(&admin, &alice.public_id, "trainer")
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Trainer);

    let err = accounts
        .change_role(&trainer, &alice.public_id, "guest")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));

    let err = accounts
        .change_role(&admin, &alice.public_id, "superuser")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InvalidRole(_)));
}

#[tokio::test]
async fn test_get_unknown_account_is_not_found() {
    let (_, accounts, _pool) = create_services().await;

    let err = accounts.get("missing").await.unwrap_err();
    assert!(matches!(err, AccountError::AccountNotFound));
}
