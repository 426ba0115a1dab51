use httpmock::prelude::*;
use mycel_auth::{
    accounts::{bearer_token, SignUp, Verification},
    error::{AuthorizationError, SignUpError, StoreError},
    users::{ResolvedUser, Role},
    Client,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

fn client(server: &MockServer) -> Client {
    Client::builder()
        .no_env()
        .with_url(server.base_url())
        .with_service_key("service-key")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_verify_provisions_missing_record() {
    init_tracing();
    let server = MockServer::start();

    let session = server.mock(|when, then| {
        when.method(GET)
            .path("/auth/v1/user")
            .header("authorization", "Bearer session-token");
        then.status(200).json_body(json!({
            "id": "7b2e",
            "email": "founder@example.com",
            "user_metadata": {"name": "Founder"}
        }));
    });
    let by_id = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/users")
            .query_param("id", "eq.7b2e");
        then.status(200).json_body(json!([]));
    });
    let by_email = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/users")
            .query_param("email", "eq.founder@example.com");
        then.status(200).json_body(json!([]));
    });
    let insert = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/users")
            .header("prefer", "return=representation")
            .json_body(json!({
                "id": "7b2e",
                "name": "Founder",
                "email": "founder@example.com",
                "role": "admin",
                "active": true
            }));
        then.status(201).json_body(json!([{
            "id": "7b2e",
            "name": "Founder",
            "email": "founder@example.com",
            "phone": null,
            "role": "admin",
            "active": true,
            "created_at": "2024-05-01T09:30:00Z"
        }]));
    });

    let accounts = client(&server).accounts();
    let token = bearer_token(Some("Bearer session-token"));
    let user = accounts.require_user(token).await.unwrap();

    match user {
        ResolvedUser::Record(record) => {
            assert_eq!(record.id, "7b2e");
            assert_eq!(record.role, Role::Admin);
        }
        other => panic!("Expected a stored record, got {:?}", other),
    }
    session.assert_hits_async(1).await;
    by_id.assert_hits_async(1).await;
    by_email.assert_hits_async(1).await;
    insert.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_verify_degrades_when_conflicting_record_is_unreadable() {
    init_tracing();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/auth/v1/user");
        then.status(200)
            .json_body(json!({"id": "7b2e", "email": "founder@example.com"}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/users")
            .query_param("id", "eq.7b2e");
        then.status(200).json_body(json!([]));
    });
    let by_email = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/users")
            .query_param("email", "eq.founder@example.com");
        then.status(200).json_body(json!([]));
    });
    let insert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/users");
        then.status(409).json_body(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"users_pkey\""
        }));
    });

    let verification = client(&server).accounts().verify(Some("session-token")).await;
    let user = verification.user().expect("an authenticated user");
    assert!(user.is_degraded());
    assert_eq!(user.id(), "7b2e");
    assert_eq!(user.role(), None);

    insert.assert_hits_async(1).await;
    // Once before the insert, once after the conflict.
    by_email.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_verify_rejected_token() {
    init_tracing();
    let server = MockServer::start();
    let session = server.mock(|when, then| {
        when.method(GET).path("/auth/v1/user");
        then.status(401)
            .json_body(json!({"code": 401, "msg": "invalid JWT"}));
    });
    let users = server.mock(|when, then| {
        when.path("/rest/v1/users");
        then.status(200).json_body(json!([]));
    });

    let accounts = client(&server).accounts();
    assert_eq!(
        accounts.verify(Some("expired")).await,
        Verification::Unauthenticated
    );
    assert_eq!(
        accounts.require_user(Some("expired")).await,
        Err(AuthorizationError::Unauthenticated)
    );
    session.assert_hits_async(2).await;
    users.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_verify_degrades_when_store_is_down() {
    init_tracing();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/v1/user");
        then.status(200).json_body(json!({
            "id": "7b2e",
            "email": "driver@example.com",
            "user_metadata": {"role": "driver"}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/users");
        then.status(503).body("upstream unavailable");
    });

    let user = client(&server)
        .accounts()
        .require_user(Some("session-token"))
        .await
        .unwrap();
    assert!(user.is_degraded());
    assert_eq!(user.role(), Some(Role::Driver));
}

#[tokio::test]
async fn test_sign_up_removes_identity_when_record_fails() {
    init_tracing();
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/auth/v1/admin/users")
            .json_body(json!({
                "email": "sales@example.com",
                "password": "hunter22",
                "email_confirm": true,
                "user_metadata": {"name": "Sam", "role": "sales"}
            }));
        then.status(200).json_body(json!({
            "id": "91aa",
            "email": "sales@example.com",
            "user_metadata": {"name": "Sam", "role": "sales"}
        }));
    });
    let insert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/users");
        then.status(400).json_body(json!({
            "code": "23514",
            "message": "new row violates check constraint \"users_role_check\""
        }));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/auth/v1/admin/users/91aa");
        then.status(200).json_body(json!({}));
    });

    let res = client(&server)
        .accounts()
        .sign_up(&SignUp::new("sales@example.com", "hunter22", "Sam", Role::Sales))
        .await;

    match res {
        Err(SignUpError::Store {
            source: StoreError::Rejected(e),
            orphaned_identity: None,
        }) => assert_eq!(e.code.as_deref(), Some("23514")),
        res => panic!("Expected store error, got {:?}", res),
    }
    create.assert_hits_async(1).await;
    insert.assert_hits_async(1).await;
    delete.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_sign_up() {
    init_tracing();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/auth/v1/admin/users");
        then.status(200)
            .json_body(json!({"id": "91aa", "email": "sales@example.com"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/rest/v1/users");
        then.status(201).json_body(json!([{
            "id": "91aa",
            "name": "Sam",
            "email": "sales@example.com",
            "phone": "555-0100",
            "role": "sales",
            "active": true
        }]));
    });

    let user = client(&server)
        .accounts()
        .sign_up(
            &SignUp::new("sales@example.com", "hunter22", "Sam", Role::Sales).with_phone("555-0100"),
        )
        .await
        .unwrap();
    assert_eq!(user.id, "91aa");
    assert_eq!(user.role, Role::Sales);
}
