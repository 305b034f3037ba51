mod common;

use chrono::Duration;
use common::*;
use grantkeeper::application_port::*;
use grantkeeper::domain_model::*;

#[tokio::test]
async fn code_is_single_use_and_replay_still_yields_the_request() {
    let h = harness();
    let scope = OpScope::new();
    let grant = token_grant("alice");

    h.requests
        .create_authorize_code_session(&scope, "code-1", &grant)
        .await
        .unwrap();

    let first = h
        .requests
        .get_authorize_code_session::<TokenSession>(&scope, "code-1")
        .await
        .unwrap();
    assert!(!first.is_invalidated());
    assert_eq!(first.request().id, grant.id);

    h.requests
        .invalidate_authorize_code_session(&scope, "code-1")
        .await
        .unwrap();

    let replay = h
        .requests
        .get_authorize_code_session::<TokenSession>(&scope, "code-1")
        .await
        .unwrap();
    assert!(replay.is_invalidated());
    assert_eq!(replay.request().id, grant.id);
    assert_eq!(replay.request().session.subject, "alice");
    assert!(matches!(
        replay.into_result(),
        Err(StoreError::InvalidatedCode)
    ));
}

#[tokio::test]
async fn invalidation_persists_inactive_flag_and_update_time() {
    let h = harness();
    let scope = OpScope::new();
    let grant = token_grant("alice");
    h.requests
        .create_authorize_code_session(&scope, "code-1", &grant)
        .await
        .unwrap();

    h.clock.advance(Duration::seconds(5));
    h.requests
        .invalidate_authorize_code_session(&scope, "code-1")
        .await
        .unwrap();

    let stored = h
        .requests
        .requests()
        .get_by_signature(&scope, GrantKind::AuthorizationCode, "code-1")
        .await
        .unwrap();
    assert!(!stored.active);
    assert_eq!(stored.id, grant.id);
    assert_eq!(stored.update_time, stored.create_time + 5);

    // Invalidating again keeps the code invalidated.
    h.requests
        .invalidate_authorize_code_session(&scope, "code-1")
        .await
        .unwrap();
    assert!(
        h.requests
            .get_authorize_code_session::<TokenSession>(&scope, "code-1")
            .await
            .unwrap()
            .is_invalidated()
    );
}

#[tokio::test]
async fn invalidating_unknown_code_is_not_found() {
    let h = harness();
    let res = h
        .requests
        .invalidate_authorize_code_session(&OpScope::new(), "never-issued")
        .await;
    assert!(matches!(res, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn reissuing_a_code_conflicts() {
    let h = harness();
    let scope = OpScope::new();
    h.requests
        .create_authorize_code_session(&scope, "code-1", &token_grant("alice"))
        .await
        .unwrap();
    let res = h
        .requests
        .create_authorize_code_session(&scope, "code-1", &token_grant("bob"))
        .await;
    assert!(matches!(res, Err(StoreError::Conflict)));
}

#[tokio::test]
async fn concurrent_invalidations_both_leave_code_invalidated() {
    let h = harness();
    let scope = OpScope::new();
    h.requests
        .create_authorize_code_session(&scope, "code-1", &token_grant("alice"))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        h.requests.invalidate_authorize_code_session(&scope, "code-1"),
        h.requests.invalidate_authorize_code_session(&scope, "code-1"),
    );
    a.unwrap();
    b.unwrap();

    let lookup = h
        .requests
        .get_authorize_code_session::<TokenSession>(&scope, "code-1")
        .await
        .unwrap();
    assert!(lookup.is_invalidated());
}

#[tokio::test]
async fn oidc_session_is_keyed_by_authorize_code() {
    let h = harness();
    let scope = OpScope::new();
    let grant = GrantRequest::new(
        client(),
        IdTokenSession {
            subject: "alice".into(),
            nonce: "n-0S6_WzA2Mj".into(),
            acr: vec!["urn:mace:incommon:iap:silver".into()],
        },
    );

    h.requests
        .create_open_id_connect_session(&scope, "code-1", &grant)
        .await
        .unwrap();
    let restored = h
        .requests
        .get_open_id_connect_session::<IdTokenSession>(&scope, "code-1")
        .await
        .unwrap();
    assert_eq!(restored.session, grant.session);

    h.requests
        .delete_open_id_connect_session(&scope, "code-1")
        .await
        .unwrap();
    assert!(matches!(
        h.requests
            .get_open_id_connect_session::<IdTokenSession>(&scope, "code-1")
            .await,
        Err(StoreError::NotFound)
    ));
}
