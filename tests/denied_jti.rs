mod common;

use chrono::Duration;
use common::*;
use grantkeeper::application_impl::DeniedJtiManager;
use grantkeeper::application_port::*;
use grantkeeper::domain_model::*;
use grantkeeper::domain_port::*;

#[tokio::test]
async fn replay_window_closes_at_expiry() {
    let h = harness();
    let scope = OpScope::new();
    let now = h.clock.now();

    h.jtis
        .set_client_assertion_jwt(&scope, "abc", now + Duration::seconds(60))
        .await
        .unwrap();
    assert!(matches!(
        h.jtis
            .set_client_assertion_jwt(&scope, "abc", now + Duration::seconds(60))
            .await,
        Err(StoreError::JtiKnown)
    ));
    assert!(matches!(
        h.jtis.client_assertion_jwt_valid(&scope, "abc").await,
        Err(StoreError::JtiKnown)
    ));

    h.clock.advance(Duration::seconds(61));
    let now = h.clock.now();
    h.jtis.client_assertion_jwt_valid(&scope, "abc").await.unwrap();
    h.jtis
        .set_client_assertion_jwt(&scope, "abc", now + Duration::seconds(60))
        .await
        .unwrap();
}

#[tokio::test]
async fn jti_is_reusable_within_its_expiry_second() {
    let h = harness();
    let scope = OpScope::new();
    let exp = h.clock.now() + Duration::seconds(60);

    h.jtis
        .set_client_assertion_jwt(&scope, "abc", exp)
        .await
        .unwrap();

    h.clock.advance(Duration::milliseconds(60_500));
    assert!(h.clock.now() > exp);
    assert_eq!(h.clock.now().timestamp(), exp.timestamp());

    h.jtis.client_assertion_jwt_valid(&scope, "abc").await.unwrap();
    assert!(!h.jtis.is_jwt_used(&scope, "abc").await.unwrap());
    h.jtis
        .set_client_assertion_jwt(&scope, "abc", h.clock.now() + Duration::seconds(60))
        .await
        .unwrap();
}

#[tokio::test]
async fn cold_instance_agrees_with_warm_one_on_fractional_expiry() {
    let h = harness();
    let scope = OpScope::new();
    let other = DeniedJtiManager::new(h.jti_repo.clone(), h.clock.clone());
    let exp = h.clock.now() + Duration::milliseconds(60_700);

    h.jtis
        .set_client_assertion_jwt(&scope, "abc", exp)
        .await
        .unwrap();
    h.clock.advance(Duration::milliseconds(60_300));

    assert!(!h.jtis.is_jwt_used(&scope, "abc").await.unwrap());
    assert!(!other.is_jwt_used(&scope, "abc").await.unwrap());
}

#[tokio::test]
async fn raw_jti_never_reaches_storage() {
    let h = harness();
    let scope = OpScope::new();
    h.jtis
        .set_client_assertion_jwt(&scope, "raw-jti", h.clock.now() + Duration::seconds(60))
        .await
        .unwrap();

    assert!(matches!(
        h.jti_repo.get("raw-jti").await,
        Err(StoreError::NotFound)
    ));
    let stored = h.jti_repo.get(&signature_from_jti("raw-jti")).await.unwrap();
    assert_eq!(stored.signature.len(), 64);
}

#[tokio::test]
async fn second_instance_sees_first_instance_jtis() {
    let h = harness();
    let scope = OpScope::new();
    let other = DeniedJtiManager::new(h.jti_repo.clone(), h.clock.clone());

    h.jtis
        .mark_jwt_used_for_time(&scope, "shared", h.clock.now() + Duration::seconds(60))
        .await
        .unwrap();

    assert!(other.memory().is_empty().unwrap());
    assert!(other.is_jwt_used(&scope, "shared").await.unwrap());
    assert!(matches!(
        other
            .set_client_assertion_jwt(&scope, "shared", h.clock.now() + Duration::seconds(60))
            .await,
        Err(StoreError::JtiKnown)
    ));
}

#[tokio::test]
async fn inserts_sweep_expired_entries() {
    let h = harness();
    let scope = OpScope::new();
    let now = h.clock.now();

    for jti in ["one", "two"] {
        h.jtis
            .set_client_assertion_jwt(&scope, jti, now + Duration::seconds(10))
            .await
            .unwrap();
    }
    h.clock.advance(Duration::seconds(20));

    h.jtis
        .set_client_assertion_jwt(&scope, "three", h.clock.now() + Duration::seconds(10))
        .await
        .unwrap();
    assert!(matches!(
        h.jti_repo.get(&signature_from_jti("one")).await,
        Err(StoreError::NotFound)
    ));
    assert_eq!(
        h.jtis.delete_before(&scope, h.clock.now()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn delete_before_reports_count() {
    let h = harness();
    let scope = OpScope::new();
    let now = h.clock.now();

    h.jtis
        .create(&scope, &DeniedJti::new("a", now - Duration::seconds(10)))
        .await
        .unwrap();
    h.jtis
        .create(&scope, &DeniedJti::new("b", now - Duration::seconds(5)))
        .await
        .unwrap();
    h.jtis
        .create(&scope, &DeniedJti::new("c", now + Duration::seconds(5)))
        .await
        .unwrap();

    assert_eq!(h.jtis.delete_before(&scope, now).await.unwrap(), 2);
    assert!(h.jtis.get(&scope, &signature_from_jti("c")).await.is_ok());
}

#[tokio::test]
async fn cancellation_propagates_from_jti_checks() {
    let h = harness();
    let scope = OpScope::new();
    scope.cancel();
    assert!(matches!(
        h.jtis.is_jwt_used(&scope, "abc").await,
        Err(StoreError::Cancelled)
    ));
}
