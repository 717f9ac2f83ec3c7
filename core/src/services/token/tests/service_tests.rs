//! Unit tests for the token lifecycle service

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainError, TokenError};
use crate::repositories::MockRevocationStore;
use crate::services::token::{TokenConfig, TokenService};

fn create_test_service() -> TokenService<MockRevocationStore> {
    TokenService::new(MockRevocationStore::new(), TokenConfig::default())
}

#[tokio::test]
async fn test_create_pair() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();
    let org_id = Uuid::new_v4();

    let pair = service
        .create_pair(user_id, org_id, "user@example.com", false)
        .unwrap();

    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_eq!(pair.token_type, "bearer");
    assert_eq!(pair.expires_in, 30 * 60);

    let access = service
        .validate(&pair.access_token, TokenKind::Access)
        .await
        .unwrap();
    let refresh = service
        .validate(&pair.refresh_token, TokenKind::Refresh)
        .await
        .unwrap();

    // Both tokens carry identical subject/tenant claims
    assert_eq!(access.sub, refresh.sub);
    assert_eq!(access.org_id, refresh.org_id);
    assert_eq!(access.email, refresh.email);
    assert_eq!(access.exp - access.iat, 30 * 60);
}

#[tokio::test]
async fn test_access_token_cannot_refresh() {
    let service = create_test_service();
    let pair = service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    let result = service
        .refresh(&pair.access_token, "user@example.com", false)
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::WrongTokenType { .. }))
    ));
}

#[tokio::test]
async fn test_refresh_rotates_and_is_single_use() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();
    let org_id = Uuid::new_v4();

    let pair = service
        .create_pair(user_id, org_id, "user@example.com", false)
        .unwrap();

    // First exchange succeeds and yields a usable new pair
    let new_pair = service
        .refresh(&pair.refresh_token, "user@example.com", false)
        .await
        .unwrap();
    assert_ne!(new_pair.refresh_token, pair.refresh_token);
    service
        .validate(&new_pair.access_token, TokenKind::Access)
        .await
        .unwrap();

    // Reusing the rotated token fails even though its signature and
    // expiry are still technically valid
    let reuse = service
        .refresh(&pair.refresh_token, "user@example.com", false)
        .await;
    assert!(matches!(
        reuse,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
}

#[tokio::test]
async fn test_rotated_refresh_token_fails_validation() {
    let service = create_test_service();
    let pair = service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    service
        .refresh(&pair.refresh_token, "user@example.com", false)
        .await
        .unwrap();

    let result = service
        .validate(&pair.refresh_token, TokenKind::Refresh)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
}

#[tokio::test]
async fn test_revoke_blacklists_for_remaining_lifetime() {
    let service = create_test_service();
    let pair = service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    let revoked = service
        .revoke(&pair.access_token, TokenKind::Access)
        .await
        .unwrap();
    assert!(revoked);

    let result = service.validate(&pair.access_token, TokenKind::Access).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
}

#[tokio::test]
async fn test_revoke_all_invalidates_earlier_tokens() {
    let store = MockRevocationStore::new();
    let service = TokenService::new(store, TokenConfig::default());
    let user_id = Uuid::new_v4();
    let org_id = Uuid::new_v4();

    // A token issued well before the marker
    let mut old_claims = Claims::new(
        user_id,
        org_id,
        Some("user@example.com".to_string()),
        false,
        TokenKind::Access,
        Duration::minutes(30),
    );
    old_claims.iat = Utc::now().timestamp() - 100;
    let old_token = service.codec().encode(&old_claims).unwrap();

    assert!(service.revoke_all(user_id).await.unwrap());

    let result = service.validate(&old_token, TokenKind::Access).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
}

#[tokio::test]
async fn test_revoke_all_spares_later_tokens() {
    let store = MockRevocationStore::new();
    let user_id = Uuid::new_v4();
    store
        .set_marker(user_id, Utc::now() - Duration::seconds(10))
        .await;

    let service = TokenService::new(store, TokenConfig::default());

    // Issued after the marker: standing is reset, token stays valid
    let pair = service
        .create_pair(user_id, Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    service
        .validate(&pair.access_token, TokenKind::Access)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_revoke_all_does_not_affect_other_users() {
    let service = create_test_service();
    let victim = Uuid::new_v4();
    let bystander = Uuid::new_v4();
    let org_id = Uuid::new_v4();

    let mut bystander_claims = Claims::new(
        bystander,
        org_id,
        None,
        false,
        TokenKind::Access,
        Duration::minutes(30),
    );
    bystander_claims.iat = Utc::now().timestamp() - 100;
    let bystander_token = service.codec().encode(&bystander_claims).unwrap();

    assert!(service.revoke_all(victim).await.unwrap());

    service
        .validate(&bystander_token, TokenKind::Access)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_disabled_store_falls_back_to_signature_checks() {
    let service = TokenService::new(MockRevocationStore::disabled(), TokenConfig::default());
    let pair = service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    // Validation proceeds on signature/expiry alone
    service
        .validate(&pair.access_token, TokenKind::Access)
        .await
        .unwrap();

    // Explicit revocation cannot be honored and reports failure
    assert!(!service
        .revoke(&pair.access_token, TokenKind::Access)
        .await
        .unwrap());
    assert!(!service.revoke_all(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_disabled_store_cannot_enforce_rotation() {
    let service = TokenService::new(MockRevocationStore::disabled(), TokenConfig::default());
    let pair = service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    // Without a store there is no blacklist, so both exchanges succeed;
    // this is the documented availability trade-off.
    service
        .refresh(&pair.refresh_token, "user@example.com", false)
        .await
        .unwrap();
    service
        .refresh(&pair.refresh_token, "user@example.com", false)
        .await
        .unwrap();
}

/// Store whose reads always error, as when Redis drops mid-flight
struct FailingRevocationStore;

#[async_trait::async_trait]
impl crate::repositories::RevocationStore for FailingRevocationStore {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn blacklist(
        &self,
        _token: &str,
        _ttl: Duration,
    ) -> Result<(), crate::errors::StoreError> {
        Err(crate::errors::StoreError::Unavailable {
            message: "connection reset".to_string(),
        })
    }

    async fn is_blacklisted(&self, _token: &str) -> Result<bool, crate::errors::StoreError> {
        Err(crate::errors::StoreError::Unavailable {
            message: "connection reset".to_string(),
        })
    }

    async fn revoke_all(
        &self,
        _user_id: Uuid,
        _ttl: Duration,
    ) -> Result<(), crate::errors::StoreError> {
        Err(crate::errors::StoreError::Unavailable {
            message: "connection reset".to_string(),
        })
    }

    async fn revoked_since(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<chrono::DateTime<Utc>>, crate::errors::StoreError> {
        Err(crate::errors::StoreError::Unavailable {
            message: "connection reset".to_string(),
        })
    }
}

#[tokio::test]
async fn test_store_errors_fail_open_by_default() {
    let service = TokenService::new(FailingRevocationStore, TokenConfig::default());
    let pair = service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    // Revocation reads error out, the token is treated as not revoked
    service
        .validate(&pair.access_token, TokenKind::Access)
        .await
        .unwrap();

    // Explicit revocation still reports failure
    assert!(!service
        .revoke(&pair.access_token, TokenKind::Access)
        .await
        .unwrap());
    assert!(!service.revoke_all(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_store_errors_propagate_when_fail_open_disabled() {
    let config = TokenConfig {
        revocation_fail_open: false,
        ..TokenConfig::default()
    };
    let service = TokenService::new(FailingRevocationStore, config);
    let pair = service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    let result = service.validate(&pair.access_token, TokenKind::Access).await;
    assert!(matches!(result, Err(DomainError::Store(_))));
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let service = create_test_service();

    let result = service.validate("garbage", TokenKind::Access).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}
