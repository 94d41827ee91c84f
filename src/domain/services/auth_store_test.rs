use std::env;
use std::fs;

use uuid::Uuid;

use super::AuthStore;
use crate::domain::models::SubscriptionTier;
use crate::domain::models::Theme;
use crate::domain::models::User;
use crate::domain::models::UserPatch;

fn fixture_user() -> User {
    return User {
        id: "user-1".to_string(),
        email: "dev@example.com".to_string(),
        username: "dev".to_string(),
        theme: Theme::Gray,
        subscription_tier: SubscriptionTier::Free,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    };
}

#[test]
fn it_establishes_a_session_and_derives_theme() {
    let mut store = AuthStore::in_memory();
    store.set_auth(fixture_user(), "token-abc");

    assert!(store.is_authenticated);
    assert_eq!(store.token.as_deref(), Some("token-abc"));
    assert_eq!(store.user.as_ref().unwrap().username, "dev");
    assert_eq!(store.theme, Theme::Gray);
}

#[test]
fn it_logs_out_idempotently() {
    let mut store = AuthStore::in_memory();
    store.set_auth(fixture_user(), "token-abc");

    store.logout();
    store.logout();

    assert!(!store.is_authenticated);
    assert!(store.user.is_none());
    assert!(store.token.is_none());
    assert_eq!(store.theme, Theme::Dark);
}

#[test]
fn it_leaves_no_residue_after_logout_and_reauth() {
    let mut fresh = AuthStore::in_memory();
    fresh.set_auth(fixture_user(), "token-abc");

    let mut reused = AuthStore::in_memory();
    let mut other = fixture_user();
    other.id = "user-2".to_string();
    other.theme = Theme::Light;
    reused.set_auth(other, "token-old");
    reused.set_theme(Theme::System);
    reused.logout();
    reused.set_auth(fixture_user(), "token-abc");

    assert_eq!(reused.user, fresh.user);
    assert_eq!(reused.token, fresh.token);
    assert_eq!(reused.is_authenticated, fresh.is_authenticated);
    assert_eq!(reused.theme, fresh.theme);
}

#[test]
fn it_merges_user_patches() {
    let mut store = AuthStore::in_memory();
    store.set_auth(fixture_user(), "token-abc");

    store.update_user(UserPatch {
        subscription_tier: Some(SubscriptionTier::Premium),
        ..UserPatch::default()
    });

    let user = store.user.as_ref().unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Premium);
    assert_eq!(user.username, "dev");
    assert_eq!(user.email, "dev@example.com");
}

#[test]
fn it_patches_against_an_empty_base_when_signed_out() {
    let mut store = AuthStore::in_memory();
    store.update_user(UserPatch {
        username: Some("ghost".to_string()),
        ..UserPatch::default()
    });

    let user = store.user.as_ref().unwrap();
    assert_eq!(user.username, "ghost");
    assert!(user.id.is_empty());
}

#[test]
fn it_mirrors_theme_into_the_user_record() {
    let mut store = AuthStore::in_memory();
    store.set_auth(fixture_user(), "token-abc");

    store.set_theme(Theme::Light);

    assert_eq!(store.theme, Theme::Light);
    assert_eq!(store.user.as_ref().unwrap().theme, Theme::Light);
}

#[test]
fn it_sets_theme_without_a_user() {
    let mut store = AuthStore::in_memory();
    store.set_theme(Theme::System);
    assert_eq!(store.theme, Theme::System);
    assert!(store.user.is_none());
}

#[test]
fn it_round_trips_through_persistence() {
    let storage_path = env::temp_dir()
        .join(format!("notfox-test-{}", Uuid::new_v4()))
        .join("notfox-auth.json");

    let mut store = AuthStore::load(storage_path.clone());
    store.set_auth(fixture_user(), "token-abc");
    store.set_theme(Theme::System);

    let rehydrated = AuthStore::load(storage_path.clone());
    assert_eq!(rehydrated.user, store.user);
    assert_eq!(rehydrated.token, store.token);
    assert_eq!(rehydrated.is_authenticated, store.is_authenticated);
    assert_eq!(rehydrated.theme, store.theme);

    fs::remove_dir_all(storage_path.parent().unwrap()).unwrap();
}

#[test]
fn it_degrades_to_signed_out_on_a_corrupt_record() {
    let dir = env::temp_dir().join(format!("notfox-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    let storage_path = dir.join("notfox-auth.json");
    fs::write(&storage_path, "not json at all").unwrap();

    let store = AuthStore::load(storage_path);
    assert!(!store.is_authenticated);
    assert!(store.user.is_none());
    assert!(store.token.is_none());
    assert_eq!(store.theme, Theme::Dark);

    fs::remove_dir_all(dir).unwrap();
}
