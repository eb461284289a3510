//! Integration tests for the access control manager.
//!
//! Each test wires its own manager over a fresh in-memory store seeded with
//! a `metalake` tenant, so tests share no state and can run in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use atrium_authz::{AccessControlManager, AuthzConfig, AuthzError};
use atrium_core::{
    AuditInfo, Entity, EntityId, EntityIdent, EntityStore, ID_KEY, InMemoryEntityStore,
    JsonEntitySerDe, Metalake, Privilege, RandomIdGenerator, SchemaVersion, SecurableObject,
    StoreConfig,
};

const METALAKE: &str = "metalake";

async fn seeded_store(serde: bool) -> Arc<dyn EntityStore> {
    let store: Arc<dyn EntityStore> = Arc::new(InMemoryEntityStore::new());
    store
        .initialize(&StoreConfig::default())
        .await
        .expect("initialize store");
    store.set_serde(if serde {
        Some(Arc::new(JsonEntitySerDe))
    } else {
        None
    });

    let metalake = Metalake::builder()
        .id(EntityId::new(1))
        .name(METALAKE)
        .audit(AuditInfo::now("test"))
        .version(SchemaVersion::V0_1)
        .try_build()
        .expect("build metalake");
    store
        .put(
            &EntityIdent::metalake(METALAKE),
            Entity::Metalake(metalake),
            true,
        )
        .await
        .expect("seed metalake");
    store
}

async fn manager() -> AccessControlManager {
    AccessControlManager::new(
        seeded_store(false).await,
        Arc::new(RandomIdGenerator::new()),
        &AuthzConfig::with_service_admins(["admin1", "admin2"]),
    )
}

#[tokio::test]
async fn add_user_roundtrip() {
    let manager = manager().await;

    let user = manager
        .add_user(METALAKE, "alice")
        .await
        .expect("add should succeed");
    assert_eq!(user.name(), "alice");
    assert!(user.roles().is_empty());
    assert!(!user.properties().contains_key(ID_KEY));

    let loaded = manager
        .get_user(METALAKE, "alice")
        .await
        .expect("get should succeed");
    assert_eq!(loaded.name(), "alice");
    assert!(loaded.roles().is_empty());
}

#[tokio::test]
async fn add_user_rejects_duplicates() {
    let manager = manager().await;

    let first = manager
        .add_user(METALAKE, "alice")
        .await
        .expect("add should succeed");

    let err = manager.add_user(METALAKE, "alice").await.unwrap_err();
    assert!(matches!(err, AuthzError::UserAlreadyExists { .. }));

    // The losing create left the first entity untouched.
    let loaded = manager
        .get_user(METALAKE, "alice")
        .await
        .expect("get should succeed");
    assert_eq!(loaded.id(), first.id());
}

#[tokio::test]
async fn get_missing_user_names_the_user() {
    let manager = manager().await;

    let err = manager.get_user(METALAKE, "bob").await.unwrap_err();
    assert!(matches!(err, AuthzError::NoSuchUser { .. }));
    assert!(err.to_string().contains("User bob does not exist"));
}

#[tokio::test]
async fn remove_user_is_idempotent() {
    let manager = manager().await;
    manager
        .add_user(METALAKE, "alice")
        .await
        .expect("add should succeed");

    assert!(manager
        .remove_user(METALAKE, "alice")
        .await
        .expect("remove should succeed"));
    assert!(!manager
        .remove_user(METALAKE, "alice")
        .await
        .expect("remove should succeed"));
    assert!(!manager
        .remove_user(METALAKE, "never-existed")
        .await
        .expect("remove should succeed"));
}

#[tokio::test]
async fn group_lifecycle_mirrors_users() {
    let manager = manager().await;

    let group = manager
        .add_group(METALAKE, "eng")
        .await
        .expect("add should succeed");
    assert_eq!(group.name(), "eng");
    assert!(group.roles().is_empty());
    assert!(!group.properties().contains_key(ID_KEY));

    let err = manager.add_group(METALAKE, "eng").await.unwrap_err();
    assert!(matches!(err, AuthzError::GroupAlreadyExists { .. }));

    let loaded = manager
        .get_group(METALAKE, "eng")
        .await
        .expect("get should succeed");
    assert_eq!(loaded.name(), "eng");

    let err = manager.get_group(METALAKE, "ops").await.unwrap_err();
    assert!(err.to_string().contains("Group ops does not exist"));

    assert!(manager
        .remove_group(METALAKE, "eng")
        .await
        .expect("remove should succeed"));
    assert!(!manager
        .remove_group(METALAKE, "eng")
        .await
        .expect("remove should succeed"));
}

#[tokio::test]
async fn operations_require_an_existing_metalake() {
    let manager = manager().await;

    let add_user = manager.add_user("no-exist", "alice").await.unwrap_err();
    assert!(matches!(add_user, AuthzError::NoSuchMetalake { .. }));
    assert!(add_user.to_string().contains("no-exist"));

    let add_group = manager.add_group("no-exist", "eng").await.unwrap_err();
    assert!(matches!(add_group, AuthzError::NoSuchMetalake { .. }));

    let create_role = manager
        .create_role(
            "no-exist",
            "reader",
            HashMap::new(),
            SecurableObject::all_catalogs(),
            Vec::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(create_role, AuthzError::NoSuchMetalake { .. }));

    let get_user = manager.get_user("no-exist", "alice").await.unwrap_err();
    assert!(matches!(get_user, AuthzError::NoSuchMetalake { .. }));

    let remove_user = manager.remove_user("no-exist", "alice").await.unwrap_err();
    assert!(matches!(remove_user, AuthzError::NoSuchMetalake { .. }));
}

#[tokio::test]
async fn role_lifecycle() {
    let manager = manager().await;
    let props = HashMap::from([("k1".to_string(), "v1".to_string())]);

    let role = manager
        .create_role(
            METALAKE,
            "reader",
            props.clone(),
            SecurableObject::all_catalogs().with_privileges(vec![Privilege::Read]),
            Vec::new(),
        )
        .await
        .expect("create should succeed");
    assert_eq!(role.name(), "reader");
    assert_eq!(role.properties().get("k1").map(String::as_str), Some("v1"));
    assert!(!role.properties().contains_key(ID_KEY));
    assert_eq!(role.securable_objects().len(), 1);
    assert_eq!(role.securable_objects()[0].privileges(), [Privilege::Read]);

    let err = manager
        .create_role(
            METALAKE,
            "reader",
            props,
            SecurableObject::all_catalogs(),
            Vec::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::RoleAlreadyExists { .. }));

    let loaded = manager
        .load_role(METALAKE, "reader")
        .await
        .expect("load should succeed");
    assert_eq!(loaded.name(), "reader");
    assert_eq!(
        loaded.properties().get("k1").map(String::as_str),
        Some("v1")
    );
    assert!(!loaded.properties().contains_key(ID_KEY));

    assert!(manager
        .drop_role(METALAKE, "reader")
        .await
        .expect("drop should succeed"));
    assert!(!manager
        .drop_role(METALAKE, "reader")
        .await
        .expect("drop should succeed"));

    let err = manager.load_role(METALAKE, "reader").await.unwrap_err();
    assert!(matches!(err, AuthzError::NoSuchRole { .. }));
    assert!(err.to_string().contains("Role reader does not exist"));
}

#[tokio::test]
async fn role_keeps_auxiliary_grants_in_order() {
    let manager = manager().await;

    let role = manager
        .create_role(
            METALAKE,
            "curator",
            HashMap::new(),
            SecurableObject::all_catalogs().with_privileges(vec![Privilege::Read]),
            vec![
                SecurableObject::catalog("sales").with_privileges(vec![Privilege::Write]),
                SecurableObject::table("sales", "eu", "orders")
                    .with_privileges(vec![Privilege::Manage]),
            ],
        )
        .await
        .expect("create should succeed");

    let scopes: Vec<String> = role
        .securable_objects()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(scopes, ["*", "sales", "sales.eu.orders"]);
}

#[tokio::test]
async fn create_role_rejects_reserved_property_key() {
    let manager = manager().await;
    let tainted = HashMap::from([(ID_KEY.to_string(), "spoofed".to_string())]);

    let err = manager
        .create_role(
            METALAKE,
            "reader",
            tainted,
            SecurableObject::all_catalogs(),
            Vec::new(),
        )
        .await
        .unwrap_err();
    let AuthzError::Core(inner) = err else {
        panic!("expected core error, got {err:?}");
    };
    assert!(matches!(
        inner,
        atrium_core::Error::ReservedKeyConflict { .. }
    ));
}

#[tokio::test]
async fn metalake_admin_lifecycle() {
    let manager = manager().await;

    let admin = manager
        .add_metalake_admin("dana")
        .await
        .expect("add should succeed");
    assert_eq!(admin.name(), "dana");
    assert!(admin.roles().is_empty());
    assert!(manager
        .is_metalake_admin("dana")
        .await
        .expect("check should succeed"));

    let err = manager.add_metalake_admin("dana").await.unwrap_err();
    assert!(matches!(err, AuthzError::UserAlreadyExists { .. }));

    assert!(manager
        .remove_metalake_admin("dana")
        .await
        .expect("remove should succeed"));
    assert!(!manager
        .is_metalake_admin("dana")
        .await
        .expect("check should succeed"));
    assert!(!manager
        .remove_metalake_admin("no-exist")
        .await
        .expect("remove should succeed"));
}

#[tokio::test]
async fn service_admins_come_from_configuration_only() {
    let manager = manager().await;

    assert!(manager.is_service_admin("admin1"));
    assert!(manager.is_service_admin("admin2"));
    assert!(!manager.is_service_admin("admin3"));

    // Metalake-admin changes never leak into the configured set.
    manager
        .add_metalake_admin("admin3")
        .await
        .expect("add should succeed");
    assert!(!manager.is_service_admin("admin3"));
    manager
        .remove_metalake_admin("admin3")
        .await
        .expect("remove should succeed");
    assert!(manager.is_service_admin("admin1"));
}

#[tokio::test]
async fn metalake_admins_do_not_shadow_tenant_users() {
    let manager = manager().await;

    manager
        .add_metalake_admin("alice")
        .await
        .expect("add admin should succeed");

    // The tenant namespace is independent of the reserved system scope.
    let err = manager.get_user(METALAKE, "alice").await.unwrap_err();
    assert!(matches!(err, AuthzError::NoSuchUser { .. }));
    manager
        .add_user(METALAKE, "alice")
        .await
        .expect("add user should succeed");
    assert!(manager
        .is_metalake_admin("alice")
        .await
        .expect("check should succeed"));
}

#[tokio::test]
async fn internal_identifier_never_leaks_through_serde_backend() {
    let manager = AccessControlManager::new(
        seeded_store(true).await,
        Arc::new(RandomIdGenerator::new()),
        &AuthzConfig::with_service_admins(["admin1"]),
    );

    let user = manager
        .add_user(METALAKE, "alice")
        .await
        .expect("add should succeed");
    assert!(!user.properties().contains_key(ID_KEY));

    let loaded = manager
        .get_user(METALAKE, "alice")
        .await
        .expect("get should succeed");
    assert!(!loaded.properties().contains_key(ID_KEY));

    let role = manager
        .create_role(
            METALAKE,
            "reader",
            HashMap::from([("k".to_string(), "v".to_string())]),
            SecurableObject::all_catalogs(),
            Vec::new(),
        )
        .await
        .expect("create should succeed");
    assert!(!role.properties().contains_key(ID_KEY));

    let loaded = manager
        .load_role(METALAKE, "reader")
        .await
        .expect("load should succeed");
    assert!(!loaded.properties().contains_key(ID_KEY));
    assert_eq!(loaded.properties().get("k").map(String::as_str), Some("v"));
}

/// Many tasks race to create the same user; the store's conditional put
/// admits exactly one winner.
#[tokio::test]
async fn concurrent_duplicate_creation_has_one_winner() {
    let manager = Arc::new(AccessControlManager::new(
        seeded_store(true).await,
        Arc::new(RandomIdGenerator::new()),
        &AuthzConfig::default(),
    ));

    let created = Arc::new(AtomicU32::new(0));
    let conflicted = Arc::new(AtomicU32::new(0));
    let num_tasks = 8_u32;

    let handles: Vec<_> = (0..num_tasks)
        .map(|_| {
            let manager = manager.clone();
            let created = created.clone();
            let conflicted = conflicted.clone();

            tokio::spawn(async move {
                match manager.add_user(METALAKE, "race").await {
                    Ok(_) => {
                        created.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(AuthzError::UserAlreadyExists { .. }) => {
                        conflicted.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(other) => panic!("unexpected error: {other}"),
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task should not panic");
    }

    assert_eq!(created.load(Ordering::SeqCst), 1, "exactly one winner");
    assert_eq!(
        conflicted.load(Ordering::SeqCst),
        num_tasks - 1,
        "all losers observe the conflict"
    );

    let user = manager
        .get_user(METALAKE, "race")
        .await
        .expect("get should succeed");
    assert_eq!(user.name(), "race");
}
