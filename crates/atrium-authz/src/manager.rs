//! Access control orchestration over the entity store.
//!
//! The manager is a stateless façade: it validates tenant existence,
//! enforces per-tenant name uniqueness, and coordinates identity generation
//! with store writes. It holds no locks of its own; all race safety
//! derives from the store's atomic conditional put, which admits at most
//! one winner per natural key under concurrent creation attempts. Every
//! error crosses this layer unchanged; there is no retry or local recovery
//! here.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use atrium_core::{
    AuditInfo, Entity, EntityIdent, EntityStore, Error, Group, IdGenerator, Metalake, Role,
    SecurableObject, StringIdentifier, User,
};

use crate::config::AuthzConfig;
use crate::error::{AuthzError, Result};

/// Reserved tenant holding metalake-admin user entities.
///
/// The scope is a naming convention only; no metalake entity is persisted
/// for it, and admin operations skip tenant resolution.
pub const SYSTEM_METALAKE: &str = "system";

/// Actor recorded on audit stamps for manager-created entities.
const SYSTEM_ACTOR: &str = "system";

/// Orchestrates principal and role lifecycles scoped to tenants.
///
/// Safe to share across request-handling tasks; clone the [`Arc`]s it is
/// constructed from rather than the manager itself.
pub struct AccessControlManager {
    store: Arc<dyn EntityStore>,
    id_generator: Arc<dyn IdGenerator>,
    service_admins: HashSet<String>,
}

impl AccessControlManager {
    /// Wires the manager to its collaborators.
    ///
    /// The service-admin list is snapshotted from `config` at construction
    /// and immutable afterwards.
    #[must_use]
    pub fn new(
        store: Arc<dyn EntityStore>,
        id_generator: Arc<dyn IdGenerator>,
        config: &AuthzConfig,
    ) -> Self {
        Self {
            store,
            id_generator,
            service_admins: config.service_admins.iter().cloned().collect(),
        }
    }

    /// Adds a user to a metalake.
    ///
    /// The new user starts with an empty role list.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist,
    /// [`AuthzError::UserAlreadyExists`] on a name collision.
    pub async fn add_user(&self, metalake: &str, name: &str) -> Result<User> {
        self.require_metalake(metalake).await?;
        let user = self.new_user(name)?;
        self.store
            .put(
                &EntityIdent::user(metalake, name),
                Entity::User(user.clone()),
                false,
            )
            .await
            .map_err(AuthzError::from_store)?;
        tracing::debug!(metalake, user = name, "added user");
        Ok(sanitize_user(user))
    }

    /// Fetches a user from a metalake.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist,
    /// [`AuthzError::NoSuchUser`] if the user does not.
    pub async fn get_user(&self, metalake: &str, name: &str) -> Result<User> {
        self.require_metalake(metalake).await?;
        let entity = self
            .store
            .get(&EntityIdent::user(metalake, name))
            .await
            .map_err(AuthzError::from_store)?;
        Ok(sanitize_user(entity.into_user()?))
    }

    /// Removes a user from a metalake.
    ///
    /// Idempotent: returns `false`, never an error, when the user is
    /// already absent.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist.
    pub async fn remove_user(&self, metalake: &str, name: &str) -> Result<bool> {
        self.require_metalake(metalake).await?;
        let removed = self
            .store
            .delete(&EntityIdent::user(metalake, name))
            .await
            .map_err(AuthzError::from_store)?;
        if removed {
            tracing::debug!(metalake, user = name, "removed user");
        }
        Ok(removed)
    }

    /// Adds a group to a metalake.
    ///
    /// The new group starts with an empty role list.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist,
    /// [`AuthzError::GroupAlreadyExists`] on a name collision.
    pub async fn add_group(&self, metalake: &str, name: &str) -> Result<Group> {
        self.require_metalake(metalake).await?;
        let id = self.id_generator.next_id()?;
        let properties = StringIdentifier::from_id(id).embed_in_properties(HashMap::new())?;
        let group = Group::builder()
            .id(id)
            .name(name)
            .properties(properties)
            .audit(AuditInfo::now(SYSTEM_ACTOR))
            .try_build()?;
        self.store
            .put(
                &EntityIdent::group(metalake, name),
                Entity::Group(group.clone()),
                false,
            )
            .await
            .map_err(AuthzError::from_store)?;
        tracing::debug!(metalake, group = name, "added group");
        Ok(sanitize_group(group))
    }

    /// Fetches a group from a metalake.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist,
    /// [`AuthzError::NoSuchGroup`] if the group does not.
    pub async fn get_group(&self, metalake: &str, name: &str) -> Result<Group> {
        self.require_metalake(metalake).await?;
        let entity = self
            .store
            .get(&EntityIdent::group(metalake, name))
            .await
            .map_err(AuthzError::from_store)?;
        Ok(sanitize_group(entity.into_group()?))
    }

    /// Removes a group from a metalake.
    ///
    /// Idempotent: returns `false`, never an error, when the group is
    /// already absent.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist.
    pub async fn remove_group(&self, metalake: &str, name: &str) -> Result<bool> {
        self.require_metalake(metalake).await?;
        let removed = self
            .store
            .delete(&EntityIdent::group(metalake, name))
            .await
            .map_err(AuthzError::from_store)?;
        if removed {
            tracing::debug!(metalake, group = name, "removed group");
        }
        Ok(removed)
    }

    /// Creates a role bundling the given grants.
    ///
    /// `securable_object` is the primary grant target; `auxiliary_grants`
    /// are stored after it in order. The caller-supplied properties must
    /// not use the reserved internal identifier key.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist,
    /// [`AuthzError::RoleAlreadyExists`] on a name collision, and a
    /// reserved-key conflict from the core layer if `properties` already
    /// carries the internal key.
    pub async fn create_role(
        &self,
        metalake: &str,
        name: &str,
        properties: HashMap<String, String>,
        securable_object: SecurableObject,
        auxiliary_grants: Vec<SecurableObject>,
    ) -> Result<Role> {
        self.require_metalake(metalake).await?;
        let id = self.id_generator.next_id()?;
        let properties = StringIdentifier::from_id(id).embed_in_properties(properties)?;

        let mut securable_objects = Vec::with_capacity(1 + auxiliary_grants.len());
        securable_objects.push(securable_object);
        securable_objects.extend(auxiliary_grants);

        let role = Role::builder()
            .id(id)
            .name(name)
            .properties(properties)
            .securable_objects(securable_objects)
            .audit(AuditInfo::now(SYSTEM_ACTOR))
            .try_build()?;
        self.store
            .put(
                &EntityIdent::role(metalake, name),
                Entity::Role(role.clone()),
                false,
            )
            .await
            .map_err(AuthzError::from_store)?;
        tracing::info!(metalake, role = name, "created role");
        Ok(sanitize_role(role))
    }

    /// Fetches a role from a metalake.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist,
    /// [`AuthzError::NoSuchRole`] if the role does not.
    pub async fn load_role(&self, metalake: &str, name: &str) -> Result<Role> {
        self.require_metalake(metalake).await?;
        let entity = self
            .store
            .get(&EntityIdent::role(metalake, name))
            .await
            .map_err(AuthzError::from_store)?;
        Ok(sanitize_role(entity.into_role()?))
    }

    /// Drops a role from a metalake.
    ///
    /// Idempotent: returns `false`, never an error, when the role is
    /// already absent.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NoSuchMetalake`] if the tenant does not exist.
    pub async fn drop_role(&self, metalake: &str, name: &str) -> Result<bool> {
        self.require_metalake(metalake).await?;
        let removed = self
            .store
            .delete(&EntityIdent::role(metalake, name))
            .await
            .map_err(AuthzError::from_store)?;
        if removed {
            tracing::info!(metalake, role = name, "dropped role");
        }
        Ok(removed)
    }

    /// Registers a metalake admin.
    ///
    /// Admins are user entities under the reserved [`SYSTEM_METALAKE`]
    /// scope, persisted like any other user.
    ///
    /// # Errors
    ///
    /// [`AuthzError::UserAlreadyExists`] if the name is already
    /// registered.
    pub async fn add_metalake_admin(&self, name: &str) -> Result<User> {
        let user = self.new_user(name)?;
        self.store
            .put(
                &EntityIdent::user(SYSTEM_METALAKE, name),
                Entity::User(user.clone()),
                false,
            )
            .await
            .map_err(AuthzError::from_store)?;
        tracing::info!(user = name, "registered metalake admin");
        Ok(sanitize_user(user))
    }

    /// Whether a name is a registered metalake admin.
    ///
    /// A pure lookup: an unregistered name is `Ok(false)`, not an error.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn is_metalake_admin(&self, name: &str) -> Result<bool> {
        match self
            .store
            .get(&EntityIdent::user(SYSTEM_METALAKE, name))
            .await
        {
            Ok(_) => Ok(true),
            Err(Error::EntityNotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Unregisters a metalake admin.
    ///
    /// Idempotent: returns `false`, never an error, when the name is not
    /// registered.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn remove_metalake_admin(&self, name: &str) -> Result<bool> {
        let removed = self
            .store
            .delete(&EntityIdent::user(SYSTEM_METALAKE, name))
            .await
            .map_err(AuthzError::from_store)?;
        if removed {
            tracing::info!(user = name, "unregistered metalake admin");
        }
        Ok(removed)
    }

    /// Whether a name is a configured service admin.
    ///
    /// An O(1) membership test against the set loaded at construction;
    /// never touches the entity store.
    #[must_use]
    pub fn is_service_admin(&self, name: &str) -> bool {
        self.service_admins.contains(name)
    }

    /// Resolves the tenant root, mapping absence to
    /// [`AuthzError::NoSuchMetalake`].
    async fn require_metalake(&self, metalake: &str) -> Result<Metalake> {
        let entity = self
            .store
            .get(&EntityIdent::metalake(metalake))
            .await
            .map_err(AuthzError::from_store)?;
        Ok(entity.into_metalake()?)
    }

    /// Builds a fresh user with an embedded identifier and no roles.
    fn new_user(&self, name: &str) -> Result<User> {
        let id = self.id_generator.next_id()?;
        let properties = StringIdentifier::from_id(id).embed_in_properties(HashMap::new())?;
        Ok(User::builder()
            .id(id)
            .name(name)
            .properties(properties)
            .audit(AuditInfo::now(SYSTEM_ACTOR))
            .try_build()?)
    }
}

fn sanitize_user(user: User) -> User {
    let properties = StringIdentifier::strip_from_properties(user.properties().clone());
    user.with_properties(properties)
}

fn sanitize_group(group: Group) -> Group {
    let properties = StringIdentifier::strip_from_properties(group.properties().clone());
    group.with_properties(properties)
}

fn sanitize_role(role: Role) -> Role {
    let properties = StringIdentifier::strip_from_properties(role.properties().clone());
    role.with_properties(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::{InMemoryEntityStore, RandomIdGenerator};

    fn manager_without_tenants() -> AccessControlManager {
        AccessControlManager::new(
            Arc::new(InMemoryEntityStore::new()),
            Arc::new(RandomIdGenerator::new()),
            &AuthzConfig::with_service_admins(["root"]),
        )
    }

    #[test]
    fn service_admin_set_is_snapshotted() {
        let mut config = AuthzConfig::with_service_admins(["root"]);
        let manager = AccessControlManager::new(
            Arc::new(InMemoryEntityStore::new()),
            Arc::new(RandomIdGenerator::new()),
            &config,
        );
        config.service_admins.push("late".to_string());
        assert!(manager.is_service_admin("root"));
        assert!(!manager.is_service_admin("late"));
    }

    #[test]
    fn sanitize_strips_the_internal_key() {
        let manager = manager_without_tenants();
        let user = manager.new_user("alice").expect("build user");
        assert!(user.properties().contains_key(atrium_core::ID_KEY));
        let clean = sanitize_user(user);
        assert!(clean.properties().is_empty());
    }
}
