//! User directory administration: profile CRUD and the manager hierarchy,
//! which must stay acyclic.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{Role, UserResponse};
use crate::service::Actor;
use crate::store::{NewUser, UserStore};

pub const DEFAULT_LEAVE_ENTITLEMENT: i32 = 30;

/// Admin-side creation input. `password_hash` is hashed at the boundary;
/// plaintext never reaches this layer.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub position: String,
    pub manager_id: Option<u64>,
    pub leave_entitlement: Option<i32>,
}

/// Partial update; absent fields keep their stored values. The manager
/// reference cannot be cleared through a patch, only reassigned.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub position: Option<String>,
    pub manager_id: Option<u64>,
    pub leave_entitlement: Option<i32>,
}

pub struct UserService<U> {
    users: U,
}

impl<U> UserService<U>
where
    U: UserStore,
{
    pub fn new(users: U) -> Self {
        Self { users }
    }

    pub async fn create(&self, input: CreateUser) -> Result<UserResponse> {
        let name = input.name.trim().to_string();
        let position = input.position.trim().to_string();
        let email = normalize_email(&input.email)?;
        if name.is_empty() {
            return Err(Error::invalid_input("name is required"));
        }
        if position.is_empty() {
            return Err(Error::invalid_input("position is required"));
        }

        if self.users.by_email(&email).await?.is_some() {
            return Err(Error::conflict("a user with this email already exists"));
        }
        if let Some(manager_id) = input.manager_id {
            if self.users.by_id(manager_id).await?.is_none() {
                return Err(Error::not_found("manager not found"));
            }
        }

        let created = self
            .users
            .create(NewUser {
                name,
                email,
                password: input.password_hash,
                role: input.role,
                position,
                manager_id: input.manager_id,
                leave_entitlement: input
                    .leave_entitlement
                    .unwrap_or(DEFAULT_LEAVE_ENTITLEMENT),
            })
            .await?;
        Ok(created.into())
    }

    pub async fn update(&self, id: u64, patch: UserPatch) -> Result<UserResponse> {
        let mut user = self
            .users
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;

        if let Some(email) = &patch.email {
            let email = normalize_email(email)?;
            if email != user.email {
                if let Some(other) = self.users.by_email(&email).await? {
                    if other.id != id {
                        return Err(Error::conflict(
                            "a user with this email already exists",
                        ));
                    }
                }
                user.email = email;
            }
        }

        if let Some(manager_id) = patch.manager_id {
            if manager_id == id {
                return Err(Error::invalid_input("a user cannot be their own manager"));
            }
            if self.users.by_id(manager_id).await?.is_none() {
                return Err(Error::not_found("manager not found"));
            }
            self.ensure_no_cycle(id, manager_id).await?;
            user.manager_id = Some(manager_id);
        }

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::invalid_input("name is required"));
            }
            user.name = name;
        }
        if let Some(position) = patch.position {
            let position = position.trim().to_string();
            if position.is_empty() {
                return Err(Error::invalid_input("position is required"));
            }
            user.position = position;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(hash) = patch.password_hash {
            user.password = hash;
        }
        if let Some(entitlement) = patch.leave_entitlement {
            if entitlement < 0 {
                return Err(Error::invalid_input(
                    "leave entitlement cannot be negative",
                ));
            }
            user.leave_entitlement = entitlement;
        }

        self.users.update(&user).await?;
        Ok(user.into())
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        let user = self
            .users
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if !self.users.subordinates(user.id).await?.is_empty() {
            return Err(Error::conflict(
                "this user still manages subordinates and cannot be deleted",
            ));
        }
        if !self.users.delete(id).await? {
            return Err(Error::not_found("user not found"));
        }
        Ok(())
    }

    pub async fn get(&self, id: u64) -> Result<UserResponse> {
        let user = self
            .users
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        Ok(user.into())
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>> {
        let users = self.users.all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Direct reports of `manager_id`, visible to that manager and admins.
    pub async fn subordinates(
        &self,
        manager_id: u64,
        actor: Actor,
    ) -> Result<Vec<UserResponse>> {
        if actor.user_id != manager_id && !actor.is_admin() {
            return Err(Error::unauthorized(
                "only the manager themself or an admin may list subordinates",
            ));
        }
        if self.users.by_id(manager_id).await?.is_none() {
            return Err(Error::not_found("user not found"));
        }
        let users = self.users.subordinates(manager_id).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Walks the proposed manager's chain upward; reaching `user_id` would
    /// close a reporting cycle. The visited set guards against walking a
    /// cycle already present in stored data.
    async fn ensure_no_cycle(&self, user_id: u64, proposed_manager: u64) -> Result<()> {
        let mut visited: HashSet<u64> = HashSet::new();
        let mut current = Some(proposed_manager);
        while let Some(id) = current {
            if id == user_id {
                return Err(Error::invalid_input("circular management relation"));
            }
            if !visited.insert(id) {
                break;
            }
            current = match self.users.by_id(id).await? {
                Some(manager) => manager.manager_id,
                None => None,
            };
        }
        Ok(())
    }
}

fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::invalid_input("a valid email is required"));
    }
    Ok(email)
}
