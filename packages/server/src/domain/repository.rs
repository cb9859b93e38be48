//! Directory traits
//!
//! The user and group records live outside the real-time core. These traits
//! are the only view the core has of them; the infrastructure layer provides
//! the implementation (依存性の逆転).

use async_trait::async_trait;

use super::{
    entity::{Group, User},
    error::DirectoryError,
    value_object::{GroupId, UserId},
};

/// User lookup and registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user. `None` means the sender is unknown.
    async fn get_user(&self, user_id: &UserId) -> Option<User>;

    /// Users in registration order, `skip`/`limit` paged.
    async fn list_users(&self, skip: usize, limit: usize) -> Vec<User>;

    /// Store a new user. Fails with `EmailTaken` if the email is in use.
    async fn add_user(&self, user: User) -> Result<(), DirectoryError>;
}

/// Group lookup, membership and creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn get_group(&self, group_id: &GroupId) -> Option<Group>;

    async fn is_member(&self, group_id: &GroupId, user_id: &UserId) -> bool;

    /// Groups in creation order, `skip`/`limit` paged.
    async fn list_groups(&self, skip: usize, limit: usize) -> Vec<Group>;

    async fn add_group(&self, group: Group) -> Result<(), DirectoryError>;

    /// Append `user_id` to the group's members and return the updated group.
    ///
    /// Fails with `GroupNotFound`, `AlreadyMember` or `GroupFull`.
    async fn add_member(
        &self,
        group_id: &GroupId,
        user_id: UserId,
    ) -> Result<Group, DirectoryError>;
}
