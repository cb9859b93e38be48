//! InMemory Directory 実装
//!
//! ドメイン層が定義する `UserDirectory` / `GroupDirectory` trait の実装。
//! HashMap をインメモリ DB として使用し、登録順を別に保持します。
//! プロセス再起動でデータは失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    DirectoryError, Group, GroupDirectory, GroupId, User, UserDirectory, UserId,
};

#[derive(Debug, Default)]
struct Users {
    by_id: HashMap<UserId, User>,
    order: Vec<UserId>,
}

#[derive(Debug, Default)]
struct Groups {
    by_id: HashMap<GroupId, Group>,
    order: Vec<GroupId>,
}

/// In-memory user and group store.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<Users>,
    groups: RwLock<Groups>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<K, V: Clone>(order: &[K], by_id: &HashMap<K, V>, skip: usize, limit: usize) -> Vec<V>
where
    K: std::hash::Hash + Eq,
{
    order
        .iter()
        .skip(skip)
        .take(limit)
        .filter_map(|id| by_id.get(id).cloned())
        .collect()
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn get_user(&self, user_id: &UserId) -> Option<User> {
        self.users.read().await.by_id.get(user_id).cloned()
    }

    async fn list_users(&self, skip: usize, limit: usize) -> Vec<User> {
        let users = self.users.read().await;
        page(&users.order, &users.by_id, skip, limit)
    }

    async fn add_user(&self, user: User) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        if users.by_id.values().any(|u| u.email == user.email) {
            return Err(DirectoryError::EmailTaken(user.email));
        }
        users.order.push(user.id.clone());
        users.by_id.insert(user.id.clone(), user);
        Ok(())
    }
}

#[async_trait]
impl GroupDirectory for InMemoryDirectory {
    async fn get_group(&self, group_id: &GroupId) -> Option<Group> {
        self.groups.read().await.by_id.get(group_id).cloned()
    }

    async fn is_member(&self, group_id: &GroupId, user_id: &UserId) -> bool {
        self.groups
            .read()
            .await
            .by_id
            .get(group_id)
            .is_some_and(|group| group.is_member(user_id))
    }

    async fn list_groups(&self, skip: usize, limit: usize) -> Vec<Group> {
        let groups = self.groups.read().await;
        page(&groups.order, &groups.by_id, skip, limit)
    }

    async fn add_group(&self, group: Group) -> Result<(), DirectoryError> {
        let mut groups = self.groups.write().await;
        groups.order.push(group.id.clone());
        groups.by_id.insert(group.id.clone(), group);
        Ok(())
    }

    async fn add_member(
        &self,
        group_id: &GroupId,
        user_id: UserId,
    ) -> Result<Group, DirectoryError> {
        let mut groups = self.groups.write().await;
        let group = groups
            .by_id
            .get_mut(group_id)
            .ok_or_else(|| DirectoryError::GroupNotFound(group_id.to_string()))?;

        if group.is_member(&user_id) {
            return Err(DirectoryError::AlreadyMember {
                group_id: group_id.to_string(),
                user_id: user_id.into_string(),
            });
        }
        if group.is_full() {
            return Err(DirectoryError::GroupFull(group_id.to_string()));
        }

        group.members.push(user_id);
        Ok(group.clone())
    }
}
