//! UseCase: グループの作成・参加・一覧

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{DirectoryError, Group, GroupDirectory, GroupId, UserDirectory, UserId};

use super::error::DirectoryUseCaseError;

/// グループ作成のユースケース
pub struct CreateGroupUseCase {
    users: Arc<dyn UserDirectory>,
    groups: Arc<dyn GroupDirectory>,
}

impl CreateGroupUseCase {
    pub fn new(users: Arc<dyn UserDirectory>, groups: Arc<dyn GroupDirectory>) -> Self {
        Self { users, groups }
    }

    /// Create a group administered by `admin_id`, who becomes its first member.
    pub async fn execute(
        &self,
        admin_id: &UserId,
        name: String,
        description: Option<String>,
        max_members: usize,
    ) -> Result<Group, DirectoryUseCaseError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DirectoryUseCaseError::InvalidInput(
                "name must not be empty".to_string(),
            ));
        }
        if max_members == 0 {
            return Err(DirectoryUseCaseError::InvalidInput(
                "max_members must be at least 1".to_string(),
            ));
        }
        if self.users.get_user(admin_id).await.is_none() {
            return Err(DirectoryError::UserNotFound(admin_id.to_string()).into());
        }

        let id = GroupId::new(Uuid::new_v4().to_string())
            .map_err(|e| DirectoryUseCaseError::InvalidInput(e.to_string()))?;
        let group = Group {
            id,
            name,
            description,
            admin_id: admin_id.clone(),
            members: vec![admin_id.clone()],
            max_members,
        };
        self.groups.add_group(group.clone()).await?;

        tracing::info!(group_id = %group.id, admin_id = %admin_id, "Group created");
        Ok(group)
    }
}

/// グループ参加のユースケース
pub struct JoinGroupUseCase {
    users: Arc<dyn UserDirectory>,
    groups: Arc<dyn GroupDirectory>,
}

impl JoinGroupUseCase {
    pub fn new(users: Arc<dyn UserDirectory>, groups: Arc<dyn GroupDirectory>) -> Self {
        Self { users, groups }
    }

    pub async fn execute(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<Group, DirectoryUseCaseError> {
        if self.groups.get_group(group_id).await.is_none() {
            return Err(DirectoryError::GroupNotFound(group_id.to_string()).into());
        }
        if self.users.get_user(user_id).await.is_none() {
            return Err(DirectoryError::UserNotFound(user_id.to_string()).into());
        }

        let group = self.groups.add_member(group_id, user_id.clone()).await?;
        tracing::info!(group_id = %group_id, user_id = %user_id, "User joined group");
        Ok(group)
    }
}

/// グループ一覧取得のユースケース
pub struct ListGroupsUseCase {
    groups: Arc<dyn GroupDirectory>,
}

impl ListGroupsUseCase {
    pub fn new(groups: Arc<dyn GroupDirectory>) -> Self {
        Self { groups }
    }

    pub async fn execute(&self, skip: usize, limit: usize) -> Vec<Group> {
        self.groups.list_groups(skip, limit).await
    }
}
