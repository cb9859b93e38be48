//! UseCase: ユーザーの登録と参照

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{DirectoryError, User, UserDirectory, UserId};

use super::error::DirectoryUseCaseError;

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    users: Arc<dyn UserDirectory>,
}

impl RegisterUserUseCase {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Register a user with a generated id.
    ///
    /// The name must not be blank and the email must look like an address.
    pub async fn execute(&self, name: String, email: String) -> Result<User, DirectoryUseCaseError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DirectoryUseCaseError::InvalidInput(
                "name must not be empty".to_string(),
            ));
        }
        let email = email.trim().to_string();
        if !is_plausible_email(&email) {
            return Err(DirectoryUseCaseError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        let id = UserId::new(Uuid::new_v4().to_string())
            .map_err(|e| DirectoryUseCaseError::InvalidInput(e.to_string()))?;
        let user = User { id, name, email };
        self.users.add_user(user.clone()).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// ユーザー取得のユースケース
pub struct GetUserUseCase {
    users: Arc<dyn UserDirectory>,
}

impl GetUserUseCase {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, user_id: &UserId) -> Result<User, DirectoryUseCaseError> {
        self.users
            .get_user(user_id)
            .await
            .ok_or_else(|| DirectoryError::UserNotFound(user_id.to_string()).into())
    }
}

/// ユーザー一覧取得のユースケース
pub struct ListUsersUseCase {
    users: Arc<dyn UserDirectory>,
}

impl ListUsersUseCase {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, skip: usize, limit: usize) -> Vec<User> {
        self.users.list_users(skip, limit).await
    }
}
