//! Sender resolution shared by the live session and message submission.

use crate::domain::{GroupDirectory, GroupId, User, UserDirectory, UserId};

use super::error::MembershipError;

/// Resolve `user_id` as a member of `group_id`.
///
/// The group is checked first, then the user, then membership. The returned
/// user carries the display name to stamp on messages.
pub(crate) async fn resolve_member(
    users: &dyn UserDirectory,
    groups: &dyn GroupDirectory,
    group_id: &GroupId,
    user_id: &UserId,
) -> Result<User, MembershipError> {
    if groups.get_group(group_id).await.is_none() {
        return Err(MembershipError::GroupNotFound(group_id.to_string()));
    }
    let user = users
        .get_user(user_id)
        .await
        .ok_or_else(|| MembershipError::UserNotFound(user_id.to_string()))?;
    if !groups.is_member(group_id, user_id).await {
        return Err(MembershipError::NotMember {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
        });
    }
    Ok(user)
}
