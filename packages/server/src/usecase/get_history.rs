//! UseCase: 履歴取得
//!
//! 非ライブ（リクエスト / レスポンス）のクライアント向けに、グループの直近の
//! メッセージを古い順で返す。

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, GroupDirectory, GroupId},
    infrastructure::live::GroupChannel,
};

use super::error::GetHistoryError;

/// 履歴取得のユースケース
pub struct GetHistoryUseCase {
    groups: Arc<dyn GroupDirectory>,
    channel: Arc<GroupChannel>,
}

impl GetHistoryUseCase {
    pub fn new(groups: Arc<dyn GroupDirectory>, channel: Arc<GroupChannel>) -> Self {
        Self { groups, channel }
    }

    pub async fn execute(&self, group_id: &GroupId) -> Result<Vec<ChatMessage>, GetHistoryError> {
        if self.groups.get_group(group_id).await.is_none() {
            return Err(GetHistoryError::GroupNotFound(group_id.to_string()));
        }
        Ok(self.channel.replay(group_id))
    }
}
