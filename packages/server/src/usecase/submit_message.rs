//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitMessageUseCase::execute() メソッド
//! - 送信者の検証、表示名の解決、履歴への追加とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 存在しないグループへの送信で履歴が変更されないことを保証する
//! - 表示名はクライアントの申告ではなくディレクトリから解決されることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの送信が接続中の全員に届く
//! - 異常系：グループなし / ユーザーなし / 非メンバー / 空メッセージ

use std::sync::Arc;

use crate::{
    domain::{
        ChatMessage, GroupDirectory, GroupId, MessageDraft, MessageText, UserDirectory, UserId,
    },
    infrastructure::live::GroupChannel,
};

use super::{error::SubmitMessageError, membership::resolve_member};

/// メッセージ送信のユースケース
///
/// REST とライブ接続の両方の取り込み経路がこのユースケースを通る。
pub struct SubmitMessageUseCase {
    users: Arc<dyn UserDirectory>,
    groups: Arc<dyn GroupDirectory>,
    channel: Arc<GroupChannel>,
}

impl SubmitMessageUseCase {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        groups: Arc<dyn GroupDirectory>,
        channel: Arc<GroupChannel>,
    ) -> Self {
        Self {
            users,
            groups,
            channel,
        }
    }

    /// Validate the sender and publish `text` to the group.
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - the stored message with its assigned id and timestamp
    /// * `Err(SubmitMessageError)` - rejected; history is untouched
    pub async fn execute(
        &self,
        group_id: &GroupId,
        sender: &UserId,
        text: String,
    ) -> Result<ChatMessage, SubmitMessageError> {
        let user = resolve_member(self.users.as_ref(), self.groups.as_ref(), group_id, sender)
            .await?;
        let text = MessageText::new(text)?;

        let draft = MessageDraft::new(group_id.clone(), user.id, user.name, text);
        Ok(self.channel.publish(draft))
    }
}
