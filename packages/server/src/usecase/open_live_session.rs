//! UseCase: ライブセッションの開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - OpenLiveSessionUseCase::execute() メソッド
//! - グループ / ユーザーの検証と、接続の attach + 履歴の送信
//!
//! ### なぜこのテストが必要か
//! - 存在しないグループやユーザーで接続が登録されないことを保証する
//! - セッションを破棄すると registry から確実に外れることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーが接続し、履歴が届く
//! - 異常系：グループなし / ユーザーなし / 非メンバー
//! - エッジケース：既に閉じた接続

use std::sync::Arc;

use crate::{
    domain::{Connection, GroupDirectory, GroupId, LiveSink, UserDirectory, UserId},
    infrastructure::live::{GroupChannel, LiveSession},
};

use super::{error::OpenSessionError, membership::resolve_member};

/// ライブセッション開始のユースケース
pub struct OpenLiveSessionUseCase {
    users: Arc<dyn UserDirectory>,
    groups: Arc<dyn GroupDirectory>,
    channel: Arc<GroupChannel>,
}

impl OpenLiveSessionUseCase {
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

    /// Validate the caller, attach `sink` to the group and queue the history
    /// replay on it.
    ///
    /// # Returns
    ///
    /// * `Ok(LiveSession)` - attached; dropping it detaches
    /// * `Err(OpenSessionError)` - nothing was attached
    pub async fn execute(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
        sink: Arc<dyn LiveSink>,
    ) -> Result<LiveSession, OpenSessionError> {
        let user = resolve_member(
            self.users.as_ref(),
            self.groups.as_ref(),
            group_id,
            user_id,
        )
        .await?;

        let connection = Connection::new(group_id.clone(), user.id.clone(), sink);
        let session = LiveSession::new(connection.clone(), user, self.channel.clone());
        self.channel.join(connection)?;

        tracing::info!(
            group_id = %group_id,
            user_id = %user_id,
            connection_id = %session.connection_id(),
            "Live session opened"
        );
        Ok(session)
    }
}
