//! Server state.

use std::sync::Arc;

use crate::{
    domain::{GroupDirectory, UserDirectory},
    infrastructure::live::GroupChannel,
    usecase::{
        CreateGroupUseCase, GetHistoryUseCase, GetUserUseCase, JoinGroupUseCase,
        ListGroupsUseCase, ListUsersUseCase, OpenLiveSessionUseCase, RegisterUserUseCase,
        SubmitMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// OpenLiveSessionUseCase（ライブセッション開始）
    pub open_live_session_usecase: Arc<OpenLiveSessionUseCase>,
    /// SubmitMessageUseCase（メッセージ送信）
    pub submit_message_usecase: Arc<SubmitMessageUseCase>,
    /// GetHistoryUseCase（履歴取得）
    pub get_history_usecase: Arc<GetHistoryUseCase>,
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    pub get_user_usecase: Arc<GetUserUseCase>,
    pub list_users_usecase: Arc<ListUsersUseCase>,
    pub create_group_usecase: Arc<CreateGroupUseCase>,
    pub join_group_usecase: Arc<JoinGroupUseCase>,
    pub list_groups_usecase: Arc<ListGroupsUseCase>,
}

impl AppState {
    /// Wire every use case against one directory and one group channel.
    pub fn new<D>(directory: Arc<D>, channel: Arc<GroupChannel>) -> Self
    where
        D: UserDirectory + GroupDirectory + 'static,
    {
        let users: Arc<dyn UserDirectory> = directory.clone();
        let groups: Arc<dyn GroupDirectory> = directory;

        Self {
            open_live_session_usecase: Arc::new(OpenLiveSessionUseCase::new(
                users.clone(),
                groups.clone(),
                channel.clone(),
            )),
            submit_message_usecase: Arc::new(SubmitMessageUseCase::new(
                users.clone(),
                groups.clone(),
                channel.clone(),
            )),
            get_history_usecase: Arc::new(GetHistoryUseCase::new(groups.clone(), channel)),
            register_user_usecase: Arc::new(RegisterUserUseCase::new(users.clone())),
            get_user_usecase: Arc::new(GetUserUseCase::new(users.clone())),
            list_users_usecase: Arc::new(ListUsersUseCase::new(users.clone())),
            create_group_usecase: Arc::new(CreateGroupUseCase::new(users.clone(), groups.clone())),
            join_group_usecase: Arc::new(JoinGroupUseCase::new(users, groups.clone())),
            list_groups_usecase: Arc::new(ListGroupsUseCase::new(groups)),
        }
    }
}
