//! UseCase layer
//!
//! One struct per operation, each exposing `execute`. Use cases depend on the
//! directory traits from the domain layer and on the group channel.

mod error;
mod get_history;
mod group;
mod membership;
mod open_live_session;
mod submit_message;
mod user;

pub use error::{
    DirectoryUseCaseError, GetHistoryError, MembershipError, OpenSessionError, SubmitMessageError,
};
pub use get_history::GetHistoryUseCase;
pub use group::{CreateGroupUseCase, JoinGroupUseCase, ListGroupsUseCase};
pub use open_live_session::OpenLiveSessionUseCase;
pub use submit_message::SubmitMessageUseCase;
pub use user::{GetUserUseCase, ListUsersUseCase, RegisterUserUseCase};
