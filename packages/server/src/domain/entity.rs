//! Entities
//!
//! `ChatMessage` is the canonical stored record. It is immutable once built;
//! only the group channel creates them, from a [`MessageDraft`].

use serde::{Deserialize, Serialize};

use super::value_object::{GroupId, MessageId, MessageText, Timestamp, UserId};

/// A message as submitted, before the server stamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    /// Pre-assigned id. `None` lets the channel assign the next one; the
    /// channel's counter always moves past a pre-assigned id.
    pub(crate) id: Option<MessageId>,
    pub group_id: GroupId,
    pub user_id: UserId,
    pub user_name: String,
    pub text: MessageText,
}

impl MessageDraft {
    pub fn new(group_id: GroupId, user_id: UserId, user_name: String, text: MessageText) -> Self {
        Self {
            id: None,
            group_id,
            user_id,
            user_name,
            text,
        }
    }
}

/// Stored chat message with server-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: MessageId,
    group_id: GroupId,
    user_id: UserId,
    user_name: String,
    text: MessageText,
    timestamp: Timestamp,
}

impl ChatMessage {
    pub(crate) fn stamp(draft: MessageDraft, id: MessageId, timestamp: Timestamp) -> Self {
        Self {
            id,
            group_id: draft.group_id,
            user_id: draft.user_id,
            user_name: draft.user_name,
            text: draft.text,
            timestamp,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// A registered user, as held by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// A chat group with its membership set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: UserId,
    /// Members in join order. The admin is always the first entry.
    pub members: Vec<UserId>,
    pub max_members: usize,
}

impl Group {
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.contains(user_id)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_group(max_members: usize) -> Group {
        let admin = UserId::new("admin".to_string()).unwrap();
        Group {
            id: GroupId::new("g-1".to_string()).unwrap(),
            name: "Hiking".to_string(),
            description: None,
            admin_id: admin.clone(),
            members: vec![admin],
            max_members,
        }
    }

    #[test]
    fn test_group_admin_is_member() {
        // テスト項目: 管理者はグループのメンバーとして扱われる
        // given (前提条件):
        let group = create_test_group(10);

        // when (操作):
        let result = group.is_member(&UserId::new("admin".to_string()).unwrap());

        // then (期待する結果):
        assert!(result);
        assert!(!group.is_member(&UserId::new("bob".to_string()).unwrap()));
    }

    #[test]
    fn test_group_is_full_at_max_members() {
        // テスト項目: メンバー数が上限に達するとグループは満員になる
        // given (前提条件):
        let mut group = create_test_group(2);

        // when (操作):
        let before = group.is_full();
        group.members.push(UserId::new("bob".to_string()).unwrap());

        // then (期待する結果):
        assert!(!before);
        assert!(group.is_full());
    }

    #[test]
    fn test_stamp_keeps_draft_fields() {
        // テスト項目: 下書きにサーバー側の ID とタイムスタンプを付与しても内容は変わらない
        // given (前提条件):
        let draft = MessageDraft::new(
            GroupId::new("g-1".to_string()).unwrap(),
            UserId::new("u1".to_string()).unwrap(),
            "Alice".to_string(),
            MessageText::new("hi".to_string()).unwrap(),
        );

        // when (操作):
        let message = ChatMessage::stamp(draft, MessageId::new(7), Timestamp::new(1000));

        // then (期待する結果):
        assert_eq!(message.id(), MessageId::new(7));
        assert_eq!(message.group_id().as_str(), "g-1");
        assert_eq!(message.user_id().as_str(), "u1");
        assert_eq!(message.user_name(), "Alice");
        assert_eq!(message.text().as_str(), "hi");
        assert_eq!(message.timestamp(), Timestamp::new(1000));
    }
}
