//! Group channel: bounded history and fan-out per group.
//!
//! ## 並行性モデル
//!
//! Each group owns one history lock. `publish` and `join` for the same group
//! are serialized through it, which gives every connection the stream in
//! history order with no gap or duplicate between the replay and the live
//! messages that follow. Groups never share a lock.
//!
//! The registry lock is only taken for `attach`, `snapshot` and `detach` and
//! is released before any delivery. Delivery itself is a non-blocking push
//! onto the connection's outbound queue; the socket write happens on the
//! connection's own writer task, so a slow client stalls nobody. A client
//! whose bounded queue fills up is treated like a closed one and detached.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use tsudoi_shared::time::Clock;

use crate::domain::{
    ChatMessage, Connection, ConnectionId, DeliveryFailure, GroupHistory, GroupId, LiveUpdate,
    MessageDraft, MessageId, Timestamp,
};

use super::registry::ConnectionRegistry;

type SharedHistory = Arc<Mutex<GroupHistory>>;

/// Per-group message history plus broadcast to the group's live connections.
pub struct GroupChannel {
    registry: Arc<ConnectionRegistry>,
    histories: DashMap<GroupId, SharedHistory>,
    clock: Arc<dyn Clock>,
    history_capacity: usize,
    next_message_id: AtomicU64,
}

impl GroupChannel {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        history_capacity: usize,
    ) -> Self {
        Self {
            registry,
            histories: DashMap::new(),
            clock,
            history_capacity,
            next_message_id: AtomicU64::new(1),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    /// Current history of a group, oldest first. No side effects.
    pub fn replay(&self, group_id: &GroupId) -> Vec<ChatMessage> {
        let Some(history) = self.existing_history(group_id) else {
            return Vec::new();
        };
        let history = lock(&history);
        history.snapshot()
    }

    /// Attach a connection and push the history replay to it.
    ///
    /// The replay is queued before the connection becomes visible to any
    /// `publish` on the same group. If the replay cannot be delivered the
    /// connection is detached again and the failure returned.
    pub fn join(&self, connection: Connection) -> Result<(), DeliveryFailure> {
        let group_id = connection.group_id().clone();
        let connection_id = connection.id();
        let history = self.history_for(&group_id);

        let result = {
            let history = lock(&history);
            self.registry.attach(connection.clone());
            connection.deliver(LiveUpdate::History(history.snapshot()))
        };

        match &result {
            Ok(()) => tracing::info!(
                group_id = %group_id,
                connection_id = %connection_id,
                "Connection joined and history replayed"
            ),
            Err(e) => {
                tracing::warn!(
                    group_id = %group_id,
                    connection_id = %connection_id,
                    "Failed to replay history: {}",
                    e
                );
                self.registry.detach(&group_id, connection_id);
            }
        }
        result
    }

    /// Detach a connection. Safe to call more than once.
    pub fn leave(&self, group_id: &GroupId, connection_id: ConnectionId) -> bool {
        self.registry.detach(group_id, connection_id)
    }

    /// Stamp, record and broadcast a message.
    ///
    /// 1. assigns the timestamp (never earlier than the group's last one) and
    ///    the id if the draft has none
    /// 2. appends to the bounded history, evicting the oldest entry when full
    /// 3. pushes the message to every connection in the registry snapshot;
    ///    one failed connection does not stop the others
    /// 4. detaches every connection whose delivery failed
    ///
    /// Returns the stored message.
    pub fn publish(&self, draft: MessageDraft) -> ChatMessage {
        let group_id = draft.group_id.clone();
        let history = self.history_for(&group_id);

        let (message, failed) = {
            let mut history = lock(&history);

            let now = Timestamp::new(self.clock.now_millis());
            let timestamp = history.last_timestamp().map_or(now, |last| last.max(now));
            let id = match draft.id {
                Some(id) => self.reserve_id(id),
                None => self.next_id(),
            };
            let message = ChatMessage::stamp(draft, id, timestamp);

            if let Some(evicted) = history.push(message.clone()) {
                tracing::debug!(
                    group_id = %group_id,
                    evicted_id = %evicted.id(),
                    capacity = history.capacity(),
                    "History full, evicted oldest message"
                );
            }

            let targets = self.registry.snapshot(&group_id);
            let failed = fan_out(&targets, &message);
            (message, failed)
        };

        for connection_id in failed {
            self.registry.detach(&group_id, connection_id);
        }

        tracing::info!(
            group_id = %group_id,
            message_id = %message.id(),
            user_id = %message.user_id(),
            "Published message"
        );
        message
    }

    fn next_id(&self) -> MessageId {
        MessageId::new(self.next_message_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Keep a pre-assigned id and move the counter past it.
    fn reserve_id(&self, id: MessageId) -> MessageId {
        self.next_message_id
            .fetch_max(id.value().saturating_add(1), Ordering::Relaxed);
        id
    }

    fn existing_history(&self, group_id: &GroupId) -> Option<SharedHistory> {
        self.histories.get(group_id).map(|entry| entry.value().clone())
    }

    fn history_for(&self, group_id: &GroupId) -> SharedHistory {
        self.histories
            .entry(group_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(GroupHistory::new(self.history_capacity))))
            .value()
            .clone()
    }
}

/// Deliver to each target independently, returning the ids that failed.
fn fan_out(targets: &[Connection], message: &ChatMessage) -> Vec<ConnectionId> {
    targets
        .iter()
        .filter_map(|connection| {
            match connection.deliver(LiveUpdate::Message(message.clone())) {
                Ok(()) => {
                    tracing::debug!(
                        connection_id = %connection.id(),
                        message_id = %message.id(),
                        "Delivered message"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection.id(),
                        message_id = %message.id(),
                        "Delivery failed, detaching connection: {}",
                        e
                    );
                    Some(connection.id())
                }
            }
        })
        .collect()
}

/// A panic while holding a history lock cannot leave the history half
/// written (push is a single VecDeque operation), so poisoning is ignored.
fn lock(history: &Mutex<GroupHistory>) -> MutexGuard<'_, GroupHistory> {
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc as std_mpsc, time::Duration};

    use tokio::sync::mpsc;
    use tsudoi_shared::time::FixedClock;

    use super::*;
    use crate::domain::{LiveSink, MessageText, OUTBOUND_QUEUE_CAPACITY, UserId, pusher_channel};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - replay / join / publish の動作
    // - 履歴の上限（FIFO での追い出し）
    // - 配送失敗時の自動 detach
    // - 同一グループ内の順序保証と、グループ間の独立性
    //
    // 【なぜこのテストが必要か】
    // - Channel は履歴とブロードキャストの唯一の変更点
    // - 1 つの接続の失敗が他の接続や他のグループに影響しないことを保証する
    // ========================================

    fn group(id: &str) -> GroupId {
        GroupId::new(id.to_string()).unwrap()
    }

    fn create_test_channel(clock: Arc<dyn Clock>) -> GroupChannel {
        GroupChannel::new(Arc::new(ConnectionRegistry::new()), clock, 50)
    }

    fn draft(group_id: &str, text: &str) -> MessageDraft {
        MessageDraft::new(
            group(group_id),
            UserId::new("u1".to_string()).unwrap(),
            "Alice".to_string(),
            MessageText::new(text.to_string()).unwrap(),
        )
    }

    fn connect(group_id: &str) -> (Connection, mpsc::Receiver<LiveUpdate>) {
        let (tx, rx) = pusher_channel();
        let sink: Arc<dyn LiveSink> = Arc::new(tx);
        let connection = Connection::new(
            group(group_id),
            UserId::new("u2".to_string()).unwrap(),
            sink,
        );
        (connection, rx)
    }

    fn received_texts(rx: &mut mpsc::Receiver<LiveUpdate>) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(update) = rx.try_recv() {
            if let LiveUpdate::Message(message) = update {
                texts.push(message.text().as_str().to_string());
            }
        }
        texts
    }

    /// Sink that blocks inside `push` until released.
    struct BlockingSink {
        entered: Mutex<std_mpsc::Sender<()>>,
        release: Mutex<std_mpsc::Receiver<()>>,
    }

    impl LiveSink for BlockingSink {
        fn push(&self, update: LiveUpdate) -> Result<(), DeliveryFailure> {
            if let LiveUpdate::Message(_) = update {
                let _ = lock_sink(&self.entered).send(());
                let _ = lock_sink(&self.release).recv();
            }
            Ok(())
        }
    }

    fn lock_sink<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap()
    }

    #[test]
    fn test_replay_unknown_group_is_empty() {
        // テスト項目: publish 前のグループの replay は空で、副作用もない
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));

        // when (操作):
        let history = channel.replay(&group("g-1"));

        // then (期待する結果):
        assert!(history.is_empty());
        assert!(channel.histories.is_empty());
    }

    #[test]
    fn test_publish_assigns_id_and_timestamp() {
        // テスト項目: publish でサーバー側の ID とタイムスタンプが付与される
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));

        // when (操作):
        let first = channel.publish(draft("g-1", "hi"));
        let second = channel.publish(draft("g-2", "hello"));

        // then (期待する結果):
        assert_eq!(first.timestamp(), Timestamp::new(1000));
        assert!(second.id() > first.id());
        assert_eq!(channel.replay(&group("g-1")), vec![first]);
    }

    #[test]
    fn test_publish_keeps_pre_assigned_id() {
        // テスト項目: 下書きに ID が既にあればそのまま使われる
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));
        let mut message = draft("g-1", "hi");
        message.id = Some(MessageId::new(999));

        // when (操作):
        let stored = channel.publish(message);

        // then (期待する結果): 以降の自動採番は 999 より後になる
        assert_eq!(stored.id(), MessageId::new(999));
        let next = channel.publish(draft("g-2", "next"));
        assert_eq!(next.id(), MessageId::new(1000));
    }

    #[test]
    fn test_timestamps_never_go_backwards_within_group() {
        // テスト項目: 時計が戻っても同じグループ内のタイムスタンプは減少しない
        // given (前提条件):
        struct SteppingClock(AtomicU64);
        impl Clock for SteppingClock {
            fn now_millis(&self) -> i64 {
                // 2000, 1000, ...
                2000 - 1000 * self.0.fetch_add(1, Ordering::SeqCst) as i64
            }
        }
        let channel = create_test_channel(Arc::new(SteppingClock(AtomicU64::new(0))));

        // when (操作):
        let first = channel.publish(draft("g-1", "first"));
        let second = channel.publish(draft("g-1", "second"));

        // then (期待する結果):
        assert_eq!(first.timestamp(), Timestamp::new(2000));
        assert_eq!(second.timestamp(), Timestamp::new(2000));
    }

    #[test]
    fn test_replay_returns_last_fifty_oldest_first() {
        // テスト項目: 50 件を超えて publish すると直近 50 件が古い順で返る
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));

        // when (操作):
        for n in 1..=75 {
            channel.publish(draft("g-1", &format!("message {}", n)));
        }

        // then (期待する結果):
        let texts: Vec<String> = channel
            .replay(&group("g-1"))
            .iter()
            .map(|m| m.text().as_str().to_string())
            .collect();
        let expected: Vec<String> = (26..=75).map(|n| format!("message {}", n)).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_join_replays_history_then_live_messages() {
        // テスト項目: join 時に履歴が最初に届き、その後の publish が順番通り届く
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));
        let before = channel.publish(draft("g-1", "before"));
        let (connection, mut rx) = connect("g-1");

        // when (操作):
        channel.join(connection).unwrap();
        channel.publish(draft("g-1", "after-1"));
        channel.publish(draft("g-1", "after-2"));

        // then (期待する結果):
        assert_eq!(rx.try_recv().unwrap(), LiveUpdate::History(vec![before]));
        assert_eq!(received_texts(&mut rx), vec!["after-1", "after-2"]);
    }

    #[test]
    fn test_join_empty_group_sends_empty_history() {
        // テスト項目: 履歴が空のグループに join すると 0 件の履歴が届く
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));
        let (connection, mut rx) = connect("g-1");

        // when (操作):
        channel.join(connection).unwrap();

        // then (期待する結果):
        assert_eq!(rx.try_recv().unwrap(), LiveUpdate::History(vec![]));
    }

    #[test]
    fn test_join_with_closed_connection_is_detached() {
        // テスト項目: 履歴を送れない接続は join 失敗となり registry に残らない
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));
        let (connection, rx) = connect("g-1");
        let connection_id = connection.id();
        drop(rx);

        // when (操作):
        let result = channel.join(connection);

        // then (期待する結果):
        assert_eq!(result, Err(DeliveryFailure::Closed));
        assert!(!channel.registry().contains(&group("g-1"), connection_id));
    }

    #[test]
    fn test_failed_delivery_detaches_only_that_connection() {
        // テスト項目: 配送に失敗した接続だけが detach され、他の接続には届く
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));
        let (alive, mut alive_rx) = connect("g-1");
        let (dead, dead_rx) = connect("g-1");
        let dead_id = dead.id();
        channel.join(alive).unwrap();
        channel.join(dead).unwrap();
        drop(dead_rx);

        // when (操作):
        channel.publish(draft("g-1", "first"));
        channel.publish(draft("g-1", "second"));

        // then (期待する結果):
        assert!(!channel.registry().contains(&group("g-1"), dead_id));
        assert_eq!(channel.registry().connection_count(&group("g-1")), 1);
        assert_eq!(received_texts(&mut alive_rx), vec!["first", "second"]);
        assert_eq!(channel.replay(&group("g-1")).len(), 2);
    }

    #[test]
    fn test_lagging_connection_is_detached_when_queue_fills() {
        // テスト項目: 受信側が読まない接続はキューが満杯になった時点で detach される
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));
        let (stalled, _stalled_rx) = connect("g-1");
        let (reader, mut reader_rx) = connect("g-1");
        let stalled_id = stalled.id();
        channel.join(stalled).unwrap();
        channel.join(reader).unwrap();
        assert!(matches!(reader_rx.try_recv(), Ok(LiveUpdate::History(_))));

        // when (操作): 履歴 1 件分を除いたキュー容量を使い切り、さらに 1 件 publish
        for n in 1..OUTBOUND_QUEUE_CAPACITY {
            channel.publish(draft("g-1", &format!("m{}", n)));
            assert_eq!(received_texts(&mut reader_rx).len(), 1);
        }
        assert!(channel.registry().contains(&group("g-1"), stalled_id));
        channel.publish(draft("g-1", "overflow"));

        // then (期待する結果): 読まない接続だけが外れ、読む接続には届き続ける
        assert!(!channel.registry().contains(&group("g-1"), stalled_id));
        assert_eq!(channel.registry().connection_count(&group("g-1")), 1);
        assert_eq!(received_texts(&mut reader_rx), vec!["overflow"]);
    }

    #[test]
    fn test_no_delivery_after_leave() {
        // テスト項目: leave 後の publish はその接続に配送されない
        // given (前提条件):
        let channel = create_test_channel(Arc::new(FixedClock::new(1000)));
        let (connection, mut rx) = connect("g-1");
        let connection_id = connection.id();
        channel.join(connection).unwrap();

        // when (操作):
        assert!(channel.leave(&group("g-1"), connection_id));
        channel.publish(draft("g-1", "after leave"));

        // then (期待する結果):
        assert!(matches!(rx.try_recv(), Ok(LiveUpdate::History(_))));
        assert!(received_texts(&mut rx).is_empty());
        assert!(!channel.leave(&group("g-1"), connection_id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publish_loses_no_updates() {
        // テスト項目: 同一グループへの並行 publish で履歴の更新が失われない
        // given (前提条件):
        let channel = Arc::new(GroupChannel::new(
            Arc::new(ConnectionRegistry::new()),
            Arc::new(FixedClock::new(1000)),
            1000,
        ));
        let (connection, mut rx) = connect("g-1");
        channel.join(connection).unwrap();

        // when (操作):
        let mut handles = Vec::new();
        for worker in 0..8 {
            let channel = channel.clone();
            handles.push(tokio::spawn(async move {
                for n in 0..25 {
                    channel.publish(draft("g-1", &format!("{}-{}", worker, n)));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果): 履歴の順序と配送の順序が一致する
        let history = channel.replay(&group("g-1"));
        assert_eq!(history.len(), 200);
        assert!(history.windows(2).all(|w| w[0].id() < w[1].id()));
        let history_texts: Vec<String> = history
            .iter()
            .map(|m| m.text().as_str().to_string())
            .collect();
        assert!(matches!(rx.try_recv(), Ok(LiveUpdate::History(_))));
        assert_eq!(received_texts(&mut rx), history_texts);
    }

    #[test]
    fn test_blocked_connection_does_not_delay_other_group() {
        // テスト項目: g1 の接続が配送中にブロックしても g2 への publish は完了する
        // given (前提条件):
        let channel = Arc::new(create_test_channel(Arc::new(FixedClock::new(1000))));
        let (entered_tx, entered_rx) = std_mpsc::channel();
        let (release_tx, release_rx) = std_mpsc::channel();
        let blocking: Arc<dyn LiveSink> = Arc::new(BlockingSink {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        let slow = Connection::new(group("g1"), UserId::new("u2".to_string()).unwrap(), blocking);
        channel.join(slow).unwrap();

        let blocked_channel = channel.clone();
        let blocked = std::thread::spawn(move || blocked_channel.publish(draft("g1", "stuck")));
        entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("g1 delivery should start");

        // when (操作): g1 の配送がブロックしている間に g2 へ publish
        let (tx, done_rx) = std_mpsc::channel();
        let other_channel = channel.clone();
        std::thread::spawn(move || {
            let stored = other_channel.publish(draft("g2", "free"));
            let _ = tx.send(stored);
        });
        let result = done_rx.recv_timeout(Duration::from_secs(5));

        // then (期待する結果):
        release_tx.send(()).unwrap();
        blocked.join().unwrap();
        let stored = result.expect("publish to g2 must not wait for g1");
        assert_eq!(stored.text().as_str(), "free");
        assert_eq!(channel.replay(&group("g1")).len(), 1);
    }
}
