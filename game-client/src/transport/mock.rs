//! Mock transport for testing.
//!
//! Allows queueing channel events and capturing published messages for
//! verification.

use super::{ChannelEvent, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use game_types::{ClientId, ProtocolError, RoomEvent, RoomId};

/// Mock transport for testing.
///
/// Allows queueing channel events and capturing published messages for
/// verification.
#[derive(Debug)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug)]
struct MockTransportInner {
    local_id: ClientId,
    joined: Option<RoomId>,
    connected: bool,
    members: Vec<ClientId>,
    published: Vec<(String, Vec<u8>)>,
    event_queue: VecDeque<ChannelEvent>,
    fail_next_join: Option<String>,
    fail_next_publish: Option<String>,
}

impl MockTransport {
    /// Create a new mock transport with a random local identity.
    pub fn new() -> Self {
        Self::with_local_id(ClientId::random())
    }

    /// Create a mock transport with a fixed local identity.
    pub fn with_local_id(local_id: ClientId) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                local_id,
                joined: None,
                connected: true,
                members: Vec::new(),
                published: Vec::new(),
                event_queue: VecDeque::new(),
                fail_next_join: None,
                fail_next_publish: None,
            })),
        }
    }

    /// Queue a channel event to be returned by the next `next_event()`.
    pub fn queue_event(&self, event: ChannelEvent) {
        let mut inner = self.inner.lock().unwrap();
        inner.event_queue.push_back(event);
    }

    /// Set the presence list returned by `members()`.
    pub fn set_members(&self, members: Vec<ClientId>) {
        let mut inner = self.inner.lock().unwrap();
        inner.members = members;
    }

    /// Get all `(name, payload)` pairs that were published.
    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        let inner = self.inner.lock().unwrap();
        inner.published.clone()
    }

    /// Decode every published message back into a [`RoomEvent`].
    pub fn published_events(&self) -> Result<Vec<RoomEvent>, ProtocolError> {
        self.published()
            .iter()
            .map(|(name, payload)| RoomEvent::decode(name, payload))
            .collect()
    }

    /// Names of all published messages, in publish order.
    pub fn published_names(&self) -> Vec<String> {
        self.published().into_iter().map(|(name, _)| name).collect()
    }

    /// The room currently joined, if any.
    pub fn joined_room(&self) -> Option<RoomId> {
        let inner = self.inner.lock().unwrap();
        inner.joined.clone()
    }

    /// Flip the connection flag (the transport handles reconnection
    /// itself; the session only observes this through `is_connected`).
    pub fn set_connected(&self, connected: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.connected = connected;
    }

    /// Cause the next join() to fail with the given error.
    pub fn fail_next_join(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_join = Some(error.to_string());
    }

    /// Cause the next publish() to fail with the given error.
    pub fn fail_next_publish(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_publish = Some(error.to_string());
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn join(&self, room: &RoomId) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_join.take() {
            return Err(TransportError::JoinFailed(error));
        }

        inner.joined = Some(room.clone());
        let local_id = inner.local_id;
        if !inner.members.contains(&local_id) {
            inner.members.push(local_id);
        }
        Ok(())
    }

    async fn leave(&self, room: &RoomId) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.joined.as_ref() != Some(room) {
            return Err(TransportError::NotJoined);
        }
        inner.joined = None;
        let local_id = inner.local_id;
        inner.members.retain(|id| *id != local_id);
        Ok(())
    }

    async fn publish(
        &self,
        room: &RoomId,
        name: &str,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.joined.as_ref() != Some(room) {
            return Err(TransportError::NotJoined);
        }
        if let Some(error) = inner.fail_next_publish.take() {
            return Err(TransportError::PublishFailed(error));
        }

        inner.published.push((name.to_string(), payload.to_vec()));
        Ok(())
    }

    async fn next_event(&self) -> Result<ChannelEvent, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .event_queue
            .pop_front()
            .ok_or(TransportError::ChannelClosed)
    }

    async fn members(&self, _room: &RoomId) -> Result<Vec<ClientId>, TransportError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.members.clone())
    }

    fn local_id(&self) -> ClientId {
        let inner = self.inner.lock().unwrap();
        inner.local_id
    }

    fn is_connected(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_adds_local_member() {
        let transport = MockTransport::new();
        let room = RoomId::generate();

        transport.join(&room).await.unwrap();

        assert_eq!(transport.joined_room(), Some(room.clone()));
        let members = transport.members(&room).await.unwrap();
        assert_eq!(members, vec![transport.local_id()]);
    }

    #[tokio::test]
    async fn leave_removes_local_member() {
        let transport = MockTransport::new();
        let room = RoomId::generate();

        transport.join(&room).await.unwrap();
        transport.leave(&room).await.unwrap();

        assert!(transport.joined_room().is_none());
        assert!(transport.members(&room).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn leave_without_join_fails() {
        let transport = MockTransport::new();
        let room = RoomId::generate();

        let result = transport.leave(&room).await;
        assert!(matches!(result, Err(TransportError::NotJoined)));
    }

    #[tokio::test]
    async fn publish_records_messages() {
        let transport = MockTransport::new();
        let room = RoomId::generate();
        transport.join(&room).await.unwrap();

        transport.publish(&room, "position", b"{}").await.unwrap();
        transport.publish(&room, "won", b"{}").await.unwrap();

        assert_eq!(transport.published_names(), vec!["position", "won"]);
    }

    #[tokio::test]
    async fn publish_without_join_fails() {
        let transport = MockTransport::new();
        let room = RoomId::generate();

        let result = transport.publish(&room, "position", b"{}").await;
        assert!(matches!(result, Err(TransportError::NotJoined)));
    }

    #[tokio::test]
    async fn queued_events_are_delivered_in_order() {
        let transport = MockTransport::new();
        let rival = ClientId::random();

        transport.queue_event(ChannelEvent::MemberJoined { id: rival });
        transport.queue_event(ChannelEvent::MemberLeft { id: rival });

        assert_eq!(
            transport.next_event().await.unwrap(),
            ChannelEvent::MemberJoined { id: rival }
        );
        assert_eq!(
            transport.next_event().await.unwrap(),
            ChannelEvent::MemberLeft { id: rival }
        );
    }

    #[tokio::test]
    async fn empty_queue_reports_channel_closed() {
        let transport = MockTransport::new();
        let result = transport.next_event().await;
        assert!(matches!(result, Err(TransportError::ChannelClosed)));
    }

    #[tokio::test]
    async fn forced_join_failure() {
        let transport = MockTransport::new();
        let room = RoomId::generate();
        transport.fail_next_join("relay down");

        let result = transport.join(&room).await;
        assert!(matches!(result, Err(TransportError::JoinFailed(_))));

        // Next join works
        transport.join(&room).await.unwrap();
    }

    #[tokio::test]
    async fn forced_publish_failure() {
        let transport = MockTransport::new();
        let room = RoomId::generate();
        transport.join(&room).await.unwrap();
        transport.fail_next_publish("buffer full");

        let result = transport.publish(&room, "position", b"{}").await;
        assert!(matches!(result, Err(TransportError::PublishFailed(_))));

        transport.publish(&room, "position", b"{}").await.unwrap();
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let transport1 = MockTransport::new();
        let transport2 = transport1.clone();
        let room = RoomId::generate();

        transport1.join(&room).await.unwrap();
        transport1.publish(&room, "won", b"{}").await.unwrap();

        assert_eq!(transport2.joined_room(), Some(room));
        assert_eq!(transport2.published_names(), vec!["won"]);
    }

    #[tokio::test]
    async fn connection_flag_is_observable() {
        let transport = MockTransport::new();
        assert!(transport.is_connected());

        transport.set_connected(false);
        assert!(!transport.is_connected());
    }
}
