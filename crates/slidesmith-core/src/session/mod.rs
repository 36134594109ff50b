//! Session lifecycle and request/response pairing against the streaming
//! channel.
//!
//! One session owns one logical channel and at most one in-flight
//! generation request. The transport sits behind the [`Connector`] /
//! [`Channel`] seam so the state machine is testable without a socket.

use thiserror::Error;
use tracing::warn;

use slidesmith_types::{ChannelEvent, Deck, GenerateRequest, TranscriptEntry};

use crate::transcript::{Applied, Reducer};

pub mod ws;

pub use ws::WsConnector;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    /// Connected with no request in flight.
    Idle,
    AwaitingResponse,
}

/// Caller-visible session failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not connected")]
    NotConnected,
    #[error("a generation request is already in flight")]
    Busy,
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Transport-level failures, wrapped into [`SessionError`] by the session.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("connect: {0}")]
    Connect(String),
    #[error("send: {0}")]
    Send(String),
}

/// An open streaming channel.
pub trait Channel {
    /// Sends one request frame.
    fn send(
        &mut self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<(), ChannelError>>;

    /// Receives the next decodable event. `None` means the channel closed;
    /// undecodable frames are logged and skipped inside the implementation.
    fn recv(&mut self) -> impl Future<Output = Option<ChannelEvent>>;

    /// Closes the channel. Best effort.
    fn close(&mut self) -> impl Future<Output = ()>;
}

/// Opens channels to an endpoint.
pub trait Connector {
    type Channel: Channel;

    fn connect(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Self::Channel, ChannelError>>;
}

/// Session state machine.
pub struct Session<C: Connector> {
    connector: C,
    endpoint: String,
    state: SessionState,
    channel: Option<C::Channel>,
    reducer: Reducer,
}

impl<C: Connector> Session<C> {
    pub fn new(connector: C, endpoint: impl Into<String>) -> Self {
        Self {
            connector,
            endpoint: endpoint.into(),
            state: SessionState::Disconnected,
            channel: None,
            reducer: Reducer::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.reducer.transcript()
    }

    pub fn deck(&self) -> &Deck {
        self.reducer.deck()
    }

    /// Opens the channel. Idempotent: a no-op when already connecting or
    /// connected. Failure lands back in `Disconnected`.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        if self.channel.is_some() || self.state == SessionState::Connecting {
            return Ok(());
        }
        self.state = SessionState::Connecting;
        match self.connector.connect(&self.endpoint).await {
            Ok(channel) => {
                self.channel = Some(channel);
                self.state = SessionState::Idle;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Disconnected;
                Err(SessionError::ConnectionFailed(e.to_string()))
            }
        }
    }

    /// Sends one generation request.
    ///
    /// Fails with `Busy` while a request is in flight and `NotConnected`
    /// mid-handshake. When disconnected, connects first and sends once the
    /// channel reports open. A send failure on an established channel gets
    /// exactly one reconnect-and-resend; the next failure surfaces as
    /// `ConnectionFailed`.
    pub async fn submit(&mut self, prompt: &str) -> Result<(), SessionError> {
        let auto_connected = match self.state {
            SessionState::AwaitingResponse => return Err(SessionError::Busy),
            SessionState::Connecting => return Err(SessionError::NotConnected),
            SessionState::Disconnected => {
                self.connect().await?;
                true
            }
            SessionState::Idle => false,
        };

        let request = GenerateRequest::new(prompt);
        if let Err(first) = self.send_on_channel(&request).await {
            self.drop_channel();
            if auto_connected {
                return Err(SessionError::ConnectionFailed(first.to_string()));
            }
            warn!(error = %first, "send failed on open channel, reconnecting once");
            self.connect()
                .await
                .map_err(|_| SessionError::ConnectionFailed(first.to_string()))?;
            if let Err(second) = self.send_on_channel(&request).await {
                self.drop_channel();
                return Err(SessionError::ConnectionFailed(second.to_string()));
            }
        }

        self.reducer.push_user(prompt);
        self.state = SessionState::AwaitingResponse;
        Ok(())
    }

    /// Receives and applies the next channel event. Terminal events move
    /// the session back to `Idle`; a closed channel moves it to
    /// `Disconnected` and yields `None`.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        let channel = self.channel.as_mut()?;
        match channel.recv().await {
            Some(event) => {
                if self.reducer.apply(event.clone()) == Applied::Terminal
                    && self.state == SessionState::AwaitingResponse
                {
                    self.state = SessionState::Idle;
                }
                Some(event)
            }
            None => {
                self.drop_channel();
                None
            }
        }
    }

    /// Tears the channel down (component teardown path).
    pub async fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close().await;
        }
        self.state = SessionState::Disconnected;
    }

    async fn send_on_channel(&mut self, request: &GenerateRequest) -> Result<(), ChannelError> {
        match self.channel.as_mut() {
            Some(channel) => channel.send(request).await,
            None => Err(ChannelError::Send("no open channel".to_string())),
        }
    }

    fn drop_channel(&mut self) {
        self.channel = None;
        self.state = SessionState::Disconnected;
    }
}
