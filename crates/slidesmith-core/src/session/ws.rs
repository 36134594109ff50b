//! WebSocket transport for the streaming channel.
//!
//! Text frames are JSON event envelopes. Undecodable frames are logged and
//! dropped; they never tear down the session.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use slidesmith_types::{ChannelEvent, GenerateRequest};

use super::{Channel, ChannelError, Connector};

/// Opens WebSocket channels.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

/// One open WebSocket channel.
pub struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connector for WsConnector {
    type Channel = WsChannel;

    async fn connect(&self, endpoint: &str) -> Result<WsChannel, ChannelError> {
        // Reject malformed endpoints before dialing.
        let url = url::Url::parse(endpoint).map_err(|e| ChannelError::Connect(e.to_string()))?;
        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        debug!(endpoint, "channel open");
        Ok(WsChannel { stream })
    }
}

impl Channel for WsChannel {
    async fn send(&mut self, request: &GenerateRequest) -> Result<(), ChannelError> {
        let json = serde_json::to_string(request).map_err(|e| ChannelError::Send(e.to_string()))?;
        self.stream
            .send(Message::Text(json))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }

    async fn recv(&mut self) -> Option<ChannelEvent> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<ChannelEvent>(&text) {
                    Ok(event) => return Some(event),
                    Err(e) => {
                        warn!(error = %e, "dropping malformed channel event");
                    }
                },
                Ok(Message::Close(_)) => return None,
                // Ping/pong are answered by the library; binary frames are
                // not part of the protocol.
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "channel read error");
                    return None;
                }
            }
        }
        None
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
