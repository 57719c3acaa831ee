//! Live subscriptions over a `graphql-transport-ws` socket.
//!
//! Each call opens its own socket carrying exactly one subscription. The
//! returned stream owns the socket: dropping (or aborting) the stream closes
//! it, which is how the store stops a feed when the user switches chats.

use futures::future::{self, Either};
use futures::{stream, SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message as WsMessage};
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;

use chat_core::ports::MessageStream;
use chat_types::{ChatError, Result, chat::Message};
use crate::protocol::{interpret, ClientFrame, FrameAction, ServerFrame, SUBPROTOCOL};

/// How long the server has to acknowledge `connection_init`.
pub const ACK_TIMEOUT_MS: u32 = 10_000;

enum Feed {
    Connecting {
        url: String,
        token: Option<String>,
        query: &'static str,
        variables: Value,
    },
    Live(WebSocket),
    Done,
}

/// Subscribe to `query` and yield every message-list snapshot.
pub fn subscribe_snapshots(
    url: &str,
    token: Option<String>,
    query: &'static str,
    variables: Value,
) -> MessageStream {
    let start = Feed::Connecting {
        url: url.to_string(),
        token,
        query,
        variables,
    };
    Box::pin(stream::unfold(start, next_snapshot))
}

async fn next_snapshot(feed: Feed) -> Option<(Result<Vec<Message>>, Feed)> {
    let mut ws = match feed {
        Feed::Done => return None,
        Feed::Live(ws) => ws,
        Feed::Connecting { url, token, query, variables } => {
            match connect(&url, token.as_deref(), query, variables).await {
                Ok(ws) => ws,
                Err(e) => {
                    log::warn!("Subscription to {} failed: {}", url, e);
                    return Some((Err(e), Feed::Done));
                }
            }
        }
    };

    loop {
        let text = match ws.next().await {
            None => {
                log::debug!("Subscription socket closed");
                return None;
            }
            Some(Err(e)) => return Some((Err(ChatError::Network(e.to_string())), Feed::Done)),
            Some(Ok(WsMessage::Text(text))) => text,
            Some(Ok(WsMessage::Bytes(_))) => continue,
        };
        let frame = match ServerFrame::parse(&text) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };

        match interpret(frame) {
            FrameAction::Snapshot(messages) => return Some((Ok(messages), Feed::Live(ws))),
            FrameAction::Failed(e) => return Some((Err(e), Feed::Live(ws))),
            FrameAction::Rejected(e) => return Some((Err(e), Feed::Done)),
            FrameAction::Finished => return None,
            FrameAction::Pong => {
                if let Err(e) = send(&mut ws, &ClientFrame::Pong {}).await {
                    return Some((Err(e), Feed::Done));
                }
            }
            FrameAction::Ignore => {}
        }
    }
}

/// Open the socket, complete the handshake and start the subscription.
async fn connect(
    url: &str,
    token: Option<&str>,
    query: &str,
    variables: Value,
) -> Result<WebSocket> {
    let mut ws = WebSocket::open_with_protocol(url, SUBPROTOCOL)
        .map_err(|e| ChatError::Network(e.to_string()))?;

    send(&mut ws, &ClientFrame::connection_init(token)).await?;

    let acked = {
        let ack = Box::pin(wait_for_ack(&mut ws));
        let timeout = Box::pin(TimeoutFuture::new(ACK_TIMEOUT_MS));
        match future::select(ack, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(ChatError::Timeout(u64::from(ACK_TIMEOUT_MS))),
        }
    };
    acked?;

    send(&mut ws, &ClientFrame::subscribe(query, variables)).await?;
    Ok(ws)
}

async fn wait_for_ack(ws: &mut WebSocket) -> Result<()> {
    while let Some(message) = ws.next().await {
        let text = match message {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Bytes(_)) => continue,
            Err(e) => return Err(ChatError::Network(e.to_string())),
        };
        match ServerFrame::parse(&text)? {
            ServerFrame::ConnectionAck {} => return Ok(()),
            ServerFrame::Ping {} => send(ws, &ClientFrame::Pong {}).await?,
            other => log::debug!("Ignoring {:?} before connection_ack", other),
        }
    }
    Err(ChatError::Network(
        "Subscription socket closed before it was acknowledged".to_string(),
    ))
}

async fn send(ws: &mut WebSocket, frame: &ClientFrame) -> Result<()> {
    ws.send(WsMessage::Text(frame.to_text()?))
        .await
        .map_err(|e| ChatError::Network(e.to_string()))
}
