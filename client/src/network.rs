//! Request/response client for the game server

use bincode::{deserialize, serialize};
use log::{debug, info, warn};
use shared::{
    EntityId, EntitySummary, ErrorKind, GuessOutcome, Packet, SessionId, SessionView,
    MAX_PACKET_SIZE,
};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::timeout_at;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid server address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("no reply from server within {0:?}")]
    Timeout(Duration),

    #[error("{message}")]
    Server { kind: ErrorKind, message: String },

    #[error("no game in progress; use `start` first")]
    NoGame,

    #[error("unexpected reply: {0}")]
    Unexpected(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Talks to the server one request at a time, matching replies by request id.
///
/// Remembers the session of the last started game so guesses only need the
/// player id.
pub struct GameClient {
    socket: UdpSocket,
    server_addr: SocketAddr,
    reply_timeout: Duration,
    next_request_id: u64,
    session: Option<SessionId>,
}

impl GameClient {
    pub async fn new(server_addr: &str, reply_timeout: Duration) -> ClientResult<Self> {
        let server_addr: SocketAddr = server_addr.parse()?;
        let bind_addr = if server_addr.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind_addr).await?;

        debug!("Client socket bound to {}", socket.local_addr()?);

        Ok(Self {
            socket,
            server_addr,
            reply_timeout,
            next_request_id: 1,
            session: None,
        })
    }

    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Switches to an existing game, e.g. one started from another client
    pub fn resume(&mut self, session: SessionId) {
        self.session = Some(session);
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Sends `packet` and waits for the reply carrying the same request id.
    ///
    /// Replies to earlier, timed-out requests are dropped. Error packets are
    /// turned into [`ClientError::Server`].
    async fn request(&mut self, packet: Packet) -> ClientResult<Packet> {
        let request_id = packet.request_id();
        let data = serialize(&packet)?;
        self.socket.send_to(&data, self.server_addr).await?;

        let deadline = tokio::time::Instant::from_std(Instant::now() + self.reply_timeout);
        let mut buffer = vec![0u8; MAX_PACKET_SIZE];

        loop {
            let (len, addr) = timeout_at(deadline, self.socket.recv_from(&mut buffer))
                .await
                .map_err(|_| ClientError::Timeout(self.reply_timeout))??;

            if addr != self.server_addr {
                warn!("Ignoring datagram from unknown peer {}", addr);
                continue;
            }

            let reply = match deserialize::<Packet>(&buffer[..len]) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Failed to deserialize reply: {}", e);
                    continue;
                }
            };

            if reply.request_id() != request_id {
                debug!(
                    "Dropping stale reply {} while waiting for {}",
                    reply.request_id(),
                    request_id
                );
                continue;
            }

            return match reply {
                Packet::Error { kind, message, .. } => Err(ClientError::Server { kind, message }),
                reply => Ok(reply),
            };
        }
    }

    pub async fn start_game(&mut self) -> ClientResult<SessionId> {
        let request_id = self.next_id();
        match self.request(Packet::StartGame { request_id }).await? {
            Packet::GameStarted { session_id, .. } => {
                info!("Started game {}", session_id);
                self.session = Some(session_id.clone());
                Ok(session_id)
            }
            other => Err(ClientError::Unexpected(format!("{:?}", other))),
        }
    }

    pub async fn search(
        &mut self,
        query: &str,
        limit: Option<u32>,
    ) -> ClientResult<Vec<EntitySummary>> {
        let request_id = self.next_id();
        let packet = Packet::SearchPlayers {
            request_id,
            query: query.to_string(),
            limit,
        };

        match self.request(packet).await? {
            Packet::SearchResults { players, .. } => Ok(players),
            other => Err(ClientError::Unexpected(format!("{:?}", other))),
        }
    }

    pub async fn guess(&mut self, entity_id: EntityId) -> ClientResult<GuessOutcome> {
        let session_id = self.session.clone().ok_or(ClientError::NoGame)?;
        let request_id = self.next_id();
        let packet = Packet::Guess {
            request_id,
            session_id,
            entity_id,
        };

        match self.request(packet).await? {
            Packet::GuessResult { outcome, .. } => Ok(outcome),
            other => Err(ClientError::Unexpected(format!("{:?}", other))),
        }
    }

    pub async fn session_state(&mut self) -> ClientResult<SessionView> {
        let session_id = self.session.clone().ok_or(ClientError::NoGame)?;
        let request_id = self.next_id();

        match self.request(Packet::GetSession { request_id, session_id }).await? {
            Packet::SessionState { view, .. } => Ok(view),
            other => Err(ClientError::Unexpected(format!("{:?}", other))),
        }
    }

    /// Round trip time of a single ping
    pub async fn ping(&mut self) -> ClientResult<Duration> {
        let request_id = self.next_id();
        let sent = Instant::now();

        match self.request(Packet::Ping { request_id }).await? {
            Packet::Pong { .. } => Ok(sent.elapsed()),
            other => Err(ClientError::Unexpected(format!("{:?}", other))),
        }
    }
}
