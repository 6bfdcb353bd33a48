//! Server network layer handling UDP request/response traffic

use crate::error::GameError;
use crate::game::GameOrchestrator;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{ErrorKind, Packet, MAX_PACKET_SIZE};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    Shutdown,
}

/// Messages sent from request handlers to the sender task
#[derive(Debug)]
pub enum GameMessage {
    SendPacket { packet: Packet, addr: SocketAddr },
}

/// Main server coordinating networking and request dispatch
pub struct Server {
    socket: Arc<UdpSocket>,
    game: Arc<GameOrchestrator>,
    stats_interval: Duration,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        game: Arc<GameOrchestrator>,
        stats_interval: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            game,
            stats_interval,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sender that can stop [`Server::run`] from another task
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that continuously listens for incoming packets
    async fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = vec![0u8; MAX_PACKET_SIZE];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes outgoing packet queue
    async fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    /// Answers one request on its own task
    fn dispatch(&self, packet: Packet, addr: SocketAddr) {
        let game = Arc::clone(&self.game);
        let game_tx = self.game_tx.clone();

        tokio::spawn(async move {
            let response = handle_request(&game, packet).await;
            if let Err(e) = game_tx.send(GameMessage::SendPacket {
                packet: response,
                addr,
            }) {
                error!("Failed to queue response for {}: {}", addr, e);
            }
        });
    }

    /// Main server loop dispatching requests until shutdown
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver().await;
        self.spawn_network_sender().await;

        let mut stats_interval = interval(self.stats_interval);

        info!("Server started successfully");

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            debug!("Request {} from {}", packet.request_id(), addr);
                            self.dispatch(packet, addr);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = stats_interval.tick() => {
                    let sessions = self.game.sessions();
                    let total = sessions.len().await;
                    if total > 0 {
                        let active = sessions.active_count().await;
                        info!("{} games in progress, {} total", active, total);
                    }
                },
            }
        }

        Ok(())
    }
}

fn error_packet(request_id: u64, err: &GameError) -> Packet {
    Packet::Error {
        request_id,
        kind: err.kind(),
        message: err.to_string(),
    }
}

/// Maps one request packet onto the orchestrator and builds the reply
pub async fn handle_request(game: &GameOrchestrator, packet: Packet) -> Packet {
    let request_id = packet.request_id();

    match packet {
        Packet::StartGame { .. } => match game.start_game().await {
            Ok(session_id) => Packet::GameStarted {
                request_id,
                session_id,
            },
            Err(e) => error_packet(request_id, &e),
        },

        Packet::SearchPlayers { query, limit, .. } => {
            let limit = limit.map(|limit| limit as usize);
            match game.search_players(&query, limit).await {
                Ok(players) => Packet::SearchResults {
                    request_id,
                    players,
                },
                Err(e) => error_packet(request_id, &e),
            }
        }

        Packet::Guess {
            session_id,
            entity_id,
            ..
        } => match game.make_guess(&session_id, entity_id).await {
            Ok(outcome) => Packet::GuessResult {
                request_id,
                outcome,
            },
            Err(e) => error_packet(request_id, &e),
        },

        Packet::GetSession { session_id, .. } => match game.get_session(&session_id).await {
            Ok(view) => Packet::SessionState { request_id, view },
            Err(e) => error_packet(request_id, &e),
        },

        Packet::Ping { .. } => Packet::Pong { request_id },

        _ => {
            warn!("Unexpected response packet sent to server (request {})", request_id);
            Packet::Error {
                request_id,
                kind: ErrorKind::BadRequest,
                message: "expected a request packet".to_string(),
            }
        }
    }
}
