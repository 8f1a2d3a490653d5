use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Recipient, Running, StreamHandler};
use actix_web::http::header;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use actix_web_actors::ws::{CloseCode, CloseReason};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

use system::{ClientMessage, ConnectionId, ServerMessage};

use crate::config::RelayConfig;
use crate::connection_tx_storage::ConnectionTx;
use crate::server::ServerTx;

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect { tx: ConnectionTx },
    Disconnect { from: ConnectionId },
    Message {
        from: ConnectionId,
        message: ClientMessage,
    },
}

#[derive(Debug, PartialEq)]
pub enum ConnectionEvent {
    Connected { connection_id: ConnectionId },
    Message(ServerMessage),
    /// Room was full; the socket must be closed.
    Rejected,
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

/// What the actor has to do on the socket or towards the relay.
#[derive(Debug)]
enum Egress {
    Forward(ConnectionCommand),
    Text(String),
    Close(CloseReason),
}

#[derive(Debug)]
enum ConnectionState {
    /// Waiting for the relay to assign an id. Frames that arrive meanwhile are held back.
    Idle(Vec<ClientMessage>),
    Connected(ConnectionId),
    Rejected,
}

impl ConnectionState {
    fn new() -> Self {
        ConnectionState::Idle(Vec::new())
    }

    fn ingress(&mut self, message: ClientMessage) -> Option<ConnectionCommand> {
        match self {
            ConnectionState::Idle(pending) => {
                pending.push(message);
                None
            }
            ConnectionState::Connected(from) => Some(ConnectionCommand::Message {
                from: *from,
                message,
            }),
            ConnectionState::Rejected => None,
        }
    }

    fn egress(&mut self, event: ConnectionEvent) -> Vec<Egress> {
        match event {
            ConnectionEvent::Connected { connection_id } => {
                match std::mem::replace(self, ConnectionState::Connected(connection_id)) {
                    ConnectionState::Idle(pending) => pending
                        .into_iter()
                        .map(|message| {
                            Egress::Forward(ConnectionCommand::Message {
                                from: connection_id,
                                message,
                            })
                        })
                        .collect(),
                    _ => Vec::new(),
                }
            }
            ConnectionEvent::Message(message) => {
                log::debug!("Egress {}", event_name(&message));
                match message.to_json() {
                    Ok(text) => vec![Egress::Text(text)],
                    Err(err) => {
                        log::error!("Failed to serialize outgoing message: {}", err);
                        Vec::new()
                    }
                }
            }
            ConnectionEvent::Rejected => {
                *self = ConnectionState::Rejected;
                vec![Egress::Close(CloseReason {
                    code: CloseCode::Policy,
                    description: Some("room full".into()),
                })]
            }
        }
    }
}

struct ConnectionActor {
    state: ConnectionState,
    srv_tx: ServerTx,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl ConnectionActor {
    fn new(srv_tx: ServerTx) -> Self {
        Self {
            state: ConnectionState::new(),
            srv_tx,
            stop_tx: None,
        }
    }

    fn send_command(&self, command: ConnectionCommand, ctx: &mut ws::WebsocketContext<Self>) {
        if self.srv_tx.send(command).is_err() {
            log::error!("Relay is gone; closing connection");
            ctx.stop();
        }
    }
}

/// Relays events from the server task to the actor. Reports `Disconnect` on
/// exit if `Connected` has passed through, whether or not the actor saw it.
async fn forward_events(
    mut rx: UnboundedReceiver<ConnectionEvent>,
    mut stop_rx: oneshot::Receiver<()>,
    addr: Recipient<ConnectionActorMessage>,
    srv_tx: ServerTx,
) {
    log::debug!("connection forwarder - started");
    let mut admitted = None;
    loop {
        tokio::select! {
            biased;
            event = rx.recv() => match event {
                Some(event) => {
                    if let ConnectionEvent::Connected { connection_id } = event {
                        admitted = Some(connection_id);
                    }
                    if addr.send(ConnectionActorMessage(event)).await.is_err() {
                        break;
                    }
                }
                None => return,
            },
            _ = &mut stop_rx => break,
        }
    }
    if let Some(from) = admitted {
        if srv_tx.send(ConnectionCommand::Disconnect { from }).is_err() {
            log::warn!("Relay is gone; could not report disconnect of {}", from);
        }
    }
    log::debug!("connection forwarder - terminated");
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<ConnectionEvent>();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        self.stop_tx = Some(stop_tx);

        if self.srv_tx.send(ConnectionCommand::Connect { tx }).is_err() {
            log::error!("Relay is gone; refusing connection");
            ctx.stop();
            return;
        }

        let addr = ctx.address().recipient();
        tokio::spawn(forward_events(rx, stop_rx, addr, self.srv_tx.clone()));
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => {
                log::debug!("Ingress size: {}", text.len());
                match ClientMessage::from_json(&text) {
                    Ok(message) => {
                        log::debug!("Ingress {:?}", message);
                        if let Some(command) = self.state.ingress(message) {
                            self.send_command(command, ctx);
                        }
                    }
                    Err(err) => log::warn!("Dropping frame: {}", err),
                }
            }
            Ok(ws::Message::Binary(bin)) => {
                log::debug!("Ignoring binary frame of {} bytes", bin.len());
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => (),
            Err(err) => {
                log::warn!("WebSocket protocol error: {}", err);
                ctx.stop();
            }
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        for egress in self.state.egress(msg.0) {
            match egress {
                Egress::Forward(command) => self.send_command(command, ctx),
                Egress::Text(text) => ctx.text(text),
                Egress::Close(reason) => {
                    ctx.close(Some(reason));
                    ctx.stop();
                }
            }
        }
    }
}

fn event_name(message: &ServerMessage) -> &'static str {
    match message {
        ServerMessage::Canvas(event) => event.name(),
        ServerMessage::Session(_) => "session",
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    srv_tx: web::Data<ServerTx>,
    config: web::Data<RelayConfig>,
) -> Result<HttpResponse, Error> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !config.allowed_origin.allows(origin) {
            log::warn!("Refusing WebSocket handshake from origin {:?}", origin);
            return Ok(HttpResponse::Forbidden().finish());
        }
    }
    ws::start(ConnectionActor::new(srv_tx.get_ref().clone()), &req, stream)
}
