mod support;

use game_client::domain::{
    Direction, Entity, EntityId, EntityRole, GameParams, KeyEvent, Point, WorldSnapshot,
};
use game_client::interface_adapters::net::NetError;
use game_client::interface_adapters::protocol::{EnvelopeCodec, TableCodec, WireSchema};
use game_client::interface_adapters::surface::{CommandSurface, DrawCommand};
use game_client::use_cases::{ConnectionState, Palette};
use game_client::{ClientError, ClientSettings};

use std::time::Duration;
use support::ScriptedServer;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

const HOLD: Duration = Duration::from_millis(150);

fn settings(url: &str, schema: WireSchema) -> ClientSettings {
    ClientSettings {
        server_url: url.to_string(),
        schema,
        send_interval: Duration::from_millis(10),
        ..ClientSettings::default()
    }
}

fn entity(id: u64, pos: Option<(f64, f64)>, role: EntityRole) -> Entity {
    Entity {
        id: EntityId(id),
        position: pos.map(|(x, y)| Point::new(x, y)),
        role,
    }
}

fn surface() -> CommandSurface {
    CommandSurface::new(1280.0, 720.0)
}

#[tokio::test]
async fn greeting_then_heartbeat_renders_positioned_entities() {
    let snapshot = WorldSnapshot {
        entities: vec![
            entity(1, Some((2.0, 3.0)), EntityRole::Other),
            entity(2, None, EntityRole::Other),
        ],
    };
    let server = ScriptedServer::start(
        vec![Message::binary(EnvelopeCodec.encode_heartbeat(&snapshot))],
        HOLD,
    )
    .await;
    let (_key_tx, key_rx) = mpsc::channel(8);

    let settings = settings(&server.url, WireSchema::Envelope);
    let (session, stats) = game_client::run(&settings, surface(), key_rx)
        .await
        .expect("session runs to a clean close");
    let received = server.received().await;

    assert_eq!(received.first(), Some(&Message::text("Hello Server!")));
    assert_eq!(stats.snapshots_rendered, 1);
    assert_eq!(
        session.renderer().surface().fill_rects(),
        vec![(100.0, 150.0, 50.0, 50.0)]
    );
    assert_eq!(session.last_snapshot(), Some(&snapshot));
    assert_eq!(session.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn text_frame_is_ignored() {
    let server = ScriptedServer::start(vec![Message::text("ping")], HOLD).await;
    let (_key_tx, key_rx) = mpsc::channel(8);

    let settings = settings(&server.url, WireSchema::Envelope);
    let (session, stats) = game_client::run(&settings, surface(), key_rx)
        .await
        .expect("session runs to a clean close");
    server.received().await;

    assert_eq!(stats.msgs_in, 1);
    assert_eq!(stats.snapshots_rendered, 0);
    assert!(session.last_snapshot().is_none());
    // Only the startup grid is on the surface.
    assert!(session.renderer().surface().fill_rects().is_empty());
}

#[tokio::test]
async fn game_params_are_acknowledged_without_render() {
    let params = GameParams {
        width: 40,
        height: 30,
        tick_rate: 60,
    };
    let server = ScriptedServer::start(
        vec![Message::binary(EnvelopeCodec.encode_game_params(&params))],
        HOLD,
    )
    .await;
    let (_key_tx, key_rx) = mpsc::channel(8);

    let settings = settings(&server.url, WireSchema::Envelope);
    let (session, stats) = game_client::run(&settings, surface(), key_rx)
        .await
        .expect("session runs to a clean close");
    server.received().await;

    assert_eq!(session.last_params(), Some(params));
    assert_eq!(stats.snapshots_rendered, 0);
    assert!(session.renderer().surface().fill_rects().is_empty());
}

#[tokio::test]
async fn held_key_is_sent_as_action_frames() {
    let server = ScriptedServer::start(Vec::new(), HOLD).await;
    let (key_tx, key_rx) = mpsc::channel(8);
    key_tx
        .send(KeyEvent::down("ArrowUp"))
        .await
        .expect("key channel open");

    let settings = settings(&server.url, WireSchema::Envelope);
    let (_session, stats) = game_client::run(&settings, surface(), key_rx)
        .await
        .expect("session runs to a clean close");
    let received = server.received().await;

    assert_eq!(received[0], Message::text("Hello Server!"));
    let actions: Vec<_> = received[1..]
        .iter()
        .map(|msg| match msg {
            Message::Binary(bytes) => EnvelopeCodec.decode_action(bytes).expect("valid action"),
            other => panic!("unexpected frame {other:?}"),
        })
        .collect();
    assert!(actions.len() >= 3, "only {} actions arrived", actions.len());
    assert!(actions.iter().all(|a| a.directions() == [Direction::Up]));
    assert!(stats.msgs_out as usize >= received.len());
}

#[tokio::test]
async fn idle_client_sends_nothing_but_greeting() {
    let server = ScriptedServer::start(Vec::new(), HOLD).await;
    let (_key_tx, key_rx) = mpsc::channel(8);

    game_client::run(&settings(&server.url, WireSchema::Envelope), surface(), key_rx)
        .await
        .expect("session runs to a clean close");

    assert_eq!(server.received().await, vec![Message::text("Hello Server!")]);
}

#[tokio::test]
async fn table_schema_draws_own_tank_first_in_own_color() {
    let snapshot = WorldSnapshot {
        entities: vec![
            entity(5, Some((1.0, 1.0)), EntityRole::Player),
            entity(6, Some((3.0, 0.0)), EntityRole::Other),
        ],
    };
    let server = ScriptedServer::start(
        vec![Message::binary(TableCodec.encode_heartbeat(&snapshot))],
        HOLD,
    )
    .await;
    let (key_tx, key_rx) = mpsc::channel(8);
    key_tx
        .send(KeyEvent::down("ArrowLeft"))
        .await
        .expect("key channel open");

    let settings = settings(&server.url, WireSchema::Table);
    let (session, _stats) = game_client::run(&settings, surface(), key_rx)
        .await
        .expect("session runs to a clean close");
    let received = server.received().await;

    let surface = session.renderer().surface();
    assert_eq!(
        surface.fill_rects(),
        vec![(50.0, 50.0, 50.0, 50.0), (150.0, 0.0, 50.0, 50.0)]
    );
    let palette = Palette::default();
    let fills: Vec<&DrawCommand> = surface
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::SetFillStyle(_)))
        .collect();
    assert_eq!(
        fills,
        vec![
            &DrawCommand::SetFillStyle(palette.own),
            &DrawCommand::SetFillStyle(palette.other),
        ]
    );

    let Some(Message::Binary(action)) = received.get(1) else {
        panic!("expected an action frame after the greeting");
    };
    let action = TableCodec.decode_action(action).expect("valid action");
    assert_eq!(action.directions(), &[Direction::Left]);
}

#[tokio::test]
async fn unreachable_server_is_a_connect_error() {
    let url = support::unused_url().await;
    let (_key_tx, key_rx) = mpsc::channel(8);

    let result = game_client::run(&settings(&url, WireSchema::Envelope), surface(), key_rx).await;

    assert!(matches!(
        result,
        Err(ClientError::Net(NetError::Connect { .. }))
    ));
}
