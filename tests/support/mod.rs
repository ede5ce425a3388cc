// Scripted websocket server shared by the integration tests.
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub struct ScriptedServer {
    pub url: String,
    handle: JoinHandle<Vec<Message>>,
}

impl ScriptedServer {
    // Accept one client, read its greeting, push `script`, keep listening for
    // `hold`, then close. Every text/binary frame from the client is recorded.
    pub async fn start(script: Vec<Message>, hold: Duration) -> Self {
        // Bind to an ephemeral port to avoid collisions with local services.
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept client");
            let mut ws = accept_async(stream).await.expect("websocket handshake");
            let mut received = Vec::new();

            // The greeting always arrives before anything else.
            if let Some(Ok(msg)) = ws.next().await {
                received.push(msg);
            }
            for frame in script {
                ws.send(frame).await.expect("send scripted frame");
            }

            let deadline = tokio::time::sleep(hold);
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    msg = ws.next() => match msg {
                        Some(Ok(msg)) if msg.is_text() || msg.is_binary() => received.push(msg),
                        Some(Ok(_)) => {}
                        // Client went away on its own.
                        Some(Err(_)) | None => return received,
                    },
                }
            }

            let _ = ws.close(None).await;
            while let Some(Ok(msg)) = ws.next().await {
                if msg.is_text() || msg.is_binary() {
                    received.push(msg);
                }
            }
            received
        });

        Self {
            url: format!("ws://{addr}"),
            handle,
        }
    }

    // Frames the client sent, in arrival order. Waits for the server task to finish.
    pub async fn received(self) -> Vec<Message> {
        self.handle.await.expect("server task")
    }
}

// An address nothing is listening on.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("ws://{addr}")
}
