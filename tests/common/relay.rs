//! A relay served on an ephemeral local port

use std::net::SocketAddr;
use std::sync::Arc;

use limechat::backend::render::PreviewSource;
use limechat::backend::server::create_app_with_previews;
use limechat::shared::RelayConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Running relay; the server task is aborted on drop
pub struct TestRelay {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestRelay {
    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve a relay on `127.0.0.1:0`
pub async fn spawn_relay(config: RelayConfig, previews: Arc<dyn PreviewSource>) -> TestRelay {
    let app = create_app_with_previews(config, previews);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve relay");
    });
    TestRelay { addr, handle }
}

/// Relay with default configuration and no previews
pub async fn spawn_default_relay() -> TestRelay {
    spawn_relay(RelayConfig::default(), Arc::new(super::previews::NoPreviews)).await
}

/// GET a JSON endpoint of the relay
pub async fn get_json(relay: &TestRelay, path: &str) -> serde_json::Value {
    let body = reqwest::get(relay.http_url(path))
        .await
        .expect("request relay")
        .text()
        .await
        .expect("read body");
    serde_json::from_str(&body).expect("JSON body")
}
