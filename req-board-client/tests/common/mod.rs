use req_board::api;
use req_board_client::client::HttpClient;
use req_board_core::storage::json::JsonStore;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// A record server on an ephemeral port backed by a temporary store file.
pub struct TestServer {
    _tempdir: TempDir,
    pub base_url: String,
    server: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let tempdir = tempfile::tempdir().unwrap();
        let store = Arc::new(RwLock::new(JsonStore::load(tempdir.path().join("db.json"))));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = api::router(store);
        let server = tokio::spawn(axum::serve(listener, app.into_make_service()).into_future());
        tokio::time::sleep(Duration::from_millis(100)).await;
        Self {
            _tempdir: tempdir,
            base_url: format!("http://{}", addr),
            server,
        }
    }

    pub fn client(&self) -> Arc<HttpClient> {
        Arc::new(HttpClient::new(&self.base_url).unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}
