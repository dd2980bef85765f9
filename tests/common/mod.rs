//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use explorer_gate::blockchain::HttpNodeClient;
use explorer_gate::confirmation::NotificationBus;
use explorer_gate::config::GateConfig;
use explorer_gate::gateway::Gateway;
use explorer_gate::http::HttpServer;
use explorer_gate::lifecycle::Shutdown;
use explorer_gate::load_balancer::{Node, NodeSource, StaticNodeSource};

pub const PUSH_OK: &str = r#"{"jsonrpc":"2.0","id":"","result":{"code":0,"data":"","log":"","hash":"ABCDEF"}}"#;

/// A node API stub listening on a local port.
pub struct MockNode {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockNode {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn node(&self) -> Node {
        Node::new("127.0.0.1", self.port())
    }

    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable node. `respond` maps the request target to `(status, body)`.
pub async fn start_mock_node<F>(respond: F) -> MockNode
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let log = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let respond = respond.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                log.lock().unwrap().push(target.clone());

                let (status, body) = respond(&target);
                let reason = match status {
                    200 => "OK",
                    400 => "Bad Request",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    _ => "Unknown",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockNode { addr, requests }
}

/// A node that answers every request with the same JSON body.
pub async fn start_fixed_node(status: u16, body: &'static str) -> MockNode {
    start_mock_node(move |_| (status, body.to_string())).await
}

/// A local port with nothing listening on it.
pub async fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Config pointing at local nodes with short timeouts.
pub fn local_config(primary_port: u16, nodes: Vec<Node>, single_node: bool) -> GateConfig {
    let mut config = GateConfig::default();
    config.node.link = "127.0.0.1".to_string();
    config.node.port = primary_port;
    config.node.single_node = single_node;
    config.node.request_timeout_secs = 2;
    config.nodes = nodes;
    config.confirmation.timeout_secs = 1;
    config.timeouts.request_secs = 5;
    config.observability.metrics_enabled = false;
    config
}

/// Gateway over real HTTP node calls.
pub fn gateway(config: &GateConfig, bus: Arc<NotificationBus>) -> Gateway {
    let api = Arc::new(HttpNodeClient::new(config.node.request_timeout()).unwrap());
    let nodes: Arc<dyn NodeSource> = Arc::new(StaticNodeSource::new(config.nodes.clone()));
    Gateway::from_config(config, api, Some(nodes), bus).unwrap()
}

/// Start the full HTTP server on an ephemeral port. Returns its base URL.
pub async fn start_gate(config: &GateConfig, bus: Arc<NotificationBus>, shutdown: &Shutdown) -> String {
    let gateway = Arc::new(gateway(config, bus));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, gateway);
    tokio::spawn(server.run(listener, shutdown.signalled()));
    format!("http://{}", addr)
}

/// Poll `check` until it holds or a second passes.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
