use iometer_rs::model::MeterType;
use iometer_rs::settings::Settings;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub type Responder = Arc<dyn Fn(usize) -> (u16, String) + Send + Sync>;

/// Minimal HTTP/1.1 server answering every request with the response chosen for its index.
pub struct StubServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(delay: Duration, respond: Responder) -> StubServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v2.0/iometer/reading", listener.local_addr().unwrap());

        let hits = Arc::new(AtomicUsize::new(0));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let paths = Arc::new(Mutex::new(Vec::new()));

        let server = StubServer {
            url,
            hits: hits.clone(),
            max_in_flight: max_in_flight.clone(),
            paths: paths.clone(),
        };

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let hit = hits.fetch_add(1, Ordering::SeqCst);
                let (respond, in_flight, max_in_flight, paths) = (
                    respond.clone(),
                    in_flight.clone(),
                    max_in_flight.clone(),
                    paths.clone(),
                );
                tokio::spawn(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(now, Ordering::SeqCst);
                    handle(stream, hit, delay, respond, paths).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        server
    }

    pub async fn always(status: u16, body: &str) -> StubServer {
        let body = body.to_owned();
        StubServer::start(Duration::ZERO, Arc::new(move |_: usize| (status, body.clone()))).await
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

async fn handle(
    mut stream: TcpStream,
    hit: usize,
    delay: Duration,
    respond: Responder,
    paths: Arc<Mutex<Vec<String>>>,
) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    if let Some(path) = request.split_whitespace().nth(1) {
        paths.lock().unwrap().push(path.to_owned());
    }

    tokio::time::sleep(delay).await;

    let (status, body) = respond(hit);
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

pub fn settings(base_url: &str) -> Settings {
    Settings {
        id: String::from("meter0"),
        alias: String::new(),
        enabled: true,
        base_url: base_url.to_owned(),
        jwt: String::from("secret-jwt"),
        meter_type: MeterType::Grid,
    }
}

/// Poll `condition` until it holds or `timeout` elapses; returns the final outcome.
pub async fn wait_until<F>(timeout: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
