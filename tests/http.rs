use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DailyTotal {
    date: String,
    total: f64,
}

#[derive(Debug, Deserialize)]
struct RevenueResponse {
    period_in_days: u32,
    end_date: String,
    total: f64,
    days: Vec<DailyTotal>,
}

#[derive(Debug, Deserialize)]
struct Order {
    id: String,
    status: String,
    total: f64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("revenue_dashboard_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/revenue")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_revenue_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn fetch_revenue(client: &Client, base_url: &str, days: u32) -> RevenueResponse {
    client
        .get(format!("{base_url}/api/revenue?days={days}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_new_order_shows_up_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_revenue(&client, &server.base_url, 7).await;
    assert_eq!(before.days.len(), 7);

    let response = client
        .post(format!("{}/api/orders", server.base_url))
        .json(&serde_json::json!({ "total": 120.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let order: Order = response.json().await.unwrap();
    assert_eq!(order.status, "ordered");
    assert_eq!(order.total, 120.0);

    let after = fetch_revenue(&client, &server.base_url, 7).await;
    assert_eq!(after.period_in_days, 7);
    assert_eq!(after.days.len(), 7);
    let today = after.days.last().unwrap();
    assert_eq!(today.date, after.end_date);
    assert_eq!(today.total, before.days.last().unwrap().total + 120.0);
    assert_eq!(after.total, before.total + 120.0);
}

#[tokio::test]
async fn http_cancelled_order_is_not_revenue() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_revenue(&client, &server.base_url, 1).await;

    let response = client
        .post(format!("{}/api/orders", server.base_url))
        .json(&serde_json::json!({ "total": 500.0, "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let after = fetch_revenue(&client, &server.base_url, 1).await;
    assert_eq!(after.days.len(), 1);
    assert_eq!(after.total, before.total);
}

#[tokio::test]
async fn http_status_change_updates_revenue() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let order: Order = client
        .post(format!("{}/api/orders", server.base_url))
        .json(&serde_json::json!({ "total": 30.0, "status": "delivered" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let before = fetch_revenue(&client, &server.base_url, 1).await;

    let response = client
        .patch(format!("{}/api/orders/{}/status", server.base_url, order.id))
        .json(&serde_json::json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let after = fetch_revenue(&client, &server.base_url, 1).await;
    assert_eq!(after.total, before.total - 30.0);
}

#[tokio::test]
async fn http_rejects_bad_windows_and_bad_dates() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/revenue?days=0", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/api/orders", server.base_url))
        .json(&serde_json::json!({ "total": 10.0, "date": "not a date" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .get(format!("{}/api/revenue?days=100000000", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
