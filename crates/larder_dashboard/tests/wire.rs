//! End-to-end wire tests: real TCP server plus the synchronous client.

use larder_dashboard::{DashboardClient, DashboardServer, DashboardService};
use larder_protocol::{Category, Item, Snapshot};
use larder_store::{FileBackend, SnapshotBackend};
use std::io::{BufRead, BufReader, Write};
use tempfile::tempdir;

async fn spawn_server(data_dir: &std::path::Path) -> std::net::SocketAddr {
    let server = DashboardServer::bind("127.0.0.1:0", DashboardService::new(data_dir))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

fn seed_snapshot(path: &std::path::Path, code: &str, quantity: u64) {
    let mut snapshot = Snapshot::default();
    snapshot
        .items
        .insert(code.to_string(), Item::new("Beans", quantity, Category::Food));
    FileBackend::new(path).save(&snapshot).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wire_round_trip() {
    let dir = tempdir().unwrap();
    seed_snapshot(&dir.path().join("pantry.json"), "111", 2);
    let addr = spawn_server(dir.path()).await;

    tokio::task::spawn_blocking(move || {
        let mut client = DashboardClient::connect(&addr.to_string()).unwrap();
        assert!(client.ping().unwrap());

        let snapshot = client.snapshot("pantry.json").unwrap();
        assert_eq!(snapshot.get("111").unwrap().quantity, 2);

        let outcome = client.increment("pantry.json", "111").unwrap();
        assert_eq!(outcome.quantity, Some(3));

        let outcome = client.decrement("pantry.json", "404").unwrap();
        assert!(!outcome.success);

        assert_eq!(
            client.list_snapshots().unwrap(),
            vec!["pantry.json".to_string()]
        );
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_request_gets_structured_error() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(dir.path()).await;

    tokio::task::spawn_blocking(move || {
        let stream = std::net::TcpStream::connect(addr).unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        writer.write_all(b"this is not json\n").unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();

        let response: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["type"], "Error");
        assert_eq!(response["payload"]["code"], "bad_request");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_traversal_target_is_redirected_to_default() {
    let dir = tempdir().unwrap();
    seed_snapshot(&dir.path().join("inventory.json"), "222", 7);
    let addr = spawn_server(dir.path()).await;

    tokio::task::spawn_blocking(move || {
        let mut client = DashboardClient::connect(&addr.to_string()).unwrap();
        // A traversal attempt resolves to the default store name.
        let snapshot = client.snapshot("../../secret.json").unwrap();
        assert_eq!(snapshot.get("222").unwrap().quantity, 7);
    })
    .await
    .unwrap();
}
