//! Tests for tokio spawner and spawned transport

use async_trait::async_trait;
use prometheus_scrobble_queue::core::{Param, Reply, Transport};
use prometheus_scrobble_queue::runtime::{ScrobbleClient, Spawn, SpawnedTransport, TokioSpawner};

#[derive(Clone)]
struct EchoClient;

#[async_trait]
impl ScrobbleClient for EchoClient {
    async fn get(&self, endpoint: &str, params: Vec<Param>) -> Reply {
        let body = format!("{endpoint}:{}", params.len());
        Reply::Data(body.into_bytes())
    }
}

#[derive(Clone)]
struct PendingClient;

#[async_trait]
impl ScrobbleClient for PendingClient {
    async fn get(&self, _endpoint: &str, _params: Vec<Param>) -> Reply {
        std::future::pending::<()>().await;
        Reply::NoContent
    }
}

#[derive(Clone)]
struct PanickingClient;

#[async_trait]
impl ScrobbleClient for PanickingClient {
    async fn get(&self, _endpoint: &str, _params: Vec<Param>) -> Reply {
        panic!("client bug");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[tokio::test]
async fn test_spawned_transport_reports_completion() {
    let (mut transport, mut completions) = SpawnedTransport::new(EchoClient, TokioSpawner::current());

    let params = vec![("id".to_string(), "s0".to_string())];
    let handle = transport.dispatch("scrobble", params);
    assert_eq!(transport.in_flight(), 1);

    let completion = completions.recv().await.expect("completion");
    assert_eq!(completion.handle, handle);
    assert_eq!(completion.reply, Reply::Data(b"scrobble:1".to_vec()));

    transport.release(handle);
    assert_eq!(transport.in_flight(), 0);
}

#[tokio::test]
async fn test_spawned_transport_abort_suppresses_completion() {
    let (mut transport, mut completions) =
        SpawnedTransport::new(PendingClient, TokioSpawner::current());

    let first = transport.dispatch("scrobble", Vec::new());
    let second = transport.dispatch("scrobble", Vec::new());
    assert_ne!(first, second);

    transport.abort(first);
    transport.abort(second);
    assert_eq!(transport.in_flight(), 0);

    let waited =
        tokio::time::timeout(std::time::Duration::from_millis(50), completions.recv()).await;
    assert!(waited.is_err(), "aborted requests must not complete");
}

#[tokio::test]
async fn test_spawned_transport_reports_client_panic_as_failure() {
    let (mut transport, mut completions) =
        SpawnedTransport::new(PanickingClient, TokioSpawner::current());

    let handle = transport.dispatch("scrobble", Vec::new());

    let completion = completions.recv().await.expect("completion");
    assert_eq!(completion.handle, handle);
    assert_eq!(
        completion.reply,
        Reply::Failed("scrobble client panicked".to_string())
    );
}
