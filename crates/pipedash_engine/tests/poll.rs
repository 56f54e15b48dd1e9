use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use pipedash_engine::{
    ClientSettings, EngineEvent, HttpClient, PollSettings, PollingSession,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<HttpClient> {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    Arc::new(HttpClient::new(settings).expect("client"))
}

fn running_template() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "current_batch": 2,
        "current_step": "fetch",
        "end_time": 0,
        "last_updated": 1000,
        "start_time": 1000,
        "status": "running",
        "steps_completed": ["fetch"],
        "total_batches": 5
    }))
}

fn drain(rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn first_fetch_is_immediate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipeline/status"))
        .respond_with(running_template())
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    // Interval far longer than the test: any event must come from the
    // immediate first fetch, not a timer tick.
    let session = PollingSession::start(
        client_for(&server),
        1,
        PollSettings {
            interval: Duration::from_secs(60),
        },
        tx,
    );

    tokio::time::sleep(Duration::from_millis(300)).await;
    let events = drain(&rx);
    session.stop();

    assert_eq!(events.len(), 1, "expected exactly the immediate fetch");
    match &events[0] {
        EngineEvent::StatusFetched {
            generation,
            seq,
            result,
        } => {
            assert_eq!(*generation, 1);
            assert_eq!(*seq, 1);
            assert!(result.is_ok());
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn ticks_issue_sequential_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipeline/status"))
        .respond_with(running_template())
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let session = PollingSession::start(
        client_for(&server),
        3,
        PollSettings {
            interval: Duration::from_millis(50),
        },
        tx,
    );

    tokio::time::sleep(Duration::from_millis(400)).await;
    session.stop();
    let events = drain(&rx);

    // One immediate fetch plus several periodic ones.
    assert!(events.len() >= 3, "only {} events", events.len());
    let seqs: Vec<u64> = events
        .iter()
        .map(|event| match event {
            EngineEvent::StatusFetched { seq, .. } => *seq,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    let expected: Vec<u64> = (1..=seqs.len() as u64).collect();
    assert_eq!(seqs, expected, "issue order must be strictly sequential");
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_discards_in_flight_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipeline/status"))
        .respond_with(running_template().set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let session = PollingSession::start(
        client_for(&server),
        1,
        PollSettings {
            interval: Duration::from_secs(60),
        },
        tx,
    );

    // Let the first fetch get issued, then stop while it is still pending.
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.stop();
    assert!(!session.is_active());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(
        drain(&rx).is_empty(),
        "a result resolved after stop must be discarded"
    );
    // The request itself was not aborted, only its result.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipeline/status"))
        .respond_with(running_template())
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let session = PollingSession::start(
        client_for(&server),
        1,
        PollSettings {
            interval: Duration::from_millis(50),
        },
        tx,
    );

    tokio::time::sleep(Duration::from_millis(120)).await;
    session.stop();
    let after_first_stop = drain(&rx).len();

    session.stop();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(!session.is_active());
    assert_eq!(drain(&rx).len(), 0);
    assert!(after_first_stop >= 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn failures_keep_polling_alive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipeline/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let session = PollingSession::start(
        client_for(&server),
        1,
        PollSettings {
            interval: Duration::from_millis(50),
        },
        tx,
    );

    tokio::time::sleep(Duration::from_millis(250)).await;
    session.stop();
    let events = drain(&rx);

    // Every tick still produced an event; no failure halts the loop.
    assert!(events.len() >= 2, "only {} events", events.len());
    for event in events {
        match event {
            EngineEvent::StatusFetched { result, .. } => {
                assert!(result.is_err());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
