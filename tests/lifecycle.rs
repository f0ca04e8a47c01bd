//! End-to-end tests of the service manager: requests in, state events in,
//! completions and status notifications out.

pub mod common;

use common::harness::{TestHarness, service};
use futures::future::join_all;
use service_lifecycle::{
    Error,
    core::{ErrorCode, Outcome, RequestKind, ServiceState, StatusLabel},
};
use std::time::Duration;
use tokio::time::timeout;

const A2DP_SINK: &str = "0000110b-0000-1000-8000-00805f9b34fb";
const HFP_AG: &str = "0000111f-0000-1000-8000-00805f9b34fb";

#[tokio::test]
async fn test_full_connect_lifecycle() {
    let mut h = TestHarness::new();
    let id = service("dev_00_11_22_33_44_55", A2DP_SINK);
    h.backend.add(&id, ServiceState::Disconnected);

    // 1. The request is accepted but not answered yet.
    let mut reply = h.manager.connect(&id).await.unwrap();
    assert!(reply.try_outcome().is_none());
    assert_eq!(
        h.manager.status(&id).await.unwrap(),
        StatusLabel::Disconnected
    );

    // 2. Connecting is announced.
    h.transition(&id, ServiceState::Connecting).await;
    let change = h.listener.recv().await.unwrap();
    assert_eq!((change.id.clone(), change.label), (id.clone(), StatusLabel::Connecting));
    assert!(reply.try_outcome().is_none());

    // 3. Connected completes the request and is announced.
    h.transition(&id, ServiceState::Connected).await;
    let outcome = timeout(Duration::from_secs(1), reply.outcome())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(h.listener.recv().await.unwrap().label, StatusLabel::Connected);

    // 4. Disconnect round trip.
    let reply = h.manager.disconnect(&id).await.unwrap();
    h.transition(&id, ServiceState::Disconnecting).await;
    h.transition(&id, ServiceState::Disconnected).await;
    reply.wait().await.unwrap();
    assert_eq!(
        h.listener.recv().await.unwrap().label,
        StatusLabel::Disconnecting
    );
    assert_eq!(
        h.listener.recv().await.unwrap().label,
        StatusLabel::Disconnected
    );
}

#[tokio::test]
async fn test_connect_timeout_reports_error() {
    let mut h = TestHarness::new();
    let id = service("dev_00_11_22_33_44_55", A2DP_SINK);
    h.backend.add(&id, ServiceState::Disconnected);

    let reply = h.manager.connect(&id).await.unwrap();
    h.transition(&id, ServiceState::Connecting).await;
    h.backend.set_error(&id, Some(ErrorCode::ETIMEDOUT));
    h.transition(&id, ServiceState::Disconnected).await;

    assert_eq!(
        reply.wait().await.unwrap_err(),
        Error::Failed(ErrorCode::ETIMEDOUT)
    );
    assert_eq!(h.listener.recv().await.unwrap().label, StatusLabel::Connecting);
    assert_eq!(h.listener.recv().await.unwrap().label, StatusLabel::Error);
    assert_eq!(h.manager.status(&id).await.unwrap(), StatusLabel::Error);
}

#[tokio::test]
async fn test_disconnect_answers_before_stale_connect() {
    let h = TestHarness::new();
    let id = service("dev_00_11_22_33_44_55", HFP_AG);
    h.backend.add(&id, ServiceState::Disconnected);

    let connect = h.manager.connect(&id).await.unwrap();
    h.transition(&id, ServiceState::Connecting).await;
    let disconnect = h.manager.disconnect(&id).await.unwrap();
    h.transition(&id, ServiceState::Disconnecting).await;
    h.backend.set_error(&id, Some(ErrorCode::ECONNRESET));
    h.transition(&id, ServiceState::Disconnected).await;

    assert_eq!(disconnect.outcome().await.unwrap(), Outcome::Success);
    assert_eq!(
        connect.outcome().await.unwrap(),
        Outcome::Failure(ErrorCode::ECONNRESET)
    );
}

#[tokio::test]
async fn test_concurrent_connects_accept_exactly_one() {
    let h = TestHarness::new();
    let id = service("dev_00_11_22_33_44_55", A2DP_SINK);
    h.backend.add(&id, ServiceState::Disconnected);

    let results = join_all((0..8).map(|_| h.manager.connect(&id))).await;
    let (accepted, rejected): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_ok());
    assert_eq!(accepted.len(), 1);
    for result in rejected {
        assert_eq!(result.unwrap_err(), Error::InProgress(RequestKind::Connect));
    }
}

#[tokio::test]
async fn test_refused_operations_are_reported_synchronously() {
    let h = TestHarness::new();
    let id = service("dev_00_11_22_33_44_55", A2DP_SINK);
    h.backend.add(&id, ServiceState::Connected);
    h.backend.refuse_disconnect(&id, Some(ErrorCode::EALREADY));

    assert_eq!(
        h.manager.disconnect(&id).await.unwrap_err(),
        Error::OperationFailed(ErrorCode::EALREADY)
    );

    // The refused disconnect left its slot free.
    h.backend.refuse_disconnect(&id, None);
    let reply = h.manager.disconnect(&id).await.unwrap();
    h.transition(&id, ServiceState::Disconnected).await;
    reply.wait().await.unwrap();

    h.backend.refuse_connect(&id, Some(ErrorCode::EHOSTDOWN));
    assert_eq!(
        h.manager.connect(&id).await.unwrap_err(),
        Error::OperationFailed(ErrorCode::EHOSTDOWN)
    );
}

#[tokio::test]
async fn test_unavailable_removes_service_silently() {
    let mut h = TestHarness::new();
    let id = service("dev_00_11_22_33_44_55", A2DP_SINK);

    h.transition(&id, ServiceState::Disconnected).await;
    assert_eq!(
        h.listener.recv().await.unwrap().label,
        StatusLabel::Disconnected
    );
    h.transition(&id, ServiceState::Connected).await;
    assert_eq!(h.listener.recv().await.unwrap().label, StatusLabel::Connected);
    assert!(h.registry.contains(&id.object_path()));

    h.transition(&id, ServiceState::Unavailable).await;
    h.transition(&id, ServiceState::Unavailable).await;
    h.settle().await;

    assert!(h.listener.try_recv().is_none());
    assert!(!h.registry.contains(&id.object_path()));
    assert!(h.manager.services().await.unwrap().is_empty());
    assert_eq!(
        h.manager.status(&id).await.unwrap(),
        StatusLabel::Unavailable
    );
    assert_eq!(h.manager.connect(&id).await.unwrap_err(), Error::NotAvailable);
}

#[tokio::test]
async fn test_reconnecting_overrides_transitional_states() {
    let mut h = TestHarness::new();
    let id = service("dev_00_11_22_33_44_55", HFP_AG);
    h.backend.add(&id, ServiceState::Connected);
    assert_eq!(h.manager.status(&id).await.unwrap(), StatusLabel::Connected);

    h.backend.set_reconnecting(&id, true);
    h.transition(&id, ServiceState::Disconnected).await;
    assert_eq!(
        h.listener.recv().await.unwrap().label,
        StatusLabel::Reconnecting
    );

    // Connecting also projects to "reconnecting": no second notification.
    // The flag is read when the event is processed, so settle before clearing it.
    h.transition(&id, ServiceState::Connecting).await;
    h.settle().await;
    assert!(h.listener.try_recv().is_none());
    assert_eq!(
        h.manager.status(&id).await.unwrap(),
        StatusLabel::Reconnecting
    );

    h.backend.set_reconnecting(&id, false);
    h.transition(&id, ServiceState::Connected).await;
    assert_eq!(h.listener.recv().await.unwrap().label, StatusLabel::Connected);
    h.settle().await;
    assert!(h.listener.try_recv().is_none());
}

#[tokio::test]
async fn test_services_lists_every_live_endpoint() {
    let h = TestHarness::new();
    let a2dp = service("dev_00_11_22_33_44_55", A2DP_SINK);
    let hfp = service("dev_00_11_22_33_44_55", HFP_AG);

    h.transition(&a2dp, ServiceState::Connected).await;
    h.transition(&hfp, ServiceState::Disconnected).await;
    h.settle().await;

    assert_eq!(
        h.manager.services().await.unwrap(),
        vec![
            (a2dp.clone(), StatusLabel::Connected),
            (hfp.clone(), StatusLabel::Disconnected),
        ]
    );
    assert_eq!(
        h.registry.paths(),
        vec![a2dp.object_path(), hfp.object_path()]
    );

    h.manager.shutdown().await.unwrap();
    assert!(h.registry.is_empty());
    assert_eq!(h.manager.services().await.unwrap_err(), Error::ChannelClosed);
}
