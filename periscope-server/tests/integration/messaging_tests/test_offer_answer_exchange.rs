use periscope_core::{Role, ServerMessage};
use serde_json::json;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{
    clients_updates, connect_as, disconnect, roster_pairs, send_answer, send_offer, settle,
    signals, user_disconnected,
};

/// Camera registers, dashboard registers, offer/answer round trip, camera leaves.
#[tokio::test]
async fn test_full_source_viewer_cycle() {
    init_tracing();

    let (relay, signaling) = create_test_relay();

    let a = connect_as(&relay, Role::Source).await.unwrap();
    let b = connect_as(&relay, Role::Viewer).await.unwrap();

    send_offer(&relay, &a, json!({ "sdp": "O1" })).await.unwrap();
    settle(&relay).await.unwrap();

    assert_eq!(
        signals(&signaling.messages_for(&b).await),
        vec![ServerMessage::Offer {
            offer: json!({ "sdp": "O1" }),
            from: a.clone(),
        }]
    );
    assert!(signals(&signaling.messages_for(&a).await).is_empty());

    send_answer(&relay, &b, &a, json!({ "sdp": "A1" })).await.unwrap();
    settle(&relay).await.unwrap();

    assert_eq!(
        signals(&signaling.messages_for(&a).await),
        vec![ServerMessage::Answer {
            answer: json!({ "sdp": "A1" }),
            from: b.clone(),
        }]
    );

    signaling.clear().await;
    disconnect(&relay, &a).await.unwrap();
    settle(&relay).await.unwrap();

    let to_b = signaling.messages_for(&b).await;
    assert_eq!(user_disconnected(&to_b), vec![a.clone()]);

    let updates = clients_updates(&to_b);
    assert_eq!(updates.len(), 1);
    assert_eq!(roster_pairs(&updates[0]), vec![(b, Some(Role::Viewer))]);
}

#[tokio::test]
async fn test_answer_reaches_only_its_target() {
    init_tracing();

    let (relay, signaling) = create_test_relay();

    let x = connect_as(&relay, Role::Source).await.unwrap();
    let y = connect_as(&relay, Role::Source).await.unwrap();
    let viewer = connect_as(&relay, Role::Viewer).await.unwrap();

    send_answer(&relay, &viewer, &x, json!({ "sdp": "A" }))
        .await
        .unwrap();
    settle(&relay).await.unwrap();

    assert_eq!(signals(&signaling.messages_for(&x).await).len(), 1);
    assert!(signals(&signaling.messages_for(&y).await).is_empty());
    assert!(signals(&signaling.messages_for(&viewer).await).is_empty());
}

#[tokio::test]
async fn test_offer_with_no_other_connections_is_dropped() {
    init_tracing();

    let (relay, signaling) = create_test_relay();

    let a = connect_as(&relay, Role::Source).await.unwrap();
    settle(&relay).await.unwrap();
    signaling.clear().await;

    send_offer(&relay, &a, json!({ "sdp": "O1" })).await.unwrap();
    settle(&relay).await.unwrap();

    assert_eq!(signaling.count().await, 0);
}

#[tokio::test]
async fn test_payload_passes_through_unchanged() {
    init_tracing();

    let (relay, signaling) = create_test_relay();

    let a = connect_as(&relay, Role::Source).await.unwrap();
    let b = connect_as(&relay, Role::Viewer).await.unwrap();
    let offer = json!({
        "type": "offer",
        "sdp": "v=0\r\no=- 46117317 2 IN IP4 127.0.0.1\r\n",
        "extra": [1, 2, { "nested": null }]
    });

    send_offer(&relay, &a, offer.clone()).await.unwrap();
    settle(&relay).await.unwrap();

    let received = signals(&signaling.messages_for(&b).await);
    assert_eq!(received, vec![ServerMessage::Offer { offer, from: a }]);
}
