use relaycast_core::ServerMessage;
use relaycast_server::RoomPhase;
use serde_json::json;

use crate::init_tracing;
use crate::utils::{TestRig, code};

#[tokio::test]
async fn test_viewer_joins_empty_room() {
    init_tracing();
    let mut rig = TestRig::new(8);
    let viewer = rig.connect();

    rig.send_json(&viewer, json!({ "type": "viewer-join", "code": "ABCD-1234" }))
        .await;

    assert_eq!(
        rig.output.sent_to(&viewer),
        vec![
            ServerMessage::ViewerJoinedOk {
                code: code("ABCD-1234"),
                viewer_id: viewer.clone(),
                host_present: false,
            },
            ServerMessage::PauseState {
                code: code("ABCD-1234"),
                paused: false,
                pause_image_url: None,
            },
        ]
    );
    assert_eq!(
        rig.coordinator
            .rooms()
            .get(&code("ABCD-1234"))
            .unwrap()
            .phase(),
        RoomPhase::ViewersOnly
    );
}

#[tokio::test]
async fn test_viewer_join_notifies_present_host() {
    init_tracing();
    let mut rig = TestRig::new(8);
    let host = rig.connect();
    let viewer = rig.connect();

    rig.send_json(&host, json!({ "type": "host-join", "code": "R1" }))
        .await;
    rig.output.drain();

    rig.send_json(&viewer, json!({ "type": "viewer-join", "code": "R1" }))
        .await;

    assert_eq!(
        rig.output.sent_to(&viewer),
        vec![
            ServerMessage::ViewerJoinedOk {
                code: code("R1"),
                viewer_id: viewer.clone(),
                host_present: true,
            },
            ServerMessage::PauseState {
                code: code("R1"),
                paused: false,
                pause_image_url: None,
            },
        ]
    );
    assert_eq!(
        rig.output.sent_to(&host),
        vec![ServerMessage::ViewerJoined {
            code: code("R1"),
            viewer_id: viewer.clone(),
        }]
    );
}

#[tokio::test]
async fn test_viewer_limit_is_enforced() {
    init_tracing();
    let mut rig = TestRig::new(2);
    let first = rig.connect();
    let second = rig.connect();
    let third = rig.connect();

    rig.send_json(&first, json!({ "type": "viewer-join", "code": "X1" }))
        .await;
    rig.send_json(&second, json!({ "type": "viewer-join", "code": "X1" }))
        .await;
    rig.send_json(&third, json!({ "type": "viewer-join", "code": "X1" }))
        .await;

    assert_eq!(
        rig.output.sent_to(&third),
        vec![ServerMessage::ViewerDenied {
            code: code("X1"),
            reason: "viewer-limit".into(),
            max: 2,
        }]
    );
    // The cap was never exceeded, not even transiently.
    assert_eq!(
        rig.coordinator.rooms().get(&code("X1")).unwrap().viewers.len(),
        2
    );
}

#[tokio::test]
async fn test_rejoin_does_not_count_against_cap() {
    init_tracing();
    let mut rig = TestRig::new(1);
    let viewer = rig.connect();

    rig.send_json(&viewer, json!({ "type": "viewer-join", "code": "R1" }))
        .await;
    rig.output.drain();

    rig.send_json(&viewer, json!({ "type": "viewer-join", "code": "R1" }))
        .await;

    assert_eq!(
        rig.output.sent_to(&viewer),
        vec![
            ServerMessage::ViewerJoinedOk {
                code: code("R1"),
                viewer_id: viewer.clone(),
                host_present: false,
            },
            ServerMessage::PauseState {
                code: code("R1"),
                paused: false,
                pause_image_url: None,
            },
        ]
    );
    assert_eq!(
        rig.coordinator.rooms().get(&code("R1")).unwrap().viewers.len(),
        1
    );
}

#[tokio::test]
async fn test_denied_join_does_not_leak_a_room() {
    init_tracing();
    let mut rig = TestRig::new(0);
    let viewer = rig.connect();

    rig.send_json(&viewer, json!({ "type": "viewer-join", "code": "FRESH" }))
        .await;

    assert_eq!(
        rig.output.sent_to(&viewer),
        vec![ServerMessage::ViewerDenied {
            code: code("FRESH"),
            reason: "viewer-limit".into(),
            max: 0,
        }]
    );
    assert!(rig.coordinator.rooms().is_empty());
}

#[tokio::test]
async fn test_late_viewer_receives_live_state_replay() {
    init_tracing();
    let mut rig = TestRig::new(8);
    let host = rig.connect();
    let late = rig.connect();

    rig.send_json(&host, json!({ "type": "host-join", "code": "R1" }))
        .await;
    rig.send_json(
        &host,
        json!({ "type": "match-update", "code": "R1", "match": { "score": [3, 2] } }),
    )
    .await;
    rig.send_json(
        &host,
        json!({ "type": "pause-set", "code": "R1", "paused": true, "pauseImageUrl": "http://x/y.png" }),
    )
    .await;
    rig.output.drain();

    rig.send_json(&late, json!({ "type": "viewer-join", "code": "R1" }))
        .await;

    assert_eq!(
        rig.output.sent_to(&late),
        vec![
            ServerMessage::ViewerJoinedOk {
                code: code("R1"),
                viewer_id: late.clone(),
                host_present: true,
            },
            ServerMessage::MatchState {
                code: code("R1"),
                match_state: Some(json!({ "score": [3, 2] })),
                paused: true,
                pause_image_url: Some("http://x/y.png".into()),
            },
            ServerMessage::PauseState {
                code: code("R1"),
                paused: true,
                pause_image_url: Some("http://x/y.png".into()),
            },
        ]
    );
}
