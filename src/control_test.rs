// Unit tests for the control protocol encoding

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_request_round_trip() {
    let requests = vec![
        ControlRequest::TogglePanel,
        ControlRequest::OpenWithSelection {
            text: "call me back".to_string(),
        },
        ControlRequest::ScrapeDashboard,
        ControlRequest::CopyLog,
        ControlRequest::Summarize {
            note: "wrap up the day".to_string(),
        },
        ControlRequest::Ping,
        ControlRequest::Shutdown,
    ];
    for request in requests {
        let json = serde_json::to_string(&request).unwrap();
        let back: ControlRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(format!("{:?}", back), format!("{:?}", request));
    }
}

#[test]
fn test_response_round_trip() {
    let json = serde_json::to_string(&ControlResponse::Summary("done".into())).unwrap();
    let back: ControlResponse = serde_json::from_str(&json).unwrap();
    match back {
        ControlResponse::Summary(s) => assert_eq!(s, "done"),
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_reply_slot_drop_is_not_silent() {
    // The handler converts a dropped reply slot into an explicit error; this
    // is the property the oneshot gives us.
    let (tx, rx) = tokio::sync::oneshot::channel::<ControlResponse>();
    drop(tx);
    assert!(rx.blocking_recv().is_err());
}
