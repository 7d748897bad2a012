use bytes::Bytes;
use futures_util::{stream, StreamExt};
use sse_inspect::{inspect, Config, ErrorKind, IntoInspection, Payload, Sse};

#[tokio::test]
async fn parse_hyper_body_as_sse() {
    let mut sse = hyper::Body::from(
        r#"
: test stream

data: first event
id: 1

data:second event
id

data:  third event

"#,
    )
    .into_sse();

    let ev = sse.next().await.expect("Event").expect("Parses");
    assert_eq!(ev.data, "first event");
    assert_eq!(ev.last_event_id.as_deref(), Some("1"));

    let ev = sse.next().await.expect("Event").expect("Parses");
    assert_eq!(ev.data, "second event");
    assert_eq!(ev.last_event_id.as_deref(), Some(""));

    let ev = sse.next().await.expect("Event").expect("Parses");
    assert_eq!(ev.data, " third event");
    assert_eq!(ev.last_event_id, None);

    assert!(sse.next().await.is_none());
}

#[tokio::test]
async fn events_split_across_chunks() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"event: upd")),
        Ok(Bytes::from_static(b"ate\r\ndata: {\"a\"")),
        Ok(Bytes::from_static(b": 1}\r")),
        Ok(Bytes::from_static(b"\n\r\nretry: 2000\n\n")),
    ];

    let mut sse = stream::iter(chunks).into_sse();

    let ev = sse.next().await.expect("Event").expect("Parses");
    assert_eq!(ev.event.as_deref(), Some("update"));
    assert_eq!(ev.data, r#"{"a": 1}"#);

    assert!(sse.next().await.is_none());
    assert_eq!(sse.retry(), Some(std::time::Duration::from_secs(2)));
}

#[tokio::test]
async fn inspect_hyper_body() {
    let sse = hyper::Body::from(
        "event: live\ndata: {\"sessionInfo\": {\"meeting\": \"Monza\"}, \"lap\": 12}\n\n\
         : keep-alive\n\n\
         data: {not json\n\n\
         data: {\"positionData\": []}\n\n",
    )
    .into_sse();

    let results: Vec<_> = inspect(sse, 5, ["sessionInfo", "positionData"])
        .expect("valid")
        .map(|r| r.expect("no transport error"))
        .collect()
        .await;

    assert_eq!(results.len(), 3);

    assert_eq!(results[0].sequence, 1);
    assert_eq!(results[0].event_type.as_deref(), Some("live"));
    assert_eq!(results[0].parsed_keys(), ["sessionInfo", "lap"]);
    let matched = results[0].matched_fields().expect("parsed");
    assert_eq!(matched["sessionInfo"], "{\n  \"meeting\": \"Monza\"\n}");

    assert_eq!(results[1].sequence, 2);
    assert!(results[1].parse_failed());
    assert_eq!(results[1].raw_preview(), Some("{not json"));

    assert_eq!(results[2].sequence, 3);
    assert_eq!(results[2].event_type, None);
    let matched = results[2].matched_fields().expect("parsed");
    assert_eq!(matched["positionData"], "[]");
}

#[tokio::test]
async fn inspect_stops_at_limit() {
    let body = "data: {\"n\": 1}\n\n".repeat(20);
    let sse = hyper::Body::from(body).into_sse();

    let mut results = sse.into_inspection(Config::new(4)).expect("valid");

    for expected in 1..=4 {
        let result = results.next().await.expect("result").expect("ok");
        assert_eq!(result.sequence, expected);
    }

    assert!(results.next().await.is_none());
    assert!(futures_util::stream::FusedStream::is_terminated(&results));
}

#[tokio::test]
async fn transport_error_ends_inspection() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"data: {}\n\n")),
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionAborted,
            "connection dropped",
        )),
        Ok(Bytes::from_static(b"data: {}\n\n")),
    ];

    let mut results = inspect(stream::iter(chunks).into_sse(), 5, ["a"]).expect("valid");

    let first = results.next().await.expect("result").expect("ok");
    assert!(matches!(first.payload, Payload::Parsed { .. }));

    let err = results.next().await.expect("error").expect_err("transport");
    assert_eq!(
        err.kind(),
        &ErrorKind::Inner("connection dropped".to_string())
    );

    assert!(results.next().await.is_none());
}

#[tokio::test]
async fn invalid_max_events() {
    let sse = hyper::Body::from("data: {}\n\n").into_sse();
    let err = inspect(sse, 0, ["a"]).err().expect("rejects 0");
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument(_)));
}

#[tokio::test]
async fn frames_without_data_are_not_inspected() {
    let sse = hyper::Body::from(
        ": keep-alive\nid: 5\n\nretry: 1000\nid: 6\n\nevent: ping\n\ndata: {\"a\": 1}\n\n",
    )
    .into_sse();

    let results: Vec<_> = inspect(sse, 5, ["a"])
        .expect("valid")
        .map(|r| r.expect("no transport error"))
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].sequence, 1);
    assert_eq!(results[0].event_type, None);
    assert!(!results[0].parse_failed());
    assert_eq!(results[0].parsed_keys(), ["a"]);
}

#[tokio::test]
async fn empty_data_field_is_still_inspected() {
    let sse = hyper::Body::from("data:\n\n").into_sse();

    let results: Vec<_> = inspect(sse, 5, ["a"])
        .expect("valid")
        .map(|r| r.expect("no transport error"))
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].parse_failed());
    assert_eq!(results[0].raw_preview(), Some(""));
}
