use std::sync::Arc;

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderValue, StatusCode};
use replay_middleware::{Body, HandlerBuilder, RecordingResponseWriter};
use replay_retry::{RetryReplayConfig, RetryReplayMiddleware};

use crate::helpers::{request, BrokenHandler, FailingReader, ScriptedHandler};

#[tokio::test]
async fn replays_until_the_response_is_not_retryable() {
    let (handler, recorder) = ScriptedHandler::new(&[500, 500, 200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(
            request(Some("codes=\"[500 599]\", attempts=2"), "payload".into()),
            &mut rw,
        )
        .await
        .unwrap();

    assert_eq!(recorder.calls(), 3);
    assert_eq!(recorder.bodies(), vec![Bytes::from_static(b"payload"); 3]);

    assert_eq!(rw.status(), Some(StatusCode::OK));
    assert_eq!(rw.headers()["retry-attempt"], "2");
    assert_eq!(rw.body(), b"2:payload");
}

#[tokio::test]
async fn last_response_is_forwarded_when_attempts_run_out() {
    let (handler, recorder) = ScriptedHandler::new(&[503]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(
            request(Some("codes=\"[500 599]\", attempts=3"), "payload".into()),
            &mut rw,
        )
        .await
        .unwrap();

    assert_eq!(recorder.calls(), 4);
    assert_eq!(rw.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(rw.headers()["retry-attempt"], "3");
    assert_eq!(rw.body(), b"3:payload");
}

#[tokio::test]
async fn only_the_forwarded_attempt_sets_headers() {
    let (handler, _recorder) = ScriptedHandler::new(&[502, 200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(
            request(Some("codes=\"502\", attempts=1"), Body::empty()),
            &mut rw,
        )
        .await
        .unwrap();

    let calls: Vec<_> = rw.headers().get_all("x-call").iter().collect();
    assert_eq!(calls, ["1"]);
    assert_eq!(rw.body(), b"1:");
}

#[tokio::test]
async fn first_attempt_success_has_no_attempt_header() {
    let (handler, recorder) = ScriptedHandler::new(&[200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(
            request(Some("codes=\"[500 599]\", attempts=3"), "payload".into()),
            &mut rw,
        )
        .await
        .unwrap();

    assert_eq!(recorder.calls(), 1);
    assert_eq!(rw.status(), Some(StatusCode::OK));
    assert!(rw.headers().get("retry-attempt").is_none());
}

#[tokio::test]
async fn statuses_outside_the_codes_are_not_retried() {
    let (handler, recorder) = ScriptedHandler::new(&[404, 200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(
            request(Some("codes=\"[500 599] 429\", attempts=3"), Body::empty()),
            &mut rw,
        )
        .await
        .unwrap();

    assert_eq!(recorder.calls(), 1);
    assert_eq!(rw.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn requests_without_policy_run_once() {
    let (handler, recorder) = ScriptedHandler::new(&[500, 200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(request(None, "payload".into()), &mut rw)
        .await
        .unwrap();

    assert_eq!(recorder.calls(), 1);
    assert_eq!(rw.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(rw.body(), b"0:payload");
}

#[tokio::test]
async fn malformed_policy_runs_once() {
    let (handler, recorder) = ScriptedHandler::new(&[500, 200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(
            request(Some("codes=\"[500 599\", attempts=3"), "payload".into()),
            &mut rw,
        )
        .await
        .unwrap();

    assert_eq!(recorder.calls(), 1);
    assert_eq!(rw.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    // The handler's own response, not a synthetic error.
    assert_eq!(rw.body(), b"0:payload");
}

#[tokio::test]
async fn chunked_requests_are_not_buffered() {
    let (handler, recorder) = ScriptedHandler::new(&[502, 200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut req = request(
        Some("codes=\"502\", attempts=3"),
        Body::from_reader(FailingReader),
    );
    req.headers_mut()
        .insert("transfer-encoding", HeaderValue::from_static("chunked"));

    let mut rw = RecordingResponseWriter::new();
    handler.serve(req, &mut rw).await.unwrap();

    assert_eq!(recorder.calls(), 1);
    assert_eq!(rw.status(), Some(StatusCode::BAD_GATEWAY));
}

#[tokio::test]
async fn websocket_upgrades_pass_through() {
    let (handler, recorder) = ScriptedHandler::new(&[502, 200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut req = request(Some("codes=\"502\", attempts=3"), Body::empty());
    req.headers_mut()
        .insert("connection", HeaderValue::from_static("keep-alive, Upgrade"));
    req.headers_mut()
        .insert("upgrade", HeaderValue::from_static("websocket"));

    let mut rw = RecordingResponseWriter::new();
    handler.serve(req, &mut rw).await.unwrap();

    assert_eq!(recorder.calls(), 1);
    assert_eq!(rw.status(), Some(StatusCode::BAD_GATEWAY));
}

#[tokio::test]
async fn unreadable_body_is_an_internal_server_error() {
    let (handler, recorder) = ScriptedHandler::new(&[200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(
            request(
                Some("codes=\"502\", attempts=3"),
                Body::from_reader(FailingReader),
            ),
            &mut rw,
        )
        .await
        .unwrap();

    assert_eq!(recorder.calls(), 0);
    assert_eq!(rw.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(
        rw.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(rw.body(), b"Internal Server Error\n");
}

#[tokio::test]
async fn handler_errors_are_not_retried() {
    let handler = HandlerBuilder::new(BrokenHandler)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    let result = handler
        .serve(
            request(Some("codes=\"[500 599]\", attempts=3"), Body::empty()),
            &mut rw,
        )
        .await;

    assert!(result.is_err());
    assert_eq!(rw.status(), None);
}

#[tokio::test]
async fn header_names_are_configurable() {
    let (handler, recorder) = ScriptedHandler::new(&[500, 200]);
    let config = RetryReplayConfig::default()
        .with_policy_header(HeaderName::from_static("x-retry"))
        .with_attempt_header(HeaderName::from_static("x-attempt"));
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new_with_config(config))
        .build();

    let mut req = request(None, Body::empty());
    req.headers_mut()
        .insert("x-retry", HeaderValue::from_static("codes=\"500\", attempts=1"));

    let mut rw = RecordingResponseWriter::new();
    handler.serve(req, &mut rw).await.unwrap();

    assert_eq!(recorder.calls(), 2);
    assert_eq!(rw.headers()["x-attempt"], "1");
    assert!(rw.headers().get("retry-attempt").is_none());
}

#[tokio::test]
async fn concurrent_requests_share_the_middleware() {
    let (handler, recorder) = ScriptedHandler::new(&[200]);
    let handler = HandlerBuilder::new(handler)
        .with(RetryReplayMiddleware::new_with_config(
            RetryReplayConfig::default().with_pool_size(1),
        ))
        .build();

    let policy = Some("codes=\"500\", attempts=1");
    let mut first = RecordingResponseWriter::new();
    let mut second = RecordingResponseWriter::new();
    let (a, b) = futures::join!(
        handler.serve(request(policy, "first".into()), &mut first),
        handler.serve(request(policy, "second".into()), &mut second),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(recorder.calls(), 2);
    let mut bodies = recorder.bodies();
    bodies.sort();
    assert_eq!(bodies, [Bytes::from_static(b"first"), Bytes::from_static(b"second")]);
}

#[tokio::test]
async fn body_buffers_return_to_the_pool_on_every_path() {
    let middleware = Arc::new(RetryReplayMiddleware::new_with_config(
        RetryReplayConfig::default().with_pool_size(1),
    ));
    assert_eq!(middleware.pool().available(), 0);

    let (scripted, _recorder) = ScriptedHandler::new(&[500, 200]);
    let handler = HandlerBuilder::new(scripted)
        .with_arc(middleware.clone())
        .build();
    let broken = HandlerBuilder::new(BrokenHandler)
        .with_arc(middleware.clone())
        .build();
    let policy = Some("codes=\"500\", attempts=1");

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(request(policy, Body::from_reader(FailingReader)), &mut rw)
        .await
        .unwrap();
    assert_eq!(rw.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(middleware.pool().available(), 1);

    let mut rw = RecordingResponseWriter::new();
    assert!(broken
        .serve(request(policy, "payload".into()), &mut rw)
        .await
        .is_err());
    assert_eq!(middleware.pool().available(), 1);

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(request(policy, "payload".into()), &mut rw)
        .await
        .unwrap();
    assert_eq!(rw.status(), Some(StatusCode::OK));
    assert_eq!(middleware.pool().available(), 1);
}
