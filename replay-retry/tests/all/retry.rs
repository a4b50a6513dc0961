use paste::paste;
use replay_middleware::{HandlerBuilder, RecordingResponseWriter, UpstreamHandler};
use replay_retry::RetryReplayMiddleware;
use reqwest::{Client, StatusCode, Url};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use wiremock::{
    matchers::{body_string, header_exists, method, path},
    Mock, MockServer, Respond, ResponseTemplate,
};

use crate::helpers::request;

const POLICY: &str = "codes=\"[500 599] 408 429\", attempts=3";

pub struct RetryResponder(Arc<AtomicU32>, u32, u16);

impl RetryResponder {
    fn new(retries: u32, status_code: u16) -> Self {
        Self(Arc::new(AtomicU32::new(0)), retries, status_code)
    }
}

impl Respond for RetryResponder {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        let mut retries = self.0.load(Ordering::SeqCst);
        retries += 1;
        self.0.store(retries, Ordering::SeqCst);

        if retries + 1 >= self.1 {
            ResponseTemplate::new(200)
        } else {
            ResponseTemplate::new(self.2)
        }
    }
}

macro_rules! assert_retry_succeeds_inner {
    ($x:tt, $name:ident, $status:expr, $exact:tt, $responder:expr) => {
        #[tokio::test]
        async fn $name() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/foo"))
                .and(body_string("payload"))
                .respond_with($responder)
                .expect($exact)
                .mount(&server)
                .await;

            let upstream = UpstreamHandler::new(
                Client::builder().build().unwrap(),
                Url::parse(&server.uri()).unwrap(),
            );
            let handler = HandlerBuilder::new(upstream)
                .with(RetryReplayMiddleware::new())
                .build();

            let mut rw = RecordingResponseWriter::new();
            handler
                .serve(request(Some(POLICY), "payload".into()), &mut rw)
                .await
                .expect("call failed");

            assert_eq!(rw.into_response().status(), $status);
        }
    };
}

macro_rules! assert_retry_succeeds {
    ($x:tt, $status:expr) => {
        paste! {
            assert_retry_succeeds_inner!($x, [<assert_retry_succeds_on_ $x>], $status, 2, RetryResponder::new(3 as u32, $x));
        }
    };
}

macro_rules! assert_no_retry {
    ($x:tt, $status:expr) => {
        paste! {
            assert_retry_succeeds_inner!($x, [<assert_no_retry_on_ $x>], $status, 1, ResponseTemplate::new($x));
        }
    };
}

// 2xx.
assert_no_retry!(200, StatusCode::OK);
assert_no_retry!(201, StatusCode::CREATED);
assert_no_retry!(202, StatusCode::ACCEPTED);
assert_no_retry!(203, StatusCode::NON_AUTHORITATIVE_INFORMATION);
assert_no_retry!(204, StatusCode::NO_CONTENT);
assert_no_retry!(205, StatusCode::RESET_CONTENT);
assert_no_retry!(206, StatusCode::PARTIAL_CONTENT);
assert_no_retry!(207, StatusCode::MULTI_STATUS);
assert_no_retry!(226, StatusCode::IM_USED);

// 3xx.
assert_no_retry!(300, StatusCode::MULTIPLE_CHOICES);
assert_no_retry!(301, StatusCode::MOVED_PERMANENTLY);
assert_no_retry!(302, StatusCode::FOUND);
assert_no_retry!(303, StatusCode::SEE_OTHER);
assert_no_retry!(304, StatusCode::NOT_MODIFIED);
assert_no_retry!(307, StatusCode::TEMPORARY_REDIRECT);
assert_no_retry!(308, StatusCode::PERMANENT_REDIRECT);

// 5xx.
assert_retry_succeeds!(500, StatusCode::OK);
assert_retry_succeeds!(501, StatusCode::OK);
assert_retry_succeeds!(502, StatusCode::OK);
assert_retry_succeeds!(503, StatusCode::OK);
assert_retry_succeeds!(504, StatusCode::OK);
assert_retry_succeeds!(505, StatusCode::OK);
assert_retry_succeeds!(506, StatusCode::OK);
assert_retry_succeeds!(507, StatusCode::OK);
assert_retry_succeeds!(508, StatusCode::OK);
assert_retry_succeeds!(510, StatusCode::OK);
assert_retry_succeeds!(511, StatusCode::OK);

// 4xx.
assert_no_retry!(400, StatusCode::BAD_REQUEST);
assert_no_retry!(401, StatusCode::UNAUTHORIZED);
assert_no_retry!(402, StatusCode::PAYMENT_REQUIRED);
assert_no_retry!(403, StatusCode::FORBIDDEN);
assert_no_retry!(404, StatusCode::NOT_FOUND);
assert_no_retry!(405, StatusCode::METHOD_NOT_ALLOWED);
assert_no_retry!(406, StatusCode::NOT_ACCEPTABLE);
assert_no_retry!(407, StatusCode::PROXY_AUTHENTICATION_REQUIRED);
assert_retry_succeeds!(408, StatusCode::OK);
assert_no_retry!(409, StatusCode::CONFLICT);
assert_no_retry!(410, StatusCode::GONE);
assert_no_retry!(411, StatusCode::LENGTH_REQUIRED);
assert_no_retry!(412, StatusCode::PRECONDITION_FAILED);
assert_no_retry!(413, StatusCode::PAYLOAD_TOO_LARGE);
assert_no_retry!(414, StatusCode::URI_TOO_LONG);
assert_no_retry!(415, StatusCode::UNSUPPORTED_MEDIA_TYPE);
assert_no_retry!(416, StatusCode::RANGE_NOT_SATISFIABLE);
assert_no_retry!(417, StatusCode::EXPECTATION_FAILED);
assert_no_retry!(418, StatusCode::IM_A_TEAPOT);
assert_no_retry!(421, StatusCode::MISDIRECTED_REQUEST);
assert_no_retry!(422, StatusCode::UNPROCESSABLE_ENTITY);
assert_no_retry!(423, StatusCode::LOCKED);
assert_no_retry!(424, StatusCode::FAILED_DEPENDENCY);
assert_no_retry!(426, StatusCode::UPGRADE_REQUIRED);
assert_no_retry!(428, StatusCode::PRECONDITION_REQUIRED);
assert_retry_succeeds!(429, StatusCode::OK);
assert_no_retry!(431, StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
assert_no_retry!(451, StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS);

// The policy allows 3 replays, which means that we will get 4 calls to the RetryResponder.
assert_retry_succeeds_inner!(
    500,
    assert_attempts_are_not_exceeded,
    StatusCode::INTERNAL_SERVER_ERROR,
    4,
    RetryResponder::new(100_u32, 500)
);

#[tokio::test]
async fn upstream_response_is_streamed_back_with_attempt_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/foo"))
        .and(header_exists("retry-policy"))
        .respond_with(RetryResponder::new(3, 503))
        .expect(2)
        .mount(&server)
        .await;

    let upstream = UpstreamHandler::new(
        Client::builder().build().unwrap(),
        Url::parse(&server.uri()).unwrap(),
    );
    let handler = HandlerBuilder::new(upstream)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(request(Some(POLICY), "payload".into()), &mut rw)
        .await
        .expect("call failed");

    assert_eq!(rw.status(), Some(StatusCode::OK));
    assert_eq!(rw.headers()["retry-attempt"], "1");
}

#[tokio::test]
async fn upstream_body_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/foo"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let upstream = UpstreamHandler::new(
        Client::builder().build().unwrap(),
        Url::parse(&server.uri()).unwrap(),
    );
    let handler = HandlerBuilder::new(upstream)
        .with(RetryReplayMiddleware::new())
        .build();

    let mut rw = RecordingResponseWriter::new();
    handler
        .serve(request(Some(POLICY), "payload".into()), &mut rw)
        .await
        .expect("call failed");

    let response = rw.into_response();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.body().as_ref(), b"created");
}
