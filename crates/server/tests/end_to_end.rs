use plover_client::Client;
use plover_http::{Error, HttpError, Request, Response, Uri};
use plover_router::Router;
use plover_server::{RequestHandler, Server, ServerConfig};
use plover_testing::block_on;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

fn start(handler: impl RequestHandler) -> (Arc<Server>, thread::JoinHandle<()>) {
    let config = ServerConfig::new()
        .with_host("127.0.0.1")
        .with_port(0)
        .with_thread_pool_size(2);
    let server = Arc::new(Server::bind(config, handler).unwrap());
    let runner = {
        let server = Arc::clone(&server);
        thread::spawn(move || server.run())
    };
    (server, runner)
}

fn get(port: u16, target: &str) -> Response {
    block_on(plover_client::request(
        Request::new("GET", target),
        "127.0.0.1",
        Some(port),
        Some(Duration::from_secs(10)),
    ))
    .unwrap()
}

fn hello(_request: Request) -> Result<Response, HttpError> {
    let mut response = Response::new(200);
    response.set_body("Hello world", "text/plain");
    Ok(response)
}

#[test]
fn simple_get() {
    let (server, runner) = start(hello);
    let mut response = get(server.local_addr().port(), "/");

    assert_eq!(response.status(), 200);
    assert_eq!(response.status_text(), "OK");
    assert_eq!(response.body_string(), "Hello world");
    assert_eq!(
        response.headers().get_str("Content-Type"),
        Some("text/plain")
    );

    server.stop();
    runner.join().unwrap();
}

fn no_content(_request: Request) -> Result<Response, HttpError> {
    Ok(Response::new(204))
}

#[test]
fn response_without_a_body() {
    let (server, runner) = start(no_content);
    let mut response = get(server.local_addr().port(), "/");

    assert_eq!(response.status(), 204);
    assert_eq!(response.status_text(), "No Content");
    assert_eq!(response.body_string(), "");
    assert!(!response.headers().has_header("Content-Length"));

    server.stop();
    runner.join().unwrap();
}

#[test]
fn router_dispatch_over_the_wire() {
    let router = Router::new()
        .get("/foo", |_request, _captures| {
            let mut response = Response::new(200);
            response.set_body("foo", "text/plain");
            Ok(response)
        })
        .post("/foo", |_request, _captures| Ok(Response::new(204)));

    let (server, runner) = start(router);
    let port = server.local_addr().port();

    let mut response = get(port, "/foo");
    assert_eq!(response.status(), 200);
    assert_eq!(response.body_string(), "foo");

    let response = block_on(plover_client::request(
        Request::new("POST", "/foo"),
        "127.0.0.1",
        Some(port),
        None,
    ))
    .unwrap();
    assert_eq!(response.status(), 204);

    let mut response = block_on(plover_client::request(
        Request::new("FOOBAR", "/foo"),
        "127.0.0.1",
        Some(port),
        None,
    ))
    .unwrap();
    assert_eq!(response.status(), 405);
    assert!(response.body_string().contains("Method: FOOBAR\nPath: /foo"));

    let mut response = get(port, "/bar");
    assert_eq!(response.status(), 404);
    assert!(response.body_string().contains("Method: GET\nPath: /bar"));

    server.stop();
    runner.join().unwrap();
}

fn counting(_request: Request) -> Result<Response, HttpError> {
    let mut n = 0;
    let mut response = Response::new(200);
    response.set_chunked_body(
        move || {
            n += 1;
            (n <= 10).then(|| format!("{n}\n").into_bytes())
        },
        "text/plain",
    );
    Ok(response)
}

#[test]
fn streamed_body_is_collected_by_the_client() {
    let (server, runner) = start(counting);
    let mut response = get(server.local_addr().port(), "/");

    assert_eq!(response.status(), 200);
    assert!(!response.headers().has_header("Content-Length"));
    assert_eq!(response.body_string(), "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n");

    server.stop();
    runner.join().unwrap();
}

struct Recorder(Arc<Mutex<Option<(String, String)>>>);

impl RequestHandler for Recorder {
    fn handle(&self, request: Request) -> Result<Response, HttpError> {
        let host = request.headers().get_str("Host").unwrap_or("").to_string();
        *self.0.lock().unwrap() = Some((request.target().to_string(), host));
        Ok(Response::new(204))
    }
}

#[test]
fn request_built_from_a_uri_carries_target_and_host() {
    let seen = Arc::new(Mutex::new(None));
    let (server, runner) = start(Recorder(Arc::clone(&seen)));

    let uri = Uri::parse("http://example.org:1337/foo/bar").unwrap();
    let response = block_on(plover_client::request(
        Request::from_uri("GET", &uri),
        "127.0.0.1",
        Some(server.local_addr().port()),
        None,
    ))
    .unwrap();
    assert_eq!(response.status(), 204);

    let (target, host) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(target, "/foo/bar");
    assert_eq!(host, "example.org:1337");

    server.stop();
    runner.join().unwrap();
}

struct Blocking(Arc<AtomicBool>);

impl RequestHandler for Blocking {
    fn handle(&self, _request: Request) -> Result<Response, HttpError> {
        while !self.0.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(20));
        }
        Ok(Response::new(204))
    }
}

#[test]
fn endless_handler_times_out_client_side() {
    let release = Arc::new(AtomicBool::new(false));
    let (server, runner) = start(Blocking(Arc::clone(&release)));
    let port = server.local_addr().port();

    let client = Client::new().with_timeout(Duration::from_secs(1));
    let started = Instant::now();
    let result = block_on(client.do_request(Request::new("GET", "/"), "127.0.0.1", Some(port)));
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(Error::Timeout)), "{result:?}");
    assert!(elapsed >= Duration::from_secs(1), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");

    // the server is still healthy once the handler unblocks
    release.store(true, Ordering::Relaxed);
    let response = get(port, "/");
    assert_eq!(response.status(), 204);

    server.stop();
    runner.join().unwrap();
}
