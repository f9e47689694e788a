use plover_client::Client;
use plover_http::{Error, HttpError, Request, Response};
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

fn echo_target(request: Request) -> Result<Response, HttpError> {
    let mut response = Response::new(200);
    response.set_body(request.target(), "text/plain");
    Ok(response)
}

#[test]
fn sequential_requests_reuse_one_client() {
    let (server, runner) = start(echo_target);
    let port = server.local_addr().port();
    let client = Client::new();

    block_on(async {
        let mut response = client
            .do_request(Request::new("GET", "/"), "127.0.0.1", Some(port))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.status_text(), "OK");
        assert_eq!(response.body_string(), "/");

        let mut response = client
            .do_request(Request::new("GET", "/foobar"), "127.0.0.1", Some(port))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.body_string(), "/foobar");
    });

    server.stop();
    runner.join().unwrap();
}

struct SlowUntil(Arc<AtomicBool>);

impl RequestHandler for SlowUntil {
    fn handle(&self, request: Request) -> Result<Response, HttpError> {
        if request.target() == "/slow" {
            while !self.0.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(20));
            }
        }
        let mut response = Response::new(200);
        response.set_body(request.target(), "text/plain");
        Ok(response)
    }
}

#[test]
fn a_client_survives_a_timed_out_transaction() {
    let release = Arc::new(AtomicBool::new(false));
    let (server, runner) = start(SlowUntil(Arc::clone(&release)));
    let port = server.local_addr().port();

    let mut client = Client::new();
    client.set_timeout(Duration::from_millis(500));

    let result = block_on(client.do_request(Request::new("GET", "/slow"), "127.0.0.1", Some(port)));
    assert!(matches!(result, Err(Error::Timeout)), "{result:?}");

    release.store(true, Ordering::Relaxed);

    // the timer, socket, and abort signal were all reset
    let mut response = block_on(client.do_request(
        Request::new("GET", "/after"),
        "127.0.0.1",
        Some(port),
    ))
    .unwrap();
    assert_eq!(response.body_string(), "/after");

    server.stop();
    runner.join().unwrap();
}

#[test]
fn abort_interrupts_an_in_flight_request() {
    let release = Arc::new(AtomicBool::new(false));
    let (server, runner) = start(SlowUntil(Arc::clone(&release)));
    let port = server.local_addr().port();

    let client = Arc::new(Client::new());
    let aborter = {
        let client = Arc::clone(&client);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            client.abort();
        })
    };

    let started = Instant::now();
    let result = block_on(client.do_request(Request::new("GET", "/slow"), "127.0.0.1", Some(port)));
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(Error::Aborted)), "{result:?}");
    assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
    aborter.join().unwrap();

    // an aborted client is reusable, like a timed-out one
    release.store(true, Ordering::Relaxed);
    let mut response = block_on(client.do_request(
        Request::new("GET", "/next"),
        "127.0.0.1",
        Some(port),
    ))
    .unwrap();
    assert_eq!(response.body_string(), "/next");

    server.stop();
    runner.join().unwrap();
}

#[test]
fn progress_reports_reads_and_final_eof() {
    let (server, runner) = start(|_request: Request| -> Result<Response, HttpError> {
        // no content-length, so the body is delimited by close and the
        // client observes a final zero-length read
        let mut sent = false;
        let mut response = Response::new(200);
        response.set_chunked_body(
            move || {
                (!sent).then(|| {
                    sent = true;
                    b"stream".to_vec()
                })
            },
            "text/plain",
        );
        Ok(response)
    });
    let port = server.local_addr().port();

    let reads = Arc::new(Mutex::new(Vec::new()));
    let mut client = Client::new();
    {
        let reads = Arc::clone(&reads);
        client.set_progress_fn(move |bytes| reads.lock().unwrap().push(bytes));
    }

    let mut response =
        block_on(client.do_request(Request::new("GET", "/"), "127.0.0.1", Some(port))).unwrap();
    assert_eq!(response.body_string(), "stream");

    let reads = reads.lock().unwrap();
    assert!(!reads.is_empty());
    assert_eq!(*reads.last().unwrap(), 0);
    assert!(reads.iter().sum::<usize>() > 0);

    server.stop();
    runner.join().unwrap();
}

#[test]
fn https_requires_a_tls_connector() {
    let request = {
        let uri = plover_http::Uri::parse("https://localhost/secure").unwrap();
        Request::from_uri("GET", &uri)
    };
    let result = block_on(plover_client::request(request, "localhost", Some(1), None));
    assert!(matches!(result, Err(Error::Io(_))), "{result:?}");
}
