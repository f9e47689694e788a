use plover_client::Client;
use plover_http::{Request, Uri};
use plover_rustls::RustlsConnector;
use std::time::Duration;

pub fn main() {
    env_logger::init();

    let argument = std::env::args().nth(1).expect("usage: fetch <uri>");
    let uri = Uri::parse(&argument).expect("the argument must be a uri");
    let port = uri.port.parse().ok();

    let client =
        Client::with_connector(RustlsConnector::default()).with_timeout(Duration::from_secs(30));

    plover_testing::block_on(async {
        let request = Request::from_uri("GET", &uri);
        match client.do_request(request, &uri.host, port).await {
            Ok(mut response) => {
                eprintln!("{} {}", response.status(), response.status_text());
                print!("{}", response.body_string());
            }
            Err(error) => {
                eprintln!("fetch failed: {error}");
                std::process::exit(1);
            }
        }
    });
}
