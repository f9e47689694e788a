use plover_http::{HttpError, Request, Response};
use plover_router::Router;
use plover_server::{Server, ServerConfig};

fn hello(_request: Request, _captures: Vec<String>) -> Result<Response, HttpError> {
    let mut response = Response::new(200);
    response.set_body("Hello world\n", "text/plain");
    Ok(response)
}

fn greet(_request: Request, captures: Vec<String>) -> Result<Response, HttpError> {
    let mut response = Response::new(200);
    response.set_body(format!("Hello, {}!\n", captures[0]), "text/plain");
    Ok(response)
}

pub fn main() {
    env_logger::init();

    let router = Router::new()
        .get("/", hello)
        .get("/greet/([a-zA-Z]+)", greet);

    let config = ServerConfig::new().with_host("127.0.0.1").with_port(8080);
    let server = Server::bind(config, router).unwrap();
    println!("listening on http://{}", server.local_addr());
    server.run();
}
