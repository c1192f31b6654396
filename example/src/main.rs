mod proto;

use bytes::Bytes;
use http::{header, Request, Response};
use prost::Message;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twirp_srv::{context, ServerHooks, TwirpError, JSON_CONTENT_TYPE, PROTOBUF_CONTENT_TYPE};

use proto::{EchoImpl, EchoServer, PingRequest, PingResponse};

/// Answers `Ping`; `Shout` is left to the generated default.
struct Echo;

impl EchoImpl for Echo {
    fn ping(&self, request: PingRequest) -> Result<PingResponse, TwirpError> {
        if request.message.is_empty() {
            return Err(TwirpError::invalid_argument("message must not be empty")
                .with_meta("argument", "message"));
        }
        Ok(PingResponse {
            length:  request.message.chars().count() as u32,
            message: request.message,
        })
    }
}

fn server() -> EchoServer {
    let hooks = ServerHooks::new()
        .on_request_routed(|ctx| {
            info!(endpoint = ctx.get(context::ENDPOINT).unwrap_or(""), "routed");
        })
        .on_error(|ctx| {
            info!(
                status = ctx.get(context::STATUS_CODE).unwrap_or(""),
                "request failed"
            );
        });
    EchoServer::with_hooks(Echo, hooks)
}

fn post(method: &str, content_type: &str, body: Vec<u8>) -> Result<Request<Vec<u8>>, http::Error> {
    Request::post(format!("/twirp/{}/{}", EchoServer::SERVICE_NAME, method))
        .header(header::CONTENT_TYPE, content_type)
        .body(body)
}

fn show(label: &str, response: &Response<Bytes>) {
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    println!("{:<22} {} {}", label, response.status().as_u16(), content_type);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = server();
    println!("serving {} at {}", server.service_name(), server.prefix());

    // JSON in, JSON out
    let body = serde_json::to_vec(&PingRequest { message: "hello".to_string() })?;
    let response = server.handle(post("Ping", JSON_CONTENT_TYPE, body)?);
    show("Ping (json)", &response);
    let reply: PingResponse = serde_json::from_slice(response.body())?;
    println!("  -> {:?} ({} chars)", reply.message, reply.length);

    // Protobuf in, protobuf out
    let body = PingRequest { message: "héllo".to_string() }.encode_to_vec();
    let response = server.handle(post("Ping", PROTOBUF_CONTENT_TYPE, body)?);
    show("Ping (protobuf)", &response);
    let reply = PingResponse::decode(&response.body()[..])?;
    println!("  -> {:?} ({} chars)", reply.message, reply.length);

    // Errors come back as JSON whatever the request codec was
    let body = PingRequest::default().encode_to_vec();
    let response = server.handle(post("Ping", PROTOBUF_CONTENT_TYPE, body)?);
    show("Ping (empty)", &response);
    println!("  -> {}", String::from_utf8_lossy(response.body()));

    let body = serde_json::to_vec(&PingRequest { message: "hey".to_string() })?;
    let response = server.handle(post("Shout", JSON_CONTENT_TYPE, body)?);
    show("Shout", &response);
    println!("  -> {}", String::from_utf8_lossy(response.body()));

    let response = server.handle(Request::get(server.prefix()).body(Vec::new())?);
    show("GET", &response);
    println!("  -> {}", String::from_utf8_lossy(response.body()));

    Ok(())
}
