mod common;

use std::sync::{Arc, Mutex};

use http::{header, Request, StatusCode};
use prost::Message;
use twirp_srv::{Codec, Empty, Endpoint, ErrorBodyCode, HookStage, ServerHooks, TwirpError, TwirpServer};

use common::*;

const MAKE_HAT: &str = "/twirp/twitch.twirp.example.Haberdasher/MakeHat";

#[test]
fn json_request_round_trip() {
    let server = haberdasher(ServerHooks::default());
    let response = server.handle(post(MAKE_HAT, "application/json", r#"{"inches": 12}"#));

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let hat: Hat = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(hat.inches, 12);
    assert_eq!(hat.color, "purple");
    assert_eq!(hat.name, "bowler");
}

#[test]
fn json_content_type_with_parameters() {
    let server = haberdasher(ServerHooks::default());
    let response = server.handle(post(
        MAKE_HAT,
        "application/json; charset=utf-8",
        r#"{"inches": 3}"#,
    ));
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn protobuf_request_round_trip() {
    let server = haberdasher(ServerHooks::default());
    let body = Size { inches: 7 }.encode_to_vec();
    let response = server.handle(post(MAKE_HAT, "application/protobuf", body));

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/protobuf");

    let hat = Hat::decode(response.body().as_ref()).unwrap();
    assert_eq!(hat.inches, 7);
    assert_eq!(hat.color, "purple");
}

#[test]
fn codecs_round_trip_messages() {
    let hat = Hat {
        inches: 9,
        color:  "green".to_string(),
        name:   "fedora".to_string(),
    };

    let json = Codec::Json.encode(&hat).unwrap();
    let from_json: Hat = Codec::Json.decode(&json).unwrap();
    assert_eq!(from_json, hat);

    let binary = Codec::Protobuf.encode(&hat).unwrap();
    let from_binary: Hat = Codec::Protobuf.decode(&binary).unwrap();
    assert_eq!(from_binary, hat);
    assert_eq!(from_binary, from_json);

    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["color"], "green");
}

#[test]
fn codec_negotiation() {
    assert_eq!(Codec::from_content_type("application/json"), Some(Codec::Json));
    assert_eq!(Codec::from_content_type("application/json; charset=utf-8"), Some(Codec::Json));
    assert_eq!(Codec::from_content_type("application/protobuf"), Some(Codec::Protobuf));
    assert_eq!(Codec::from_content_type("application/x-protobuf"), Some(Codec::Protobuf));
    assert_eq!(Codec::from_content_type("text/xml"), None);
    assert_eq!(Codec::from_content_type(""), None);
}

#[test]
fn unknown_method_is_unimplemented() {
    let server = haberdasher(ServerHooks::default());
    let path = "/twirp/twitch.twirp.example.Haberdasher/Unknown";
    let response = server.handle(post(path, "application/json", "{}"));

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let body = error_body(&response);
    assert_eq!(body.kind, "Unimplemented");
    assert_eq!(body.code, Some(ErrorBodyCode::Code("unimplemented".to_string())));
    assert_eq!(body.msg, "service has no endpoint Unknown");
    assert_eq!(body.meta["twirp_invalid_route"], format!("POST {}", path));
}

#[test]
fn get_is_a_bad_route() {
    let server = haberdasher(ServerHooks::default());
    let request = Request::get(MAKE_HAT)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Vec::new())
        .unwrap();
    let response = server.handle(request);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = error_body(&response);
    assert_eq!(body.kind, "BadRoute");
    assert_eq!(body.code, Some(ErrorBodyCode::Code("bad_route".to_string())));
    assert_eq!(body.msg, "unsupported method GET (only POST is allowed)");
    assert_eq!(body.meta["twirp_invalid_route"], format!("GET {}", MAKE_HAT));
}

#[test]
fn unsupported_content_type_is_a_bad_route() {
    let server = haberdasher(ServerHooks::default());
    let response = server.handle(post(MAKE_HAT, "text/xml", "<size/>"));

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = error_body(&response);
    assert_eq!(body.kind, "BadRoute");
    assert_eq!(body.msg, "unexpected Content-Type: text/xml");
}

#[test]
fn foreign_or_empty_paths_are_bad_routes() {
    let server = haberdasher(ServerHooks::default());

    for path in [
        "/twirp/twitch.twirp.example.Other/MakeHat",
        "/twirp/twitch.twirp.example.Haberdasher/",
        "/twirp/twitch.twirp.example.Haberdasher",
        "/MakeHat",
    ] {
        let response = server.handle(post(path, "application/json", "{}"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
        let body = error_body(&response);
        assert_eq!(body.kind, "BadRoute", "{}", path);
        assert_eq!(body.msg, format!("no handler for path {}", path));
    }
}

#[test]
fn implementation_errors_keep_their_kind() {
    let server = haberdasher(ServerHooks::default());
    let response = server.handle(post(MAKE_HAT, "application/json", r#"{"inches": -1}"#));

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(&response);
    assert_eq!(body.kind, "InvalidArgument");
    assert_eq!(body.code, Some(ErrorBodyCode::Code("invalid_argument".to_string())));
    assert_eq!(body.msg, "I can't make a hat that small!");
    assert_eq!(body.meta["argument"], "inches");
}

#[test]
fn error_meta_carries_request_context() {
    let server = haberdasher(ServerHooks::default());
    let response = server.handle(post(MAKE_HAT, "application/json", r#"{"inches": 0}"#));
    let body = error_body(&response);

    assert_eq!(body.meta["package_name"], "twitch.twirp.example");
    assert_eq!(body.meta["service_name"], "twitch.twirp.example.Haberdasher");
    assert_eq!(body.meta["http_method"], "POST");
    assert_eq!(body.meta["url"], MAKE_HAT);
    assert_eq!(body.meta["content-type"], "application/json");
    assert_eq!(body.meta["endpoint"], "MakeHat");
}

#[test]
fn undecodable_body_is_internal() {
    let server = haberdasher(ServerHooks::default());

    let response = server.handle(post(MAKE_HAT, "application/json", "{not json"));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_body(&response);
    assert_eq!(body.kind, "Internal");
    assert_eq!(body.code, Some(ErrorBodyCode::Status(500)));
    assert_eq!(body.msg, "Internal non-Twirp Error");
    assert!(body.meta["raw_error"].contains("JSON"));

    let response = server.handle(post(MAKE_HAT, "application/protobuf", vec![0xff, 0xff, 0xff]));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(&response).msg, "Internal non-Twirp Error");
}

#[test]
fn panicking_implementation_is_internal() {
    let server = haberdasher(ServerHooks::default());
    let response = server.handle(post(MAKE_HAT, "application/json", r#"{"inches": 13}"#));

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_body(&response);
    assert_eq!(body.kind, "Internal");
    assert_eq!(body.meta["raw_error"], "unlucky size");
}

#[test]
fn wrong_output_type_is_internal() {
    let server = haberdasher(ServerHooks::default());
    let path = "/twirp/twitch.twirp.example.Haberdasher/MakeWrongThing";

    for (content_type, body) in [
        ("application/json", br#"{"inches": 5}"#.to_vec()),
        ("application/protobuf", Size { inches: 5 }.encode_to_vec()),
    ] {
        let response = server.handle(post(path, content_type, body));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = error_body(&response);
        assert_eq!(body.kind, "Internal");
        assert_eq!(body.code, Some(ErrorBodyCode::Code("internal".to_string())));
        assert_eq!(
            body.msg,
            "bad service response type twitch.twirp.example.Size, expecting: twitch.twirp.example.Hat"
        );
    }
}

fn recording_hooks(log: &Arc<Mutex<Vec<String>>>) -> ServerHooks {
    let mut hooks = ServerHooks::new();
    for stage in [
        HookStage::RequestReceived,
        HookStage::RequestRouted,
        HookStage::ResponsePrepared,
        HookStage::ResponseSent,
        HookStage::ErrorOccurred,
    ] {
        let log = Arc::clone(log);
        hooks.add(stage, move |ctx| {
            let status = ctx.get("status_code").unwrap_or("-").to_string();
            log.lock().unwrap().push(format!("{}:{}", stage.as_str(), status));
        });
    }
    hooks
}

#[test]
fn hooks_fire_in_order_on_success() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let server = haberdasher(recording_hooks(&log));
    server.handle(post(MAKE_HAT, "application/json", r#"{"inches": 12}"#));

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "request-received:-",
            "request-routed:-",
            "response-prepared:-",
            "response-sent:200",
        ]
    );
}

#[test]
fn hooks_fire_on_error() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let server = haberdasher(recording_hooks(&log));
    server.handle(post(MAKE_HAT, "application/json", r#"{"inches": -4}"#));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["request-received:-", "request-routed:-", "error-occurred:400"]
    );

    log.lock().unwrap().clear();
    let path = "/twirp/twitch.twirp.example.Haberdasher/Nope";
    server.handle(post(path, "application/json", "{}"));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["request-received:-", "error-occurred:501"]
    );
}

#[test]
fn error_hook_sees_exception() {
    let seen = Arc::new(Mutex::new(None));
    let hooks = {
        let seen = Arc::clone(&seen);
        ServerHooks::new().on_error(move |ctx| {
            *seen.lock().unwrap() = ctx.get("exception").map(str::to_string);
        })
    };
    let server = haberdasher(hooks);
    server.handle(post(MAKE_HAT, "text/plain", "12"));

    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some("twirp error bad_route: unexpected Content-Type: text/plain")
    );
}

#[test]
fn panicking_hook_does_not_abort_request() {
    let hooks = ServerHooks::new()
        .on_request_routed(|_| panic!("hook bug"))
        .on_response_sent(|_| {});
    assert_eq!(hooks.count(HookStage::RequestRouted), 1);

    let server = haberdasher(hooks);
    let response = server.handle(post(MAKE_HAT, "application/json", r#"{"inches": 12}"#));
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn server_metadata() {
    let server = haberdasher(ServerHooks::default());
    assert_eq!(server.prefix(), "/twirp/twitch.twirp.example.Haberdasher/");
    assert_eq!(server.package_name(), PACKAGE);
    assert_eq!(server.service_name(), SERVICE);
    assert_eq!(server.methods(), vec!["MakeHat", "MakeWrongThing"]);

    let endpoint = server.endpoint("MakeHat").unwrap();
    assert_eq!(endpoint.input_type(), "twitch.twirp.example.Size");
    assert_eq!(endpoint.output_type(), "twitch.twirp.example.Hat");
    assert!(server.endpoint("makehat").is_none());
}

#[test]
fn concurrent_requests_share_one_server() {
    let server = haberdasher(ServerHooks::default());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=8)
            .map(|inches| {
                let server = &server;
                scope.spawn(move || {
                    let body = format!(r#"{{"inches": {}}}"#, inches);
                    let response = server.handle(post(MAKE_HAT, "application/json", body));
                    let hat: Hat = serde_json::from_slice(response.body()).unwrap();
                    hat.inches
                })
            })
            .collect();

        let sizes: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(sizes, (1..=8).collect::<Vec<_>>());
    });
}

#[test]
fn empty_messages_on_both_codecs() {
    let endpoints = vec![Endpoint::new(
        "Ping",
        "google.protobuf.Empty",
        "google.protobuf.Empty",
        |_: Empty| -> Result<Empty, TwirpError> { Ok(Empty {}) },
    )];
    let server = TwirpServer::new("example", "example.Pinger", endpoints, ServerHooks::default());

    let response = server.handle(post("/twirp/example.Pinger/Ping", "application/json", "{}"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&response.body()[..], b"{}");

    let response = server.handle(post("/twirp/example.Pinger/Ping", "application/protobuf", ""));
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().is_empty());
}
