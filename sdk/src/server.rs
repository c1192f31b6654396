use std::collections::HashMap;

use bytes::Bytes;
use http::{header, Method, Request, Response};
use tracing::{debug, warn};

use crate::{
    codec::Codec,
    context::{self, Context},
    endpoint::Endpoint,
    error::{Failure, TwirpError},
    hooks::{HookStage, ServerHooks},
    response::{describe, render_error, render_success},
};

/// Serves the Twirp routes of one service.
///
/// The endpoint table is fixed at construction, so a server can be shared
/// across threads and handle any number of requests concurrently; every
/// request gets its own [`Context`] and response.
#[derive(Debug)]
pub struct TwirpServer {
    package_name: String,
    service_name: String,
    prefix:       String,
    endpoints:    HashMap<String, Endpoint>,
    hooks:        ServerHooks,
}

impl TwirpServer {
    /// `service_name` is the fully qualified service name; the route prefix
    /// is `/twirp/{service_name}/`.
    pub fn new(
        package_name: &str,
        service_name: &str,
        endpoints: Vec<Endpoint>,
        hooks: ServerHooks,
    ) -> Self {
        let mut table = HashMap::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let name = endpoint.name().to_string();
            if table.insert(name.clone(), endpoint).is_some() {
                warn!(service = service_name, method = %name, "duplicate twirp endpoint replaced");
            }
        }

        Self {
            package_name: package_name.to_string(),
            service_name: service_name.to_string(),
            prefix:       format!("/twirp/{}/", service_name),
            endpoints:    table,
            hooks,
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn endpoint(&self, method: &str) -> Option<&Endpoint> {
        self.endpoints.get(method)
    }

    /// Method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Handles one request to completion. Never fails: every problem becomes
    /// a JSON error response.
    pub fn handle<B: AsRef<[u8]>>(&self, request: Request<B>) -> Response<Bytes> {
        let mut ctx = Context::new();
        ctx.insert(context::PACKAGE_NAME, &self.package_name);
        ctx.insert(context::SERVICE_NAME, &self.service_name);

        match self.handle_request(&mut ctx, &request) {
            Ok(response) => response,
            Err(failure) => self.handle_error(&mut ctx, failure),
        }
    }

    fn handle_request<B: AsRef<[u8]>>(
        &self,
        ctx: &mut Context,
        request: &Request<B>,
    ) -> Result<Response<Bytes>, Failure> {
        let method = request.method();
        let path = request.uri().path();
        ctx.insert(context::REQUEST, format!("{} {}", method, path));
        self.hooks.fire(HookStage::RequestReceived, ctx);

        if method != Method::POST {
            return Err(TwirpError::bad_route(format!(
                "unsupported method {} (only POST is allowed)",
                method
            ))
            .with_meta("twirp_invalid_route", format!("{} {}", method, path))
            .into());
        }

        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        ctx.insert(context::HTTP_METHOD, "POST");
        ctx.insert(context::URL, path);
        ctx.insert(context::CONTENT_TYPE, content_type);

        let (endpoint, codec) = self.route(path, content_type)?;
        ctx.insert(context::ENDPOINT, endpoint.name());
        debug!(
            service = %self.service_name,
            method = endpoint.name(),
            codec = ?codec,
            "routed twirp request"
        );
        self.hooks.fire(HookStage::RequestRouted, ctx);

        let body = endpoint.call(codec, request.body().as_ref())?;
        let response = render_success(codec, body);
        ctx.insert(context::RESPONSE, describe(&response));
        self.hooks.fire(HookStage::ResponsePrepared, ctx);

        ctx.insert(context::STATUS_CODE, response.status().as_u16());
        self.hooks.fire(HookStage::ResponseSent, ctx);

        Ok(response)
    }

    /// Resolves the endpoint named by `path` and the codec for `content_type`.
    fn route(&self, path: &str, content_type: &str) -> Result<(&Endpoint, Codec), TwirpError> {
        let rpc_method = match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) if !rest.is_empty() => rest,
            _ => {
                return Err(TwirpError::bad_route(format!("no handler for path {}", path))
                    .with_meta("twirp_invalid_route", format!("POST {}", path)));
            }
        };

        let endpoint = self.endpoints.get(rpc_method).ok_or_else(|| {
            TwirpError::unimplemented(format!("service has no endpoint {}", rpc_method))
                .with_meta("twirp_invalid_route", format!("POST {}", path))
        })?;

        let codec = Codec::from_content_type(content_type).ok_or_else(|| {
            TwirpError::bad_route(format!("unexpected Content-Type: {}", content_type))
                .with_meta("twirp_invalid_route", format!("POST {}", path))
        })?;

        Ok((endpoint, codec))
    }

    fn handle_error(&self, ctx: &mut Context, failure: Failure) -> Response<Bytes> {
        let response = render_error(&failure, ctx, |body| serde_json::to_vec(body));

        warn!(
            service = %self.service_name,
            status = response.status().as_u16(),
            error = %failure,
            "twirp request failed"
        );

        ctx.insert(context::STATUS_CODE, response.status().as_u16());
        ctx.insert(context::RESPONSE, describe(&response));
        ctx.insert(context::EXCEPTION, &failure);
        self.hooks.fire(HookStage::ErrorOccurred, ctx);

        response
    }
}
