// Code generated by protoc-gen-twirp_rust_srv v0.1.0, DO NOT EDIT.
// source: echo.proto

/// Echo repeats what it is told.
pub trait EchoImpl: ::std::marker::Send + ::std::marker::Sync + 'static {
    /// Ping answers with the same message.
    fn ping(&self, ping_request: PingRequest) -> ::std::result::Result<PingResponse, ::twirp_srv::TwirpError> {
        let _ = ping_request;
        ::std::result::Result::Err(::twirp_srv::TwirpError::unimplemented("Ping is unimplemented"))
    }

    fn shout(&self, ping_request: PingRequest) -> ::std::result::Result<PingResponse, ::twirp_srv::TwirpError> {
        let _ = ping_request;
        ::std::result::Result::Err(::twirp_srv::TwirpError::unimplemented("Shout is unimplemented"))
    }
}

/// Answers every `Echo` method with `Unimplemented`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedEcho;

impl EchoImpl for UnimplementedEcho {}

/// Twirp server for the `Echo` service.
///
/// Serves `POST /twirp/example.echo.Echo/{Method}` with JSON or protobuf bodies.
pub struct EchoServer {
    inner: ::twirp_srv::TwirpServer,
}

impl EchoServer {
    pub const PACKAGE_NAME: &'static str = "example.echo";
    pub const SERVICE_NAME: &'static str = "example.echo.Echo";

    /// Creates a server for the `Echo` service backed by `service`.
    pub fn new<T: EchoImpl>(service: T) -> Self {
        Self::with_hooks(service, ::twirp_srv::ServerHooks::default())
    }

    /// Like [`Self::new`], firing `hooks` at each request stage.
    pub fn with_hooks<T: EchoImpl>(service: T, hooks: ::twirp_srv::ServerHooks) -> Self {
        let service = ::std::sync::Arc::new(service);
        let endpoints: ::std::vec::Vec<::twirp_srv::Endpoint> = ::std::vec![
            {
                let service = ::std::sync::Arc::clone(&service);
                ::twirp_srv::Endpoint::new(
                    "Ping",
                    "example.echo.PingRequest",
                    "example.echo.PingResponse",
                    move |request: PingRequest| -> ::std::result::Result<PingResponse, ::twirp_srv::TwirpError> { service.ping(request) },
                )
            },
            {
                let service = ::std::sync::Arc::clone(&service);
                ::twirp_srv::Endpoint::new(
                    "Shout",
                    "example.echo.PingRequest",
                    "example.echo.PingResponse",
                    move |request: PingRequest| -> ::std::result::Result<PingResponse, ::twirp_srv::TwirpError> { service.shout(request) },
                )
            },
        ];
        Self {
            inner: ::twirp_srv::TwirpServer::new(Self::PACKAGE_NAME, Self::SERVICE_NAME, endpoints, hooks),
        }
    }
}

impl ::std::ops::Deref for EchoServer {
    type Target = ::twirp_srv::TwirpServer;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
