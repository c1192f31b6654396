use std::{
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use tracing::error;

use crate::{context::Context, error::panic_message};

pub type Hook = Arc<dyn Fn(&Context) + Send + Sync>;

/// Points in the request lifecycle where hooks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    /// Before anything about the request is checked.
    RequestReceived,
    /// After the method and codec were resolved.
    RequestRouted,
    /// After the response body was encoded.
    ResponsePrepared,
    /// After the success response is complete.
    ResponseSent,
    /// After an error response is complete. The only stage fired on failure
    /// besides the ones reached before it.
    ErrorOccurred,
}

impl HookStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HookStage::RequestReceived => "request-received",
            HookStage::RequestRouted => "request-routed",
            HookStage::ResponsePrepared => "response-prepared",
            HookStage::ResponseSent => "response-sent",
            HookStage::ErrorOccurred => "error-occurred",
        }
    }
}

/// Callbacks owned by one server, run synchronously in registration order.
///
/// Hooks observe; they cannot change the outcome of a request. A hook that
/// panics is logged and skipped.
#[derive(Clone, Default)]
pub struct ServerHooks {
    hooks: Vec<(HookStage, Hook)>,
}

impl ServerHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, stage: HookStage, hook: F)
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.hooks.push((stage, Arc::new(hook)));
    }

    pub fn on<F>(mut self, stage: HookStage, hook: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.add(stage, hook);
        self
    }

    pub fn on_request_received<F>(self, hook: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.on(HookStage::RequestReceived, hook)
    }

    pub fn on_request_routed<F>(self, hook: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.on(HookStage::RequestRouted, hook)
    }

    pub fn on_response_prepared<F>(self, hook: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.on(HookStage::ResponsePrepared, hook)
    }

    pub fn on_response_sent<F>(self, hook: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.on(HookStage::ResponseSent, hook)
    }

    pub fn on_error<F>(self, hook: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.on(HookStage::ErrorOccurred, hook)
    }

    pub fn count(&self, stage: HookStage) -> usize {
        self.hooks.iter().filter(|(s, _)| *s == stage).count()
    }

    pub(crate) fn fire(&self, stage: HookStage, ctx: &Context) {
        for (_, hook) in self.hooks.iter().filter(|(s, _)| *s == stage) {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| hook(ctx))) {
                error!(
                    stage = stage.as_str(),
                    panic = %panic_message(payload.as_ref()),
                    "twirp hook panicked"
                );
            }
        }
    }
}

impl fmt::Debug for ServerHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerHooks")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
