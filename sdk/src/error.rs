//! The Twirp error taxonomy.

use std::{any::Any, collections::HashMap, fmt};

use http::StatusCode;
use thiserror::Error;

/// One of the fixed Twirp error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    BadRoute,
    AlreadyExists,
    PermissionDenied,
    Unauthenticated,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    NoError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 18] = [
        ErrorCode::Canceled,
        ErrorCode::Unknown,
        ErrorCode::InvalidArgument,
        ErrorCode::DeadlineExceeded,
        ErrorCode::NotFound,
        ErrorCode::BadRoute,
        ErrorCode::AlreadyExists,
        ErrorCode::PermissionDenied,
        ErrorCode::Unauthenticated,
        ErrorCode::ResourceExhausted,
        ErrorCode::FailedPrecondition,
        ErrorCode::Aborted,
        ErrorCode::OutOfRange,
        ErrorCode::Unimplemented,
        ErrorCode::Internal,
        ErrorCode::Unavailable,
        ErrorCode::DataLoss,
        ErrorCode::NoError,
    ];

    /// Wire form, e.g. `not_found`. `NoError` is the empty string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
            Self::InvalidArgument => "invalid_argument",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::NotFound => "not_found",
            Self::BadRoute => "bad_route",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::Unauthenticated => "unauthenticated",
            Self::ResourceExhausted => "resource_exhausted",
            Self::FailedPrecondition => "failed_precondition",
            Self::Aborted => "aborted",
            Self::OutOfRange => "out_of_range",
            Self::Unimplemented => "unimplemented",
            Self::Internal => "internal",
            Self::Unavailable => "unavailable",
            Self::DataLoss => "data_loss",
            Self::NoError => "",
        }
    }

    /// Kind name as it appears in the `type` field of an error body.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Canceled => "Canceled",
            Self::Unknown => "Unknown",
            Self::InvalidArgument => "InvalidArgument",
            Self::DeadlineExceeded => "DeadlineExceeded",
            Self::NotFound => "NotFound",
            Self::BadRoute => "BadRoute",
            Self::AlreadyExists => "AlreadyExists",
            Self::PermissionDenied => "PermissionDenied",
            Self::Unauthenticated => "Unauthenticated",
            Self::ResourceExhausted => "ResourceExhausted",
            Self::FailedPrecondition => "FailedPrecondition",
            Self::Aborted => "Aborted",
            Self::OutOfRange => "OutOfRange",
            Self::Unimplemented => "Unimplemented",
            Self::Internal => "Internal",
            Self::Unavailable => "Unavailable",
            Self::DataLoss => "DataLoss",
            Self::NoError => "NoError",
        }
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Canceled => StatusCode::REQUEST_TIMEOUT,
            Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRoute => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::ResourceExhausted => StatusCode::FORBIDDEN,
            Self::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
            Self::Aborted => StatusCode::CONFLICT,
            Self::OutOfRange => StatusCode::BAD_REQUEST,
            Self::Unimplemented => StatusCode::NOT_IMPLEMENTED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoError => StatusCode::OK,
        }
    }

    pub fn from_wire(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP status for a wire code string; anything unrecognized is a 500.
pub fn status_for(code: &str) -> StatusCode {
    ErrorCode::from_wire(code)
        .map(|c| c.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// A structured Twirp error: a kind, a message and string metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("twirp error {code}: {msg}")]
pub struct TwirpError {
    code: ErrorCode,
    msg:  String,
    meta: HashMap<String, String>,
}

macro_rules! error_constructors {
    ($($fn_name:ident => $code:ident),* $(,)?) => {
        $(
            pub fn $fn_name(msg: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, msg)
            }
        )*
    };
}

impl TwirpError {
    pub fn new(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            meta: HashMap::new(),
        }
    }

    /// Builds an error from a wire code; unrecognized codes become `Unknown`.
    pub fn from_code_str(code: &str, msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::from_wire(code).unwrap_or(ErrorCode::Unknown), msg)
    }

    error_constructors! {
        canceled => Canceled,
        unknown => Unknown,
        invalid_argument => InvalidArgument,
        deadline_exceeded => DeadlineExceeded,
        not_found => NotFound,
        bad_route => BadRoute,
        already_exists => AlreadyExists,
        permission_denied => PermissionDenied,
        unauthenticated => Unauthenticated,
        resource_exhausted => ResourceExhausted,
        failed_precondition => FailedPrecondition,
        aborted => Aborted,
        out_of_range => OutOfRange,
        unimplemented => Unimplemented,
        internal => Internal,
        unavailable => Unavailable,
        data_loss => DataLoss,
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.meta.insert(key.into(), value.to_string());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn meta(&self) -> &HashMap<String, String> {
        &self.meta
    }

    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

/// Why a request failed before a response could be encoded.
#[derive(Debug)]
pub(crate) enum Failure {
    /// The implementation or the router reported a taxonomy error.
    Twirp(TwirpError),
    /// Anything else: undecodable bodies, encoding failures, panics.
    Raw(String),
}

impl From<TwirpError> for Failure {
    fn from(err: TwirpError) -> Self {
        Failure::Twirp(err)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Twirp(err) => fmt::Display::fmt(err, f),
            Failure::Raw(msg) => f.write_str(msg),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table() {
        let expected = [
            (ErrorCode::Canceled, 408),
            (ErrorCode::Unknown, 500),
            (ErrorCode::InvalidArgument, 400),
            (ErrorCode::DeadlineExceeded, 408),
            (ErrorCode::NotFound, 404),
            (ErrorCode::BadRoute, 404),
            (ErrorCode::AlreadyExists, 409),
            (ErrorCode::PermissionDenied, 403),
            (ErrorCode::Unauthenticated, 401),
            (ErrorCode::ResourceExhausted, 403),
            (ErrorCode::FailedPrecondition, 412),
            (ErrorCode::Aborted, 409),
            (ErrorCode::OutOfRange, 400),
            (ErrorCode::Unimplemented, 501),
            (ErrorCode::Internal, 500),
            (ErrorCode::Unavailable, 503),
            (ErrorCode::DataLoss, 500),
            (ErrorCode::NoError, 200),
        ];
        assert_eq!(expected.len(), ErrorCode::ALL.len());
        for (code, status) in expected {
            assert_eq!(code.status_code().as_u16(), status, "{:?}", code);
            assert_eq!(status_for(code.as_str()).as_u16(), status, "{:?}", code);
        }
    }

    #[test]
    fn unrecognized_codes() {
        assert_eq!(status_for("teapot"), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(TwirpError::from_code_str("teapot", "x").code(), ErrorCode::Unknown);
        assert_eq!(TwirpError::from_code_str("not_found", "x").code(), ErrorCode::NotFound);
    }

    #[test]
    fn meta_is_per_error() {
        let a = TwirpError::not_found("a").with_meta("id", 7);
        let b = TwirpError::not_found("b");
        assert_eq!(a.meta_value("id"), Some("7"));
        assert!(b.meta().is_empty());
    }

    #[test]
    fn display_uses_wire_code() {
        let err = TwirpError::invalid_argument("size must be positive");
        assert_eq!(err.to_string(), "twirp error invalid_argument: size must be positive");
    }

    #[test]
    fn panic_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(3_u8);
        assert_eq!(panic_message(payload.as_ref()), "panic with a non-string payload");
    }
}
