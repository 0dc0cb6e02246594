use std::env;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

pub const ENV_VAR_ERROR: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const REJECTED_ERROR: i32 = 4;
pub const NOT_FOUND_ERROR: i32 = 6;
pub const UNCONFIGURED_ERROR: i32 = 7;
pub const INVALID_STATE_ERROR: i32 = 100;
pub const INVALID_INPUT_ERROR: i32 = 101;

impl Error {
    /// Provider has no usable credential; the tier is skipped without logging.
    pub fn is_unconfigured(&self) -> bool {
        self.code == UNCONFIGURED_ERROR
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        transport_error(format!("malformed payload: {}", err))
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: INVALID_STATE_ERROR,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: INVALID_INPUT_ERROR,
        message: "invalid input".into(),
    }
}

pub fn env_var_error<T: fmt::Display>(err: T) -> Error {
    Error {
        code: ENV_VAR_ERROR,
        message: format!("environment variable error: {}", err),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        return transport_error("request timed out");
    }

    transport_error(format!("reqwest error: {}", err))
}

pub fn transport_error<T: Into<String>>(message: T) -> Error {
    Error {
        code: TRANSPORT_ERROR,
        message: message.into(),
    }
}

pub fn rejected_error<T: fmt::Display>(status: T) -> Error {
    Error {
        code: REJECTED_ERROR,
        message: format!("provider rejected request: {}", status),
    }
}

pub fn not_found_error(query: &str) -> Error {
    Error {
        code: NOT_FOUND_ERROR,
        message: format!("location not found: {}", query),
    }
}

pub fn unconfigured_error() -> Error {
    Error {
        code: UNCONFIGURED_ERROR,
        message: "provider unconfigured".into(),
    }
}

#[test]
fn malformed_json_is_transport_error() {
    let err: Error = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();

    assert_eq!(err.code, TRANSPORT_ERROR);
    assert!(err.message.starts_with("malformed payload"));
}

#[test]
fn display_includes_code() {
    assert_eq!(not_found_error("Nowhere").to_string(), "location not found: Nowhere (code 6)");
    assert!(unconfigured_error().is_unconfigured());
    assert!(!rejected_error("ZERO_RESULTS").is_unconfigured());
}
