use serde::Deserialize;

/// One entry of a FastAPI 422 payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
}

impl FieldError {
    /// The offending field name; `loc` is `["body", <field>, ...]`.
    pub fn field_name(&self) -> &str {
        self.loc
            .get(1)
            .and_then(|v| v.as_str())
            .unwrap_or("request")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationDetail {
    pub detail: Vec<FieldError>,
}

/// Failure modes of a model run, in user-facing form.
#[derive(Debug)]
pub enum ModelApiError {
    /// Server rejected the request body (HTTP 422).
    Validation(Vec<FieldError>),
    /// Any other non-success status.
    Http(u16),
    /// Network failure or unreadable body.
    Transport(String),
}

impl std::fmt::Display for ModelApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelApiError::Validation(errors) => {
                let lines: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field_name(), e.msg))
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            ModelApiError::Http(status) => write!(f, "HTTP {status}"),
            ModelApiError::Transport(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ModelApiError {}

/// Maps a non-success response to the error shown to the user.
///
/// A 422 body that does not match the validation shape degrades to a plain
/// HTTP error rather than failing opaquely.
pub fn error_from_response(status: u16, body: &str) -> ModelApiError {
    if status == 422 {
        if let Ok(detail) = serde_json::from_str::<ValidationDetail>(body) {
            return ModelApiError::Validation(detail.detail);
        }
    }
    ModelApiError::Http(status)
}

#[cfg(test)]
mod tests {
    use super::{ModelApiError, error_from_response};

    #[test]
    fn formats_422_as_field_messages() {
        let body = r#"{"detail":[
            {"loc":["body","gasPrice"],"msg":"value is not a valid float","type":"type_error.float"},
            {"loc":["body","country"],"msg":"field required","type":"value_error.missing"}
        ]}"#;
        let err = error_from_response(422, body);
        assert_eq!(
            err.to_string(),
            "gasPrice: value is not a valid float\ncountry: field required"
        );
    }

    #[test]
    fn malformed_422_body_degrades_to_http_error() {
        let err = error_from_response(422, "not json");
        assert!(matches!(err, ModelApiError::Http(422)));
        assert_eq!(err.to_string(), "HTTP 422");
    }

    #[test]
    fn other_statuses_are_generic() {
        assert_eq!(error_from_response(500, "").to_string(), "HTTP 500");
    }

    #[test]
    fn missing_loc_falls_back_to_request() {
        let body = r#"{"detail":[{"loc":[],"msg":"boom"}]}"#;
        let err = error_from_response(422, body);
        assert_eq!(err.to_string(), "request: boom");
    }
}
