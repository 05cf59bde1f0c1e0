use crate::error::FetchError;
use crate::fetch::RecordSource;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.crossref.org";

/// HTTP client for a Crossref-style works endpoint
///
/// Requests `GET {base_url}/works/{id}` and unwraps the `message` object of
/// the response envelope.
pub struct CatalogClient {
    agent: ureq::Agent,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration, mailto: Option<&str>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&user_agent(mailto))
            .build();

        CatalogClient {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn work_url(&self, id: &str) -> String {
        format!("{}/works/{}", self.base_url, id)
    }
}

impl RecordSource for CatalogClient {
    fn fetch(&self, id: &str) -> Result<Value, FetchError> {
        let url = self.work_url(id);
        debug!(%url, "requesting record");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::Status {
                    id: id.to_string(),
                    status,
                });
            }
            Err(err) => {
                return Err(FetchError::Transport {
                    id: id.to_string(),
                    message: err.to_string(),
                });
            }
        };

        let body: Value = response.into_json().map_err(|source| FetchError::Decode {
            id: id.to_string(),
            source,
        })?;

        unwrap_message(id, body)
    }
}

/// Pull the record out of the `{"status": .., "message": {..}}` envelope
pub fn unwrap_message(id: &str, mut body: Value) -> Result<Value, FetchError> {
    match body.get_mut("message").map(Value::take) {
        Some(Value::Object(message)) if !message.is_empty() => Ok(Value::Object(message)),
        _ => Err(FetchError::MissingMessage { id: id.to_string() }),
    }
}

/// Contact address goes in the user agent so the catalog can route the
/// client to its polite pool
fn user_agent(mailto: Option<&str>) -> String {
    let base = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
    match mailto {
        Some(address) => format!("{base} (mailto:{address})"),
        None => base.to_string(),
    }
}
