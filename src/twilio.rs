//! Twilio REST client: wraps the Messages endpoint and maps wire failures.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

const DEFAULT_API_BASE: &str = "https://api.twilio.com/2010-04-01";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: (&'a str, &'a str),
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: (&'a str, &'a str),
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .basic_auth(auth.0, Some(auth.1))
                .form(&params)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// Provider credentials and sender identity, loaded once at startup.
///
/// Missing variables are left empty rather than rejected: a send attempted
/// with incomplete credentials surfaces as a provider-side error.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl TwilioConfig {
    pub fn from_env() -> Self {
        Self {
            account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            from_number: std::env::var("TWILIO_FROM_NUMBER").unwrap_or_default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.account_sid.is_empty()
            && !self.auth_token.is_empty()
            && !self.from_number.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    /// HTTP client / transport failure (DNS, TLS, connection reset).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Twilio rejected the request with a structured error payload.
    /// Displays as the provider's own message text.
    #[error("{message}")]
    Api { code: i64, message: String },

    /// Non-2xx response whose body was not a Twilio error payload.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Successful status but a body the client could not decode.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    message: String,
}

/// Client for Twilio's account-scoped Messages endpoint.
///
/// No request timeout is configured; a hanging provider call is bounded only
/// by the network stack.
#[derive(Clone)]
pub struct TwilioClient {
    config: TwilioConfig,
    messages_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Self {
        Self::with_transport(
            config,
            Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        )
    }

    pub(crate) fn with_transport(config: TwilioConfig, http: Arc<dyn HttpTransport>) -> Self {
        let messages_endpoint = format!(
            "{}/Accounts/{}/Messages.json",
            DEFAULT_API_BASE, config.account_sid
        );
        Self {
            config,
            messages_endpoint,
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    /// Send one SMS and return the provider-assigned message SID.
    pub async fn send_message(&self, to: &str, body: &str) -> Result<String, TwilioError> {
        let params = vec![
            ("To".to_owned(), to.to_owned()),
            ("From".to_owned(), self.config.from_number.clone()),
            ("Body".to_owned(), body.to_owned()),
        ];

        let response = self
            .http
            .post_form(
                &self.messages_endpoint,
                (&self.config.account_sid, &self.config.auth_token),
                params,
            )
            .await
            .map_err(TwilioError::Transport)?;

        if (200..=299).contains(&response.status) {
            let resource: MessageResource = serde_json::from_str(&response.body)
                .map_err(|err| TwilioError::Parse(Box::new(err)))?;
            return Ok(resource.sid);
        }

        match serde_json::from_str::<ApiErrorBody>(&response.body) {
            Ok(api) => Err(TwilioError::Api {
                code: api.code,
                message: api.message,
            }),
            Err(_) => {
                let body = if response.body.trim().is_empty() {
                    None
                } else {
                    Some(response.body)
                };
                Err(TwilioError::HttpStatus {
                    status: response.status,
                    body,
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::error::Error as StdError;
    use std::sync::{Arc, Mutex};

    use super::{BoxFuture, HttpResponse, HttpTransport};

    /// Scripted transport double: replays queued responses and records every
    /// request it sees, in order.
    #[derive(Clone, Default)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeState>>,
    }

    #[derive(Default)]
    struct FakeState {
        responses: VecDeque<Result<HttpResponse, String>>,
        requests: Vec<RecordedRequest>,
    }

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub(crate) url: String,
        pub(crate) auth: (String, String),
        pub(crate) params: Vec<(String, String)>,
    }

    impl FakeTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push_response(&self, status: u16, body: impl Into<String>) {
            self.state
                .lock()
                .unwrap()
                .responses
                .push_back(Ok(HttpResponse {
                    status,
                    body: body.into(),
                }));
        }

        pub(crate) fn push_error(&self, message: impl Into<String>) {
            self.state
                .lock()
                .unwrap()
                .responses
                .push_back(Err(message.into()));
        }

        pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
            self.state.lock().unwrap().requests.clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            url: &'a str,
            auth: (&'a str, &'a str),
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    url: url.to_owned(),
                    auth: (auth.0.to_owned(), auth.1.to_owned()),
                    params,
                });
                match state.responses.pop_front() {
                    Some(Ok(response)) => Ok(response),
                    Some(Err(message)) => Err(message.into()),
                    None => panic!("no scripted response left for {url}"),
                }
            })
        }
    }
}
