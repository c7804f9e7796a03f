//! Per-instance configuration and editor URL construction.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Request timeout applied when nothing else is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay after `DOCUMENT_LOADED` before mutating commands are sent.
///
/// A freshly loaded document does not accept mutations right away.
pub const DEFAULT_DOCUMENT_LOADED_GRACE: Duration = Duration::from_millis(200);

const DEFAULT_BASE_DOMAIN: &str = "simplepdf.com";
const DEFAULT_COMPANY_IDENTIFIER: &str = "react-editor";

/// Editor interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
    Es,
    Fr,
    It,
    Pt,
    Nl,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::It => "it",
            Locale::Pt => "pt",
            Locale::Nl => "nl",
        }
    }
}

/// How the editor will receive its document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentSource {
    /// Empty editor.
    #[default]
    None,
    /// The host will fetch the document and send it with `LOAD_DOCUMENT`;
    /// the editor shows a loading placeholder meanwhile.
    Command,
    /// The editor opens the URL itself (used when the host cannot fetch it).
    Open(String),
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Configuration of one embedding instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub company_identifier: Option<String>,
    pub base_domain: Option<String>,
    pub locale: Locale,
    pub request_timeout_ms: u64,
    pub document_loaded_grace_ms: u64,
    pub context: Option<Map<String, Value>>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            company_identifier: None,
            base_domain: None,
            locale: Locale::default(),
            request_timeout_ms: saturating_millis(DEFAULT_REQUEST_TIMEOUT),
            document_loaded_grace_ms: saturating_millis(DEFAULT_DOCUMENT_LOADED_GRACE),
            context: None,
        }
    }
}

impl EmbedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company_identifier(mut self, company_identifier: impl Into<String>) -> Self {
        self.company_identifier = Some(company_identifier.into());
        self
    }

    pub fn with_base_domain(mut self, base_domain: impl Into<String>) -> Self {
        self.base_domain = Some(base_domain.into());
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn with_document_loaded_grace(mut self, grace: Duration) -> Self {
        self.document_loaded_grace_ms = saturating_millis(grace);
        self
    }

    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn document_loaded_grace(&self) -> Duration {
        Duration::from_millis(self.document_loaded_grace_ms)
    }

    /// Origin of the editor, e.g. `https://react-editor.simplepdf.com`.
    ///
    /// Local development domains (`.nil`, `localhost`) are served over http.
    pub fn editor_origin(&self) -> String {
        let domain = self.base_domain.as_deref().unwrap_or(DEFAULT_BASE_DOMAIN);
        let subdomain = self
            .company_identifier
            .as_deref()
            .unwrap_or(DEFAULT_COMPANY_IDENTIFIER);
        let is_local_dev = domain.contains(".nil") || domain.contains("localhost");
        let scheme = if is_local_dev { "http" } else { "https" };
        format!("{scheme}://{subdomain}.{domain}")
    }

    /// Full editor URL to load in the frame.
    pub fn editor_url(&self, document: &DocumentSource) -> Result<Url, url::ParseError> {
        let origin = Url::parse(&self.editor_origin())?;
        let mut url = origin.join(&format!("/{}/editor", self.locale.as_str()))?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(context) = self.encoded_context() {
                query.append_pair("context", &context);
            }
            match document {
                DocumentSource::None => {}
                DocumentSource::Command => {
                    query.append_pair("loadingPlaceholder", "true");
                }
                DocumentSource::Open(href) => {
                    query.append_pair("open", href);
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// The context object as URI-encoded base64 JSON.
    pub fn encoded_context(&self) -> Option<String> {
        let context = self.context.as_ref()?;
        match serde_json::to_vec(context) {
            Ok(json) => {
                let base64 = STANDARD.encode(json);
                Some(url::form_urlencoded::byte_serialize(base64.as_bytes()).collect())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to encode the context");
                None
            }
        }
    }
}
