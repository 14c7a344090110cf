//! Settings structures for MCP-Agent configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default number of results a catalog source may return
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub llm: LlmSettings,
    pub github: GitHubSettings,
    pub search: SearchSettings,
    pub ui: UiSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge values from an arbitrary variable lookup
    pub fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("MCP_AGENT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("OPENAI_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.llm.api_key = Some(val);
        }
        if let Some(val) = var("LLM_BASE_URL") {
            self.llm.base_url = val;
        }
        if let Some(val) = var("LLM_MODEL_NAME").filter(|v| !v.trim().is_empty()) {
            self.llm.matcher_model = val;
        }
        if let Some(val) = var("GITHUB_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.github.token = Some(val);
        }
        for key in ["PORT", "MCP_AGENT_PORT"] {
            if let Some(val) = var(key) {
                match val.parse() {
                    Ok(port) => self.server.port = port,
                    Err(_) => warn!("Invalid value for {}: '{}'", key, val),
                }
            }
        }
        if let Some(val) = var("MCP_AGENT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("SEARCH_SOURCES_ENABLED") {
            let enabled: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            for source in &mut self.search.sources {
                source.disabled = !enabled.contains(&source.name.to_lowercase());
            }
        }
        if let Some(val) = var("SEARCH_RESULT_LIMIT_PER_SOURCE") {
            match val.trim().parse::<usize>() {
                Ok(limit) => {
                    for source in &mut self.search.sources {
                        source.result_limit = limit;
                    }
                }
                Err(_) => warn!(
                    "Invalid value for SEARCH_RESULT_LIMIT_PER_SOURCE: '{}'. Defaulting to {}.",
                    val, DEFAULT_RESULT_LIMIT
                ),
            }
        }
    }

    /// Reject values that cannot be turned into durations
    pub fn validate(&self) -> Result<()> {
        let request_timeout = self.outgoing.request_timeout;
        if !request_timeout.is_finite() || request_timeout <= 0.0 {
            bail!(
                "outgoing.request_timeout must be a positive number of seconds, got {}",
                request_timeout
            );
        }
        if let Some(timeout) = self.search.timeout {
            if !timeout.is_finite() || timeout <= 0.0 {
                bail!(
                    "search.timeout must be a positive number of seconds, got {}",
                    timeout
                );
            }
        }
        Ok(())
    }

    /// Deadline of one orchestrated search, if configured and valid
    pub fn search_deadline(&self) -> Option<Duration> {
        self.search
            .timeout
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Get all enabled sources, in configured order
    pub fn enabled_sources(&self) -> Vec<&SourceConfig> {
        self.search.sources.iter().filter(|s| !s.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "MCP Requirement Analyzer".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 7860,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 120.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API key; absent means every LLM call fails with a missing-key error
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model used to split requirements into use cases
    pub use_case_model: String,
    /// Model used to draw flowcharts
    pub flowchart_model: String,
    /// Model used by the curated-list matcher
    pub matcher_model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            use_case_model: "gpt-4.1".to_string(),
            flowchart_model: "gpt-4.1".to_string(),
            matcher_model: "gpt-4.1-mini".to_string(),
        }
    }
}

/// Repository hosting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// Access token; absent means cached documents only and no star counts
    pub token: Option<String>,
    /// REST API root
    pub api_url: String,
    /// Age after which a cached document is refetched
    pub refresh_after_days: i64,
    /// Lifetime of memoized star counts in seconds
    pub star_cache_ttl: u64,
    /// Curated documents, in prompt order
    pub documents: Vec<CuratedDocumentConfig>,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            refresh_after_days: 7,
            star_cache_ttl: 3600,
            documents: default_documents(),
        }
    }
}

/// One curated reference document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CuratedDocumentConfig {
    /// `owner/repo` whose README is the document
    pub repo: String,
    /// Local cache file
    pub path: PathBuf,
    /// Heading keyword narrowing the document, if any
    #[serde(default)]
    pub section: Option<String>,
}

/// Search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Deadline in seconds for one whole orchestrated search
    pub timeout: Option<f64>,
    /// Source handlers, in registration order
    pub sources: Vec<SourceConfig>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout: None,
            sources: default_sources(),
        }
    }
}

/// Kind of source handler
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// LLM matcher over curated GitHub lists
    #[default]
    Curated,
    /// HTML catalog page
    Directory,
}

/// Individual source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source name (unique identifier)
    pub name: String,
    /// Handler implementation
    pub kind: SourceKind,
    /// Whether the source is disabled
    pub disabled: bool,
    /// Catalog URL; `{query}` is replaced by URL-encoded keywords
    pub url: Option<String>,
    /// CSS selector of one listing
    pub item_selector: String,
    /// CSS selector of the listing name, relative to the item
    pub name_selector: String,
    /// CSS selector of the listing description, relative to the item
    pub description_selector: String,
    /// CSS selector of the element carrying the link; defaults to the name
    pub link_selector: Option<String>,
    /// Maximum results returned by this source
    pub result_limit: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: SourceKind::Curated,
            disabled: false,
            url: None,
            item_selector: String::new(),
            name_selector: String::new(),
            description_selector: String::new(),
            link_selector: None,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Maximum number of use case tabs
    pub max_tabs: usize,
    /// Example requirements offered on the start page
    pub examples: Vec<String>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            max_tabs: 10,
            examples: vec![
                "I want to build a mobile app that allows users to take photos of plants and get them identified. The app should also provide care instructions for the identified plant.".to_string(),
                "Develop a web platform for local artists to showcase and sell their artwork. Users should be able to browse art, view artist profiles, and make purchases. Artists need a dashboard to manage their listings and sales.".to_string(),
            ],
        }
    }
}

fn default_documents() -> Vec<CuratedDocumentConfig> {
    vec![
        CuratedDocumentConfig {
            repo: "modelcontextprotocol/servers".to_string(),
            path: PathBuf::from("resources/github/modelcontextprotocol_servers.md"),
            section: Some("servers".to_string()),
        },
        CuratedDocumentConfig {
            repo: "punkpeye/awesome-mcp-servers".to_string(),
            path: PathBuf::from("resources/github/punkpeye_awesome_mcp_servers.md"),
            section: Some("Server Implementations".to_string()),
        },
        CuratedDocumentConfig {
            repo: "appcypher/awesome-mcp-servers".to_string(),
            path: PathBuf::from("resources/github/appcypher_awesome-mcp-servers.md"),
            section: None,
        },
    ]
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "github".to_string(),
            kind: SourceKind::Curated,
            ..Default::default()
        },
        SourceConfig {
            name: "pipedream".to_string(),
            kind: SourceKind::Directory,
            disabled: true,
            url: Some("https://mcp.pipedream.com/?q={query}".to_string()),
            item_selector: ".mcp-list-item".to_string(),
            name_selector: ".mcp-name a".to_string(),
            description_selector: ".mcp-description".to_string(),
            ..Default::default()
        },
        SourceConfig {
            name: "mcpmarket".to_string(),
            kind: SourceKind::Directory,
            disabled: true,
            url: Some("https://mcpmarket.com/".to_string()),
            item_selector: ".server-card".to_string(),
            name_selector: ".server-name".to_string(),
            description_selector: ".server-description".to_string(),
            link_selector: Some("a".to_string()),
            ..Default::default()
        },
    ]
}
