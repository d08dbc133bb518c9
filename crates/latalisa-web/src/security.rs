//! Security response headers.
//!
//! [`SecurityFilter`] adds `Strict-Transport-Security`, `X-Frame-Options`,
//! `X-XSS-Protection` and `X-Content-Type-Options` to responses for secure
//! requests. Configuration comes from TOML or from a flat map of init
//! parameters:
//!
//! | parameter           | default    |
//! |---------------------|------------|
//! | `disableFilter`     | `false`    |
//! | `maxAgeSeconds`     | `31536000` |
//! | `includeSubDomains` | `true`     |
//! | `preload`           | `true`     |
//! | `xFrameOption`      | `DENY`     |

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, WebError};
use crate::http::{
    HttpRequest, HttpResponse, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
    X_XSS_PROTECTION,
};

/// One year.
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 31_536_000;

pub const PARAM_DISABLE_FILTER: &str = "disableFilter";
pub const PARAM_MAX_AGE_SECONDS: &str = "maxAgeSeconds";
pub const PARAM_INCLUDE_SUB_DOMAINS: &str = "includeSubDomains";
pub const PARAM_PRELOAD: &str = "preload";
pub const PARAM_X_FRAME_OPTION: &str = "xFrameOption";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum XFrameOption {
    /// The page cannot be framed at all.
    #[default]
    #[serde(rename = "DENY")]
    Deny,
    /// The page can only be framed by pages of the same origin.
    #[serde(rename = "SAMEORIGIN")]
    SameOrigin,
}

impl XFrameOption {
    pub fn as_str(self) -> &'static str {
        match self {
            XFrameOption::Deny => "DENY",
            XFrameOption::SameOrigin => "SAMEORIGIN",
        }
    }
}

impl fmt::Display for XFrameOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XFrameOption {
    type Err = WebError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DENY" => Ok(XFrameOption::Deny),
            "SAMEORIGIN" => Ok(XFrameOption::SameOrigin),
            other => Err(WebError::config(format!("unknown X-Frame-Options value '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub disable_filter: bool,
    pub max_age_seconds: i64,
    pub include_sub_domains: bool,
    pub preload: bool,
    pub x_frame_option: XFrameOption,
    pub xss_protection: bool,
    pub content_type_options: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            disable_filter: false,
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            include_sub_domains: true,
            preload: true,
            x_frame_option: XFrameOption::Deny,
            xss_protection: true,
            content_type_options: true,
        }
    }
}

impl SecurityConfig {
    pub fn disabled() -> Self {
        Self {
            disable_filter: true,
            ..Self::default()
        }
    }

    pub fn max_age_seconds(mut self, seconds: i64) -> Self {
        self.max_age_seconds = seconds;
        self
    }

    pub fn include_sub_domains(mut self, include: bool) -> Self {
        self.include_sub_domains = include;
        self
    }

    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    pub fn x_frame_option(mut self, option: XFrameOption) -> Self {
        self.x_frame_option = option;
        self
    }

    /// Reads init parameters; missing or empty values take their default.
    pub fn from_init_params(params: &BTreeMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            disable_filter: param(params, PARAM_DISABLE_FILTER, defaults.disable_filter)?,
            max_age_seconds: param(params, PARAM_MAX_AGE_SECONDS, defaults.max_age_seconds)?,
            include_sub_domains: param(params, PARAM_INCLUDE_SUB_DOMAINS, defaults.include_sub_domains)?,
            preload: param(params, PARAM_PRELOAD, defaults.preload)?,
            x_frame_option: param(params, PARAM_X_FRAME_OPTION, defaults.x_frame_option)?,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// The init parameters that reproduce this configuration.
    pub fn to_init_params(&self) -> BTreeMap<String, String> {
        [
            (PARAM_DISABLE_FILTER, self.disable_filter.to_string()),
            (PARAM_MAX_AGE_SECONDS, self.max_age_seconds.to_string()),
            (PARAM_INCLUDE_SUB_DOMAINS, self.include_sub_domains.to_string()),
            (PARAM_PRELOAD, self.preload.to_string()),
            (PARAM_X_FRAME_OPTION, self.x_frame_option.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// A disabled configuration is never rejected.
    pub fn validate(&self) -> Result<()> {
        if !self.disable_filter && self.max_age_seconds <= 0 {
            return Err(WebError::config(format!(
                "invalid maxAgeSeconds value: {}",
                self.max_age_seconds
            )));
        }
        Ok(())
    }

    /// The `Strict-Transport-Security` value. `preload` only applies together
    /// with `includeSubDomains`.
    pub fn hsts_directives(&self) -> String {
        let mut directives = format!("max-age={}", self.max_age_seconds);
        if self.include_sub_domains {
            directives.push_str(" ; includeSubDomains");
            if self.preload {
                directives.push_str(" ; preload");
            }
        }
        directives
    }
}

fn param<T: FromStr>(params: &BTreeMap<String, String>, name: &str, default: T) -> Result<T> {
    match params.get(name).map(|value| value.trim()) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| WebError::config(format!("invalid {name} value: {value}"))),
    }
}

#[derive(Debug, Clone)]
pub struct SecurityFilter {
    config: SecurityConfig,
    hsts: String,
}

impl SecurityFilter {
    pub fn new(config: SecurityConfig) -> Result<Self> {
        config.validate()?;
        let hsts = config.hsts_directives();
        if config.disable_filter {
            info!("security headers disabled");
        }
        Ok(Self { config, hsts })
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.disable_filter
    }

    /// Adds the headers when the filter is enabled and the request is
    /// secure. Returns whether anything was added.
    pub fn apply(&self, request: &impl HttpRequest, response: &mut impl HttpResponse) -> bool {
        if !self.is_enabled() || !request.is_secure() {
            return false;
        }
        let headers = response.headers_mut();
        headers.add(STRICT_TRANSPORT_SECURITY, self.hsts.as_str());
        headers.add(X_FRAME_OPTIONS, self.config.x_frame_option.as_str());
        if self.config.xss_protection {
            headers.add(X_XSS_PROTECTION, "1; mode=block");
        }
        if self.config.content_type_options {
            headers.add(X_CONTENT_TYPE_OPTIONS, "nosniff");
        }
        debug!(hsts = %self.hsts, "security headers added");
        true
    }
}
