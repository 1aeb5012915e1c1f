use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Audioserver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory audio files are served from
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// Prefix used to build playback URLs in the catalog
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    /// Supported formats, most preferred first
    #[serde(default = "default_formats")]
    pub formats: Vec<AudioFormat>,

    /// Cross-origin policy
    #[serde(default)]
    pub cors: CorsConfig,
}

/// A playable audio format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// File suffix without the leading dot (e.g. "m4a")
    pub extension: String,
    /// Content type sent when streaming. Guessed from the extension when unset.
    #[serde(default)]
    pub mime: Option<String>,
}

impl AudioFormat {
    pub fn new(extension: &str, mime: &str) -> Self {
        Self {
            extension: extension.to_string(),
            mime: Some(mime.to_string()),
        }
    }

    /// Content type for this format, falling back to a generic binary type.
    pub fn content_type(&self) -> String {
        match &self.mime {
            Some(mime) => mime.clone(),
            None => mime_guess::from_ext(&self.extension)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Apply the CORS layer to all routes
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,

    /// Origins allowed to make credentialed cross-origin requests
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_url_prefix() -> String {
    "/audio".to_string()
}

fn default_formats() -> Vec<AudioFormat> {
    vec![
        AudioFormat::new("m4a", "audio/mp4"),
        AudioFormat::new("mp3", "audio/mpeg"),
    ]
}

fn default_cors_enabled() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            url_prefix: default_url_prefix(),
            formats: default_formats(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject format lists the resolver cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.formats.is_empty() {
            bail!("at least one audio format must be configured");
        }

        let mut seen = HashSet::new();
        for format in &self.formats {
            let ext = format.extension.as_str();
            if ext.is_empty() || ext.contains('.') || ext.contains('/') || ext.contains('\\') {
                bail!("invalid audio extension: {ext:?}");
            }
            if !seen.insert(ext) {
                bail!("duplicate audio extension: {ext}");
            }
        }

        Ok(())
    }

    /// Look up a configured format by extension.
    pub fn format(&self, extension: &str) -> Option<&AudioFormat> {
        self.formats.iter().find(|f| f.extension == extension)
    }

    /// Position of an extension in the preference order.
    pub fn priority(&self, extension: &str) -> Option<usize> {
        self.formats.iter().position(|f| f.extension == extension)
    }

    pub fn extensions(&self) -> Vec<String> {
        self.formats.iter().map(|f| f.extension.clone()).collect()
    }
}
