use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HostMetricsError, Result};

/// Section of the configuration file that lists log files
pub const LOGS_SECTION: &str = "Logs";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(4);

/// A parsed INI-style configuration file.
///
/// Sections keep their names as written; keys are case-folded to lower case.
/// Entries keep file order. A repeated section, or a repeated key within a
/// section, is an error.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IniDocument {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = IniDocument::default();
        let mut current: Option<usize> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| {
                    HostMetricsError::config(format!(
                        "line {}: unterminated section header",
                        lineno + 1
                    ))
                })?;
                let name = name.trim().to_string();
                if doc.section(&name).is_some() {
                    return Err(HostMetricsError::config(format!(
                        "line {}: duplicate section [{}]",
                        lineno + 1,
                        name
                    )));
                }
                doc.sections.push((name, Vec::new()));
                current = Some(doc.sections.len() - 1);
                continue;
            }

            let idx = current.ok_or_else(|| {
                HostMetricsError::config(format!(
                    "line {}: entry outside of any section",
                    lineno + 1
                ))
            })?;

            let split = line.find(|c: char| c == '=' || c == ':').ok_or_else(|| {
                HostMetricsError::config(format!("line {}: expected `key = value`", lineno + 1))
            })?;
            let key = line[..split].trim().to_lowercase();
            let value = line[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(HostMetricsError::config(format!(
                    "line {}: empty key",
                    lineno + 1
                )));
            }

            let (section, entries) = &mut doc.sections[idx];
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(HostMetricsError::config(format!(
                    "line {}: duplicate key `{}` in [{}]",
                    lineno + 1,
                    key,
                    section
                )));
            }
            entries.push((key, value));
        }

        Ok(doc)
    }

    pub fn section(&self, name: &str) -> Option<&[(String, String)]> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entries)| entries.as_slice())
    }
}

/// A named log file from the `[Logs]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub name: String,
    pub path: PathBuf,
}

/// Log name -> path mapping, loaded once at startup and read-only afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogRegistry {
    sources: Vec<LogSource>,
}

impl LogRegistry {
    pub fn new(sources: Vec<LogSource>) -> Self {
        Self { sources }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            HostMetricsError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_ini(&text)
    }

    pub fn from_ini(text: &str) -> Result<Self> {
        let doc = IniDocument::parse(text)?;
        let section = doc.section(LOGS_SECTION).ok_or_else(|| {
            HostMetricsError::config(format!("missing [{}] section", LOGS_SECTION))
        })?;

        let sources = section
            .iter()
            .map(|(name, path)| LogSource {
                name: name.clone(),
                path: PathBuf::from(path),
            })
            .collect();

        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[LogSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Tunnel settings taken from the command line
#[derive(Debug, Clone, Default)]
pub struct TunnelSettings {
    pub subdomain: Option<String>,
    pub url_file: Option<PathBuf>,
}

/// Runtime settings for the HTTP service
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub config_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub ping_timeout: Duration,
    pub tunnel: Option<TunnelSettings>,
}

impl ServerSettings {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            tunnel: None,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
