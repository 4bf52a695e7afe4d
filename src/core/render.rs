//! Renderer module
//!
//! Renders export reports and job listings to stdout formats: text, jsonl, json

use serde::Serialize;

use crate::core::model::{BundleReport, JobListing};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render one line (or array) per finished export
    pub fn render_reports(&self, reports: &[BundleReport]) -> serde_json::Result<String> {
        match self.config.format {
            OutputFormat::Text => Ok(reports
                .iter()
                .map(|r| {
                    format!(
                        "{}: {} files, {} bytes from {} [xxh3 {}]",
                        r.output, r.files, r.bytes, r.source, r.digest
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Jsonl => self.render_jsonl(reports),
            OutputFormat::Json => self.render_json(reports),
        }
    }

    /// Render the files each job would bundle
    pub fn render_listings(&self, listings: &[JobListing]) -> serde_json::Result<String> {
        match self.config.format {
            OutputFormat::Text => {
                let mut output = String::new();
                for listing in listings {
                    output.push_str(&format!(
                        "# {} -> {} ({} files)\n",
                        listing.source,
                        listing.output,
                        listing.files.len()
                    ));
                    for file in &listing.files {
                        output.push_str(&format!("/{}\n", file));
                    }
                }
                Ok(output.trim_end().to_string())
            }
            OutputFormat::Jsonl => self.render_jsonl(listings),
            OutputFormat::Json => self.render_json(listings),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl<T: Serialize>(&self, items: &[T]) -> serde_json::Result<String> {
        let lines = items
            .iter()
            .map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item)
                } else {
                    serde_json::to_string(item)
                }
            })
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(lines.join(if self.config.pretty { "\n\n" } else { "\n" }))
    }

    /// Render as a single JSON array
    fn render_json<T: Serialize>(&self, items: &[T]) -> serde_json::Result<String> {
        if self.config.pretty {
            serde_json::to_string_pretty(items)
        } else {
            serde_json::to_string(items)
        }
    }
}
