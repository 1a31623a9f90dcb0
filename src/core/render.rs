//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use colored::Colorize;

use crate::core::model::{ResultItem, ResultSet};
use crate::core::tokenizer::highlight_spans;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    pub color: bool,
    /// Query whose tokens are highlighted in md/raw output
    pub highlight: Option<String>,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self {
            pretty,
            ..Self::new(format)
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Highlight the tokens of `query` in human-readable formats
    pub fn highlighting(mut self, query: &str) -> Self {
        self.highlight = Some(query.to_string());
        self
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[cfg(test)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as a Markdown list with the action offered for each result
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        if result_set.is_empty() {
            return "_No results._\n".to_string();
        }

        let mut output = String::from("## Results\n\n");
        for item in &result_set.items {
            let kind = if item.is_folder { "folder" } else { "file" };
            output.push_str(&format!(
                "- {} ({}, {})\n",
                self.highlight_md(&item.name),
                kind,
                item.action_label()
            ));
        }
        output
    }

    fn highlight_md(&self, name: &str) -> String {
        let Some(query) = self.config.highlight.as_deref() else {
            return format!("`{}`", name);
        };
        highlight_spans(name, query)
            .into_iter()
            .map(|(part, hit)| {
                if hit {
                    format!("**{}**", part)
                } else {
                    part.to_string()
                }
            })
            .collect()
    }

    /// Render names one per line, highlighting query tokens on terminals
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .map(|item| self.render_raw_item(item))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_raw_item(&self, item: &ResultItem) -> String {
        let query = match (&self.config.highlight, self.config.color) {
            (Some(q), true) => q,
            _ => return item.name.clone(),
        };
        highlight_spans(&item.name, query)
            .into_iter()
            .map(|(part, hit)| {
                if hit {
                    part.yellow().bold().to_string()
                } else {
                    part.to_string()
                }
            })
            .collect()
    }
}
