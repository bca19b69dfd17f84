// src/telemetry/mod.rs — Raw XML telemetry documents

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loader::TelemetryLoader;

/// Kind of telemetry export produced by a network element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Alarm,
    Pm,
    Topology,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Alarm => "alarm",
            Category::Pm => "pm",
            Category::Topology => "topology",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alarm" | "alarms" => Some(Category::Alarm),
            "pm" | "performance" => Some(Category::Pm),
            "topology" | "topo" => Some(Category::Topology),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw text of one XML export. Never parsed locally.
#[derive(Debug, Clone)]
pub struct TelemetryDocument {
    category: Category,
    source: PathBuf,
    content: String,
}

impl TelemetryDocument {
    pub fn new(category: Category, source: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            category,
            source: source.into(),
            content: content.into(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn source(&self) -> &std::path::Path {
        &self.source
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}
