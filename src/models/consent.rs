use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The user's stored cookie-consent choice. Absence means "ask".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Consent {
    Accepted,
    Declined,
}

impl Consent {
    pub fn as_str(self) -> &'static str {
        match self {
            Consent::Accepted => "accepted",
            Consent::Declined => "declined",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "accepted" => Some(Consent::Accepted),
            "declined" => Some(Consent::Declined),
            _ => None,
        }
    }
}

/// The only durable state in the whole service: one flag in one file,
/// read once at startup and rewritten on user choice.
pub struct ConsentStore {
    path: PathBuf,
    cached: RwLock<Option<Consent>>,
}

impl ConsentStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| Consent::parse(&raw));
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    pub fn get(&self) -> Option<Consent> {
        self.cached.read().map(|guard| *guard).unwrap_or(None)
    }

    pub fn set(&self, value: Consent) -> Result<()> {
        fs::write(&self.path, value.as_str()).with_context(|| {
            format!("failed to persist consent flag to {}", self.path.display())
        })?;
        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(value);
        }
        Ok(())
    }
}
