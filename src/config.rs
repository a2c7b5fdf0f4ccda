//! Server settings, loaded from an optional TOML file.
//!
//! `PERIMETR_CONFIG` points at the file; every field is optional. `PORT`
//! from the environment wins over the file.
//!
//! ```toml
//! port = 3000
//! data_dir = "./data"
//! records_key = "geometryRecords"
//! static_dir = "./static"
//! rng_seed = 42        # deterministic tasks, handy for demos
//! session_ttl_secs = 3600
//! max_sessions = 1000
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::records::DEFAULT_RECORDS_KEY;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub port: u16,
  pub data_dir: PathBuf,
  pub records_key: String,
  pub static_dir: PathBuf,
  /// Seed for every session's task generator; entropy when absent.
  pub rng_seed: Option<u64>,
  /// Idle HTTP sessions older than this are dropped.
  pub session_ttl_secs: u64,
  /// Upper bound on live HTTP sessions; the least recently used goes first.
  pub max_sessions: usize,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      port: 3000,
      data_dir: PathBuf::from("./data"),
      records_key: DEFAULT_RECORDS_KEY.to_string(),
      static_dir: PathBuf::from("./static"),
      rng_seed: None,
      session_ttl_secs: 3600,
      max_sessions: 1000,
    }
  }
}

impl Settings {
  pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }

  /// File (if any) plus env overrides. Read or parse errors fall back to defaults.
  pub fn load_from_env() -> Self {
    let mut settings = match std::env::var("PERIMETR_CONFIG") {
      Ok(path) => match std::fs::read_to_string(&path) {
        Ok(s) => match Self::from_toml(&s) {
          Ok(cfg) => {
            info!(target: "perimetr_backend", %path, "Loaded settings (TOML)");
            cfg
          }
          Err(e) => {
            error!(target: "perimetr_backend", %path, error = %e, "Failed to parse TOML settings");
            Self::default()
          }
        },
        Err(e) => {
          error!(target: "perimetr_backend", %path, error = %e, "Failed to read TOML settings file");
          Self::default()
        }
      },
      Err(_) => Self::default(),
    };

    if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
      settings.port = port;
    }
    settings
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_file_keeps_defaults() {
    let s = Settings::from_toml("port = 8080\nrng_seed = 7\n").unwrap();
    assert_eq!(s.port, 8080);
    assert_eq!(s.rng_seed, Some(7));
    assert_eq!(s.records_key, DEFAULT_RECORDS_KEY);
    assert_eq!(s.data_dir, PathBuf::from("./data"));
    assert_eq!((s.session_ttl_secs, s.max_sessions), (3600, 1000));
  }

  #[test]
  fn bad_types_are_rejected() {
    assert!(Settings::from_toml("port = \"eighty\"").is_err());
  }
}
