//! Leaderboard persistence.
//!
//! Records live as one JSON array under a single key of a small key-value
//! store. Every save rewrites the whole blob: append, sort by percentage
//! (descending, stable), keep the best ten.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::domain::Record;

/// Maximum number of records kept.
pub const MAX_RECORDS: usize = 10;

/// Default storage key for the leaderboard blob.
pub const DEFAULT_RECORDS_KEY: &str = "geometryRecords";

/// Minimal string key-value store.
pub trait KvStore {
  fn get(&self, key: &str) -> Result<Option<String>>;
  fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<K: KvStore + ?Sized> KvStore for Box<K> {
  fn get(&self, key: &str) -> Result<Option<String>> {
    (**self).get(key)
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    (**self).set(key, value)
  }
}

/// Process-local store, used by tests and as a fallback when the data dir is unusable.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl KvStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    self.entries.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// One file per key (`<dir>/<key>.json`).
#[derive(Debug, Clone)]
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
    let dir = dir.into();
    fs::create_dir_all(&dir).with_context(|| format!("creating data dir {}", dir.display()))?;
    Ok(Self { dir })
  }

  fn path_for(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{key}.json"))
  }
}

impl KvStore for FileStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let path = self.path_for(key);
    match fs::read_to_string(&path) {
      Ok(s) => Ok(Some(s)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    let path = self.path_for(key);
    // The blob is replaced atomically via rename.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
  }
}

/// Anything a finished level can be reported to.
pub trait RecordSink {
  fn save(&mut self, level: u32, score: u32, total: u32) -> Result<Record>;
}

/// An optional sink; saving without one is an error.
impl<S: RecordSink + ?Sized> RecordSink for Option<&mut S> {
  fn save(&mut self, level: u32, score: u32, total: u32) -> Result<Record> {
    match self {
      Some(sink) => sink.save(level, score, total),
      None => anyhow::bail!("no record store attached"),
    }
  }
}

/// Ranked leaderboard on top of a `KvStore`.
#[derive(Debug)]
pub struct RecordStore<K> {
  kv: K,
  key: String,
}

impl<K: KvStore> RecordStore<K> {
  pub fn new(kv: K, key: impl Into<String>) -> Self {
    Self { kv, key: key.into() }
  }

  /// Stored records in stored order. Missing or corrupt data reads as empty.
  #[instrument(level = "debug", skip(self), fields(key = %self.key))]
  pub fn load_all(&self) -> Vec<Record> {
    match self.kv.get(&self.key) {
      Ok(blob) => decode(blob.as_deref()),
      Err(e) => {
        warn!(target: "records", error = %e, "Failed to read records; treating as empty");
        Vec::new()
      }
    }
  }

  /// Save with an explicit date; `save` uses today's local date.
  #[instrument(level = "info", skip(self), fields(key = %self.key))]
  pub fn save_on(&mut self, level: u32, score: u32, total: u32, date: NaiveDate) -> Result<Record> {
    let record = Record {
      level,
      score,
      total,
      date: format_date(date),
      percentage: percentage(score, total),
    };

    // A failed read must not be mistaken for an empty board and overwritten.
    let mut records = decode(self.kv.get(&self.key)?.as_deref());
    records.push(record.clone());
    records.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    records.truncate(MAX_RECORDS);

    let blob = serde_json::to_string(&records).context("encoding records")?;
    self.kv.set(&self.key, &blob)?;
    info!(target: "records", level, score, total, percentage = record.percentage, kept = records.len(), "Record saved");
    Ok(record)
  }
}

impl<K: KvStore> RecordSink for RecordStore<K> {
  fn save(&mut self, level: u32, score: u32, total: u32) -> Result<Record> {
    self.save_on(level, score, total, chrono::Local::now().date_naive())
  }
}

/// Parse a stored blob; absent or corrupt data is an empty board.
fn decode(blob: Option<&str>) -> Vec<Record> {
  let Some(blob) = blob else {
    return Vec::new();
  };
  match serde_json::from_str::<Vec<Record>>(blob) {
    Ok(records) => records,
    Err(e) => {
      warn!(target: "records", error = %e, "Corrupt records blob; treating as empty");
      Vec::new()
    }
  }
}

/// `round(100 * score / total)`; an empty batch counts as 0%.
pub fn percentage(score: u32, total: u32) -> u32 {
  if total == 0 {
    return 0;
  }
  (100.0 * f64::from(score) / f64::from(total)).round() as u32
}

/// Day/month/year with dots, as the ru-RU locale prints dates.
pub fn format_date(date: NaiveDate) -> String {
  date.format("%d.%m.%Y").to_string()
}
