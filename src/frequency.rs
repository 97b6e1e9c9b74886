use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::time::Duration;

/// Value returned for words missing from the reference table.
pub const MISSING_FREQUENCY: f64 = 0.0;

/// Somewhere the reference word/frequency listing can be fetched from.
pub trait FrequencySource {
    /// Human readable location, used in logs.
    fn describe(&self) -> String;

    /// Fetch the raw `<word> <frequency> ...` listing.
    fn fetch(&self) -> Result<String>;
}

/// Frequency listing stored on the local filesystem (optionally gzipped)
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrequencySource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut reader: Box<dyn Read> =
            if self.path.extension().map_or(false, |ext| ext == "gz") {
                Box::new(BufReader::new(GzDecoder::new(file)))
            } else {
                Box::new(BufReader::new(file))
            };

        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(text)
    }
}

/// Frequency listing served over HTTP
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl FrequencySource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let response = client
            .get(&self.url)
            .send()
            .with_context(|| format!("Request to {} failed", self.url))?
            .error_for_status()?;
        response.text().context("Failed to read response body")
    }
}

/// In-memory listing, handy for tests and embedded tables
pub struct StaticSource(pub String);

impl FrequencySource for StaticSource {
    fn describe(&self) -> String {
        "<static>".to_string()
    }

    fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Pick a file or HTTP source based on how the location looks.
pub fn source_for(location: &str, timeout: Duration) -> Box<dyn FrequencySource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location).with_timeout(timeout))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Fold `-0.0` into `0.0` so equal frequencies compare and print equal
fn canonical(freq: f64) -> f64 {
    freq + 0.0
}

/// Reference-corpus word frequencies, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: HashMap<String, f64>,
}

impl FrequencyTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a whitespace-delimited listing. Lines with fewer than two fields
    /// or an unusable frequency are skipped.
    pub fn parse(text: &str) -> Self {
        Self::parse_counting(text).0
    }

    fn parse_counting(text: &str) -> (Self, usize) {
        let mut entries = HashMap::new();
        let mut skipped = 0;

        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let (word, value) = match (fields.next(), fields.next()) {
                (Some(word), Some(value)) => (word, value),
                (None, _) => continue,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            match value.parse::<f64>() {
                Ok(freq) if freq.is_finite() && freq >= 0.0 => {
                    entries.entry(word.to_string()).or_insert(canonical(freq));
                }
                _ => skipped += 1,
            }
        }

        (Self { entries }, skipped)
    }

    /// Fetch and parse a listing. Never fails: an unreachable source yields
    /// an empty table and every lookup falls back to [`MISSING_FREQUENCY`].
    pub fn load(source: &dyn FrequencySource) -> Self {
        let location = source.describe();
        match source.fetch() {
            Ok(text) => {
                let (table, skipped) = Self::parse_counting(&text);
                tracing::info!(
                    source = %location,
                    entries = table.len(),
                    skipped,
                    "Loaded frequency reference"
                );
                table
            }
            Err(err) => {
                tracing::warn!(
                    source = %location,
                    "Frequency reference unavailable, continuing with empty table: {:#}",
                    err
                );
                Self::empty()
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.entries.get(word).copied()
    }

    /// Frequency for `word`, or [`MISSING_FREQUENCY`] on a miss
    pub fn lookup(&self, word: &str) -> f64 {
        self.get(word).unwrap_or(MISSING_FREQUENCY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(w, f)| (w.into(), canonical(f))).collect(),
        }
    }
}
