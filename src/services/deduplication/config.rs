//! Deduplication thresholds and named profiles.
//!
//! A [`ThresholdConfig`] is a validated value object passed into every
//! pipeline run. There is no process-wide threshold state, so one engine can
//! serve strategies with different tuning at the same time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Named threshold presets.
///
/// | Profile | Title | Phrase | Window |
/// |---------|-------|--------|--------|
/// | `default` | 0.85 | 0.70 | 72h |
/// | `aggressive` | 0.70 | 0.50 | 168h |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupProfile {
    /// Favors precision: only near-verbatim rewrites are flagged.
    #[default]
    Default,
    /// Favors recall: looser matching over a week-long window.
    Aggressive,
}

impl DedupProfile {
    /// Returns all profiles.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Aggressive]
    }

    /// Returns the profile name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Aggressive => "aggressive",
        }
    }

    /// Parses a profile name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "aggressive" => Some(Self::Aggressive),
            _ => None,
        }
    }

    /// Returns the thresholds this profile stands for.
    #[must_use]
    pub const fn config(self) -> ThresholdConfig {
        match self {
            Self::Default => ThresholdConfig {
                title_similarity_threshold: 0.85,
                phrase_overlap_threshold: 0.70,
                dedup_hours_back: 72,
            },
            Self::Aggressive => ThresholdConfig {
                title_similarity_threshold: 0.70,
                phrase_overlap_threshold: 0.50,
                dedup_hours_back: 168,
            },
        }
    }
}

impl fmt::Display for DedupProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-layer thresholds and the recency window.
///
/// Validated at construction: thresholds must be finite and within
/// `[0, 1]`, the window must be at least one hour. A value of this type is
/// therefore always usable and the pipeline never re-checks it.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `SIGNAL_DEDUP_PROFILE` | string | `default` | Base profile |
/// | `SIGNAL_DEDUP_TITLE_THRESHOLD` | f64 | profile | Layer 3 threshold |
/// | `SIGNAL_DEDUP_PHRASE_THRESHOLD` | f64 | profile | Layer 4 threshold |
/// | `SIGNAL_DEDUP_HOURS_BACK` | u32 | profile | Comparison window in hours |
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::ThresholdConfig;
///
/// let config = ThresholdConfig::default();
/// assert_eq!(config.dedup_hours_back(), 72);
///
/// assert!(ThresholdConfig::new(1.2, 0.5, 24).is_err());
/// assert!(ThresholdConfig::new(0.8, 0.5, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdConfig {
    title_similarity_threshold: f64,
    phrase_overlap_threshold: f64,
    dedup_hours_back: u32,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Deduplication section.
    pub dedup: Option<ConfigFileDedup>,
}

/// `[dedup]` section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDedup {
    /// Base profile name.
    pub profile: Option<String>,
    /// Layer 3 threshold override.
    pub title_similarity_threshold: Option<f64>,
    /// Layer 4 threshold override.
    pub phrase_overlap_threshold: Option<f64>,
    /// Window override in hours.
    pub dedup_hours_back: Option<u32>,
}

impl ThresholdConfig {
    /// Creates a validated configuration.
    pub fn new(
        title_similarity_threshold: f64,
        phrase_overlap_threshold: f64,
        dedup_hours_back: u32,
    ) -> Result<Self> {
        validate_threshold("title_similarity_threshold", title_similarity_threshold)?;
        validate_threshold("phrase_overlap_threshold", phrase_overlap_threshold)?;
        if dedup_hours_back == 0 {
            return Err(Error::InvalidConfig {
                field: "dedup_hours_back".to_string(),
                reason: "window must be at least one hour".to_string(),
            });
        }

        Ok(Self {
            title_similarity_threshold,
            phrase_overlap_threshold,
            dedup_hours_back,
        })
    }

    /// Returns the thresholds of a named profile.
    #[must_use]
    pub const fn for_profile(profile: DedupProfile) -> Self {
        profile.config()
    }

    /// The recall-leaning profile.
    #[must_use]
    pub const fn aggressive() -> Self {
        DedupProfile::Aggressive.config()
    }

    /// Loads configuration from environment variables.
    ///
    /// Starts from `SIGNAL_DEDUP_PROFILE` and applies per-field overrides.
    /// Unlike unset variables, set but unparseable values are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = match lookup("SIGNAL_DEDUP_PROFILE") {
            Some(name) => parse_profile("SIGNAL_DEDUP_PROFILE", &name)?,
            None => DedupProfile::default(),
        };
        let base = profile.config();

        let title = parse_var(&lookup, "SIGNAL_DEDUP_TITLE_THRESHOLD")?
            .unwrap_or(base.title_similarity_threshold);
        let phrase = parse_var(&lookup, "SIGNAL_DEDUP_PHRASE_THRESHOLD")?
            .unwrap_or(base.phrase_overlap_threshold);
        let hours =
            parse_var(&lookup, "SIGNAL_DEDUP_HOURS_BACK")?.unwrap_or(base.dedup_hours_back);

        Self::new(title, phrase, hours)
    }

    /// Loads configuration from a TOML file with a `[dedup]` table.
    ///
    /// A missing table yields the default profile.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_config_file(file)
    }

    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let Some(section) = file.dedup else {
            return Ok(Self::default());
        };

        let profile = match section.profile {
            Some(name) => parse_profile("dedup.profile", &name)?,
            None => DedupProfile::default(),
        };
        let base = profile.config();

        Self::new(
            section
                .title_similarity_threshold
                .unwrap_or(base.title_similarity_threshold),
            section
                .phrase_overlap_threshold
                .unwrap_or(base.phrase_overlap_threshold),
            section.dedup_hours_back.unwrap_or(base.dedup_hours_back),
        )
    }

    /// Returns the Layer 3 threshold.
    #[must_use]
    pub const fn title_similarity_threshold(&self) -> f64 {
        self.title_similarity_threshold
    }

    /// Returns the Layer 4 threshold.
    #[must_use]
    pub const fn phrase_overlap_threshold(&self) -> f64 {
        self.phrase_overlap_threshold
    }

    /// Returns the comparison window in hours.
    #[must_use]
    pub const fn dedup_hours_back(&self) -> u32 {
        self.dedup_hours_back
    }

    /// Returns the comparison window as a `chrono` duration.
    #[must_use]
    pub fn window(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::hours(i64::from(self.dedup_hours_back))
    }

    /// Builder method to set the Layer 3 threshold.
    pub fn with_title_similarity_threshold(self, threshold: f64) -> Result<Self> {
        Self::new(
            threshold,
            self.phrase_overlap_threshold,
            self.dedup_hours_back,
        )
    }

    /// Builder method to set the Layer 4 threshold.
    pub fn with_phrase_overlap_threshold(self, threshold: f64) -> Result<Self> {
        Self::new(
            self.title_similarity_threshold,
            threshold,
            self.dedup_hours_back,
        )
    }

    /// Builder method to set the window.
    pub fn with_dedup_hours_back(self, hours: u32) -> Result<Self> {
        Self::new(
            self.title_similarity_threshold,
            self.phrase_overlap_threshold,
            hours,
        )
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        DedupProfile::Default.config()
    }
}

fn validate_threshold(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field: field.to_string(),
            reason: format!("threshold must be within [0, 1], got {value}"),
        })
    }
}

fn parse_profile(field: &str, name: &str) -> Result<DedupProfile> {
    DedupProfile::parse(name).ok_or_else(|| Error::InvalidConfig {
        field: field.to_string(),
        reason: format!("unknown profile '{name}'"),
    })
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| Error::InvalidConfig {
                field: key.to_string(),
                reason: format!("cannot parse '{raw}': {e}"),
            })
        })
        .transpose()
}
