use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use crate::error::ConfigError;

lazy_static! {
    static ref SETTING_PATTERN: Regex = Regex::new(r"^\s*(?P<label>[a-z-]+)\s*:\s*(?P<value>[A-Za-z0-9]+)\s*$").unwrap();
}

/// The settings of a simulation
///
/// Field names match the labels used in settings files, e.g. `physical-memory-size`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub physical_memory_size: u32,
    pub frame_size: u32,
    pub memory_latency: u64,
    pub tlb_size: u32,
    pub tlb_latency: u64,
    pub disk_latency: u64,
    #[serde(default, deserialize_with = "deserialize_on_off")]
    pub logging_output: bool,
    pub page_replacement: ReplacementPolicyConfig,
    /// Seeds the random replacement policy, ignored by the others
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// The page replacement policy - random, lru, mru, lfu, fifo, or mfu
///
/// Names are case-insensitive in both settings formats
#[derive(Debug, Copy, Clone, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(try_from = "String")]
pub enum ReplacementPolicyConfig {
    Random,
    Lru,
    Mru,
    Lfu,
    Fifo,
    Mfu,
}

impl ReplacementPolicyConfig {
    /// The name used for the policy in settings files
    pub fn config_name(&self) -> &'static str {
        match self {
            ReplacementPolicyConfig::Random => "RANDOM",
            ReplacementPolicyConfig::Lru => "LRU",
            ReplacementPolicyConfig::Mru => "MRU",
            ReplacementPolicyConfig::Lfu => "LFU",
            ReplacementPolicyConfig::Fifo => "FIFO",
            ReplacementPolicyConfig::Mfu => "MFU",
        }
    }
}

impl FromStr for ReplacementPolicyConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(ReplacementPolicyConfig::Random),
            "lru" => Ok(ReplacementPolicyConfig::Lru),
            "mru" => Ok(ReplacementPolicyConfig::Mru),
            "lfu" => Ok(ReplacementPolicyConfig::Lfu),
            "fifo" => Ok(ReplacementPolicyConfig::Fifo),
            "mfu" => Ok(ReplacementPolicyConfig::Mfu),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReplacementPolicyConfig {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl fmt::Display for ReplacementPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

fn parse_on_off(label: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue { label: label.to_string(), value: value.to_string() }),
    }
}

fn deserialize_on_off<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OnOff {
        Flag(bool),
        Word(String),
    }
    match OnOff::deserialize(deserializer)? {
        OnOff::Flag(flag) => Ok(flag),
        OnOff::Word(word) => parse_on_off("logging-output", &word).map_err(serde::de::Error::custom),
    }
}

fn parse_number<T: FromStr>(label: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue { label: label.to_string(), value: value.to_string() })
}

impl Settings {
    /// Loads settings from a file. Files ending in `.json` are read as JSON, anything else as a
    /// settings file of `label: value` lines
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        if path.extension().is_some_and(|extension| extension == "json") {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Self::from_settings_str(&contents)
        }
    }

    /// Parses the `label: value` settings format
    ///
    /// Blank lines and `#` comments are skipped, as are labels the simulator doesn't use. Logging is
    /// off unless `logging-output` says otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use mmulib::config::{ReplacementPolicyConfig, Settings};
    /// let settings = Settings::from_settings_str("\
    /// physical-memory-size: 65536
    /// frame-size: 4096
    /// memory-latency: 10
    /// page-replacement: lru
    /// tlb-size: 4
    /// tlb-latency: 1
    /// disk-latency: 100
    /// logging-output: off
    /// ").unwrap();
    /// assert_eq!(settings.page_replacement, ReplacementPolicyConfig::Lru);
    /// assert!(!settings.logging_output);
    /// ```
    pub fn from_settings_str(input: &str) -> Result<Self, ConfigError> {
        let mut physical_memory_size = None;
        let mut frame_size = None;
        let mut memory_latency = None;
        let mut tlb_size = None;
        let mut tlb_latency = None;
        let mut disk_latency = None;
        let mut logging_output = None;
        let mut page_replacement = None;
        let mut random_seed = None;

        for line in input.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let captures = SETTING_PATTERN
                .captures(trimmed)
                .ok_or_else(|| ConfigError::MalformedLine(line.to_string()))?;
            let label = &captures["label"];
            let value = &captures["value"];
            match label {
                "physical-memory-size" => physical_memory_size = Some(parse_number(label, value)?),
                "frame-size" => frame_size = Some(parse_number(label, value)?),
                "memory-latency" => memory_latency = Some(parse_number(label, value)?),
                "tlb-size" => tlb_size = Some(parse_number(label, value)?),
                "tlb-latency" => tlb_latency = Some(parse_number(label, value)?),
                "disk-latency" => disk_latency = Some(parse_number(label, value)?),
                "logging-output" => logging_output = Some(parse_on_off(label, value)?),
                "page-replacement" => page_replacement = Some(value.parse()?),
                "random-seed" => random_seed = Some(parse_number(label, value)?),
                _ => {}
            }
        }

        Ok(Settings {
            physical_memory_size: physical_memory_size.ok_or(ConfigError::MissingSetting("physical-memory-size"))?,
            frame_size: frame_size.ok_or(ConfigError::MissingSetting("frame-size"))?,
            memory_latency: memory_latency.ok_or(ConfigError::MissingSetting("memory-latency"))?,
            tlb_size: tlb_size.ok_or(ConfigError::MissingSetting("tlb-size"))?,
            tlb_latency: tlb_latency.ok_or(ConfigError::MissingSetting("tlb-latency"))?,
            disk_latency: disk_latency.ok_or(ConfigError::MissingSetting("disk-latency"))?,
            logging_output: logging_output.unwrap_or_default(),
            page_replacement: page_replacement.ok_or(ConfigError::MissingSetting("page-replacement"))?,
            random_seed,
        })
    }
}
