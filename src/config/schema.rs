use serde::Deserialize;

/// TOML-deserializable config file. All fields are Option for layered merging.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: DefaultsFileConfig,
    #[serde(default)]
    pub targeting: TargetingFileConfig,
    #[serde(default)]
    pub baseline: BaselineFileConfig,
    #[serde(default)]
    pub fix: FixFileConfig,
    #[serde(default)]
    pub confidence: ConfidenceFileConfig,
    #[serde(default)]
    pub session: SessionFileConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultsFileConfig {
    pub lang: Option<String>,
    pub format: Option<String>,
    pub quiet: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TargetingFileConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BaselineFileConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FixFileConfig {
    pub safe_mode: Option<bool>,
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfidenceFileConfig {
    pub base: Option<f64>,
    pub side_effect_penalty: Option<f64>,
    pub known_origin_boost: Option<f64>,
    pub unknown_source_penalty: Option<f64>,
    pub unused_code_boost: Option<f64>,
    pub cap: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionFileConfig {
    pub debounce_ms: Option<u64>,
    pub cache_ttl_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
