use crate::config::provenance::{ProvenanceMap, Source};
use crate::config::schema::FileConfig;
use crate::config::{ResolvedConfig, PROJECT_CONFIG_FILE_NAME};
use crate::errors::{ImportSweepError, Result};
use crate::output::OutputFormat;
use crate::walk::Language;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// CLI overrides extracted from command arguments.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub langs: Vec<Language>,
    pub format: Option<OutputFormat>,
    pub quiet: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub baseline_path: Option<PathBuf>,
    pub aggressive: bool,
    pub min_confidence: Option<f64>,
}

/// Resolve configuration by applying layers bottom-up:
/// 1. Built-in defaults
/// 2. User config (~/.config/importsweep/config.toml)
/// 3. Project config (nearest .importsweep.toml walking up from working_dir)
/// 4. Environment variables
/// 5. CLI overrides
pub fn resolve_config(working_dir: &Path, cli: &CliOverrides) -> Result<ResolvedConfig> {
    let mut config = ResolvedConfig::default();
    let mut prov = ProvenanceMap::new();
    let mut loaded_files = Vec::new();

    set_all_default_provenance(&mut prov);

    if let Some(user_config_path) = find_user_config() {
        if user_config_path.exists() {
            let file_config = load_file_config(&user_config_path, "user")?;
            apply_file_config(
                &mut config,
                &file_config,
                Source::UserConfig(user_config_path.clone()),
                &mut prov,
            );
            loaded_files.push(user_config_path);
        }
    }

    if let Some(project_config_path) = find_project_config(working_dir) {
        let file_config = load_file_config(&project_config_path, "project")?;
        apply_file_config(
            &mut config,
            &file_config,
            Source::ProjectConfig(project_config_path.clone()),
            &mut prov,
        );
        loaded_files.push(project_config_path);
    }

    apply_env_vars(&mut config, &mut prov);
    apply_cli_overrides(&mut config, cli, &mut prov);

    config.provenance = prov;
    config.loaded_files = loaded_files;
    Ok(config)
}

fn load_file_config(path: &Path, layer: &str) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|_| {
        ImportSweepError::Config(format!("Could not read {layer} config: {}", path.display()))
    })?;
    FileConfig::from_toml(&content)
        .map_err(|e| ImportSweepError::Config(format!("Invalid {layer} config: {e}")))
}

fn find_user_config() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("importsweep").join("config.toml"))
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(PROJECT_CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Stable anchor for project-relative paths: the nearest directory holding
/// `.importsweep.toml`, else the nearest git checkout, else the current
/// directory when `start` lies inside it, else `start` itself.
pub fn project_root(start: &Path) -> PathBuf {
    if let Some(dir) = find_project_config(start).and_then(|p| p.parent().map(Path::to_path_buf)) {
        return dir;
    }
    if let Some(dir) = start.ancestors().find(|dir| dir.join(".git").exists()) {
        return dir.to_path_buf();
    }
    std::env::current_dir()
        .and_then(|cwd| cwd.canonicalize())
        .ok()
        .filter(|cwd| start.starts_with(cwd))
        .unwrap_or_else(|| start.to_path_buf())
}

fn set_all_default_provenance(prov: &mut ProvenanceMap) {
    let defaults = [
        "defaults.lang",
        "defaults.format",
        "defaults.quiet",
        "targeting.include",
        "targeting.exclude",
        "baseline.path",
        "fix.safe_mode",
        "fix.min_confidence",
        "confidence.base",
        "confidence.side_effect_penalty",
        "confidence.known_origin_boost",
        "confidence.unknown_source_penalty",
        "confidence.unused_code_boost",
        "confidence.cap",
        "session.debounce_ms",
        "session.cache_ttl_ms",
    ];
    for key in defaults {
        prov.set(key, Source::Default);
    }
}

fn parse_langs(value: &str) -> Vec<Language> {
    value
        .split(',')
        .filter_map(|l| match l.trim().parse::<Language>() {
            Ok(lang) => Some(lang),
            Err(e) => {
                tracing::warn!("ignoring language {l:?}: {e}");
                None
            }
        })
        .collect()
}

fn parse_format(value: &str) -> Option<OutputFormat> {
    match OutputFormat::from_str(value, true) {
        Ok(format) => Some(format),
        Err(e) => {
            tracing::warn!("ignoring output format {value:?}: {e}");
            None
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn apply_file_config(
    config: &mut ResolvedConfig,
    file: &FileConfig,
    source: Source,
    prov: &mut ProvenanceMap,
) {
    // Defaults
    if let Some(ref lang) = file.defaults.lang {
        let langs = parse_langs(lang);
        if !langs.is_empty() {
            config.langs = langs;
            prov.set("defaults.lang", source.clone());
        }
    }
    if let Some(format) = file.defaults.format.as_deref().and_then(parse_format) {
        config.format = format;
        prov.set("defaults.format", source.clone());
    }
    if let Some(quiet) = file.defaults.quiet {
        config.quiet = quiet;
        prov.set("defaults.quiet", source.clone());
    }

    // Targeting
    if !file.targeting.include.is_empty() {
        config.include = file.targeting.include.clone();
        prov.set("targeting.include", source.clone());
    }
    if !file.targeting.exclude.is_empty() {
        config.exclude = file.targeting.exclude.clone();
        prov.set("targeting.exclude", source.clone());
    }

    if let Some(ref path) = file.baseline.path {
        config.baseline_path = PathBuf::from(path);
        prov.set("baseline.path", source.clone());
    }

    // Fix
    if let Some(safe_mode) = file.fix.safe_mode {
        config.fix.safe_mode = safe_mode;
        prov.set("fix.safe_mode", source.clone());
    }
    if let Some(min_confidence) = file.fix.min_confidence {
        config.fix.min_confidence = min_confidence;
        prov.set("fix.min_confidence", source.clone());
    }

    // Confidence weights
    let weights = &mut config.confidence;
    let c = &file.confidence;
    for (key, value, slot) in [
        ("confidence.base", c.base, &mut weights.base),
        (
            "confidence.side_effect_penalty",
            c.side_effect_penalty,
            &mut weights.side_effect_penalty,
        ),
        (
            "confidence.known_origin_boost",
            c.known_origin_boost,
            &mut weights.known_origin_boost,
        ),
        (
            "confidence.unknown_source_penalty",
            c.unknown_source_penalty,
            &mut weights.unknown_source_penalty,
        ),
        (
            "confidence.unused_code_boost",
            c.unused_code_boost,
            &mut weights.unused_code_boost,
        ),
        ("confidence.cap", c.cap, &mut weights.cap),
    ] {
        if let Some(value) = value {
            *slot = value;
            prov.set(key, source.clone());
        }
    }

    // Session
    if let Some(debounce_ms) = file.session.debounce_ms {
        config.session.debounce_ms = debounce_ms;
        prov.set("session.debounce_ms", source.clone());
    }
    if let Some(cache_ttl_ms) = file.session.cache_ttl_ms {
        config.session.cache_ttl_ms = cache_ttl_ms;
        prov.set("session.cache_ttl_ms", source);
    }
}

fn apply_env_vars(config: &mut ResolvedConfig, prov: &mut ProvenanceMap) {
    if let Some(format) = std::env::var("IMPORTSWEEP_FORMAT")
        .ok()
        .and_then(|val| parse_format(&val))
    {
        config.format = format;
        prov.set("defaults.format", Source::EnvVar("IMPORTSWEEP_FORMAT".into()));
    }
    if let Ok(val) = std::env::var("IMPORTSWEEP_LANG") {
        let langs = parse_langs(&val);
        if !langs.is_empty() {
            config.langs = langs;
            prov.set("defaults.lang", Source::EnvVar("IMPORTSWEEP_LANG".into()));
        }
    }
    if let Ok(val) = std::env::var("IMPORTSWEEP_QUIET") {
        config.quiet = parse_flag(&val);
        prov.set("defaults.quiet", Source::EnvVar("IMPORTSWEEP_QUIET".into()));
    }
    if let Ok(val) = std::env::var("IMPORTSWEEP_INCLUDE") {
        config.include = split_list(&val);
        prov.set("targeting.include", Source::EnvVar("IMPORTSWEEP_INCLUDE".into()));
    }
    if let Ok(val) = std::env::var("IMPORTSWEEP_EXCLUDE") {
        config.exclude = split_list(&val);
        prov.set("targeting.exclude", Source::EnvVar("IMPORTSWEEP_EXCLUDE".into()));
    }
    if let Ok(val) = std::env::var("IMPORTSWEEP_BASELINE") {
        config.baseline_path = PathBuf::from(val);
        prov.set("baseline.path", Source::EnvVar("IMPORTSWEEP_BASELINE".into()));
    }
    if let Ok(val) = std::env::var("IMPORTSWEEP_MIN_CONFIDENCE") {
        match val.parse::<f64>() {
            Ok(n) => {
                config.fix.min_confidence = n;
                prov.set(
                    "fix.min_confidence",
                    Source::EnvVar("IMPORTSWEEP_MIN_CONFIDENCE".into()),
                );
            }
            Err(e) => tracing::warn!("ignoring IMPORTSWEEP_MIN_CONFIDENCE={val:?}: {e}"),
        }
    }
}

fn apply_cli_overrides(config: &mut ResolvedConfig, cli: &CliOverrides, prov: &mut ProvenanceMap) {
    if !cli.langs.is_empty() {
        config.langs = cli.langs.clone();
        prov.set("defaults.lang", Source::CliFlag("--lang".into()));
    }
    if let Some(format) = cli.format {
        config.format = format;
        prov.set("defaults.format", Source::CliFlag("--format".into()));
    }
    if cli.quiet {
        config.quiet = true;
        prov.set("defaults.quiet", Source::CliFlag("--quiet".into()));
    }
    if !cli.include.is_empty() {
        config.include = cli.include.clone();
        prov.set("targeting.include", Source::CliFlag("--include".into()));
    }
    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude.clone();
        prov.set("targeting.exclude", Source::CliFlag("--exclude".into()));
    }
    if let Some(ref path) = cli.baseline_path {
        config.baseline_path = path.clone();
        prov.set("baseline.path", Source::CliFlag("--baseline-path".into()));
    }
    if cli.aggressive {
        config.fix.safe_mode = false;
        prov.set("fix.safe_mode", Source::CliFlag("--aggressive".into()));
    }
    if let Some(min_confidence) = cli.min_confidence {
        config.fix.min_confidence = min_confidence;
        prov.set("fix.min_confidence", Source::CliFlag("--min-confidence".into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_only() {
        let dir = PathBuf::from("/nonexistent");
        let config = resolve_config(&dir, &CliOverrides::default()).unwrap();

        assert!(config.fix.safe_mode);
        assert_eq!(config.fix.min_confidence, 0.0);
        assert_eq!(config.confidence.base, 0.9);
        assert_eq!(config.session.debounce_ms, 500);
        assert_eq!(config.session.cache_ttl_ms, 5000);
        assert_eq!(
            config.baseline_path,
            PathBuf::from(".importsweep-baseline.json")
        );
    }

    #[test]
    fn project_config_applied() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(".importsweep.toml"),
            r#"
[defaults]
format = "github"
lang = "python,go"

[fix]
min_confidence = 0.75

[confidence]
side_effect_penalty = 0.5
"#,
        )
        .unwrap();

        let config = resolve_config(tmp.path(), &CliOverrides::default()).unwrap();
        assert_eq!(config.format, OutputFormat::Github);
        assert_eq!(config.langs, vec![Language::Python, Language::Go]);
        assert_eq!(config.fix.min_confidence, 0.75);
        assert_eq!(config.confidence.side_effect_penalty, 0.5);
        assert_eq!(config.confidence.base, 0.9);
        assert_eq!(config.loaded_files.len(), 1);
        assert!(matches!(
            config.provenance.get("confidence.side_effect_penalty"),
            Some(Source::ProjectConfig(_))
        ));
    }

    #[test]
    fn project_config_found_from_subdirectory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(".importsweep.toml"),
            "[baseline]\npath = \"ci/baseline.json\"\n",
        )
        .unwrap();
        let nested = tmp.path().join("src").join("pkg");
        std::fs::create_dir_all(&nested).unwrap();

        let config = resolve_config(&nested, &CliOverrides::default()).unwrap();
        assert_eq!(config.baseline_path, PathBuf::from("ci/baseline.json"));
        assert_eq!(
            config.baseline_path_for(Path::new("/repo")),
            PathBuf::from("/repo/ci/baseline.json")
        );
    }

    #[test]
    fn project_root_prefers_config_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join("app/src")).unwrap();
        std::fs::create_dir(root.join(".git")).unwrap();
        assert_eq!(project_root(&root.join("app/src")), root);

        std::fs::write(root.join("app/.importsweep.toml"), "").unwrap();
        assert_eq!(project_root(&root.join("app/src")), root.join("app"));
        assert_eq!(project_root(&root.join("app")), root.join("app"));
    }

    #[test]
    fn cli_overrides_project_config() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(".importsweep.toml"),
            "[defaults]\nformat = \"text\"\n\n[fix]\nsafe_mode = true\n",
        )
        .unwrap();

        let cli = CliOverrides {
            format: Some(OutputFormat::Json),
            aggressive: true,
            ..Default::default()
        };
        let config = resolve_config(tmp.path(), &cli).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.fix.safe_mode);
        assert!(matches!(
            config.provenance.get("fix.safe_mode"),
            Some(Source::CliFlag(_))
        ));
    }

    #[test]
    fn invalid_project_config_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".importsweep.toml"), "[fix\n").unwrap();
        let err = resolve_config(tmp.path(), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, ImportSweepError::Config(_)));
    }
}
