use crate::config::ResolvedConfig;
use std::io::Write;

/// Render `config show` output: loaded files, then every setting with the
/// layer it came from.
pub fn render_show<W: Write>(w: &mut W, config: &ResolvedConfig) -> std::io::Result<()> {
    if config.loaded_files.is_empty() {
        writeln!(w, "Loaded config files: (none)")?;
    } else {
        writeln!(w, "Loaded config files:")?;
        for (i, path) in config.loaded_files.iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, path.display())?;
        }
    }
    writeln!(w)?;

    writeln!(w, "Resolved settings:")?;
    for (key, source) in config.provenance.sorted_entries() {
        let value = value_for_key(config, key);
        writeln!(w, "  {key}: {value} <- {source}")?;
    }
    Ok(())
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn value_for_key(config: &ResolvedConfig, key: &str) -> String {
    let weights = &config.confidence;
    match key {
        "defaults.lang" => {
            if config.langs.is_empty() {
                "(all)".to_string()
            } else {
                let langs: Vec<String> = config.langs.iter().map(|l| l.to_string()).collect();
                langs.join(", ")
            }
        }
        "defaults.format" => config.format.to_string(),
        "defaults.quiet" => config.quiet.to_string(),
        "targeting.include" => list(&config.include),
        "targeting.exclude" => list(&config.exclude),
        "baseline.path" => config.baseline_path.display().to_string(),
        "fix.safe_mode" => config.fix.safe_mode.to_string(),
        "fix.min_confidence" => config.fix.min_confidence.to_string(),
        "confidence.base" => weights.base.to_string(),
        "confidence.side_effect_penalty" => weights.side_effect_penalty.to_string(),
        "confidence.known_origin_boost" => weights.known_origin_boost.to_string(),
        "confidence.unknown_source_penalty" => weights.unknown_source_penalty.to_string(),
        "confidence.unused_code_boost" => weights.unused_code_boost.to_string(),
        "confidence.cap" => weights.cap.to_string(),
        "session.debounce_ms" => config.session.debounce_ms.to_string(),
        "session.cache_ttl_ms" => config.session.cache_ttl_ms.to_string(),
        _ => "(unknown)".to_string(),
    }
}
