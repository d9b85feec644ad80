use crate::errors::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Source language detected from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Go,
    Java,
    CSharp,
    C,
    Cpp,
    ObjectiveC,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::TypeScript,
        Language::JavaScript,
        Language::Python,
        Language::Rust,
        Language::Go,
        Language::Java,
        Language::CSharp,
        Language::C,
        Language::Cpp,
        Language::ObjectiveC,
    ];

    /// File extensions for this language.
    pub fn extensions(&self) -> &[&str] {
        match self {
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::Python => &["py", "pyi"],
            Language::Rust => &["rs"],
            Language::Go => &["go"],
            Language::Java => &["java"],
            Language::CSharp => &["cs"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cc", "cpp", "cxx", "hh", "hpp", "hxx"],
            Language::ObjectiveC => &["m", "mm"],
        }
    }

    /// Default exclude patterns for this language.
    pub fn default_excludes(&self) -> Vec<String> {
        match self {
            Language::TypeScript => vec!["*.d.ts".to_string()],
            _ => vec![],
        }
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?;
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" | "typescriptreact" | "tsx" => Ok(Language::TypeScript),
            "javascript" | "js" | "javascriptreact" | "jsx" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "rust" | "rs" => Ok(Language::Rust),
            "go" => Ok(Language::Go),
            "java" => Ok(Language::Java),
            "csharp" | "cs" | "c#" => Ok(Language::CSharp),
            "c" => Ok(Language::C),
            "cpp" | "c++" => Ok(Language::Cpp),
            "objective-c" | "objc" => Ok(Language::ObjectiveC),
            _ => Err(format!("unsupported language: {s}")),
        }
    }
}

/// Language identifier used to resolve an import adapter.
impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::ObjectiveC => "objective-c",
        };
        write!(f, "{id}")
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Language and glob selection applied to candidate files.
#[derive(Debug, Clone)]
pub struct PathFilter {
    langs: Vec<Language>,
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl PathFilter {
    /// `langs` empty means every known language. Each language's default
    /// excludes are added to `exclude_patterns`.
    pub fn new(
        langs: &[Language],
        include_patterns: &[String],
        exclude_patterns: &[String],
    ) -> Result<Self> {
        let langs: Vec<Language> = if langs.is_empty() {
            Language::ALL.to_vec()
        } else {
            langs.to_vec()
        };
        let mut excludes = exclude_patterns.to_vec();
        excludes.extend(langs.iter().flat_map(Language::default_excludes));
        let include = if include_patterns.is_empty() {
            None
        } else {
            Some(build_globset(include_patterns)?)
        };
        Ok(Self {
            langs,
            include,
            exclude: build_globset(&excludes)?,
        })
    }

    /// Whether `path` (under `root`) should be analyzed.
    pub fn matches(&self, root: &Path, path: &Path) -> bool {
        if !Language::from_path(path).is_some_and(|lang| self.langs.contains(&lang)) {
            return false;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if self.exclude.is_match(relative) || self.exclude.is_match(path) {
            return false;
        }
        // Patterns like `*.d.ts` match on the file name alone
        if let Some(fname) = path.file_name() {
            if self.exclude.is_match(Path::new(fname)) {
                return false;
            }
        }
        match self.include {
            Some(ref include) => include.is_match(relative) || include.is_match(path),
            None => true,
        }
    }
}

/// Discover source files under `root`.
///
/// - Respects `.gitignore` and `.importsweepignore`
/// - Restricts to `langs` when non-empty, otherwise every known language
/// - Applies include/exclude glob patterns against the root-relative path
/// - Returns sorted paths for deterministic output
pub fn discover_files(
    root: &Path,
    langs: &[Language],
    include_patterns: &[String],
    exclude_patterns: &[String],
) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let filter = PathFilter::new(langs, include_patterns, exclude_patterns)?;

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .filter_entry(|entry| entry.file_name() != ".git")
        .add_custom_ignore_filename(crate::config::IGNORE_FILE_NAME)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!("skipping walk entry: {err}");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && filter.matches(root, path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
