use crate::parse::c_family::CFamilyGrammar;
use crate::parse::csharp::CSharpGrammar;
use crate::parse::generic::GenericGrammar;
use crate::parse::go::GoGrammar;
use crate::parse::java::JavaGrammar;
use crate::parse::python::PythonGrammar;
use crate::parse::rust::RustGrammar;
use crate::parse::typescript::TypeScriptGrammar;
use crate::parse::ImportGrammar;
use crate::walk::Language;
use std::path::Path;
use std::sync::Arc;

/// Import grammar adapters keyed by language identifier.
///
/// Later registrations take priority, so callers can override a built-in
/// adapter. The generic catch-all is always present as the lowest-priority
/// entry.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn ImportGrammar>>,
}

impl AdapterRegistry {
    /// Registry holding only the generic fallback.
    pub fn new() -> Self {
        Self {
            adapters: vec![Arc::new(GenericGrammar)],
        }
    }

    /// Registry with every bundled adapter.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CFamilyGrammar));
        registry.register(Arc::new(CSharpGrammar));
        registry.register(Arc::new(JavaGrammar));
        registry.register(Arc::new(GoGrammar));
        registry.register(Arc::new(RustGrammar));
        registry.register(Arc::new(PythonGrammar));
        registry.register(Arc::new(TypeScriptGrammar));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn ImportGrammar>) {
        tracing::debug!(adapter = adapter.id(), "registering import grammar");
        self.adapters.push(adapter);
    }

    /// Adapter for `language_id`, or the highest-priority catch-all when no
    /// adapter claims the identifier.
    pub fn resolve(&self, language_id: &str) -> Arc<dyn ImportGrammar> {
        let wanted = language_id.to_lowercase();
        let exact = self
            .adapters
            .iter()
            .rev()
            .find(|a| a.language_ids().contains(&wanted.as_str()));
        let chosen = exact.or_else(|| {
            self.adapters
                .iter()
                .rev()
                .find(|a| a.language_ids().contains(&"*"))
        });
        match chosen {
            Some(adapter) => Arc::clone(adapter),
            None => Arc::new(GenericGrammar),
        }
    }

    /// Adapter for a file, chosen by extension.
    pub fn for_path(&self, path: &Path) -> Arc<dyn ImportGrammar> {
        match Language::from_path(path) {
            Some(lang) => self.resolve(&lang.to_string()),
            None => self.resolve("*"),
        }
    }

    /// Registered adapters, highest priority first.
    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn ImportGrammar>> {
        self.adapters.iter().rev()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.adapters().map(|a| a.id()).collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::common::ImportRecord;

    #[test]
    fn resolves_builtin_languages() {
        let registry = AdapterRegistry::with_builtin();
        assert_eq!(registry.resolve("typescriptreact").id(), "typescript");
        assert_eq!(registry.resolve("Python").id(), "python");
        assert_eq!(registry.resolve("cpp").id(), "c-family");
        assert_eq!(registry.resolve("haskell").id(), "generic");
    }

    #[test]
    fn resolves_by_extension() {
        let registry = AdapterRegistry::with_builtin();
        assert_eq!(registry.for_path(Path::new("main.go")).id(), "go");
        assert_eq!(registry.for_path(Path::new("App.cs")).id(), "csharp");
        assert_eq!(registry.for_path(Path::new("build.gradle")).id(), "generic");
    }

    struct LoudPython;

    impl ImportGrammar for LoudPython {
        fn id(&self) -> &'static str {
            "loud-python"
        }
        fn language_ids(&self) -> &'static [&'static str] {
            &["python"]
        }
        fn recognizes_statement(&self, line: &str) -> bool {
            line.starts_with("import ")
        }
        fn parse(&self, _: &str, _: usize, _: Option<usize>) -> Option<ImportRecord> {
            None
        }
        fn side_effect_hint(&self, _: &ImportRecord) -> bool {
            true
        }
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = AdapterRegistry::with_builtin();
        registry.register(Arc::new(LoudPython));
        assert_eq!(registry.resolve("python").id(), "loud-python");
        assert_eq!(registry.ids().first(), Some(&"loud-python"));
        assert_eq!(registry.ids().last(), Some(&"generic"));
    }

    #[test]
    fn empty_registry_falls_back_to_generic() {
        let registry = AdapterRegistry::new();
        assert_eq!(registry.resolve("rust").id(), "generic");
    }
}
