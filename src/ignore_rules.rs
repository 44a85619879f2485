use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the ignore file looked up in the concatenated directory
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Rules used when the directory has no usable ignore file
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git/",
    "__pycache__/",
    "node_modules/",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    ".Python",
    ".env",
    ".venv/",
    "env/",
    "venv/",
    ".idea/",
    ".vscode/",
];

/// Where the patterns of a rule set came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// Patterns read from an ignore file
    IgnoreFile(PathBuf),
    /// Built-in fallback patterns
    Defaults,
}

/// Compiled gitignore-style patterns, evaluated relative to a base directory.
///
/// Later patterns win over earlier ones, so `!pattern` re-includes a path a
/// previous line excluded. A trailing `/` restricts a pattern to directories.
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    base_dir: PathBuf,
    patterns: Vec<String>,
    source: RuleSource,
    matcher: Gitignore,
}

impl IgnoreRuleSet {
    /// Builds the built-in fallback rule set for `base_dir`
    #[must_use]
    pub fn defaults(base_dir: &Path) -> Self {
        let patterns: Vec<String> = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|p| (*p).to_string())
            .collect();
        let (matcher, patterns) = compile(base_dir, &patterns);
        Self {
            base_dir: base_dir.to_path_buf(),
            patterns,
            source: RuleSource::Defaults,
            matcher,
        }
    }

    /// Builds a rule set from explicit pattern lines.
    ///
    /// Blank lines and `#` comments are dropped and invalid patterns are
    /// skipped with a warning. Returns `None` if nothing usable remains.
    #[must_use]
    pub fn from_lines<'a, I>(base_dir: &Path, lines: I, source: RuleSource) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let candidates: Vec<String> = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(ToString::to_string)
            .collect();

        let (matcher, patterns) = compile(base_dir, &candidates);
        if patterns.is_empty() {
            return None;
        }

        Some(Self {
            base_dir: base_dir.to_path_buf(),
            patterns,
            source,
            matcher,
        })
    }

    /// The patterns that were compiled into this rule set, in order
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn source(&self) -> &RuleSource {
        &self.source
    }

    /// Returns true if `relative_path` (relative to the base directory) is
    /// excluded, either directly or through one of its parent directories.
    #[must_use]
    pub fn is_ignored(&self, relative_path: &Path, is_dir: bool) -> bool {
        if relative_path.as_os_str().is_empty() || relative_path.has_root() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(self.base_dir.join(relative_path), is_dir)
            .is_ignore()
    }

    /// Matches a forward-slash relative path; a trailing `/` marks a directory.
    #[must_use]
    pub fn matches(&self, relative_path: &str) -> bool {
        let is_dir = relative_path.ends_with('/');
        let trimmed = relative_path.trim_end_matches('/');
        self.is_ignored(Path::new(trimmed), is_dir)
    }
}

fn compile(base_dir: &Path, candidates: &[String]) -> (Gitignore, Vec<String>) {
    let mut builder = GitignoreBuilder::new(base_dir);
    let mut accepted = Vec::with_capacity(candidates.len());

    for pattern in candidates {
        match builder.add_line(None, pattern) {
            Ok(_) => accepted.push(pattern.clone()),
            Err(e) => log::warn!("Skipping invalid ignore pattern '{pattern}': {e}"),
        }
    }

    match builder.build() {
        Ok(matcher) => (matcher, accepted),
        Err(e) => {
            log::warn!("Failed to compile ignore patterns: {e}");
            (Gitignore::empty(), Vec::new())
        }
    }
}

/// Loads `<directory>/.gitignore`, falling back to [`DEFAULT_IGNORE_PATTERNS`]
/// when the file is missing, unreadable, or has no usable patterns.
///
/// Never fails: read errors are logged as warnings.
#[must_use]
pub fn load_ignore_rules(directory: &Path) -> IgnoreRuleSet {
    let ignore_path = directory.join(IGNORE_FILE_NAME);

    if ignore_path.exists() {
        match fs::read_to_string(&ignore_path) {
            Ok(contents) => {
                if let Some(rules) = IgnoreRuleSet::from_lines(
                    directory,
                    contents.lines(),
                    RuleSource::IgnoreFile(ignore_path.clone()),
                ) {
                    log::debug!(
                        "Loaded {} ignore patterns from {}",
                        rules.patterns().len(),
                        ignore_path.display()
                    );
                    return rules;
                }
                log::debug!(
                    "{} has no usable patterns, using defaults",
                    ignore_path.display()
                );
            }
            Err(e) => {
                log::warn!("Error reading {}: {e}", ignore_path.display());
            }
        }
    }

    IgnoreRuleSet::defaults(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rules(lines: &[&str]) -> IgnoreRuleSet {
        IgnoreRuleSet::from_lines(
            Path::new("project"),
            lines.iter().copied(),
            RuleSource::Defaults,
        )
        .unwrap()
    }

    #[test]
    fn test_load_falls_back_without_ignore_file() {
        let temp_dir = TempDir::new().unwrap();
        let rules = load_ignore_rules(temp_dir.path());

        assert_eq!(rules.source(), &RuleSource::Defaults);
        assert_eq!(rules.patterns().len(), DEFAULT_IGNORE_PATTERNS.len());
        assert!(rules.matches(".git/"));
        assert!(rules.matches("node_modules/"));
        assert!(rules.matches("pkg/__pycache__/"));
        assert!(rules.matches("pkg/module.pyc"));
        assert!(!rules.matches("pkg/module.py"));
    }

    #[test]
    fn test_load_falls_back_on_comment_only_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(IGNORE_FILE_NAME),
            "# nothing here\n\n   \n#build/\n",
        )
        .unwrap();

        let rules = load_ignore_rules(temp_dir.path());
        assert_eq!(rules.source(), &RuleSource::Defaults);
        assert!(rules.matches("venv/"));
    }

    #[test]
    fn test_load_reads_ignore_file() {
        let temp_dir = TempDir::new().unwrap();
        let ignore_path = temp_dir.path().join(IGNORE_FILE_NAME);
        fs::write(&ignore_path, "# build output\nbuild/\n\n*.log\n").unwrap();

        let rules = load_ignore_rules(temp_dir.path());
        assert_eq!(rules.source(), &RuleSource::IgnoreFile(ignore_path));
        assert_eq!(rules.patterns(), &["build/".to_string(), "*.log".to_string()]);
        assert!(rules.matches("build/"));
        assert!(rules.matches("debug.log"));
        // Defaults are replaced, not merged
        assert!(!rules.matches("node_modules/"));
    }

    #[test]
    fn test_unreadable_ignore_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        // A directory named .gitignore exists but cannot be read as a file
        fs::create_dir(temp_dir.path().join(IGNORE_FILE_NAME)).unwrap();

        let rules = load_ignore_rules(temp_dir.path());
        assert_eq!(rules.source(), &RuleSource::Defaults);
    }

    #[test]
    fn test_directory_only_patterns() {
        let rules = rules(&["build/"]);
        assert!(rules.matches("build/"));
        assert!(rules.matches("nested/build/"));
        assert!(!rules.matches("build"));
        // Files inside an ignored directory are ignored through the parent
        assert!(rules.matches("build/output.js"));
    }

    #[test]
    fn test_wildcards() {
        let rules = rules(&["*.min.js", "docs/**/draft?.md", "/root_only.py"]);
        assert!(rules.matches("app.min.js"));
        assert!(rules.matches("static/app.min.js"));
        assert!(!rules.matches("app.js"));
        assert!(rules.matches("docs/a/b/draft1.md"));
        assert!(!rules.matches("docs/a/b/draft12.md"));
        assert!(rules.matches("root_only.py"));
        assert!(!rules.matches("sub/root_only.py"));
    }

    #[test]
    fn test_negation_reincludes() {
        let rules = rules(&["*.py", "!keep.py"]);
        assert!(rules.matches("drop.py"));
        assert!(!rules.matches("keep.py"));
        assert!(!rules.matches("src/keep.py"));
    }

    #[test]
    fn test_base_dir_name_is_not_part_of_match() {
        // Relative paths sharing a prefix with the base directory name must not be stripped twice
        let rules = rules(&["/project/"]);
        assert!(rules.matches("project/"));
        assert!(!rules.matches("other/project/"));
    }

    #[test]
    fn test_empty_and_absolute_paths_never_match() {
        let rules = rules(&["*"]);
        assert!(!rules.is_ignored(Path::new(""), true));
        assert!(!rules.is_ignored(Path::new("/abs/file.py"), false));
    }

    #[test]
    fn test_indented_hash_lines_are_comments() {
        let rules = rules(&["  #x", "*.log"]);
        assert_eq!(rules.patterns(), &["*.log".to_string()]);
        assert!(!rules.matches("#x"));
    }

    #[test]
    fn test_from_lines_rejects_empty_input() {
        let result = IgnoreRuleSet::from_lines(
            Path::new("."),
            ["", "# comment", "   "],
            RuleSource::Defaults,
        );
        assert!(result.is_none());
    }
}
