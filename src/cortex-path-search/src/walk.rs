//! Collects the path corpus from a directory tree.

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};

/// Walks `config.root` and returns every regular file as a path string.
///
/// Honors the hidden-file, gitignore, symlink and depth settings, skips
/// `exclude_dirs` entirely and drops anything matching `ignore_patterns`.
/// Entries that cannot be read are skipped.
pub fn collect_paths(config: &SearchConfig) -> SearchResult<Vec<String>> {
    let root = &config.root;
    if !root.exists() {
        return Err(SearchError::root_not_found(root));
    }
    if !root.is_dir() {
        return Err(SearchError::not_a_directory(root));
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(!config.include_hidden)
        .follow_links(config.follow_symlinks)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .max_depth(config.max_depth);

    if !config.ignore_patterns.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in &config.ignore_patterns {
            overrides
                .add(&format!("!{pattern}"))
                .map_err(|e| SearchError::invalid_ignore_pattern(pattern, e.to_string()))?;
        }
        let overrides = overrides.build().map_err(|e| {
            SearchError::invalid_ignore_pattern(config.ignore_patterns.join(", "), e.to_string())
        })?;
        builder.overrides(overrides);
    }

    let filter_config = config.clone();
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if !is_dir || entry.depth() == 0 {
            return true;
        }
        !filter_config.should_exclude_dir(&entry.file_name().to_string_lossy())
    });

    let mut paths = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Error walking directory: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        paths.push(entry.path().to_string_lossy().into_owned());
    }

    tracing::debug!(root = %root.display(), files = paths.len(), "collected paths");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("src/nested/deep.rs"), "").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join("debug.log"), "").unwrap();
        fs::write(root.join(".hidden"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();

        temp
    }

    fn names(paths: &[String]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| crate::index::file_name(p).to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_collect_default() {
        let temp = setup();
        let paths = collect_paths(&SearchConfig::new(temp.path())).unwrap();

        assert_eq!(
            names(&paths),
            vec!["README.md", "debug.log", "deep.rs", "main.rs"]
        );
    }

    #[test]
    fn test_collect_with_options() {
        let temp = setup();
        let config = SearchConfig::builder(temp.path())
            .include_hidden(true)
            .exclude_dirs(Vec::<String>::new())
            .add_ignore_pattern("*.log")
            .build();
        let paths = collect_paths(&config).unwrap();

        assert_eq!(
            names(&paths),
            vec![".hidden", "README.md", "deep.rs", "index.js", "main.rs"]
        );
    }

    #[test]
    fn test_collect_max_depth() {
        let temp = setup();
        let config = SearchConfig::builder(temp.path()).max_depth(2).build();
        let paths = collect_paths(&config).unwrap();

        assert!(!names(&paths).contains(&"deep.rs".to_string()));
        assert!(names(&paths).contains(&"main.rs".to_string()));
    }

    #[test]
    fn test_collect_invalid_root() {
        let err = collect_paths(&SearchConfig::new("/nonexistent/path/for/walk")).unwrap_err();
        assert!(matches!(err, SearchError::RootNotFound(_)));

        let temp = setup();
        let file = temp.path().join("README.md");
        let err = collect_paths(&SearchConfig::new(file)).unwrap_err();
        assert!(matches!(err, SearchError::NotADirectory(_)));
    }

    #[test]
    fn test_collect_invalid_pattern() {
        let temp = setup();
        let config = SearchConfig::builder(temp.path())
            .add_ignore_pattern("src/[")
            .build();

        let err = collect_paths(&config).unwrap_err();
        assert!(matches!(err, SearchError::InvalidIgnorePattern { .. }));
    }
}
