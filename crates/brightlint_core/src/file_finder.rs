use crate::error::LinterError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Resolves command-line patterns to the list of source files to lint.
///
/// A pattern naming an existing file is taken as is, a directory is walked
/// for files with one of the configured extensions, and anything else is
/// treated as a glob matched while walking the base directory. The
/// include/exclude globs from the configuration apply to every result.
pub struct FileFinder {
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
    extensions: Vec<String>,
}

impl FileFinder {
    pub fn new(
        include: &[String],
        exclude: &[String],
        extensions: &[String],
    ) -> Result<Self, LinterError> {
        let include_globs = Self::build_globset(include)?;
        let exclude_globs = Self::build_globset(exclude)?;

        Ok(Self {
            include_globs,
            exclude_globs,
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        })
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LinterError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| LinterError::config(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    /// Checks if a file path should be ignored based on include/exclude patterns.
    pub fn should_ignore(&self, path: &Path) -> bool {
        if self
            .exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(path))
        {
            return true;
        }

        if self
            .include_globs
            .as_ref()
            .is_some_and(|includes| !includes.is_match(path))
        {
            return true;
        }

        false
    }

    /// Returns true if `path` has one of the configured extensions.
    pub fn has_lintable_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }

    pub fn discover_files(
        &self,
        patterns: &[String],
        base_dir: &Path,
    ) -> Result<Vec<PathBuf>, LinterError> {
        let mut files = Vec::new();

        let mut glob_builder = GlobSetBuilder::new();
        let mut has_globs = false;

        for pattern in patterns {
            let path = Path::new(pattern);
            let Ok(metadata) = path.symlink_metadata() else {
                let glob = Glob::new(pattern).map_err(|e| {
                    LinterError::config(format!("Invalid pattern '{}': {}", pattern, e))
                })?;
                glob_builder.add(glob);
                has_globs = true;
                continue;
            };

            if metadata.file_type().is_file() {
                if let Ok(abs_path) = path.canonicalize() {
                    if self.should_ignore(&abs_path) {
                        continue;
                    }

                    files.push(abs_path);
                }
            } else if metadata.file_type().is_dir() {
                debug!("Walking directory {}", path.display());
                self.walk_directory(path, &mut files);
            }
        }

        if has_globs {
            let glob_set = glob_builder
                .build()
                .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

            for entry in WalkDir::new(base_dir).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                let relative = path.strip_prefix(base_dir).unwrap_or(path);
                if entry.file_type().is_file()
                    && (glob_set.is_match(path) || glob_set.is_match(relative))
                {
                    if self.should_ignore(path) {
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();

        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }

    fn walk_directory(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !self.has_lintable_extension(path) {
                continue;
            }
            if let Ok(abs_path) = path.canonicalize()
                && !self.should_ignore(&abs_path)
            {
                files.push(abs_path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn js_extensions() -> Vec<String> {
        vec!["js".to_string(), "mjs".to_string()]
    }

    #[test]
    fn test_build_globset() {
        let patterns = vec!["**/*.js".to_string(), "*.mjs".to_string()];
        let result = FileFinder::build_globset(&patterns);
        assert!(result.is_ok());
        assert!(result.unwrap().is_some());
    }

    #[test]
    fn test_build_globset_empty() {
        let patterns: Vec<String> = vec![];
        let result = FileFinder::build_globset(&patterns);
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_build_globset_invalid_pattern() {
        let patterns = vec!["[invalid".to_string()];
        let result = FileFinder::build_globset(&patterns);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_finder_with_exclude_patterns() {
        let finder = FileFinder::new(&[], &["**/node_modules/**".to_string()], &[]).unwrap();
        assert!(finder.include_globs.is_none());
        assert!(finder.exclude_globs.is_some());
    }

    #[test]
    fn test_extension_matching() {
        let finder = FileFinder::new(&[], &[], &[".js".to_string(), "cjs".to_string()]).unwrap();

        assert!(finder.has_lintable_extension(Path::new("src/a.js")));
        assert!(finder.has_lintable_extension(Path::new("src/a.CJS")));
        assert!(!finder.has_lintable_extension(Path::new("src/a.ts")));
        assert!(!finder.has_lintable_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_discover_files_respects_exclude() {
        let temp_dir = tempdir().unwrap();
        let node_modules = temp_dir.path().join("node_modules");
        fs::create_dir(&node_modules).unwrap();

        fs::write(temp_dir.path().join("index.js"), "a();").unwrap();
        fs::write(node_modules.join("dep.js"), "b();").unwrap();

        let finder = FileFinder::new(&[], &["**/node_modules/**".to_string()], &[]).unwrap();

        let files = finder
            .discover_files(&["**/*.js".to_string()], temp_dir.path())
            .unwrap();

        assert!(files.iter().any(|f| f.ends_with("index.js")));
        assert!(
            !files
                .iter()
                .any(|f| f.to_string_lossy().contains("node_modules"))
        );
    }

    #[test]
    fn test_discover_files_respects_include() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.js"), "a();").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "text").unwrap();

        let finder = FileFinder::new(&["**/*.js".to_string()], &[], &[]).unwrap();

        let files = finder
            .discover_files(&["**/*".to_string()], temp_dir.path())
            .unwrap();

        assert!(files.iter().any(|f| f.ends_with("a.js")));
        assert!(!files.iter().any(|f| f.ends_with("a.txt")));
    }

    #[test]
    fn test_discover_files_walks_directories_by_extension() {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.js"), "a();").unwrap();
        fs::write(src.join("nested").join("b.mjs"), "b();").unwrap();
        fs::write(src.join("c.ts"), "c();").unwrap();

        let finder = FileFinder::new(&[], &[], &js_extensions()).unwrap();

        let files = finder
            .discover_files(&[src.to_string_lossy().into_owned()], temp_dir.path())
            .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.ends_with("a.js")));
        assert!(files.iter().any(|f| f.ends_with("b.mjs")));
    }

    #[test]
    fn test_explicit_file_ignores_extension_filter() {
        let temp_dir = tempdir().unwrap();
        let script = temp_dir.path().join("build.jsx");
        fs::write(&script, "a();").unwrap();

        let finder = FileFinder::new(&[], &[], &js_extensions()).unwrap();

        let files = finder
            .discover_files(&[script.to_string_lossy().into_owned()], temp_dir.path())
            .unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_files_deduplicates() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.js"), "a();").unwrap();

        let finder = FileFinder::new(&[], &[], &[]).unwrap();

        let files = finder
            .discover_files(&["*.js".to_string(), "*.js".to_string()], temp_dir.path())
            .unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_files_invalid_glob() {
        let finder = FileFinder::new(&[], &[], &[]).unwrap();

        let result = finder.discover_files(&["[invalid-glob".to_string()], Path::new("."));
        assert!(result.is_err());
    }
}
