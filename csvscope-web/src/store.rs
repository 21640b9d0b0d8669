//! Upload folder storage
//!
//! A flat directory of uploaded CSV files. No index, metadata or locking:
//! concurrent uploads of the same sanitized name race at the filesystem level
//! and the last writer wins.

use csvscope_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-system backed store of uploaded files
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Wrap an existing directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of stored `.csv` files, in directory-listing order
    ///
    /// The suffix match is case-sensitive. Dotfiles are never listed.
    pub fn list_csv_files(&self) -> Result<Vec<String>> {
        let files: Vec<String> = self
            .list_files()?
            .into_iter()
            .filter(|name| name.ends_with(".csv"))
            .collect();
        debug!("{} CSV file(s) in {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Names of every stored entry except dotfiles, in directory-listing order
    pub fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                files.push(name);
            }
        }
        Ok(files)
    }

    /// Store `content` under the sanitized form of `name`
    ///
    /// Overwrites any existing file with the same sanitized name and returns
    /// the name actually used.
    pub fn save_file(&self, name: &str, content: &[u8]) -> Result<String> {
        let filename = sanitize_filename(name);
        if filename.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Filename {:?} has no usable characters",
                name
            )));
        }

        std::fs::write(self.root.join(&filename), content)?;
        debug!("Stored {} ({} bytes)", filename, content.len());
        Ok(filename)
    }

    /// Full path of a stored file
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

/// Reduce an arbitrary client-supplied filename to a safe flat name
///
/// Non-ASCII characters are dropped, path separators become word breaks,
/// whitespace runs become `_`, anything outside `[A-Za-z0-9_.-]` is removed
/// and leading/trailing `.`/`_` are trimmed. The result can be empty.
///
/// # Examples
/// ```
/// use csvscope_web::store::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My cool data.csv"), "My_cool_data.csv");
/// assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();

    if cfg!(windows) && !trimmed.is_empty() {
        let stem = trimmed.split('.').next().unwrap_or_default().to_ascii_uppercase();
        if WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
            return format!("_{}", trimmed);
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_plain_name_unchanged() {
        assert_eq!(sanitize_filename("data.csv"), "data.csv");
        assert_eq!(sanitize_filename("sales-2024_q1.csv"), "sales-2024_q1.csv");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("/tmp/x.csv"), "tmp_x.csv");
        assert_eq!(sanitize_filename("C:\\Users\\me\\data.csv"), "C_Users_me_data.csv");
    }

    #[test]
    fn test_sanitize_whitespace_and_symbols() {
        assert_eq!(sanitize_filename("  my   file.csv "), "my_file.csv");
        assert_eq!(sanitize_filename("a$b%c.csv"), "abc.csv");
        assert_eq!(sanitize_filename("caf\u{e9}.csv"), "caf.csv");
    }

    #[test]
    fn test_sanitize_trims_dots_and_underscores() {
        assert_eq!(sanitize_filename(".hidden.csv"), "hidden.csv");
        assert_eq!(sanitize_filename("__x.csv__"), "x.csv");
        assert_eq!(sanitize_filename("../.csv"), "csv");
    }

    #[test]
    fn test_sanitize_can_be_empty() {
        assert_eq!(sanitize_filename(""), "");
        assert_eq!(sanitize_filename("../"), "");
        assert_eq!(sanitize_filename("\u{65e5}\u{672c}"), "");
    }

    #[test]
    fn test_save_then_list() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let name = store.save_file("data.csv", b"a,b\n1,2\n").unwrap();
        assert_eq!(name, "data.csv");
        assert_eq!(store.list_csv_files().unwrap(), vec!["data.csv".to_string()]);
        assert_eq!(
            std::fs::read(store.path_of("data.csv")).unwrap(),
            b"a,b\n1,2\n"
        );
    }

    #[test]
    fn test_save_returns_sanitized_name() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let name = store.save_file("../evil name.csv", b"x\n1\n").unwrap();
        assert_eq!(name, "evil_name.csv");
        assert!(dir.path().join("evil_name.csv").exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.save_file("data.csv", b"first").unwrap();
        store.save_file("data.csv", b"second").unwrap();

        assert_eq!(store.list_csv_files().unwrap().len(), 1);
        assert_eq!(std::fs::read(store.path_of("data.csv")).unwrap(), b"second");
    }

    #[test]
    fn test_save_rejects_empty_sanitized_name() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let result = store.save_file("///", b"data");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(store.list_files().unwrap().is_empty());
    }

    #[test]
    fn test_listing_filters() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv"), "x").unwrap();
        std::fs::write(dir.path().join("b.CSV"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join(".hidden.csv"), "x").unwrap();

        let store = FileStore::new(dir.path());

        let mut csv = store.list_csv_files().unwrap();
        csv.sort();
        assert_eq!(csv, vec!["a.csv".to_string()]);

        let mut all = store.list_files().unwrap();
        all.sort();
        assert_eq!(
            all,
            vec!["a.csv".to_string(), "b.CSV".to_string(), "notes.txt".to_string()]
        );
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("does-not-exist"));

        assert!(matches!(store.list_csv_files(), Err(Error::Io(_))));
        assert!(matches!(store.save_file("a.csv", b"x"), Err(Error::Io(_))));
    }
}
