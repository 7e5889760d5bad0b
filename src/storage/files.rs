//! Article text files
//!
//! Each saved article becomes `<sanitized title>.txt` in the output directory.

use crate::storage::{ArticleStore, SavedArticle, StorageError, StorageResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Maximum length of a file stem, in characters
pub const MAX_STEM_LEN: usize = 180;

/// Maximum length of a file stem, in UTF-8 bytes
///
/// Leaves room for a collision suffix and `.txt` under the usual 255-byte
/// file name limit.
pub const MAX_STEM_BYTES: usize = 200;

/// Turns a title into a safe file stem
///
/// Spaces become underscores, runs of characters other than word characters,
/// `-` and `.` collapse into a single underscore, and the result is truncated
/// to [`MAX_STEM_LEN`] characters or [`MAX_STEM_BYTES`] bytes, whichever is
/// shorter. Truncation never splits a character.
///
/// # Example
///
/// ```
/// use wiki_trawler::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Dog (animal)"), "Dog__animal_");
/// assert_eq!(sanitize_filename("AC/DC"), "AC_DC");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.chars() {
        let c = if c == ' ' { '_' } else { c };

        if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    truncate_stem(&out).to_string()
}

fn truncate_stem(stem: &str) -> &str {
    let end = stem
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take(MAX_STEM_LEN)
        .take_while(|&end| end <= MAX_STEM_BYTES)
        .last()
        .unwrap_or(0);

    &stem[..end]
}

/// Writes articles as UTF-8 text files under one directory
#[derive(Debug)]
pub struct FileArticleStore {
    directory: PathBuf,
    used_names: HashSet<String>,
}

impl FileArticleStore {
    /// Opens a store, creating the directory if needed
    pub fn create(directory: impl Into<PathBuf>) -> StorageResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;

        Ok(Self {
            directory,
            used_names: HashSet::new(),
        })
    }

    /// Picks a file name no other article in this run has used
    fn unique_name(&mut self, stem: &str) -> String {
        let mut candidate = format!("{}.txt", stem);
        let mut suffix = 2;

        while self.used_names.contains(&candidate) {
            candidate = format!("{}_{}.txt", stem, suffix);
            suffix += 1;
        }

        self.used_names.insert(candidate.clone());
        candidate
    }
}

/// Name source for an article: its title, or the last URL path segment
fn stem_source(title: &str, url: &str) -> String {
    let title = title.trim();
    if !title.is_empty() {
        return title.to_string();
    }

    Url::parse(url)
        .ok()
        .and_then(|u| u.path_segments().and_then(|segments| segments.last().map(str::to_string)))
        .unwrap_or_default()
}

impl ArticleStore for FileArticleStore {
    fn save(&mut self, title: &str, url: &str, body: &str) -> StorageResult<SavedArticle> {
        let stem = sanitize_filename(&stem_source(title, url));
        if stem.is_empty() || stem.chars().all(|c| c == '.') {
            return Err(StorageError::InvalidName(title.to_string()));
        }

        let file_name = self.unique_name(&stem);
        let path = self.directory.join(&file_name);
        fs::write(&path, body)?;

        tracing::trace!("Wrote {} bytes to {}", body.len(), path.display());

        Ok(SavedArticle {
            file_name,
            bytes: body.len() as u64,
        })
    }

    fn directory(&self) -> &Path {
        &self.directory
    }
}
