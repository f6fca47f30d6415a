//! Filesystem persistence and listing of generated agents
//!
//! Files are named `<identifier>_agent.py`. Writes go to a temporary file in
//! the target directory and are renamed into place, so readers never see a
//! partial file and the latest write for an identifier wins.

use crate::collaborators::{ArtifactStore, SavedArtifact};
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use forge_plan::display_name_from_identifier;
use serde::Serialize;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Suffix shared by every persisted agent
pub const ARTIFACT_SUFFIX: &str = "_agent.py";

/// Lines scanned for the docstring header
pub const HEADER_SCAN_LINES: usize = 20;

/// Role shown when a file carries no header
pub const DEFAULT_LISTED_ROLE: &str = "AI agent";

/// Role shown when a file cannot be read
pub const UNREADABLE_ROLE: &str = "Unknown";

/// File name for an identifier
///
/// ```
/// use forge_core::store::artifact_filename;
///
/// assert_eq!(artifact_filename("stock_watcher"), "stock_watcher_agent.py");
/// assert_eq!(artifact_filename(""), "unnamed_agent.py");
/// ```
#[must_use]
pub fn artifact_filename(identifier: &str) -> String {
    let stem = if identifier.is_empty() { "unnamed" } else { identifier };
    format!("{stem}{ARTIFACT_SUFFIX}")
}

/// Name and role recovered from a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    /// Display name
    pub name: String,
    /// Purpose
    pub role: String,
}

/// One listed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedAgentInfo {
    /// File name
    pub filename: String,
    /// Full path
    pub filepath: PathBuf,
    /// Header summary
    pub summary: AgentSummary,
    /// Last modification
    pub modified_at: DateTime<Utc>,
    /// Size on disk
    pub size_bytes: u64,
    /// Line count, 0 if unreadable
    pub lines: usize,
}

/// A page of listed files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Files on this page, most recent first
    pub agents: Vec<GeneratedAgentInfo>,
    /// Files in the store
    pub total: usize,
    /// Directory listed
    pub output_dir: PathBuf,
}

/// Store rooted at one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    output_dir: PathBuf,
}

impl FileStore {
    /// Store writing into `output_dir` (created on first save)
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a given identifier is stored at
    #[must_use]
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.output_dir.join(artifact_filename(identifier))
    }

    /// Page through stored agents, most recently modified first
    ///
    /// A missing directory lists as empty.
    ///
    /// # Errors
    /// [`StoreError::Io`] if the directory or file metadata cannot be read
    pub fn list(&self, offset: usize, limit: usize) -> Result<Listing, StoreError> {
        let mut files = self.artifacts()?;
        files.sort_by(|(a_path, a_time), (b_path, b_time)| {
            b_time.cmp(a_time).then_with(|| a_path.cmp(b_path))
        });
        let total = files.len();

        let agents = files
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(path, modified)| describe(path, modified))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(total, offset, limit, returned = agents.len(), "listed agents");
        Ok(Listing {
            agents,
            total,
            output_dir: self.output_dir.clone(),
        })
    }

    fn artifacts(&self) -> Result<Vec<(PathBuf, SystemTime)>, StoreError> {
        let entries = match fs::read_dir(&self.output_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(&self.output_dir, err)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StoreError::io(&self.output_dir, err))?;
            let path = entry.path();
            let is_artifact = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(ARTIFACT_SUFFIX));
            if !is_artifact {
                continue;
            }
            let metadata = entry.metadata().map_err(|err| StoreError::io(&path, err))?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().map_err(|err| StoreError::io(&path, err))?;
            files.push((path, modified));
        }
        Ok(files)
    }
}

impl ArtifactStore for FileStore {
    fn save(&self, identifier: &str, source: &str) -> Result<SavedArtifact, StoreError> {
        fs::create_dir_all(&self.output_dir).map_err(|err| StoreError::io(&self.output_dir, err))?;

        let filename = artifact_filename(identifier);
        let path = self.output_dir.join(&filename);

        let mut staged = tempfile::NamedTempFile::new_in(&self.output_dir)
            .map_err(|err| StoreError::io(&self.output_dir, err))?;
        staged
            .write_all(source.as_bytes())
            .and_then(|()| staged.flush())
            .map_err(|err| StoreError::io(staged.path(), err))?;
        staged.persist(&path).map_err(|err| StoreError::Persist {
            path: path.clone(),
            source: err.error,
        })?;

        tracing::info!(path = %path.display(), bytes = source.len(), "saved agent");
        Ok(SavedArtifact { filename, path })
    }
}

fn describe(path: PathBuf, modified: SystemTime) -> Result<GeneratedAgentInfo, StoreError> {
    let size_bytes = fs::metadata(&path)
        .map_err(|err| StoreError::io(&path, err))?
        .len();
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = filename.strip_suffix(".py").unwrap_or(&filename).to_string();

    let (summary, lines) = match fs::read_to_string(&path) {
        Ok(content) => (summarize(&content, &stem), content.split('\n').count()),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable agent file");
            (
                AgentSummary {
                    name: stem,
                    role: UNREADABLE_ROLE.to_string(),
                },
                0,
            )
        }
    };

    Ok(GeneratedAgentInfo {
        filename,
        filepath: path,
        summary,
        modified_at: DateTime::<Utc>::from(modified),
        size_bytes,
        lines,
    })
}

/// Recover name and role from the docstring header of a stored file
///
/// `stem` is the file name without `.py`; it provides the fallback name.
#[must_use]
pub fn summarize(content: &str, stem: &str) -> AgentSummary {
    let identifier = stem.strip_suffix("_agent").unwrap_or(stem);
    let mut name = None;
    let mut role = None;
    let mut in_docstring = false;

    for line in content.split('\n').take(HEADER_SCAN_LINES) {
        if line.contains("\"\"\"") {
            if in_docstring {
                break;
            }
            in_docstring = true;
            continue;
        }
        if !in_docstring {
            continue;
        }
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Role:") {
            role = Some(unescape_docstring(value.trim()));
        } else if name.is_none() {
            if let Some((head, _)) = line.rsplit_once(" - ") {
                name = Some(unescape_docstring(head.trim()));
            }
        }
        if name.is_some() && role.is_some() {
            break;
        }
    }

    AgentSummary {
        name: name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| display_name_from_identifier(identifier)),
        role: role
            .filter(|role| !role.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTED_ROLE.to_string()),
    }
}

fn unescape_docstring(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "\"\"\"\nStock Watcher - AI agent generated automatically.\n\nRole: track \\\"hot\\\" stocks\nTools: yfinance\n\"\"\"\n\nimport os\n";

    #[test]
    fn summary_from_header() {
        let summary = summarize(HEADER, "stock_watcher_agent");
        assert_eq!(
            summary,
            AgentSummary {
                name: "Stock Watcher".into(),
                role: "track \"hot\" stocks".into(),
            }
        );
    }

    #[test]
    fn summary_fallback_without_header() {
        let summary = summarize("print('hi')\n", "market_news_agent");
        assert_eq!(summary.name, "Market News");
        assert_eq!(summary.role, DEFAULT_LISTED_ROLE);
    }

    #[test]
    fn role_outside_docstring_ignored() {
        let summary = summarize("# Role: nope\n\"\"\"\nX - y\n\"\"\"\nRole: later\n", "x_agent");
        assert_eq!(summary.name, "X");
        assert_eq!(summary.role, DEFAULT_LISTED_ROLE);
    }

    #[test]
    fn save_then_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("agents"));

        let first = store.save("demo", "print(1)\n").unwrap();
        assert_eq!(first.filename, "demo_agent.py");
        let second = store.save("demo", "print(2)\n").unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(fs::read_to_string(&second.path).unwrap(), "print(2)\n");

        let names: Vec<_> = fs::read_dir(store.output_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1, "no temporary files left behind");
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let listing = FileStore::new(dir.path().join("absent")).list(0, 10).unwrap();
        assert_eq!(listing.total, 0);
        assert!(listing.agents.is_empty());
    }

    #[test]
    fn list_filters_and_paginates() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.save("alpha", HEADER).unwrap();
        store.save("beta", "x = 1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("helper.py"), "ignored").unwrap();

        let listing = store.list(0, 10).unwrap();
        assert_eq!(listing.total, 2);
        let mut names: Vec<_> = listing.agents.iter().map(|a| a.filename.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["alpha_agent.py", "beta_agent.py"]);

        let beta = listing
            .agents
            .iter()
            .find(|a| a.filename == "beta_agent.py")
            .unwrap();
        assert_eq!(beta.lines, 2);
        assert_eq!(beta.size_bytes, 6);
        assert_eq!(beta.summary.name, "Beta");

        let page = store.list(1, 5).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.agents.len(), 1);
        assert!(store.list(2, 5).unwrap().agents.is_empty());
    }
}
