/// Sample preparation queue
///
/// Candidate samples start life as GitHub links, one per line, in a
/// "pending" CSV file. Each link maps to a sample folder under `evals/`.
/// Every command takes the head link off the pending file and appends it
/// to one or more record files:
/// - `advance`: checked file
/// - `categorize`: `results/cat_<A|B|C>` and the checked file
/// - `select`: selected links file, then sets up the next sample's folder
/// - `reject`: rejected links file, deletes its sample folder, then sets up the next one
///
/// The pending file is always rewritten before anything is appended, so a
/// failed write can lose a record but never leaves a link both pending and done.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::AppError;
use crate::state::data::Choice;

pub const DEFAULT_PENDING_FILE: &str = "to_check.csv";
pub const DEFAULT_CHECKED_FILE: &str = "checked.csv";
pub const DEFAULT_SELECTED_FILE: &str = "github_links_SELECTED.csv";
pub const DEFAULT_REJECTED_FILE: &str = "github_links_REJECTED.csv";
pub const RESULTS_DIR: &str = "results";

/// Directory that holds one folder per sample
pub const EVALS_DIR: &str = "evals";

/// Empty files a freshly selected sample folder starts with
const SAMPLE_FILES: [&str; 4] = ["buggy", "fixed", "prompt", "response"];

/// Turn a link such as `https://github.com/user/repo/commit/abc/` into
/// the folder name `user-repo-commit-abc`.
pub fn folder_name_from_link(link: &str) -> Option<String> {
    let (_, rest) = link.split_once(".com/")?;
    let rest = rest.trim_end().trim_end_matches('/');
    if rest.is_empty() {
        return None;
    }
    Some(rest.replace('/', "-"))
}

/// `<evals_root>/<folder>` for a link, if it has a recognisable shape
pub fn sample_dir(evals_root: &Path, link: &str) -> Option<PathBuf> {
    folder_name_from_link(link).map(|name| evals_root.join(name))
}

/// One queue operation, as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCommand {
    Peek,
    Advance,
    Categorize(Choice),
    Select,
    Reject,
}

impl QueueCommand {
    pub fn parse(word: &str) -> Result<Self, AppError> {
        match word.to_ascii_lowercase().as_str() {
            "peek" => Ok(QueueCommand::Peek),
            "advance" => Ok(QueueCommand::Advance),
            "a" => Ok(QueueCommand::Categorize(Choice::A)),
            "b" => Ok(QueueCommand::Categorize(Choice::B)),
            "c" => Ok(QueueCommand::Categorize(Choice::C)),
            "select" => Ok(QueueCommand::Select),
            "reject" => Ok(QueueCommand::Reject),
            _ => Err(AppError::Usage(format!(
                "unknown queue command {word:?} (expected peek, advance, a, b, c, select or reject)"
            ))),
        }
    }
}

/// The pending file plus every file and directory the commands write to
#[derive(Debug, Clone)]
pub struct LinkQueue {
    pending: PathBuf,
    checked: PathBuf,
    selected: PathBuf,
    rejected: PathBuf,
    results_dir: PathBuf,
    evals_root: PathBuf,
}

impl LinkQueue {
    /// Queue using the default file names inside `root`
    pub fn in_dir(root: &Path) -> Self {
        Self {
            pending: root.join(DEFAULT_PENDING_FILE),
            checked: root.join(DEFAULT_CHECKED_FILE),
            selected: root.join(DEFAULT_SELECTED_FILE),
            rejected: root.join(DEFAULT_REJECTED_FILE),
            results_dir: root.join(RESULTS_DIR),
            evals_root: root.join(EVALS_DIR),
        }
    }

    pub fn with_pending(mut self, pending: impl Into<PathBuf>) -> Self {
        self.pending = pending.into();
        self
    }

    pub fn with_checked(mut self, checked: impl Into<PathBuf>) -> Self {
        self.checked = checked.into();
        self
    }

    pub fn evals_root(&self) -> &Path {
        &self.evals_root
    }

    fn read_lines(path: &Path) -> Result<Vec<String>, AppError> {
        let content = fs::read_to_string(path)?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    fn append_line(path: &Path, line: &str) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Remove the head link from the pending file.
    /// Returns `(head, new head)`, or `None` when the queue is empty.
    fn take_head(&self) -> Result<Option<(String, Option<String>)>, AppError> {
        let mut lines = Self::read_lines(&self.pending)?;
        if lines.is_empty() {
            return Ok(None);
        }

        let head = lines.remove(0);
        let mut remaining = lines.join("\n");
        if !remaining.is_empty() {
            remaining.push('\n');
        }
        fs::write(&self.pending, remaining)?;

        info!("✅ Took {} off the queue ({} left)", head.trim(), lines.len());
        Ok(Some((head, lines.into_iter().next())))
    }

    /// Link at the head of the queue
    pub fn peek(&self) -> Result<Option<String>, AppError> {
        Ok(Self::read_lines(&self.pending)?.into_iter().next())
    }

    /// Move the head link to the checked file and return the new head.
    /// Does nothing and returns `None` when the queue is already empty.
    pub fn advance(&self) -> Result<Option<String>, AppError> {
        let Some((head, next)) = self.take_head()? else {
            return Ok(None);
        };
        Self::append_line(&self.checked, &head)?;
        Ok(next)
    }

    /// Record the head link under `results/cat_<choice>`, mark it checked,
    /// and return the new head
    pub fn categorize(&self, choice: Choice) -> Result<Option<String>, AppError> {
        let Some((head, next)) = self.take_head()? else {
            return Ok(None);
        };
        let category = self.results_dir.join(format!("cat_{choice}"));
        Self::append_line(&category, &head)?;
        Self::append_line(&self.checked, &head)?;
        info!("📂 Saved to category {}", choice);
        Ok(next)
    }

    /// Keep the head link as a sample and set up the folder of the next one
    pub fn select(&self) -> Result<Option<String>, AppError> {
        let Some((head, next)) = self.take_head()? else {
            return Ok(None);
        };
        Self::append_line(&self.selected, &head)?;
        if let Some(link) = &next {
            self.prepare(link)?;
        }
        Ok(next)
    }

    /// Drop the head link, delete its sample folder, and set up the next one
    pub fn reject(&self) -> Result<Option<String>, AppError> {
        let Some((head, next)) = self.take_head()? else {
            return Ok(None);
        };
        Self::append_line(&self.rejected, &head)?;

        if let Some(dir) = sample_dir(&self.evals_root, &head) {
            if dir.exists() {
                fs::remove_dir_all(&dir)?;
                info!("🗑️  Removed {}", dir.display());
            }
        }

        if let Some(link) = &next {
            self.prepare(link)?;
        }
        Ok(next)
    }

    /// Create `evals/<folder>` with its empty working files.
    /// Files that already exist are left untouched.
    pub fn prepare(&self, link: &str) -> Result<Option<PathBuf>, AppError> {
        let Some(dir) = sample_dir(&self.evals_root, link) else {
            return Ok(None);
        };
        fs::create_dir_all(&dir)?;
        for name in SAMPLE_FILES {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(name))?;
        }
        Ok(Some(dir))
    }

    /// Run one command and return the link now at the head of the queue
    pub fn run(&self, command: QueueCommand) -> Result<Option<String>, AppError> {
        match command {
            QueueCommand::Peek => self.peek(),
            QueueCommand::Advance => self.advance(),
            QueueCommand::Categorize(choice) => self.categorize(choice),
            QueueCommand::Select => self.select(),
            QueueCommand::Reject => self.reject(),
        }
    }
}
