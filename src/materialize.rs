use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{EntryError, Result, ScaffoldError};
use crate::path::RelativePath;

/// What to do about content that already exists under the target root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// An existing root fails the run before anything is written.
    #[default]
    FailIfRootExists,
    /// The root may exist; files already on disk are left alone.
    SkipExisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    SkippedExists,
}

/// Writes resolved entries under a root directory.
///
/// Every path claimed during the run is remembered, so a second entry
/// resolving to the same path fails with [`EntryError::DuplicateEntry`]
/// instead of overwriting the first. Directories this run creates as
/// parents are remembered too; they never count as pre-existing.
pub struct TreeMaterializer {
    root: PathBuf,
    policy: CollisionPolicy,
    dry_run: bool,
    claimed: HashSet<RelativePath>,
    created_dirs: HashSet<String>,
}

impl TreeMaterializer {
    pub fn new(root: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
            dry_run: false,
            claimed: HashSet::new(),
            created_dirs: HashSet::new(),
        }
    }

    /// In a dry run all bookkeeping happens but nothing touches the disk.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enforce the root-existence half of the collision policy.
    pub fn check_root(&self) -> Result<()> {
        if self.policy == CollisionPolicy::FailIfRootExists && self.root.exists() {
            return Err(ScaffoldError::RootAlreadyExists {
                path: self.root.clone(),
            });
        }
        Ok(())
    }

    /// Create the root directory itself. A no-op in dry runs.
    pub fn prepare_root(&self) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        std::fs::create_dir_all(&self.root).map_err(|e| ScaffoldError::Io {
            context: format!("creating target root {}", self.root.display()),
            source: e,
        })
    }

    /// Write `content` to `path`, creating any missing parent directories.
    pub fn write_file(
        &mut self,
        path: &RelativePath,
        content: &[u8],
    ) -> std::result::Result<WriteOutcome, EntryError> {
        self.write(path, content, false)
    }

    /// Like [`write_file`](Self::write_file), then mark the file executable.
    /// Skipped files keep their mode.
    pub fn write_executable(
        &mut self,
        path: &RelativePath,
        content: &[u8],
    ) -> std::result::Result<WriteOutcome, EntryError> {
        self.write(path, content, true)
    }

    fn write(
        &mut self,
        path: &RelativePath,
        content: &[u8],
        executable: bool,
    ) -> std::result::Result<WriteOutcome, EntryError> {
        self.claim_check(path)?;
        let dest = self.root.join(path.to_host());

        if let Some(outcome) = self.skip_if_present(path, &dest)? {
            return Ok(outcome);
        }

        self.note_new_ancestors(path);
        if !self.dry_run {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| EntryError::io(path.as_slash_string(), &e))?;
            }
            std::fs::write(&dest, content).map_err(|e| EntryError::io(path.as_slash_string(), &e))?;
            if executable {
                set_executable(&dest).map_err(|e| EntryError::io(path.as_slash_string(), &e))?;
            }
        }

        self.claimed.insert(path.clone());
        Ok(WriteOutcome::Created)
    }

    /// Create the directory `path` (and its parents). Existing directories are fine.
    pub fn create_dir(&mut self, path: &RelativePath) -> std::result::Result<WriteOutcome, EntryError> {
        self.claim_check(path)?;
        let dest = self.root.join(path.to_host());

        if let Some(outcome) = self.skip_if_present(path, &dest)? {
            return Ok(outcome);
        }

        self.note_new_ancestors(path);
        if !self.dry_run {
            std::fs::create_dir_all(&dest).map_err(|e| EntryError::io(path.as_slash_string(), &e))?;
        }

        self.claimed.insert(path.clone());
        Ok(WriteOutcome::Created)
    }

    fn claim_check(&self, path: &RelativePath) -> std::result::Result<(), EntryError> {
        if self.claimed.contains(path) {
            return Err(EntryError::DuplicateEntry {
                path: path.as_slash_string(),
            });
        }
        self.reject_symlinked_ancestors(path)
    }

    fn skip_if_present(
        &mut self,
        path: &RelativePath,
        dest: &Path,
    ) -> std::result::Result<Option<WriteOutcome>, EntryError> {
        let created_here = self.created_dirs.contains(&path.as_slash_string());
        if self.policy == CollisionPolicy::SkipExisting
            && !created_here
            && dest.symlink_metadata().is_ok()
        {
            self.claimed.insert(path.clone());
            return Ok(Some(WriteOutcome::SkippedExists));
        }
        Ok(None)
    }

    /// Remember the parents of `path` that do not exist yet and are about
    /// to be created (or, in a dry run, would be).
    fn note_new_ancestors(&mut self, path: &RelativePath) {
        let segments = path.segments();
        let mut host = self.root.clone();
        for depth in 1..segments.len() {
            host.push(&segments[depth - 1]);
            let rel = segments[..depth].join("/");
            if self.created_dirs.contains(&rel) || host.symlink_metadata().is_err() {
                self.created_dirs.insert(rel);
            }
        }
    }

    /// A pre-existing symlink inside the root could redirect a write outside it.
    fn reject_symlinked_ancestors(&self, path: &RelativePath) -> std::result::Result<(), EntryError> {
        let mut current = self.root.clone();
        let segments = path.segments();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            current.push(segment);
            match current.symlink_metadata() {
                Ok(meta) if meta.file_type().is_symlink() => {
                    return Err(EntryError::PathTraversal {
                        entry: path.as_slash_string(),
                    });
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    std::fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
