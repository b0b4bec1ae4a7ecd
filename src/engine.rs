use std::path::PathBuf;

use crate::catalog::{EntryKind, TemplateCatalog};
use crate::error::{Result, ScaffoldError};
use crate::hooks::{run_hook, CommandRunner, ExternalCommand, SystemRunner};
use crate::manifest::{digest, CreationManifest, ManifestRecord, Outcome, RunStatus};
use crate::materialize::{CollisionPolicy, TreeMaterializer, WriteOutcome};
use crate::params::ParameterSet;
use crate::plan::{plan_entries, PlannedEntry};

/// Lifecycle of a single scaffold run. Terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    CheckingRoot,
    Materializing,
    Completed,
    Failed,
}

/// Which post-scaffold command, if any, runs after a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HookSetting {
    /// Use the catalog's `hook`, if it declares one.
    #[default]
    FromCatalog,
    Disabled,
    Command(ExternalCommand),
}

#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    pub policy: CollisionPolicy,
    pub dry_run: bool,
    pub hook: HookSetting,
}

pub struct ScaffoldReport {
    pub root: PathBuf,
    pub status: RunStatus,
    pub manifest: CreationManifest,
    pub dry_run: bool,
}

/// Drives one scaffold run of a catalog into a target root.
///
/// An engine runs once; callers that need another run build another engine.
pub struct ScaffoldEngine<'a> {
    catalog: &'a TemplateCatalog,
    params: &'a ParameterSet,
    root: PathBuf,
    options: ScaffoldOptions,
    runner: Box<dyn CommandRunner + 'a>,
    state: RunState,
}

impl<'a> ScaffoldEngine<'a> {
    pub fn new(catalog: &'a TemplateCatalog, params: &'a ParameterSet, root: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            params,
            root: root.into(),
            options: ScaffoldOptions::default(),
            runner: Box::new(SystemRunner),
            state: RunState::NotStarted,
        }
    }

    pub fn with_options(mut self, options: ScaffoldOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the runner used for the post-scaffold hook.
    pub fn with_runner(mut self, runner: impl CommandRunner + 'a) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "scaffold state change");
        self.state = next;
    }

    /// Check the root, materialize every entry, then run the hook.
    ///
    /// Only a pre-flight problem (existing root, unusable root) is returned
    /// as `Err`; entry failures are recorded in the manifest and make the
    /// report's status [`RunStatus::Failed`].
    pub fn run(&mut self) -> Result<ScaffoldReport> {
        if self.state != RunState::NotStarted {
            return Err(ScaffoldError::AlreadyRun);
        }

        self.transition(RunState::CheckingRoot);
        let mut materializer = TreeMaterializer::new(&self.root, self.options.policy)
            .with_dry_run(self.options.dry_run);
        if let Err(e) = materializer.check_root() {
            self.transition(RunState::Failed);
            return Err(e);
        }

        self.transition(RunState::Materializing);
        if let Err(e) = materializer.prepare_root() {
            self.transition(RunState::Failed);
            return Err(e);
        }

        let mut manifest = CreationManifest::default();
        for planned in plan_entries(self.catalog, self.params) {
            let record = materialize_entry(&mut materializer, planned);
            match &record.outcome {
                Outcome::Failed(e) => tracing::warn!(path = %record.path, error = %e, "entry failed"),
                outcome => tracing::debug!(path = %record.path, ?outcome, "entry done"),
            }
            manifest.push(record);
        }

        let status = manifest.status();
        self.transition(match status {
            RunStatus::Completed => RunState::Completed,
            RunStatus::Failed => RunState::Failed,
        });

        if status == RunStatus::Completed && !self.options.dry_run {
            if let Some(command) = self.hook_command() {
                if let Some(warning) = run_hook(self.runner.as_ref(), &command, &self.root) {
                    tracing::warn!("{warning}");
                    manifest.warn(warning);
                }
            }
        }

        let counts = manifest.counts();
        tracing::info!(
            root = %self.root.display(),
            created = counts.created,
            skipped = counts.skipped,
            failed = counts.failed,
            "scaffold finished"
        );

        Ok(ScaffoldReport {
            root: self.root.clone(),
            status,
            manifest,
            dry_run: self.options.dry_run,
        })
    }

    fn hook_command(&self) -> Option<ExternalCommand> {
        match &self.options.hook {
            HookSetting::FromCatalog => self.catalog.hook.clone(),
            HookSetting::Disabled => None,
            HookSetting::Command(command) => Some(command.clone()),
        }
    }
}

fn materialize_entry(materializer: &mut TreeMaterializer, planned: PlannedEntry) -> ManifestRecord {
    let path = planned.display_path();
    let target = match planned.target {
        Ok(target) => target,
        Err(e) => {
            return ManifestRecord {
                group: planned.group,
                path,
                kind: planned.kind,
                outcome: Outcome::Failed(e),
                digest: None,
            }
        }
    };

    let written = match planned.kind {
        EntryKind::File if planned.executable => {
            materializer.write_executable(&target.path, &target.content)
        }
        EntryKind::File => materializer.write_file(&target.path, &target.content),
        EntryKind::Dir => materializer.create_dir(&target.path),
    };

    let (outcome, digest) = match written {
        Ok(WriteOutcome::Created) if planned.kind.is_file() => {
            (Outcome::Created, Some(digest(&target.content)))
        }
        Ok(WriteOutcome::Created) => (Outcome::Created, None),
        Ok(WriteOutcome::SkippedExists) => (Outcome::SkippedExists, None),
        Err(e) => (Outcome::Failed(e), None),
    };

    ManifestRecord {
        group: planned.group,
        path,
        kind: planned.kind,
        outcome,
        digest,
    }
}
