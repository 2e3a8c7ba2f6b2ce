//! Exercise lifecycle controller.
//!
//! One [`Workshop`] is built per process invocation and owns the catalog,
//! the exercise registry, the progress store and the presenter. Each command
//! walks the lifecycle
//!
//! ```text
//! Idle → Selected → Prepared → Executing → {Passed | Failed} → Ended
//! ```
//!
//! and returns; the CLI maps the result to an exit code. Progress is only
//! mutated by `select` (`current`) and by a verified pass (`completed`).
//! Unreadable solutions stop a pass before anything is recorded; a failing
//! `end` hook is reported as an error after the outcome was recorded.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::core::catalog::{Catalog, CatalogEntry};
use crate::core::progress::remaining;
use crate::core::types::{ExecuteOutcome, Mode};
use crate::error::WorkshopError;
use crate::exercise::{Exercise, ExerciseRegistry};
use crate::io::progress_store::{Progress, ProgressStore};
use crate::io::solutions::read_solution_files;
use crate::present::{AppInfo, Presenter};

pub struct Workshop<S: ProgressStore, P: Presenter> {
    app: AppInfo,
    catalog: Catalog,
    registry: ExerciseRegistry,
    store: S,
    presenter: P,
}

impl<S: ProgressStore, P: Presenter> Workshop<S, P> {
    pub fn new(
        app: AppInfo,
        catalog: Catalog,
        registry: ExerciseRegistry,
        store: S,
        presenter: P,
    ) -> Self {
        Self {
            app,
            catalog,
            registry,
            store,
            presenter,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Name of the selected exercise, if any.
    pub fn current(&self) -> Option<String> {
        self.store.current()
    }

    pub fn completed(&self) -> Vec<String> {
        self.store.completed()
    }

    /// Show the catalog with completion markers.
    pub fn menu(&mut self) -> Result<()> {
        let completed = self.store.completed();
        self.presenter.menu(&self.catalog, &completed)
    }

    /// Select an exercise, remember it as current and show its instructions.
    ///
    /// Unknown names and broken exercises leave `current` untouched.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let entry = self.resolve(name)?;
        let mut exercise = self.registry.load(&entry)?;
        info!(exercise = %entry.name, number = entry.number, "selecting exercise");

        self.presenter.exercise_header(&entry, self.catalog.count())?;
        self.store
            .set_current(&entry.name)
            .context("save current exercise")?;

        exercise
            .prepare()
            .map_err(|err| WorkshopError::execution("Error preparing exercise", err))?;
        let text = exercise
            .exercise_text()
            .map_err(|err| WorkshopError::execution("Error loading exercise text", err))?;
        self.presenter.exercise_text(&text)
    }

    /// Re-display `name`, or the current exercise when `name` is `None`.
    pub fn print(&mut self, name: Option<&str>) -> Result<()> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self
                .store
                .current()
                .ok_or_else(WorkshopError::no_active_exercise)?,
        };
        self.select(&name)
    }

    /// Run or verify a submission against the current exercise.
    ///
    /// Hook errors abort before any pass/fail handling: nothing is recorded
    /// and `end` is not called.
    pub fn execute(&mut self, mode: Mode, args: &[String]) -> Result<ExecuteOutcome> {
        if args.is_empty() {
            return Err(
                WorkshopError::usage(format!("Usage: {} {} mysubmission", self.app.name, mode))
                    .into(),
            );
        }
        let current = self
            .store
            .current()
            .ok_or_else(WorkshopError::no_active_exercise)?;
        let entry = self.resolve(&current)?;
        let mut exercise = self.registry.load(&entry)?;

        debug!(exercise = %entry.name, %mode, ?args, "executing submission");
        let result = match mode {
            Mode::Run => exercise.run(args),
            Mode::Verify => exercise.verify(args),
        };
        let passed =
            result.map_err(|err| WorkshopError::execution(format!("Could not {mode}"), err))?;

        match mode {
            Mode::Run => {
                debug!(exercise = %entry.name, passed, "dry run finished");
                Ok(ExecuteOutcome::DryRun)
            }
            Mode::Verify if passed => self.pass(exercise.as_mut(), &entry),
            Mode::Verify => self.fail(exercise.as_mut(), &entry),
        }
    }

    fn fail(&mut self, exercise: &mut dyn Exercise, entry: &CatalogEntry) -> Result<ExecuteOutcome> {
        info!(exercise = %entry.name, "submission failed");
        self.presenter.failed(&entry.name)?;
        self.end(exercise, false)?;
        Ok(ExecuteOutcome::Failed)
    }

    fn pass(&mut self, exercise: &mut dyn Exercise, entry: &CatalogEntry) -> Result<ExecuteOutcome> {
        info!(exercise = %entry.name, "submission passed");
        self.presenter.passed(&entry.name)?;

        if !exercise.hide_solutions() {
            let files = exercise
                .solution_files()
                .and_then(|paths| read_solution_files(&paths))
                .map_err(|err| {
                    WorkshopError::execution(
                        "ERROR: There was a problem printing the solution files",
                        err,
                    )
                })?;
            self.presenter.solutions(&files)?;
        }

        let completed = self
            .store
            .mark_completed(&entry.name)
            .context("record completed exercise")?;
        let remaining = remaining(self.catalog.count(), completed.len());
        self.presenter.progress(remaining)?;

        self.end(exercise, true)?;
        Ok(ExecuteOutcome::Passed { remaining })
    }

    /// Progress recorded before a cleanup failure stays recorded.
    fn end(&mut self, exercise: &mut dyn Exercise, passed: bool) -> Result<()> {
        exercise.end(Mode::Verify, passed).map_err(|err| {
            warn!(err = %err, "exercise cleanup failed");
            WorkshopError::execution("Error cleaning up", err)
        })?;
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<CatalogEntry, WorkshopError> {
        self.catalog
            .resolve(name)
            .ok_or_else(|| WorkshopError::Resolution(name.trim().to_string()))
    }
}
