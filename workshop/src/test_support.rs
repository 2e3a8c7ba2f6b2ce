//! Test-only helpers: in-memory progress, a recording presenter, scripted
//! exercises and a temp-dir backed workshop fixture.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tempfile::TempDir;

use crate::core::catalog::{Catalog, CatalogEntry};
use crate::core::slug::dir_slug;
use crate::core::types::{ContentType, ExerciseText, Mode};
use crate::exercise::{ENTRY_FILE, EntryFile, Exercise, ExerciseMeta, ExerciseRegistry};
use crate::io::progress_store::ProgressStore;
use crate::io::solutions::SolutionFile;
use crate::present::{AppInfo, Presenter};
use crate::workshop::Workshop;

/// Kind name for [`ScriptedExercise`].
pub const SCRIPTED_KIND: &str = "scripted";

/// In-memory progress documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    pub docs: BTreeMap<String, Value>,
    pub writes: usize,
}

impl ProgressStore for MemoryStore {
    fn read(&self, key: &str) -> Option<Value> {
        self.docs.get(key).cloned()
    }

    fn write(&mut self, key: &str, update: &mut dyn FnMut(Option<Value>) -> Value) -> Result<()> {
        let next = update(self.read(key));
        self.docs.insert(key.to_string(), next);
        self.writes += 1;
        Ok(())
    }
}

/// What a [`RecordingPresenter`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Header { name: String, number: usize, total: usize },
    Text(String),
    Passed(String),
    Failed(String),
    Solutions(Vec<String>),
    Progress(usize),
    Menu { completed: Vec<String> },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub shown: Vec<Shown>,
}

impl Presenter for RecordingPresenter {
    fn exercise_header(&mut self, entry: &CatalogEntry, total: usize) -> Result<()> {
        self.shown.push(Shown::Header {
            name: entry.name.clone(),
            number: entry.number,
            total,
        });
        Ok(())
    }

    fn exercise_text(&mut self, text: &ExerciseText) -> Result<()> {
        self.shown.push(Shown::Text(text.text.clone()));
        Ok(())
    }

    fn passed(&mut self, name: &str) -> Result<()> {
        self.shown.push(Shown::Passed(name.to_string()));
        Ok(())
    }

    fn failed(&mut self, name: &str) -> Result<()> {
        self.shown.push(Shown::Failed(name.to_string()));
        Ok(())
    }

    fn solutions(&mut self, files: &[SolutionFile]) -> Result<()> {
        self.shown.push(Shown::Solutions(
            files.iter().map(|file| file.contents.clone()).collect(),
        ));
        Ok(())
    }

    fn progress(&mut self, remaining: usize) -> Result<()> {
        self.shown.push(Shown::Progress(remaining));
        Ok(())
    }

    fn menu(&mut self, _catalog: &Catalog, completed: &[String]) -> Result<()> {
        self.shown.push(Shown::Menu {
            completed: completed.to_vec(),
        });
        Ok(())
    }
}

/// Scripted hook result.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Pass,
    Fail,
    Error,
}

/// `exercise.toml` body for `kind = "scripted"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Script {
    pub run: Verdict,
    pub verify: Verdict,
    pub prepare_error: bool,
    pub text_error: bool,
    pub end_error: bool,
    pub hide_solutions: bool,
    pub solutions: Vec<PathBuf>,
}

/// Shared, ordered record of hook calls across exercise instances.
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Exercise whose hook results come from its entry file.
pub struct ScriptedExercise {
    script: Script,
    directory: PathBuf,
    meta: Option<ExerciseMeta>,
    calls: CallLog,
}

impl ScriptedExercise {
    pub fn from_entry(entry: &EntryFile, calls: CallLog) -> Result<Self> {
        let directory = entry
            .path
            .parent()
            .ok_or_else(|| anyhow!("entry file has no directory"))?
            .to_path_buf();
        Ok(Self {
            script: entry.parse()?,
            directory,
            meta: None,
            calls,
        })
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn name(&self) -> String {
        self.meta
            .as_ref()
            .map(|meta| meta.name.clone())
            .unwrap_or_default()
    }

    fn verdict(&self, hook: &str, verdict: Verdict) -> Result<bool> {
        self.record(format!("{hook}:{}", self.name()));
        match verdict {
            Verdict::Pass => Ok(true),
            Verdict::Fail => Ok(false),
            Verdict::Error => Err(anyhow!("scripted {hook} error")),
        }
    }
}

impl Exercise for ScriptedExercise {
    fn init(&mut self, meta: ExerciseMeta) {
        self.record(format!("init:{}:{}", meta.name, meta.number));
        self.meta = Some(meta);
    }

    fn prepare(&mut self) -> Result<()> {
        self.record(format!("prepare:{}", self.name()));
        if self.script.prepare_error {
            return Err(anyhow!("scripted prepare error"));
        }
        Ok(())
    }

    fn exercise_text(&self) -> Result<ExerciseText> {
        self.record(format!("text:{}", self.name()));
        if self.script.text_error {
            return Err(anyhow!("scripted text error"));
        }
        Ok(ExerciseText {
            content_type: ContentType::Text,
            text: format!("Instructions for {}", self.name()),
        })
    }

    fn run(&mut self, _args: &[String]) -> Result<bool> {
        self.verdict("run", self.script.run)
    }

    fn verify(&mut self, _args: &[String]) -> Result<bool> {
        self.verdict("verify", self.script.verify)
    }

    fn end(&mut self, mode: Mode, passed: bool) -> Result<()> {
        self.record(format!("end:{}:{mode}:{passed}", self.name()));
        if self.script.end_error {
            return Err(anyhow!("scripted end error"));
        }
        Ok(())
    }

    fn solution_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .script
            .solutions
            .iter()
            .map(|path| self.directory.join(path))
            .collect())
    }

    fn hide_solutions(&self) -> bool {
        self.script.hide_solutions
    }
}

/// Entry file contents for a scripted exercise with extra TOML lines.
pub fn scripted(extra: &str) -> String {
    format!("kind = \"{SCRIPTED_KIND}\"\n{extra}")
}

/// App info for tests.
pub fn test_app(root: &Path) -> AppInfo {
    AppInfo {
        name: "testshop".to_string(),
        title: "TEST SHOP".to_string(),
        subtitle: None,
        width: 40,
        root: root.to_path_buf(),
        has_help: false,
        has_credits: false,
        has_prerequisites: false,
    }
}

/// Temp-dir backed exercise tree plus a workshop over in-memory state.
pub struct TestWorkshop {
    temp: TempDir,
    calls: CallLog,
    pub workshop: Workshop<MemoryStore, RecordingPresenter>,
}

impl TestWorkshop {
    /// Create one exercise directory per `(name, exercise.toml)` pair, in menu order.
    pub fn new(exercises: &[(&str, &str)]) -> Result<Self> {
        let temp = tempfile::tempdir()?;
        let exercise_dir = temp.path().join("exercises");
        fs::create_dir_all(&exercise_dir)?;

        let names: Vec<String> = exercises.iter().map(|(name, _)| name.to_string()).collect();
        fs::write(
            exercise_dir.join("menu.json"),
            serde_json::to_string_pretty(&names)?,
        )?;
        for (name, entry) in exercises {
            let dir = exercise_dir.join(dir_slug(name));
            fs::create_dir_all(&dir)?;
            fs::write(dir.join(ENTRY_FILE), entry)?;
        }

        let calls: CallLog = Rc::default();
        let mut registry = ExerciseRegistry::builtin();
        let log = calls.clone();
        registry.register(SCRIPTED_KIND, move |entry| {
            Ok(Box::new(ScriptedExercise::from_entry(entry, log.clone())?) as Box<dyn Exercise>)
        });

        let catalog = Catalog::new(&exercise_dir, names);
        let workshop = Workshop::new(
            test_app(temp.path()),
            catalog,
            registry,
            MemoryStore::default(),
            RecordingPresenter::default(),
        );
        Ok(Self {
            temp,
            calls,
            workshop,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Directory of the named exercise.
    pub fn exercise_path(&self, name: &str) -> PathBuf {
        self.temp.path().join("exercises").join(dir_slug(name))
    }

    /// Hook calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn shown(&self) -> &[Shown] {
        &self.workshop.presenter().shown
    }

    /// Forget calls and presenter output recorded so far.
    pub fn reset_recordings(&mut self) {
        self.calls.borrow_mut().clear();
        self.workshop.presenter_mut().shown.clear();
    }

    pub fn store(&self) -> &MemoryStore {
        self.workshop.store()
    }

    /// Put a raw document in the store, bypassing the controller.
    pub fn seed(&mut self, key: &str, value: Value) {
        self.workshop
            .store_mut()
            .docs
            .insert(key.to_string(), value);
    }
}
