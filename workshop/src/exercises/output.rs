//! `kind = "output"`: grade a submission by comparing its stdout with a reference program.
//!
//! ```toml
//! kind = "output"
//! problem = "problem.md"
//! command = ["sh"]              # interpreter; empty runs the file directly
//! args = ["3", "5"]
//! stdin = "input text"
//! solutions = ["solution/solution.sh"]
//! template = "template.sh"      # copied into the working directory on select
//! timeout_secs = 30
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::types::{ContentType, ExerciseText, Mode};
use crate::exercise::{EntryFile, Exercise, ExerciseMeta};
use crate::io::process::{ProgramOutput, run_program};

pub const KIND: &str = "output";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub kind: String,
    pub problem: PathBuf,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub solutions: Vec<PathBuf>,
    /// Program producing the expected output; defaults to the first solution.
    pub reference: Option<PathBuf>,
    pub template: Option<PathBuf>,
    /// File name for the scaffolded template; defaults to the template's name.
    pub template_target: Option<PathBuf>,
    pub timeout_secs: u64,
    pub output_limit_bytes: usize,
    pub hide_solutions: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: KIND.to_string(),
            problem: PathBuf::from("problem.md"),
            command: Vec::new(),
            args: Vec::new(),
            stdin: None,
            solutions: Vec::new(),
            reference: None,
            template: None,
            template_target: None,
            timeout_secs: 30,
            output_limit_bytes: 1_000_000,
            hide_solutions: false,
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.reference.is_none() && self.solutions.is_empty() {
            return Err(anyhow!("either `reference` or `solutions` is required"));
        }
        if self.command.first().is_some_and(|program| program.trim().is_empty()) {
            return Err(anyhow!("command must not start with an empty program"));
        }
        Ok(())
    }
}

/// Line-level comparison between actual and expected output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineComparison {
    pub actual: Option<String>,
    pub expected: Option<String>,
}

impl LineComparison {
    pub fn matches(&self) -> bool {
        self.actual == self.expected
    }
}

pub struct OutputExercise {
    config: OutputConfig,
    directory: PathBuf,
    workdir: PathBuf,
    meta: Option<ExerciseMeta>,
    last_comparison: Option<Vec<LineComparison>>,
}

impl OutputExercise {
    pub fn from_entry(entry: &EntryFile) -> Result<Self> {
        let config: OutputConfig = entry.parse()?;
        config.validate()?;
        let directory = entry
            .path
            .parent()
            .ok_or_else(|| anyhow!("entry file has no directory"))?
            .to_path_buf();
        let workdir = env::current_dir().context("resolve working directory")?;
        Ok(Self::new(config, directory, workdir))
    }

    pub fn new(config: OutputConfig, directory: PathBuf, workdir: PathBuf) -> Self {
        Self {
            config,
            directory,
            workdir,
            meta: None,
            last_comparison: None,
        }
    }

    fn name(&self) -> &str {
        self.meta.as_ref().map_or("exercise", |meta| meta.name.as_str())
    }

    fn reference_path(&self) -> Result<PathBuf> {
        self.config
            .reference
            .as_ref()
            .or_else(|| self.config.solutions.first())
            .map(|path| self.directory.join(path))
            .ok_or_else(|| anyhow!("no reference program configured"))
    }

    fn command_for(&self, program: &Path, extra: &[String]) -> Command {
        let mut cmd = match self.config.command.split_first() {
            Some((interpreter, rest)) => {
                let mut cmd = Command::new(interpreter);
                cmd.args(rest).arg(program);
                cmd
            }
            None => Command::new(program),
        };
        cmd.args(&self.config.args)
            .args(extra)
            .current_dir(&self.workdir);
        cmd
    }

    fn execute(&self, label: &str, program: &Path, extra: &[String]) -> Result<ProgramOutput> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = run_program(
            self.command_for(program, extra),
            self.config.stdin.as_deref().map(str::as_bytes),
            timeout,
            self.config.output_limit_bytes,
        )
        .with_context(|| format!("run {label} {}", program.display()))?;
        if output.timed_out {
            return Err(anyhow!("{label} timed out after {timeout:?}"));
        }
        Ok(output)
    }

    fn submission(&self, args: &[String]) -> Result<(PathBuf, Vec<String>)> {
        let (first, rest) = args
            .split_first()
            .ok_or_else(|| anyhow!("no submission file given"))?;
        let path = self.workdir.join(first);
        if !path.is_file() {
            return Err(anyhow!("submission {} does not exist", path.display()));
        }
        Ok((path, rest.to_vec()))
    }
}

impl Exercise for OutputExercise {
    fn init(&mut self, meta: ExerciseMeta) {
        self.meta = Some(meta);
    }

    fn prepare(&mut self) -> Result<()> {
        let Some(template) = &self.config.template else {
            return Ok(());
        };
        let source = self.directory.join(template);
        let target_name = match &self.config.template_target {
            Some(target) => target.clone(),
            None => PathBuf::from(
                template
                    .file_name()
                    .ok_or_else(|| anyhow!("template {} has no file name", template.display()))?,
            ),
        };
        let target = self.workdir.join(target_name);
        if target.exists() {
            debug!(target = %target.display(), "template target exists, leaving it alone");
            return Ok(());
        }
        fs::copy(&source, &target).with_context(|| {
            format!("copy template {} to {}", source.display(), target.display())
        })?;
        info!(target = %target.display(), "scaffolded submission template");
        Ok(())
    }

    fn exercise_text(&self) -> Result<ExerciseText> {
        let path = self.directory.join(&self.config.problem);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("read instructions {}", path.display()))?;
        let content_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("md" | "markdown") => ContentType::Markdown,
            _ => ContentType::Text,
        };
        Ok(ExerciseText { content_type, text })
    }

    fn run(&mut self, args: &[String]) -> Result<bool> {
        let (submission, extra) = self.submission(args)?;
        let output = self.execute("submission", &submission, &extra)?;
        print!("{}", output.stdout_text());
        eprint!("{}", output.stderr_text());
        Ok(output.status.success())
    }

    fn verify(&mut self, args: &[String]) -> Result<bool> {
        let (submission, extra) = self.submission(args)?;
        let reference = self.reference_path()?;
        let actual = self.execute("submission", &submission, &extra)?;
        let expected = self.execute("reference solution", &reference, &extra)?;
        if !expected.status.success() {
            return Err(anyhow!(
                "reference solution {} exited with {:?}: {}",
                reference.display(),
                expected.status.code(),
                expected.stderr_text().trim()
            ));
        }

        let comparison = compare_output(&actual.stdout_text(), &expected.stdout_text());
        let output_matches = comparison.iter().all(LineComparison::matches);
        let passed = output_matches && actual.status.success();
        if !output_matches {
            print!("{}", render_comparison(&comparison));
        }
        if !actual.status.success() {
            println!(
                "Your program exited with status {:?}.\n{}",
                actual.status.code(),
                actual.stderr_text().trim_end()
            );
        }
        self.last_comparison = Some(comparison);
        Ok(passed)
    }

    fn end(&mut self, mode: Mode, passed: bool) -> Result<()> {
        let compared_lines = self.last_comparison.take().map_or(0, |lines| lines.len());
        info!(exercise = %self.name(), %mode, passed, compared_lines, "attempt finished");
        Ok(())
    }

    fn solution_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .config
            .solutions
            .iter()
            .map(|path| self.directory.join(path))
            .collect())
    }

    fn hide_solutions(&self) -> bool {
        self.config.hide_solutions
    }
}

/// Compare outputs line by line after normalizing line endings and trailing whitespace.
pub fn compare_output(actual: &str, expected: &str) -> Vec<LineComparison> {
    let actual = normalized_lines(actual);
    let expected = normalized_lines(expected);
    let len = actual.len().max(expected.len());
    (0..len)
        .map(|index| LineComparison {
            actual: actual.get(index).cloned(),
            expected: expected.get(index).cloned(),
        })
        .collect()
}

fn normalized_lines(output: &str) -> Vec<String> {
    let mut lines: Vec<String> = output
        .replace("\r\n", "\n")
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Render a side-by-side report, marking lines that differ.
pub fn render_comparison(lines: &[LineComparison]) -> String {
    let mut buf = String::from("ACTUAL                              EXPECTED\n");
    for line in lines {
        let actual = line.actual.as_deref().map_or("(missing)".to_string(), quote);
        let expected = line.expected.as_deref().map_or("(missing)".to_string(), quote);
        let marker = if line.matches() { "==" } else { "!=" };
        buf.push_str(&format!("{actual:<34}  {marker}  {expected}\n"));
    }
    buf
}

fn quote(line: &str) -> String {
    format!("\"{line}\"")
}
