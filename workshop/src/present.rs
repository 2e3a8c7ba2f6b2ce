//! Presentation of exercises, menus and lifecycle messages.
//!
//! The controller only talks to the [`Presenter`] trait; [`TerminalPresenter`]
//! writes plain text to any `io::Write` (stdout in the CLI).

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::core::catalog::{Catalog, CatalogEntry};
use crate::core::types::ExerciseText;
use crate::io::solutions::SolutionFile;
use crate::io::text::{TextVars, render_text};

const FOOTER_TEMPLATE: &str = include_str!("templates/footer.txt");
const USAGE_TEMPLATE: &str = include_str!("templates/usage.txt");
const SOLUTION_RULE_WIDTH: usize = 90;

/// Application-level facts the presenter needs for headings and hints.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub width: usize,
    pub root: PathBuf,
    pub has_help: bool,
    pub has_credits: bool,
    pub has_prerequisites: bool,
}

impl AppInfo {
    pub fn text_vars(&self) -> TextVars {
        TextVars::new(&self.name, &self.root)
    }
}

/// Everything the lifecycle controller shows the user.
pub trait Presenter {
    /// Title, exercise name and "Exercise N of M".
    fn exercise_header(&mut self, entry: &CatalogEntry, total: usize) -> Result<()>;

    /// Instructions followed by the command hints.
    fn exercise_text(&mut self, text: &ExerciseText) -> Result<()>;

    fn passed(&mut self, name: &str) -> Result<()>;

    fn failed(&mut self, name: &str) -> Result<()>;

    /// Reference solutions, in the order given.
    fn solutions(&mut self, files: &[SolutionFile]) -> Result<()>;

    /// Remaining exercise count; zero means everything is finished.
    fn progress(&mut self, remaining: usize) -> Result<()>;

    fn menu(&mut self, catalog: &Catalog, completed: &[String]) -> Result<()>;
}

/// Plain-text presenter.
pub struct TerminalPresenter<W: Write> {
    app: AppInfo,
    env: Environment<'static>,
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(app: AppInfo, out: W) -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template("footer", FOOTER_TEMPLATE)
            .context("load footer template")?;
        env.add_template("usage", USAGE_TEMPLATE)
            .context("load usage template")?;
        Ok(Self { app, env, out })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Command usage for `help`.
    pub fn usage(&mut self) -> Result<()> {
        let usage = self.env.get_template("usage")?.render(context! {
            appname => self.app.name.as_str(),
        })?;
        writeln!(self.out, "{usage}")?;
        Ok(())
    }

    /// Print an already rendered document (help, credits, prerequisites).
    pub fn document(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.trim_end())?;
        Ok(())
    }

    fn footer(&self) -> Result<String> {
        let footer = self.env.get_template("footer")?.render(context! {
            appname => self.app.name.as_str(),
            help => self.app.has_help,
            credits => self.app.has_credits,
            prerequisites => self.app.has_prerequisites,
        })?;
        Ok(footer)
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn exercise_header(&mut self, entry: &CatalogEntry, total: usize) -> Result<()> {
        let title = self.app.title.as_str();
        writeln!(self.out)?;
        writeln!(self.out, " {title}")?;
        writeln!(self.out, "{}", "─".repeat(title.chars().count() + 2))?;
        writeln!(self.out, " {}", entry.name)?;
        writeln!(self.out, " Exercise {} of {}", entry.number, total)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn exercise_text(&mut self, text: &ExerciseText) -> Result<()> {
        let body = render_text(&text.text, &self.app.text_vars())?;
        let footer = self.footer()?;
        writeln!(self.out, "{}", body.trim_end())?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", footer.trim_end())?;
        writeln!(self.out)?;
        Ok(())
    }

    fn passed(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "# PASS")?;
        writeln!(self.out)?;
        writeln!(self.out, "Your solution to {name} passed!")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn failed(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "# FAIL")?;
        writeln!(self.out)?;
        writeln!(self.out, "Your solution to {name} didn't pass. Try again!")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn solutions(&mut self, files: &[SolutionFile]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        let rule = "─".repeat(SOLUTION_RULE_WIDTH);
        writeln!(
            self.out,
            "Here's the official solution if you want to compare notes:"
        )?;
        writeln!(self.out)?;
        for file in files {
            writeln!(self.out, "{rule}")?;
            writeln!(self.out)?;
            if files.len() > 1 {
                writeln!(self.out, "{}:", file.name)?;
                writeln!(self.out)?;
            }
            writeln!(self.out, "{}", file.contents.trim_end())?;
            writeln!(self.out)?;
        }
        writeln!(self.out, "{rule}")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn progress(&mut self, remaining: usize) -> Result<()> {
        if remaining == 0 {
            writeln!(self.out, "You've finished all the challenges! Hooray!")?;
            writeln!(self.out)?;
            return Ok(());
        }
        let plural = if remaining == 1 { "" } else { "s" };
        writeln!(self.out, "You have {remaining} challenge{plural} left.")?;
        writeln!(self.out, "Type `{}` to show the menu.", self.app.name)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn menu(&mut self, catalog: &Catalog, completed: &[String]) -> Result<()> {
        let rule = "─".repeat(self.app.width);
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, " {}", self.app.title)?;
        if let Some(subtitle) = &self.app.subtitle {
            writeln!(self.out, " {subtitle}")?;
        }
        writeln!(self.out, "{rule}")?;
        for entry in catalog.entries() {
            let marker = if completed.iter().any(|name| *name == entry.name) {
                "  [COMPLETED]"
            } else {
                ""
            };
            writeln!(self.out, " {:>2}. {}{}", entry.number, entry.name, marker)?;
        }
        writeln!(self.out, "{rule}")?;
        writeln!(
            self.out,
            " Select an exercise with `{} select NAME`.",
            self.app.name
        )?;
        writeln!(self.out)?;
        Ok(())
    }
}
