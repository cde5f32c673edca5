//! Line-oriented command loop over any reader and writer. Core errors are
//! reported and the loop carries on; only I/O failures end it.

pub mod command;

use std::io::{BufRead, Write};

use time::macros::format_description;

pub use command::{Command, USAGE};

use crate::core::errors::{Error, Result};
use crate::models::EntryKind;
use crate::services::listing::ListParams;
use crate::services::search::{SearchOrder, SearchRequest};
use crate::session::Session;
use crate::ui::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Banner, prompts and delete confirmations.
    Interactive,
    /// Script execution: no prompts, errors prefixed with their line number.
    Batch,
}

pub struct Shell<R, W> {
    session: Session,
    renderer: Renderer,
    input: R,
    output: W,
    mode: Mode,
    line: usize,
    failures: usize,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, input: R, output: W, mode: Mode) -> Self {
        Self {
            session,
            renderer: Renderer::default(),
            input,
            output,
            mode,
            line: 0,
            failures: 0,
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Runs until `exit` or end of input. Returns the number of errors
    /// reported, counting each rejected `mkdir`/`touch` name separately.
    pub fn run(&mut self) -> Result<usize> {
        let interactive = self.mode == Mode::Interactive;
        if interactive {
            let banner = self.renderer.banner();
            self.output.write_all(banner.as_bytes())?;
        }

        self.failures = 0;
        self.line = 0;
        loop {
            if interactive {
                let prompt = format!("\n{}> ", self.session.current_path()?);
                self.output.write_all(prompt.as_bytes())?;
                self.output.flush()?;
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            self.line += 1;

            let outcome = match Command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Exit)) => break,
                Ok(Some(command)) => self.execute(command),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(text) => self.output.write_all(text.as_bytes())?,
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    let text = self.report(&e);
                    self.output.write_all(text.as_bytes())?;
                }
            }
        }

        if interactive {
            self.output.write_all(b"\nGoodbye!\n")?;
        }
        self.output.flush()?;
        tracing::debug!(failures = self.failures, "shell finished");
        Ok(self.failures)
    }

    /// Counts a failure and renders it, with the line number in batch mode.
    fn report(&mut self, error: &Error) -> String {
        self.failures += 1;
        let message = match self.mode {
            Mode::Interactive => error.to_string(),
            Mode::Batch => format!("line {}: {error}", self.line),
        };
        self.renderer.failure(&message)
    }

    /// Executes one command and returns the text to show for it.
    pub fn execute(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Mkdir(names) => Ok(self.create_all(&names, EntryKind::Folder)),
            Command::Touch(names) => Ok(self.create_all(&names, EntryKind::File)),
            Command::Rm { path, assume_yes } => self.remove(&path, assume_yes),
            Command::Mv {
                source,
                destination,
            } => {
                let folder = self.session.move_entry(&source, &destination)?;
                let target = self.session.tree().full_path(folder)?;
                Ok(self
                    .renderer
                    .success(&format!("'{source}' moved into {target}")))
            }
            Command::Cd(target) => {
                self.session.change_directory(&target)?;
                let path = self.session.current_path()?;
                Ok(self.renderer.success(&format!("changed directory to {path}")))
            }
            Command::Pwd => Ok(format!("{}\n", self.session.current_path()?)),
            Command::Ls { limit, cursor } => {
                let listing = self.session.list(
                    None,
                    ListParams {
                        limit: limit.unwrap_or(usize::MAX),
                        cursor: cursor.as_deref(),
                    },
                )?;
                Ok(self.renderer.listing(&listing))
            }
            Command::Tree => {
                let tree = self.session.tree();
                let mut out = self.renderer.tree(tree, tree.root(), self.session.current())?;
                out.push_str(&self.renderer.stats(&self.session.stats()?));
                Ok(out)
            }
            Command::Find {
                query,
                order,
                scope,
            } => {
                let request = SearchRequest::new(query.clone()).order(order).scope(scope);
                let hits = self.session.search(&request)?;
                let label = match order {
                    SearchOrder::DepthFirst => "depth-first",
                    SearchOrder::BreadthFirst => "breadth-first",
                };
                let mut out = format!("Searching for '{query}' ({label})...\n");
                out.push_str(&self.renderer.hits(&query, &hits));
                Ok(out)
            }
            Command::Stat(path) => self.stat(path.as_deref()),
            Command::Help => Ok(help()),
            Command::Exit => Ok(String::new()),
        }
    }

    fn create_all(&mut self, names: &[String], kind: EntryKind) -> String {
        let label = match kind {
            EntryKind::Folder => "Folder",
            EntryKind::File => "File",
        };
        let mut out = String::new();
        for name in names {
            match self.session.create(name, kind) {
                Ok(_) => out.push_str(&self.renderer.success(&format!("{label} '{name}' created"))),
                Err(e) => {
                    let text = self.report(&e);
                    out.push_str(&text);
                }
            }
        }
        out
    }

    fn remove(&mut self, path: &str, assume_yes: bool) -> Result<String> {
        let target = self.session.describe(Some(path))?;
        let ask = self.mode == Mode::Interactive
            && self.session.config().confirm_recursive_delete
            && !assume_yes
            && target.kind.is_folder();
        if ask && !self.confirm(&format!(
            "This will delete '{}' and all its contents. Continue? (y/n): ",
            target.path
        ))? {
            return Ok("Deletion cancelled.\n".to_string());
        }

        let removed = self.session.remove(path)?;
        let message = match removed.kind {
            EntryKind::File => format!("File '{}' deleted", removed.name),
            EntryKind::Folder => format!(
                "Folder '{}' and all its contents deleted ({} entries)",
                removed.name, removed.released
            ),
        };
        Ok(self.renderer.success(&message))
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
    }

    fn stat(&self, path: Option<&str>) -> Result<String> {
        let dto = self.session.describe(path)?;
        let id = match path {
            Some(path) => self.session.resolve(path)?,
            None => self.session.current(),
        };
        let created = self
            .session
            .tree()
            .get(id)?
            .created_at()
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
            ))
            .map_err(|e| Error::Other(format!("failed to format timestamp: {e}")))?;

        let mut out = format!(
            "path:    {}\nkind:    {}\ncreated: {created}\n",
            dto.path, dto.kind
        );
        if dto.kind.is_folder() {
            let stats = self.session.tree().stats(id)?;
            out.push_str(&format!(
                "items:   {}\nbelow:   {}",
                dto.children,
                self.renderer.stats(&stats)
            ));
        }
        Ok(out)
    }
}

pub fn help() -> String {
    let width = USAGE.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    let mut out = String::from("Commands:\n");
    for (usage, description) in USAGE {
        out.push_str(&format!("  {usage:<width$}  {description}\n"));
    }
    out
}
