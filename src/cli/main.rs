use std::fs::File;
use std::io::{self, BufReader};
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use treex::core::telemetry::init_logging;
use treex::shell::{Mode, Shell};
use treex::ui::{Renderer, Theme};
use treex::{ExplorerConfig, Session, SharedSession};

#[derive(Debug, Parser)]
#[command(name = "treex", version, about = "In-memory file explorer")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    root_name: Option<String>,

    #[arg(long, global = true, conflicts_with = "unbounded_names")]
    max_name_len: Option<usize>,

    /// Accept names of any length.
    #[arg(long, global = true)]
    unbounded_names: bool,

    /// ASCII tree glyphs instead of box drawing and emoji.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive session on stdin/stdout (default).
    Shell,
    /// Execute a script of shell commands without prompts.
    Run { script: PathBuf },
    /// Serve one shared session over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1:7878")]
        addr: SocketAddr,
    },
}

impl Cli {
    fn explorer_config(&self) -> Result<ExplorerConfig> {
        let mut config = match &self.config {
            Some(path) => ExplorerConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ExplorerConfig::default(),
        };
        if let Some(root_name) = &self.root_name {
            config.root_name = root_name.clone();
        }
        if let Some(max) = self.max_name_len {
            config.max_name_len = Some(max);
        }
        if self.unbounded_names {
            config.max_name_len = None;
        }
        Ok(config)
    }

    fn renderer(&self) -> Renderer {
        Renderer::new(if self.plain { Theme::PLAIN } else { Theme::UNICODE })
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = cli.explorer_config()?;
    let session = Session::new(config).context("could not create the root directory")?;

    match cli.command.as_ref().unwrap_or(&Command::Shell) {
        Command::Shell => {
            let mut shell = Shell::new(session, io::stdin().lock(), io::stdout(), Mode::Interactive)
                .with_renderer(cli.renderer());
            shell.run()?;
        }
        Command::Run { script } => {
            let file = File::open(script)
                .with_context(|| format!("failed to open script {}", script.display()))?;
            let mut shell = Shell::new(session, BufReader::new(file), io::stdout(), Mode::Batch)
                .with_renderer(cli.renderer());
            let failures = shell.run()?;
            if failures > 0 {
                bail!("{failures} error(s) reported by the script");
            }
        }
        Command::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(treex::api::serve(SharedSession::new(session), *addr))?;
        }
    }
    Ok(())
}
