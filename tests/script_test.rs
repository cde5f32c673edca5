use std::fs::{self, File};
use std::io::BufReader;

use anyhow::Result;
use tempfile::tempdir;
use treex::shell::{Mode, Shell};
use treex::ui::{Renderer, Theme};
use treex::{ExplorerConfig, Session};

#[test]
fn script_builds_and_renders_tree() -> Result<()> {
    let dir = tempdir()?;
    let script = dir.path().join("setup.treex");
    fs::write(
        &script,
        "# project skeleton\n\
         mkdir src docs\n\
         touch README.md\n\
         cd src\n\
         touch main.rs lib.rs\n\
         cd /\n\
         mv README.md docs\n\
         tree\n",
    )?;

    let session = Session::new(ExplorerConfig::default())?;
    let mut output = Vec::new();
    let mut shell = Shell::new(
        session,
        BufReader::new(File::open(&script)?),
        &mut output,
        Mode::Batch,
    )
    .with_renderer(Renderer::new(Theme::PLAIN));
    let failures = shell.run()?;
    drop(shell);

    assert_eq!(failures, 0);
    let text = String::from_utf8(output)?;
    let expected_tree = "\
[D] root [Current]
|-- [D] docs
|   `-- [F] README.md
`-- [D] src
    |-- [F] lib.rs
    `-- [F] main.rs
2 folder(s), 3 file(s), depth 2
";
    assert!(text.ends_with(expected_tree), "{text}");
    Ok(())
}

#[test]
fn script_counts_failures_without_stopping() -> Result<()> {
    let dir = tempdir()?;
    let script = dir.path().join("bad.treex");
    fs::write(&script, "mkdir a\nmkdir a\nrm /\ntouch a/x\ncd a\npwd\n")?;

    let session = Session::new(ExplorerConfig::default())?;
    let mut output = Vec::new();
    let mut shell = Shell::new(
        session,
        BufReader::new(File::open(&script)?),
        &mut output,
        Mode::Batch,
    )
    .with_renderer(Renderer::new(Theme::PLAIN));
    let failures = shell.run()?;
    let session = shell.into_session();

    assert_eq!(failures, 3);
    assert_eq!(session.current_path()?, "/a");
    let text = String::from_utf8(output)?;
    assert!(text.contains("error: line 2: a file or folder named 'a' already exists"));
    assert!(text.contains("error: line 3: cannot delete the root directory"));
    assert!(text.contains("error: line 4: invalid name 'a/x'"));
    assert!(text
        .lines()
        .filter(|line| line.starts_with("error:"))
        .all(|line| line.starts_with("error: line ")));
    assert!(text.ends_with("/a\n"));
    Ok(())
}
