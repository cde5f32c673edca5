use crate::core::errors::{Error, Result};
use crate::services::search::{SearchOrder, SearchScope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mkdir(Vec<String>),
    Touch(Vec<String>),
    Rm { path: String, assume_yes: bool },
    Mv { source: String, destination: String },
    Cd(String),
    Pwd,
    Ls { limit: Option<usize>, cursor: Option<String> },
    Tree,
    Find { query: String, order: SearchOrder, scope: SearchScope },
    Stat(Option<String>),
    Help,
    Exit,
}

/// Usage lines shown by `help`, in display order.
pub const USAGE: &[(&str, &str)] = &[
    ("mkdir NAME...", "create folders in the current folder"),
    ("touch NAME...", "create files in the current folder"),
    ("rm [-y] PATH", "delete a file, or a folder with everything in it"),
    ("mv SRC DEST", "move SRC into the folder DEST"),
    ("cd NAME|PATH|..|/", "change the current folder"),
    ("pwd", "print the current path"),
    ("ls [LIMIT [CURSOR]]", "list the current folder"),
    ("tree", "draw the whole tree"),
    ("find [--bfs|--dfs] [--here] TEXT", "find entries whose name contains TEXT"),
    ("stat [PATH]", "show details of an entry"),
    ("help", "show this help"),
    ("exit", "leave the explorer"),
];

impl Command {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match verb {
            "mkdir" | "md" => Command::Mkdir(names(verb, &args)?),
            "touch" => Command::Touch(names(verb, &args)?),
            "rm" | "del" => {
                let assume_yes = args.iter().any(|a| matches!(*a, "-y" | "--yes"));
                let rest: Vec<&str> = args
                    .iter()
                    .copied()
                    .filter(|a| !matches!(*a, "-y" | "--yes"))
                    .collect();
                Command::Rm {
                    path: exactly_one(verb, "PATH", &rest)?,
                    assume_yes,
                }
            }
            "mv" | "move" => match args.as_slice() {
                [source, destination] => Command::Mv {
                    source: source.to_string(),
                    destination: destination.to_string(),
                },
                _ => return Err(usage("mv SRC DEST")),
            },
            "cd" => match args.as_slice() {
                [] => Command::Cd("/".to_string()),
                [target] => Command::Cd(target.to_string()),
                _ => return Err(usage("cd NAME|PATH|..|/")),
            },
            "pwd" => Command::Pwd,
            "ls" | "dir" => {
                let limit = args
                    .first()
                    .map(|a| a.parse::<usize>())
                    .transpose()
                    .map_err(|_| usage("ls [LIMIT [CURSOR]]"))?;
                Command::Ls {
                    limit,
                    cursor: args.get(1).map(|c| c.to_string()),
                }
            }
            "tree" => Command::Tree,
            "find" | "search" => {
                let mut order = SearchOrder::DepthFirst;
                let mut scope = SearchScope::Root;
                let mut terms = Vec::new();
                for arg in args {
                    match arg {
                        "--bfs" => order = SearchOrder::BreadthFirst,
                        "--dfs" => order = SearchOrder::DepthFirst,
                        "--here" => scope = SearchScope::Current,
                        term => terms.push(term),
                    }
                }
                Command::Find {
                    query: exactly_one(verb, "TEXT", &terms)?,
                    order,
                    scope,
                }
            }
            "stat" => match args.as_slice() {
                [] => Command::Stat(None),
                [path] => Command::Stat(Some(path.to_string())),
                _ => return Err(usage("stat [PATH]")),
            },
            "help" | "?" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            other => return Err(Error::Usage(format!("unknown command '{other}', try 'help'"))),
        };
        Ok(Some(command))
    }
}

fn usage(text: &str) -> Error {
    Error::Usage(text.to_string())
}

fn names(verb: &str, args: &[&str]) -> Result<Vec<String>> {
    if args.is_empty() {
        return Err(Error::Usage(format!("{verb} NAME...")));
    }
    Ok(args.iter().map(|a| a.to_string()).collect())
}

fn exactly_one(verb: &str, what: &str, args: &[&str]) -> Result<String> {
    match args {
        [one] => Ok(one.to_string()),
        _ => Err(Error::Usage(format!("{verb} expects exactly one {what}"))),
    }
}
