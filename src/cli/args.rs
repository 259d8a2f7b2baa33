//! Command-line argument parsing for the sigmalite CLI.
//!
//! Arguments are matched positionally; there are no flags beyond
//! `--version` and `--help`.

use std::path::PathBuf;

/// Rows per page when `datasets rows` is given no page size.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    Register {
        email: String,
        username: String,
        password: String,
        full_name: Option<String>,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    /// Show the locally stored session
    WhoAmI,
    Datasets(DatasetCommand),
    Sheets {
        dataset_id: Option<i64>,
    },
    Charts {
        sheet_id: Option<i64>,
    },
    /// Arguments could not be parsed; carries the reason
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetCommand {
    List,
    Show {
        id: i64,
    },
    Rows {
        id: i64,
        page: u32,
        page_size: u32,
    },
    Upload {
        name: String,
        path: PathBuf,
        description: Option<String>,
    },
    Delete {
        id: i64,
    },
}

pub const USAGE: &str = "\
Usage: sigmalite <command> [args]

Commands:
  register <email> <username> <password> [full name]
  login <username> <password>
  logout
  whoami
  datasets list
  datasets show <id>
  datasets rows <id> [page] [page_size]
  datasets upload <name> <path> [description]
  datasets delete <id>
  sheets list [dataset_id]
  charts list [sheet_id]

Options:
  -V, --version   Print version
  -h, --help      Print this help

Environment:
  SIGMALITE_API_URL        Backend URL (default http://localhost:8000)
  SIGMALITE_TIMEOUT_SECS   Request timeout in seconds (default 30)
  SIGMALITE_CREDENTIALS    Credentials file (default ~/.sigmalite/.credentials.json)
  SIGMALITE_LOG            Log filter, e.g. debug (default warn)";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use sigmalite::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["sigmalite".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["--help"] | ["-h"] | ["help"] => CliCommand::Help,
        ["--version"] | ["-V"] => CliCommand::Version,
        ["register", email, username, password, full_name @ ..] => CliCommand::Register {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            full_name: join_rest(full_name),
        },
        ["login", username, password] => CliCommand::Login {
            username: username.to_string(),
            password: password.to_string(),
        },
        ["logout"] => CliCommand::Logout,
        ["whoami"] => CliCommand::WhoAmI,
        ["datasets", rest @ ..] => parse_datasets(rest),
        ["sheets", "list"] => CliCommand::Sheets { dataset_id: None },
        ["sheets", "list", id] => match parse_id(id) {
            Ok(id) => CliCommand::Sheets {
                dataset_id: Some(id),
            },
            Err(msg) => CliCommand::Invalid(msg),
        },
        ["charts", "list"] => CliCommand::Charts { sheet_id: None },
        ["charts", "list", id] => match parse_id(id) {
            Ok(id) => CliCommand::Charts { sheet_id: Some(id) },
            Err(msg) => CliCommand::Invalid(msg),
        },
        [command, ..] => CliCommand::Invalid(format!("Unknown or incomplete command: {}", command)),
    }
}

fn parse_datasets(args: &[&str]) -> CliCommand {
    let parsed = match args {
        ["list"] => Ok(DatasetCommand::List),
        ["show", id] => parse_id(id).map(|id| DatasetCommand::Show { id }),
        ["delete", id] => parse_id(id).map(|id| DatasetCommand::Delete { id }),
        ["rows", id, rest @ ..] if rest.len() <= 2 => parse_rows(id, rest),
        ["upload", name, path, description @ ..] => Ok(DatasetCommand::Upload {
            name: name.to_string(),
            path: PathBuf::from(path),
            description: join_rest(description),
        }),
        _ => Err("Usage: sigmalite datasets list|show <id>|rows <id> [page] [page_size]|upload <name> <path> [description]|delete <id>".to_string()),
    };

    match parsed {
        Ok(command) => CliCommand::Datasets(command),
        Err(msg) => CliCommand::Invalid(msg),
    }
}

fn parse_rows(id: &str, rest: &[&str]) -> Result<DatasetCommand, String> {
    let id = parse_id(id)?;
    let page = rest.first().map(|p| parse_number(p, "page")).transpose()?;
    let page_size = rest.get(1).map(|p| parse_number(p, "page_size")).transpose()?;
    Ok(DatasetCommand::Rows {
        id,
        page: page.unwrap_or(1),
        page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    })
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("Expected a numeric id, got '{}'", raw))
}

fn parse_number(raw: &str, what: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{} must be a positive number, got '{}'", what, raw)),
    }
}

fn join_rest(words: &[&str]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("sigmalite")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args_is_help() {
        assert_eq!(parse(&[]), CliCommand::Help);
        assert_eq!(parse(&["--help"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_register_with_full_name() {
        assert_eq!(
            parse(&["register", "a@example.com", "alice", "password1", "Alice", "Smith"]),
            CliCommand::Register {
                email: "a@example.com".to_string(),
                username: "alice".to_string(),
                password: "password1".to_string(),
                full_name: Some("Alice Smith".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse(&["login", "alice", "secret"]),
            CliCommand::Login {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }
        );
        assert!(matches!(parse(&["login", "alice"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_dataset_rows_defaults() {
        assert_eq!(
            parse(&["datasets", "rows", "4"]),
            CliCommand::Datasets(DatasetCommand::Rows {
                id: 4,
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
            })
        );
        assert_eq!(
            parse(&["datasets", "rows", "4", "3", "25"]),
            CliCommand::Datasets(DatasetCommand::Rows {
                id: 4,
                page: 3,
                page_size: 25,
            })
        );
        assert!(matches!(parse(&["datasets", "rows", "4", "0"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_dataset_upload() {
        assert_eq!(
            parse(&["datasets", "upload", "sales", "/tmp/sales.csv", "Q3", "numbers"]),
            CliCommand::Datasets(DatasetCommand::Upload {
                name: "sales".to_string(),
                path: PathBuf::from("/tmp/sales.csv"),
                description: Some("Q3 numbers".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_bad_id() {
        match parse(&["datasets", "show", "abc"]) {
            CliCommand::Invalid(msg) => assert!(msg.contains("abc")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_filters() {
        assert_eq!(parse(&["sheets", "list", "9"]), CliCommand::Sheets { dataset_id: Some(9) });
        assert_eq!(parse(&["charts", "list"]), CliCommand::Charts { sheet_id: None });
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(parse(&["frobnicate"]), CliCommand::Invalid(_)));
    }
}
