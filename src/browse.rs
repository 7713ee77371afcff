//! Interactive line-driven browser.
//!
//! Reads commands from stdin while dispatching session notifications on the
//! same task, so every callback runs between two commands and never races
//! the command handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use color_eyre::eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use dirtab_core::BrowserConfig;
use dirtab_session::{Session, SessionEvent, SessionHandle, TabManager};

use crate::{absolute_path, build_navigator, print_listing};

const HELP: &str = "\
Commands:
  cd <path>     go to a directory (relative to the current one)
  open <n>      enter the listed directory at index n
  back, fwd     move through history
  up            go to the parent directory
  refresh       reload the current directory
  ls            show the active tab's listing
  tabs          list open tabs
  new [path]    open a tab (defaults to the current directory)
  close         close the active tab
  tab <n>       switch to tab n
  next, prev    cycle through tabs
  help          show this help
  quit          exit";

/// A parsed browser command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Cd(String),
    Open(usize),
    Back,
    Forward,
    Up,
    Refresh,
    List,
    Tabs,
    New(Option<String>),
    Close,
    Tab(usize),
    Next,
    Prev,
    Help,
    Quit,
}

/// Parse one input line. Blank lines parse to `None`.
fn parse_command(line: &str) -> Result<Option<Action>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest.trim())),
        None => (line, None),
    };
    let arg = arg.filter(|arg| !arg.is_empty());

    let action = match (word, arg) {
        ("cd", Some(path)) => Action::Cd(path.to_string()),
        ("cd", None) => return Err("usage: cd <path>".to_string()),
        ("open" | "o", Some(n)) => Action::Open(parse_number(n)?),
        ("back" | "b", None) => Action::Back,
        ("fwd" | "forward" | "f", None) => Action::Forward,
        ("up" | "..", None) => Action::Up,
        ("refresh" | "r", None) => Action::Refresh,
        ("ls" | "l", None) => Action::List,
        ("tabs", None) => Action::Tabs,
        ("new" | "t", path) => Action::New(path.map(str::to_string)),
        ("close" | "w", None) => Action::Close,
        ("tab", Some(n)) => Action::Tab(parse_number(n)?),
        ("next" | "n", None) => Action::Next,
        ("prev" | "p", None) => Action::Prev,
        ("help" | "?", None) => Action::Help,
        ("quit" | "q" | "exit", None) => Action::Quit,
        _ => return Err(format!("unknown command: {line} (try `help`)")),
    };
    Ok(Some(action))
}

fn parse_number(arg: &str) -> Result<usize, String> {
    arg.parse().map_err(|_| format!("not a number: {arg}"))
}

/// Run the browser until `quit` or end of input.
pub async fn run(paths: Vec<PathBuf>, config: &BrowserConfig) -> Result<()> {
    let (navigator, mut queue) = build_navigator(config);
    let mut tabs = TabManager::new(navigator, config);
    tabs.set_update_hook(Arc::new(report_event));

    let paths = if paths.is_empty() {
        vec![tabs.start_path().to_path_buf()]
    } else {
        paths
    };
    for path in &paths {
        if tabs.open_tab(absolute_path(path)?).is_none() {
            eprintln!("tab limit reached, {} not opened", path.display());
        }
    }

    println!("dirtab: {} tab(s) open, `help` for commands", tabs.len());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            dispatched = queue.dispatch_next() => {
                if !dispatched {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(Action::Quit)) => break,
                    Ok(Some(action)) => execute(&mut tabs, action),
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                }
            }
        }
    }

    Ok(())
}

/// Print a one-line summary when a tab changes.
fn report_event(session: &Session, event: &SessionEvent) {
    let label = TabManager::label(session);
    match event {
        SessionEvent::Loading { path, .. } => println!("[{label}] loading {}", path.display()),
        SessionEvent::Progress { .. }
        | SessionEvent::Loaded { .. }
        | SessionEvent::Failed { .. } => {
            println!("[{label}] {}", session.with_lock(|s| s.status_text().to_string()));
        }
    }
}

fn execute(tabs: &mut TabManager, action: Action) {
    match action {
        Action::New(path) => {
            let path = match path {
                Some(path) => absolute_path(Path::new(&path)),
                None => Ok(tabs
                    .active()
                    .map(current_path)
                    .unwrap_or_else(|| tabs.start_path().to_path_buf())),
            };
            match path {
                Ok(path) => {
                    if tabs.open_tab(path).is_none() {
                        eprintln!("tab limit reached");
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
            return;
        }
        Action::Close => {
            tabs.close_active();
            print_tabs(tabs);
            return;
        }
        Action::Tab(number) => {
            if !tabs.switch_to_number(number) {
                eprintln!("no tab {number}");
            }
            print_tabs(tabs);
            return;
        }
        Action::Next => {
            tabs.next_tab();
            print_tabs(tabs);
            return;
        }
        Action::Prev => {
            tabs.prev_tab();
            print_tabs(tabs);
            return;
        }
        Action::Tabs => {
            print_tabs(tabs);
            return;
        }
        Action::Help => {
            println!("{HELP}");
            return;
        }
        _ => {}
    }

    let Some(session) = tabs.active().cloned() else {
        eprintln!("no open tab");
        return;
    };
    let navigator = tabs.navigator();

    let started = match action {
        Action::Cd(path) => navigator.navigate(resolve(&session, &path), &session),
        Action::Open(index) => {
            let started = navigator.open(index, &session);
            if !started && !is_loading(&session) {
                eprintln!("entry {index} is not a directory");
                return;
            }
            started
        }
        Action::Back => {
            if !session.with_lock(|s| s.can_go_back()) {
                eprintln!("no previous location");
                return;
            }
            navigator.back(&session)
        }
        Action::Forward => {
            if !session.with_lock(|s| s.can_go_forward()) {
                eprintln!("no next location");
                return;
            }
            navigator.forward(&session)
        }
        Action::Up => {
            if !session.snapshot().can_go_up {
                eprintln!("already at the top");
                return;
            }
            navigator.up(&session)
        }
        Action::Refresh => navigator.refresh(&session),
        Action::List => {
            print_listing(&session.snapshot());
            return;
        }
        _ => return,
    };

    if !started {
        eprintln!("still loading {}", current_path(&session).display());
    }
}

/// Resolve `target` against the session's current directory.
fn resolve(session: &SessionHandle, target: &str) -> PathBuf {
    session.with_lock(|s| s.current_path().join(target))
}

fn current_path(session: &SessionHandle) -> PathBuf {
    session.with_lock(|s| s.current_path().to_path_buf())
}

fn is_loading(session: &SessionHandle) -> bool {
    session.with_lock(|s| s.is_loading())
}

fn print_tabs(tabs: &TabManager) {
    for (index, session) in tabs.tabs().iter().enumerate() {
        let marker = if index == tabs.active_index() { '*' } else { ' ' };
        let snapshot = session.snapshot();
        println!(
            "{marker} {}: {:<24} {}",
            index + 1,
            TabManager::label(session),
            snapshot.status_text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation_commands() {
        assert_eq!(
            parse_command("cd /tmp/some dir"),
            Ok(Some(Action::Cd("/tmp/some dir".to_string())))
        );
        assert_eq!(parse_command("  back "), Ok(Some(Action::Back)));
        assert_eq!(parse_command("fwd"), Ok(Some(Action::Forward)));
        assert_eq!(parse_command(".."), Ok(Some(Action::Up)));
        assert_eq!(parse_command("open 3"), Ok(Some(Action::Open(3))));
    }

    #[test]
    fn test_parse_tab_commands() {
        assert_eq!(parse_command("new"), Ok(Some(Action::New(None))));
        assert_eq!(
            parse_command("new /var"),
            Ok(Some(Action::New(Some("/var".to_string()))))
        );
        assert_eq!(parse_command("tab 2"), Ok(Some(Action::Tab(2))));
        assert_eq!(parse_command("close"), Ok(Some(Action::Close)));
        assert_eq!(parse_command("q"), Ok(Some(Action::Quit)));
    }

    #[test]
    fn test_parse_blank_and_invalid() {
        assert_eq!(parse_command("   "), Ok(None));
        assert!(parse_command("cd").is_err());
        assert!(parse_command("tab x").is_err());
        assert!(parse_command("back 2").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_resolve_relative_paths() {
        let session = Session::new();
        assert_eq!(resolve(&session, "/abs"), Path::new("/abs"));
        assert_eq!(resolve(&session, "rel"), Path::new("rel"));
    }
}
