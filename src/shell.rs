//! Interactive dashboard shell (`trendlens dash`).
//!
//! Each input line is parsed into a [`ShellCommand`]; most commands map to
//! a single UI [`Event`] handed to the [`App`], after which the whole
//! dashboard is repainted. Diagnostics go to stderr.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;

use crate::app::{App, Event};
use crate::cli;
use crate::client::Backend;
use crate::storage::Storage;
use crate::ui::{ElementId, Select, TextInput};

/// Rows painted below the filters; the rest are summarized.
const VISIBLE_ROWS: usize = 20;

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Event(Event),
    /// Write the open chart's SVG to a file.
    Save(PathBuf),
    Weeks,
    Help,
    /// Blank line: repaint only.
    Refresh,
    Quit,
}

/// Parse one line of shell input.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Refresh,
        "run" => ShellCommand::Event(Event::Click(ElementId::RunButton)),
        "go" => ShellCommand::Event(Event::Key {
            key: "Enter".into(),
            ctrl: true,
        }),
        "start" => ShellCommand::Event(Event::Input(ElementId::StartSelect, week_arg(rest)?)),
        "end" => ShellCommand::Event(Event::Input(ElementId::EndSelect, week_arg(rest)?)),
        "include" => ShellCommand::Event(Event::Input(ElementId::IncludeInput, rest.into())),
        "exclude" => ShellCommand::Event(Event::Input(ElementId::ExcludeInput, rest.into())),
        "sort" => {
            let key = rest.parse()?;
            ShellCommand::Event(Event::Click(ElementId::Header(key)))
        }
        "open" => ShellCommand::Event(Event::Click(ElementId::Row(row_arg(rest)?))),
        "focus" => ShellCommand::Event(Event::Focus(focus_target(rest)?)),
        "key" => ShellCommand::Event(Event::key(key_name(rest)?)),
        "esc" | "escape" => ShellCommand::Event(Event::key("Escape")),
        "close" => ShellCommand::Event(Event::Click(ElementId::ModalClose)),
        "backdrop" => ShellCommand::Event(Event::Click(ElementId::ModalBackdrop)),
        "reindex" => ShellCommand::Event(Event::Click(ElementId::ReindexButton)),
        "save" if rest.is_empty() => return Err("usage: save <file.svg>".into()),
        "save" => ShellCommand::Save(PathBuf::from(rest)),
        "weeks" => ShellCommand::Weeks,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(command)
}

fn week_arg(rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        return Err("expected a week id".into());
    }
    Ok(rest.to_string())
}

/// Rows are numbered from 1 on screen.
fn row_arg(rest: &str) -> Result<usize, String> {
    match rest.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("expected a row number, got '{rest}'")),
    }
}

fn focus_target(rest: &str) -> Result<ElementId, String> {
    let target = match rest.to_ascii_lowercase().as_str() {
        "start" => ElementId::StartSelect,
        "end" => ElementId::EndSelect,
        "include" => ElementId::IncludeInput,
        "exclude" => ElementId::ExcludeInput,
        "run" => ElementId::RunButton,
        "reindex" => ElementId::ReindexButton,
        "close" => ElementId::ModalClose,
        "chart" => ElementId::ModalContent,
        other => ElementId::Row(row_arg(other)?),
    };
    Ok(target)
}

fn key_name(rest: &str) -> Result<&str, String> {
    let key = match rest.to_ascii_lowercase().as_str() {
        "" => return Err("expected a key name".into()),
        "enter" | "return" => "Enter",
        "space" => " ",
        "esc" | "escape" => "Escape",
        "tab" => "Tab",
        _ => rest,
    };
    Ok(key)
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Start the dashboard and serve commands from stdin until `quit` or EOF.
pub fn run<B: Backend, S: Storage>(app: &mut App<B, S>) -> Result<()> {
    app.start();
    paint(app);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt(&mut stdout)?;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        match parse_command(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::Help) => print_help(),
            Ok(ShellCommand::Weeks) => print_week_options(&app.controls().start),
            Ok(ShellCommand::Save(path)) => save_chart(app, &path),
            Ok(ShellCommand::Refresh) => paint(app),
            Ok(ShellCommand::Event(event)) => {
                app.handle(event);
                paint(app);
            }
            Err(message) => eprintln!("{} {message}", "error:".red().bold()),
        }
        prompt(&mut stdout)?;
    }
    Ok(())
}

fn prompt(stdout: &mut io::Stdout) -> Result<()> {
    print!("{} ", "trendlens>".cyan().bold());
    stdout.flush().context("Failed to flush stdout")
}

fn save_chart<B: Backend, S: Storage>(app: &App<B, S>, path: &Path) {
    if !app.modal().is_open() {
        eprintln!("{} open a row first", "error:".red().bold());
        return;
    }
    match fs::write(path, &app.modal().body) {
        Ok(()) => println!("{} Chart written to {}", "✓".green().bold(), path.display()),
        Err(err) => eprintln!("{} {}: {err}", "error:".red().bold(), path.display()),
    }
}

// ---------------------------------------------------------------------------
// Painting
// ---------------------------------------------------------------------------

/// Repaint the whole dashboard from the app state.
pub fn paint<B: Backend, S: Storage>(app: &mut App<B, S>) {
    app.tick(Utc::now());
    for line in app.take_console() {
        eprintln!("{} {line}", "error:".red().bold());
    }

    println!();
    println!(
        "{} {}  {}",
        "trendlens".bold().cyan(),
        format!("[{}]", app.mode()).dimmed(),
        app.range_badge()
    );
    println!("{}", "=".repeat(72));

    let controls = app.controls();
    println!(
        "  {} {}   {} {}",
        "Start:".bold(),
        select_text(&controls.start),
        "End:".bold(),
        select_text(&controls.end)
    );
    println!(
        "  {} {}   {} {}",
        "Include:".bold(),
        input_text(&controls.include),
        "Exclude:".bold(),
        input_text(&controls.exclude)
    );
    println!();

    cli::print_results(app.table(), app.sort_state(), app.focused(), VISIBLE_ROWS);

    if let Some(message) = app.toast().message() {
        println!();
        println!("  {} {}", "»".yellow().bold(), message.yellow());
    }

    if app.modal().is_open() {
        println!();
        println!("{}", "-".repeat(72));
        println!("  {}", app.modal().title.bold());
        if let Some(geometry) = app.chart() {
            cli::print_chart(geometry, 60, 10);
        }
        println!("  {}", "esc or close to dismiss, save <file.svg> to export".dimmed());
        println!("{}", "-".repeat(72));
    }
}

fn select_text(select: &Select) -> String {
    match select.selected_label() {
        Some(label) => format!("{label} ({})", select.value()),
        None => "-".dimmed().to_string(),
    }
}

fn input_text(input: &TextInput) -> String {
    if input.disabled {
        format!("[{}]", input.placeholder).dimmed().to_string()
    } else if input.value.is_empty() {
        "-".dimmed().to_string()
    } else {
        format!("\"{}\"", input.value)
    }
}

fn print_week_options(select: &Select) {
    for option in select.options() {
        println!("  {:>8}  {}", option.value, option.label);
    }
}

fn print_help() {
    println!("{}", "Commands".bold().cyan());
    let rows = [
        ("start <id> / end <id>", "pick the range ends"),
        ("include <terms> / exclude <terms>", "term filters (Pro)"),
        ("run / go", "run the query (go = Ctrl+Enter)"),
        ("sort <column>", "toggle ordering: term, start, end, improvement, weeks"),
        ("open <n>", "chart row n"),
        ("focus <n|start|end|...>", "move keyboard focus"),
        ("key <enter|space|esc>", "press a key on the focused element"),
        ("esc / close / backdrop", "dismiss the chart"),
        ("save <file.svg>", "export the open chart"),
        ("reindex", "rebuild the backend index"),
        ("weeks", "list selectable weeks"),
        ("quit", "leave"),
    ];
    for (command, what) in rows {
        println!("  {:<36} {}", command, what.dimmed());
    }
}
