//! Interactive menu loop.
//!
//! Every menu entry maps to one [`App`] action. Errors are shown and the loop
//! continues; only quitting (or end of input) ends the session.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::app::App;

const MENU: &str = "\
1) Download data
2) Clear database
3) Show average
4) Show histogram
5) List records
6) Reading report
q) Quit";

/// One parsed menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fetch,
    Clear,
    Average,
    Histogram,
    List,
    Report,
    Help,
    Quit,
}

impl Action {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "fetch" => Some(Action::Fetch),
            "2" | "clear" => Some(Action::Clear),
            "3" | "average" => Some(Action::Average),
            "4" | "histogram" => Some(Action::Histogram),
            "5" | "list" => Some(Action::List),
            "6" | "report" => Some(Action::Report),
            "?" | "h" | "help" => Some(Action::Help),
            "q" | "quit" | "exit" => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Ask a yes/no question, defaulting to no (also on end of input).
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> bool {
    let _ = write!(out, "{} [y/N] ", question);
    let _ = out.flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
    }
}

/// Question shown before replacing existing rows
pub fn replace_question(existing: i64) -> String {
    format!(
        "The database is not empty ({} record(s)). Clear it and continue?",
        existing
    )
}

/// Run the menu until the user quits or input ends.
pub fn run<R: BufRead, W: Write>(app: &mut App, input: &mut R, out: &mut W) -> Result<()> {
    writeln!(out, "{}", MENU)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some(action) = Action::parse(&line) else {
            writeln!(out, "Unknown choice: {}", line.trim())?;
            continue;
        };

        tracing::debug!(?action, "Menu action");

        let result = match action {
            Action::Quit => break,
            Action::Help => Ok(MENU.to_string()),
            Action::Fetch => app.fetch(|existing| {
                confirm(&mut *input, &mut *out, &replace_question(existing))
            }),
            Action::Clear => app.clear(),
            Action::Average => app.average(),
            Action::Histogram => {
                let bins = app.config().chart.bins;
                app.histogram(bins)
            }
            Action::List => app.list(),
            Action::Report => app.report(),
        };

        match result {
            Ok(message) => writeln!(out, "{}", message)?,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), ?action, "Action failed");
                writeln!(out, "{}", crate::describe_error(&e))?;
            }
        }
    }

    Ok(())
}
