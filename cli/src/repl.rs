use anyhow::Result;
use rustyline::{error::ReadlineError, DefaultEditor};

use lisp_core::{
    config::Configuration,
    reader::{ReadError, Reader},
};

const HISTORY_FILE: &str = ".lisp-history";

const PROMPT: &str = "λ > ";
const CONTINUE_PROMPT: &str = "... ";

/// What to do with the text entered so far
#[derive(Debug, PartialEq)]
enum Response {
    /// Lines to print for a complete input
    Output(Vec<String>),

    /// The input ends inside a list or string, wait for more lines
    Incomplete,
}

/// Run the interactive prompt until the user leaves
pub fn repl(config: &Configuration) -> Result<()> {
    println!("lisp v{}", env!("CARGO_PKG_VERSION"));

    let mut editor = DefaultEditor::new()?;
    if editor.load_history(HISTORY_FILE).is_err() {
        tracing::debug!("no previous history");
    }

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() {
            PROMPT
        } else {
            CONTINUE_PROMPT
        };

        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) if !buffer.is_empty() => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        if buffer.is_empty() && matches!(line.trim(), "quit" | "q" | "exit") {
            break;
        }
        if buffer.is_empty() && line.trim().is_empty() {
            continue;
        }

        buffer.push_str(&line);
        buffer.push('\n');

        match respond(&buffer, config) {
            Ok(Response::Incomplete) => continue,
            Ok(Response::Output(lines)) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            Err(err) => eprintln!("{}", err),
        }

        editor.add_history_entry(buffer.trim_end())?;
        buffer.clear();
    }

    if let Err(err) = editor.save_history(HISTORY_FILE) {
        tracing::warn!(%err, "unable to save history");
    }

    Ok(())
}

/// Read the input and produce the lines to echo back
fn respond(input: &str, config: &Configuration) -> Result<Response, ReadError> {
    let mut reader = Reader::new(input, config);

    let values = match reader.read_all() {
        Ok(values) => values,
        Err(ReadError::UnterminatedList { .. } | ReadError::UnterminatedString { .. }) => {
            return Ok(Response::Incomplete)
        }
        Err(err) => return Err(err),
    };

    let mut lines = reader
        .take_warnings()
        .into_iter()
        .map(|warning| format!("warn: {}", warning))
        .collect::<Vec<_>>();
    lines.extend(values.iter().map(|value| format!("=> {}", value)));

    Ok(Response::Output(lines))
}
