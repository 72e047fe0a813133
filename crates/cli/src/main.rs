//! `jsondb-repl` — interactive console for a JsonDb database.
//!
//! One REPL command per line: `get`/`put`/`append`/`delete`/`help`/`quit`.
//! Every mutating command runs inside its own transaction, committed on
//! success and left to abort-on-drop on error, so a bad command never
//! leaves a half-applied write behind.

use std::path::PathBuf;
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};

use jsondb_api::{JsonDb, JsonDbConfig, Transaction};
use jsondb_core::Error;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        eprintln!("Usage: jsondb-repl <dbname>");
        return ExitCode::FAILURE;
    };

    println!("Opening database: {db_path}");
    let db = match JsonDb::open(JsonDbConfig::new(PathBuf::from(db_path))) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };

    run_repl(&db)
}

fn run_repl(db: &JsonDb) -> ExitCode {
    let config = Config::builder().history_ignore_space(true).build();
    let mut rl: Editor<(), _> = Editor::with_config(config).expect("failed to start line editor");
    let history_path = history_file();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if dispatch(db, trimmed) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Readline error: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = rl.save_history(path);
    }
    ExitCode::SUCCESS
}

/// Split a line into whitespace-separated tokens, same as the original
/// console's `" "`-separated tokenizer: no quoting, no escaping. `put` and
/// `append` take everything after the path token as one JSON value, so
/// the value itself may contain spaces.
fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Run one REPL line. Returns `true` if the REPL should exit.
fn dispatch(db: &JsonDb, line: &str) -> bool {
    let tokens = tokenize(line);

    match tokens.as_slice() {
        ["quit"] => return true,
        ["help"] => print_help(),
        ["get", path] => run(db, |tx| {
            let rendered = db.print_to_string(tx, Some(path))?;
            println!("{rendered}");
            Ok(())
        }),
        ["delete", path] => run(db, |tx| db.delete(tx, path)),
        ["put", path, ..] => {
            let value = join_rest(&tokens, 2);
            run(db, |tx| db.set_json(tx, path, &value, true));
        }
        ["append", path, ..] => {
            let value = join_rest(&tokens, 2);
            run(db, |tx| db.append_array_json(tx, path, &value));
        }
        [] => {}
        _ => {
            println!("An invalid command was specified\n");
            print_help();
        }
    }

    false
}

fn join_rest(tokens: &[&str], from: usize) -> String {
    tokens[from..].join(" ")
}

fn run(db: &JsonDb, body: impl FnOnce(&mut Transaction) -> Result<(), Error>) {
    let mut tx = match db.start_transaction() {
        Ok(tx) => tx,
        Err(e) => {
            println!("Error occurred while handling request: {e}");
            return;
        }
    };

    match body(&mut tx) {
        Ok(()) => {
            if let Err(e) = tx.commit() {
                println!("Error occurred while handling request: {e}");
            }
        }
        Err(e) => println!("Error occurred while handling request: {e}"),
    }
}

fn print_help() {
    println!("Valid commands are:");
    println!("get <path>            - Print value of the specified path");
    println!("put <path> <value>    - Set path to the specified json value");
    println!("delete <path>         - Delete specified value from database");
    println!("append <path> <value> - Append value to array");
    println!("quit                  - Exit");
    println!();
    println!("Examples: ");
    println!("put $.a.b.c.d {{ 'e':'Hello world', 'f':10 }}");
    println!("get $.a.b.c.d");
    println!("delete $.a.b.c.d");
    println!("put $.a.b.c.array [10, 20, 30]");
    println!("append $.a.b.c.array 40");
    println!("quit");
}

fn history_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".jsondb_history"))
}
