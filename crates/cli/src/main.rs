// SheetLens CLI - view spreadsheet files as a searchable table

mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sheetlens_engine::session::{LoadOutcome, LoadSession};
use sheetlens_engine::table::{Row, TableModel};
use sheetlens_io::SheetFormat;

/// Success - command completed without errors.
const EXIT_SUCCESS: u8 = 0;
/// General error - decode failure, unreadable file.
const EXIT_ERROR: u8 = 1;
/// Usage error - bad arguments, unsupported extension.
const EXIT_USAGE: u8 = 2;

/// Widest a table column may render before truncation.
const MAX_COL_WIDTH: usize = 32;

#[derive(Parser)]
#[command(name = "slens")]
#[command(about = "View spreadsheet files as a searchable table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a file's rows as an aligned table
    #[command(after_help = "\
Examples:
  slens show data.xlsx
  slens show data.csv --query snow
  slens show data.xlsx --query snow --json
  slens show report.ods --limit 20")]
    Show {
        /// Input file (format chosen by extension)
        file: PathBuf,

        /// Keep only rows containing this text (case-insensitive)
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,

        /// Emit rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List a file's columns (field id and header text)
    Fields {
        /// Input file (format chosen by extension)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Show {
            file,
            query,
            limit,
            json,
        } => cmd_show(&file, query.as_deref().unwrap_or(""), limit, json),
        Commands::Fields { file } => cmd_fields(&file),
    };

    ExitCode::from(code)
}

/// Read and decode `path`, installing the model in a fresh session.
///
/// This is the byte-acquisition collaborator: the file read happens here,
/// at the session's single suspension point, and the decoded model is
/// handed to `complete` in one piece.
fn load(path: &Path) -> Result<LoadSession, u8> {
    let Some(format) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SheetFormat::from_extension)
    else {
        eprintln!("error: unsupported file type: {}", path.display());
        return Err(EXIT_USAGE);
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");

    let mut session = LoadSession::new();
    let ticket = session.begin_load(name);

    let result = std::fs::read(path)
        .map_err(|e| format!("{}: {}", path.display(), e))
        .and_then(|bytes| {
            sheetlens_io::decode(&bytes, format)
                .map(|grid| TableModel::build(&grid))
                .map_err(|e| e.to_string())
        });

    match session.complete(ticket, result) {
        LoadOutcome::Installed => Ok(session),
        LoadOutcome::Failed(msg) => {
            eprintln!("error: {}", msg);
            Err(EXIT_ERROR)
        }
        // A one-shot load is never superseded
        LoadOutcome::Stale => Err(EXIT_ERROR),
    }
}

fn cmd_show(path: &Path, query: &str, limit: Option<usize>, json: bool) -> u8 {
    let session = match load(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let rows = session.filtered_rows(query);
    let shown = limit.unwrap_or(rows.len()).min(rows.len());

    if json {
        return print_json(&session, &rows[..shown]);
    }

    print_table(&session, &rows[..shown]);
    if shown < rows.len() {
        eprintln!("({} of {} rows shown)", shown, rows.len());
    }
    EXIT_SUCCESS
}

fn cmd_fields(path: &Path) -> u8 {
    let session = match load(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let columns = session.columns();
    if columns.is_empty() {
        println!("(no columns)");
        return EXIT_SUCCESS;
    }

    let id_width = columns
        .iter()
        .map(|f| util::display_width(&f.id))
        .max()
        .unwrap_or(0);
    for field in columns {
        println!("{}  {}", util::pad_right(&field.id, id_width), field.display_name);
    }
    EXIT_SUCCESS
}

fn print_json(session: &LoadSession, rows: &[&Row]) -> u8 {
    let out: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            obj.insert("id".to_string(), row.id.into());
            for field in session.columns() {
                obj.insert(
                    field.id.clone(),
                    row.value(&field.id).display_text().into(),
                );
            }
            serde_json::Value::Object(obj)
        })
        .collect();

    match serde_json::to_string_pretty(&out) {
        Ok(s) => {
            println!("{}", s);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn print_table(session: &LoadSession, rows: &[&Row]) {
    let columns = session.columns();
    if columns.is_empty() {
        println!("(empty sheet)");
        return;
    }

    let mut widths: Vec<usize> = columns
        .iter()
        .map(|f| util::display_width(&f.display_name))
        .collect();
    for row in rows {
        for (i, field) in columns.iter().enumerate() {
            let w = util::display_width(&row.value(&field.id).display_text());
            widths[i] = widths[i].max(w);
        }
    }
    for w in widths.iter_mut() {
        *w = (*w).min(MAX_COL_WIDTH);
    }

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, f)| util::pad_right(&f.display_name, widths[i]))
        .collect();
    println!("{}", header.join("  "));

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, f)| util::pad_right(&row.value(&f.id).display_text(), widths[i]))
            .collect();
        println!("{}", cells.join("  "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "First Name,Last Name").unwrap();
        writeln!(file, "Jon,Snow").unwrap();

        let session = load(&path).unwrap();
        assert_eq!(session.source_name(), Some("people.csv"));
        assert_eq!(session.columns()[0].id, "FirstName");
        assert_eq!(session.filtered_rows("snow").len(), 1);
        assert_eq!(session.filtered_rows("stark").len(), 0);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        assert!(matches!(load(Path::new("notes.txt")), Err(EXIT_USAGE)));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(matches!(load(Path::new("missing.csv")), Err(EXIT_ERROR)));
    }
}
