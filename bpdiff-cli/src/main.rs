//! BPMN Diagram Diff Tool CLI
//!
//! Compares two versions of a BPMN 2.0 diagram and prints a change list or
//! emits a colorized copy of the document.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use clap::{Parser, Subcommand, ValueEnum};

use bpmn_diff::{ChangeListEntry, DiffDirection, DiffView};

/// BPMN Diagram Diff Tool
#[derive(Parser)]
#[command(name = "bpdiff")]
#[command(version)]
#[command(about = "BPMN Diagram Diff Tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the change list between two diagram versions
    #[command(visible_alias = "c")]
    Changes {
        /// Previous version file
        previous: String,
        /// Current version file
        current: String,
    },

    /// Write a colorized copy of one version with all changes highlighted
    #[command(visible_alias = "z")]
    Colorize {
        /// Previous version file
        previous: String,
        /// Current version file
        current: String,
        /// Output file (default: stdout)
        output: Option<String>,

        /// Which version to color (selects added vs. removed highlights)
        #[arg(short, long, value_enum, default_value_t = DirectionArg::NewVsOld)]
        direction: DirectionArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    /// Color the current version; highlight added elements
    NewVsOld,
    /// Color the previous version; highlight removed elements
    OldVsNew,
}

impl From<DirectionArg> for DiffDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::NewVsOld => DiffDirection::NewVsOld,
            DirectionArg::OldVsNew => DiffDirection::OldVsNew,
        }
    }
}

fn main() -> std::process::ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Changes { previous, current } => run_changes(&previous, &current),
        Commands::Colorize {
            previous,
            current,
            output,
            direction,
        } => run_colorize(&previous, &current, output.as_deref(), direction.into()),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Builds a diff view over two diagram files.
fn load_view(
    previous_path: &str,
    current_path: &str,
) -> Result<DiffView, Box<dyn std::error::Error>> {
    let mut view = DiffView::new();
    view.set_labels(previous_path, current_path);

    eprintln!("Parsing previous: {}", previous_path);
    view.set_previous_xml(fs::read_to_string(previous_path)?)?;

    eprintln!("Parsing current: {}", current_path);
    view.set_current_xml(fs::read_to_string(current_path)?)?;

    Ok(view)
}

/// Prints the change list for two diagram versions.
fn run_changes(previous_path: &str, current_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let view = load_view(previous_path, current_path)?;

    let summary = view.summary().ok_or("no diff was computed")?;
    let lists = view.change_lists().ok_or("no diff was computed")?;

    println!("{}", view.title());
    println!("{} changes", summary.total_change_count);
    if summary.no_changes_existing {
        println!("No changes ({})", summary.reason.as_str());
        return Ok(());
    }

    print_category("Removed", &lists.removed);
    print_category("Changed", &lists.changed);
    print_category("Added", &lists.added);
    print_category("Layout changed", &lists.layout_changed);

    Ok(())
}

fn print_category(heading: &str, entries: &[ChangeListEntry]) {
    if entries.is_empty() {
        return;
    }
    println!();
    println!("{} ({}):", heading, entries.len());
    for entry in entries {
        if entry.name.is_empty() {
            println!("  - {}", entry.element_type);
        } else {
            println!("  - {} ({})", entry.name, entry.element_type);
        }
    }
}

/// Writes a colorized copy of the selected diagram version.
fn run_colorize(
    previous_path: &str,
    current_path: &str,
    output_path: Option<&str>,
    direction: DiffDirection,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = load_view(previous_path, current_path)?;
    view.set_direction(direction);

    eprintln!("Colorizing...");
    let (xml, assignment) = view.colorized_xml()?;

    let mut output: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    output.write_all(xml.as_bytes())?;
    output.flush()?;

    eprintln!("Colorized {} elements.", assignment.len());
    Ok(())
}
