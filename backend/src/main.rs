//! W2Con CLI - Edit CE-QUAL-W2 control file settings
//!
//! Every command loads the saved state, applies its change, lets the engine
//! resize whatever depends on it, and saves the state again.
//!
//! ```bash
//! w2con sections                                   # List sections
//! w2con show "Grid Dimensions and General Settings"
//! w2con set "Grid Dimensions and General Settings" NWB 3
//! w2con cell Tributaries ITR 1 12                  # Row ITR, first column
//! w2con export --output w2_con.csv
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use w2con::logs::{log_error, log_info, log_success};
use w2con::{
    set_log_level, Config, Engine, ExportOptions, LogLevel, Section, Snapshot, StoreError, Store,
    W2ConResult, W2_CATALOG,
};

#[derive(Parser)]
#[command(name = "w2con")]
#[command(about = "Edit CE-QUAL-W2 control file settings", long_about = None)]
struct Cli {
    /// State file (default: W2CON_STATE_FILE or app_state.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Export file (default: W2CON_EXPORT_FILE or w2_con.csv)
    #[arg(long, global = true)]
    export: Option<PathBuf>,

    /// Minimum log level echoed to stderr (info, success, warning, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sections of the catalog
    Sections {
        /// Dump the full catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one section
    Show {
        /// Section name
        section: String,
    },

    /// Set a field of a scalar section
    Set {
        section: String,
        field: String,
        /// New value (omit with --clear)
        value: Option<String>,
        /// Clear the field
        #[arg(long, conflicts_with = "value")]
        clear: bool,
    },

    /// Set a cell of a matrix section
    Cell {
        section: String,
        /// Row label
        row: String,
        /// Column number, starting at 1
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        column: u64,
        text: String,
    },

    /// Run a full resize pass
    Sync,

    /// Clear every section
    Clear,

    /// Replace the state with a snapshot file
    Import {
        /// Snapshot JSON file
        file: PathBuf,
    },

    /// Print the current snapshot
    Snapshot,

    /// Write the flattened CSV export
    Export {
        /// Output file (default: the configured export file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(state) = cli.state {
        config.state_file = state;
    }
    if let Some(export) = cli.export {
        config.export_file = export;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    set_log_level(config.log_level);

    let store = Store::from_config(&config);

    let result = match cli.command {
        Commands::Sections { json } => cmd_sections(json),
        Commands::Show { section } => cmd_show(&store, &section),
        Commands::Set {
            section,
            field,
            value,
            clear,
        } => cmd_set(&store, &section, &field, if clear { None } else { value }),
        Commands::Cell {
            section,
            row,
            column,
            text,
        } => cmd_cell(&store, &section, &row, column, &text),
        Commands::Sync => cmd_sync(&store),
        Commands::Clear => cmd_clear(&store),
        Commands::Import { file } => cmd_import(&store, &file),
        Commands::Snapshot => cmd_snapshot(&store),
        Commands::Export { output } => cmd_export(&store, output),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn load(store: &Store) -> W2ConResult<Engine> {
    let mut engine = Engine::default();
    if store.load(&mut engine)?.is_none() {
        log_info(format!(
            "No state at {}, starting empty",
            store.state_path().display()
        ));
    }
    Ok(engine)
}

fn cmd_sections(json: bool) -> W2ConResult<()> {
    if json {
        let text = serde_json::to_string_pretty(&*W2_CATALOG).map_err(StoreError::from)?;
        println!("{}", text);
        return Ok(());
    }
    for section in W2_CATALOG.instantiate() {
        println!("{:<8} {}", section.kind(), section.name());
    }
    Ok(())
}

fn cmd_show(store: &Store, name: &str) -> W2ConResult<()> {
    let engine = load(store)?;
    match engine.document().get(name)? {
        Section::Scalar(scalar) => {
            // Dimension fields, which resize other sections, are starred.
            for (field, (label, value)) in scalar.fields().iter().zip(scalar.get_all()) {
                let marker = if W2_CATALOG.is_dimension(name, &label) { "*" } else { " " };
                println!(
                    "{}{:<10} {:<12} {}",
                    marker,
                    label,
                    value.unwrap_or_default(),
                    field.description
                );
            }
        }
        Section::Matrix(matrix) => {
            println!("{:<10} {}", "", matrix.headers().join("\t"));
            for row in matrix.get_data() {
                if let Some((label, values)) = row.split_first() {
                    println!("{:<10} {}", label, values.join("\t"));
                }
            }
        }
    }
    Ok(())
}

fn cmd_set(store: &Store, section: &str, field: &str, value: Option<String>) -> W2ConResult<()> {
    let mut engine = load(store)?;
    engine.set_field(section, field, value.as_deref())?;
    store.save(engine.document())?;
    log_success(format!("{}.{} updated", section, field));
    Ok(())
}

fn cmd_cell(store: &Store, section: &str, row: &str, column: u64, text: &str) -> W2ConResult<()> {
    let mut engine = load(store)?;
    engine.set_cell(section, row, column as usize - 1, text)?;
    store.save(engine.document())?;
    log_success(format!("{}.{}[{}] updated", section, row, column));
    Ok(())
}

fn cmd_sync(store: &Store) -> W2ConResult<()> {
    let mut engine = load(store)?;
    engine.sync().log("sync");
    store.save(engine.document())?;
    Ok(())
}

fn cmd_clear(store: &Store) -> W2ConResult<()> {
    let mut engine = load(store)?;
    engine.clear_all();
    store.save(engine.document())?;
    log_success("All sections cleared");
    Ok(())
}

// The current state is replaced whole, so it is not loaded first.
fn cmd_import(store: &Store, file: &Path) -> W2ConResult<()> {
    let mut engine = Engine::default();
    store.import(file, &mut engine)?;
    store.save(engine.document())?;
    log_success(format!("Imported {}", file.display()));
    Ok(())
}

fn cmd_snapshot(store: &Store) -> W2ConResult<()> {
    let engine = load(store)?;
    println!("{}", Snapshot::capture(engine.document()).to_json_string()?);
    Ok(())
}

fn cmd_export(store: &Store, output: Option<PathBuf>) -> W2ConResult<()> {
    let mut engine = load(store)?;
    store.export(
        &mut engine,
        &ExportOptions {
            path: output,
            clear_after: false,
        },
    )?;
    Ok(())
}
