use bkg_merger::{collect_inputs, inspect, MergeRun, MergerConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "bkg-merger", version)]
#[command(about = "Merge booking exports into one colored container sheet")]
struct Args {
    /// JSON config file (defaults to the user config, then built-in values)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge workbooks (or directories of workbooks) into one report
    Merge {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output workbook path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Append a summary sheet with aggregate counts
        #[arg(long)]
        summary: bool,

        /// Seed for reproducible booking colors
        #[arg(long)]
        seed: Option<u64>,

        /// Back up an existing output file before replacing it
        #[arg(long)]
        backup: bool,
    },
    /// Show where the header row is and how many rows a merge would emit
    Inspect { file: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "bkg_merger=debug"
    } else {
        "bkg_merger=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = MergerConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Merge {
            inputs,
            output,
            summary,
            seed,
            backup,
        } => {
            if let Some(output) = output {
                config.output_path = output;
            }
            config.write_summary |= summary;
            config.backup_existing |= backup;
            if seed.is_some() {
                config.color_seed = seed;
            }
            run_merge(config, &inputs)
        }
        Command::Inspect { file } => run_inspect(config, &file),
    }
}

fn run_merge(config: MergerConfig, paths: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let input_set = collect_inputs(paths)?;
    for rejected in &input_set.rejected {
        eprintln!("Skipped (not an Excel file): {}", rejected.display());
    }

    let outcome = MergeRun::new(config).run(&input_set.files)?;

    println!("Output: {}", outcome.output.display());
    println!("Total BKG NO: {}", outcome.summary.total_bookings);
    println!("Total CNTR NO: {}", outcome.summary.total_containers);
    println!("Files processed: {}", outcome.summary.files_processed);
    for skipped in &outcome.summary.skipped_files {
        println!("Skipped (no REMARK column): {}", skipped);
    }
    if let Some(backup) = &outcome.backup {
        println!("Backup: {}", backup);
    }
    println!("SHA-256: {}", outcome.checksum);

    Ok(())
}

fn run_inspect(config: MergerConfig, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let report = inspect(file, &config)?;

    println!("File: {}", report.path.display());
    println!("Sheet: {}", report.sheet_name);
    for sheet in &report.sheets {
        println!(
            "  [{}] {} ({} rows x {} cols)",
            sheet.index, sheet.name, sheet.row_count, sheet.col_count
        );
    }
    match (report.header_row, report.header_col, &report.header_value) {
        (Some(row), Some(col), Some(value)) => {
            println!("Header row: {}", row);
            println!("Header column: {}", col);
            println!("Header cell: {}", value);
        }
        _ => println!(
            "Header marker '{}' not found, using the first row",
            config.header_marker
        ),
    }
    println!("Columns: {}", report.headers.join(", "));
    if !report.has_remarks {
        println!("No REMARK column found, a merge would skip this file");
    }
    println!("Source rows: {}", report.source_rows);
    println!("Processed rows: {}", report.processed_rows);

    Ok(())
}
