// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # roombook-cli
//!
//! Administrative data management against a booking database file.
//!
//! - `import <users|bookings> <file>` loads a CSV batch. Row failures are
//!   listed and do not fail the command.
//! - `preview <users|bookings> <file>` validates a batch without writing.
//! - `export <users|bookings>` writes a CSV dump to stdout or `--output`.
//! - `template <users|bookings>` prints a sample import file.
//!
//! The command line acts with full administrative rights; there is no actor.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use roombook_api::{
    ImportOptions, ImportPreview, ImportResult, RecordKind, RowStatus, export_csv, import_csv,
    import_template, preview_import,
};
use roombook_persistence::{BookingRepository, Persistence};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_log::AsTrace;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .without_time()
        .init();

    match args.run().await {
        Ok(()) => (),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    async fn run(self) -> Result<()> {
        let mut stdout = io::stdout();
        if let Command::Template { kind } = self.command {
            return write_template(kind.into(), &mut stdout);
        }

        let Some(path) = self.database.as_deref() else {
            color_eyre::eyre::bail!("--database is required for this command");
        };
        let persistence: Persistence = open_database(path)?;
        self.command.execute(&persistence, &mut stdout).await
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Import a CSV file
    #[command(visible_alias = "i")]
    Import {
        kind: Kind,
        file: PathBuf,
        /// Insert bookings without checking them against existing ones
        #[arg(long)]
        bypass_conflicts: bool,
    },

    /// Validate a CSV file without importing it
    #[command(visible_alias = "p")]
    Preview { kind: Kind, file: PathBuf },

    /// Export records as CSV
    #[command(visible_alias = "e")]
    Export {
        kind: Kind,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a sample import file
    #[command(visible_alias = "t")]
    Template { kind: Kind },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Users,
    Bookings,
}

impl From<Kind> for RecordKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Users => Self::Users,
            Kind::Bookings => Self::Bookings,
        }
    }
}

impl Command {
    async fn execute(
        self,
        repository: &dyn BookingRepository,
        out: &mut dyn Write,
    ) -> Result<()> {
        match self {
            Self::Import {
                kind,
                file,
                bypass_conflicts,
            } => {
                let text: String = read_csv(&file)?;
                let options: ImportOptions = ImportOptions { bypass_conflicts };
                let result: ImportResult =
                    import_csv(repository, kind.into(), &text, options).await?;
                write_import_result(&result, out)
            }
            Self::Preview { kind, file } => {
                let text: String = read_csv(&file)?;
                let preview: ImportPreview = preview_import(kind.into(), &text)?;
                write_preview(&preview, out)
            }
            Self::Export { kind, output } => {
                let csv: String = export_csv(repository, kind.into()).await?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, csv)
                            .wrap_err_with(|| format!("writing {}", path.display()))?;
                        info!(path = %path.display(), "Export written");
                        Ok(())
                    }
                    None => out.write_all(csv.as_bytes()).wrap_err("writing export"),
                }
            }
            Self::Template { kind } => write_template(kind.into(), out),
        }
    }
}

fn open_database(path: &Path) -> Result<Persistence> {
    info!(path = %path.display(), "Opening database");
    Persistence::new_with_file(path).wrap_err_with(|| format!("opening {}", path.display()))
}

fn read_csv(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))
}

fn write_template(kind: RecordKind, out: &mut dyn Write) -> Result<()> {
    out.write_all(import_template(kind).as_bytes())
        .wrap_err("writing template")
}

fn write_import_result(result: &ImportResult, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "Imported {} row(s), {} failed",
        result.success_count, result.failed_count
    )?;
    for err in &result.errors {
        writeln!(out, "  {err}")?;
    }
    Ok(())
}

fn write_preview(preview: &ImportPreview, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{} row(s): {} valid, {} invalid",
        preview.total_rows, preview.valid_count, preview.invalid_count
    )?;
    for row in &preview.rows {
        let marker: &str = match row.status {
            RowStatus::Valid => "ok",
            RowStatus::Invalid => "INVALID",
        };
        writeln!(out, "  row {} {} [{marker}]", row.row_number, row.key)?;
        for err in &row.errors {
            writeln!(out, "    {err}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
