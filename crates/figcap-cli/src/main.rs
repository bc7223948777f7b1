mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "figcap",
    version,
    about = "Figure caption / body word co-occurrence for PubMed Central articles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every id in a list and write data.csv, data.json and an HTML table
    Run {
        /// Id list file: one PMCID per line, first line is a header
        ids_file: PathBuf,

        /// Directory the output files are written to
        #[arg(short = 'O', long = "out-dir", value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Endpoint template; {id} is replaced by the document id
        #[arg(long, env = "FIGCAP_ENDPOINT", default_value = figcap_core::fetch::eutils::DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Read <DIR>/<id>.xml instead of fetching over HTTP
        #[arg(long, value_name = "DIR")]
        from_dir: Option<PathBuf>,

        /// Reuse the previous figure's caption/graphic when a figure lacks one
        #[arg(long)]
        legacy_carry_over: bool,

        /// Also load the records into this SQLite document store
        #[arg(long, env = "FIGCAP_STORE", value_name = "PATH")]
        store: Option<PathBuf>,

        /// Store collection name
        #[arg(long, default_value = figcap_core::store::DEFAULT_COLLECTION)]
        collection: String,

        /// CSV output file name
        #[arg(long, default_value = "data.csv")]
        csv: String,

        /// JSON output file name
        #[arg(long, default_value = "data.json")]
        json: String,

        /// HTML output file name
        #[arg(long, default_value = "BenchSci_PMC.html")]
        html: String,
    },
    /// Extract figure records from a local XML file (without fetching)
    Extract {
        /// Path to an article XML file
        input_file: PathBuf,

        /// Document id for the records (default: file stem)
        #[arg(long)]
        id: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Reuse the previous figure's caption/graphic when a figure lacks one
        #[arg(long)]
        legacy_carry_over: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("figcap_cli=info,figcap_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            ids_file,
            out_dir,
            endpoint,
            from_dir,
            legacy_carry_over,
            store,
            collection,
            csv,
            json,
            html,
        } => commands::run::run(commands::run::RunArgs {
            ids_file,
            out_dir,
            endpoint,
            from_dir,
            legacy_carry_over,
            store,
            collection,
            file_names: commands::run::OutputNames { csv, json, html },
        }),
        Commands::Extract {
            input_file,
            id,
            output,
            legacy_carry_over,
        } => commands::extract::run(input_file, id, &output, legacy_carry_over),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
