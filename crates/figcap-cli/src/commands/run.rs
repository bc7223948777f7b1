use std::path::{Path, PathBuf};

use figcap_core::error::FigcapError;
use figcap_core::export::{csv, html, json};
use figcap_core::fetch::directory::DirectoryFetcher;
use figcap_core::fetch::eutils::EutilsFetcher;
use figcap_core::fetch::DocumentFetcher;
use figcap_core::store::{self, SqliteStore};
use tracing::{info, warn};

use crate::commands::extract_options;

pub struct OutputNames {
    pub csv: String,
    pub json: String,
    pub html: String,
}

pub struct RunArgs {
    pub ids_file: PathBuf,
    pub out_dir: PathBuf,
    pub endpoint: String,
    pub from_dir: Option<PathBuf>,
    pub legacy_carry_over: bool,
    pub store: Option<PathBuf>,
    pub collection: String,
    pub file_names: OutputNames,
}

pub fn run(args: RunArgs) -> Result<(), FigcapError> {
    info!("loading the document ids");
    let ids = figcap_core::load_id_list(&args.ids_file)?;
    if ids.is_empty() {
        warn!(ids_file = %args.ids_file.display(), "id list has no document ids");
    }

    let fetcher: Box<dyn DocumentFetcher> = match args.from_dir {
        Some(dir) => Box::new(DirectoryFetcher::new(dir)),
        None => Box::new(EutilsFetcher::new(&args.endpoint)?),
    };

    info!(
        documents = ids.len(),
        backend = fetcher.backend_name(),
        "building the result table"
    );
    let options = extract_options(args.legacy_carry_over);
    let table = figcap_core::build_table(&ids, fetcher.as_ref(), &options);

    std::fs::create_dir_all(&args.out_dir)?;
    let names = &args.file_names;
    write_output(&args.out_dir, &names.csv, &csv::write_csv(&table))?;
    write_output(&args.out_dir, &names.json, &json::write_json(&table)?)?;
    write_output(&args.out_dir, &names.html, &html::write_html(&table))?;

    if let Some(path) = args.store {
        let mut db = SqliteStore::open(&path)?;
        let inserted = store::load_table(&mut db, &args.collection, &table)?;
        info!(
            inserted,
            collection = %args.collection,
            store = %path.display(),
            "loaded records into document store"
        );
    }

    eprintln!(
        "{} figure record(s) from {} of {} document(s), written to {}",
        table.len(),
        table.document_count(),
        ids.len(),
        args.out_dir.display()
    );

    Ok(())
}

fn write_output(dir: &Path, name: &str, contents: &str) -> Result<(), FigcapError> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    info!(path = %path.display(), "wrote output file");
    Ok(())
}
