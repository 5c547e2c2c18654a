use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use newshauler::{
    CategoryMapping, FeedMapper, JsonlStore, RunContext, TaskConfiguration, TitleSlugger,
    TracingLogger,
};

/// Imports syndicated feeds into CMS-ready records
#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a feed and append its records to the store
    Import {
        /// Feed URL or local file path
        path: String,
        /// Target container id for imported records
        #[arg(long)]
        pid: i64,
        /// JSON file mapping category labels to category ids
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Remove previously imported records before importing
        #[arg(long)]
        clean: bool,
        /// Store items as external-URL records pointing at the original article
        #[arg(long)]
        external_url: bool,
        /// Generate a URL path segment for each record
        #[arg(long)]
        set_slug: bool,
        /// Acting user id recorded on each imported record
        #[arg(long, default_value_t = 0)]
        user: i64,
    },
}

fn store_dir() -> PathBuf {
    std::env::var("NEWS_STORE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Import {
            path,
            pid,
            mapping,
            clean,
            external_url,
            set_slug,
            user,
        } => cmd_import(path, pid, mapping, clean, external_url, set_slug, user),
    }
}

fn cmd_import(
    path: String,
    pid: i64,
    mapping: Option<PathBuf>,
    clean: bool,
    external_url: bool,
    set_slug: bool,
    user: i64,
) -> anyhow::Result<()> {
    let root = store_dir();
    let client = newshauler::http::http_client()?;
    let mapping = mapping
        .map(|file| CategoryMapping::from_json_file(&file))
        .transpose()?;

    let cfg = TaskConfiguration {
        pid,
        path: path.clone(),
        clean_before_import: clean,
        persist_as_external_url: external_url,
        set_slug,
        mapping,
    };
    let ctx = RunContext::now(user);
    let mut store = JsonlStore::open(&root);
    let mapper = FeedMapper {
        client: &client,
        public_root: &root,
        logger: &TracingLogger,
        slugs: &TitleSlugger,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message(path.clone());
    pb.enable_steady_tick(Duration::from_millis(100));
    let result = mapper.map(&cfg, &ctx, &mut store);
    pb.finish_and_clear();

    let records = result?;
    store.append(&records)?;
    println!("Imported {} records from {}", records.len(), path);
    Ok(())
}
