//! CLI tool for filtering movie rating datasets and generating reports.

mod lookup;

use anyhow::{Context, Result};
use clap::Parser;
use lookup::OmdbClient;
use movie_core::{
    apply_filters, filter_options, Artifact, Dataset, DatasetSummary, EngineConfig,
    FilterSelection, MetadataLookup, RankedSummary, Rankings, SchemaNormalizer, TabularFormat,
    Value,
};
use movie_csv::{CsvExporter, CsvParser};
use movie_pdf::DocumentReport;
use movie_pptx::SlideReport;
use movie_xlsx::XlsxParser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Rows shown in the data previews.
const PREVIEW_ROWS: usize = 5;

/// Filter a movie ratings file and export CSV, PDF and PPTX reports.
#[derive(Parser, Debug)]
#[command(name = "movie-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input dataset (.csv or .xlsx)
    #[arg(required_unless_present = "lookup")]
    input: Option<PathBuf>,

    /// Genre to keep (repeatable). Filtering needs both a genre and a year.
    #[arg(short, long = "genre")]
    genres: Vec<String>,

    /// Year to keep (repeatable). Filtering needs both a genre and a year.
    #[arg(short, long = "year")]
    years: Vec<String>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not write the filtered CSV
    #[arg(long)]
    skip_csv: bool,

    /// Do not write the PDF report
    #[arg(long)]
    skip_pdf: bool,

    /// Do not write the PPTX report
    #[arg(long)]
    skip_pptx: bool,

    /// Print the analytics summary as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Look up a title on OMDb
    #[arg(long, value_name = "TITLE")]
    lookup: Option<String>,

    /// OMDb API key
    #[arg(long, env = "OMDB_API", hide_env_values = true)]
    api_key: Option<String>,

    /// Timeout for the OMDb lookup, in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// What one run computed, for `--json`.
#[derive(Debug, Serialize)]
struct RunReport {
    total_rows: usize,
    filtered_rows: usize,
    selection_applied: bool,
    summary: DatasetSummary,
    rankings: Option<Rankings>,
    artifacts: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = EngineConfig::default();

    if let Some(input_path) = &args.input {
        let report = process_file(input_path, &args, &config)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(title) = &args.lookup {
        // Lookup failures are reported but never fail the analytics run.
        if let Err(e) = run_lookup(title, &args) {
            eprintln!("Error: {:#}", e);
        }
    }

    Ok(())
}

/// Run the full ingest, normalize, filter, rank and render chain for one file.
fn process_file(input_path: &Path, args: &Args, config: &EngineConfig) -> Result<RunReport> {
    let bytes = std::fs::read(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let movies = load_dataset(&bytes, filename, config)
        .with_context(|| format!("Failed to load {}", input_path.display()))?;

    if args.verbose {
        eprintln!(
            "Loaded {} rows with columns: {}",
            movies.row_count(),
            movies.columns.join(", ")
        );
    }

    let selection = build_selection(&movies, args);
    let filtered = apply_filters(&movies, &selection).context("Failed to filter dataset")?;

    if !args.json {
        println!("Data preview");
        print_table(&movies.head(PREVIEW_ROWS));
        println!();
        println!("Filtered row count: {}", filtered.row_count());
        print_table(&filtered.head(PREVIEW_ROWS));
    }

    let out_dir = output_dir(args.output.as_ref())?;
    let mut written = Vec::new();

    if !args.skip_csv {
        let artifact = CsvExporter::new().export(&filtered)?;
        written.push(write_artifact(&out_dir, &artifact)?);
    }

    let rankings = match Rankings::compute(&filtered, config) {
        Ok(rankings) => Some(rankings),
        Err(e) if e.is_soft() => {
            log::warn!("Rankings unavailable: {}", e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(rankings) = rankings.as_ref().filter(|_| !filtered.is_empty()) {
        if !args.json {
            println!();
            println!("Top {} highest (critic rating)", config.top_n);
            print_ranking(&rankings.highest);
            println!("Top {} lowest (critic rating)", config.top_n);
            print_ranking(&rankings.lowest);
        }

        if !args.skip_pdf {
            let artifact = DocumentReport::new().render(&rankings.highest, &rankings.lowest);
            written.push(write_artifact(&out_dir, &artifact)?);
        }
    } else if !args.skip_pdf {
        log::warn!("No critic ratings to rank; skipping PDF report");
    }

    let summary = DatasetSummary::from_dataset(&filtered);

    if !args.skip_pptx {
        let empty = Rankings::default();
        let ranked = rankings.as_ref().unwrap_or(&empty);
        let artifact = SlideReport::new().render(&summary, &ranked.highest, &ranked.lowest)?;
        written.push(write_artifact(&out_dir, &artifact)?);
    }

    if args.verbose {
        for path in &written {
            eprintln!("Written to: {}", path.display());
        }
    }

    Ok(RunReport {
        total_rows: movies.row_count(),
        filtered_rows: filtered.row_count(),
        selection_applied: selection.is_active(),
        summary,
        rankings,
        artifacts: written,
    })
}

/// Parse uploaded bytes with the parser picked by the file name, then
/// normalize the schema.
fn load_dataset(bytes: &[u8], filename: &str, config: &EngineConfig) -> movie_core::Result<Dataset> {
    let raw = match TabularFormat::detect(filename, bytes)? {
        TabularFormat::Csv => {
            log::debug!("Parsing as CSV");
            CsvParser::new().parse_bytes(bytes)?
        }
        TabularFormat::Xlsx => {
            log::debug!("Parsing as XLSX");
            XlsxParser::new().parse_bytes(bytes)?
        }
    };

    SchemaNormalizer::new(config.aliases.clone()).normalize_owned(raw)
}

/// Selection from the command line. Values are typed like dataset cells so
/// `--year 2001` matches an integer Year column. Choices the dataset does
/// not offer are reported but kept.
fn build_selection(movies: &Dataset, args: &Args) -> FilterSelection {
    let options = filter_options(movies);
    let selection = FilterSelection::new()
        .with_genres(args.genres.iter().map(|g| Value::parse_cell(g)))
        .with_years(args.years.iter().map(|y| Value::parse_cell(y)));

    for genre in selection.genres.iter().filter(|g| !options.genres.contains(g)) {
        log::warn!("Genre '{}' does not occur in the dataset", genre);
    }
    for year in selection.years.iter().filter(|y| !options.years.contains(y)) {
        log::warn!("Year '{}' does not occur in the dataset", year);
    }
    if !selection.is_active() && (!selection.genres.is_empty() || !selection.years.is_empty()) {
        log::warn!("Filtering needs both a genre and a year; showing all rows");
    }

    selection
}

fn run_lookup(title: &str, args: &Args) -> Result<()> {
    let api_key = args
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .context("An OMDb API key and a movie title are both required")?;

    let client = OmdbClient::new(api_key, Duration::from_secs(args.timeout_secs))?;
    match client.lookup(title)? {
        Some(meta) => {
            println!("{} ({})", meta.title, meta.year);
            println!("  IMDB Rating: {}", meta.imdb_rating);
            println!("  Genre:       {}", meta.genre);
            println!("  Director:    {}", meta.director);
            println!("  Actors:      {}", meta.actors);
            println!("  Runtime:     {}", meta.runtime);
            println!("  Plot:        {}", meta.plot);
            if let Some(url) = meta.poster_url() {
                println!("  Poster:      {}", url);
            }
        }
        None => println!("Movie not found."),
    }
    Ok(())
}

/// Determine the directory artifacts are written to.
fn output_dir(output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            Ok(dir.clone())
        }
        None => Ok(PathBuf::from(".")),
    }
}

/// Write an artifact under its suggested file name.
fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
    let path = dir.join(artifact.suggested_filename());
    std::fs::write(&path, artifact.bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn print_table(dataset: &Dataset) {
    println!("{}", dataset.columns.join(" | "));
    for row in &dataset.rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join(" | "));
    }
}

fn print_ranking(summary: &RankedSummary) {
    for entry in &summary.entries {
        println!("  {}", entry.label());
    }
}
