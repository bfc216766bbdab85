//! docfocus CLI - persona-driven analysis of PDF collections

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docfocus::{
    detect, render, AnalysisOptions, CollectionAnalyzer, CollectionRequest, Encoder, ErrorMode,
    ExtractOptions, HashingEncoder, JsonFormat, PageSelection, PdfTextExtractor, PersonaJob,
    SectionSegmenter,
};

#[derive(Parser)]
#[command(name = "docfocus")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rank PDF sections by relevance to a persona and task", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a collection of PDFs and write the ranking report
    Analyze {
        /// Input PDF files
        #[arg(value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Directory containing the input PDFs
        #[arg(short, long, value_name = "DIR")]
        input_dir: Option<PathBuf>,

        /// Collection request JSON (documents, persona, job)
        #[arg(long, value_name = "FILE")]
        input_json: Option<PathBuf>,

        /// Persona (auto-detected from file names if not given)
        #[arg(long, env = "PERSONA")]
        persona: Option<String>,

        /// Job to be done (auto-detected from file names if not given)
        #[arg(long, env = "JOB_TO_BE_DONE")]
        job: Option<String>,

        /// Output directory, or "-" for stdout
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Number of top sections to report
        #[arg(long, default_value = "5")]
        top: usize,

        /// Page range applied to every document (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Semantic encoder
        #[arg(long, value_enum, default_value = "hashing")]
        encoder: EncoderKind,
    },

    /// Show the sections detected in a PDF
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output sections as JSON
        #[arg(long)]
        json: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show the persona and job detected for a set of files
    Persona {
        /// Input files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EncoderKind {
    /// Feature-hashing encoder (offline, deterministic)
    Hashing,
    /// all-MiniLM-L6-v2 sentence transformer (requires the minilm feature)
    Minilm,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            inputs,
            input_dir,
            input_json,
            persona,
            job,
            output,
            top,
            pages,
            compact,
            encoder,
        } => cmd_analyze(AnalyzeArgs {
            inputs,
            input_dir,
            input_json,
            persona,
            job,
            output,
            top,
            pages,
            compact,
            encoder,
        }),
        Commands::Sections { input, json, pages } => {
            cmd_sections(&input, json, pages.as_deref())
        }
        Commands::Persona { inputs } => {
            cmd_persona(&inputs);
            Ok(())
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

struct AnalyzeArgs {
    inputs: Vec<PathBuf>,
    input_dir: Option<PathBuf>,
    input_json: Option<PathBuf>,
    persona: Option<String>,
    job: Option<String>,
    output: PathBuf,
    top: usize,
    pages: Option<String>,
    compact: bool,
    encoder: EncoderKind,
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?),
        None => Ok(PageSelection::All),
    }
}

fn build_encoder(kind: EncoderKind) -> Result<Box<dyn Encoder>, Box<dyn std::error::Error>> {
    match kind {
        EncoderKind::Hashing => Ok(Box::new(HashingEncoder::new())),
        #[cfg(feature = "minilm")]
        EncoderKind::Minilm => Ok(Box::new(docfocus::encoder::MiniLmEncoder::load()?)),
        #[cfg(not(feature = "minilm"))]
        EncoderKind::Minilm => {
            Err("docfocus was built without the minilm feature (rebuild with --features minilm)".into())
        }
    }
}

fn cmd_analyze(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let format = if args.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let extract_options = ExtractOptions::new()
        .with_error_mode(ErrorMode::Lenient)
        .with_pages(parse_pages(args.pages.as_deref())?);
    let analysis_options = AnalysisOptions::new().with_top_sections(args.top);
    log::debug!(
        "Options: top={}, pages={:?}, encoder={:?}",
        args.top,
        extract_options.pages,
        args.encoder
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Loading encoder...");
    let analyzer = CollectionAnalyzer::new(build_encoder(args.encoder)?)
        .with_options(analysis_options)
        .with_extract_options(extract_options);

    let report = if let Some(json_path) = &args.input_json {
        let request = CollectionRequest::load(json_path)?;
        if request.documents.is_empty() {
            return Err("No PDF files listed in the collection request".into());
        }
        // Collections keep their PDFs in a PDFs/ folder next to the request file.
        let pdf_dir = args.input_dir.clone().unwrap_or_else(|| {
            json_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("PDFs")
        });
        let persona_job = PersonaJob::new(
            request.persona.role.clone(),
            request.job_to_be_done.task.clone(),
        )
        .with_overrides(args.persona, args.job);
        log::debug!(
            "Request {}: persona={:?}, job={:?}, pdf dir {}",
            json_path.display(),
            persona_job.persona,
            persona_job.job,
            pdf_dir.display()
        );

        pb.set_message(format!("Analyzing {} documents...", request.documents.len()));
        analyzer.analyze_files(
            &request.document_paths(&pdf_dir),
            &persona_job.persona,
            &persona_job.job,
        )?
    } else {
        let paths = if args.inputs.is_empty() {
            let dir = args.input_dir.unwrap_or_else(|| PathBuf::from("input"));
            detect::collect_pdfs(&dir)
                .map_err(|e| format!("Cannot read input directory {}: {}", dir.display(), e))?
        } else {
            args.inputs
        };
        if paths.is_empty() {
            return Err("No PDF files found".into());
        }

        let persona_job = PersonaJob::detect(&paths).with_overrides(args.persona, args.job);
        log::debug!(
            "Resolved persona={:?}, job={:?} for {} files",
            persona_job.persona,
            persona_job.job,
            paths.len()
        );
        pb.set_message(format!("Analyzing {} documents...", paths.len()));
        analyzer.analyze_files(&paths, &persona_job.persona, &persona_job.job)?
    };

    pb.finish_and_clear();

    if args.output.as_os_str() == "-" {
        println!("{}", render::to_json(&report, format)?);
        return Ok(());
    }

    let path = render::write_report(&report, &args.output, format)?;

    println!("{}", render::to_text(&report));
    println!("\n{} {}", "Saved to".green(), path.display());
    if !report.metadata.skipped_documents.is_empty() {
        println!(
            "{} {} document(s) skipped",
            "Warning:".yellow().bold(),
            report.metadata.skipped_documents.len()
        );
    }

    Ok(())
}

fn cmd_sections(
    input: &Path,
    json: bool,
    pages: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions::new()
        .with_error_mode(ErrorMode::Lenient)
        .with_pages(parse_pages(pages)?);
    let doc = PdfTextExtractor::new(options).extract_file(input)?;
    let sections = SectionSegmenter::default().segment(&doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    println!(
        "{} {} ({} sections)",
        "Document:".cyan().bold(),
        doc.id,
        sections.len()
    );
    for (i, section) in sections.iter().enumerate() {
        println!(
            "  {:>3}. {} {} {}",
            i + 1,
            format!("p.{}", section.page).dimmed(),
            section.title.bold(),
            format!("({} chars)", section.char_len()).dimmed()
        );
    }

    Ok(())
}

fn cmd_persona(inputs: &[PathBuf]) {
    let detected = PersonaJob::detect(inputs);
    println!("{} {}", "Persona:".cyan().bold(), detected.persona);
    println!("{} {}", "Job:".cyan().bold(), detected.job);
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let version = detect::check_pdf_file(input)?;
    let doc = PdfTextExtractor::default().extract_file(input)?;
    let sections = SectionSegmenter::default().segment(&doc);
    let file_size = fs::metadata(input)?.len();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{:<16} {}", "File:".bold(), doc.id);
    println!("{:<16} {}", "PDF Version:".bold(), version);
    println!("{:<16} {} bytes", "File Size:".bold(), file_size);
    println!("{:<16} {}", "Pages:".bold(), doc.page_count);
    println!("{:<16} {}", "Text Lines:".bold(), doc.spans.len());
    println!("{:<16} {}", "Sections:".bold(), sections.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docfocus".cyan().bold(), env!("CARGO_PKG_VERSION"));
    let encoders = if cfg!(feature = "minilm") {
        "hashing, minilm"
    } else {
        "hashing"
    };
    println!("{} {}", "Encoders:".bold(), encoders);
}
