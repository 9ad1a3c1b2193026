//! pdfsections CLI - section extraction for PDF prospectuses

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsections::detect::is_pdf_bytes;
use pdfsections::extract::API_URL_ENV;
use pdfsections::render::{self, JsonFormat, MarkdownOptions};
use pdfsections::{
    Document, ExtractOptions, ExtractionStrategy, LocalExtractor, PageSelection, RemoteExtractor,
    StructureExtractor,
};

#[derive(Parser)]
#[command(name = "pdfsections")]
#[command(version)]
#[command(about = "Split PDF prospectuses into titled sections", long_about = None)]
struct Cli {
    /// Use the extraction service instead of local heading detection
    #[arg(long, global = true)]
    remote: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract sections from a PDF
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show the height statistics behind heading detection
    Profile {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Upload a PDF to the extraction service
    Upload {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Extraction service base URL
        #[arg(long, env = API_URL_ENV, default_value = pdfsections::extract::DEFAULT_API_URL)]
        api_url: String,

        /// Print the linked file with this name after uploading
        #[arg(long, value_name = "NAME")]
        preview: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract sections from every PDF in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by the commands that run local extraction.
#[derive(clap::Args)]
struct ExtractArgs {
    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Skip pages that fail to decode
    #[arg(long)]
    lenient: bool,

    /// Decode pages on one thread
    #[arg(long)]
    sequential: bool,

    /// Heading threshold as a multiple of the body text height
    #[arg(long, value_name = "RATIO")]
    ratio: Option<f64>,

    /// Assign heading levels from height bands
    #[arg(long)]
    levels: bool,
}

impl ExtractArgs {
    fn options(&self) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
        let mut options = ExtractOptions::new();
        if let Some(ref pages) = self.pages {
            options = options.with_pages(PageSelection::parse(pages)?);
        }
        if self.lenient {
            options = options.lenient();
        }
        if self.sequential {
            options = options.sequential();
        }
        if let Some(ratio) = self.ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(format!("Invalid ratio: {}", ratio).into());
            }
            options = options.with_header_ratio(ratio);
        }
        if self.levels {
            options = options.with_levels();
        }
        Ok(options)
    }

    fn strategy(&self, remote: bool) -> Result<ExtractionStrategy, Box<dyn std::error::Error>> {
        if remote {
            Ok(ExtractionStrategy::remote_from_env())
        } else {
            Ok(ExtractionStrategy::Local(self.options()?))
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// JSON document
    Json,
    /// Markdown with one heading per section
    Markdown,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Sections {
            input,
            output,
            format,
            compact,
            extract,
        }) => extract
            .strategy(cli.remote)
            .and_then(|s| cmd_sections(&input, output.as_deref(), format, compact, s)),
        Some(Commands::Profile { input, extract }) => cmd_profile(&input, &extract),
        Some(Commands::Upload {
            input,
            api_url,
            preview,
            output,
        }) => cmd_upload(&input, &api_url, preview.as_deref(), output.as_deref()),
        Some(Commands::Batch {
            input,
            output,
            extract,
        }) => extract
            .strategy(cli.remote)
            .and_then(|s| cmd_batch(&input, output.as_deref(), s)),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdfsections sections <FILE>".yellow());
            println!("       pdfsections --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn warn_if_empty(doc: &Document) {
    if !doc.has_structure() {
        eprintln!(
            "{} {} has no extractable text (scanned or image-only?)",
            "Warning:".yellow().bold(),
            doc.file_name()
        );
    }
}

fn cmd_sections(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    compact: bool,
    strategy: ExtractionStrategy,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = strategy.build()?;
    let data = fs::read(input)?;
    let doc = extractor.extract(&data, &file_name_of(input))?;
    warn_if_empty(&doc);

    let content = match format {
        OutputFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&doc, json_format)?
        }
        OutputFormat::Markdown => render::to_markdown(&doc, &MarkdownOptions::default())?,
    };

    write_or_print(output, &content)
}

fn cmd_profile(input: &Path, args: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options()?;
    let ratio = options.segment.header_ratio;
    let extraction = LocalExtractor::new(options).analyze_file(input)?;
    let profile = &extraction.profile;
    let doc = &extraction.document;

    println!("{}", "Typography Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Fragments".bold(), profile.fragment_count());
    println!("{}: {}", "Body height".bold(), profile.mode_height());
    println!(
        "{}: {:.2} (x{})",
        "Heading threshold".bold(),
        profile.threshold_for(ratio),
        ratio
    );
    println!("{}: {}", "Sections".bold(), doc.sections().len());

    if profile.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", "Height Histogram".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let mut rows = profile.histogram().to_vec();
    rows.sort_by(|a, b| b.0.cmp(&a.0));
    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(1);
    for (height, count) in rows {
        let width = (count * 30).div_ceil(max);
        let bar = "█".repeat(width);
        let bar = if f64::from(height) >= profile.threshold_for(ratio) {
            bar.yellow()
        } else {
            bar.dimmed()
        };
        println!("{:>5}  {:>7}  {}", height, count, bar);
    }

    Ok(())
}

fn cmd_upload(
    input: &Path,
    api_url: &str,
    preview: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = RemoteExtractor::new(api_url)?;
    let data = fs::read(input)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Uploading to {}...", extractor.base_url()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    let result = extractor.extract(&data, &file_name_of(input));
    spinner.finish_and_clear();
    let doc = result?;

    println!(
        "{} {} sections, {} files",
        "Extracted".green(),
        doc.sections().len(),
        doc.file_links().map_or(0, |links| links.len())
    );

    if let Some(name) = preview {
        let link = doc
            .file_links()
            .and_then(|links| links.iter().find(|l| l.name == name))
            .ok_or_else(|| format!("No linked file named {:?}", name))?;
        println!("{}", extractor.fetch_preview(link)?);
        return Ok(());
    }

    write_or_print(output, &render::to_json(&doc, JsonFormat::Pretty)?)
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    strategy: ExtractionStrategy,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.unwrap_or(input).to_path_buf();
    fs::create_dir_all(&output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();

    let extractor = strategy.build()?;
    log::info!("Batch extracting {} files with {}", files.len(), extractor.name());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failed = Vec::new();
    for path in &files {
        let name = file_name_of(path);
        pb.set_message(name.clone());
        match extract_one(extractor.as_ref(), path, &name, &output_dir) {
            Ok(()) => {}
            Err(e) => failed.push((name, e.to_string())),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} files",
        "Extracted".green().bold(),
        files.len() - failed.len(),
        files.len()
    );
    for (name, error) in &failed {
        println!("  {} {}: {}", "✗".red(), name, error);
    }

    Ok(())
}

fn extract_one(
    extractor: &dyn StructureExtractor,
    path: &Path,
    name: &str,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(path)?;
    if !is_pdf_bytes(&data) {
        return Err("not a PDF".into());
    }
    let doc = extractor.extract(&data, name)?;
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let file = fs::File::create(output_dir.join(format!("{}.json", stem)))?;
    let mut writer = io::BufWriter::new(file);
    render::write_json(&mut writer, &doc, JsonFormat::Pretty)?;
    writer.flush()?;
    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdfsections".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Section extraction for PDF prospectuses");
    println!();
    println!("License: MIT");
}
