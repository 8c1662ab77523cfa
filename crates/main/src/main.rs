use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use resume_render::{render_docx, render_pdf, OptimizedResume, ResumePlan};

type CliResult = Result<(), Box<dyn Error>>;

/// Renders optimized résumés to PDF and DOCX from the command line.
///
/// The PDF path needs the Roboto font files under `assets/fonts` of the library crate, in
/// the directory named by `RESUME_RENDER_FONTS_DIR`, or installed system wide; Liberation
/// Sans is used when Roboto is missing. Set `RUST_LOG=debug` for layout details.
#[derive(Parser)]
#[command(author, version, about = "Render optimized résumés to PDF and DOCX")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the résumé to a PDF file.
    Pdf {
        /// Résumé JSON file, or `-` for stdin.
        input: PathBuf,
        /// Output file; defaults to `<prefix>_<Name>.pdf`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "Optimized")]
        prefix: String,
    },

    /// Render the résumé to a DOCX file.
    Docx {
        /// Résumé JSON file, or `-` for stdin.
        input: PathBuf,
        /// Output file; defaults to `<prefix>_<Name>.docx`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "Optimized")]
        prefix: String,
    },

    /// Render both documents into one directory.
    #[command(aliases = ["both"])]
    All {
        /// Résumé JSON file, or `-` for stdin.
        input: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long, default_value = "Optimized")]
        prefix: String,
    },

    /// Parse and validate the résumé, then print its sections.
    Validate {
        /// Résumé JSON file, or `-` for stdin.
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pdf {
            input,
            output,
            prefix,
        } => run_pdf(&input, output, &prefix),
        Commands::Docx {
            input,
            output,
            prefix,
        } => run_docx(&input, output, &prefix),
        Commands::All {
            input,
            out_dir,
            prefix,
        } => run_all(&input, &out_dir, &prefix),
        Commands::Validate { input } => run_validate(&input),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn load_resume(input: &Path) -> Result<OptimizedResume, Box<dyn Error>> {
    let resume = if input == Path::new("-") {
        OptimizedResume::from_reader(io::stdin().lock())?
    } else {
        let json = fs::read_to_string(input)
            .map_err(|err| format!("failed to read {}: {}", input.display(), err))?;
        OptimizedResume::from_json(&json)?
    };
    Ok(resume)
}

fn write_output(path: &Path, bytes: &[u8]) -> CliResult {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
        .map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    info!("wrote {} bytes to {}", bytes.len(), path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_pdf(input: &Path, output: Option<PathBuf>, prefix: &str) -> CliResult {
    let resume = load_resume(input)?;
    let path =
        output.unwrap_or_else(|| PathBuf::from(format!("{}.pdf", resume.download_stem(prefix))));
    write_output(&path, &render_pdf(&resume)?)
}

fn run_docx(input: &Path, output: Option<PathBuf>, prefix: &str) -> CliResult {
    let resume = load_resume(input)?;
    let path =
        output.unwrap_or_else(|| PathBuf::from(format!("{}.docx", resume.download_stem(prefix))));
    write_output(&path, &render_docx(&resume)?)
}

fn run_all(input: &Path, out_dir: &Path, prefix: &str) -> CliResult {
    let resume = load_resume(input)?;
    let stem = resume.download_stem(prefix);
    write_output(&out_dir.join(format!("{stem}.pdf")), &render_pdf(&resume)?)?;
    write_output(&out_dir.join(format!("{stem}.docx")), &render_docx(&resume)?)
}

fn run_validate(input: &Path) -> CliResult {
    let resume = load_resume(input)?;
    let plan = ResumePlan::from_resume(&resume);
    println!("{} is valid", resume.display_name());
    for section in plan.sidebar().iter().chain(plan.main()) {
        println!("  {:?}: {} blocks", section.kind(), section.blocks().len());
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
