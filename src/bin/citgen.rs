use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use citgen::{AvatarSource, Composer, Quote, QuoteStyle};

#[derive(Parser, Debug)]
#[command(name = "citgen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a quote card from command-line arguments.
    Create(CreateArgs),
    /// Compose a quote card described by a JSON job file.
    Job(JobArgs),
}

#[derive(Parser, Debug)]
struct CreateArgs {
    /// Quote text.
    text: String,

    /// Author the quote is attributed to.
    author: String,

    /// Avatar image file, relative to the working folder.
    #[arg(long, conflicts_with = "avatar_url")]
    avatar: Option<PathBuf>,

    /// Avatar image URL to download instead of a local file.
    #[arg(long)]
    avatar_url: Option<String>,

    /// Working folder; must exist. The output lands here.
    #[arg(long, default_value = ".")]
    folder: PathBuf,

    /// Output base name; the card is written as `<out>_quote.png`.
    #[arg(long, default_value = "quote")]
    out: String,

    /// Directory holding the font files.
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,

    /// Headline caption drawn above the quote.
    #[arg(long)]
    headline: Option<String>,

    /// Headline font size in pixels.
    #[arg(long)]
    headline_size: Option<f32>,

    /// Attribution font size in pixels.
    #[arg(long)]
    author_size: Option<f32>,

    /// Headline font file (relative to the fonts directory).
    #[arg(long)]
    headline_font: Option<PathBuf>,

    /// Quote body font file (relative to the fonts directory).
    #[arg(long)]
    quote_font: Option<PathBuf>,

    /// Attribution font file (relative to the fonts directory).
    #[arg(long)]
    author_font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Input job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct JobSpec {
    text: String,
    author: String,
    #[serde(default)]
    avatar: Option<PathBuf>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default = "default_folder")]
    folder: PathBuf,
    #[serde(default = "default_out")]
    out: String,
    #[serde(default)]
    style: QuoteStyle,
}

fn default_folder() -> PathBuf {
    PathBuf::from(".")
}

fn default_out() -> String {
    "quote".to_string()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Create(args) => cmd_create(args),
        Command::Job(args) => cmd_job(args),
    }
}

fn avatar_source(
    avatar: Option<PathBuf>,
    avatar_url: Option<String>,
) -> anyhow::Result<AvatarSource> {
    match (avatar, avatar_url) {
        (Some(path), None) => Ok(AvatarSource::Local(path)),
        (None, Some(url)) => Ok(AvatarSource::Remote(url)),
        (Some(_), Some(_)) => anyhow::bail!("give either an avatar file or an avatar URL, not both"),
        (None, None) => anyhow::bail!("an avatar file or an avatar URL is required"),
    }
}

fn run(
    quote: Quote,
    source: AvatarSource,
    style: QuoteStyle,
    folder: &Path,
    out_base: &str,
) -> anyhow::Result<()> {
    let out_path = Composer::new(style)
        .compose(&quote, &source, folder, out_base)
        .with_context(|| format!("compose card '{out_base}'"))?;
    eprintln!("wrote {}", out_path.display());
    Ok(())
}

fn cmd_create(args: CreateArgs) -> anyhow::Result<()> {
    let source = avatar_source(args.avatar, args.avatar_url)?;

    let mut style = QuoteStyle {
        fonts_dir: args.fonts_dir,
        ..QuoteStyle::default()
    };
    if let Some(headline) = args.headline {
        style.headline_text = headline;
    }
    if let Some(size) = args.headline_size {
        style.headline_size = size;
    }
    if let Some(size) = args.author_size {
        style.author_size = size;
    }
    if let Some(font) = args.headline_font {
        style.headline_font = font;
    }
    if let Some(font) = args.quote_font {
        style.quote_font = font;
    }
    if let Some(font) = args.author_font {
        style.author_font = font;
    }

    run(
        Quote::new(args.text, args.author),
        source,
        style,
        &args.folder,
        &args.out,
    )
}

fn cmd_job(args: JobArgs) -> anyhow::Result<()> {
    let f = File::open(&args.in_path)
        .with_context(|| format!("open job '{}'", args.in_path.display()))?;
    let r = BufReader::new(f);
    let job: JobSpec = serde_json::from_reader(r).context("parse job JSON")?;

    let source = avatar_source(job.avatar, job.avatar_url)?;
    run(
        Quote::new(job.text, job.author),
        source,
        job.style,
        &job.folder,
        &job.out,
    )
}
