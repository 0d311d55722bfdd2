// ABOUTME: CLI binary for docmark.
// ABOUTME: Reads a rendered HTML page from a file or stdin and writes markdown (or JSON) to stdout or a file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use docmark::{decode_html, Document, ExtractError, Extractor, MarkdownDocument};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docmark")]
#[command(about = "Convert a rendered documentation page to markdown")]
struct Args {
    /// HTML file to convert (default: stdin)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Address of the page; used for the frontmatter and to resolve links
    #[arg(long = "url")]
    url: String,

    /// Title override (default: the page's <title>)
    #[arg(long = "title")]
    title: Option<String>,

    /// JSON profile replacing the builtin one
    #[arg(long = "profile")]
    profile: Option<PathBuf>,

    /// Charset of the input (default: detected)
    #[arg(long = "charset")]
    charset: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Output as JSON instead of markdown
    #[arg(long = "json")]
    json_output: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    document: &'a MarkdownDocument,
    markdown: String,
    filename: String,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(args: &Args) -> anyhow::Result<String> {
    let bytes = match &args.html {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    Ok(decode_html(&bytes, args.charset.as_deref()))
}

fn build_extractor(args: &Args) -> Result<Extractor, ExtractError> {
    let builder = Extractor::builder();
    let builder = match &args.profile {
        Some(path) => builder.profile_file(path)?,
        None => builder,
    };
    Ok(builder.build())
}

fn format_output(doc: &MarkdownDocument, json_output: bool) -> anyhow::Result<String> {
    if json_output {
        let out = JsonOutput {
            document: doc,
            markdown: doc.to_markdown(),
            filename: doc.suggested_filename(),
        };
        Ok(serde_json::to_string_pretty(&out)?)
    } else {
        Ok(doc.to_markdown())
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    if url::Url::parse(&args.url).is_err() {
        return Err(ExtractError::input(
            &args.url,
            "parse address",
            Some(anyhow::anyhow!("malformed URL")),
        )
        .into());
    }

    let extractor = build_extractor(args)?;
    let html = read_input(args)?;

    let start = Instant::now();
    let doc = Document::parse(&html);
    let result = extractor.extract(&doc, &args.url, args.title.as_deref())?;
    let elapsed = start.elapsed();

    let output = format_output(&result, args.json_output)?;
    match &args.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if args.json_output {
                writeln!(stdout)?;
            }
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
