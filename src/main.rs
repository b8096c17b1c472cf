//! proteus - Template Engine Detection & Identification Scanner CLI

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

use proteus::config::{self, CHROME_USER_AGENT};
use proteus::crawl;
use proteus::error::Result;
use proteus::models::ScanConfig;
use proteus::report::ScanReport;
use proteus::scanner::Scanner;

/// proteus - detects and identifies server-side template engines
#[derive(Parser)]
#[command(name = "proteus", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Seconds until timeout
    #[arg(long, global = true, default_value_t = 15)]
    timeout: u64,

    /// Number of requests per second (0 = unlimited)
    #[arg(short, long, global = true, default_value_t = 0.0)]
    ratelimit: f64,

    /// How many chars to memorize before a body reflection point
    #[arg(long, global = true, default_value_t = 30)]
    precedinglength: usize,

    /// How many chars to memorize after a body reflection point
    #[arg(long, global = true, default_value_t = 30)]
    subsequentlength: usize,

    /// Path of a TOML config file to read
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path prefix for the JSONL report to generate
    #[arg(long, global = true)]
    reportpath: Option<String>,

    /// URL of an intercepting proxy
    #[arg(long, global = true)]
    proxyurl: Option<String>,

    /// Path of the proxy's PEM certificate
    #[arg(long, global = true)]
    proxycertpath: Option<String>,

    /// Custom header(s), "Name: value"; "file:<path>" reads one per line
    #[arg(short = 'H', long = "header", global = true)]
    headers: Vec<String>,

    /// Custom cookie(s), "name=value"; "file:<path>" reads one per line
    #[arg(short = 'c', long = "cookie", global = true)]
    cookies: Vec<String>,

    /// Use a Chrome User-Agent instead of the proteus default
    #[arg(long, global = true)]
    useragentchrome: bool,

    /// Scan for client-side template injection with a headless browser
    #[arg(long, global = true)]
    csti: bool,

    /// Escape HTML special chars in the JSON report
    #[arg(long, global = true)]
    escapereport: bool,

    /// Headers to test, e.g. --testheaders Host,Origin,X-Forwarded-For
    #[arg(long, global = true, value_delimiter = ',')]
    testheaders: Vec<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a single or multiple URLs
    Url {
        /// URL(s) to scan; "file:<path>" reads one per line
        #[arg(short, long, required = true)]
        url: Vec<String>,

        /// Form body data; its presence switches requests to POST
        #[arg(short, long, default_value = "")]
        data: String,

        /// Custom query parameter(s), "name=value"
        #[arg(short, long)]
        parameter: Vec<String>,

        /// Additional URL(s) to check for reflections of injected input
        #[arg(long)]
        reflection: Vec<String>,

        /// Limit the polyglot length (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        lengthlimit: usize,
    },

    /// Scan the request captured in a raw HTTP request file
    Raw {
        /// Raw HTTP request file
        #[arg(short = 'R', long)]
        raw: PathBuf,

        /// Use http:// instead of https:// for the endpoint
        #[arg(long)]
        http: bool,
    },

    /// Scan URLs from a JSONL crawl file
    Jsonl {
        /// JSONL file with crawl results
        #[arg(short, long)]
        jsonl: PathBuf,
    },
}

fn print_banner() {
    let banner = r#"
    ╔══════════════════════════════════════════╗
    ║  PROTEUS — template engine identifier    ║
    ║  pin the shape-shifter down              ║
    ╚══════════════════════════════════════════╝
    "#;
    println!("{}", banner.cyan());
}

fn print_summary(summary: &ScanReport) {
    println!("\n{}", "  Scan Summary".bold());
    println!("  {}", "─".repeat(38));

    let mut builder = Builder::default();
    builder.push_record(["Certainty", "Suspected injections"]);
    builder.push_record(["High".to_string(), summary.high.to_string()]);
    builder.push_record(["Medium".to_string(), summary.medium.to_string()]);
    builder.push_record(["Low".to_string(), summary.low.to_string()]);
    builder.push_record(["Total".to_string(), summary.suspected_injections.to_string()]);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    println!(
        "\n  {} {}   {} {}",
        "Suspected vulnerable URLs:".bold(),
        summary.suspected_vulnerable_urls.to_string().green(),
        "Duration:".bold(),
        summary.duration.cyan(),
    );
}

/// Builds the scan configuration from config file, global flags and subcommand
fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let mut scan_config = match &cli.global.config {
        Some(path) => config::load_config(path)?,
        None => ScanConfig::default(),
    };

    let global = &cli.global;
    scan_config.timeout_secs = global.timeout;
    scan_config.rate_limit = global.ratelimit;
    scan_config.preceding_length = global.precedinglength;
    scan_config.subsequent_length = global.subsequentlength;
    scan_config.csti |= global.csti;
    scan_config.escape_report |= global.escapereport;
    scan_config.test_headers = global.testheaders.clone();
    if let Some(path) = &global.reportpath {
        scan_config.report_path = path.clone();
    }
    if global.proxyurl.is_some() {
        scan_config.proxy_url = global.proxyurl.clone();
    }
    if global.proxycertpath.is_some() {
        scan_config.proxy_cert_path = global.proxycertpath.clone();
    }
    if global.useragentchrome {
        scan_config.user_agent = CHROME_USER_AGENT.to_string();
    }
    scan_config.cookies = config::expand_file_entries(global.cookies.clone(), "cookie")?;
    scan_config.headers = config::expand_file_entries(global.headers.clone(), "header")?;

    match &cli.command {
        Commands::Url {
            url,
            data,
            parameter,
            reflection,
            lengthlimit,
        } => {
            scan_config.urls = config::expand_file_entries(url.clone(), "url")?;
            scan_config.data = data.clone();
            scan_config.parameters =
                config::expand_file_entries(parameter.clone(), "parameter")?;
            scan_config.reflection_urls = reflection.clone();
            scan_config.length_limit = *lengthlimit;
        }
        Commands::Raw { raw, http } => {
            scan_config.plain_http = *http;
            scan_config.crawls = crawl::read_raw(raw, *http)?;
        }
        Commands::Jsonl { jsonl } => {
            scan_config.crawls = crawl::read_jsonl(jsonl)?;
        }
    }

    Ok(scan_config)
}

async fn run(cli: Cli) -> Result<()> {
    let scan_config = build_config(&cli)?;

    let scanner = Scanner::new(scan_config.clone());

    #[cfg(feature = "browser")]
    let scanner = if scan_config.csti {
        match proteus::browser::ChromiumRenderer::new().await {
            Ok(renderer) => scanner.with_renderer(Box::new(renderer)),
            Err(e) => {
                eprintln!(
                    "  {} couldn't start the headless browser, continuing without CSTI: {e}",
                    "Warning:".yellow().bold()
                );
                scanner
            }
        }
    } else {
        scanner
    };

    #[cfg(not(feature = "browser"))]
    if scan_config.csti {
        eprintln!(
            "  {} CSTI scanning requires the 'browser' feature; continuing without it",
            "Warning:".yellow().bold()
        );
    }

    let outcome = scanner.run().await?;
    print_summary(&outcome.summary);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.global.verbose {
        "proteus=debug"
    } else {
        "proteus=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    print_banner();

    if let Err(e) = run(cli).await {
        eprintln!("  {} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
