use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use contact_client::{bench, ContactPayload, RequestOverrides, SubmissionClient};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "contact-client", about = "Submit contact requests to the contact relay")]
struct Cli {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Base URL of the relay
    #[arg(long, default_value = "http://localhost:3001", global = true)]
    url: String,

    #[command(flatten)]
    request: RequestArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RequestArgs {
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[arg(long, global = true)]
    max_retries: Option<u32>,

    #[arg(long, global = true)]
    retry_delay_ms: Option<u64>,
}

impl RequestArgs {
    fn overrides(&self) -> RequestOverrides {
        RequestOverrides {
            timeout: self.timeout_ms.map(Duration::from_millis),
            max_retries: self.max_retries,
            retry_delay: self.retry_delay_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single submission
    Send {
        #[arg(long)]
        email: String,

        #[arg(long)]
        company: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        message: Option<String>,
    },

    /// Fire many concurrent submissions and report latency
    Bench {
        #[arg(long, default_value_t = 10)]
        concurrency: usize,

        #[arg(long, default_value_t = 100)]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("initialising logger")?;

    let client = SubmissionClient::http(&cli.url);
    let overrides = cli.request.overrides();

    match cli.command {
        Commands::Send {
            email,
            company,
            name,
            subject,
            message,
        } => {
            let payload = ContactPayload {
                name,
                email,
                company,
                subject,
                message,
            };
            let response = client
                .submit(&payload, overrides)
                .await
                .context("submission failed")?;
            if response.test_mode == Some(true) {
                log::warn!("relay is in test mode; no email was sent");
            }
            println!("{}", response.message);
        }
        Commands::Bench {
            concurrency,
            requests,
        } => {
            log::info!(
                "Sending {} submissions to {} with concurrency {}",
                requests,
                client.transport().endpoint(),
                concurrency
            );
            let report = bench::run(&client, requests, concurrency, overrides).await;
            let ms = |d: Option<Duration>| d.map(|d| d.as_millis()).unwrap_or_default();

            println!("succeeded: {}", report.succeeded);
            println!("failed:    {}", report.failed);
            println!("elapsed:   {:.2}s", report.elapsed.as_secs_f64());
            println!("rate:      {:.1} req/s", report.throughput());
            println!(
                "latency:   p50 {}ms, p95 {}ms, max {}ms",
                ms(report.percentile(0.5)),
                ms(report.percentile(0.95)),
                ms(report.latencies.last().copied())
            );
        }
    }

    Ok(())
}
