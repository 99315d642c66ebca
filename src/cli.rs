// src/cli.rs
//
// Batch frontend: parse flags, confirm, run the full update, print the
// summary. Built only with the `cli` feature.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::config::consts::*;
use crate::config::options::{load_api_key, AppOptions, FetchOptions, OutputOptions, RegionSelector};
use crate::progress::Progress;
use crate::report::RunContext;
use crate::runner;
use crate::source::MlitClient;

/// Fetch, normalize and chart real-estate transaction trends.
#[derive(Parser, Debug)]
#[command(name = "house_trend", version)]
pub struct Args {
    /// Region keys or codes, comma separated (tokyo,12,...). Default: all
    #[arg(long, value_delimiter = ',')]
    pub regions: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    pub start_year: i32,

    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    pub end_year: i32,

    /// 5-digit municipality code
    #[arg(long)]
    pub city: Option<String>,

    /// Pause between requests
    #[arg(long, default_value_t = REQUEST_PAUSE_MS)]
    pub delay_ms: u64,

    /// Tokyo only, first 3 areas charted
    #[arg(long)]
    pub test: bool,

    #[arg(long, value_name = "DIR", default_value = DEFAULT_RAW_DIR)]
    pub raw_dir: PathBuf,

    /// Normalized CSV cache
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PROCESSED_DIR)]
    pub data_dir: PathBuf,

    #[arg(long, value_name = "DIR", default_value = DEFAULT_CHART_DIR)]
    pub chart_dir: PathBuf,

    #[arg(long, value_name = "DIR", default_value = DEFAULT_REPORT_DIR)]
    pub report_dir: PathBuf,

    #[arg(long)]
    pub skip_charts: bool,

    /// Falls back to .env and the environment
    #[arg(long, env = API_KEY_ENV_FALLBACK, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Only check the API key and endpoint, then exit
    #[arg(long)]
    pub check: bool,

    /// Don't ask before starting
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Args {
    pub fn options(&self) -> Result<AppOptions> {
        let regions = if self.regions.is_empty() {
            RegionSelector::All
        } else {
            let mut picked = Vec::with_capacity(self.regions.len());
            for key in &self.regions {
                let key = key.trim().to_ascii_lowercase();
                let r = region_by_key(&key).or_else(|| region_by_code(&key)).ok_or_else(|| {
                    let known: Vec<&str> = REGIONS.iter().map(|r| r.key).collect();
                    eyre!("Unknown region: {key} (known: {})", known.join(","))
                })?;
                if !picked.contains(&r) {
                    picked.push(r);
                }
            }
            RegionSelector::Only(picked)
        };

        let fetch = FetchOptions {
            regions,
            start_year: self.start_year,
            end_year: self.end_year,
            city: self.city.clone(),
            delay: Duration::from_millis(self.delay_ms),
            test_mode: self.test,
            ..FetchOptions::default()
        };
        fetch.validate().map_err(|e| eyre!(e))?;

        let output = OutputOptions {
            raw_dir: self.raw_dir.clone(),
            processed_dir: self.data_dir.clone(),
            chart_dir: self.chart_dir.clone(),
            report_dir: self.report_dir.clone(),
            skip_charts: self.skip_charts,
        };
        Ok(AppOptions { fetch, output })
    }
}

/// Cell-level progress on stderr.
struct CliProgress {
    done: usize,
    total: usize,
    records: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Querying {total} cells");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn cell_done(&mut self, label: &str, records: usize) {
        self.done += 1;
        self.records += records;
        eprintln!("[{}/{}] {label}: {records} records", self.done, self.total);
    }
    fn cell_failed(&mut self, label: &str, error: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {label}: FAILED ({error})", self.done, self.total);
    }
    fn finish(&mut self) {
        eprintln!("Fetched {} records from {} cells", self.records, self.done);
    }
}

fn confirm(opts: &AppOptions) -> Result<bool> {
    let f = &opts.fetch;
    let keys: Vec<&str> = f.regions().iter().map(|r| r.key).collect();
    println!("Regions: {}", keys.join(", "));
    println!("Years:   {}-{}", f.start_year, f.end_year);
    println!("Queries: {}", keys.len() * f.cells_per_region());
    if f.test_mode {
        println!("Test mode: charts for the first {TEST_MODE_AREA_LIMIT} areas only");
    }
    print!("Start? [y/N] ");
    io::stdout().flush()?;

    let mut line = s!();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let opts = args.options()?;

    let key = args
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(load_api_key)
        .ok_or_else(|| eyre!("No API key: set {API_KEY_ENV_FALLBACK} or {API_KEY_HEADER} (or pass --api-key)"))?;
    let client = MlitClient::new(&key).wrap_err("Building HTTP client")?;

    if args.check {
        let n = client.test_connection().wrap_err("Connection test failed")?;
        println!("Connection OK ({n} records in test query)");
        return Ok(());
    }

    if !args.yes && !confirm(&opts)? {
        println!("Cancelled");
        return Ok(());
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping after the current query...");
        flag.store(true, Ordering::Relaxed);
    })
    .wrap_err("Installing Ctrl-C handler")?;

    logf!("CLI: start {:?}", args.regions);
    let mut ctx = RunContext::new();
    let mut progress = CliProgress { done: 0, total: 0, records: 0 };

    match runner::run(&client, &opts, &mut ctx, Some(cancel.as_ref()), Some(&mut progress)) {
        Ok(summary) => {
            println!("Done. Report: {}", summary.report_path.display());
            for line in summary.report.summary_lines() {
                println!("{line}");
            }
            Ok(())
        }
        Err(e) => {
            ctx.record_error(format!("Fatal: {e}"));
            // Best effort: the report still says how far the run got.
            if let Ok(p) = ctx.report(chrono::Local::now()).write(&opts.output.report_dir) {
                eprintln!("Partial report: {}", p.display());
            }
            Err(e.into())
        }
    }
}
