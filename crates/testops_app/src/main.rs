use std::fs;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use client_logging::client_error;
use testops_app::logging::{self, LogDestination};
use testops_app::{AppConfig, JobTracker};
use testops_core::JobKind;
use testops_engine::{JobApi, ReqwestJobApi};

const USAGE: &str = "usage: testops_app <command>

commands:
  submit <kind> <title> [body.json]   submit a job and track it
  list [kind]                         show tracked jobs
  watch                               poll all non-terminal jobs to completion
  remove <kind> <job_id>              drop a job from the tracked list
  download <kind> <job_id> <path>     save a completed job's artifact

kinds: ui-testcases, api-testcases, ui-autotests, api-autotests,
       standards, optimization";

fn main() -> ExitCode {
    logging::initialize(LogDestination::Both);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = AppConfig::from_env();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            client_error!("Failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&config, &args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig, args: &[String]) -> Result<(), String> {
    let api = Arc::new(
        ReqwestJobApi::new(&config.settings).map_err(|err| format!("bad configuration: {err}"))?,
    );
    let mut tracker = JobTracker::new(
        api.clone(),
        &config.state_dir,
        config.settings.poll_interval,
    );

    match args.first().map(String::as_str) {
        Some("submit") => {
            let kind = parse_kind(args.get(1))?;
            let title = args.get(2).ok_or(USAGE)?.clone();
            let body = match args.get(3) {
                Some(path) => {
                    let raw = fs::read_to_string(path)
                        .map_err(|err| format!("cannot read {path}: {err}"))?;
                    serde_json::from_str(&raw)
                        .map_err(|err| format!("{path} is not valid JSON: {err}"))?
                }
                None => serde_json::json!({}),
            };
            let ack = tracker
                .submit(kind, &title, body)
                .await
                .map_err(|err| format!("submission failed: {err}"))?;
            println!(
                "submitted {kind} job {} (estimated {}s)",
                ack.job_id,
                ack.estimated_time.unwrap_or(0)
            );
            // Keep polling until this job settles.
            wait_for_watchers(&mut tracker).await;
            print_rows(&tracker, kind);
            Ok(())
        }
        Some("list") => {
            match args.get(1) {
                Some(slug) => print_rows(&tracker, parse_kind(Some(slug))?),
                None => {
                    for kind in JobKind::ALL {
                        print_rows(&tracker, kind);
                    }
                }
            }
            Ok(())
        }
        Some("watch") => {
            tracker.resume();
            wait_for_watchers(&mut tracker).await;
            for kind in JobKind::ALL {
                print_rows(&tracker, kind);
            }
            Ok(())
        }
        Some("remove") => {
            let kind = parse_kind(args.get(1))?;
            let job_id = args.get(2).ok_or(USAGE)?;
            let removed = tracker
                .remove(kind, job_id)
                .map_err(|err| format!("remove failed: {err}"))?;
            if !removed {
                return Err(format!("no {kind} job with id {job_id}"));
            }
            Ok(())
        }
        Some("download") => {
            let kind = parse_kind(args.get(1))?;
            let job_id = args.get(2).ok_or(USAGE)?;
            let path = args.get(3).ok_or(USAGE)?;
            let bytes = api
                .download(kind, job_id)
                .await
                .map_err(|err| format!("download failed: {err}"))?;
            fs::write(path, bytes).map_err(|err| format!("cannot write {path}: {err}"))?;
            println!("saved {kind} artifact of job {job_id} to {path}");
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn parse_kind(arg: Option<&String>) -> Result<JobKind, String> {
    let slug = arg.ok_or(USAGE)?;
    JobKind::from_slug(slug).ok_or_else(|| format!("unknown job kind: {slug}\n\n{USAGE}"))
}

async fn wait_for_watchers(tracker: &mut JobTracker) {
    while tracker.has_active_watchers() {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

fn print_rows(tracker: &JobTracker, kind: JobKind) {
    let rows = tracker.rows(kind);
    if rows.is_empty() {
        return;
    }
    println!("{kind}:");
    for row in rows {
        let summary = &row.summary;
        let progress = summary
            .progress
            .map(|p| format!("{p}%"))
            .unwrap_or_else(|| "-".to_string());
        let counts = [
            summary.artifacts.map(|n| format!("{n} artifacts")),
            summary.violations.map(|n| format!("{n} violations")),
            summary
                .recommendations
                .map(|n| format!("{n} recommendations")),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
        print!(
            "  {}  {:<10}  {:>4}  {}",
            summary.job_id, summary.status, progress, summary.title
        );
        if !counts.is_empty() {
            print!("  [{counts}]");
        }
        if let Some(error) = &row.live_error {
            print!("  (fetch error: {error})");
        }
        println!();
    }
}
