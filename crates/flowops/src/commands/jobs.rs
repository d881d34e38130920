//! Background jobs view

use crate::config::ConsoleConfig;
use crate::output;
use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use deploy_orchestration::JobMonitor;
use platform_client::{Job, JobState};
use std::sync::Arc;

pub async fn run(config: &ConsoleConfig, watch: bool, format: &str) -> Result<()> {
    output::validate_format(format)?;

    let client = config.client();

    if watch {
        let monitor = JobMonitor::new(Arc::new(client), config.poll_interval());
        let jobs = monitor
            .watch(|jobs| {
                // Clear screen and move cursor to top
                print!("\x1B[2J\x1B[1;1H");
                println!("{}", jobs_table(jobs));
            })
            .await
            .context("Failed to poll jobs")?;

        println!("\nNo active jobs remain ({} total).", jobs.len());
        return Ok(());
    }

    let jobs = client.jobs().await.context("Failed to load jobs")?;
    if output::is_json(format) {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }
    println!("{}", jobs_table(&jobs));
    Ok(())
}

fn jobs_table(jobs: &[Job]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["JOB", "NAME", "STATE", "UPDATED"]);

    for job in jobs {
        let (state, color) = match job.state {
            JobState::Pending => ("pending", Color::Yellow),
            JobState::Running => ("running", Color::Green),
            JobState::Completed => ("completed", Color::DarkGrey),
            JobState::Failed => ("failed", Color::Red),
        };
        let updated = job
            .updated_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&job.id),
            Cell::new(&job.name),
            Cell::new(state).fg(color),
            Cell::new(updated),
        ]);
    }
    table
}
