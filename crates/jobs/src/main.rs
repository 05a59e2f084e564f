// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod policy;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coop_shifts_api::{
    CycleSummary, FreezeCheckSummary, GenerationSummary, LoggingTransport, NotificationSummary,
    apply_pending_cycles, generate_shifts_up_to, run_freeze_checks,
    send_flying_member_registration_reminders, send_shift_reminders,
    send_shift_watch_notifications, send_understaffed_shift_warnings,
};
use coop_shifts_domain::{ShiftPolicy, add_days, monday_of};
use coop_shifts_persistence::Persistence;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use tracing::{error, info};

use crate::error::JobError;
use crate::policy::load_policy;

/// Periodic jobs of the cooperative shift accounting.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Path to a JSON shift policy. Defaults apply when omitted.
    #[arg(short, long)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    job: Job,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    /// Start every cycle that is due and not yet applied.
    ApplyCycles,
    /// Freeze, warn and unfreeze members according to their balance.
    RunFreezeChecks,
    /// Create the shifts of the generation horizon from the templates.
    GenerateShifts,
    /// Remind members of their upcoming shifts.
    SendShiftReminders,
    /// Ask opted-in members to help on understaffed shifts.
    SendUnderstaffedWarnings,
    /// Remind flying members who have not registered this cycle.
    SendFlyingReminders,
    /// Tell watching members about staffing changes of upcoming shifts.
    SendShiftWatchNotifications,
}

/// Runs one job against `persistence` at `now`.
///
/// # Errors
///
/// Returns an error if the job cannot load what it iterates over. Failures
/// for individual members are counted in the logged summary instead.
fn run_job(
    persistence: &mut Persistence,
    policy: &ShiftPolicy,
    job: Job,
    now: PrimitiveDateTime,
) -> Result<(), JobError> {
    let transport: LoggingTransport = LoggingTransport;
    match job {
        Job::ApplyCycles => {
            let summary: CycleSummary = apply_pending_cycles(persistence, policy, now.date())?;
            info!(
                applied = summary.applied,
                skipped = summary.skipped,
                failed = summary.failed,
                "Cycle job finished"
            );
        }
        Job::RunFreezeChecks => {
            let summary: FreezeCheckSummary =
                run_freeze_checks(persistence, &transport, policy, now)?;
            info!(
                frozen = summary.frozen,
                warned = summary.warned,
                unfrozen = summary.unfrozen,
                failed = summary.failed,
                "Freeze job finished"
            );
        }
        Job::GenerateShifts => {
            let start: Date = monday_of(now.date());
            let end: Date = add_days(start, policy.generation_horizon_days)?;
            let summary: GenerationSummary = generate_shifts_up_to(
                persistence,
                start,
                end,
                &policy.week_group_anchors,
                now,
            )?;
            info!(
                created = summary.created,
                existing = summary.existing,
                "Shift generation finished"
            );
        }
        Job::SendShiftReminders => {
            let summary: NotificationSummary =
                send_shift_reminders(persistence, &transport, policy, now)?;
            log_notifications("Shift reminders", summary);
        }
        Job::SendUnderstaffedWarnings => {
            let summary: NotificationSummary =
                send_understaffed_shift_warnings(persistence, &transport, policy, now)?;
            log_notifications("Understaffed warnings", summary);
        }
        Job::SendFlyingReminders => {
            let summary: NotificationSummary =
                send_flying_member_registration_reminders(persistence, &transport, policy, now)?;
            log_notifications("Flying member reminders", summary);
        }
        Job::SendShiftWatchNotifications => {
            let summary: NotificationSummary =
                send_shift_watch_notifications(persistence, &transport, now)?;
            log_notifications("Shift watch notifications", summary);
        }
    }
    Ok(())
}

fn log_notifications(job: &str, summary: NotificationSummary) {
    info!(sent = summary.sent, failed = summary.failed, "{job} finished");
}

fn open_persistence(database: Option<&str>) -> Result<Persistence, JobError> {
    let persistence: Persistence = if let Some(db_path) = database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

fn run(args: &Args) -> Result<(), JobError> {
    let policy: ShiftPolicy = load_policy(args.policy.as_deref())?;
    let mut persistence: Persistence = open_persistence(args.database.as_deref())?;
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let now: PrimitiveDateTime = PrimitiveDateTime::new(now.date(), now.time());

    info!(job = ?args.job, %now, "Running job");
    run_job(&mut persistence, &policy, args.job, now)
}

fn main() -> std::process::ExitCode {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("Job failed: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
