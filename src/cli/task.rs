//! Task mutation commands: show/hide, done, reset, simulate
//!
//! Every command ticks the reconciler first so a stale completion never
//! leaks into the mutation, then persists the snapshot. Unlike `status`,
//! these propagate a failed save: a one-shot mutation that silently
//! evaporates would be worse than a nonzero exit.

use chrono::Utc;
use serde::Serialize;

use crate::catalog::TierGroup;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

use super::Context;

#[derive(Serialize)]
struct VisibilityReport {
    id: String,
    visible: bool,
}

/// Set the opt-in visibility filter for one task
pub fn set_visible(ctx: &Context, id: &str, visible: bool) -> Result<()> {
    let (storage, mut tracker) = ctx.open()?;
    tracker.tick(Utc::now());

    tracker.set_visible(id, visible)?;
    tracker.save(&storage)?;

    let command = if visible { "show" } else { "hide" };
    let human = HumanOutput::new(format!("dailies {command}: {id}"));
    let report = VisibilityReport {
        id: id.to_string(),
        visible,
    };

    emit_success(ctx.output, command, &report, Some(&human))?;
    Ok(())
}

#[derive(Serialize)]
struct CompleteReport {
    completed: Vec<String>,
    skipped_hidden: Vec<String>,
}

/// Mark each given task completed for the current period
///
/// Hidden tasks are reported, not completed: a mark the checklist cannot
/// show would just be confusing state.
pub fn done(ctx: &Context, ids: &[String]) -> Result<()> {
    let (storage, mut tracker) = ctx.open()?;
    tracker.tick(Utc::now());

    let mut completed = Vec::new();
    let mut skipped_hidden = Vec::new();
    for id in ids {
        if tracker.complete_task(id)? {
            completed.push(id.clone());
        } else {
            skipped_hidden.push(id.clone());
        }
    }
    tracker.save(&storage)?;

    let mut human = HumanOutput::new(format!(
        "dailies done: {} task(s) completed",
        completed.len()
    ));
    for id in &completed {
        human.push_detail(id.clone());
    }
    for id in &skipped_hidden {
        human.push_warning(format!("'{id}' is hidden; run `dailies show {id}` first"));
    }

    let report = CompleteReport {
        completed,
        skipped_hidden,
    };
    emit_success(ctx.output, "done", &report, Some(&human))?;
    Ok(())
}

#[derive(Serialize)]
struct ResetReport {
    scope: String,
}

/// Manual reset of every visible task
pub fn reset(ctx: &Context) -> Result<()> {
    let (storage, mut tracker) = ctx.open()?;
    tracker.tick(Utc::now());

    tracker.reset_all();
    tracker.save(&storage)?;

    let human = HumanOutput::new("dailies reset: all visible tasks un-completed");
    let report = ResetReport {
        scope: "all_visible".to_string(),
    };

    emit_success(ctx.output, "reset", &report, Some(&human))?;
    Ok(())
}

/// Force a tier reset, like the original's Simulate Day/Week buttons
pub fn simulate(ctx: &Context, tier: &str) -> Result<()> {
    let group: TierGroup = tier.parse()?;

    let (storage, mut tracker) = ctx.open()?;
    tracker.tick(Utc::now());

    tracker.simulate_tier_reset(group);
    tracker.save(&storage)?;

    let human = HumanOutput::new(format!("dailies simulate: {} tier reset", group.as_str()));
    let report = ResetReport {
        scope: group.as_str().to_string(),
    };

    emit_success(ctx.output, "simulate", &report, Some(&human))?;
    Ok(())
}
