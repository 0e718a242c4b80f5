//! dailies status command implementation
//!
//! Ticks the reconciler, then renders the full checklist: tier sections with
//! actionable rows, rotating timer countdowns, and the hours remaining until
//! the daily reset.

use chrono::Utc;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::tracker::{RowView, SectionView};

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let (storage, mut tracker) = ctx.open()?;

    let now = Utc::now();
    let actions = tracker.tick(now);
    let model = tracker.render_model(now);

    let mut human = HumanOutput::new(format!(
        "dailies: reset in {:.2} hrs",
        model.hours_to_daily_reset
    ));
    human.push_summary("daily", format!("{} open", model.daily_actionable));
    human.push_summary("weekly", format!("{} open", model.weekly_actionable));
    if actions.clear_weekly {
        human.push_summary("reset", "daily + weekly tiers cleared");
    } else if actions.clear_daily {
        human.push_summary("reset", "daily tier cleared");
    }

    push_tier(&mut human, "Daily", &model.daily);
    push_tier(&mut human, "Weekly", &model.weekly);

    if !model.timers.is_empty() {
        human.push_detail("Timers".to_string());
        for timer in &model.timers {
            human.push_detail(format!("  {}", timer.label()));
        }
    }

    // The tick may have cleared tiers; persist the advanced ledger. A failed
    // save is a warning here, never fatal.
    if let Err(err) = tracker.save(&storage) {
        human.push_warning(format!("{err}"));
    }

    emit_success(ctx.output, "status", &model, Some(&human))?;
    Ok(())
}

fn push_tier(human: &mut HumanOutput, tier: &str, sections: &[SectionView]) {
    human.push_detail(format!("{tier} Tasks"));
    for section in sections {
        human.push_detail(format!("  {}", section.title));
        for row in &section.rows {
            match row {
                RowView::Task { id, selected } => {
                    let mark = if *selected { "x" } else { " " };
                    human.push_detail(format!("    [{mark}] {id}"));
                }
                RowView::Break => human.push_detail("    ---".to_string()),
            }
        }
    }
}

