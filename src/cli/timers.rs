//! dailies timers command implementation

use chrono::Utc;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let (storage, mut tracker) = ctx.open()?;

    let now = Utc::now();
    tracker.tick(now);
    let model = tracker.render_model(now);

    let mut human = HumanOutput::new(format!("dailies timers ({} visible)", model.timers.len()));
    for timer in &model.timers {
        human.push_detail(timer.label());
    }

    if let Err(err) = tracker.save(&storage) {
        human.push_warning(format!("{err}"));
    }

    emit_success(ctx.output, "timers", &model.timers, Some(&human))?;
    Ok(())
}
