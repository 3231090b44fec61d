use anyhow::Result;
use chrono::NaiveDate;

use duty_roster::engine::{
    auto_fill, eligible_entities, next_pool_offset, plan_pool_rotation, pool_rotation_updates,
    RotationPlanner,
};
use duty_roster::models::{EntityId, RoleId, SlotUpdate};

use super::{print_updates, Session};

pub async fn rotate(
    mut session: Session,
    role: RoleId,
    from: NaiveDate,
    weeks: usize,
    per_period: usize,
    write: bool,
) -> Result<()> {
    let start = session.workspace.rotation_start(role);
    let roster = &session.workspace.roster;
    let schedule = &session.workspace.schedule;

    let (updates, next_index): (Vec<SlotUpdate>, usize) = if role.is_group_duty() {
        let plan = RotationPlanner::new(session.settings.groups_per_event)
            .with_start_index(start)
            .plan_for_role(role, roster, weeks)?;
        (plan.to_updates(schedule, role, from)?, plan.next_index)
    } else {
        let pool: Vec<EntityId> = eligible_entities(role, roster);
        let rotation = plan_pool_rotation(role, &pool, per_period, weeks, start)?;
        (
            pool_rotation_updates(schedule, role, from, &rotation)?,
            next_pool_offset(pool.len(), per_period, weeks, start),
        )
    };

    println!("Rotation of « {} » from {from}", role.french_label());
    print_updates(roster, &updates);

    if write {
        session.workspace.schedule.apply(&updates)?;
        session.workspace.rotation_state.insert(role, next_index);
        session.save().await?;
        println!("\nSaved. Next rotation of this role starts at position {next_index}.");
    }
    Ok(())
}

pub async fn autofill(mut session: Session, from: NaiveDate, weeks: usize, write: bool) -> Result<()> {
    let periods: Vec<NaiveDate> = session
        .workspace
        .schedule
        .periods_from(from)
        .iter()
        .take(weeks)
        .map(|p| p.start)
        .collect();

    let updates = auto_fill(
        &session.workspace.schedule,
        &session.workspace.roster,
        &session.settings,
        &periods,
    )?;

    println!("Auto-fill of {} week(s) from {from}", periods.len());
    print_updates(&session.workspace.roster, &updates);

    if write {
        session.workspace.schedule.apply(&updates)?;
        session.save().await?;
        println!("\nSaved {} assignment(s).", updates.len());
    }
    Ok(())
}
