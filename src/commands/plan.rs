use anyhow::{Context, Result};
use chrono::NaiveDate;

use duty_roster::engine::{
    review_period, CandidateRanker, ConflictDetector, Finding, NoCandidateReason, Ranking,
};
use duty_roster::models::RoleId;

use super::{name_of, Session};

pub fn rank(
    session: &Session,
    role: RoleId,
    week: NaiveDate,
    slot: Option<String>,
    json: bool,
) -> Result<()> {
    let Session {
        workspace,
        settings,
        ..
    } = session;
    let ranking = CandidateRanker::new(&workspace.roster, &workspace.schedule, settings).rank(
        role,
        week,
        slot.as_deref(),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
        return Ok(());
    }

    println!("Candidates for « {} », week of {week}", role.french_label());
    println!("================================");

    match &ranking {
        Ranking::NoEligibleCandidate { reason } => match reason {
            NoCandidateReason::NoEligibleEntity => println!("Nobody is eligible for this role."),
            NoCandidateReason::ExternalSpeakerCapReached { cap } => {
                println!("This week already has {cap} external speaker(s).")
            }
        },
        Ranking::Candidates { candidates } => {
            for (i, c) in candidates.iter().enumerate() {
                let last = match (c.last_served, c.periods_since) {
                    (Some(date), Some(weeks)) => format!("last served {date} ({weeks} week(s) ago)"),
                    (Some(date), None) => format!("last served {date}"),
                    _ => String::from("never served"),
                };
                let gap = if c.gap_violation { "  [too soon]" } else { "" };
                println!(
                    "{:>2}. {:<24} {last}{gap}",
                    i + 1,
                    name_of(&workspace.roster, &c.entity_id)
                );
            }
        }
    }

    Ok(())
}

pub fn conflicts(session: &Session, week: NaiveDate, json: bool) -> Result<()> {
    let Session {
        workspace,
        settings,
        ..
    } = session;
    let period = workspace
        .schedule
        .period(week)
        .with_context(|| format!("No week starts on {week}"))?;

    let detector = ConflictDetector::new(
        &settings.conflict_groups,
        settings.avoid_same_family_same_day,
    );
    let found = detector.find_conflicts(period, &workspace.roster);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("No conflicts for the week of {week}.");
    }
    for conflict in found {
        println!("{}", Finding::Conflict(conflict).french_desc(&workspace.roster));
    }
    Ok(())
}

pub fn review(session: &Session, week: NaiveDate, json: bool) -> Result<()> {
    let Session {
        workspace,
        settings,
        ..
    } = session;
    let findings = review_period(&workspace.schedule, week, &workspace.roster, settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
        return Ok(());
    }

    println!("Review of the week of {week}");
    println!("================================");
    if findings.is_empty() {
        println!("Everything looks fine.");
    }
    for finding in &findings {
        println!("- {}", finding.french_desc(&workspace.roster));
    }

    tracing::info!(week = %week, findings = findings.len(), "Review completed");
    Ok(())
}
