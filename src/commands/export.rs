use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use duty_roster::export::ScheduleExport;

use super::Session;

pub async fn export(
    session: &Session,
    from: NaiveDate,
    to: NaiveDate,
    output: Option<PathBuf>,
) -> Result<()> {
    if to < from {
        anyhow::bail!("--to ({to}) is before --from ({from})");
    }

    let payload = ScheduleExport::build(&session.workspace.schedule, &session.workspace.roster, from, to);

    match output {
        Some(path) => {
            payload
                .save_to_file(&path)
                .await
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            println!(
                "Exported {} week(s) to {}",
                payload.periods.len(),
                path.display()
            );
        }
        None => println!("{}", payload.to_json()?),
    }
    Ok(())
}
