use crate::ScenarioContext;
use crate::error::ScenarioError;
use crate::verify::ensure;
use core_types::EntityKind;

/// Deletes every catalog row, children first, and checks the tables are empty.
pub async fn delete_all_data(ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
    ctx.repo.delete_all_data().await?;

    for kind in EntityKind::DELETION_ORDER {
        let remaining = ctx.repo.count_rows(kind).await?;
        ensure(
            remaining == 0,
            format!("Deleting Data Failed: {remaining} {kind} row(s) remain"),
        )?;
    }
    Ok(())
}
