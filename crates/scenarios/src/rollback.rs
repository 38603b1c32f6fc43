use crate::ScenarioContext;
use crate::error::ScenarioError;
use crate::verify::ensure;
use core_types::factories::sample_singer;
use database::DbError;
use database::repository::{count_singers_with_id, save_singer};

/// Writes a singer inside an explicit transaction, rolls it back, and checks
/// that the row never became visible.
pub async fn transaction_rollback(ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
    let mut tx = ctx.repo.begin().await?;

    let singer3 = sample_singer(&mut ctx.sequence, "3");
    save_singer(&mut *tx, &singer3).await?;

    tx.rollback().await.map_err(DbError::from)?;

    let remaining = count_singers_with_id(ctx.repo.pool(), &singer3.id).await?;
    ensure(remaining == 0, "Transaction Rollback Unsuccessful")
}
