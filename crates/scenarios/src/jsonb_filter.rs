use crate::ScenarioContext;
use crate::error::ScenarioError;
use crate::verify::ensure;
use core_types::factories::sample_venue;
use core_types::{Venue, VenueDescription};
use database::VenueFilter;
use database::repository::{first_venue_matching, save_venue, venue_ids_matching};

/// Stores three venues and finds each one by a different sub-field of its
/// JSON description, casting the field to text, bigint and boolean.
pub async fn jsonb_filter(ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
    let pool = ctx.repo.pool();
    let seq = &mut ctx.sequence;

    let venue1 = sample_venue(seq, "10")?;
    let venue2 = sample_venue(seq, "100")?;
    let venue3 = sample_venue(seq, "1000")?;
    for venue in [&venue1, &venue2, &venue3] {
        save_venue(pool, venue).await?;
    }

    let address = &description_of(&venue1)?.address;
    let found = first_venue_matching(pool, &VenueFilter::Address(address.clone())).await?;
    ensure(
        found.is_some_and(|v| v.id == venue1.id),
        format!("No Venue found with address {address}"),
    )?;

    // Capacity ranges overlap between venues, so other matches are allowed.
    let capacity = description_of(&venue2)?.capacity;
    let ids = venue_ids_matching(pool, &VenueFilter::Capacity(capacity)).await?;
    ensure(
        ids.contains(&venue2.id),
        format!("No Venue found with capacity {capacity}"),
    )?;

    let is_popular = description_of(&venue3)?.is_popular;
    let ids = venue_ids_matching(pool, &VenueFilter::IsPopular(is_popular)).await?;
    ensure(
        ids.contains(&venue3.id),
        format!("No Venue found with popularity {is_popular}"),
    )?;

    tracing::debug!(matches = ids.len(), is_popular, "Popularity filter returned venues.");
    Ok(())
}

fn description_of(venue: &Venue) -> Result<&VenueDescription, ScenarioError> {
    venue.description().ok_or_else(|| {
        ScenarioError::Verification(format!("Venue {} has no description", venue.id))
    })
}
