//! Resolve-or-create for location records deduplicated by address.

use super::ports::{LocationRepository, StoreError};
use super::{LocationDetails, LocationId};

/// Return the id of the location at `details.address`, inserting it first
/// when absent.
///
/// An existing location keeps its stored square footage and bedroom count.
/// When a concurrent writer inserts the same address first, the unique
/// constraint rejects our insert and the winner's id is read back.
pub async fn resolve_location<L>(
    locations: &L,
    details: &LocationDetails,
) -> Result<LocationId, StoreError>
where
    L: LocationRepository + ?Sized,
{
    if let Some(existing) = locations.find_by_address(&details.address).await? {
        return Ok(existing);
    }
    match locations.insert(details).await {
        Ok(created) => Ok(created),
        Err(StoreError::Duplicate { .. }) => locations
            .find_by_address(&details.address)
            .await?
            .ok_or_else(|| StoreError::query("location missing after duplicate insert")),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Address;
    use crate::domain::ports::MockLocationRepository;
    use mockall::Sequence;
    use rstest::{fixture, rstest};

    #[fixture]
    fn details() -> LocationDetails {
        LocationDetails {
            address: Address {
                unit_number: 5,
                street: 100,
                city: "Springfield".into(),
                state: "IL".into(),
                zipcode: 62704,
                country: "US".into(),
            },
            square_footage: 850.0,
            bedrooms_count: 2,
        }
    }

    fn id(raw: i32) -> LocationId {
        LocationId::new(raw).expect("valid id")
    }

    #[rstest]
    #[tokio::test]
    async fn reuses_existing_location(details: LocationDetails) {
        let mut repo = MockLocationRepository::new();
        repo.expect_find_by_address()
            .times(1)
            .returning(|_| Ok(Some(LocationId::new(4).expect("valid id"))));
        repo.expect_insert().never();

        let resolved = resolve_location(&repo, &details).await.expect("resolved");
        assert_eq!(resolved, id(4));
    }

    #[rstest]
    #[tokio::test]
    async fn inserts_missing_location(details: LocationDetails) {
        let mut repo = MockLocationRepository::new();
        repo.expect_find_by_address().returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Ok(LocationId::new(9).expect("valid id")));

        let resolved = resolve_location(&repo, &details).await.expect("resolved");
        assert_eq!(resolved, id(9));
    }

    #[rstest]
    #[tokio::test]
    async fn losing_an_insert_race_reads_the_winner(details: LocationDetails) {
        let mut repo = MockLocationRepository::new();
        let mut seq = Sequence::new();
        repo.expect_find_by_address()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::duplicate("locations_address_key")));
        repo.expect_find_by_address()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(LocationId::new(12).expect("valid id"))));

        let resolved = resolve_location(&repo, &details).await.expect("resolved");
        assert_eq!(resolved, id(12));
    }

    #[rstest]
    #[tokio::test]
    async fn propagates_other_insert_failures(details: LocationDetails) {
        let mut repo = MockLocationRepository::new();
        repo.expect_find_by_address().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|_| Err(StoreError::connection("reset by peer")));

        let err = resolve_location(&repo, &details).await.expect_err("insert failed");
        assert!(matches!(err, StoreError::Connection { .. }));
    }
}
