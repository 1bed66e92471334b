//! Floors nested under a house

use tracing::info;
use validator::Validate;

use crate::domain::{Floor, FloorChanges, FloorFilter, FloorSummary, FloorWithFlats, NewFloor};
use crate::error::DomainError;
use crate::repositories::TenantStore;
use crate::tenancy::ActiveTenant;

pub struct FloorService {
    store: TenantStore,
}

impl FloorService {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    pub fn for_tenant(active: &ActiveTenant) -> Self {
        Self::new(active.store().clone())
    }

    pub async fn list(&self, house_id: i64, filter: &FloorFilter) -> Result<Vec<FloorSummary>, DomainError> {
        self.ensure_house(house_id).await?;
        self.store.floors.list_by_house(house_id, filter).await
    }

    pub async fn create(&self, house_id: i64, floor: NewFloor) -> Result<Floor, DomainError> {
        floor.validate()?;
        self.ensure_house(house_id).await?;
        self.ensure_number_free(house_id, floor.floor_number, None).await?;

        let floor = self.store.floors.create(house_id, &floor).await?;
        info!(house_id, floor_id = floor.id, "Floor created");
        Ok(floor)
    }

    pub async fn show(&self, house_id: i64, floor_id: i64) -> Result<FloorWithFlats, DomainError> {
        let floor = self.find_in_house(house_id, floor_id).await?;
        let flats = self
            .store
            .flats
            .list_by_house(house_id)
            .await?
            .into_iter()
            .filter(|f| f.floor_id == floor_id)
            .collect();
        Ok(FloorWithFlats { floor, flats })
    }

    pub async fn update(&self, house_id: i64, floor_id: i64, changes: FloorChanges) -> Result<Floor, DomainError> {
        changes.validate()?;
        let mut floor = self.find_in_house(house_id, floor_id).await?;
        if let Some(number) = changes.floor_number {
            self.ensure_number_free(house_id, number, Some(floor_id)).await?;
        }

        floor.apply(changes);
        let floor = self.store.floors.update(&floor).await?;
        info!(house_id, floor_id, "Floor updated");
        Ok(floor)
    }

    pub async fn delete(&self, house_id: i64, floor_id: i64) -> Result<(), DomainError> {
        self.find_in_house(house_id, floor_id).await?;
        self.store.floors.delete(floor_id).await?;
        info!(house_id, floor_id, "Floor deleted");
        Ok(())
    }

    /// A floor addressed through a house it does not belong to does not exist.
    async fn find_in_house(&self, house_id: i64, floor_id: i64) -> Result<Floor, DomainError> {
        self.ensure_house(house_id).await?;
        self.store
            .floors
            .find(floor_id)
            .await?
            .filter(|floor| floor.house_id == house_id)
            .ok_or_else(|| DomainError::not_found("Floor", floor_id))
    }

    async fn ensure_house(&self, house_id: i64) -> Result<(), DomainError> {
        match self.store.houses.find(house_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("House", house_id)),
        }
    }

    async fn ensure_number_free(&self, house_id: i64, number: i32, except: Option<i64>) -> Result<(), DomainError> {
        match self.store.floors.find_by_number(house_id, number).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(DomainError::conflict("floor_number", number.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repositories::{
        MockFlatRepository, MockFloorRepository, MockHouseRepository, MockTenantUserRepository,
    };
    use crate::services::house_service::tests::{floor, house};

    fn service(floors: MockFloorRepository) -> FloorService {
        let mut houses = MockHouseRepository::new();
        houses.expect_find().returning(|id| Ok((id == 1).then(|| house(1))));
        FloorService::new(TenantStore {
            houses: Arc::new(houses),
            floors: Arc::new(floors),
            flats: Arc::new(MockFlatRepository::new()),
            users: Arc::new(MockTenantUserRepository::new()),
        })
    }

    fn new_floor(number: i32) -> NewFloor {
        NewFloor { floor_number: number, name: None, description: None, total_flats: 0, is_active: true }
    }

    #[tokio::test]
    async fn test_duplicate_floor_number_is_conflict() {
        let mut floors = MockFloorRepository::new();
        floors.expect_find_by_number().returning(|house_id, n| Ok(Some(floor(5, house_id, n))));
        floors.expect_create().never();

        let err = service(floors).create(1, new_floor(1)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { field: "floor_number", .. }));
    }

    #[tokio::test]
    async fn test_floor_of_other_house_is_not_found() {
        let mut floors = MockFloorRepository::new();
        floors.expect_find().returning(|id| Ok(Some(floor(id, 2, 1))));

        let err = service(floors).show(1, 7).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { resource: "Floor", .. }));
    }

    #[tokio::test]
    async fn test_renumbering_to_own_number_is_allowed() {
        let mut floors = MockFloorRepository::new();
        floors.expect_find().returning(|id| Ok(Some(floor(id, 1, 3))));
        floors.expect_find_by_number().returning(|house_id, n| Ok(Some(floor(4, house_id, n))));
        floors.expect_update().returning(|f| Ok(f.clone()));

        let updated = service(floors)
            .update(1, 4, FloorChanges { floor_number: Some(3), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.floor_number, 3);
    }
}
