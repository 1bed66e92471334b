//! House management within the active tenant's store

use tracing::info;
use validator::Validate;

use rent_shared::{Page, Pagination};

use crate::domain::{
    FlatStatus, FloorFilter, FloorWithFlats, House, HouseChanges, HouseDetail, HouseFilter,
    HouseStatistics, HouseSummary, NewHouse,
};
use crate::error::DomainError;
use crate::repositories::TenantStore;
use crate::tenancy::ActiveTenant;

pub struct HouseService {
    store: TenantStore,
}

impl HouseService {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    pub fn for_tenant(active: &ActiveTenant) -> Self {
        Self::new(active.store().clone())
    }

    pub async fn list(&self, filter: &HouseFilter, pagination: Pagination) -> Result<Page<HouseSummary>, DomainError> {
        self.store.houses.list(filter, pagination.normalized()).await
    }

    pub async fn create(&self, house: NewHouse) -> Result<House, DomainError> {
        house.validate()?;
        let house = self.store.houses.create(&house).await?;
        info!(house_id = house.id, "House created");
        Ok(house)
    }

    pub async fn find(&self, id: i64) -> Result<House, DomainError> {
        self.store
            .houses
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("House", id))
    }

    /// House with every floor and the flats on it.
    pub async fn show(&self, id: i64) -> Result<HouseDetail, DomainError> {
        let house = self.find(id).await?;
        let floors = self.store.floors.list_by_house(id, &FloorFilter::default()).await?;
        let mut flats = self.store.flats.list_by_house(id).await?;

        let flats_count = flats.len() as i64;
        let floors_count = floors.len() as i64;
        let floors = floors
            .into_iter()
            .map(|summary| {
                let (on_floor, rest): (Vec<_>, Vec<_>) =
                    flats.drain(..).partition(|f| f.floor_id == summary.floor.id);
                flats = rest;
                FloorWithFlats { floor: summary.floor, flats: on_floor }
            })
            .collect();

        Ok(HouseDetail { house, floors, floors_count, flats_count })
    }

    pub async fn update(&self, id: i64, changes: HouseChanges) -> Result<House, DomainError> {
        changes.validate()?;
        let mut house = self.find(id).await?;
        house.apply(changes);
        let house = self.store.houses.update(&house).await?;
        info!(house_id = house.id, "House updated");
        Ok(house)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        if !self.store.houses.delete(id).await? {
            return Err(DomainError::not_found("House", id));
        }
        info!(house_id = id, "House deleted");
        Ok(())
    }

    pub async fn statistics(&self, id: i64) -> Result<HouseStatistics, DomainError> {
        self.find(id).await?;
        let floors = self.store.floors.list_by_house(id, &FloorFilter::default()).await?;
        let flats = self.store.flats.list_by_house(id).await?;

        let count = |status: FlatStatus| flats.iter().filter(|f| f.status == status).count() as i64;
        Ok(HouseStatistics {
            total_floors: floors.len() as i64,
            total_flats: flats.len() as i64,
            available_flats: count(FlatStatus::Available),
            occupied_flats: count(FlatStatus::Occupied),
            maintenance_flats: count(FlatStatus::Maintenance),
            reserved_flats: count(FlatStatus::Reserved),
            total_rent_potential: flats.iter().map(|f| f.rent_amount).sum(),
            occupied_rent_amount: flats
                .iter()
                .filter(|f| f.status == FlatStatus::Occupied)
                .map(|f| f.rent_amount)
                .sum(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::{Flat, FlatType, Floor, FloorSummary};
    use crate::repositories::{
        MockFlatRepository, MockFloorRepository, MockHouseRepository, MockTenantUserRepository,
    };

    pub(crate) fn house(id: i64) -> House {
        let now = Utc::now();
        House {
            id,
            name: "Maple Court".into(),
            address: "1 Maple St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
            country: "USA".into(),
            description: None,
            total_floors: 2,
            amenities: None,
            rules: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn floor(id: i64, house_id: i64, number: i32) -> Floor {
        let now = Utc::now();
        Floor {
            id,
            house_id,
            floor_number: number,
            name: None,
            description: None,
            total_flats: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn flat(id: i64, floor_id: i64, rent: f64, status: FlatStatus) -> Flat {
        let now = Utc::now();
        Flat {
            id,
            house_id: 1,
            floor_id,
            flat_number: format!("{}0{}", floor_id, id),
            name: None,
            flat_type: FlatType::TwoBhk,
            bedrooms: 2,
            bathrooms: 1,
            size_sqft: None,
            rent_amount: rent,
            security_deposit: rent * 2.0,
            description: None,
            amenities: None,
            status,
            is_furnished: false,
            available_from: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn store(houses: MockHouseRepository, floors: MockFloorRepository, flats: MockFlatRepository) -> TenantStore {
        TenantStore {
            houses: Arc::new(houses),
            floors: Arc::new(floors),
            flats: Arc::new(flats),
            users: Arc::new(MockTenantUserRepository::new()),
        }
    }

    fn populated() -> HouseService {
        let mut houses = MockHouseRepository::new();
        houses.expect_find().returning(|id| Ok(Some(house(id))));
        let mut floors = MockFloorRepository::new();
        floors.expect_list_by_house().returning(|house_id, _| {
            Ok(vec![
                FloorSummary { floor: floor(1, house_id, 1), flats_count: 2 },
                FloorSummary { floor: floor(2, house_id, 2), flats_count: 1 },
            ])
        });
        let mut flats = MockFlatRepository::new();
        flats.expect_list_by_house().returning(|_| {
            Ok(vec![
                flat(1, 1, 1000.0, FlatStatus::Occupied),
                flat(2, 1, 1500.0, FlatStatus::Available),
                flat(3, 2, 2000.0, FlatStatus::Maintenance),
            ])
        });
        HouseService::new(store(houses, floors, flats))
    }

    #[tokio::test]
    async fn test_statistics_counts_by_status() {
        let stats = populated().statistics(1).await.unwrap();
        assert_eq!(stats.total_floors, 2);
        assert_eq!(stats.total_flats, 3);
        assert_eq!(stats.available_flats, 1);
        assert_eq!(stats.occupied_flats, 1);
        assert_eq!(stats.maintenance_flats, 1);
        assert_eq!(stats.reserved_flats, 0);
        assert_eq!(stats.total_rent_potential, 4500.0);
        assert_eq!(stats.occupied_rent_amount, 1000.0);
    }

    #[tokio::test]
    async fn test_show_groups_flats_under_their_floor() {
        let detail = populated().show(1).await.unwrap();
        assert_eq!(detail.floors_count, 2);
        assert_eq!(detail.flats_count, 3);
        assert_eq!(detail.floors[0].flats.len(), 2);
        assert_eq!(detail.floors[1].flats.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_house_is_not_found() {
        let mut houses = MockHouseRepository::new();
        houses.expect_find().returning(|_| Ok(None));
        let service = HouseService::new(store(houses, MockFloorRepository::new(), MockFlatRepository::new()));

        assert!(matches!(service.statistics(9).await, Err(DomainError::NotFound { .. })));
    }
}
