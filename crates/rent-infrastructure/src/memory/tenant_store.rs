// ============================================================================
// Rent Infrastructure - In-Memory Tenant Store
// File: crates/rent-infrastructure/src/memory/tenant_store.rs
// Description: One isolated store per tenant plus the factory that owns them
// ============================================================================

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use rent_core::domain::{
    Flat, FlatFilter, Floor, FloorFilter, FloorSummary, House, HouseFilter, HouseSummary, NewFlat, NewFloor,
    NewHouse, Tenant, TenantUser, TenantUserFilter,
};
use rent_core::error::DomainError;
use rent_core::repositories::{
    FlatRepository, FloorRepository, HouseRepository, TenantStore, TenantStoreFactory, TenantUserRepository,
};
use rent_shared::{Page, Pagination};

#[derive(Default)]
struct Tables {
    houses: BTreeMap<i64, House>,
    floors: BTreeMap<i64, Floor>,
    flats: BTreeMap<i64, Flat>,
    users: BTreeMap<i64, TenantUser>,
    // Per-table sequences, like BIGSERIAL
    house_seq: i64,
    floor_seq: i64,
    flat_seq: i64,
    user_seq: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn floor_number_taken(&self, house_id: i64, floor_number: i32, except: Option<i64>) -> bool {
        self.floors
            .values()
            .any(|f| f.house_id == house_id && f.floor_number == floor_number && Some(f.id) != except)
    }

    fn flat_number_taken(&self, house_id: i64, floor_id: i64, flat_number: &str, except: Option<i64>) -> bool {
        self.flats.values().any(|f| {
            f.house_id == house_id && f.floor_id == floor_id && f.flat_number == flat_number && Some(f.id) != except
        })
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != except)
    }

    fn check_flat_parents(&self, house_id: i64, floor_id: i64) -> Result<(), DomainError> {
        if !self.houses.contains_key(&house_id) || !self.floors.contains_key(&floor_id) {
            return Err(foreign_key("flats"));
        }
        Ok(())
    }

    fn check_user_flat(&self, flat_id: Option<i64>) -> Result<(), DomainError> {
        match flat_id {
            Some(id) if !self.flats.contains_key(&id) => Err(foreign_key("tenant_users")),
            _ => Ok(()),
        }
    }

    /// Residents of removed flats keep their row with the flat cleared.
    fn remove_flats(&mut self, doomed: impl Fn(&Flat) -> bool) {
        let removed: Vec<i64> = self.flats.values().filter(|&f| doomed(f)).map(|f| f.id).collect();
        for id in &removed {
            self.flats.remove(id);
        }
        for user in self.users.values_mut() {
            if user.flat_id.is_some_and(|f| removed.contains(&f)) {
                user.flat_id = None;
            }
        }
    }
}

fn foreign_key(table: &str) -> DomainError {
    DomainError::DatabaseError(format!("foreign key violation on {}", table))
}

/// A single tenant's houses, floors, flats and residents.
///
/// Cloning shares the same tables; separate stores never share anything.
#[derive(Clone, Default)]
pub struct MemoryTenantStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository bundle backed by this store.
    pub fn handle(&self) -> TenantStore {
        TenantStore {
            houses: Arc::new(self.clone()),
            floors: Arc::new(self.clone()),
            flats: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl HouseRepository for MemoryTenantStore {
    async fn create(&self, house: &NewHouse) -> Result<House, DomainError> {
        let mut tables = self.tables.lock();
        let now = Utc::now();
        let row = House {
            id: next_id(&mut tables.house_seq),
            name: house.name.clone(),
            address: house.address.clone(),
            city: house.city.clone(),
            state: house.state.clone(),
            zip_code: house.zip_code.clone(),
            country: house.country.clone(),
            description: house.description.clone(),
            total_floors: house.total_floors,
            amenities: house.amenities.clone(),
            rules: house.rules.clone(),
            is_active: house.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.houses.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<House>, DomainError> {
        Ok(self.tables.lock().houses.get(&id).cloned())
    }

    async fn list(&self, filter: &HouseFilter, pagination: Pagination) -> Result<Page<HouseSummary>, DomainError> {
        let tables = self.tables.lock();
        let houses: Vec<HouseSummary> = tables
            .houses
            .values()
            .filter(|h| filter.matches(h))
            .map(|h| HouseSummary {
                house: h.clone(),
                floors_count: tables.floors.values().filter(|f| f.house_id == h.id).count() as i64,
                flats_count: tables.flats.values().filter(|f| f.house_id == h.id).count() as i64,
            })
            .collect();
        Ok(Page::from_vec(houses, pagination))
    }

    async fn update(&self, house: &House) -> Result<House, DomainError> {
        let mut tables = self.tables.lock();
        let row = tables
            .houses
            .get_mut(&house.id)
            .ok_or_else(|| DomainError::not_found("House", house.id))?;
        *row = House { updated_at: Utc::now(), ..house.clone() };
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock();
        if tables.houses.remove(&id).is_none() {
            return Ok(false);
        }
        tables.floors.retain(|_, f| f.house_id != id);
        tables.remove_flats(|f| f.house_id == id);
        Ok(true)
    }
}

#[async_trait]
impl FloorRepository for MemoryTenantStore {
    async fn create(&self, house_id: i64, floor: &NewFloor) -> Result<Floor, DomainError> {
        let mut tables = self.tables.lock();
        if !tables.houses.contains_key(&house_id) {
            return Err(foreign_key("floors"));
        }
        if tables.floor_number_taken(house_id, floor.floor_number, None) {
            return Err(DomainError::conflict("floor_number", floor.floor_number.to_string()));
        }
        let now = Utc::now();
        let row = Floor {
            id: next_id(&mut tables.floor_seq),
            house_id,
            floor_number: floor.floor_number,
            name: floor.name.clone(),
            description: floor.description.clone(),
            total_flats: floor.total_flats,
            is_active: floor.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.floors.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Floor>, DomainError> {
        Ok(self.tables.lock().floors.get(&id).cloned())
    }

    async fn find_by_number(&self, house_id: i64, floor_number: i32) -> Result<Option<Floor>, DomainError> {
        Ok(self
            .tables
            .lock()
            .floors
            .values()
            .find(|f| f.house_id == house_id && f.floor_number == floor_number)
            .cloned())
    }

    async fn list_by_house(&self, house_id: i64, filter: &FloorFilter) -> Result<Vec<FloorSummary>, DomainError> {
        let tables = self.tables.lock();
        let mut floors: Vec<FloorSummary> = tables
            .floors
            .values()
            .filter(|f| f.house_id == house_id && filter.matches(f))
            .map(|f| FloorSummary {
                floor: f.clone(),
                flats_count: tables.flats.values().filter(|x| x.floor_id == f.id).count() as i64,
            })
            .collect();
        floors.sort_by_key(|s| s.floor.floor_number);
        Ok(floors)
    }

    async fn update(&self, floor: &Floor) -> Result<Floor, DomainError> {
        let mut tables = self.tables.lock();
        if tables.floor_number_taken(floor.house_id, floor.floor_number, Some(floor.id)) {
            return Err(DomainError::conflict("floor_number", floor.floor_number.to_string()));
        }
        let row = tables
            .floors
            .get_mut(&floor.id)
            .ok_or_else(|| DomainError::not_found("Floor", floor.id))?;
        *row = Floor { updated_at: Utc::now(), ..floor.clone() };
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock();
        if tables.floors.remove(&id).is_none() {
            return Ok(false);
        }
        tables.remove_flats(|f| f.floor_id == id);
        Ok(true)
    }
}

#[async_trait]
impl FlatRepository for MemoryTenantStore {
    async fn create(&self, flat: &NewFlat) -> Result<Flat, DomainError> {
        let mut tables = self.tables.lock();
        tables.check_flat_parents(flat.house_id, flat.floor_id)?;
        if tables.flat_number_taken(flat.house_id, flat.floor_id, &flat.flat_number, None) {
            return Err(DomainError::conflict("flat_number", flat.flat_number.clone()));
        }
        let now = Utc::now();
        let row = Flat {
            id: next_id(&mut tables.flat_seq),
            house_id: flat.house_id,
            floor_id: flat.floor_id,
            flat_number: flat.flat_number.clone(),
            name: flat.name.clone(),
            flat_type: flat.flat_type,
            bedrooms: flat.bedrooms,
            bathrooms: flat.bathrooms,
            size_sqft: flat.size_sqft,
            rent_amount: flat.rent_amount,
            security_deposit: flat.security_deposit,
            description: flat.description.clone(),
            amenities: flat.amenities.clone(),
            status: flat.status,
            is_furnished: flat.is_furnished,
            available_from: flat.available_from,
            created_at: now,
            updated_at: now,
        };
        tables.flats.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Flat>, DomainError> {
        Ok(self.tables.lock().flats.get(&id).cloned())
    }

    async fn find_by_number(&self, house_id: i64, floor_id: i64, flat_number: &str) -> Result<Option<Flat>, DomainError> {
        Ok(self
            .tables
            .lock()
            .flats
            .values()
            .find(|f| f.house_id == house_id && f.floor_id == floor_id && f.flat_number == flat_number)
            .cloned())
    }

    async fn list(&self, filter: &FlatFilter, pagination: Pagination) -> Result<Page<Flat>, DomainError> {
        let flats: Vec<Flat> = self
            .tables
            .lock()
            .flats
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        Ok(Page::from_vec(flats, pagination))
    }

    async fn list_by_house(&self, house_id: i64) -> Result<Vec<Flat>, DomainError> {
        let mut flats: Vec<Flat> = self
            .tables
            .lock()
            .flats
            .values()
            .filter(|f| f.house_id == house_id)
            .cloned()
            .collect();
        flats.sort_by(|a, b| a.floor_id.cmp(&b.floor_id).then_with(|| a.flat_number.cmp(&b.flat_number)));
        Ok(flats)
    }

    async fn update(&self, flat: &Flat) -> Result<Flat, DomainError> {
        let mut tables = self.tables.lock();
        tables.check_flat_parents(flat.house_id, flat.floor_id)?;
        if tables.flat_number_taken(flat.house_id, flat.floor_id, &flat.flat_number, Some(flat.id)) {
            return Err(DomainError::conflict("flat_number", flat.flat_number.clone()));
        }
        let row = tables
            .flats
            .get_mut(&flat.id)
            .ok_or_else(|| DomainError::not_found("Flat", flat.id))?;
        *row = Flat { updated_at: Utc::now(), ..flat.clone() };
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock();
        if !tables.flats.contains_key(&id) {
            return Ok(false);
        }
        tables.remove_flats(|f| f.id == id);
        Ok(true)
    }
}

#[async_trait]
impl TenantUserRepository for MemoryTenantStore {
    async fn create(&self, user: &TenantUser) -> Result<TenantUser, DomainError> {
        let mut tables = self.tables.lock();
        if tables.email_taken(&user.email, None) {
            return Err(DomainError::conflict("email", user.email.clone()));
        }
        tables.check_user_flat(user.flat_id)?;
        let now = Utc::now();
        let row = TenantUser {
            id: next_id(&mut tables.user_seq),
            created_at: now,
            updated_at: now,
            ..user.clone()
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<TenantUser>, DomainError> {
        Ok(self.tables.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<TenantUser>, DomainError> {
        Ok(self
            .tables
            .lock()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, filter: &TenantUserFilter, pagination: Pagination) -> Result<Page<TenantUser>, DomainError> {
        let users: Vec<TenantUser> = self
            .tables
            .lock()
            .users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        Ok(Page::from_vec(users, pagination))
    }

    async fn list_by_flat(&self, flat_id: i64) -> Result<Vec<TenantUser>, DomainError> {
        Ok(self
            .tables
            .lock()
            .users
            .values()
            .filter(|u| u.flat_id == Some(flat_id))
            .cloned()
            .collect())
    }

    async fn update(&self, user: &TenantUser) -> Result<TenantUser, DomainError> {
        let mut tables = self.tables.lock();
        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(DomainError::conflict("email", user.email.clone()));
        }
        tables.check_user_flat(user.flat_id)?;
        let row = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::not_found("TenantUser", user.id))?;
        *row = TenantUser { updated_at: Utc::now(), ..user.clone() };
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.tables.lock().users.remove(&id).is_some())
    }
}

/// Owns every tenant's in-memory store, keyed by tenant id.
#[derive(Default)]
pub struct MemoryTenantStoreFactory {
    stores: RwLock<HashMap<String, MemoryTenantStore>>,
    fail_provisioning: AtomicBool,
}

impl MemoryTenantStoreFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `provision` calls fail, emulating an unreachable store backend.
    pub fn set_fail_provisioning(&self, fail: bool) {
        self.fail_provisioning.store(fail, Ordering::SeqCst);
    }

    pub fn store_count(&self) -> usize {
        self.stores.read().len()
    }
}

#[async_trait]
impl TenantStoreFactory for MemoryTenantStoreFactory {
    async fn provision(&self, tenant_id: &str) -> Result<(), DomainError> {
        if !Tenant::is_valid_slug(tenant_id) {
            return Err(DomainError::InvalidSlug(tenant_id.to_string()));
        }
        if self.fail_provisioning.load(Ordering::SeqCst) {
            warn!("Refusing to provision store for tenant {}", tenant_id);
            return Err(DomainError::DatabaseError("tenant store backend unavailable".to_string()));
        }
        self.stores.write().entry(tenant_id.to_string()).or_default();
        info!("Provisioned in-memory store for tenant {}", tenant_id);
        Ok(())
    }

    async fn open(&self, tenant_id: &str) -> Result<TenantStore, DomainError> {
        self.stores
            .read()
            .get(tenant_id)
            .map(MemoryTenantStore::handle)
            .ok_or_else(|| DomainError::ProvisioningIncomplete {
                tenant_id: tenant_id.to_string(),
                reason: "tenant store has not been provisioned".to_string(),
            })
    }

    async fn exists(&self, tenant_id: &str) -> Result<bool, DomainError> {
        Ok(self.stores.read().contains_key(tenant_id))
    }

    async fn destroy(&self, tenant_id: &str) -> Result<(), DomainError> {
        if self.stores.write().remove(tenant_id).is_some() {
            info!("Dropped in-memory store for tenant {}", tenant_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_core::domain::{FlatStatus, FlatType, TenantUserStatus};

    fn new_house(name: &str) -> NewHouse {
        NewHouse {
            name: name.to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "USA".to_string(),
            description: None,
            total_floors: 2,
            amenities: None,
            rules: None,
            is_active: true,
        }
    }

    fn new_floor(number: i32) -> NewFloor {
        NewFloor { floor_number: number, name: None, description: None, total_flats: 2, is_active: true }
    }

    fn new_flat(house_id: i64, floor_id: i64, number: &str) -> NewFlat {
        NewFlat {
            house_id,
            floor_id,
            flat_number: number.to_string(),
            name: None,
            flat_type: FlatType::TwoBhk,
            bedrooms: 2,
            bathrooms: 1,
            size_sqft: None,
            rent_amount: 1200.0,
            security_deposit: 1200.0,
            description: None,
            amenities: None,
            status: FlatStatus::Available,
            is_furnished: false,
            available_from: None,
        }
    }

    fn resident(email: &str, flat_id: Option<i64>) -> TenantUser {
        let now = Utc::now();
        TenantUser {
            id: 0,
            name: "Resident".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            phone: None,
            flat_id,
            lease_start: None,
            lease_end: None,
            monthly_rent: None,
            security_deposit_paid: None,
            emergency_contact: None,
            documents: None,
            status: TenantUserStatus::Active,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_duplicate_floor_number_conflicts() {
        let store = MemoryTenantStore::new();
        let house = HouseRepository::create(&store, &new_house("A")).await.unwrap();
        FloorRepository::create(&store, house.id, &new_floor(1)).await.unwrap();

        let err = FloorRepository::create(&store, house.id, &new_floor(1)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { field: "floor_number", .. }));
    }

    #[tokio::test]
    async fn test_house_delete_cascades_and_clears_residents() {
        let store = MemoryTenantStore::new();
        let house = HouseRepository::create(&store, &new_house("A")).await.unwrap();
        let floor = FloorRepository::create(&store, house.id, &new_floor(1)).await.unwrap();
        let flat = FlatRepository::create(&store, &new_flat(house.id, floor.id, "101")).await.unwrap();
        let user = TenantUserRepository::create(&store, &resident("r@x.test", Some(flat.id))).await.unwrap();

        assert!(HouseRepository::delete(&store, house.id).await.unwrap());

        assert!(FloorRepository::find(&store, floor.id).await.unwrap().is_none());
        assert!(FlatRepository::find(&store, flat.id).await.unwrap().is_none());
        let user = TenantUserRepository::find(&store, user.id).await.unwrap().unwrap();
        assert_eq!(user.flat_id, None);
    }

    #[tokio::test]
    async fn test_flat_requires_existing_parents() {
        let store = MemoryTenantStore::new();
        let err = FlatRepository::create(&store, &new_flat(9, 9, "101")).await.unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_user_email_unique_case_insensitive() {
        let store = MemoryTenantStore::new();
        TenantUserRepository::create(&store, &resident("r@x.test", None)).await.unwrap();
        let err = TenantUserRepository::create(&store, &resident("R@X.test", None)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { field: "email", .. }));
    }

    #[tokio::test]
    async fn test_factory_stores_are_isolated() {
        let factory = MemoryTenantStoreFactory::new();
        factory.provision("acme").await.unwrap();
        factory.provision("beta").await.unwrap();

        let acme = factory.open("acme").await.unwrap();
        let beta = factory.open("beta").await.unwrap();
        acme.houses.create(&new_house("Acme Tower")).await.unwrap();

        let page = beta.houses.list(&HouseFilter::default(), Pagination::new(1, 15)).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_open_unprovisioned_is_incomplete() {
        let factory = MemoryTenantStoreFactory::new();
        let err = factory.open("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::ProvisioningIncomplete { .. }));
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let factory = MemoryTenantStoreFactory::new();
        factory.provision("acme").await.unwrap();
        factory
            .open("acme")
            .await
            .unwrap()
            .houses
            .create(&new_house("Kept"))
            .await
            .unwrap();
        factory.provision("acme").await.unwrap();

        let page = factory
            .open("acme")
            .await
            .unwrap()
            .houses
            .list(&HouseFilter::default(), Pagination::new(1, 15))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(factory.store_count(), 1);
    }
}
