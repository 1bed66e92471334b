//! Tenant-local repository traits (ports)
//!
//! Every implementation is scoped to a single tenant's store; nothing here
//! takes a tenant id.

use async_trait::async_trait;

use rent_shared::{Page, Pagination};

use crate::domain::{
    Flat, FlatFilter, Floor, FloorFilter, FloorSummary, House, HouseFilter, HouseSummary, NewFlat,
    NewFloor, NewHouse, TenantUser, TenantUserFilter,
};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HouseRepository: Send + Sync {
    async fn create(&self, house: &NewHouse) -> Result<House, DomainError>;
    async fn find(&self, id: i64) -> Result<Option<House>, DomainError>;
    /// Ordered by id, with floor and flat counts.
    async fn list(&self, filter: &HouseFilter, pagination: Pagination) -> Result<Page<HouseSummary>, DomainError>;
    async fn update(&self, house: &House) -> Result<House, DomainError>;
    /// Cascades to floors and flats; residents keep their row with `flat_id` cleared.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FloorRepository: Send + Sync {
    async fn create(&self, house_id: i64, floor: &NewFloor) -> Result<Floor, DomainError>;
    async fn find(&self, id: i64) -> Result<Option<Floor>, DomainError>;
    async fn find_by_number(&self, house_id: i64, floor_number: i32) -> Result<Option<Floor>, DomainError>;
    /// Ordered by floor_number.
    async fn list_by_house(&self, house_id: i64, filter: &FloorFilter) -> Result<Vec<FloorSummary>, DomainError>;
    async fn update(&self, floor: &Floor) -> Result<Floor, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlatRepository: Send + Sync {
    async fn create(&self, flat: &NewFlat) -> Result<Flat, DomainError>;
    async fn find(&self, id: i64) -> Result<Option<Flat>, DomainError>;
    async fn find_by_number(&self, house_id: i64, floor_id: i64, flat_number: &str) -> Result<Option<Flat>, DomainError>;
    async fn list(&self, filter: &FlatFilter, pagination: Pagination) -> Result<Page<Flat>, DomainError>;
    async fn list_by_house(&self, house_id: i64) -> Result<Vec<Flat>, DomainError>;
    async fn update(&self, flat: &Flat) -> Result<Flat, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantUserRepository: Send + Sync {
    /// `user.id` is ignored; the store assigns it.
    async fn create(&self, user: &TenantUser) -> Result<TenantUser, DomainError>;
    async fn find(&self, id: i64) -> Result<Option<TenantUser>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<TenantUser>, DomainError>;
    async fn list(&self, filter: &TenantUserFilter, pagination: Pagination) -> Result<Page<TenantUser>, DomainError>;
    async fn list_by_flat(&self, flat_id: i64) -> Result<Vec<TenantUser>, DomainError>;
    async fn update(&self, user: &TenantUser) -> Result<TenantUser, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
