// ============================================================================
// Rent Core - Flat Service
// File: crates/rent-core/src/services/flat_service.rs
// ============================================================================

use tracing::info;
use validator::Validate;

use rent_shared::{Page, Pagination};

use crate::domain::{Flat, FlatChanges, FlatDetail, FlatFilter, FlatStatus, NewFlat};
use crate::error::DomainError;
use crate::repositories::TenantStore;
use crate::tenancy::ActiveTenant;

pub struct FlatService {
    store: TenantStore,
}

impl FlatService {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    pub fn for_tenant(active: &ActiveTenant) -> Self {
        Self::new(active.store().clone())
    }

    pub async fn list(&self, filter: &FlatFilter, pagination: Pagination) -> Result<Page<Flat>, DomainError> {
        self.store.flats.list(filter, pagination.normalized()).await
    }

    /// Flats open for letting, optionally within one house.
    pub async fn available(&self, house_id: Option<i64>, pagination: Pagination) -> Result<Page<Flat>, DomainError> {
        self.list(&FlatFilter::available_in(house_id), pagination).await
    }

    pub async fn create(&self, flat: NewFlat) -> Result<Flat, DomainError> {
        flat.validate()?;
        self.ensure_placement(flat.house_id, flat.floor_id).await?;
        self.ensure_number_free(flat.house_id, flat.floor_id, &flat.flat_number, None)
            .await?;

        let flat = self.store.flats.create(&flat).await?;
        info!(flat_id = flat.id, house_id = flat.house_id, "Flat created");
        Ok(flat)
    }

    pub async fn find(&self, id: i64) -> Result<Flat, DomainError> {
        self.store
            .flats
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Flat", id))
    }

    pub async fn show(&self, id: i64) -> Result<FlatDetail, DomainError> {
        let flat = self.find(id).await?;
        let house = self.store.houses.find(flat.house_id).await?;
        let floor = self.store.floors.find(flat.floor_id).await?;
        let tenant_users = self.store.users.list_by_flat(id).await?;
        Ok(FlatDetail { flat, house, floor, tenant_users })
    }

    pub async fn update(&self, id: i64, changes: FlatChanges) -> Result<Flat, DomainError> {
        changes.validate()?;
        let mut flat = self.find(id).await?;

        let house_id = changes.house_id.unwrap_or(flat.house_id);
        let floor_id = changes.floor_id.unwrap_or(flat.floor_id);
        if changes.house_id.is_some() || changes.floor_id.is_some() {
            self.ensure_placement(house_id, floor_id).await?;
        }
        if changes.house_id.is_some() || changes.floor_id.is_some() || changes.flat_number.is_some() {
            let number = changes.flat_number.as_deref().unwrap_or(&flat.flat_number);
            self.ensure_number_free(house_id, floor_id, number, Some(id)).await?;
        }

        flat.apply(changes);
        let flat = self.store.flats.update(&flat).await?;
        info!(flat_id = id, "Flat updated");
        Ok(flat)
    }

    pub async fn update_status(&self, id: i64, status: FlatStatus) -> Result<Flat, DomainError> {
        let mut flat = self.find(id).await?;
        flat.apply(FlatChanges { status: Some(status), ..Default::default() });
        let flat = self.store.flats.update(&flat).await?;
        info!(flat_id = id, status = status.as_str(), "Flat status changed");
        Ok(flat)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        if !self.store.flats.delete(id).await? {
            return Err(DomainError::not_found("Flat", id));
        }
        info!(flat_id = id, "Flat deleted");
        Ok(())
    }

    /// The house must exist and the floor must belong to it.
    async fn ensure_placement(&self, house_id: i64, floor_id: i64) -> Result<(), DomainError> {
        if self.store.houses.find(house_id).await?.is_none() {
            return Err(DomainError::invalid("house_id", "The selected house id is invalid."));
        }
        match self.store.floors.find(floor_id).await? {
            Some(floor) if floor.house_id == house_id => Ok(()),
            Some(_) => Err(DomainError::invalid(
                "floor_id",
                "The selected floor does not belong to the selected house.",
            )),
            None => Err(DomainError::invalid("floor_id", "The selected floor id is invalid.")),
        }
    }

    async fn ensure_number_free(
        &self,
        house_id: i64,
        floor_id: i64,
        flat_number: &str,
        except: Option<i64>,
    ) -> Result<(), DomainError> {
        match self.store.flats.find_by_number(house_id, floor_id, flat_number).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(DomainError::conflict("flat_number", flat_number))
            }
            _ => Ok(()),
        }
    }
}
