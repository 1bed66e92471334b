//! Residents: CRUD plus moving them in and out of flats

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use validator::Validate;

use rent_security::PasswordService;
use rent_shared::{Page, Pagination};

use crate::domain::{
    Flat, FlatAssignment, FlatChanges, FlatStatus, NewTenantUser, TenantUser, TenantUserChanges,
    TenantUserDetail, TenantUserFilter, TenantUserStatus,
};
use crate::error::DomainError;
use crate::repositories::TenantStore;
use crate::tenancy::ActiveTenant;

fn check_lease(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), DomainError> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => Err(DomainError::invalid(
            "lease_end",
            "The lease end must be a date after lease start.",
        )),
        _ => Ok(()),
    }
}

pub struct TenantUserService {
    store: TenantStore,
}

impl TenantUserService {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    pub fn for_tenant(active: &ActiveTenant) -> Self {
        Self::new(active.store().clone())
    }

    pub async fn list(&self, filter: &TenantUserFilter, pagination: Pagination) -> Result<Page<TenantUser>, DomainError> {
        self.store.users.list(filter, pagination.normalized()).await
    }

    pub async fn create(&self, input: NewTenantUser) -> Result<TenantUserDetail, DomainError> {
        // 1. Field rules
        input.validate()?;
        check_lease(input.lease_start, input.lease_end)?;

        // 2. Email unique within this tenant
        let email = input.email.trim().to_lowercase();
        if self.store.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("email", email));
        }

        // 3. Flat reference
        if let Some(flat_id) = input.flat_id {
            self.existing_flat(flat_id).await?;
        }

        let now = Utc::now();
        let user = TenantUser {
            id: 0,
            name: input.name.trim().to_string(),
            email,
            password_hash: PasswordService::hash(&input.password)?,
            phone: input.phone,
            flat_id: input.flat_id,
            lease_start: input.lease_start,
            lease_end: input.lease_end,
            monthly_rent: input.monthly_rent,
            security_deposit_paid: input.security_deposit_paid,
            emergency_contact: input.emergency_contact,
            documents: input.documents,
            status: input.status,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        if user.is_occupying() {
            if let Some(flat_id) = user.flat_id {
                self.ensure_vacant(flat_id, None).await?;
            }
        }

        let user = self.store.users.create(&user).await?;
        self.sync_occupancy(&user).await?;
        info!(user_id = user.id, "Tenant user created");
        self.detail(user).await
    }

    pub async fn find(&self, id: i64) -> Result<TenantUser, DomainError> {
        self.store
            .users
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("TenantUser", id))
    }

    pub async fn show(&self, id: i64) -> Result<TenantUserDetail, DomainError> {
        let user = self.find(id).await?;
        self.detail(user).await
    }

    pub async fn update(&self, id: i64, changes: TenantUserChanges) -> Result<TenantUserDetail, DomainError> {
        changes.validate()?;
        let mut user = self.find(id).await?;

        check_lease(
            changes.lease_start.or(user.lease_start),
            changes.lease_end.or(user.lease_end),
        )?;

        if let Some(email) = changes.email.as_deref() {
            let email = email.trim().to_lowercase();
            if let Some(existing) = self.store.users.find_by_email(&email).await? {
                if existing.id != id {
                    return Err(DomainError::conflict("email", email));
                }
            }
        }

        if let Some(flat_id) = changes.flat_id {
            self.existing_flat(flat_id).await?;
        }

        let password_hash = match changes.password.as_deref() {
            Some(password) => Some(PasswordService::hash(password)?),
            None => None,
        };

        user.apply(changes, password_hash);
        if user.is_occupying() {
            if let Some(flat_id) = user.flat_id {
                self.ensure_vacant(flat_id, Some(id)).await?;
            }
        }

        let user = self.store.users.update(&user).await?;
        self.sync_occupancy(&user).await?;
        info!(user_id = id, "Tenant user updated");
        self.detail(user).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let user = self.find(id).await?;
        self.store.users.delete(id).await?;
        if let Some(flat_id) = user.flat_id.filter(|_| user.is_occupying()) {
            self.release_flat(flat_id, id).await?;
        }
        info!(user_id = id, "Tenant user deleted");
        Ok(())
    }

    /// Moves a resident into a flat under the given lease terms.
    pub async fn assign_flat(&self, id: i64, assignment: FlatAssignment) -> Result<TenantUserDetail, DomainError> {
        assignment.validate()?;
        check_lease(Some(assignment.lease_start), Some(assignment.lease_end))?;

        let mut user = self.find(id).await?;
        self.existing_flat(assignment.flat_id).await?;
        self.ensure_vacant(assignment.flat_id, Some(id)).await?;

        let previous_flat = user.flat_id.filter(|f| *f != assignment.flat_id && user.is_occupying());
        user.apply(
            TenantUserChanges {
                flat_id: Some(assignment.flat_id),
                lease_start: Some(assignment.lease_start),
                lease_end: Some(assignment.lease_end),
                monthly_rent: Some(assignment.monthly_rent),
                security_deposit_paid: Some(assignment.security_deposit_paid),
                status: Some(TenantUserStatus::Active),
                ..Default::default()
            },
            None,
        );

        let user = self.store.users.update(&user).await?;
        if let Some(flat_id) = previous_flat {
            self.release_flat(flat_id, id).await?;
        }
        self.sync_occupancy(&user).await?;
        info!(user_id = id, flat_id = assignment.flat_id, "Flat assigned");
        self.detail(user).await
    }

    /// Moves a resident out: the flat is cleared and the resident goes inactive.
    pub async fn remove_flat(&self, id: i64) -> Result<TenantUserDetail, DomainError> {
        let mut user = self.find(id).await?;
        let previous_flat = user.flat_id.take();

        user.status = TenantUserStatus::Inactive;
        user.updated_at = Utc::now();
        let user = self.store.users.update(&user).await?;

        if let Some(flat_id) = previous_flat {
            self.release_flat(flat_id, id).await?;
        }
        info!(user_id = id, "Flat removed from tenant user");
        self.detail(user).await
    }

    async fn detail(&self, user: TenantUser) -> Result<TenantUserDetail, DomainError> {
        let flat = match user.flat_id {
            Some(flat_id) => self.store.flats.find(flat_id).await?,
            None => None,
        };
        Ok(TenantUserDetail { user, flat })
    }

    async fn existing_flat(&self, flat_id: i64) -> Result<Flat, DomainError> {
        self.store
            .flats
            .find(flat_id)
            .await?
            .ok_or_else(|| DomainError::invalid("flat_id", "The selected flat id is invalid."))
    }

    /// A flat holds at most one active occupant.
    async fn ensure_vacant(&self, flat_id: i64, except: Option<i64>) -> Result<(), DomainError> {
        let occupied = self
            .store
            .users
            .list_by_flat(flat_id)
            .await?
            .iter()
            .any(|u| u.is_occupying() && Some(u.id) != except);
        if occupied {
            warn!(flat_id, "Flat already has an active occupant");
            return Err(DomainError::conflict("flat_id", flat_id.to_string()));
        }
        Ok(())
    }

    async fn sync_occupancy(&self, user: &TenantUser) -> Result<(), DomainError> {
        if !user.is_occupying() {
            return Ok(());
        }
        if let Some(flat_id) = user.flat_id {
            self.set_flat_status(flat_id, FlatStatus::Occupied).await?;
        }
        Ok(())
    }

    /// Marks the flat available unless someone else still occupies it.
    async fn release_flat(&self, flat_id: i64, leaving: i64) -> Result<(), DomainError> {
        let still_occupied = self
            .store
            .users
            .list_by_flat(flat_id)
            .await?
            .iter()
            .any(|u| u.id != leaving && u.is_occupying());
        if !still_occupied {
            self.set_flat_status(flat_id, FlatStatus::Available).await?;
        }
        Ok(())
    }

    async fn set_flat_status(&self, flat_id: i64, status: FlatStatus) -> Result<(), DomainError> {
        if let Some(mut flat) = self.store.flats.find(flat_id).await? {
            if flat.status != status {
                flat.apply(FlatChanges { status: Some(status), ..Default::default() });
                self.store.flats.update(&flat).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::repositories::{
        MockFlatRepository, MockFloorRepository, MockHouseRepository, MockTenantUserRepository,
    };
    use crate::services::house_service::tests::flat;

    fn resident(id: i64, flat_id: Option<i64>, status: TenantUserStatus) -> TenantUser {
        let now = Utc::now();
        TenantUser {
            id,
            name: format!("Resident {id}"),
            email: format!("r{id}@acme.test"),
            password_hash: String::new(),
            phone: None,
            flat_id,
            lease_start: None,
            lease_end: None,
            monthly_rent: None,
            security_deposit_paid: None,
            emergency_contact: None,
            documents: None,
            status,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(users: MockTenantUserRepository, flats: MockFlatRepository) -> TenantUserService {
        TenantUserService::new(TenantStore {
            houses: Arc::new(MockHouseRepository::new()),
            floors: Arc::new(MockFloorRepository::new()),
            flats: Arc::new(flats),
            users: Arc::new(users),
        })
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn assignment(start: &str, end: &str) -> FlatAssignment {
        FlatAssignment {
            flat_id: 3,
            lease_start: date(start),
            lease_end: date(end),
            monthly_rent: 1200.0,
            security_deposit_paid: 2400.0,
        }
    }

    #[tokio::test]
    async fn test_lease_end_must_follow_start() {
        let err = service(MockTenantUserRepository::new(), MockFlatRepository::new())
            .assign_flat(1, assignment("2026-06-01", "2026-05-01"))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("lease_end"));
    }

    #[tokio::test]
    async fn test_assign_to_occupied_flat_is_conflict() {
        let mut users = MockTenantUserRepository::new();
        users.expect_find().returning(|id| Ok(Some(resident(id, None, TenantUserStatus::Pending))));
        users
            .expect_list_by_flat()
            .returning(|flat_id| Ok(vec![resident(2, Some(flat_id), TenantUserStatus::Active)]));
        users.expect_update().never();
        let mut flats = MockFlatRepository::new();
        flats.expect_find().returning(|id| Ok(Some(flat(id, 1, 1200.0, FlatStatus::Occupied))));

        let err = service(users, flats)
            .assign_flat(1, assignment("2026-01-01", "2026-12-31"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { field: "flat_id", .. }));
    }

    #[tokio::test]
    async fn test_assign_activates_resident_and_occupies_flat() {
        let mut users = MockTenantUserRepository::new();
        users.expect_find().returning(|id| Ok(Some(resident(id, None, TenantUserStatus::Pending))));
        users.expect_list_by_flat().returning(|_| Ok(vec![]));
        users.expect_update().returning(|u| Ok(u.clone()));
        let mut flats = MockFlatRepository::new();
        flats.expect_find().returning(|id| Ok(Some(flat(id, 1, 1200.0, FlatStatus::Available))));
        flats
            .expect_update()
            .withf(|f| f.status == FlatStatus::Occupied)
            .times(1)
            .returning(|f| Ok(f.clone()));

        let detail = service(users, flats)
            .assign_flat(1, assignment("2026-01-01", "2026-12-31"))
            .await
            .unwrap();
        assert_eq!(detail.user.status, TenantUserStatus::Active);
        assert_eq!(detail.user.flat_id, Some(3));
        assert_eq!(detail.user.monthly_rent, Some(1200.0));
    }

    #[tokio::test]
    async fn test_remove_flat_deactivates_and_frees_flat() {
        let mut users = MockTenantUserRepository::new();
        users.expect_find().returning(|id| Ok(Some(resident(id, Some(3), TenantUserStatus::Active))));
        users.expect_update().returning(|u| Ok(u.clone()));
        users.expect_list_by_flat().returning(|_| Ok(vec![]));
        let mut flats = MockFlatRepository::new();
        flats.expect_find().returning(|id| Ok(Some(flat(id, 1, 1200.0, FlatStatus::Occupied))));
        flats
            .expect_update()
            .withf(|f| f.status == FlatStatus::Available)
            .times(1)
            .returning(|f| Ok(f.clone()));

        let detail = service(users, flats).remove_flat(1).await.unwrap();
        assert_eq!(detail.user.status, TenantUserStatus::Inactive);
        assert_eq!(detail.user.flat_id, None);
        assert!(detail.flat.is_none());
    }
}
