//! Registration, isolation and removal of tenants over the in-memory backend.

use std::collections::HashSet;
use std::sync::Arc;

use rent_core::domain::{HouseFilter, NewHouse, TenantAttributes};
use rent_core::error::DomainError;
use rent_core::services::{HouseService, TenantProvisioner};
use rent_core::tenancy::{Rejection, StoreRegistry, TenantContext, TenantResolver, TenantSwitch};
use rent_infrastructure::{MemoryTenantDirectory, MemoryTenantStoreFactory, MemoryTokenRepository};
use rent_shared::Pagination;

struct Harness {
    factory: Arc<MemoryTenantStoreFactory>,
    provisioner: TenantProvisioner,
    resolver: TenantResolver,
    switch: TenantSwitch,
}

fn harness() -> Harness {
    let directory = Arc::new(MemoryTenantDirectory::new());
    let factory = Arc::new(MemoryTenantStoreFactory::new());
    let registry = Arc::new(StoreRegistry::new(factory.clone()));
    let tokens = Arc::new(MemoryTokenRepository::new());

    Harness {
        provisioner: TenantProvisioner::new(directory.clone(), registry.clone(), tokens, "rent.test"),
        resolver: TenantResolver::new(directory, ["admin.rent.test"]),
        switch: TenantSwitch::new(registry),
        factory,
    }
}

fn attrs(email: &str) -> TenantAttributes {
    TenantAttributes {
        name: "Rentals".to_string(),
        email: email.to_string(),
        phone: None,
        address: None,
        owner_name: "Owner".to_string(),
    }
}

fn house(name: &str) -> NewHouse {
    NewHouse {
        name: name.to_string(),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62701".to_string(),
        country: "USA".to_string(),
        description: None,
        total_floors: 1,
        amenities: None,
        rules: None,
        is_active: true,
    }
}

#[tokio::test]
async fn test_registration_returns_access_url_and_builds_store() {
    let h = harness();
    let registration = h.provisioner.register("acme", attrs("owner@acme.test"), None).await.unwrap();

    assert_eq!(registration.access_url, "https://acme.rent.test");
    assert_eq!(registration.tenant.domains[0].domain, "acme.rent.test");
    assert_eq!(h.factory.store_count(), 1);
}

#[tokio::test]
async fn test_duplicate_subdomain_leaves_first_tenant_intact() {
    let h = harness();
    h.provisioner.register("acme", attrs("a@acme.test"), None).await.unwrap();
    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();
    h.switch
        .run(tenant, |active| async move {
            HouseService::for_tenant(&active).create(house("Acme Tower")).await
        })
        .await
        .unwrap();

    let err = h.provisioner.register("acme", attrs("other@acme.test"), None).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { field: "subdomain", .. }));

    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();
    assert_eq!(tenant.email, "a@acme.test");
    let page = h
        .switch
        .run(tenant, |active| async move {
            HouseService::for_tenant(&active)
                .list(&HouseFilter::default(), Pagination::new(1, 15))
                .await
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(h.factory.store_count(), 1);
}

#[tokio::test]
async fn test_tenant_data_never_crosses_stores() {
    let h = harness();
    h.provisioner.register("acme", attrs("a@acme.test"), None).await.unwrap();
    h.provisioner.register("beta", attrs("b@beta.test"), None).await.unwrap();

    let acme = h.resolver.resolve("acme.rent.test").await.unwrap();
    h.switch
        .run(acme, |active| async move {
            HouseService::for_tenant(&active).create(house("Acme Tower")).await
        })
        .await
        .unwrap();
    assert!(!TenantContext::is_active());

    let beta = h.resolver.resolve("beta.rent.test").await.unwrap();
    let page = h
        .switch
        .run(beta, |active| async move {
            HouseService::for_tenant(&active)
                .list(&HouseFilter::default(), Pagination::new(1, 15))
                .await
        })
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_store_failure_surfaces_incomplete_then_reprovision_repairs() {
    let h = harness();
    h.factory.set_fail_provisioning(true);

    let err = h
        .provisioner
        .register("acme", attrs("a@acme.test"), Some("owner-secret-1".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ProvisioningIncomplete { .. }));

    // The directory row survives, so the host resolves but has no store yet
    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();
    let err = h.switch.activate(tenant).await.unwrap_err();
    assert!(matches!(err, DomainError::ProvisioningIncomplete { .. }));

    h.factory.set_fail_provisioning(false);
    h.provisioner
        .reprovision("acme", Some("owner-secret-1".to_string()))
        .await
        .unwrap();
    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();
    let owner = h
        .switch
        .run(tenant, |active| async move { active.store().users.find_by_email("a@acme.test").await })
        .await
        .unwrap();
    assert!(owner.is_some());
}

#[tokio::test]
async fn test_deprovisioned_host_is_unknown() {
    let h = harness();
    h.provisioner.register("acme", attrs("a@acme.test"), None).await.unwrap();
    h.provisioner.deprovision("acme", true).await.unwrap();

    let err = h.resolver.resolve("acme.rent.test").await.unwrap_err();
    assert!(matches!(err, DomainError::TenantRejected(Rejection::UnknownTenant)));
    assert_eq!(h.factory.store_count(), 0);
}

#[tokio::test]
async fn test_retained_store_reserves_subdomain() {
    let h = harness();
    h.provisioner.register("acme", attrs("a@acme.test"), None).await.unwrap();
    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();
    h.switch
        .run(tenant, |active| async move {
            HouseService::for_tenant(&active).create(house("Old Tower")).await
        })
        .await
        .unwrap();

    h.provisioner.deprovision("acme", false).await.unwrap();
    assert_eq!(h.factory.store_count(), 1);

    // A newcomer must not inherit the removed tenant's data
    let err = h.provisioner.register("acme", attrs("new@acme.test"), None).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { field: "subdomain", .. }));
    assert!(h.resolver.resolve("acme.rent.test").await.is_err());
}

#[tokio::test]
async fn test_purged_subdomain_registers_with_empty_store() {
    let h = harness();
    h.provisioner.register("acme", attrs("a@acme.test"), None).await.unwrap();
    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();
    h.switch
        .run(tenant, |active| async move {
            HouseService::for_tenant(&active).create(house("Old Tower")).await
        })
        .await
        .unwrap();
    h.provisioner.deprovision("acme", true).await.unwrap();

    h.provisioner.register("acme", attrs("new@acme.test"), None).await.unwrap();
    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();
    let page = h
        .switch
        .run(tenant, |active| async move {
            HouseService::for_tenant(&active)
                .list(&HouseFilter::default(), Pagination::new(1, 15))
                .await
        })
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_listing_pages_through_twelve_houses() {
    let h = harness();
    h.provisioner.register("acme", attrs("a@acme.test"), None).await.unwrap();
    let tenant = h.resolver.resolve("acme.rent.test").await.unwrap();

    let pages = h
        .switch
        .run(tenant, |active| async move {
            let service = HouseService::for_tenant(&active);
            for n in 1..=12 {
                service.create(house(&format!("House {n}"))).await?;
            }
            let mut pages = Vec::new();
            for page in 1..=3 {
                let result = service.list(&HouseFilter::default(), Pagination::new(page, 5)).await?;
                assert_eq!(result.total, 12);
                assert_eq!(result.last_page, 3);
                pages.push(result.data.iter().map(|row| row.house.id).collect::<Vec<_>>());
            }
            Ok::<_, DomainError>(pages)
        })
        .await
        .unwrap();

    let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
    let distinct: HashSet<i64> = pages.iter().flatten().copied().collect();
    assert_eq!(distinct.len(), 12);
}
