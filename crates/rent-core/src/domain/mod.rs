//! # Rent Core - Domain Module
//!
//! Central records (tenants, domains, admins, tokens) and the tenant-local
//! property hierarchy.

pub mod admin;
pub mod flat;
pub mod floor;
pub mod house;
pub mod identity;
pub mod tenant;
pub mod tenant_user;

// Re-export all entities and enums
pub use admin::{Admin, Credentials};
pub use flat::{Flat, FlatChanges, FlatDetail, FlatFilter, FlatStatus, FlatStatusUpdate, FlatType, NewFlat};
pub use floor::{Floor, FloorChanges, FloorFilter, FloorSummary, NewFloor};
pub use house::{
    FloorWithFlats, House, HouseChanges, HouseDetail, HouseFilter, HouseStatistics, HouseSummary,
    NewHouse,
};
pub use identity::{AccessToken, Identity};
pub use tenant::{Tenant, TenantAttributes, TenantChanges, TenantDomain, TenantFilter, TenantStatus};
pub use tenant_user::{
    FlatAssignment, NewTenantUser, TenantUser, TenantUserChanges, TenantUserDetail, TenantUserFilter,
    TenantUserStatus,
};
