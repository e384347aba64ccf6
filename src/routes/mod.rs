//! Route Table Modules
//!
//! The guard table is split by audience, mirroring how the application's
//! pages are grouped. Each module returns its slice of `GuardRule`s and
//! `RouteTable::canonical` concatenates them in the order public,
//! authenticated, admin.
//!
//! Declaration order only matters between equally specific rules.

/// Pages open to everyone, including the not-found catch-all.
pub mod public;

/// Pages that need any signed-in principal.
pub mod authenticated;

/// Organization-admin and system-admin panels.
pub mod admin;
