//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define HOW the domain wants to persist data,
//! but NOT how it's actually done. That's the adapter's job.
//!
//! ```text
//! Domain Layer             │  Adapter Layer
//! ─────────────────────────┼────────────────────────
//! trait MissionRepository  │  InMemoryMissionRepository
//!   fn save()              │  (SQL-backed stores plug in here)
//!   fn find_by_id()        │
//! ```

pub mod mission_repository;
pub mod personnel_repository;
