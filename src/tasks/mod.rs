//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Entry sweep: reclaims expired entry files at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
