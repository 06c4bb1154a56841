//! Core of the Notfellchen adoption board: notices and animals, photo
//! selection, place resolution, accounts with trust levels, and the report
//! moderation workflow.

pub mod accounts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod moderation;
pub mod repository;
pub mod store;
pub mod telemetry;
