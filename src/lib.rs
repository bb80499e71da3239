//! Tumaini USSD - Menu Session Engine
//!
//! This crate serves feature-phone users of the Tumaini case-management
//! platform over a stateless, turn-based USSD protocol: weekly tracking,
//! goal management, emergency contacts, and language switching.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
