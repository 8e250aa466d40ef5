//! Command implementations for addonctl CLI

pub mod check;
pub mod install;
