//! addonctl - install cluster add-ons (registry, router, DNS) on a bootstrapped cluster

pub mod commands;
pub mod config;
pub mod install;
pub mod k8s;
pub mod utils;
