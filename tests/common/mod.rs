//! Shared test infrastructure for snmpv1-manager.
//!
//! Provides TestAgent (in-process SNMPv1 agent), fixtures, and utilities.

// Not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod agent;
pub mod fixtures;

pub use agent::{Behavior, TestAgent, TestAgentBuilder};
pub use fixtures::{
    nonexistent_oid, read_only_objects, sys_contact, sys_descr, sys_location, sys_name,
    sys_object_id, sys_services, sys_uptime, system_mib,
};

use snmpv1_manager::Manager;
use std::time::Duration;

/// Manager with a short timeout so failure paths finish quickly.
pub fn manager() -> Manager {
    manager_with(Duration::from_millis(300), 0)
}

pub fn manager_with(timeout: Duration, retries: u32) -> Manager {
    Manager::builder()
        .timeout(timeout)
        .retries(retries)
        .build()
        .expect("valid manager config")
}
