//! aws-janitor - age-based retention sweeper for managed AWS ML resources
//!
//! Enumerates SageMaker notebook instances and serving endpoints per region,
//! applies a configured TTL policy, and deletes resources past their TTL
//! unless whitelisted. Every examined resource is recorded in a shared
//! result tree as an audit trail.

pub mod aws;
pub mod cleanup;
pub mod config;
pub mod resource_tree;
