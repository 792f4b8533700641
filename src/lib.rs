//! Tunnel Boot
//!
//! A cf CLI plugin that lets a Spring Boot application run on the
//! developer's machine while taking part in a Cloud Foundry space: a small
//! tunnel application is pushed in its place, its environment is copied for
//! local launches, and an ssh reverse tunnel carries traffic back.

pub mod cli;
pub mod core;
pub mod logging;
