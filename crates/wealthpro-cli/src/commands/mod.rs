//! Command handlers, one module per command group.

pub mod clients;
pub mod comms;
pub mod init;
pub mod misc;
pub mod options;
pub mod portfolio;
pub mod review;
pub mod tasks;
