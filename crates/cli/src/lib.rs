//! Plumbing shared by the fresh container command-line programs.

pub mod config;
