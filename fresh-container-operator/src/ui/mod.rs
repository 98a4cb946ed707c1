//! User facing output of the command line.

pub mod table;
