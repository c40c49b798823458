//! Viranvio: projects VirSorter phage predictions onto Anvi'o splits.

pub mod error;

pub mod affi;
pub mod classify;
pub mod cli;
pub mod global_signal;
pub mod input;
pub mod naming;
pub mod report;
pub mod splits;
