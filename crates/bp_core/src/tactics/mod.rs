// crates/bp_core/src/tactics/mod.rs
// Scripted tactical content for the planner

pub mod traps;

pub use traps::{trap_for, trap_for_bowler, trap_window_start, TrapBall, TrapPattern};
