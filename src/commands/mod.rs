// Reconciliation
pub mod install;
pub mod sync;

// Read-only reporting
pub mod check;
pub mod detect;
pub mod status;

// Package file maintenance
pub mod sort;
