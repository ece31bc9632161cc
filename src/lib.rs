//! Australian bank statement extraction and personal tax calculators.
//!
//! Statement text is parsed into [`statement::Transaction`]s, classified
//! against keyword tables for deductions, and cross-referenced with receipts.
//! The [`tax`] module evaluates the resident tax obligations for a fiscal year.

pub mod classify;
pub mod cmd;
pub mod config;
pub mod extract;
pub mod fiscal;
pub mod money;
pub mod receipts;
pub mod statement;
pub mod subscriptions;
pub mod tax;
pub mod verify;
