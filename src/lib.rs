//! # rlinesec - Network Command Parsing and Line Security Auditing
//!
//! `rlinesec` is a Rust library for turning raw Cisco IOS, IOS-XE and IOS-XR
//! command output into structured data, and for auditing console/async line
//! configuration for telnet exposure. Parsing is total: every input yields a
//! well-formed result, degrading through pattern extraction and generic
//! tabular recovery instead of failing.
//!
//! ## Features
//!
//! - **Tiered Parsing**: Structured templates, then command-specific patterns,
//!   then generic tabular recovery, with an error fallback that still returns
//! - **Line Discovery**: "show line" scanning with `x/y/z` address validation
//!   and range-summary expansion
//! - **Security Classification**: Per-line telnet-exposure detection with a
//!   LOW to CRITICAL risk ladder
//! - **Fleet Aggregation**: Thread-safe collection of per-device audits into
//!   one merged report with a published JSON schema
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> Result<(), rlinesec::error::AuditError> {
//! use rlinesec::lines::{LineAddress, RiskLevel, audit_lines};
//! use std::collections::BTreeMap;
//!
//! let show_line = "\
//!    Tty Line Typ     Tx/Rx    A Modem Roty AccO AccI  Uses  Noise Overruns  Int
//!       1    1 TTY   9600/9600  -    -      -    -    -      0       0    0/0     0/1/5
//! ";
//! let mut blocks = BTreeMap::new();
//! blocks.insert(
//!     "0/1/5".to_string(),
//!     "line 0/1/5\n transport input telnet\n login\n!".to_string(),
//! );
//!
//! let audit = audit_lines(show_line, &blocks, "ios");
//! assert_eq!(audit.summary.telnet_count, 1);
//! let address: LineAddress = "0/1/5".parse()?;
//! let config = &audit.configured[&address];
//! assert_eq!(config.risk_level, RiskLevel::Medium);
//! # Ok(())
//! # }
//! ```
//!
//! ## Main Components
//!
//! - [`parser::CommandParser`] - Tiered, never-failing command output parser
//! - [`lines::audit_lines`] - Per-device console line audit entry point
//! - [`lines::FleetAuditCollector`] - Multi-device audit accumulator
//! - [`error::AuditError`] - Error types for address, template and encoding
//!   failures

pub mod error;
pub mod lines;
pub mod parser;
pub mod platform;
