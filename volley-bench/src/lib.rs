//! # Volley
//!
//! A concurrent RPC load generator. Volley opens many client
//! connections at once, fires a fixed volume of blocking `ping` calls
//! down each of them, and reports how long the whole barrage took.
//!
//! ## Purpose
//!
//! Measuring an RPC server's ceiling takes a client that can saturate
//! it. Volley keeps the per-call work trivial (a zero-argument ping) so
//! that the numbers reflect connection handling, codec cost, and
//! scheduling, not application logic:
//!
//! - **Fixed run shape**: every run issues the same number of calls,
//!   so runs are directly comparable
//! - **Pluggable codecs**: binary, compact, json, simplejson, selected
//!   per run
//! - **Plain or TLS transport**: the same run shape over either socket
//!
//! ## Quick Start
//!
//! ```bash
//! # Show all available options
//! volley --help
//!
//! # Default binary codec against localhost:9090
//! volley
//!
//! # Compact codec against a remote server, over TLS
//! volley -P compact --addr bench-target:9090 --secure
//! ```
//!
//! ## Output
//!
//! One summary on stdout per run; worker errors go to stderr and do not
//! change the exit code:
//!
//! ```text
//! workers: 1024, calls: 10000, workers * calls: 10240000
//! total time: 105521694 us
//! qps: 97041.606922
//! ```
//!
//! ## Architecture
//!
//! ```text
//!                 ┌─────────────┐
//!                 │ Coordinator │
//!                 └──────┬──────┘
//!        spawn           │           join
//!   ┌──────────┬─────────┼─────────┬──────────┐
//!   │          │         │         │          │
//! ┌─▼──────┐ ┌─▼──────┐  …       ┌─▼──────┐ ┌─▼──────┐
//! │Worker 0│ │Worker 1│          │Worker N│ │ Clock  │
//! └─┬──────┘ └─┬──────┘          └─┬──────┘ └────────┘
//!   │          │                   │
//!   └── one connection, one codec pair, sequential pings ──┘
//! ```
//!
//! Each worker owns its connection end to end: open, ping in a loop,
//! close. There is no shared mutable state between workers, and the
//! coordinator only learns of a worker again when it joins.

pub mod bench;
pub mod config;
pub mod metrics;
pub mod worker;

pub use config::{Args, RunConfig};
pub use metrics::RunMetrics;
