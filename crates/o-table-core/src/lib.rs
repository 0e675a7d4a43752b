//! Core systems for o-table.
//!
//! This crate provides the infrastructure the table component is built on:
//!
//! - **Signals**: synchronous notifications, including cancellable ones
//! - **Frame scheduling**: coalescing deferred render requests
//! - **Errors**: the configuration error taxonomy shared by all table operations
//! - **Logging**: tracing targets, span names and convenience macros
//!
//! # Example
//!
//! ```
//! use o_table_core::{FrameQueue, Signal};
//!
//! let sorted = Signal::<(usize, &'static str)>::new();
//! sorted.connect(|(column, order)| println!("column {column} sorted {order}"));
//! sorted.emit((0, "ascending"));
//!
//! let mut frames = FrameQueue::new();
//! frames.schedule(vec![2, 0, 1]);
//! frames.schedule(vec![0, 1, 2]);
//! frames.flush(|order| assert_eq!(order, vec![0, 1, 2]));
//! ```

pub mod error;
pub mod logging;
pub mod signal;
pub mod task;

pub use error::{Error, Result};
pub use logging::PerfSpan;
pub use signal::{Cancelled, ConnectionId, Proceed, Signal, VetoSignal};
pub use task::{FrameId, FrameQueue};
