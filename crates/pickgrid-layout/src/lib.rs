#![forbid(unsafe_code)]

//! Column width allocation for pickgrid.
//!
//! Given records, fields and a container, [`allocate`] produces a
//! [`WidthTemplate`]: one whole-pixel width per field, in field order.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use pickgrid_core::{Field, Record};
//! use pickgrid_layout::{Container, LayoutConfig, LayoutEngine, allocate};
//! use pickgrid_text::FontSpec;
//!
//! let config = LayoutConfig::default()
//!     .with_cell_padding(0.0)
//!     .with_column_margin(0.0);
//! let mut engine = LayoutEngine::new(config, |t: &str, _: &FontSpec| t.len() as f64);
//!
//! let fields = vec![Field::new("id", "Id"), Field::new("name", "Name").truncatable()];
//! let records = vec![Arc::new(
//!     Record::new("A").with("id", "x".repeat(40)).with("name", "y".repeat(300)),
//! )];
//! let container = Container::new("menu", 200.0);
//!
//! let template = allocate(&records, &fields, &container, false, true, &mut engine).unwrap();
//! assert_eq!(template.widths(), &[40, 160]);
//! assert_eq!(template.total(), 200);
//! ```

pub mod allocate;
pub mod cache;
pub mod config;
pub mod error;
pub mod solve;
pub mod template;

pub use allocate::{Container, LayoutEngine, allocate};
pub use cache::LayoutCache;
pub use config::LayoutConfig;
pub use error::LayoutError;
pub use solve::{ColumnDemand, Resolution, solve, solve_with_resolution};
pub use template::WidthTemplate;
