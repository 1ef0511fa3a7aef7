#![forbid(unsafe_code)]

//! Change tracking and update scheduling for record pickers.
//!
//! The host feeds a [`Picker`] props snapshots and user events. Each event
//! is turned into a change-set ([`diff`]), queued by the
//! [`UpdateScheduler`], and applied to the option list either immediately
//! or on the next idle frame. Every call returns an [`Update`]: the
//! [`Frame`] to render plus the [`Effect`]s the host must carry out.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pickgrid_core::{Field, Record};
//! use pickgrid_runtime::{Effect, Engine, Picker, PickerConfig, WidgetProps};
//! use pickgrid_search::SearchProfile;
//!
//! let fields = vec![Field::new("ticker", "Ticker"), Field::new("name", "Name")];
//! let mut engine = Engine::default();
//! let mut picker = Picker::new("bonds", fields.clone(), SearchProfile::for_fields(&fields), PickerConfig::default());
//!
//! let records = vec![
//!     Arc::new(Record::new("1").with("ticker", "AAPL").with("name", "Apple")),
//!     Arc::new(Record::new("2").with("ticker", "MSFT").with("name", "Microsoft")),
//! ];
//! picker.mount(WidgetProps::new(records), &mut engine);
//! picker.on_open(&mut engine);
//!
//! let update = picker.on_query("micro", &mut engine);
//! assert_eq!(update.frame.options.len(), 1);
//! assert_eq!(update.frame.options[0].key, "2");
//! assert!(update.effects.contains(&Effect::QueryChanged("micro".into())));
//! ```

pub mod change;
pub mod config;
pub mod diff;
pub mod engine;
pub mod option;
pub mod picker;
pub mod props;
pub mod scheduler;
pub mod sort;
pub mod transform;

pub use change::{ChangeEntry, ChangeKind, ChangeValue, DeltaFn, NormalizeFn, Policy, PolicyMap, Timing};
pub use config::PickerConfig;
pub use diff::{Snapshot, diff};
pub use engine::Engine;
pub use option::{PickOption, REFINE_FILTER_KEY, RowCell};
pub use picker::{Chrome, Effect, Frame, Picker, Update};
pub use props::{WidgetProps, WidgetState, props_policies, state_policies};
pub use scheduler::{Phase, SchedulerStats, UpdateScheduler};
pub use sort::SortHeader;
pub use transform::{TransformContext, TransformFn, apply_transforms, transform_for};
