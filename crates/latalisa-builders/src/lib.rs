//! Fluent builders for comparators and standard collections.
//!
//! Every builder here follows one shape: configuration is accumulated
//! through chained calls, and a single terminal [`Builder::build`] produces
//! an independent artifact from the current state.
//!
//! - [`ComparatorBuilder`]: chains key-based orderings into one
//!   [`Comparator`] with fixed tie and absent-value handling
//! - [`ListBuilder`], [`MapBuilder`], [`SetBuilder`]: stage elements and
//!   snapshot them into `Vec`, `HashMap`, `HashSet`
//! - [`LazyList`]: a read-only list computed on first access
//!
//! # Quick Start
//!
//! ```rust
//! use latalisa_builders::{Builder, ComparatorBuilder, Dir, ListBuilder};
//!
//! struct Task {
//!     name: String,
//!     priority: i32,
//! }
//!
//! let tasks = ListBuilder::new()
//!     .add(Task { name: "Write docs".into(), priority: 3 })
//!     .add(Task { name: "Fix bug".into(), priority: 5 })
//!     .add(Task { name: "Deploy".into(), priority: 5 });
//!
//! let by_priority_then_name = ComparatorBuilder::new()
//!     .add_dir(|t: &Task| t.priority, Dir::Desc)
//!     .add_ref(|t: &Task| t.name.as_str())
//!     .build();
//!
//! let mut sorted: Vec<Task> = tasks.into_vec();
//! by_priority_then_name.sort(&mut sorted);
//! assert_eq!(sorted[0].name, "Deploy");
//! assert_eq!(sorted[2].name, "Write docs");
//! ```

mod builder;
mod comparator;
mod error;
mod list;
mod map;
mod set;

pub use builder::Builder;
pub use comparator::{Comparator, ComparatorBuilder, Dir};
pub use error::{BuilderError, Result};
pub use list::{merge_lists, LazyList, ListBuilder};
pub use map::MapBuilder;
pub use set::{merge_sets, SetBuilder};
