//! # forma-resolve — Path Resolution and Dispatch
//!
//! Turns a construction descriptor into a live value:
//!
//! ```yaml
//! target: heroes.Weapon
//! role: tank
//! ```
//!
//! ## Pieces
//!
//! - [`namespace`]: Modules, callables and the [`ModuleRegistry`] importer
//!   populated at startup.
//! - [`resolve`]: The [`Resolver`] capability, with a dotted-path strategy
//!   over an importer and a flat keyed strategy.
//! - [`descriptor`]: The [`ConstructionDescriptor`] format and its loader.
//! - [`dispatch`]: The [`Dispatcher`]: merge arguments, then validate
//!   through the target's union or call it directly.
//!
//! ## Crate Policy
//!
//! - Synchronous and stateless per call. The registry is written once and
//!   then only read, so a dispatcher can be shared across threads.
//! - Every failure is an [`InitError`] returned to the immediate caller.
//!   Nothing is retried.

pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod namespace;
pub mod resolve;

pub use descriptor::{ConstructionDescriptor, DescriptorKeys, DescriptorLoadError, POSITIONAL_KEY, TARGET_KEY};
pub use dispatch::Dispatcher;
pub use error::{ImportError, InitError};
pub use namespace::{Callable, DirectFn, Importer, Invoke, Item, Module, ModuleRegistry};
pub use resolve::{split_path, DottedPathResolver, KeyedResolver, Resolved, Resolver};
