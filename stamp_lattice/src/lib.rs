//! Abstract value lattice for an optimizing compiler IR.
//!
//! A *stamp* approximates the set of concrete runtime values a computation may
//! produce. Stamps form a lattice: `meet` merges facts at control-flow joins,
//! `join` intersects independent facts about the same value. The operator
//! tables in [`ops`] describe how arithmetic and conversions act on both
//! concrete [`Constant`]s and abstract [`Stamp`]s.
//!
//! # Modules
//!
//! - [`stamp`]: integer, float, object, void and illegal stamps plus [`StampFactory`]
//! - [`ops`]: [`ArithmeticOpTable`] and the typed operator descriptors
//! - [`types`]: nominal-type provider seam, [`ClassTable`] and [`CheckedType`]
//! - [`diagnostics`]: opt-in collector for precision-loss events
//! - [`config`]: TOML configuration

// Library code reports through diagnostics, never through stderr.
#![deny(clippy::print_stderr)]

pub mod bits;
pub mod config;
pub mod constant;
pub mod diagnostics;
pub mod error;
pub mod kind;
pub mod ops;
pub mod stamp;
pub mod types;

pub use config::StampConfig;
pub use constant::{Constant, ObjectRef};
pub use error::{StampError, StampResult};
pub use kind::ValueKind;
pub use ops::{ArithmeticOpTable, OpDescriptor, OpSymbol};
pub use stamp::{FloatStamp, IntegerStamp, ObjectStamp, Stamp, StampFactory};
pub use types::checked::{Assumption, AssumptionLedger, AssumptionSet, CheckedType};
pub use types::class_table::ClassTable;
pub use types::{NominalType, TypeId, TypeProvider};
