//! `ledgerdash-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod numeric;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, PartyId, ProductId};
pub use numeric::{coerce_non_negative, percent_of};
pub use value_object::ValueObject;
