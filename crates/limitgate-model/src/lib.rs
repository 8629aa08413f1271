//! Limitgate Model: the declarative data model for limit-policy convergence
//!
//! This crate defines the objects the rest of the system converges over:
//!
//! - **`Policy`**: the cluster-scoped desired state, an ordered list of
//!   [`LimitRule`]s plus namespace include/exclude filters
//! - **`Quantity`**: an exact, integer-scaled resource quantity. Parsing is
//!   fallible and never rounds; there is no floating point anywhere in the
//!   limit pipeline
//! - **`EnforcementObject`**: the per-namespace projection of a policy,
//!   identified by a fixed well-known name and an ownership label
//!
//! Everything here is pure data with serde wire representations matching the
//! external schema (`includeNamespaces`, `defaultRequest`, ...). All logic
//! that reads or writes these objects lives in `limitgate-engine` and
//! `limitgate-store`.

pub mod enforcement;
pub mod limits;
pub mod policy;
pub mod quantity;

pub use enforcement::{
    EnforcementObject, ENFORCEMENT_NAME, OWNER_LABEL_KEY, OWNER_LABEL_VALUE,
};
pub use limits::{LimitKind, LimitRule, ResolvedLimit};
pub use policy::{Policy, PolicyStatus};
pub use quantity::{Quantity, QuantityError};
