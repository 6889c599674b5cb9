//! Rotation proposal core: eligibility, greedy selection and proposal
//! assembly. Everything here is synchronous and free of I/O.

pub mod eligibility;
pub mod policy;
pub mod proposal;
pub mod selector;
pub mod summary;

pub use eligibility::*;
pub use policy::*;
pub use proposal::*;
pub use selector::*;
pub use summary::*;
