//! ResPets roster synchronization: duplicate-suffix allocation and the
//! three-pass alta/baja workflow.

pub mod suffix;
pub mod sync;

pub use suffix::{EmailAllocator, RutSuffixer};
pub use sync::{plan, Addition, MemberRow, RosterPlan, UserRow};
