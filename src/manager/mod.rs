//! Control-side ownership of the case list
//!
//! - [`CaseList`]: ordered, duplicate-free case numbers
//! - [`ListManager`]: load/add/delete with persist-then-notify, search and summary requests
//! - [`UpdateDispatcher`]: one in-flight page message at a time, stale updates dropped

pub mod case_list;
pub mod dispatch;
pub mod list_manager;

pub use case_list::CaseList;
pub use dispatch::UpdateDispatcher;
pub use list_manager::{ListManager, ManagerState};
