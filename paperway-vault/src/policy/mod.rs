//! Access decision engine — pure permit/deny/filter computations
//!
//! Every decision is a pure function of `(actor, document-or-criteria)`;
//! no call depends on previous calls and nothing here performs I/O. The
//! surrounding actors run these functions once per operation and hand any
//! returned [`QueryCriteria`] to the store for execution.

pub mod criteria;
pub mod decision;

pub use criteria::{build_list_filter, build_search_filter, DocClause, ListScope, QueryCriteria};
pub use decision::{can_delete, can_read, can_write, ReadGrant};
