#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

pub mod donor;
pub mod expense;
pub mod kas;
mod ledger;
pub mod mustahiq;
mod op;
pub mod primitives;
pub mod qurban;
pub mod report;
pub mod zakat;

pub use ledger::*;
pub use op::DbOp;

pub mod query {
    #[derive(Debug)]
    pub struct PaginatedQueryArgs<T: std::fmt::Debug> {
        pub first: usize,
        pub after: Option<T>,
    }

    pub struct PaginatedQueryRet<T, C> {
        pub entities: Vec<T>,
        pub has_next_page: bool,
        pub end_cursor: Option<C>,
    }
}

pub use primitives::*;
