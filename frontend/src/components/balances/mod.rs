pub mod balances_table;
pub mod rates;

pub use balances_table::BalancesTable;
