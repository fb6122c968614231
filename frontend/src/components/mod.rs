pub mod balances;
pub mod dialog;
