//! Commission context - Rates and ledger transactions.

mod rate;
mod transaction;

pub use rate::{CommissionRate, CommissionType};
pub use transaction::{CommissionTransaction, TransactionStatus};
