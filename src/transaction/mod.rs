//! Transactions: the model and validation rules, the weekly transactions
//! page, and the endpoints for recording and deleting transactions.

mod create_endpoint;
mod delete_endpoint;
mod model;
mod transactions_page;

pub use create_endpoint::{TransactionForm, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use model::{
    Category, HR_RATES, Transaction, TransactionDraft, TransactionId, ValidTransaction,
    hourly_rate, round_to_cents,
};
pub use transactions_page::get_transactions_page;
