//! The journal's transaction record, its enumerations, and filtering.

mod core;
mod filter;

pub use core::{
    AMOUNT_EPSILON, DocType, PaymentMethod, PaymentStatus, Transaction, TransactionBuilder,
    TransactionId,
};
pub use filter::TransactionFilter;
