//! Banking module - bank aggregator seam, account linking and transaction sync.

mod banking_model;
mod banking_service;
mod banking_traits;


pub use banking_model::{
    BankAccount, BankBalances, BankLinkCredentials, BankSyncResult, BankTransaction,
    ConnectBankInput, LinkToken,
};
pub use banking_service::BankingService;
pub use banking_traits::{BankDataProviderTrait, BankingServiceTrait};
