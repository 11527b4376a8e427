//! Fintrack Connect - clients for the services Fintrack talks to over HTTP.
//!
//! Each client implements a collaborator trait from `fintrack-core`:
//! - [`PlaidClient`]: bank aggregator (`BankDataProviderTrait`)
//! - [`RazorpayClient`]: payment gateway (`PaymentGatewayTrait`)
//! - [`ResendMailer`] / [`LogMailer`]: transactional email (`EmailSenderTrait`)
//! - [`OcrClient`]: receipt text extraction (`ReceiptScannerTrait`)

mod http;
pub mod mailer;
pub mod ocr;
pub mod plaid;
pub mod razorpay;

pub use mailer::{LogMailer, ResendMailer};
pub use ocr::OcrClient;
pub use plaid::{PlaidClient, PlaidEnvironment};
pub use razorpay::RazorpayClient;
