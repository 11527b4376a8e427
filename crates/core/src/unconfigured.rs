//! Stand-in for an external collaborator that has no credentials configured.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::banking::{
    BankAccount, BankDataProviderTrait, BankLinkCredentials, BankTransaction, LinkToken,
};
use crate::errors::{Error, Result};
use crate::imports::{ReceiptFields, ReceiptImage, ReceiptScannerTrait};
use crate::premium::{PaymentGatewayTrait, PaymentOrder, PaymentOrderRequest};

/// Fails every call with an external-dependency error naming the service.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured {
    service: &'static str,
}

impl Unconfigured {
    pub const fn new(service: &'static str) -> Self {
        Self { service }
    }

    fn error(&self) -> Error {
        Error::ExternalService(format!("{} is not configured", self.service))
    }
}

#[async_trait]
impl BankDataProviderTrait for Unconfigured {
    async fn create_link_token(&self, _user_id: &str, _client_name: &str) -> Result<LinkToken> {
        Err(self.error())
    }

    async fn exchange_public_token(&self, _public_token: &str) -> Result<BankLinkCredentials> {
        Err(self.error())
    }

    async fn list_accounts(&self, _access_token: &str) -> Result<Vec<BankAccount>> {
        Err(self.error())
    }

    async fn list_transactions(
        &self,
        _access_token: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<BankTransaction>> {
        Err(self.error())
    }
}

#[async_trait]
impl PaymentGatewayTrait for Unconfigured {
    async fn create_order(&self, _request: PaymentOrderRequest) -> Result<PaymentOrder> {
        Err(self.error())
    }

    fn verify_payment_signature(
        &self,
        _order_id: &str,
        _payment_id: &str,
        _signature: &str,
    ) -> Result<bool> {
        Err(self.error())
    }
}

#[async_trait]
impl ReceiptScannerTrait for Unconfigured {
    async fn scan(&self, _image: ReceiptImage) -> Result<ReceiptFields> {
        Err(self.error())
    }
}
