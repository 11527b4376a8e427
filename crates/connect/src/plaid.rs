//! Plaid bank aggregator client.
//!
//! Covers the four calls the banking service needs: link token creation,
//! public token exchange, account listing and dated transaction listing.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fintrack_core::banking::{
    BankAccount, BankBalances, BankDataProviderTrait, BankLinkCredentials, BankTransaction,
    LinkToken,
};
use fintrack_core::errors::{Error, Result};

use crate::http::{build_client, join_url, parse_response, request_failed};

const SERVICE: &str = "Plaid";

const PLAID_SANDBOX_BASE: &str = "https://sandbox.plaid.com";
const PLAID_DEVELOPMENT_BASE: &str = "https://development.plaid.com";
const PLAID_PRODUCTION_BASE: &str = "https://production.plaid.com";

/// Page size for `/transactions/get`; Plaid caps it at 500.
const TRANSACTIONS_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => PLAID_SANDBOX_BASE,
            Self::Development => PLAID_DEVELOPMENT_BASE,
            Self::Production => PLAID_PRODUCTION_BASE,
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(Error::invalid(format!(
                "Invalid Plaid environment: {other}. Expected sandbox, development, or production."
            ))),
        }
    }
}

// Wire types (Plaid speaks snake_case)

#[derive(Serialize)]
struct LinkTokenUser<'a> {
    client_user_id: &'a str,
}

#[derive(Serialize)]
struct LinkTokenRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    user: LinkTokenUser<'a>,
    client_name: &'a str,
    products: [&'a str; 1],
    language: &'a str,
    country_codes: [&'a str; 1],
}

#[derive(Deserialize)]
struct LinkTokenResponse {
    link_token: String,
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    public_token: &'a str,
}

#[derive(Deserialize)]
struct ExchangeResponse {
    access_token: String,
    item_id: String,
}

#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    access_token: &'a str,
}

#[derive(Deserialize)]
struct AccountsResponse {
    #[serde(default)]
    accounts: Vec<PlaidAccount>,
}

#[derive(Deserialize)]
struct PlaidAccount {
    account_id: String,
    name: String,
    #[serde(default)]
    official_name: Option<String>,
    #[serde(default)]
    mask: Option<String>,
    #[serde(default, rename = "type")]
    account_type: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    balances: PlaidBalances,
}

#[derive(Deserialize, Default)]
struct PlaidBalances {
    #[serde(default)]
    available: Option<Decimal>,
    #[serde(default)]
    current: Option<Decimal>,
    #[serde(default)]
    iso_currency_code: Option<String>,
}

impl From<PlaidAccount> for BankAccount {
    fn from(account: PlaidAccount) -> Self {
        Self {
            account_id: account.account_id,
            name: account.name,
            official_name: account.official_name,
            mask: account.mask,
            account_type: account.account_type,
            subtype: account.subtype,
            balances: BankBalances {
                available: account.balances.available,
                current: account.balances.current,
                iso_currency_code: account.balances.iso_currency_code,
            },
        }
    }
}

#[derive(Serialize)]
struct TransactionsOptions {
    count: usize,
    offset: usize,
}

#[derive(Serialize)]
struct TransactionsRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    access_token: &'a str,
    start_date: String,
    end_date: String,
    options: TransactionsOptions,
}

#[derive(Deserialize)]
struct TransactionsResponse {
    #[serde(default)]
    transactions: Vec<PlaidTransaction>,
    #[serde(default)]
    total_transactions: usize,
}

#[derive(Deserialize)]
struct PlaidTransaction {
    transaction_id: String,
    amount: Decimal,
    date: NaiveDate,
    #[serde(default)]
    name: Option<String>,
}

impl From<PlaidTransaction> for BankTransaction {
    fn from(tx: PlaidTransaction) -> Self {
        Self {
            transaction_id: tx.transaction_id,
            amount: tx.amount,
            date: tx.date,
            name: tx.name,
        }
    }
}

/// Plaid API client authenticated with a client id and secret.
#[derive(Debug, Clone)]
pub struct PlaidClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl PlaidClient {
    pub fn new(client_id: &str, secret: &str, environment: PlaidEnvironment) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: environment.base_url().to_string(),
            client_id: client_id.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Override API base URL (useful for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        let url = join_url(&self.base_url, path);
        debug!("[Plaid] POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| request_failed(SERVICE, e))?;

        parse_response(SERVICE, response).await
    }
}

#[async_trait]
impl BankDataProviderTrait for PlaidClient {
    async fn create_link_token(&self, user_id: &str, client_name: &str) -> Result<LinkToken> {
        let response: LinkTokenResponse = self
            .post(
                "/link/token/create",
                &LinkTokenRequest {
                    client_id: &self.client_id,
                    secret: &self.secret,
                    user: LinkTokenUser {
                        client_user_id: user_id,
                    },
                    client_name,
                    products: ["auth"],
                    language: "en",
                    country_codes: ["US"],
                },
            )
            .await?;
        Ok(LinkToken {
            link_token: response.link_token,
        })
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<BankLinkCredentials> {
        let response: ExchangeResponse = self
            .post(
                "/item/public_token/exchange",
                &ExchangeRequest {
                    client_id: &self.client_id,
                    secret: &self.secret,
                    public_token,
                },
            )
            .await?;
        info!("[Plaid] Exchanged public token for item {}", response.item_id);
        Ok(BankLinkCredentials {
            access_token: response.access_token,
            item_id: response.item_id,
        })
    }

    async fn list_accounts(&self, access_token: &str) -> Result<Vec<BankAccount>> {
        let response: AccountsResponse = self
            .post(
                "/accounts/get",
                &AccessTokenRequest {
                    client_id: &self.client_id,
                    secret: &self.secret,
                    access_token,
                },
            )
            .await?;
        Ok(response.accounts.into_iter().map(BankAccount::from).collect())
    }

    async fn list_transactions(
        &self,
        access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BankTransaction>> {
        let mut collected: Vec<BankTransaction> = Vec::new();

        loop {
            let page: TransactionsResponse = self
                .post(
                    "/transactions/get",
                    &TransactionsRequest {
                        client_id: &self.client_id,
                        secret: &self.secret,
                        access_token,
                        start_date: start.format("%Y-%m-%d").to_string(),
                        end_date: end.format("%Y-%m-%d").to_string(),
                        options: TransactionsOptions {
                            count: TRANSACTIONS_PAGE_SIZE,
                            offset: collected.len(),
                        },
                    },
                )
                .await?;

            let received = page.transactions.len();
            collected.extend(page.transactions.into_iter().map(BankTransaction::from));

            if received == 0 || collected.len() >= page.total_transactions {
                break;
            }
        }

        debug!(
            "[Plaid] Fetched {} transactions between {} and {}",
            collected.len(),
            start,
            end
        );
        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PlaidClient {
        PlaidClient::new("client-1", "secret-1", PlaidEnvironment::Sandbox)
            .unwrap()
            .with_base_url(server.uri())
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn environment_parsing_is_case_insensitive() {
        assert_eq!(
            PlaidEnvironment::parse("Sandbox").unwrap(),
            PlaidEnvironment::Sandbox
        );
        assert!(PlaidEnvironment::parse("staging").is_err());
    }

    #[tokio::test]
    async fn link_token_request_carries_products_and_country() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/link/token/create"))
            .and(body_partial_json(serde_json::json!({
                "client_id": "client-1",
                "user": {"client_user_id": "u1"},
                "client_name": "Ann",
                "products": ["auth"],
                "language": "en",
                "country_codes": ["US"]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"link_token": "link-sandbox-123"})),
            )
            .mount(&server)
            .await;

        let token = client(&server).create_link_token("u1", "Ann").await.unwrap();
        assert_eq!(token.link_token, "link-sandbox-123");
    }

    #[tokio::test]
    async fn exchange_errors_surface_as_external_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/item/public_token/exchange"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error_code": "INVALID_PUBLIC_TOKEN"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .exchange_public_token("public-bad")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ExternalService(_)));
        assert!(err.to_string().contains("INVALID_PUBLIC_TOKEN"));
    }

    #[tokio::test]
    async fn accounts_map_type_and_balances() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accounts": [{
                    "account_id": "acc_1",
                    "name": "Plaid Checking",
                    "official_name": "Plaid Gold Standard 0% Interest Checking",
                    "mask": "0000",
                    "type": "depository",
                    "subtype": "checking",
                    "balances": {"available": 100, "current": 110.5, "iso_currency_code": "USD"}
                }]
            })))
            .mount(&server)
            .await;

        let accounts = client(&server).list_accounts("access-1").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_type.as_deref(), Some("depository"));
        assert_eq!(accounts[0].balances.current, Some(dec!(110.5)));
    }

    #[tokio::test]
    async fn transactions_are_paged_until_total() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transactions/get"))
            .and(body_partial_json(serde_json::json!({
                "start_date": "2024-06-01",
                "end_date": "2024-06-30",
                "options": {"offset": 0}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transactions": [
                    {"transaction_id": "t1", "amount": 6.33, "date": "2024-06-12", "name": "Uber"}
                ],
                "total_transactions": 2
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions/get"))
            .and(body_partial_json(serde_json::json!({"options": {"offset": 1}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transactions": [
                    {"transaction_id": "t2", "amount": -500, "date": "2024-06-13", "name": null}
                ],
                "total_transactions": 2
            })))
            .mount(&server)
            .await;

        let transactions = client(&server)
            .list_transactions("access-1", d(2024, 6, 1), d(2024, 6, 30))
            .await
            .unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].amount, dec!(6.33));
        assert_eq!(transactions[1].name, None);
    }
}
