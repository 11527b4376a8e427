use std::sync::Arc;

use fintrack_connect::{
    LogMailer, OcrClient, PlaidClient, PlaidEnvironment, RazorpayClient, ResendMailer,
};
use fintrack_core::{
    accounts::{AccountService, AccountServiceTrait},
    banking::{BankDataProviderTrait, BankingService, BankingServiceTrait},
    categories::{CategoryService, CategoryServiceTrait},
    imports::{ImportService, ImportServiceTrait, ReceiptScannerTrait},
    notifications::EmailSenderTrait,
    premium::{PaymentGatewayTrait, PremiumService, PremiumServiceTrait},
    summary::{SummaryService, SummaryServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    unconfigured::Unconfigured,
    users::{UserService, UserServiceTrait},
};
use fintrack_storage_sqlite::{
    db, AccountRepository, AuthTokenRepository, CategoryRepository, PremiumRepository,
    TransactionRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{auth::JwtManager, config::Config};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub category_service: Arc<dyn CategoryServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub summary_service: Arc<dyn SummaryServiceTrait>,
    pub import_service: Arc<dyn ImportServiceTrait>,
    pub banking_service: Arc<dyn BankingServiceTrait>,
    pub premium_service: Arc<dyn PremiumServiceTrait>,
    pub jwt: Arc<JwtManager>,
}

/// External services the application talks to.
pub struct Collaborators {
    pub bank_provider: Arc<dyn BankDataProviderTrait>,
    pub payment_gateway: Arc<dyn PaymentGatewayTrait>,
    pub email_sender: Arc<dyn EmailSenderTrait>,
    pub receipt_scanner: Arc<dyn ReceiptScannerTrait>,
}

impl Collaborators {
    /// Builds HTTP clients for every configured service. Services without
    /// credentials fail their calls with an external-dependency error.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let bank_provider: Arc<dyn BankDataProviderTrait> = match &config.plaid {
            Some(plaid) => {
                let environment = PlaidEnvironment::parse(&plaid.environment)?;
                tracing::info!("Plaid client enabled ({})", plaid.environment);
                Arc::new(PlaidClient::new(
                    &plaid.client_id,
                    &plaid.secret,
                    environment,
                )?)
            }
            None => Arc::new(Unconfigured::new("Bank data provider")),
        };

        let payment_gateway: Arc<dyn PaymentGatewayTrait> = match &config.razorpay {
            Some(razorpay) => Arc::new(RazorpayClient::new(
                &razorpay.key_id,
                &razorpay.key_secret,
            )?),
            None => Arc::new(Unconfigured::new("Payment gateway")),
        };

        let email_sender: Arc<dyn EmailSenderTrait> = match &config.mail {
            Some(mail) => Arc::new(ResendMailer::new(&mail.api_key, &mail.from)?),
            None => {
                tracing::warn!("RESEND_API_KEY not set; outgoing email is only logged");
                Arc::new(LogMailer)
            }
        };

        let receipt_scanner: Arc<dyn ReceiptScannerTrait> = match &config.ocr_url {
            Some(url) => Arc::new(OcrClient::new(url)?),
            None => Arc::new(Unconfigured::new("Receipt scanner")),
        };

        Ok(Self {
            bank_provider,
            payment_gateway,
            email_sender,
            receipt_scanner,
        })
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("FT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let collaborators = Collaborators::from_config(config)?;
    build_state_with(config, collaborators).await
}

/// Opens the database, runs migrations and wires every service on top of
/// the given collaborators.
pub async fn build_state_with(
    config: &Config,
    collaborators: Collaborators,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.clone());

    let user_repo = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let token_repo = Arc::new(AuthTokenRepository::new(pool.clone(), writer.clone()));
    let account_repo = Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let category_repo = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let transaction_repo = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let premium_repo = Arc::new(PremiumRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        token_repo,
        collaborators.email_sender,
        config.frontend_url.clone(),
    ));
    let account_service = Arc::new(AccountService::new(account_repo.clone()));
    let category_service = Arc::new(CategoryService::new(category_repo.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repo.clone(),
        account_repo.clone(),
        category_repo.clone(),
    ));
    let summary_service = Arc::new(SummaryService::new(
        user_repo,
        transaction_repo.clone(),
        category_repo,
    ));
    let premium_service = Arc::new(PremiumService::new(
        premium_repo,
        collaborators.payment_gateway,
        config.premium_price,
    ));
    let banking_service = Arc::new(BankingService::new(
        collaborators.bank_provider,
        account_repo.clone(),
        transaction_repo.clone(),
        premium_service.clone(),
    ));
    let import_service = Arc::new(ImportService::new(
        account_repo,
        transaction_repo,
        premium_service.clone(),
        collaborators.receipt_scanner,
    ));

    Ok(Arc::new(AppState {
        user_service,
        account_service,
        category_service,
        transaction_service,
        summary_service,
        import_service,
        banking_service,
        premium_service,
        jwt: Arc::new(JwtManager::new(
            &config.jwt_secret,
            config.access_token_ttl,
        )),
    }))
}
