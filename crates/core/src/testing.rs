//! In-memory repositories and collaborators shared by the service tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::accounts::{Account, AccountRepositoryTrait, AccountUpdate, NewAccount};
use crate::categories::{Category, CategoryRepositoryTrait, CategoryUpdate, NewCategory};
use crate::errors::{DatabaseError, Error, Result};
use crate::notifications::{EmailMessage, EmailSenderTrait};
use crate::premium::{NewOrder, Order, Premium, PremiumRepositoryTrait};
use crate::transactions::{
    NewTransaction, Transaction, TransactionDetails, TransactionFilter,
    TransactionRepositoryTrait,
};
use crate::users::{
    AuthToken, AuthTokenRepositoryTrait, NewAuthToken, NewUser, TokenKind, User,
    UserRepositoryTrait, UserUpdate,
};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Default)]
pub(crate) struct InMemoryStore {
    pub users: Mutex<Vec<User>>,
    pub tokens: Mutex<Vec<AuthToken>>,
    pub confirmations: Mutex<HashSet<String>>,
    pub accounts: Mutex<Vec<Account>>,
    pub categories: Mutex<Vec<Category>>,
    pub transactions: Mutex<Vec<Transaction>>,
    pub premiums: Mutex<Vec<Premium>>,
    pub orders: Mutex<Vec<Order>>,
}

impl InMemoryStore {
    pub fn add_user(&self, email: &str, password_hash: Option<String>, verified: bool) -> User {
        let user = User {
            id: new_id(),
            name: Some("Test User".to_string()),
            email: email.to_string(),
            email_verified: verified.then(now),
            password_hash,
            is_two_factor_enabled: false,
            created_at: now(),
            updated_at: now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn user(&self, user_id: &str) -> User {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .unwrap()
    }

    pub fn add_account(&self, user_id: &str, name: &str, plaid_id: Option<&str>) -> Account {
        let account = Account {
            id: new_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            plaid_id: plaid_id.map(String::from),
            created_at: now(),
            updated_at: now(),
        };
        self.accounts.lock().unwrap().push(account.clone());
        account
    }

    pub fn add_category(&self, user_id: &str, name: &str) -> Category {
        let category = Category {
            id: new_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            created_at: now(),
            updated_at: now(),
        };
        self.categories.lock().unwrap().push(category.clone());
        category
    }

    pub fn add_transaction(
        &self,
        account_id: &str,
        category_id: Option<&str>,
        amount: i64,
        date: NaiveDate,
    ) -> Transaction {
        let transaction = Transaction {
            id: new_id(),
            financial_account_id: account_id.to_string(),
            category_id: category_id.map(String::from),
            amount,
            date,
            payee: "Payee".to_string(),
            notes: None,
            created_at: now(),
            updated_at: now(),
        };
        self.transactions.lock().unwrap().push(transaction.clone());
        transaction
    }

    pub fn grant_premium(&self, user_id: &str) {
        self.premiums.lock().unwrap().push(Premium {
            id: new_id(),
            user_id: user_id.to_string(),
            active: true,
            created_at: now(),
            updated_at: now(),
        });
    }

    pub fn transactions_of(&self, account_id: &str) -> Vec<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.financial_account_id == account_id)
            .cloned()
            .collect()
    }

    fn owned_account(&self, user_id: &str, account_id: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == account_id && a.user_id == user_id)
            .cloned()
    }

    fn visible_transactions(&self, user_id: &str) -> Vec<(Transaction, Account)> {
        let accounts = self.accounts.lock().unwrap();
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .filter_map(|t| {
                accounts
                    .iter()
                    .find(|a| a.id == t.financial_account_id && a.user_id == user_id)
                    .map(|a| (t.clone(), a.clone()))
            })
            .collect()
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryStore {
    fn get_by_id(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation("users.email".into()).into());
        }
        let user = User {
            id: new_id(),
            name: new_user.name,
            email: new_user.email,
            email_verified: None,
            password_hash: new_user.password_hash,
            is_two_factor_enabled: false,
            created_at: now(),
            updated_at: now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, update: UserUpdate) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == update.id)
            .ok_or_else(|| Error::NotFound("User not found".into()))?;
        if let Some(name) = update.name {
            user.name = Some(name);
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(verified) = update.email_verified {
            user.email_verified = Some(verified);
        }
        if let Some(hash) = update.password_hash {
            user.password_hash = Some(hash);
        }
        if let Some(enabled) = update.is_two_factor_enabled {
            user.is_two_factor_enabled = enabled;
        }
        user.updated_at = now();
        Ok(user.clone())
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != user_id);
        Ok(before - users.len())
    }
}

#[async_trait]
impl AuthTokenRepositoryTrait for InMemoryStore {
    async fn replace(&self, new_token: NewAuthToken) -> Result<AuthToken> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.retain(|t| !(t.kind == new_token.kind && t.email == new_token.email));
        let token = AuthToken {
            id: new_id(),
            kind: new_token.kind,
            email: new_token.email,
            token: new_token.token,
            expires_at: new_token.expires_at,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    fn find_by_token(&self, kind: TokenKind, token: &str) -> Result<Option<AuthToken>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.kind == kind && t.token == token)
            .cloned())
    }

    fn find_by_email(&self, kind: TokenKind, email: &str) -> Result<Option<AuthToken>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.kind == kind && t.email == email)
            .cloned())
    }

    async fn delete(&self, token_id: &str) -> Result<()> {
        self.tokens.lock().unwrap().retain(|t| t.id != token_id);
        Ok(())
    }

    async fn upsert_two_factor_confirmation(&self, user_id: &str) -> Result<()> {
        self.confirmations
            .lock()
            .unwrap()
            .insert(user_id.to_string());
        Ok(())
    }

    async fn take_two_factor_confirmation(&self, user_id: &str) -> Result<bool> {
        Ok(self.confirmations.lock().unwrap().remove(user_id))
    }
}

#[async_trait]
impl AccountRepositoryTrait for InMemoryStore {
    async fn create(&self, user_id: &str, new_account: NewAccount) -> Result<Account> {
        Ok(self.add_account(user_id, &new_account.name, new_account.plaid_id.as_deref()))
    }

    async fn update(
        &self,
        user_id: &str,
        account_id: &str,
        account_update: AccountUpdate,
    ) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == account_id && a.user_id == user_id)
            .ok_or_else(|| Error::NotFound("Account not found".into()))?;
        account.name = account_update.name;
        Ok(account.clone())
    }

    async fn set_plaid_id(
        &self,
        user_id: &str,
        account_id: &str,
        plaid_id: String,
    ) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == account_id && a.user_id == user_id)
            .ok_or_else(|| Error::NotFound("Account not found".into()))?;
        account.plaid_id = Some(plaid_id);
        Ok(account.clone())
    }

    async fn delete_many(&self, user_id: &str, account_ids: Vec<String>) -> Result<usize> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| !(a.user_id == user_id && account_ids.contains(&a.id)));
        Ok(before - accounts.len())
    }

    fn get_by_id(&self, user_id: &str, account_id: &str) -> Result<Option<Account>> {
        Ok(self.owned_account(user_id, account_id))
    }

    fn list(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| {
                search.map_or(true, |s| {
                    matches(&a.name, s)
                        || matches(&a.id, s)
                        || a.plaid_id.as_deref().is_some_and(|p| matches(p, s))
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CategoryRepositoryTrait for InMemoryStore {
    async fn create(&self, user_id: &str, new_category: NewCategory) -> Result<Category> {
        Ok(self.add_category(user_id, &new_category.name))
    }

    async fn update(
        &self,
        user_id: &str,
        category_id: &str,
        category_update: CategoryUpdate,
    ) -> Result<Category> {
        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|c| c.id == category_id && c.user_id == user_id)
            .ok_or_else(|| Error::NotFound("Category not found".into()))?;
        category.name = category_update.name;
        Ok(category.clone())
    }

    async fn delete_many(&self, user_id: &str, category_ids: Vec<String>) -> Result<usize> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| !(c.user_id == user_id && category_ids.contains(&c.id)));
        Ok(before - categories.len())
    }

    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == category_id && c.user_id == user_id)
            .cloned())
    }

    fn list(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter(|c| search.map_or(true, |s| matches(&c.name, s) || matches(&c.id, s)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryStore {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let mut transaction = self.add_transaction(
            &new_transaction.financial_account_id,
            new_transaction.category_id.as_deref(),
            new_transaction.amount,
            new_transaction.date,
        );
        transaction.payee = new_transaction.payee;
        transaction.notes = new_transaction.notes;
        let mut stored = self.transactions.lock().unwrap();
        if let Some(slot) = stored.iter_mut().find(|t| t.id == transaction.id) {
            *slot = transaction.clone();
        }
        Ok(transaction)
    }

    async fn create_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize> {
        let count = new_transactions.len();
        for new_transaction in new_transactions {
            TransactionRepositoryTrait::create(self, new_transaction).await?;
        }
        Ok(count)
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction> {
        let mut stored = self.transactions.lock().unwrap();
        let slot = stored
            .iter_mut()
            .find(|t| t.id == transaction.id)
            .ok_or_else(|| Error::NotFound("Transaction not found".into()))?;
        *slot = transaction.clone();
        Ok(transaction)
    }

    async fn delete_many(&self, user_id: &str, transaction_ids: Vec<String>) -> Result<usize> {
        let visible: HashSet<String> = self
            .visible_transactions(user_id)
            .into_iter()
            .map(|(t, _)| t.id)
            .filter(|id| transaction_ids.contains(id))
            .collect();
        let mut stored = self.transactions.lock().unwrap();
        stored.retain(|t| !visible.contains(&t.id));
        Ok(visible.len())
    }

    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self
            .visible_transactions(user_id)
            .into_iter()
            .map(|(t, _)| t)
            .find(|t| t.id == transaction_id))
    }

    fn search(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionDetails>> {
        let categories = self.categories.lock().unwrap().clone();
        let mut details: Vec<TransactionDetails> = self
            .visible_transactions(user_id)
            .into_iter()
            .filter(|(t, _)| t.date >= filter.start_date && t.date <= filter.end_date)
            .filter(|(t, _)| {
                filter
                    .account_id
                    .as_deref()
                    .map_or(true, |id| t.financial_account_id == id)
            })
            .map(|(t, a)| {
                let category_name = t.category_id.as_deref().and_then(|id| {
                    categories
                        .iter()
                        .find(|c| c.id == id)
                        .map(|c| c.name.clone())
                });
                TransactionDetails {
                    transaction: t,
                    account_name: a.name,
                    category_name,
                }
            })
            .filter(|d| {
                filter.search.as_deref().map_or(true, |s| {
                    matches(&d.transaction.payee, s)
                        || matches(&d.transaction.id, s)
                        || matches(&d.account_name, s)
                        || d.category_name.as_deref().is_some_and(|c| matches(c, s))
                })
            })
            .collect();
        details.sort_by(|a, b| b.transaction.date.cmp(&a.transaction.date));
        Ok(details)
    }

    fn list_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        account_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .visible_transactions(user_id)
            .into_iter()
            .map(|(t, _)| t)
            .filter(|t| t.date >= start && t.date <= end)
            .filter(|t| account_id.map_or(true, |id| t.financial_account_id == id))
            .collect())
    }

    fn latest_date(&self, user_id: &str, account_id: &str) -> Result<Option<NaiveDate>> {
        Ok(self
            .visible_transactions(user_id)
            .into_iter()
            .filter(|(t, _)| t.financial_account_id == account_id)
            .map(|(t, _)| t.date)
            .max())
    }
}

#[async_trait]
impl PremiumRepositoryTrait for InMemoryStore {
    fn get_by_user(&self, user_id: &str) -> Result<Option<Premium>> {
        Ok(self
            .premiums
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn activate(&self, user_id: &str, order: NewOrder) -> Result<(Premium, Order)> {
        self.premiums.lock().unwrap().retain(|p| p.user_id != user_id);
        self.grant_premium(user_id);
        let order = Order {
            id: new_id(),
            user_id: user_id.to_string(),
            total: order.total,
            payment_id: order.payment_id,
            order_id: order.order_id,
            created_at: now(),
        };
        self.orders.lock().unwrap().push(order.clone());
        let premium = PremiumRepositoryTrait::get_by_user(self, user_id)?
            .ok_or_else(|| Error::Unexpected("premium row missing".into()))?;
        Ok((premium, order))
    }
}

/// Records outgoing mail; can be switched to fail every send.
#[derive(Default)]
pub(crate) struct CapturingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: AtomicBool,
}

impl CapturingMailer {
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn last_to(&self, to: &str) -> Option<EmailMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }
}

#[async_trait]
impl EmailSenderTrait for CapturingMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::ExternalService("mailer down".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
