//! Repository tests against a migrated SQLite file in a temp directory.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use fintrack_core::accounts::{AccountRepositoryTrait, AccountUpdate, NewAccount};
use fintrack_core::categories::{CategoryRepositoryTrait, NewCategory};
use fintrack_core::errors::ErrorKind;
use fintrack_core::premium::{NewOrder, PremiumRepositoryTrait};
use fintrack_core::transactions::{NewTransaction, TransactionFilter, TransactionRepositoryTrait};
use fintrack_core::users::{
    AuthTokenRepositoryTrait, NewAuthToken, NewUser, TokenKind, UserRepositoryTrait, UserUpdate,
};
use fintrack_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, AccountRepository, AuthTokenRepository,
    CategoryRepository, DbPool, PremiumRepository, TransactionRepository, UserRepository,
    WriteHandle,
};
use tempfile::TempDir;

struct TestDb {
    _dir: TempDir,
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TestDb {
    fn open() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = init(dir.path().to_str().unwrap()).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();
        let writer = spawn_writer(pool.clone());
        Self {
            _dir: dir,
            pool,
            writer,
        }
    }

    fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone(), self.writer.clone())
    }

    fn tokens(&self) -> AuthTokenRepository {
        AuthTokenRepository::new(self.pool.clone(), self.writer.clone())
    }

    fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone(), self.writer.clone())
    }

    fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone(), self.writer.clone())
    }

    fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone(), self.writer.clone())
    }

    fn premium(&self) -> PremiumRepository {
        PremiumRepository::new(self.pool.clone(), self.writer.clone())
    }

    async fn user(&self, email: &str) -> String {
        self.users()
            .create(NewUser {
                name: Some("Ann".into()),
                email: email.into(),
                password_hash: Some("hash".into()),
            })
            .await
            .unwrap()
            .id
    }

    async fn account(&self, user_id: &str, name: &str) -> String {
        self.accounts()
            .create(
                user_id,
                NewAccount {
                    name: name.into(),
                    plaid_id: None,
                },
            )
            .await
            .unwrap()
            .id
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(account_id: &str, category_id: Option<&str>, amount: i64, date: NaiveDate) -> NewTransaction {
    NewTransaction {
        financial_account_id: account_id.to_string(),
        category_id: category_id.map(String::from),
        amount,
        date,
        payee: "Grocer".to_string(),
        notes: None,
    }
}

fn june(search: Option<&str>) -> TransactionFilter {
    TransactionFilter {
        start_date: d(2024, 6, 1),
        end_date: d(2024, 6, 30),
        account_id: None,
        search: search.map(String::from),
    }
}

#[tokio::test]
async fn users_are_unique_by_email_and_patch_partially() {
    let db = TestDb::open();
    let users = db.users();
    let id = db.user("ann@example.com").await;

    let duplicate = users
        .create(NewUser {
            name: None,
            email: "ann@example.com".into(),
            password_hash: None,
        })
        .await
        .unwrap_err();
    assert_eq!(duplicate.kind(), ErrorKind::Conflict);

    let updated = users
        .update(UserUpdate {
            id: id.clone(),
            is_two_factor_enabled: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(updated.is_two_factor_enabled);
    assert_eq!(updated.name.as_deref(), Some("Ann"));
    assert_eq!(updated.password_hash.as_deref(), Some("hash"));

    let by_email = users.get_by_email("ann@example.com").unwrap().unwrap();
    assert_eq!(by_email.id, id);
    assert!(users.get_by_id("missing").unwrap().is_none());
}

#[tokio::test]
async fn issuing_a_token_replaces_the_previous_one() {
    let db = TestDb::open();
    let tokens = db.tokens();
    let expires_at = Utc::now().naive_utc() + Duration::hours(1);
    let issue = |token: &str, kind: TokenKind| NewAuthToken {
        kind,
        email: "ann@example.com".into(),
        token: token.into(),
        expires_at,
    };

    tokens
        .replace(issue("first", TokenKind::EmailVerification))
        .await
        .unwrap();
    tokens
        .replace(issue("123456", TokenKind::TwoFactor))
        .await
        .unwrap();
    let second = tokens
        .replace(issue("second", TokenKind::EmailVerification))
        .await
        .unwrap();

    assert!(tokens
        .find_by_token(TokenKind::EmailVerification, "first")
        .unwrap()
        .is_none());
    let current = tokens
        .find_by_email(TokenKind::EmailVerification, "ann@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(current, second);
    assert!(tokens
        .find_by_token(TokenKind::TwoFactor, "123456")
        .unwrap()
        .is_some());

    tokens.delete(&second.id).await.unwrap();
    assert!(tokens
        .find_by_token(TokenKind::EmailVerification, "second")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn two_factor_confirmation_is_taken_once() {
    let db = TestDb::open();
    let user_id = db.user("ann@example.com").await;
    let tokens = db.tokens();

    tokens.upsert_two_factor_confirmation(&user_id).await.unwrap();
    tokens.upsert_two_factor_confirmation(&user_id).await.unwrap();
    assert!(tokens.take_two_factor_confirmation(&user_id).await.unwrap());
    assert!(!tokens.take_two_factor_confirmation(&user_id).await.unwrap());
}

#[tokio::test]
async fn accounts_are_scoped_to_their_owner() {
    let db = TestDb::open();
    let ann = db.user("ann@example.com").await;
    let bob = db.user("bob@example.com").await;
    let accounts = db.accounts();
    let checking = db.account(&ann, "Checking").await;
    let savings = db.account(&ann, "Holiday 50%").await;
    let bobs = db.account(&bob, "Checking").await;

    assert!(accounts.get_by_id(&bob, &checking).unwrap().is_none());
    let err = accounts
        .update(&bob, &checking, AccountUpdate { name: "Mine".into() })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let listed = accounts.list(&ann, None).unwrap();
    assert_eq!(listed.len(), 2);
    let searched = accounts.list(&ann, Some("50%")).unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, savings);
    assert_eq!(accounts.list(&ann, Some("CHECK")).unwrap().len(), 1);

    let linked = accounts
        .set_plaid_id(&ann, &checking, "access-sandbox-1".into())
        .await
        .unwrap();
    assert!(linked.is_linked());
    assert_eq!(accounts.list(&ann, Some("sandbox")).unwrap().len(), 1);

    let deleted = accounts
        .delete_many(&ann, vec![checking.clone(), bobs.clone()])
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(accounts.get_by_id(&bob, &bobs).unwrap().is_some());
}

#[tokio::test]
async fn transactions_of_deleted_accounts_become_invisible() {
    let db = TestDb::open();
    let ann = db.user("ann@example.com").await;
    let account = db.account(&ann, "Checking").await;
    let transactions = db.transactions();
    let created = transactions
        .create(tx(&account, None, 5_000, d(2024, 6, 3)))
        .await
        .unwrap();

    db.accounts()
        .delete_many(&ann, vec![account.clone()])
        .await
        .unwrap();

    assert!(transactions.get_by_id(&ann, &created.id).unwrap().is_none());
    assert!(transactions.search(&ann, &june(None)).unwrap().is_empty());
    assert!(transactions
        .list_in_range(&ann, d(2024, 6, 1), d(2024, 6, 30), None)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn search_joins_names_and_orders_by_date() {
    let db = TestDb::open();
    let ann = db.user("ann@example.com").await;
    let checking = db.account(&ann, "Checking").await;
    let savings = db.account(&ann, "Savings").await;
    let food = db
        .categories()
        .create(&ann, NewCategory { name: "Food".into() })
        .await
        .unwrap();
    let transactions = db.transactions();
    transactions
        .create(tx(&checking, Some(&food.id), -1_500, d(2024, 6, 2)))
        .await
        .unwrap();
    transactions
        .create(tx(&savings, None, 9_000, d(2024, 6, 20)))
        .await
        .unwrap();
    transactions
        .create(tx(&checking, None, 100, d(2024, 5, 31)))
        .await
        .unwrap();

    let all = transactions.search(&ann, &june(None)).unwrap();
    let dates: Vec<NaiveDate> = all.iter().map(|t| t.transaction.date).collect();
    assert_eq!(dates, vec![d(2024, 6, 20), d(2024, 6, 2)]);
    assert_eq!(all[0].account_name, "Savings");
    assert_eq!(all[0].category_name, None);
    assert_eq!(all[1].category_name.as_deref(), Some("Food"));

    let by_category = transactions.search(&ann, &june(Some("foo"))).unwrap();
    assert_eq!(by_category.len(), 1);
    let by_account = transactions.search(&ann, &june(Some("SAV"))).unwrap();
    assert_eq!(by_account.len(), 1);

    let only_checking = transactions
        .search(
            &ann,
            &TransactionFilter {
                account_id: Some(checking.clone()),
                ..june(None)
            },
        )
        .unwrap();
    assert_eq!(only_checking.len(), 1);

    let bob = db.user("bob@example.com").await;
    assert!(transactions.search(&bob, &june(None)).unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_row_and_clears_category() {
    let db = TestDb::open();
    let ann = db.user("ann@example.com").await;
    let account = db.account(&ann, "Checking").await;
    let food = db
        .categories()
        .create(&ann, NewCategory { name: "Food".into() })
        .await
        .unwrap();
    let transactions = db.transactions();
    let created = transactions
        .create(NewTransaction {
            notes: Some("weekly".into()),
            ..tx(&account, Some(&food.id), -1_500, d(2024, 6, 2))
        })
        .await
        .unwrap();

    let mut changed = created.clone();
    changed.category_id = None;
    changed.notes = None;
    changed.amount = 2_000;
    let updated = transactions.update(changed).await.unwrap();
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.amount, 2_000);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn bulk_insert_spans_chunks_and_delete_checks_ownership() {
    let db = TestDb::open();
    let ann = db.user("ann@example.com").await;
    let bob = db.user("bob@example.com").await;
    let mine = db.account(&ann, "Checking").await;
    let theirs = db.account(&bob, "Checking").await;
    let transactions = db.transactions();

    let rows: Vec<NewTransaction> = (0..130)
        .map(|i| tx(&mine, None, i, d(2024, 6, 1) + Duration::days(i % 30)))
        .collect();
    assert_eq!(transactions.create_many(rows).await.unwrap(), 130);
    assert_eq!(
        transactions.latest_date(&ann, &mine).unwrap(),
        Some(d(2024, 6, 30))
    );
    assert_eq!(transactions.latest_date(&bob, &mine).unwrap(), None);

    let foreign = transactions
        .create(tx(&theirs, None, 1, d(2024, 6, 1)))
        .await
        .unwrap();
    let some_of_mine: Vec<String> = transactions
        .search(&ann, &june(None))
        .unwrap()
        .into_iter()
        .take(3)
        .map(|t| t.transaction.id)
        .collect();

    let mut ids = some_of_mine.clone();
    ids.push(foreign.id.clone());
    assert_eq!(transactions.delete_many(&ann, ids).await.unwrap(), 3);
    assert!(transactions.get_by_id(&bob, &foreign.id).unwrap().is_some());
}

#[tokio::test]
async fn premium_activation_is_idempotent_per_user() {
    let db = TestDb::open();
    let ann = db.user("ann@example.com").await;
    let premium = db.premium();
    assert!(premium.get_by_user(&ann).unwrap().is_none());

    let order = |n: u32| NewOrder {
        total: 900,
        payment_id: format!("pay_{n}"),
        order_id: format!("order_{n}"),
    };
    let (first, receipt) = premium.activate(&ann, order(1)).await.unwrap();
    assert!(first.active);
    assert_eq!(receipt.total, 900);

    let (second, _) = premium.activate(&ann, order(2)).await.unwrap();
    assert_eq!(second.id, first.id);
    assert!(premium.get_by_user(&ann).unwrap().unwrap().active);
}
