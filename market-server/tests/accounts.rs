//! Account repository integration tests: first-login resolution, the
//! order history, ban state and the wishlist.

use market_server::db::define_schema;
use market_server::db::models::{Account, AccountCreate, OrderCreate, OrderItemCreate};
use market_server::db::repository::{AccountRepository, RepoError, make_thing};
use rust_decimal::Decimal;
use shared::{OrderStatus, Role};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tempfile::TempDir;

async fn test_db() -> (Surreal<Db>, TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path())
        .await
        .expect("failed to open database");
    db.use_ns("market").use_db("market").await.expect("ns/db");
    define_schema(&db).await.expect("schema");
    (db, tmp)
}

fn signup(subject: &str, email: &str) -> AccountCreate {
    AccountCreate {
        subject_id: subject.to_string(),
        email: email.to_string(),
        display_name: "Test User".to_string(),
        photo_url: None,
    }
}

async fn create_account(db: &Surreal<Db>, subject: &str, email: &str) -> Account {
    let repo = AccountRepository::new(db.clone());
    let (account, created) = repo.resolve_or_create(signup(subject, email)).await.unwrap();
    assert!(created);
    account
}

#[tokio::test]
async fn resolve_or_create_creates_then_reuses() {
    let (db, _tmp) = test_db().await;
    let repo = AccountRepository::new(db.clone());

    let (first, created) = repo
        .resolve_or_create(signup("uid-1", "ada@example.com"))
        .await
        .unwrap();
    assert!(created);
    assert_eq!(first.role, Role::User);
    assert!(first.orders.is_empty());

    let (second, created) = repo
        .resolve_or_create(signup("uid-1", "ada@example.com"))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);

    assert_eq!(repo.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn resolve_or_create_matches_existing_email() {
    let (db, _tmp) = test_db().await;
    let repo = AccountRepository::new(db.clone());

    let (first, _) = repo
        .resolve_or_create(signup("uid-1", "ada@example.com"))
        .await
        .unwrap();

    // Same email presented under a different provider subject resolves to
    // the existing account instead of failing on the unique index
    let (second, created) = repo
        .resolve_or_create(signup("uid-other", "ada@example.com"))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);
    assert_eq!(repo.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_first_logins_create_exactly_one_account() {
    let (db, _tmp) = test_db().await;
    let repo_a = AccountRepository::new(db.clone());
    let repo_b = AccountRepository::new(db.clone());

    let (a, b) = tokio::join!(
        repo_a.resolve_or_create(signup("uid-race", "race@example.com")),
        repo_b.resolve_or_create(signup("uid-race", "race@example.com")),
    );

    // Neither caller sees a raw duplicate-key error
    let (account_a, _) = a.unwrap();
    let (account_b, _) = b.unwrap();
    assert_eq!(account_a.id, account_b.id);

    let repo = AccountRepository::new(db.clone());
    assert_eq!(repo.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn record_order_appends_pending_order() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "buyer@example.com").await;
    let repo = AccountRepository::new(db.clone());

    let before = shared::util::now_millis();
    let order = repo
        .record_order(
            "uid-1",
            OrderCreate {
                order_id: "pi_confirmation_1".to_string(),
                items: vec![OrderItemCreate {
                    product_id: "p1".to_string(),
                    quantity: 1,
                }],
                total_amount: Decimal::new(4999, 2),
            },
        )
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, Decimal::new(4999, 2));
    assert!(order.order_date >= before);
    assert!(order.order_date <= shared::util::now_millis());

    let reloaded = repo
        .find_by_id(&account.id.unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.orders.len(), 1);
    assert_eq!(reloaded.orders[0].order_id, "pi_confirmation_1");
}

#[tokio::test]
async fn record_order_rejects_invalid_input() {
    let (db, _tmp) = test_db().await;
    create_account(&db, "uid-1", "buyer@example.com").await;
    let repo = AccountRepository::new(db.clone());

    // Empty items
    let err = repo
        .record_order(
            "uid-1",
            OrderCreate {
                order_id: "pi_1".to_string(),
                items: vec![],
                total_amount: Decimal::new(100, 0),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Zero quantity
    let err = repo
        .record_order(
            "uid-1",
            OrderCreate {
                order_id: "pi_1".to_string(),
                items: vec![OrderItemCreate {
                    product_id: "p1".to_string(),
                    quantity: 0,
                }],
                total_amount: Decimal::new(100, 0),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Non-positive amount
    let err = repo
        .record_order(
            "uid-1",
            OrderCreate {
                order_id: "pi_1".to_string(),
                items: vec![OrderItemCreate {
                    product_id: "p1".to_string(),
                    quantity: 1,
                }],
                total_amount: Decimal::ZERO,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Missing confirmation id
    let err = repo
        .record_order(
            "uid-1",
            OrderCreate {
                order_id: "  ".to_string(),
                items: vec![OrderItemCreate {
                    product_id: "p1".to_string(),
                    quantity: 1,
                }],
                total_amount: Decimal::new(100, 0),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Unknown account
    let err = repo
        .record_order(
            "uid-missing",
            OrderCreate {
                order_id: "pi_1".to_string(),
                items: vec![OrderItemCreate {
                    product_id: "p1".to_string(),
                    quantity: 1,
                }],
                total_amount: Decimal::new(100, 0),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    // No order leaked through any of the failed attempts
    let account = repo.find_by_subject("uid-1").await.unwrap().unwrap();
    assert!(account.orders.is_empty());
}

#[tokio::test]
async fn orders_are_append_only() {
    let (db, _tmp) = test_db().await;
    create_account(&db, "uid-1", "buyer@example.com").await;
    let repo = AccountRepository::new(db.clone());

    for i in 0..3 {
        repo.record_order(
            "uid-1",
            OrderCreate {
                order_id: format!("pi_{i}"),
                items: vec![OrderItemCreate {
                    product_id: "p1".to_string(),
                    quantity: 1,
                }],
                total_amount: Decimal::new(1050, 2),
            },
        )
        .await
        .unwrap();
    }

    let account = repo.find_by_subject("uid-1").await.unwrap().unwrap();
    let ids: Vec<_> = account.orders.iter().map(|o| o.order_id.as_str()).collect();
    assert_eq!(ids, vec!["pi_0", "pi_1", "pi_2"]);
}

#[tokio::test]
async fn ban_fields_are_co_mutated() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "banned@example.com").await;
    let id = account.id.unwrap().to_string();
    let repo = AccountRepository::new(db.clone());

    // Banning without a reason is refused
    let err = repo.set_ban_state(&id, true, None).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let banned = repo
        .set_ban_state(&id, true, Some("fraudulent listings".to_string()))
        .await
        .unwrap();
    assert!(banned.banned);
    assert_eq!(banned.ban_reason.as_deref(), Some("fraudulent listings"));
    assert!(banned.ban_date.is_some());

    // Unbanning clears reason and date together
    let unbanned = repo.set_ban_state(&id, false, None).await.unwrap();
    assert!(!unbanned.banned);
    assert!(unbanned.ban_reason.is_none());
    assert!(unbanned.ban_date.is_none());
}

#[tokio::test]
async fn set_role_is_admin_override() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "role@example.com").await;
    let id = account.id.unwrap().to_string();
    let repo = AccountRepository::new(db.clone());

    let account = repo.set_role(&id, Role::Admin).await.unwrap();
    assert_eq!(account.role, Role::Admin);

    // Downgrade is the same override path
    let account = repo.set_role(&id, Role::User).await.unwrap();
    assert_eq!(account.role, Role::User);

    let err = repo
        .set_role("account:missing", Role::Vendor)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn wishlist_add_remove() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "wish@example.com").await;
    let id = account.id.unwrap().to_string();
    let repo = AccountRepository::new(db.clone());

    let product = make_thing("product", "p1");
    let account = repo.add_wishlist(&id, product.clone()).await.unwrap();
    assert_eq!(account.wishlist.len(), 1);

    let err = repo.add_wishlist(&id, product.clone()).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    let account = repo.remove_wishlist(&id, product).await.unwrap();
    assert!(account.wishlist.is_empty());
}

#[tokio::test]
async fn refresh_token_is_stored_and_cleared() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "token@example.com").await;
    let thing = account.id.clone().unwrap();
    let repo = AccountRepository::new(db.clone());

    repo.set_refresh_token(&thing, Some("refresh-1".to_string()))
        .await
        .unwrap();
    let reloaded = repo.find_by_subject("uid-1").await.unwrap().unwrap();
    assert_eq!(reloaded.refresh_token.as_deref(), Some("refresh-1"));

    repo.set_refresh_token(&thing, None).await.unwrap();
    let reloaded = repo.find_by_subject("uid-1").await.unwrap().unwrap();
    assert!(reloaded.refresh_token.is_none());
}
