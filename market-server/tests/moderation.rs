//! Moderation workflow integration tests across the three moderated
//! collections: idempotent decisions, conflict handling, the
//! one-active-record invariants and the atomic approve-and-promote side
//! effect on vendor applications.

use market_server::db::define_schema;
use market_server::db::models::{
    Account, AccountCreate, Ad, ProductCreate, VendorApplicationCreate,
};
use market_server::db::repository::{
    AccountRepository, AdRepository, ProductRepository, RepoError,
    VendorApplicationRepository,
};
use market_server::moderation::Decision;
use rust_decimal::Decimal;
use shared::util::now_millis;
use shared::{ModerationStatus, Role};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::sql::Thing;
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

async fn create_account(db: &Surreal<Db>, subject: &str, email: &str) -> Account {
    let repo = AccountRepository::new(db.clone());
    let (account, _) = repo
        .resolve_or_create(AccountCreate {
            subject_id: subject.to_string(),
            email: email.to_string(),
            display_name: "Applicant".to_string(),
            photo_url: None,
        })
        .await
        .unwrap();
    account
}

fn application() -> VendorApplicationCreate {
    VendorApplicationCreate {
        phone: "+34 600 000 000".to_string(),
        business_name: "Ada's Antiques".to_string(),
        cover_image: "https://assets.example.com/cover.jpg".to_string(),
        location: "Madrid".to_string(),
        description: "Restored antiques and curiosities".to_string(),
    }
}

fn ad_request(vendor: Thing, product: Thing) -> Ad {
    Ad {
        id: None,
        vendor,
        product,
        title: "Summer sale".to_string(),
        image: "https://assets.example.com/banner.jpg".to_string(),
        notes: None,
        start_date: now_millis(),
        end_date: now_millis() + 7 * 24 * 60 * 60 * 1000,
        application_status: ModerationStatus::Pending,
        created_at: now_millis(),
    }
}

// ==================== Product moderation ====================

#[tokio::test]
async fn product_decision_is_idempotent_and_conflicts_across() {
    let (db, _tmp) = test_db().await;
    let owner = create_account(&db, "uid-v", "v@example.com").await.id.unwrap();
    let products = ProductRepository::new(db.clone());

    let product = products
        .create(
            owner,
            ProductCreate {
                name: "Hammer".to_string(),
                description: "Hits nails".to_string(),
                category: "tools".to_string(),
                price: Decimal::from(10),
                stock: 5,
                image: None,
            },
        )
        .await
        .unwrap();
    let id = product.id.as_ref().unwrap().to_string();

    let approved = products.decide(&id, Decision::Approve).await.unwrap();
    assert_eq!(approved.application_status, ModerationStatus::Approved);

    // Approving again is a no-op, not an error
    let again = products.decide(&id, Decision::Approve).await.unwrap();
    assert_eq!(again.application_status, ModerationStatus::Approved);

    // The opposite decision on a decided record is a conflict
    let err = products.decide(&id, Decision::Reject).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let err = products
        .decide("product:missing", Decision::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

// ==================== Vendor applications ====================

#[tokio::test]
async fn vendor_application_unique_while_active() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "ada@example.com").await;
    let repo = VendorApplicationRepository::new(db.clone());

    let first = repo.submit(&account, application()).await.unwrap();
    assert_eq!(first.application_status, ModerationStatus::Pending);
    assert_eq!(first.applicant_email, "ada@example.com");

    // Second submission while one is pending conflicts
    let err = repo.submit(&account, application()).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // Still conflicts after approval
    let id = first.id.as_ref().unwrap().to_string();
    repo.decide(&id, Decision::Approve).await.unwrap();
    let err = repo.submit(&account, application()).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn vendor_application_resubmission_after_rejection() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "ada@example.com").await;
    let repo = VendorApplicationRepository::new(db.clone());

    let first = repo.submit(&account, application()).await.unwrap();
    let id = first.id.as_ref().unwrap().to_string();
    let rejected = repo.decide(&id, Decision::Reject).await.unwrap();
    assert_eq!(rejected.application_status, ModerationStatus::Rejected);

    // Rejection does not burn the applicant's slot
    let second = repo.submit(&account, application()).await.unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.application_status, ModerationStatus::Pending);

    // The rejected account was never promoted
    let accounts = AccountRepository::new(db.clone());
    let account = accounts.find_by_subject("uid-1").await.unwrap().unwrap();
    assert_eq!(account.role, Role::User);
}

#[tokio::test]
async fn vendor_approval_promotes_account_atomically() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "ada@example.com").await;
    let repo = VendorApplicationRepository::new(db.clone());
    let accounts = AccountRepository::new(db.clone());

    let submitted = repo.submit(&account, application()).await.unwrap();
    let id = submitted.id.as_ref().unwrap().to_string();

    let approved = repo.decide(&id, Decision::Approve).await.unwrap();
    assert_eq!(approved.application_status, ModerationStatus::Approved);

    let promoted = accounts.find_by_subject("uid-1").await.unwrap().unwrap();
    assert_eq!(promoted.role, Role::Vendor);

    // Repeating the approval is a no-op and does not re-run the side
    // effect (demote first to make a re-run observable)
    let account_id = promoted.id.unwrap().to_string();
    accounts.set_role(&account_id, Role::User).await.unwrap();
    let again = repo.decide(&id, Decision::Approve).await.unwrap();
    assert_eq!(again.application_status, ModerationStatus::Approved);
    let account = accounts.find_by_subject("uid-1").await.unwrap().unwrap();
    assert_eq!(account.role, Role::User);
}

#[tokio::test]
async fn vendor_approval_rolls_back_when_promotion_fails() {
    let (db, _tmp) = test_db().await;
    let account = create_account(&db, "uid-1", "ada@example.com").await;
    let repo = VendorApplicationRepository::new(db.clone());

    let submitted = repo.submit(&account, application()).await.unwrap();
    let id = submitted.id.as_ref().unwrap().to_string();

    // Simulate the promotion step failing: the applicant account is gone
    let account_id = account.id.unwrap();
    let _: Option<Account> = db
        .delete((account_id.tb.as_str(), account_id.id.to_string()))
        .await
        .unwrap();

    let err = repo.decide(&id, Decision::Approve).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    // The whole decision failed: the application is still pending
    let application = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(application.application_status, ModerationStatus::Pending);

    // Rejection has no side effect and still works
    let rejected = repo.decide(&id, Decision::Reject).await.unwrap();
    assert_eq!(rejected.application_status, ModerationStatus::Rejected);
}

#[tokio::test]
async fn vendor_application_listing_filters_by_status() {
    let (db, _tmp) = test_db().await;
    let repo = VendorApplicationRepository::new(db.clone());

    for (i, decision) in [None, Some(Decision::Approve), Some(Decision::Reject)]
        .into_iter()
        .enumerate()
    {
        let account = create_account(
            &db,
            &format!("uid-{i}"),
            &format!("applicant-{i}@example.com"),
        )
        .await;
        let submitted = repo.submit(&account, application()).await.unwrap();
        if let Some(decision) = decision {
            let id = submitted.id.as_ref().unwrap().to_string();
            repo.decide(&id, decision).await.unwrap();
        }
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    assert_eq!(repo.list(None).await.unwrap().len(), 3);
    let pending = repo.list(Some(ModerationStatus::Pending)).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].applicant_email, "applicant-0@example.com");
    assert_eq!(
        repo.list(Some(ModerationStatus::Approved)).await.unwrap().len(),
        1
    );

    // Newest first
    let all = repo.list(None).await.unwrap();
    assert_eq!(all[0].applicant_email, "applicant-2@example.com");
}

// ==================== Ads ====================

#[tokio::test]
async fn ad_dates_must_be_ordered() {
    let (db, _tmp) = test_db().await;
    let vendor = create_account(&db, "uid-v", "v@example.com").await.id.unwrap();
    let repo = AdRepository::new(db.clone());

    let mut ad = ad_request(vendor, Thing::from(("product", "p1")));
    ad.end_date = ad.start_date;
    let err = repo.submit(ad).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn ad_requires_existing_product() {
    let (db, _tmp) = test_db().await;
    let vendor = create_account(&db, "uid-v", "v@example.com").await.id.unwrap();
    let repo = AdRepository::new(db.clone());

    let err = repo
        .submit(ad_request(vendor, Thing::from(("product", "missing"))))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn one_active_ad_per_product() {
    let (db, _tmp) = test_db().await;
    let vendor = create_account(&db, "uid-v", "v@example.com").await.id.unwrap();
    let products = ProductRepository::new(db.clone());
    let product = products
        .create(
            vendor.clone(),
            ProductCreate {
                name: "Hammer".to_string(),
                description: "Hits nails".to_string(),
                category: "tools".to_string(),
                price: Decimal::from(10),
                stock: 5,
                image: None,
            },
        )
        .await
        .unwrap();
    let product_id = product.id.clone().unwrap();
    let repo = AdRepository::new(db.clone());

    let first = repo
        .submit(ad_request(vendor.clone(), product_id.clone()))
        .await
        .unwrap();
    assert_eq!(first.application_status, ModerationStatus::Pending);

    // A second active ad for the same product conflicts
    let err = repo
        .submit(ad_request(vendor.clone(), product_id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // Rejection frees the slot
    let id = first.id.as_ref().unwrap().to_string();
    repo.decide(&id, Decision::Reject).await.unwrap();
    let second = repo
        .submit(ad_request(vendor, product_id))
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn ad_decisions_and_active_listing() {
    let (db, _tmp) = test_db().await;
    let vendor = create_account(&db, "uid-v", "v@example.com").await.id.unwrap();
    let products = ProductRepository::new(db.clone());
    let product = products
        .create(
            vendor.clone(),
            ProductCreate {
                name: "Hammer".to_string(),
                description: "Hits nails".to_string(),
                category: "tools".to_string(),
                price: Decimal::from(10),
                stock: 5,
                image: None,
            },
        )
        .await
        .unwrap();
    let repo = AdRepository::new(db.clone());

    let ad = repo
        .submit(ad_request(vendor, product.id.clone().unwrap()))
        .await
        .unwrap();
    let id = ad.id.as_ref().unwrap().to_string();

    assert_eq!(repo.list_pending().await.unwrap().len(), 1);
    assert!(repo.list_active().await.unwrap().is_empty());

    let approved = repo.decide(&id, Decision::Approve).await.unwrap();
    assert_eq!(approved.application_status, ModerationStatus::Approved);

    assert!(repo.list_pending().await.unwrap().is_empty());
    assert_eq!(repo.list_active().await.unwrap().len(), 1);

    // Idempotent repeat, conflicting reversal
    repo.decide(&id, Decision::Approve).await.unwrap();
    let err = repo.decide(&id, Decision::Reject).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}
