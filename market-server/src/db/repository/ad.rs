//! Ad Repository
//!
//! Ad slot requests follow the same moderation shape as products and
//! vendor applications. One active (pending or approved) ad per product;
//! the check runs inside the creation transaction.

use super::{
    BaseRepository, CountRow, RepoError, RepoResult, make_thing, strip_table_prefix, txn_error,
};
use crate::db::models::Ad;
use crate::moderation::{Decision, Transition, apply_decision};
use shared::ModerationStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const AD_TABLE: &str = "ad";

#[derive(Clone)]
pub struct AdRepository {
    base: BaseRepository,
}

impl AdRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find ad by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Ad>> {
        let pure_id = strip_table_prefix(AD_TABLE, id);
        let ad: Option<Ad> = self.base.db().select((AD_TABLE, pure_id)).await?;
        Ok(ad)
    }

    /// Submit a new ad request.
    ///
    /// Date ordering is validated here; product existence and the
    /// one-active-ad-per-product invariant are checked inside the
    /// creation transaction.
    pub async fn submit(&self, ad: Ad) -> RepoResult<Ad> {
        if ad.end_date <= ad.start_date {
            return Err(RepoError::Validation(
                "Ad end date must be after its start date".to_string(),
            ));
        }

        let product = ad.product.clone();
        let vendor = ad.vendor.clone();

        let mut response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $prod = (SELECT id FROM $product);
                 IF array::len($prod) == 0 { THROW 'not_found: product' };
                 LET $existing = (SELECT id FROM ad WHERE product = $product \
                     AND application_status IN ['pending', 'approved']);
                 IF array::len($existing) > 0 \
                     { THROW 'conflict: an active ad already exists for this product' };
                 CREATE ad CONTENT $data;
                 COMMIT TRANSACTION;",
            )
            .bind(("product", product.clone()))
            .bind(("data", ad))
            .await?;

        if let Some(err) = txn_error(&mut response) {
            return Err(err);
        }

        let ads: Vec<Ad> = self
            .base
            .db()
            .query(
                "SELECT * FROM ad WHERE product = $product AND vendor = $vendor \
                 AND application_status = 'pending' ORDER BY created_at DESC LIMIT 1",
            )
            .bind(("product", product))
            .bind(("vendor", vendor))
            .await?
            .take(0)?;

        ads.into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create ad".to_string()))
    }

    /// Moderation queue: pending ads, newest first
    pub async fn list_pending(&self) -> RepoResult<Vec<Ad>> {
        let ads: Vec<Ad> = self
            .base
            .db()
            .query(
                "SELECT * FROM ad WHERE application_status = 'pending' \
                 ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(ads)
    }

    /// Publicly visible ads: approved, newest first
    pub async fn list_active(&self) -> RepoResult<Vec<Ad>> {
        let ads: Vec<Ad> = self
            .base
            .db()
            .query(
                "SELECT * FROM ad WHERE application_status = 'approved' \
                 ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(ads)
    }

    /// Apply a moderation decision. Same idempotency contract as the
    /// other moderated collections.
    pub async fn decide(&self, id: &str, decision: Decision) -> RepoResult<Ad> {
        let ad = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Ad {} not found", id)))?;

        let target = match apply_decision(ad.application_status, decision) {
            Transition::NoOp(_) => return Ok(ad),
            Transition::Conflict(_) => {
                return Err(RepoError::Conflict(
                    "Ad moderation has already been decided".to_string(),
                ));
            }
            Transition::Applied(target) => target,
        };

        let thing = make_thing(AD_TABLE, id);
        let mut response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $ad = (SELECT * FROM $thing);
                 IF array::len($ad) == 0 { THROW 'not_found: ad' };
                 IF $ad[0].application_status != 'pending' \
                     { THROW 'conflict: ad moderation has already been decided' };
                 UPDATE $thing SET application_status = $status;
                 COMMIT TRANSACTION;",
            )
            .bind(("thing", thing))
            .bind(("status", target))
            .await?;

        if let Some(err) = txn_error(&mut response) {
            return Err(err);
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Ad {} not found", id)))
    }

    /// Count ads, optionally by vendor and/or status
    pub async fn count(
        &self,
        vendor: Option<&Thing>,
        status: Option<ModerationStatus>,
    ) -> RepoResult<u64> {
        let mut filters: Vec<&str> = Vec::new();
        if vendor.is_some() {
            filters.push("vendor = $vendor");
        }
        if status.is_some() {
            filters.push("application_status = $status");
        }

        let query_str = if filters.is_empty() {
            "SELECT count() FROM ad GROUP ALL".to_string()
        } else {
            format!("SELECT count() FROM ad WHERE {} GROUP ALL", filters.join(" AND "))
        };

        let mut query = self.base.db().query(&query_str);
        if let Some(vendor) = vendor {
            query = query.bind(("vendor", vendor.clone()));
        }
        if let Some(status) = status {
            query = query.bind(("status", status));
        }

        let rows: Vec<CountRow> = query.await?.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }
}
