//! Vendor Application Repository
//!
//! Submission enforces the one-active-application invariant inside a
//! database transaction; approval flips the status and promotes the
//! applicant's account in one atomic unit — a failed promotion leaves the
//! application pending.

use super::{
    BaseRepository, CountRow, RepoError, RepoResult, make_thing, strip_table_prefix, txn_error,
};
use crate::db::models::{Account, VendorApplication, VendorApplicationCreate};
use crate::moderation::{Decision, Transition, apply_decision};
use shared::ModerationStatus;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const APPLICATION_TABLE: &str = "vendor_application";

#[derive(Clone)]
pub struct VendorApplicationRepository {
    base: BaseRepository,
}

impl VendorApplicationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find application by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<VendorApplication>> {
        let pure_id = strip_table_prefix(APPLICATION_TABLE, id);
        let application: Option<VendorApplication> =
            self.base.db().select((APPLICATION_TABLE, pure_id)).await?;
        Ok(application)
    }

    /// Submit a new application for the given account.
    ///
    /// The active-application check runs inside the same transaction as
    /// the create, so two racing submissions cannot both pass it. A
    /// rejected prior application does not block resubmission.
    pub async fn submit(
        &self,
        applicant: &Account,
        data: VendorApplicationCreate,
    ) -> RepoResult<VendorApplication> {
        let applicant_id = applicant
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Account without id".to_string()))?;

        let application = VendorApplication {
            id: None,
            applicant: applicant_id.clone(),
            applicant_name: applicant.display_name.clone(),
            applicant_email: applicant.email.clone(),
            phone: data.phone,
            business_name: data.business_name,
            cover_image: data.cover_image,
            location: data.location,
            description: data.description,
            application_status: ModerationStatus::Pending,
            created_at: now_millis(),
        };

        let mut response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $existing = (SELECT id FROM vendor_application \
                     WHERE applicant = $applicant \
                     AND application_status IN ['pending', 'approved']);
                 IF array::len($existing) > 0 \
                     { THROW 'conflict: an active vendor application already exists' };
                 CREATE vendor_application CONTENT $data;
                 COMMIT TRANSACTION;",
            )
            .bind(("applicant", applicant_id.clone()))
            .bind(("data", application))
            .await?;

        if let Some(err) = txn_error(&mut response) {
            return Err(err);
        }

        let applications: Vec<VendorApplication> = self
            .base
            .db()
            .query(
                "SELECT * FROM vendor_application WHERE applicant = $applicant \
                 AND application_status = 'pending' ORDER BY created_at DESC LIMIT 1",
            )
            .bind(("applicant", applicant_id))
            .await?
            .take(0)?;

        applications
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create vendor application".to_string()))
    }

    /// List applications, optionally filtered by status, newest first.
    /// Moderation listings are not paginated.
    pub async fn list(
        &self,
        status: Option<ModerationStatus>,
    ) -> RepoResult<Vec<VendorApplication>> {
        let applications: Vec<VendorApplication> = match status {
            Some(status) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM vendor_application \
                         WHERE application_status = $status ORDER BY created_at DESC",
                    )
                    .bind(("status", status))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM vendor_application ORDER BY created_at DESC")
                    .await?
                    .take(0)?
            }
        };
        Ok(applications)
    }

    /// Apply a moderation decision.
    ///
    /// Approval also promotes the applicant's account to the vendor role.
    /// Both writes happen in one transaction: if the account is missing
    /// the whole decision fails and the application stays pending.
    /// Repeating an already-applied decision is a no-op and does not
    /// re-run the promotion.
    pub async fn decide(&self, id: &str, decision: Decision) -> RepoResult<VendorApplication> {
        let application = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor application {} not found", id)))?;

        let target = match apply_decision(application.application_status, decision) {
            Transition::NoOp(_) => return Ok(application),
            Transition::Conflict(_) => {
                return Err(RepoError::Conflict(
                    "Vendor application has already been decided".to_string(),
                ));
            }
            Transition::Applied(target) => target,
        };

        let thing = make_thing(APPLICATION_TABLE, id);
        let mut response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $app = (SELECT * FROM $thing);
                 IF array::len($app) == 0 { THROW 'not_found: vendor application' };
                 IF $app[0].application_status != 'pending' \
                     { THROW 'conflict: vendor application has already been decided' };
                 UPDATE $thing SET application_status = $status;
                 IF $status == 'approved' {
                     LET $applicant = $app[0].applicant;
                     LET $acct = (SELECT id FROM $applicant);
                     IF array::len($acct) == 0 { THROW 'not_found: applicant account' };
                     UPDATE $applicant SET role = 'vendor';
                 };
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
            .ok_or_else(|| RepoError::NotFound(format!("Vendor application {} not found", id)))
    }

    /// Count applications by status
    pub async fn count(&self, status: Option<ModerationStatus>) -> RepoResult<u64> {
        let rows: Vec<CountRow> = match status {
            Some(status) => {
                self.base
                    .db()
                    .query(
                        "SELECT count() FROM vendor_application \
                         WHERE application_status = $status GROUP ALL",
                    )
                    .bind(("status", status))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT count() FROM vendor_application GROUP ALL")
                    .await?
                    .take(0)?
            }
        };
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }
}
