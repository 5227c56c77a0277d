//! Account Repository
//!
//! Upsert-on-first-login resolution, admin role/ban mutations, the
//! wishlist, and the embedded append-only order history.

use super::{BaseRepository, CountRow, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{Account, AccountCreate, Order, OrderCreate, OrderItem, ProfileUpdate};
use rust_decimal::Decimal;
use shared::{OrderStatus, Role};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const ACCOUNT_TABLE: &str = "account";

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find account by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        let pure_id = strip_table_prefix(ACCOUNT_TABLE, id);
        let account: Option<Account> = self.base.db().select((ACCOUNT_TABLE, pure_id)).await?;
        Ok(account)
    }

    /// Find account by the identity provider's subject id
    pub async fn find_by_subject(&self, subject_id: &str) -> RepoResult<Option<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account WHERE subject_id = $subject LIMIT 1")
            .bind(("subject", subject_id.to_string()))
            .await?
            .take(0)?;
        Ok(accounts.into_iter().next())
    }

    /// Find account by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(accounts.into_iter().next())
    }

    /// List all accounts, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(accounts)
    }

    /// Resolve an account for a verified identity, creating it on first
    /// login. Returns the account and whether it was created by this call.
    ///
    /// The unique indexes on `email` and `subject_id` make the first-login
    /// race safe: if two requests both miss the lookup and race to create,
    /// the loser gets a duplicate-key error and retries the lookup instead
    /// of surfacing it.
    pub async fn resolve_or_create(&self, data: AccountCreate) -> RepoResult<(Account, bool)> {
        if let Some(account) = self.find_by_subject(&data.subject_id).await? {
            return Ok((account, false));
        }
        if let Some(account) = self.find_by_email(&data.email).await? {
            return Ok((account, false));
        }

        let mut account = Account::new(
            data.subject_id.clone(),
            data.email.clone(),
            data.display_name,
        );
        account.photo_url = data.photo_url;

        let created: Result<Option<Account>, RepoError> = self
            .base
            .db()
            .create(ACCOUNT_TABLE)
            .content(account)
            .await
            .map_err(RepoError::from);

        match created {
            Ok(Some(account)) => Ok((account, true)),
            Ok(None) => Err(RepoError::Database(
                "Failed to create account".to_string(),
            )),
            // Lost the creation race; the winner's record exists now
            Err(RepoError::Duplicate(_)) => {
                if let Some(account) = self.find_by_subject(&data.subject_id).await? {
                    return Ok((account, false));
                }
                self.find_by_email(&data.email)
                    .await?
                    .map(|account| (account, false))
                    .ok_or_else(|| {
                        RepoError::Database(
                            "Account creation raced but winner not found".to_string(),
                        )
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Update profile fields
    pub async fn update_profile(&self, id: &str, data: ProfileUpdate) -> RepoResult<Account> {
        let thing = make_thing(ACCOUNT_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.display_name.is_some() {
            set_parts.push("display_name = $display_name");
        }
        if data.photo_url.is_some() {
            set_parts.push("photo_url = $photo_url");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("thing", thing));
        if let Some(v) = data.display_name {
            query = query.bind(("display_name", v));
        }
        if let Some(v) = data.photo_url {
            query = query.bind(("photo_url", v));
        }

        let accounts: Vec<Account> = query.await?.take(0)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Admin override: set the account role directly
    pub async fn set_role(&self, id: &str, role: Role) -> RepoResult<Account> {
        let thing = make_thing(ACCOUNT_TABLE, id);
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("UPDATE $thing SET role = $role RETURN AFTER")
            .bind(("thing", thing))
            .bind(("role", role))
            .await?
            .take(0)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Set the ban state. Ban fields are co-mutated: banning requires a
    /// reason and stamps the date, unbanning clears both.
    pub async fn set_ban_state(
        &self,
        id: &str,
        banned: bool,
        reason: Option<String>,
    ) -> RepoResult<Account> {
        let thing = make_thing(ACCOUNT_TABLE, id);

        let accounts: Vec<Account> = if banned {
            let reason = reason
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| {
                    RepoError::Validation("Banning an account requires a reason".to_string())
                })?;
            self.base
                .db()
                .query(
                    "UPDATE $thing SET banned = true, ban_reason = $reason, ban_date = $now \
                     RETURN AFTER",
                )
                .bind(("thing", thing))
                .bind(("reason", reason))
                .bind(("now", now_millis()))
                .await?
                .take(0)?
        } else {
            self.base
                .db()
                .query(
                    "UPDATE $thing SET banned = false, ban_reason = NONE, ban_date = NONE \
                     RETURN AFTER",
                )
                .bind(("thing", thing))
                .await?
                .take(0)?
        };

        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Append an order after a confirmed payment.
    ///
    /// Orders are append-only: nothing here can modify or remove an
    /// existing entry.
    pub async fn record_order(&self, subject_id: &str, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }
        if data.items.iter().any(|item| item.quantity == 0) {
            return Err(RepoError::Validation(
                "Order item quantity must be positive".to_string(),
            ));
        }
        if data.items.iter().any(|item| item.product_id.trim().is_empty()) {
            return Err(RepoError::Validation(
                "Order item product reference is required".to_string(),
            ));
        }
        if data.total_amount <= Decimal::ZERO {
            return Err(RepoError::Validation(
                "Order amount must be positive".to_string(),
            ));
        }
        if data.order_id.trim().is_empty() {
            return Err(RepoError::Validation(
                "Payment confirmation id is required".to_string(),
            ));
        }

        let account = self
            .find_by_subject(subject_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Account for {} not found", subject_id)))?;
        let account_id = account
            .id
            .ok_or_else(|| RepoError::Database("Account without id".to_string()))?;

        let order_items = data
            .items
            .into_iter()
            .map(|item| OrderItem {
                product: make_thing("product", &item.product_id),
                quantity: item.quantity,
            })
            .collect();
        let order = Order {
            order_id: data.order_id,
            order_items,
            total_amount: data.total_amount,
            status: OrderStatus::Pending,
            order_date: now_millis(),
        };

        self.base
            .db()
            .query("UPDATE $thing SET orders += $order")
            .bind(("thing", account_id))
            .bind(("order", order.clone()))
            .await?
            .check()?;

        Ok(order)
    }

    /// Add a product to the wishlist
    pub async fn add_wishlist(&self, id: &str, product: Thing) -> RepoResult<Account> {
        let account = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))?;
        if account.wishlist.contains(&product) {
            return Err(RepoError::Duplicate(
                "Product is already on the wishlist".to_string(),
            ));
        }

        let thing = make_thing(ACCOUNT_TABLE, id);
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("UPDATE $thing SET wishlist += $product RETURN AFTER")
            .bind(("thing", thing))
            .bind(("product", product))
            .await?
            .take(0)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Remove a product from the wishlist
    pub async fn remove_wishlist(&self, id: &str, product: Thing) -> RepoResult<Account> {
        let thing = make_thing(ACCOUNT_TABLE, id);
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("UPDATE $thing SET wishlist -= $product RETURN AFTER")
            .bind(("thing", thing))
            .bind(("product", product))
            .await?
            .take(0)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Persist the current refresh credential (None clears it)
    pub async fn set_refresh_token(
        &self,
        account_id: &Thing,
        token: Option<String>,
    ) -> RepoResult<()> {
        match token {
            Some(token) => {
                self.base
                    .db()
                    .query("UPDATE $thing SET refresh_token = $token")
                    .bind(("thing", account_id.clone()))
                    .bind(("token", token))
                    .await?
                    .check()?;
            }
            None => {
                self.base
                    .db()
                    .query("UPDATE $thing SET refresh_token = NONE")
                    .bind(("thing", account_id.clone()))
                    .await?
                    .check()?;
            }
        }
        Ok(())
    }

    /// Count accounts, optionally restricted to a role
    pub async fn count(&self, role: Option<Role>) -> RepoResult<u64> {
        let rows: Vec<CountRow> = match role {
            Some(role) => {
                self.base
                    .db()
                    .query("SELECT count() FROM account WHERE role = $role GROUP ALL")
                    .bind(("role", role))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT count() FROM account GROUP ALL")
                    .await?
                    .take(0)?
            }
        };
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }

    /// Total number of orders across all accounts
    pub async fn count_orders(&self) -> RepoResult<u64> {
        #[derive(serde::Deserialize)]
        struct Row {
            n: u64,
        }

        let rows: Vec<Row> = self
            .base
            .db()
            .query("SELECT array::len(orders) AS n FROM account")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.n).sum())
    }
}
