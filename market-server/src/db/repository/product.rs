//! Product Repository
//!
//! Catalog CRUD plus the moderation decision and the price-history
//! invariant: the previous price is pushed onto `price_history` in the
//! same transaction that overwrites `price`.

use super::{
    BaseRepository, CountRow, RepoError, RepoResult, make_thing, strip_table_prefix, txn_error,
};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::moderation::{Decision, Transition, apply_decision};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::util::now_millis;
use shared::{AvailabilityStatus, ModerationStatus, PaginatedResponse};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new product in `pending` moderation status
    pub async fn create(&self, owner: Thing, data: ProductCreate) -> RepoResult<Product> {
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation(
                "Product price must be non-negative".to_string(),
            ));
        }
        if data.stock < 0 {
            return Err(RepoError::Validation(
                "Product stock must be non-negative".to_string(),
            ));
        }

        let product = Product {
            id: None,
            owner,
            name: data.name,
            description: data.description,
            category: data.category,
            price: data.price,
            stock: data.stock,
            image: data.image,
            application_status: ModerationStatus::Pending,
            availability: AvailabilityStatus::Active,
            price_history: Vec::new(),
            reviews: Vec::new(),
            created_at: now_millis(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Publicly listable products: approved only, newest first, optional
    /// category filter.
    ///
    /// Without a page size the entire matching set is returned as one page
    /// — admin callers rely on this fallback.
    pub async fn list_approved(
        &self,
        category: Option<String>,
        page: u32,
        page_size: Option<u32>,
    ) -> RepoResult<PaginatedResponse<Product>> {
        let filter = match category {
            Some(_) => "application_status = 'approved' AND category = $category",
            None => "application_status = 'approved'",
        };

        let count_query = format!("SELECT count() FROM product WHERE {filter} GROUP ALL");
        let mut query = self.base.db().query(&count_query);
        if let Some(ref cat) = category {
            query = query.bind(("category", cat.clone()));
        }
        let rows: Vec<CountRow> = query.await?.take(0)?;
        let total = rows.into_iter().next().map(|r| r.count).unwrap_or(0);

        match page_size {
            Some(limit) => {
                let page = page.max(1);
                let start = (page - 1) as u64 * limit as u64;
                let data_query = format!(
                    "SELECT * FROM product WHERE {filter} ORDER BY created_at DESC \
                     LIMIT $limit START $start"
                );
                let mut query = self
                    .base
                    .db()
                    .query(&data_query)
                    .bind(("limit", limit as i64))
                    .bind(("start", start as i64));
                if let Some(cat) = category {
                    query = query.bind(("category", cat));
                }
                let products: Vec<Product> = query.await?.take(0)?;
                Ok(PaginatedResponse::new(products, total, page, limit))
            }
            None => {
                let data_query =
                    format!("SELECT * FROM product WHERE {filter} ORDER BY created_at DESC");
                let mut query = self.base.db().query(&data_query);
                if let Some(cat) = category {
                    query = query.bind(("category", cat));
                }
                let products: Vec<Product> = query.await?.take(0)?;
                Ok(PaginatedResponse::single_page(products))
            }
        }
    }

    /// Moderation queue: pending products, newest first
    pub async fn list_pending(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query(
                "SELECT * FROM product WHERE application_status = 'pending' \
                 ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(products)
    }

    /// All products owned by an account, newest first
    pub async fn list_by_owner(&self, owner: &Thing) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE owner = $owner ORDER BY created_at DESC")
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Update product details (not the price — see [`Self::update_price`])
    pub async fn update_details(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = make_thing(PRODUCT_TABLE, id);

        if let Some(stock) = data.stock
            && stock < 0
        {
            return Err(RepoError::Validation(
                "Product stock must be non-negative".to_string(),
            ));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("thing", thing));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.stock {
            query = query.bind(("stock", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Change the price, pushing the previous price onto the history in
    /// the same transaction. After N price changes the history holds
    /// exactly N entries and never the current price.
    pub async fn update_price(&self, id: &str, new_price: Decimal) -> RepoResult<Product> {
        if new_price < Decimal::ZERO {
            return Err(RepoError::Validation(
                "Product price must be non-negative".to_string(),
            ));
        }
        // Prices are stored as floats; bind the same representation
        let price = new_price.to_f64().ok_or_else(|| {
            RepoError::Validation("Product price is out of range".to_string())
        })?;

        let thing = make_thing(PRODUCT_TABLE, id);
        let mut response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $prod = (SELECT * FROM $thing);
                 IF array::len($prod) == 0 { THROW 'not_found: product' };
                 UPDATE $thing SET \
                     price_history += { price: $prod[0].price, changed_at: $now }, \
                     price = $price;
                 COMMIT TRANSACTION;",
            )
            .bind(("thing", thing))
            .bind(("price", price))
            .bind(("now", now_millis()))
            .await?;

        if let Some(err) = txn_error(&mut response) {
            return Err(err);
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Set the availability axis, independent of moderation status
    pub async fn set_availability(
        &self,
        id: &str,
        availability: AvailabilityStatus,
    ) -> RepoResult<Product> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let products: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $thing SET availability = $availability RETURN AFTER")
            .bind(("thing", thing))
            .bind(("availability", availability))
            .await?
            .take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Apply a moderation decision.
    ///
    /// Repeating the decision a product already carries returns it
    /// unchanged; the opposite decision on a decided product is a
    /// conflict.
    pub async fn decide(&self, id: &str, decision: Decision) -> RepoResult<Product> {
        let product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let target = match apply_decision(product.application_status, decision) {
            Transition::NoOp(_) => return Ok(product),
            Transition::Conflict(_) => {
                return Err(RepoError::Conflict(
                    "Product moderation has already been decided".to_string(),
                ));
            }
            Transition::Applied(target) => target,
        };

        let thing = make_thing(PRODUCT_TABLE, id);
        let mut response = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $prod = (SELECT * FROM $thing);
                 IF array::len($prod) == 0 { THROW 'not_found: product' };
                 IF $prod[0].application_status != 'pending' \
                     { THROW 'conflict: product moderation has already been decided' };
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
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete. A second delete of the same id is NotFound.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let result: Option<Product> = self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    /// Count products, optionally by owner and/or moderation status
    pub async fn count(
        &self,
        owner: Option<&Thing>,
        status: Option<ModerationStatus>,
    ) -> RepoResult<u64> {
        let mut filters: Vec<&str> = Vec::new();
        if owner.is_some() {
            filters.push("owner = $owner");
        }
        if status.is_some() {
            filters.push("application_status = $status");
        }

        let query_str = if filters.is_empty() {
            "SELECT count() FROM product GROUP ALL".to_string()
        } else {
            format!(
                "SELECT count() FROM product WHERE {} GROUP ALL",
                filters.join(" AND ")
            )
        };

        let mut query = self.base.db().query(&query_str);
        if let Some(owner) = owner {
            query = query.bind(("owner", owner.clone()));
        }
        if let Some(status) = status {
            query = query.bind(("status", status));
        }

        let rows: Vec<CountRow> = query.await?.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }
}
