//! Conversions between database models and API types

use surrealdb::sql::Thing;

use crate::db::models::Account;
use shared::client::AccountInfo;

/// Render a record id as its `table:id` string form
pub fn thing_to_string(thing: &Thing) -> String {
    thing.to_string()
}

/// Map an account onto the client-facing shape (never exposes the
/// refresh credential)
pub fn account_info(account: &Account) -> AccountInfo {
    AccountInfo {
        id: account
            .id
            .as_ref()
            .map(thing_to_string)
            .unwrap_or_default(),
        email: account.email.clone(),
        display_name: account.display_name.clone(),
        photo_url: account.photo_url.clone(),
        role: account.role,
        banned: account.banned,
        created_at: account.created_at,
    }
}
