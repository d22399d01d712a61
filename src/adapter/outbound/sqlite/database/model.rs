//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{consumed_proofs, subscriptions};

/// Database row for a subscription.
///
/// Timestamps are RFC 3339 UTC strings and the amount is a decimal string.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = subscriptions)]
#[diesel(primary_key(subscriber_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionRow {
    pub subscriber_id: i64,
    pub wallet: String,
    pub expires_at: String,
    pub proof: String,
    pub registered_at: String,
    pub amount: String,
}

/// A payment proof that has bought a subscription. Never deleted.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = consumed_proofs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ConsumedProofRow {
    pub proof: String,
    pub subscriber_id: i64,
    pub consumed_at: String,
}
