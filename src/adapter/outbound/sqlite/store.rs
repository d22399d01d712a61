//! SQLite subscription store implementation.
//!
//! Provides durable subscriber -> subscription storage using SQLite and
//! Diesel ORM. Writes go through a single lock; reads use any pooled
//! connection. Consumed proofs live in their own table and outlive the
//! subscriptions they bought.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Bool, Text};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{ConsumedProofRow, SubscriptionRow};
use crate::adapter::outbound::sqlite::database::schema::{consumed_proofs, subscriptions};
use crate::domain::{
    address::{TxHash, WalletAddress},
    id::SubscriberId,
    subscription::Subscription,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::SubscriptionStore;

impl From<DieselError> for Error {
    fn from(e: DieselError) -> Self {
        Self::Database(e.to_string())
    }
}

/// SQLite-backed subscription store.
///
/// Implements the [`SubscriptionStore`] trait. Timestamps are stored as
/// fixed-width RFC 3339 UTC strings so that text order is time order.
pub struct SqliteSubscriptionStore {
    pool: DbPool,
    write_lock: Mutex<()>,
}

impl SqliteSubscriptionStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn to_row(subscription: &Subscription) -> SubscriptionRow {
        SubscriptionRow {
            subscriber_id: subscription.subscriber.get(),
            wallet: subscription.wallet.as_str().to_string(),
            expires_at: format_time(subscription.expires_at),
            proof: subscription.proof.as_str().to_string(),
            registered_at: format_time(subscription.registered_at),
            amount: subscription.amount.to_string(),
        }
    }

    fn from_row(row: SubscriptionRow) -> Result<Subscription> {
        Ok(Subscription {
            subscriber: SubscriberId::new(row.subscriber_id),
            wallet: WalletAddress::parse(&row.wallet).map_err(|e| Error::Parse(e.to_string()))?,
            expires_at: parse_time(&row.expires_at)?,
            proof: TxHash::parse(&row.proof).map_err(|e| Error::Parse(e.to_string()))?,
            registered_at: parse_time(&row.registered_at)?,
            amount: Decimal::from_str(&row.amount).map_err(|e| Error::Parse(e.to_string()))?,
        })
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

#[async_trait]
impl SubscriptionStore for SqliteSubscriptionStore {
    async fn upsert(&self, subscription: &Subscription) -> Result<()> {
        let row = Self::to_row(subscription);
        let consumed = ConsumedProofRow {
            proof: row.proof.clone(),
            subscriber_id: row.subscriber_id,
            consumed_at: row.registered_at.clone(),
        };
        let _guard = self.write_lock.lock();
        let mut conn = self.conn()?;

        conn.transaction::<_, Error, _>(|conn| {
            diesel::insert_into(consumed_proofs::table)
                .values(&consumed)
                .on_conflict_do_nothing()
                .execute(conn)?;

            let owner: i64 = consumed_proofs::table
                .find(consumed.proof.as_str())
                .select(consumed_proofs::subscriber_id)
                .first(conn)?;
            if owner != row.subscriber_id {
                return Err(Error::ProofConsumed);
            }

            diesel::insert_into(subscriptions::table)
                .values(&row)
                .on_conflict(subscriptions::subscriber_id)
                .do_update()
                .set(&row)
                .execute(conn)
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        Error::WalletInUse
                    }
                    other => other.into(),
                })?;

            Ok(())
        })
    }

    async fn get(&self, subscriber: SubscriberId) -> Result<Option<Subscription>> {
        let mut conn = self.conn()?;

        let row: Option<SubscriptionRow> = subscriptions::table
            .find(subscriber.get())
            .select(SubscriptionRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Self::from_row).transpose()
    }

    async fn delete(&self, subscriber: SubscriberId) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let mut conn = self.conn()?;

        let deleted = diesel::delete(subscriptions::table.find(subscriber.get())).execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn list(&self) -> Result<Vec<Subscription>> {
        let mut conn = self.conn()?;

        let rows: Vec<SubscriptionRow> = subscriptions::table
            .order(subscriptions::expires_at.asc())
            .select(SubscriptionRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn find_by_proof(&self, proof: &TxHash) -> Result<Option<SubscriberId>> {
        let mut conn = self.conn()?;

        let owner: Option<i64> = consumed_proofs::table
            .find(proof.as_str())
            .select(consumed_proofs::subscriber_id)
            .first(&mut conn)
            .optional()?;

        Ok(owner.map(SubscriberId::new))
    }

    async fn find_by_wallet(&self, wallet: &WalletAddress) -> Result<Option<Subscription>> {
        let mut conn = self.conn()?;

        // Matches the case-insensitive unique index on wallet.
        let row: Option<SubscriptionRow> = subscriptions::table
            .filter(sql::<Bool>("lower(wallet) = ").bind::<Text, _>(wallet.to_lowercase()))
            .select(SubscriptionRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Self::from_row).transpose()
    }
}
