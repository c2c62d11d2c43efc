//! Balance mutation primitives.
//!
//! Every write to `characters.gold_minor` / `characters.downtime` goes
//! through this module. The functions take any [`ConnectionTrait`] so they
//! run inside the caller's transaction.
//!
//! A checked debit is a single conditional `UPDATE`:
//!
//! ```text
//! UPDATE characters SET downtime = downtime - :amount
//!  WHERE id = :id AND downtime >= :amount
//! ```
//!
//! Zero affected rows means either the character is missing or the balance is
//! short; the row is then re-read to tell the two apart.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};
use tracing::debug;
use uuid::Uuid;

use crate::{Delta, EngineError, Resource, ResultEngine, characters};

fn column(resource: Resource) -> characters::Column {
    match resource {
        Resource::Gold => characters::Column::GoldMinor,
        Resource::Downtime => characters::Column::Downtime,
    }
}

async fn balance_of<C: ConnectionTrait>(
    conn: &C,
    character_id: Uuid,
    resource: Resource,
) -> ResultEngine<i64> {
    let model = characters::Entity::find_by_id(character_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("character not exists".to_string()))?;
    Ok(match resource {
        Resource::Gold => model.gold_minor,
        Resource::Downtime => model.downtime,
    })
}

/// Add `amount` to the balance without any floor check.
///
/// `amount` may be negative to express a fee bundled into a credit. A sum
/// outside the `i64` range is refused with `InvalidAmount`.
pub async fn credit<C: ConnectionTrait>(
    conn: &C,
    character_id: Uuid,
    amount: i64,
    resource: Resource,
) -> ResultEngine<()> {
    let current = balance_of(conn, character_id, resource).await?;
    if current.checked_add(amount).is_none() {
        return Err(EngineError::InvalidAmount(format!(
            "{resource} balance would overflow"
        )));
    }

    let col = column(resource);
    let result = characters::Entity::update_many()
        .col_expr(col, Expr::col(col).add(amount))
        .filter(characters::Column::Id.eq(character_id.to_string()))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(EngineError::KeyNotFound("character not exists".to_string()));
    }
    debug!(%character_id, %resource, amount, "credit");
    Ok(())
}

/// Subtract `amount` (> 0) from the balance, refusing to go below zero.
pub async fn debit_checked<C: ConnectionTrait>(
    conn: &C,
    character_id: Uuid,
    amount: i64,
    resource: Resource,
) -> ResultEngine<()> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(
            "debit amount must be > 0".to_string(),
        ));
    }

    let col = column(resource);
    let result = characters::Entity::update_many()
        .col_expr(col, Expr::col(col).sub(amount))
        .filter(characters::Column::Id.eq(character_id.to_string()))
        .filter(col.gte(amount))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let available = balance_of(conn, character_id, resource).await?;
        return Err(EngineError::InsufficientResource {
            resource,
            required: amount,
            available,
        });
    }
    debug!(%character_id, %resource, amount, "debit");
    Ok(())
}

/// Apply a signed change: costs are debited checked, gains are credited.
pub async fn apply_delta<C: ConnectionTrait>(
    conn: &C,
    character_id: Uuid,
    delta: Delta,
) -> ResultEngine<()> {
    match delta.amount {
        0 => Ok(()),
        amount if amount < 0 => {
            let cost = amount.checked_neg().ok_or_else(|| {
                EngineError::InvalidAmount(format!("{} change out of range", delta.resource))
            })?;
            debit_checked(conn, character_id, cost, delta.resource).await
        }
        amount => credit(conn, character_id, amount, delta.resource).await,
    }
}

/// Fail with `InsufficientResource` when `character_id` holds less than
/// `required`. Nothing is written.
pub(crate) async fn ensure_available<C: ConnectionTrait>(
    conn: &C,
    character_id: Uuid,
    required: i64,
    resource: Resource,
) -> ResultEngine<()> {
    let available = balance_of(conn, character_id, resource).await?;
    if available < required {
        return Err(EngineError::InsufficientResource {
            resource,
            required,
            available,
        });
    }
    Ok(())
}
