use crate::error::AppError;
use crate::models::{DbPortfolioItem, NewPortfolioItem, PortfolioCategory, PortfolioItem};
use chrono::Utc;
use sqlx::{Pool, Sqlite, Transaction};
use tracing::{debug, info, instrument};

/// Writes the row and its ordered tag list in one transaction, so a failed
/// tag insert never leaves a half-written item behind.
#[instrument(skip(pool, item))]
pub async fn insert_item(pool: &Pool<Sqlite>, item: &NewPortfolioItem) -> Result<i64, AppError> {
    info!("Inserting portfolio item");

    let mut tx = pool.begin().await?;

    let res = sqlx::query(
        "INSERT INTO portfolio_items
         (user_iin, title, description, category, image_url, date)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.user_iin)
    .bind(&item.title)
    .bind(&item.description)
    .bind(item.category.as_str())
    .bind(&item.image_url)
    .bind(item.date)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::for_write(e, "portfolio_items"))?;

    let item_id = res.last_insert_rowid();
    insert_tags(&mut tx, item_id, &item.tags).await?;

    tx.commit().await?;
    Ok(item_id)
}

/// Full-row replace keyed by `item.id`, tag list included. No-op when the id
/// does not exist.
#[instrument(skip(pool, item), fields(item_id = item.id))]
pub async fn update_item(pool: &Pool<Sqlite>, item: &PortfolioItem) -> Result<(), AppError> {
    info!("Updating portfolio item");

    let mut tx = pool.begin().await?;

    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "UPDATE portfolio_items
         SET title = ?, description = ?, category = ?, image_url = ?, date = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&item.title)
    .bind(&item.description)
    .bind(item.category.as_str())
    .bind(&item.image_url)
    .bind(item.date)
    .bind(now)
    .bind(item.id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        debug!(item_id = item.id, "No portfolio row with this id, nothing updated");
        tx.rollback().await?;
        return Ok(());
    }

    sqlx::query("DELETE FROM portfolio_tags WHERE portfolio_item_id = ?")
        .bind(item.id)
        .execute(&mut *tx)
        .await?;
    insert_tags(&mut tx, item.id, &item.tags).await?;

    tx.commit().await?;
    Ok(())
}

async fn insert_tags(
    tx: &mut Transaction<'_, Sqlite>,
    item_id: i64,
    tags: &[String],
) -> Result<(), AppError> {
    for (position, tag) in tags.iter().enumerate() {
        sqlx::query("INSERT INTO portfolio_tags (portfolio_item_id, position, tag) VALUES (?, ?, ?)")
            .bind(item_id)
            .bind(position as i64)
            .bind(tag)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Newest first by the item's own date, tags attached in stored order.
#[instrument(skip(pool))]
pub async fn items_by_user(
    pool: &Pool<Sqlite>,
    user_iin: &str,
) -> Result<Vec<PortfolioItem>, AppError> {
    let rows = sqlx::query_as::<_, DbPortfolioItem>(
        "SELECT id, user_iin, title, description, category, image_url, date,
                created_at, updated_at
         FROM portfolio_items
         WHERE user_iin = ?
         ORDER BY date DESC",
    )
    .bind(user_iin)
    .fetch_all(pool)
    .await?;

    attach_tags(pool, rows).await
}

#[instrument(skip(pool))]
pub async fn items_by_user_and_category(
    pool: &Pool<Sqlite>,
    user_iin: &str,
    category: PortfolioCategory,
) -> Result<Vec<PortfolioItem>, AppError> {
    let rows = sqlx::query_as::<_, DbPortfolioItem>(
        "SELECT id, user_iin, title, description, category, image_url, date,
                created_at, updated_at
         FROM portfolio_items
         WHERE user_iin = ? AND category = ?
         ORDER BY date DESC",
    )
    .bind(user_iin)
    .bind(category.as_str())
    .fetch_all(pool)
    .await?;

    attach_tags(pool, rows).await
}

async fn attach_tags(
    pool: &Pool<Sqlite>,
    rows: Vec<DbPortfolioItem>,
) -> Result<Vec<PortfolioItem>, AppError> {
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let tags = tags_for_item(pool, row.id).await?;
        items.push(row.into_item(tags)?);
    }
    Ok(items)
}

#[instrument(skip(pool))]
pub async fn tags_for_item(pool: &Pool<Sqlite>, item_id: i64) -> Result<Vec<String>, AppError> {
    let tags = sqlx::query_scalar::<_, String>(
        "SELECT tag FROM portfolio_tags WHERE portfolio_item_id = ? ORDER BY position",
    )
    .bind(item_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// No-op when `item_id` does not exist; tag rows cascade.
#[instrument(skip(pool))]
pub async fn delete_item(pool: &Pool<Sqlite>, item_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM portfolio_items WHERE id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        debug!(item_id, "No portfolio row with this id, nothing deleted");
    }
    Ok(())
}
