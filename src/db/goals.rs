use crate::error::AppError;
use crate::models::{Goal, NewGoal};
use chrono::Utc;
use sqlx::{Pool, Sqlite};
use tracing::{debug, info, instrument};

fn check_progress(progress: i64) -> Result<(), AppError> {
    if !(0..=100).contains(&progress) {
        return Err(AppError::Validation(format!(
            "progress {} is outside the 0..=100 range",
            progress
        )));
    }
    Ok(())
}

#[instrument(skip(pool, goal))]
pub async fn insert_goal(pool: &Pool<Sqlite>, goal: &NewGoal) -> Result<i64, AppError> {
    info!("Inserting goal");
    check_progress(goal.progress)?;

    let res = sqlx::query(
        "INSERT INTO goals
         (user_iin, title, description, progress, deadline, mentor_comment, is_completed)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&goal.user_iin)
    .bind(&goal.title)
    .bind(&goal.description)
    .bind(goal.progress)
    .bind(goal.deadline)
    .bind(&goal.mentor_comment)
    .bind(goal.is_completed)
    .execute(pool)
    .await
    .map_err(|e| AppError::for_write(e, "goals"))?;

    Ok(res.last_insert_rowid())
}

/// Full-row replace keyed by `goal.id`. The owner is fixed at insert and is
/// not updatable. No-op when the id does not exist. `progress` and
/// `is_completed` stay independent; reaching 100 never flips the flag here.
#[instrument(skip(pool, goal), fields(goal_id = goal.id))]
pub async fn update_goal(pool: &Pool<Sqlite>, goal: &Goal) -> Result<(), AppError> {
    info!("Updating goal");
    check_progress(goal.progress)?;

    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "UPDATE goals
         SET title = ?, description = ?, progress = ?, deadline = ?,
             mentor_comment = ?, is_completed = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&goal.title)
    .bind(&goal.description)
    .bind(goal.progress)
    .bind(goal.deadline)
    .bind(&goal.mentor_comment)
    .bind(goal.is_completed)
    .bind(now)
    .bind(goal.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        debug!(goal_id = goal.id, "No goal row with this id, nothing updated");
    }
    Ok(())
}

/// Most recently updated first.
#[instrument(skip(pool))]
pub async fn goals_by_user(pool: &Pool<Sqlite>, user_iin: &str) -> Result<Vec<Goal>, AppError> {
    let goals = sqlx::query_as::<_, Goal>(
        "SELECT id, user_iin, title, description, progress, deadline,
                mentor_comment, is_completed, created_at, updated_at
         FROM goals
         WHERE user_iin = ?
         ORDER BY updated_at DESC",
    )
    .bind(user_iin)
    .fetch_all(pool)
    .await?;

    Ok(goals)
}

/// No-op when `goal_id` does not exist.
#[instrument(skip(pool))]
pub async fn delete_goal(pool: &Pool<Sqlite>, goal_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM goals WHERE id = ?")
        .bind(goal_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        debug!(goal_id, "No goal row with this id, nothing deleted");
    }
    Ok(())
}
