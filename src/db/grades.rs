use crate::error::AppError;
use crate::models::Grade;
use sqlx::{Pool, Sqlite};
use tracing::{debug, info, instrument};

fn check_score(score: i64) -> Result<(), AppError> {
    if !(0..=100).contains(&score) {
        return Err(AppError::Validation(format!(
            "score {} is outside the 0..=100 range",
            score
        )));
    }
    Ok(())
}

#[instrument(skip(pool))]
pub async fn insert_grade(
    pool: &Pool<Sqlite>,
    user_iin: &str,
    score: i64,
    course: i64,
) -> Result<i64, AppError> {
    info!("Inserting grade");
    check_score(score)?;

    let res = sqlx::query("INSERT INTO grades (user_iin, score, course) VALUES (?, ?, ?)")
        .bind(user_iin)
        .bind(score)
        .bind(course)
        .execute(pool)
        .await
        .map_err(|e| AppError::for_write(e, "grades"))?;

    Ok(res.last_insert_rowid())
}

/// Ordered by course year for stable display; callers must not rely on it.
#[instrument(skip(pool))]
pub async fn grades_by_user(pool: &Pool<Sqlite>, user_iin: &str) -> Result<Vec<Grade>, AppError> {
    let grades = sqlx::query_as::<_, Grade>(
        "SELECT id, user_iin, score, course FROM grades WHERE user_iin = ? ORDER BY course",
    )
    .bind(user_iin)
    .fetch_all(pool)
    .await?;

    Ok(grades)
}

#[instrument(skip(pool))]
pub async fn delete_grades_by_user(pool: &Pool<Sqlite>, user_iin: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM grades WHERE user_iin = ?")
        .bind(user_iin)
        .execute(pool)
        .await?;

    info!(rows_affected = result.rows_affected(), "Deleted grades");
    Ok(())
}

/// No-op when `grade_id` does not exist.
#[instrument(skip(pool))]
pub async fn update_grade_score(
    pool: &Pool<Sqlite>,
    grade_id: i64,
    score: i64,
) -> Result<(), AppError> {
    info!("Updating grade score");
    check_score(score)?;

    let result = sqlx::query("UPDATE grades SET score = ? WHERE id = ?")
        .bind(score)
        .bind(grade_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        debug!(grade_id, "No grade row with this id, nothing updated");
    }
    Ok(())
}
