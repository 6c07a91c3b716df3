use crate::error::AppError;
use crate::models::User;
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

#[instrument(skip(pool, password))]
pub async fn insert_user(
    pool: &Pool<Sqlite>,
    iin: &str,
    name: &str,
    password: &str,
    course: i64,
) -> Result<User, AppError> {
    info!("Creating user");

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

    sqlx::query("INSERT INTO users (iin, name, password_hash, course) VALUES (?, ?, ?, ?)")
        .bind(iin)
        .bind(name)
        .bind(&password_hash)
        .bind(course)
        .execute(pool)
        .await
        .map_err(|e| AppError::for_write(e, "users"))?;

    Ok(User {
        iin: iin.to_string(),
        name: name.to_string(),
        password_hash,
        course,
    })
}

/// Returns the user only when the IIN exists and the secret verifies against
/// the stored hash. Any mismatch is `None`, never an error.
#[instrument(skip(pool, password))]
pub async fn find_by_credentials(
    pool: &Pool<Sqlite>,
    iin: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    info!("Checking credentials");

    let user = sqlx::query_as::<_, User>(
        "SELECT iin, name, password_hash, course FROM users WHERE iin = ?",
    )
    .bind(iin)
    .fetch_optional(pool)
    .await?;

    match user {
        Some(user) => match bcrypt::verify(password, &user.password_hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(_) => Ok(None),
        },
        None => Ok(None),
    }
}

#[instrument(skip(pool))]
pub async fn find_by_iin(pool: &Pool<Sqlite>, iin: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT iin, name, password_hash, course FROM users WHERE iin = ?",
    )
    .bind(iin)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Removes the user row; grades, goals and portfolio items (and their tags)
/// go with it via cascade. No-op when the IIN does not exist.
#[instrument(skip(pool))]
pub async fn delete_user(pool: &Pool<Sqlite>, iin: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE iin = ?")
        .bind(iin)
        .execute(pool)
        .await?;

    info!(
        rows_affected = result.rows_affected(),
        "Deleted user account"
    );
    Ok(())
}
