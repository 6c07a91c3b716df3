use crate::auth::session::SessionStore;
use crate::db::{grades, users};
use crate::error::AppError;
use crate::models::User;
use rand::Rng;
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { user_iin: String },
}

/// Login/register/logout over the user repository and the session store.
/// Holds the process-wide answer to "who is signed in right now".
pub struct AuthService {
    pool: Pool<Sqlite>,
    sessions: SessionStore,
    state: AuthState,
}

impl AuthService {
    pub fn new(pool: Pool<Sqlite>, sessions: SessionStore) -> Self {
        Self {
            pool,
            sessions,
            state: AuthState::Unauthenticated,
        }
    }

    /// Startup rehydration: reads the session store once and trusts the
    /// recorded identity as-is. The secret is not re-verified.
    pub fn restore(pool: Pool<Sqlite>, sessions: SessionStore) -> Self {
        let state = match sessions.current_user() {
            Some(user_iin) => {
                info!(%user_iin, "Restored signed-in session");
                AuthState::Authenticated { user_iin }
            }
            None => AuthState::Unauthenticated,
        };

        Self {
            pool,
            sessions,
            state,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn current_user_iin(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { user_iin } => Some(user_iin),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// `Ok(None)` means the credentials did not match. That is an expected
    /// outcome the caller reports inline, not an error.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, iin: &str, password: &str) -> Result<Option<User>, AppError> {
        let result = self.login_inner(iin, password).await;
        if let Err(err) = &result {
            err.log_and_record("login");
        }
        result
    }

    async fn login_inner(&mut self, iin: &str, password: &str) -> Result<Option<User>, AppError> {
        info!("Login attempt");

        let Some(user) = users::find_by_credentials(&self.pool, iin, password).await? else {
            warn!("Invalid credentials");
            return Ok(None);
        };

        self.sessions.save_session(&user.iin)?;
        self.state = AuthState::Authenticated {
            user_iin: user.iin.clone(),
        };

        info!("Login successful");
        Ok(Some(user))
    }

    /// Creates the account, seeds one grade row per course year with a
    /// uniform random score, and signs the new user in.
    #[instrument(skip(self, password))]
    pub async fn register(
        &mut self,
        name: &str,
        iin: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let result = self.register_inner(name, iin, password).await;
        if let Err(err) = &result {
            err.log_and_record("register");
        }
        result
    }

    async fn register_inner(
        &mut self,
        name: &str,
        iin: &str,
        password: &str,
    ) -> Result<User, AppError> {
        info!("Registration attempt");

        if name.trim().is_empty() || iin.trim().is_empty() || password.trim().is_empty() {
            return Err(AppError::Validation(
                "all fields must be filled in".to_string(),
            ));
        }

        if users::find_by_iin(&self.pool, iin).await?.is_some() {
            return Err(AppError::Constraint(format!(
                "an account with IIN {} already exists",
                iin
            )));
        }

        // ThreadRng is not Send, so draw everything before the first await.
        let (course, scores) = {
            let mut rng = rand::rng();
            let course: i64 = rng.random_range(1..=4);
            let scores: Vec<i64> = (0..course).map(|_| rng.random_range(0..=100)).collect();
            (course, scores)
        };

        let user = users::insert_user(&self.pool, iin, name, password, course).await?;

        for (year, score) in scores.iter().enumerate() {
            grades::insert_grade(&self.pool, iin, *score, year as i64 + 1).await?;
        }

        self.sessions.save_session(iin)?;
        self.state = AuthState::Authenticated {
            user_iin: iin.to_string(),
        };

        info!(course, "Registration successful");
        Ok(user)
    }

    /// Idempotent; signing out twice is fine.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.sessions.clear_session()?;
        self.state = AuthState::Unauthenticated;
        info!("Signed out");
        Ok(())
    }
}
