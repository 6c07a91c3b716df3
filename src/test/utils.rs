use crate::auth::SessionStore;
use crate::database;
use crate::db::{goals, grades, portfolio, users};
use crate::error::AppError;
use crate::models::{NewGoal, NewPortfolioItem, PortfolioCategory};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();
pub static STANDARD_PASSWORD: &str = "password123";
pub const TEST_DEADLINE: i64 = 1_767_225_600; // 2026-01-01T00:00:00Z

#[derive(Default)]
pub struct TestDbBuilder {
    users: Vec<TestUser>,
    grades: Vec<TestGrade>,
    goals: Vec<TestGoal>,
    items: Vec<TestItem>,
}

struct TestUser {
    iin: String,
    name: String,
    password: String,
    course: i64,
}

struct TestGrade {
    user_iin: String,
    score: i64,
    course: i64,
}

struct TestGoal {
    user_iin: String,
    title: String,
    progress: i64,
}

struct TestItem {
    user_iin: String,
    title: String,
    category: PortfolioCategory,
    tags: Vec<String>,
}

impl TestDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, iin: &str, name: &str, course: i64) -> Self {
        self.users.push(TestUser {
            iin: iin.to_string(),
            name: name.to_string(),
            password: STANDARD_PASSWORD.to_string(),
            course,
        });
        self
    }

    pub fn student_with_password(
        mut self,
        iin: &str,
        name: &str,
        course: i64,
        password: &str,
    ) -> Self {
        self.users.push(TestUser {
            iin: iin.to_string(),
            name: name.to_string(),
            password: password.to_string(),
            course,
        });
        self
    }

    pub fn grade(mut self, user_iin: &str, score: i64, course: i64) -> Self {
        self.grades.push(TestGrade {
            user_iin: user_iin.to_string(),
            score,
            course,
        });
        self
    }

    pub fn goal(mut self, user_iin: &str, title: &str, progress: i64) -> Self {
        self.goals.push(TestGoal {
            user_iin: user_iin.to_string(),
            title: title.to_string(),
            progress,
        });
        self
    }

    pub fn portfolio_item(
        mut self,
        user_iin: &str,
        title: &str,
        category: PortfolioCategory,
        tags: &[&str],
    ) -> Self {
        self.items.push(TestItem {
            user_iin: user_iin.to_string(),
            title: title.to_string(),
            category,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub async fn build(self) -> Result<TestDb, AppError> {
        INIT.call_once(|| {
            let _ = env_logger::builder().is_test(true).try_init();
        });

        // Single connection so every handle sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        database::apply_schema(&pool).await?;

        for user in &self.users {
            users::insert_user(&pool, &user.iin, &user.name, &user.password, user.course).await?;
        }

        let mut grade_ids = Vec::new();
        for grade in &self.grades {
            let id =
                grades::insert_grade(&pool, &grade.user_iin, grade.score, grade.course).await?;
            grade_ids.push(id);
        }

        let mut goal_id_map = HashMap::new();
        for goal in &self.goals {
            let id = goals::insert_goal(
                &pool,
                &NewGoal {
                    user_iin: goal.user_iin.clone(),
                    title: goal.title.clone(),
                    description: format!("{} description", goal.title),
                    progress: goal.progress,
                    deadline: TEST_DEADLINE,
                    mentor_comment: None,
                    is_completed: false,
                },
            )
            .await?;
            goal_id_map.insert(goal.title.clone(), id);
        }

        let mut item_id_map = HashMap::new();
        for (idx, item) in self.items.iter().enumerate() {
            let id = portfolio::insert_item(
                &pool,
                &NewPortfolioItem {
                    user_iin: item.user_iin.clone(),
                    title: item.title.clone(),
                    description: format!("{} description", item.title),
                    category: item.category,
                    image_url: format!("file:///portfolio/{}.png", idx),
                    date: TEST_DEADLINE + idx as i64,
                    tags: item.tags.clone(),
                },
            )
            .await?;
            item_id_map.insert(item.title.clone(), id);
        }

        Ok(TestDb {
            pool,
            grade_ids,
            goal_id_map,
            item_id_map,
        })
    }
}

pub struct TestDb {
    pub pool: Pool<Sqlite>,
    pub grade_ids: Vec<i64>,
    goal_id_map: HashMap<String, i64>,
    item_id_map: HashMap<String, i64>,
}

impl TestDb {
    pub fn goal_id(&self, title: &str) -> Option<i64> {
        self.goal_id_map.get(title).copied()
    }

    pub fn item_id(&self, title: &str) -> Option<i64> {
        self.item_id_map.get(title).copied()
    }
}

/// Session store backed by a throwaway directory. Keep the `TempDir` alive
/// for as long as the store is in use.
pub fn temp_session_store() -> (TempDir, SessionStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = SessionStore::open(dir.path().join("session.json"));
    (dir, store)
}
