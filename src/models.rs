use crate::error::AppError;
use anyhow::Error;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered student. The IIN (national identity number) is the primary
/// key; every other record in the store is owned by exactly one user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub iin: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub course: i64,
}

/// One course-year score for a user. Seeded at registration, one row per
/// course year, and individually updatable afterwards.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Grade {
    pub id: i64,
    pub user_iin: String,
    pub score: i64,
    pub course: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Goal {
    pub id: i64,
    pub user_iin: String,
    pub title: String,
    pub description: String,
    pub progress: i64,
    pub deadline: i64,
    pub mentor_comment: Option<String>,
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Goal fields supplied by the caller; the row id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_iin: String,
    pub title: String,
    pub description: String,
    pub progress: i64,
    pub deadline: i64,
    pub mentor_comment: Option<String>,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioCategory {
    Project,
    Certificate,
    Diploma,
}

impl PortfolioCategory {
    pub fn as_str(&self) -> &str {
        match self {
            PortfolioCategory::Project => "project",
            PortfolioCategory::Certificate => "certificate",
            PortfolioCategory::Diploma => "diploma",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "project" => Ok(PortfolioCategory::Project),
            "certificate" => Ok(PortfolioCategory::Certificate),
            "diploma" => Ok(PortfolioCategory::Diploma),
            _ => Err(Error::msg(format!("Unknown portfolio category: {}", s))),
        }
    }
}

impl fmt::Display for PortfolioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioItem {
    pub id: i64,
    pub user_iin: String,
    pub title: String,
    pub description: String,
    pub category: PortfolioCategory,
    pub image_url: String,
    pub date: i64,
    /// Free-text labels in the order the user arranged them.
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPortfolioItem {
    pub user_iin: String,
    pub title: String,
    pub description: String,
    pub category: PortfolioCategory,
    pub image_url: String,
    pub date: i64,
    pub tags: Vec<String>,
}

/// Raw `portfolio_items` row; tags live in their own table and are attached
/// after the fact.
#[derive(sqlx::FromRow, Clone)]
pub(crate) struct DbPortfolioItem {
    pub id: i64,
    pub user_iin: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub date: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DbPortfolioItem {
    pub(crate) fn into_item(self, tags: Vec<String>) -> Result<PortfolioItem, AppError> {
        let category = PortfolioCategory::from_str(&self.category)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(PortfolioItem {
            id: self.id,
            user_iin: self.user_iin,
            title: self.title,
            description: self.description,
            category,
            image_url: self.image_url,
            date: self.date,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
