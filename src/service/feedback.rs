use crate::config::Config;
use crate::db::models::FeedbackRecord;
use crate::db::sqlite::{ADMIN_PASSWORD_KEY, FeedbackStorage};
use crate::error::AppError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Aggregate statistics served by `/api/stats`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSummary {
    pub total: i64,
    pub positive: i64,
    pub medium: i64,
    pub negative: i64,
    pub average: f64,
    pub distribution: BTreeMap<i64, i64>,
}

#[derive(Clone)]
pub struct FeedbackService {
    storage: FeedbackStorage,
    config: Arc<Config>,
}

impl FeedbackService {
    pub fn new(storage: FeedbackStorage, config: Arc<Config>) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &FeedbackStorage {
        &self.storage
    }

    /// Validate and store a submission. Returns the new record id.
    pub async fn submit(
        &self,
        rating: i64,
        comment: &str,
        name: &str,
        email: &str,
    ) -> Result<i64, AppError> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        self.storage
            .insert_feedback(rating, comment, name, email)
            .await
    }

    pub async fn list(&self) -> Result<Vec<FeedbackRecord>, AppError> {
        self.storage.list_feedback().await
    }

    /// Current admin password, read from the store on every call so a
    /// change takes effect immediately for new login attempts.
    pub async fn current_admin_password(&self) -> Result<String, AppError> {
        Ok(self
            .storage
            .get_setting(ADMIN_PASSWORD_KEY)
            .await?
            .unwrap_or_else(|| self.config.admin_password.clone()))
    }

    pub async fn verify_admin_password(&self, candidate: &str) -> Result<bool, AppError> {
        let current = self.current_admin_password().await?;
        Ok(bool::from(candidate.as_bytes().ct_eq(current.as_bytes())))
    }

    pub async fn change_admin_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), AppError> {
        if current.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        if new != confirm {
            return Err(AppError::Validation(
                "New passwords do not match".to_string(),
            ));
        }
        if new.chars().count() < 4 {
            return Err(AppError::Validation(
                "Password must be at least 4 characters long".to_string(),
            ));
        }
        if !self.verify_admin_password(current).await? {
            return Err(AppError::Auth("Current password is incorrect".to_string()));
        }
        self.storage.set_setting(ADMIN_PASSWORD_KEY, new).await
    }

    pub async fn compute_stats(&self) -> Result<StatsSummary, AppError> {
        let summary = self.storage.rating_summary().await?;
        let distribution: BTreeMap<i64, i64> = self
            .storage
            .rating_distribution()
            .await?
            .into_iter()
            .collect();
        let average = summary
            .average
            .map(|avg| (avg * 100.0).round() / 100.0)
            .unwrap_or(0.0);

        Ok(StatsSummary {
            total: summary.total,
            positive: summary.positive,
            medium: summary.medium,
            negative: summary.negative,
            average,
            distribution,
        })
    }
}
