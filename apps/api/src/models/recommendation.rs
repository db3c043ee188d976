use chrono::NaiveDate;

use crate::models::roadmap::{MilestoneCategory, Resource};

/// Transient parsed output of the AI recommendations call. Converted into
/// Milestone/Resource records during roadmap ingestion and never persisted.
#[derive(Debug, Clone)]
pub struct AiRecommendation {
    pub title: String,
    pub description: String,
    pub grade_level: i64,
    pub category: MilestoneCategory,
    pub due_date: Option<NaiveDate>,
    pub resources: Vec<Resource>,
}
