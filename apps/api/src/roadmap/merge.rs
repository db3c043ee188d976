//! Roadmap merge logic — pure in-memory transforms applied to a
//! `CareerRoadmap` before persistence.
//!
//! Append preserves insertion order and performs no deduplication: repeated
//! generation can append duplicate-looking milestones, which is accepted
//! behavior. Update and remove locate elements by identifier and are silent
//! no-ops when nothing matches. Every effective mutation refreshes
//! `lastUpdated`.

use chrono::Utc;
use uuid::Uuid;

use crate::models::recommendation::AiRecommendation;
use crate::models::roadmap::{CareerRoadmap, Milestone, Resource};

impl CareerRoadmap {
    pub fn add_milestone(&mut self, milestone: Milestone) {
        self.milestones.push(milestone);
        self.touch();
    }

    /// Replaces the milestone with the same identifier in place. Not finding
    /// it is a silent no-op that leaves `lastUpdated` untouched.
    pub fn update_milestone(&mut self, milestone: Milestone) {
        if let Some(pos) = self.milestones.iter().position(|m| m.id == milestone.id) {
            self.milestones[pos] = milestone;
            self.touch();
        }
    }

    /// Removes every milestone matching the identifier (expected at most one).
    pub fn remove_milestone(&mut self, milestone_id: &str) {
        let before = self.milestones.len();
        self.milestones.retain(|m| m.id != milestone_id);
        if self.milestones.len() != before {
            self.touch();
        }
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
        self.touch();
    }

    pub fn update_resource(&mut self, resource: Resource) {
        if let Some(pos) = self.resources.iter().position(|r| r.id == resource.id) {
            self.resources[pos] = resource;
            self.touch();
        }
    }

    pub fn remove_resource(&mut self, resource_id: &str) {
        let before = self.resources.len();
        self.resources.retain(|r| r.id != resource_id);
        if self.resources.len() != before {
            self.touch();
        }
    }

    /// Bulk ingestion of parsed recommendations: all milestones first, in
    /// recommendation order, then all resources in
    /// recommendation-then-resource order.
    pub fn ingest_recommendations(&mut self, recommendations: Vec<AiRecommendation>) {
        for rec in &recommendations {
            self.add_milestone(Milestone {
                id: Uuid::new_v4().to_string(),
                title: rec.title.clone(),
                description: rec.description.clone(),
                due_date: rec.due_date,
                is_completed: false,
                grade_level: rec.grade_level,
                category: rec.category,
            });
        }
        for rec in recommendations {
            for resource in rec.resources {
                self.add_resource(resource);
            }
        }
    }

    /// Derived completion count.
    pub fn completed_milestone_count(&self) -> usize {
        self.milestones.iter().filter(|m| m.is_completed).count()
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
