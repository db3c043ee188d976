//! Career roadmap aggregate: CareerRoadmap with nested Milestone and
//! Resource records, plus the closed category/type enumerations.
//!
//! Encode/decode follows the store contract: decode is strict and
//! all-or-nothing per record; encode always succeeds and omits absent
//! optional fields. When decoding the nested lists, a record with an
//! unrecognized enumeration value or a bad mandatory field is dropped
//! without failing the whole roadmap.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::store::document::{self, Document};
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneCategory {
    Academic,
    Extracurricular,
    Skill,
    Test,
    Application,
}

impl MilestoneCategory {
    /// Case-insensitive match against the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "academic" => Some(Self::Academic),
            "extracurricular" => Some(Self::Extracurricular),
            "skill" => Some(Self::Skill),
            "test" => Some(Self::Test),
            "application" => Some(Self::Application),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Extracurricular => "extracurricular",
            Self::Skill => "skill",
            Self::Test => "test",
            Self::Application => "application",
        }
    }
}

/// Resource categories overlap milestone categories by name but are a
/// distinct enumeration ("career" exists here, "extracurricular" does not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Academic,
    Skill,
    Test,
    Application,
    Career,
}

impl ResourceCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "academic" => Some(Self::Academic),
            "skill" => Some(Self::Skill),
            "test" => Some(Self::Test),
            "application" => Some(Self::Application),
            "career" => Some(Self::Career),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Skill => "skill",
            Self::Test => "test",
            Self::Application => "application",
            Self::Career => "career",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Online,
    Book,
    Video,
    Course,
    Tool,
}

impl ResourceType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "online" => Some(Self::Online),
            "book" => Some(Self::Book),
            "video" => Some(Self::Video),
            "course" => Some(Self::Course),
            "tool" => Some(Self::Tool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Book => "book",
            Self::Video => "video",
            Self::Course => "course",
            Self::Tool => "tool",
        }
    }
}

/// A single actionable roadmap task tied to a grade level and category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub grade_level: i64,
    pub category: MilestoneCategory,
}

impl Milestone {
    pub fn from_doc(doc: &Document) -> Result<Self, StoreError> {
        let category = MilestoneCategory::parse(&document::require_str(doc, "category")?)
            .ok_or_else(|| StoreError::Malformed("unrecognized milestone category".to_string()))?;

        Ok(Milestone {
            id: document::require_str(doc, "id")?,
            title: document::require_str(doc, "title")?,
            description: document::require_str(doc, "description")?,
            due_date: document::optional_date(doc, "dueDate"),
            is_completed: document::require_bool(doc, "isCompleted")?,
            grade_level: document::require_i64(doc, "gradeLevel")?,
            category,
        })
    }

    pub fn to_doc(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!(self.id));
        doc.insert("title".to_string(), json!(self.title));
        doc.insert("description".to_string(), json!(self.description));
        if let Some(due) = self.due_date {
            doc.insert("dueDate".to_string(), json!(due.format("%Y-%m-%d").to_string()));
        }
        doc.insert("isCompleted".to_string(), json!(self.is_completed));
        doc.insert("gradeLevel".to_string(), json!(self.grade_level));
        doc.insert("category".to_string(), json!(self.category.as_str()));
        doc
    }
}

/// A referenced external learning asset tied to a grade level.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Possibly the empty string when the source text carried no link.
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub grade_level: i64,
    pub category: ResourceCategory,
}

impl Resource {
    pub fn from_doc(doc: &Document) -> Result<Self, StoreError> {
        let resource_type = ResourceType::parse(&document::require_str(doc, "type")?)
            .ok_or_else(|| StoreError::Malformed("unrecognized resource type".to_string()))?;
        let category = ResourceCategory::parse(&document::require_str(doc, "category")?)
            .ok_or_else(|| StoreError::Malformed("unrecognized resource category".to_string()))?;

        Ok(Resource {
            id: document::require_str(doc, "id")?,
            title: document::require_str(doc, "title")?,
            description: document::require_str(doc, "description")?,
            url: document::require_str(doc, "url")?,
            resource_type,
            grade_level: document::require_i64(doc, "gradeLevel")?,
            category,
        })
    }

    pub fn to_doc(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!(self.id));
        doc.insert("title".to_string(), json!(self.title));
        doc.insert("description".to_string(), json!(self.description));
        doc.insert("url".to_string(), json!(self.url));
        doc.insert("type".to_string(), json!(self.resource_type.as_str()));
        doc.insert("gradeLevel".to_string(), json!(self.grade_level));
        doc.insert("category".to_string(), json!(self.category.as_str()));
        doc
    }
}

/// The full collection of a user's milestones and resources toward a career
/// goal. At most one roadmap exists per user, enforced by the query pattern
/// (`userId` equality, limit 1), not a store constraint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRoadmap {
    pub id: String,
    pub user_id: String,
    pub career_goal: String,
    pub grade: i64,
    pub milestones: Vec<Milestone>,
    pub resources: Vec<Resource>,
    pub last_updated: DateTime<Utc>,
}

impl CareerRoadmap {
    /// Fresh empty roadmap for a user, denormalizing goal and grade.
    pub fn new(user_id: &str, career_goal: &str, grade: i64) -> Self {
        CareerRoadmap {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            career_goal: career_goal.to_string(),
            grade,
            milestones: Vec::new(),
            resources: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn from_doc(doc: &Document) -> Result<Self, StoreError> {
        let milestones = decode_list(document::require_array(doc, "milestones")?, Milestone::from_doc);
        let resources = decode_list(document::require_array(doc, "resources")?, Resource::from_doc);

        Ok(CareerRoadmap {
            id: document::require_str(doc, "id")?,
            user_id: document::require_str(doc, "userId")?,
            career_goal: document::require_str(doc, "careerGoal")?,
            grade: document::require_i64(doc, "grade")?,
            milestones,
            resources,
            last_updated: document::require_timestamp(doc, "lastUpdated")?,
        })
    }

    pub fn to_doc(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!(self.id));
        doc.insert("userId".to_string(), json!(self.user_id));
        doc.insert("careerGoal".to_string(), json!(self.career_goal));
        doc.insert("grade".to_string(), json!(self.grade));
        doc.insert(
            "milestones".to_string(),
            Value::Array(self.milestones.iter().map(|m| Value::Object(m.to_doc())).collect()),
        );
        doc.insert(
            "resources".to_string(),
            Value::Array(self.resources.iter().map(|r| Value::Object(r.to_doc())).collect()),
        );
        doc.insert("lastUpdated".to_string(), json!(self.last_updated.to_rfc3339()));
        doc
    }
}

/// Per-element decode for nested lists: records that fail the strict decode
/// (including unrecognized enumeration values) are dropped, not the list.
fn decode_list<T>(
    items: &[Value],
    decode: impl Fn(&Document) -> Result<T, StoreError>,
) -> Vec<T> {
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|doc| decode(doc).ok())
        .collect()
}
