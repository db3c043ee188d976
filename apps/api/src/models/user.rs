//! User and Admin records with their store codecs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::store::document::{self, Document};
use crate::store::StoreError;

/// A student profile. The identifier is stable and equals the external auth
/// subject identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    /// Expected range 9-12.
    pub grade: i64,
    pub career_goal: String,
    pub school: String,
    pub location: String,
    pub interests: Vec<String>,
    /// Milestone identifier -> completion flag.
    pub progress: HashMap<String, bool>,
    /// Free-text AI recommendation strings, appended on each generation.
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_id: Option<String>,
}

impl User {
    /// Minimal profile created at first sign-in. Grade defaults to 9 until
    /// the profile-completion flow fills in the real fields.
    pub fn minimal(id: &str, display_name: &str, email: &str) -> Self {
        User {
            id: id.to_string(),
            display_name: display_name.to_string(),
            email: email.to_string(),
            grade: 9,
            career_goal: String::new(),
            school: String::new(),
            location: String::new(),
            interests: Vec::new(),
            progress: HashMap::new(),
            recommendations: Vec::new(),
            created_at: Utc::now(),
            district_id: None,
        }
    }

    pub fn from_doc(doc: &Document) -> Result<Self, StoreError> {
        Ok(User {
            id: document::require_str(doc, "id")?,
            display_name: document::require_str(doc, "displayName")?,
            email: document::require_str(doc, "email")?,
            grade: document::require_i64(doc, "grade")?,
            career_goal: document::require_str(doc, "careerGoal")?,
            school: document::require_str(doc, "school")?,
            location: document::require_str(doc, "location")?,
            interests: document::string_array(doc, "interests"),
            progress: document::bool_map(doc, "progress"),
            recommendations: document::string_array(doc, "recommendations"),
            created_at: document::require_timestamp(doc, "createdAt")?,
            district_id: document::optional_str(doc, "districtId"),
        })
    }

    pub fn to_doc(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!(self.id));
        doc.insert("displayName".to_string(), json!(self.display_name));
        doc.insert("email".to_string(), json!(self.email));
        doc.insert("grade".to_string(), json!(self.grade));
        doc.insert("careerGoal".to_string(), json!(self.career_goal));
        doc.insert("school".to_string(), json!(self.school));
        doc.insert("location".to_string(), json!(self.location));
        doc.insert("interests".to_string(), json!(self.interests));
        doc.insert("progress".to_string(), json!(self.progress));
        doc.insert("recommendations".to_string(), json!(self.recommendations));
        doc.insert("createdAt".to_string(), json!(self.created_at.to_rfc3339()));
        if let Some(district) = &self.district_id {
            doc.insert("districtId".to_string(), json!(district));
        }
        doc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminRole {
    DistrictAdmin,
    SchoolAdmin,
    SuperAdmin,
}

impl AdminRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "district-admin" => Some(Self::DistrictAdmin),
            "school-admin" => Some(Self::SchoolAdmin),
            "super-admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DistrictAdmin => "district-admin",
            Self::SchoolAdmin => "school-admin",
            Self::SuperAdmin => "super-admin",
        }
    }
}

/// District/school administrator. Created out-of-band; this service only
/// reads admins and edits their school list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub name: String,
    pub district_name: String,
    pub district_id: String,
    pub role: AdminRole,
    pub schools: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn from_doc(doc: &Document) -> Result<Self, StoreError> {
        // Role is a top-level required field: an unrecognized value fails
        // the whole decode rather than being dropped.
        let role = AdminRole::parse(&document::require_str(doc, "role")?)
            .ok_or_else(|| StoreError::Malformed("unrecognized admin role".to_string()))?;

        Ok(Admin {
            id: document::require_str(doc, "id")?,
            email: document::require_str(doc, "email")?,
            name: document::require_str(doc, "name")?,
            district_name: document::require_str(doc, "districtName")?,
            district_id: document::require_str(doc, "districtId")?,
            role,
            schools: document::string_array(doc, "schools"),
            created_at: document::require_timestamp(doc, "createdAt")?,
        })
    }

    pub fn to_doc(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!(self.id));
        doc.insert("email".to_string(), json!(self.email));
        doc.insert("name".to_string(), json!(self.name));
        doc.insert("districtName".to_string(), json!(self.district_name));
        doc.insert("districtId".to_string(), json!(self.district_id));
        doc.insert("role".to_string(), json!(self.role.as_str()));
        doc.insert("schools".to_string(), json!(self.schools));
        doc.insert("createdAt".to_string(), json!(self.created_at.to_rfc3339()));
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_doc() -> Document {
        json!({
            "id": "u1",
            "displayName": "Ada",
            "email": "ada@example.com",
            "grade": 10,
            "careerGoal": "Marine biologist",
            "school": "Northside High",
            "location": "Austin, TX",
            "interests": ["biology", "scuba"],
            "progress": {"m1": true},
            "recommendations": [],
            "createdAt": "2025-03-01T12:00:00Z"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_user_decode_full() {
        let user = User::from_doc(&user_doc()).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.grade, 10);
        assert_eq!(user.interests, vec!["biology", "scuba"]);
        assert_eq!(user.progress.get("m1"), Some(&true));
        assert_eq!(user.district_id, None);
    }

    #[test]
    fn test_user_decode_missing_grade_fails() {
        let mut doc = user_doc();
        doc.remove("grade");
        assert!(User::from_doc(&doc).is_err());
    }

    #[test]
    fn test_user_decode_mistyped_grade_fails() {
        let mut doc = user_doc();
        doc.insert("grade".to_string(), json!("ten"));
        assert!(User::from_doc(&doc).is_err());
    }

    #[test]
    fn test_user_encode_omits_absent_district() {
        let user = User::from_doc(&user_doc()).unwrap();
        let doc = user.to_doc();
        assert!(!doc.contains_key("districtId"));
    }

    #[test]
    fn test_user_encode_writes_district_when_present() {
        let mut user = User::from_doc(&user_doc()).unwrap();
        user.district_id = Some("d42".to_string());
        assert_eq!(user.to_doc().get("districtId"), Some(&json!("d42")));
    }

    #[test]
    fn test_minimal_user_defaults() {
        let user = User::minimal("u9", "Sam", "sam@example.com");
        assert_eq!(user.grade, 9);
        assert!(user.career_goal.is_empty());
        assert!(user.progress.is_empty());
        // A minimal profile still satisfies the strict decode.
        assert!(User::from_doc(&user.to_doc()).is_ok());
    }

    fn admin_doc() -> Document {
        json!({
            "id": "a1",
            "email": "admin@district.org",
            "name": "Pat",
            "districtName": "Austin ISD",
            "districtId": "d42",
            "role": "District-Admin",
            "schools": ["Northside High"],
            "createdAt": "2025-01-15T08:00:00Z"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_admin_decode_role_case_insensitive() {
        let admin = Admin::from_doc(&admin_doc()).unwrap();
        assert_eq!(admin.role, AdminRole::DistrictAdmin);
    }

    #[test]
    fn test_admin_decode_unknown_role_fails_whole_decode() {
        let mut doc = admin_doc();
        doc.insert("role".to_string(), json!("janitor"));
        assert!(Admin::from_doc(&doc).is_err());
    }
}
