//! Recommendation text parser — turns a raw AI reply into domain records.
//!
//! Two reply shapes are handled:
//! - recommendations flow: a JSON object embedded anywhere in the reply,
//!   extracted greedily from the first `{` to the last `}` so prose or
//!   markdown fences around it are tolerated.
//! - full-roadmap flow: a line-oriented outline with category section
//!   headers, `[Grade N]` milestone tags and `[Type]` resource tags.
//!
//! Element-level failures (unrecognized category or type, bad due date) drop
//! the element and never fail the batch; only structural failures (no JSON
//! object, undecodable top-level shape) fail the whole call.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::ai_client::AiError;
use crate::models::recommendation::AiRecommendation;
use crate::models::roadmap::{
    Milestone, MilestoneCategory, Resource, ResourceCategory, ResourceType,
};

// ────────────────────────────────────────────────────────────────────────────
// Recommendations reply — structured JSON
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RecommendationEnvelope {
    recommendations: Vec<RawRecommendation>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    title: String,
    description: String,
    #[serde(rename = "gradeLevel")]
    grade_level: i64,
    category: String,
    #[serde(rename = "dueDate")]
    due_date: Option<String>,
    #[serde(default)]
    resources: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
struct RawResource {
    title: String,
    description: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "type")]
    resource_type: String,
}

/// Parses the recommendations reply.
///
/// Entries whose category does not resolve are dropped; nested resources
/// whose type does not resolve are dropped without taking the entry with
/// them. Every surviving resource gets a fresh identifier and is
/// categorized as "skill".
pub fn parse_recommendations(raw: &str) -> Result<Vec<AiRecommendation>, AiError> {
    let json_text = extract_json_object(raw)
        .ok_or_else(|| AiError::InvalidResponse("no JSON object in AI reply".to_string()))?;

    let envelope: RecommendationEnvelope = serde_json::from_str(json_text)
        .map_err(|e| AiError::InvalidResponse(format!("undecodable recommendations: {e}")))?;

    let mut parsed = Vec::new();
    for entry in envelope.recommendations {
        let RawRecommendation {
            title,
            description,
            grade_level,
            category,
            due_date,
            resources,
        } = entry;

        let category = match MilestoneCategory::parse(&category) {
            Some(c) => c,
            None => continue,
        };

        // A bad due date is non-fatal: the recommendation keeps a null date.
        let due_date = due_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        let resources = resources
            .into_iter()
            .filter_map(|r| {
                let resource_type = ResourceType::parse(&r.resource_type)?;
                Some(Resource {
                    id: Uuid::new_v4().to_string(),
                    title: r.title,
                    description: r.description,
                    url: r.url,
                    resource_type,
                    grade_level,
                    category: ResourceCategory::Skill,
                })
            })
            .collect();

        parsed.push(AiRecommendation {
            title,
            description,
            grade_level,
            category,
            due_date,
            resources,
        });
    }

    Ok(parsed)
}

/// Greedy brace-delimited extraction: first `{` to last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

// ────────────────────────────────────────────────────────────────────────────
// Full-roadmap reply — semi-structured outline text
// ────────────────────────────────────────────────────────────────────────────

/// Milestones and resources parsed from a full-roadmap outline.
#[derive(Debug, Default)]
pub struct ParsedOutline {
    pub milestones: Vec<Milestone>,
    pub resources: Vec<Resource>,
}

#[derive(Clone, Copy)]
enum Section {
    None,
    Category(MilestoneCategory),
    Resources,
}

/// Parses the full-roadmap outline reply.
///
/// `user_grade` fills in milestone and resource grade levels when a line
/// carries no `[Grade N]` tag. Lines before the first section header are
/// ignored.
pub fn parse_roadmap_outline(raw: &str, user_grade: i64) -> ParsedOutline {
    let mut outline = ParsedOutline::default();
    let mut section = Section::None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = match_section_header(line) {
            section = header;
            continue;
        }

        match section {
            Section::None => {}
            Section::Category(category) => {
                outline
                    .milestones
                    .push(parse_milestone_line(line, category, user_grade));
            }
            Section::Resources => {
                if let Some(resource) = parse_resource_line(line, user_grade) {
                    outline.resources.push(resource);
                }
            }
        }
    }

    outline
}

/// Keyword-containment header detection on the whole trimmed line.
/// First match wins in this fixed order.
fn match_section_header(line: &str) -> Option<Section> {
    let lower = line.to_lowercase();
    if lower.contains("academic") {
        return Some(Section::Category(MilestoneCategory::Academic));
    }
    if lower.contains("extracurricular") {
        return Some(Section::Category(MilestoneCategory::Extracurricular));
    }
    if lower.contains("skill") {
        return Some(Section::Category(MilestoneCategory::Skill));
    }
    if lower.contains("test") {
        return Some(Section::Category(MilestoneCategory::Test));
    }
    if lower.contains("application") {
        return Some(Section::Category(MilestoneCategory::Application));
    }
    if lower.contains("resource") {
        return Some(Section::Resources);
    }
    None
}

fn parse_milestone_line(line: &str, category: MilestoneCategory, default_grade: i64) -> Milestone {
    let (tagged_grade, rest) = extract_grade_tag(line);
    let rest = strip_bullet(&rest);
    let (title, description) = split_title_description(rest);

    Milestone {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        due_date: None,
        is_completed: false,
        grade_level: tagged_grade.unwrap_or(default_grade),
        category,
    }
}

/// A resource line must start with a bracketed type tag; an unrecognized tag
/// drops the line entirely.
fn parse_resource_line(line: &str, user_grade: i64) -> Option<Resource> {
    let line = strip_bullet(line);
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let resource_type = ResourceType::parse(&rest[..close])?;

    let (title, description) = split_title_description(rest[close + 1..].trim());
    let (url, description) = extract_url(&description);

    Some(Resource {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        url,
        resource_type,
        grade_level: user_grade,
        category: ResourceCategory::Skill,
    })
}

/// Extracts a `[Grade N]` tag anywhere in the line, returning the grade and
/// the line with the tag removed.
fn extract_grade_tag(line: &str) -> (Option<i64>, String) {
    if let Some(start) = line.find("[Grade") {
        if let Some(close) = line[start..].find(']') {
            let end = start + close;
            let digits: String = line[start..end]
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            if let Ok(grade) = digits.parse::<i64>() {
                let mut rest = String::with_capacity(line.len());
                rest.push_str(&line[..start]);
                rest.push_str(&line[end + 1..]);
                return (Some(grade), rest);
            }
        }
    }
    (None, line.to_string())
}

fn strip_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(&['-', '*', '•'][..]).trim_start()
}

/// First-colon split: text before is the title, text after the description.
fn split_title_description(text: &str) -> (String, String) {
    match text.split_once(':') {
        Some((title, description)) => (title.trim().to_string(), description.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

/// Pulls the first `http(s)://`-prefixed whitespace-delimited token out of
/// the text. Returns (url, remaining text); url is empty when absent.
fn extract_url(text: &str) -> (String, String) {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens
        .iter()
        .position(|t| t.starts_with("http://") || t.starts_with("https://"))
    {
        Some(pos) => {
            let url = tokens[pos].to_string();
            let remaining: Vec<&str> = tokens
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != pos)
                .map(|(_, t)| *t)
                .collect();
            (url, remaining.join(" "))
        }
        None => (String::new(), text.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Recommendations reply ──────────────────────────────────────────────────────────────

    const SINGLE_RECOMMENDATION: &str = r#"{"recommendations":[{"title":"T","description":"D","gradeLevel":10,"category":"academic","resources":[]}]}"#;

    #[test]
    fn test_recommendations_single_entry() {
        let recs = parse_recommendations(SINGLE_RECOMMENDATION).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "T");
        assert_eq!(recs[0].grade_level, 10);
        assert_eq!(recs[0].category, MilestoneCategory::Academic);
        assert!(recs[0].resources.is_empty());
        assert_eq!(recs[0].due_date, None);
    }

    #[test]
    fn test_recommendations_bogus_category_drops_entry() {
        let raw = SINGLE_RECOMMENDATION.replace("academic", "bogus");
        let recs = parse_recommendations(&raw).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_recommendations_tolerates_surrounding_prose_and_fences() {
        let raw = format!(
            "Sure! Here are my recommendations:\n```json\n{SINGLE_RECOMMENDATION}\n```\nLet me know if you need more."
        );
        let recs = parse_recommendations(&raw).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_recommendations_no_json_object_is_invalid_response() {
        let err = parse_recommendations("I could not produce anything useful.").unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }

    #[test]
    fn test_recommendations_undecodable_shape_is_invalid_response() {
        let err = parse_recommendations(r#"{"recommendations": "nope"}"#).unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }

    #[test]
    fn test_recommendations_preserves_input_order_of_resolvable_entries() {
        let raw = r#"{"recommendations":[
            {"title":"A","description":"","gradeLevel":9,"category":"academic","resources":[]},
            {"title":"B","description":"","gradeLevel":9,"category":"mystery","resources":[]},
            {"title":"C","description":"","gradeLevel":9,"category":"TEST","resources":[]}
        ]}"#;
        let recs = parse_recommendations(raw).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].title, "A");
        assert_eq!(recs[1].title, "C");
        assert_eq!(recs[1].category, MilestoneCategory::Test);
    }

    #[test]
    fn test_recommendations_due_date_parses_and_bad_date_is_null() {
        let raw = r#"{"recommendations":[
            {"title":"A","description":"","gradeLevel":9,"category":"academic","dueDate":"2026-05-01","resources":[]},
            {"title":"B","description":"","gradeLevel":9,"category":"academic","dueDate":"soon","resources":[]}
        ]}"#;
        let recs = parse_recommendations(raw).unwrap();
        assert_eq!(recs[0].due_date, NaiveDate::from_ymd_opt(2026, 5, 1));
        assert_eq!(recs[1].due_date, None);
    }

    #[test]
    fn test_recommendations_resource_type_drop_is_per_resource() {
        let raw = r#"{"recommendations":[{
            "title":"T","description":"D","gradeLevel":11,"category":"skill",
            "resources":[
                {"title":"Good","description":"","url":"https://x.org","type":"online"},
                {"title":"Bad","description":"","url":"","type":"podcast"}
            ]
        }]}"#;
        let recs = parse_recommendations(raw).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].resources.len(), 1);
        assert_eq!(recs[0].resources[0].title, "Good");
    }

    #[test]
    fn test_recommendations_resources_forced_to_skill_with_fresh_ids() {
        let raw = r#"{"recommendations":[{
            "title":"T","description":"D","gradeLevel":11,"category":"academic",
            "resources":[
                {"title":"R1","description":"","url":"","type":"book"},
                {"title":"R2","description":"","url":"","type":"video"}
            ]
        }]}"#;
        let recs = parse_recommendations(raw).unwrap();
        let resources = &recs[0].resources;
        assert_eq!(resources[0].category, ResourceCategory::Skill);
        assert_eq!(resources[1].category, ResourceCategory::Skill);
        assert_eq!(resources[0].grade_level, 11);
        assert_ne!(resources[0].id, resources[1].id);
    }

    #[test]
    fn test_extract_json_object_greedy() {
        assert_eq!(extract_json_object("x {\"a\":1} y {\"b\":2} z"), Some("{\"a\":1} y {\"b\":2}"));
        assert_eq!(extract_json_object("no braces"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    // ── Outline reply ──────────────────────────────────────────────────────────────

    #[test]
    fn test_outline_milestone_with_grade_tag() {
        let outline = parse_roadmap_outline("ACADEMIC\n- [Grade 10] Biology: Take honors biology", 9);
        assert_eq!(outline.milestones.len(), 1);
        let m = &outline.milestones[0];
        assert_eq!(m.category, MilestoneCategory::Academic);
        assert_eq!(m.grade_level, 10);
        assert_eq!(m.title, "Biology");
        assert_eq!(m.description, "Take honors biology");
        assert!(!m.is_completed);
        assert_eq!(m.due_date, None);
    }

    #[test]
    fn test_outline_milestone_without_grade_tag_defaults_to_user_grade() {
        let outline = parse_roadmap_outline("EXTRACURRICULAR\n- Debate club: Join this fall", 11);
        assert_eq!(outline.milestones[0].grade_level, 11);
        assert_eq!(outline.milestones[0].category, MilestoneCategory::Extracurricular);
    }

    #[test]
    fn test_outline_milestone_without_colon_has_empty_description() {
        let outline = parse_roadmap_outline("ACADEMIC\n- Join honors track", 9);
        assert_eq!(outline.milestones[0].title, "Join honors track");
        assert_eq!(outline.milestones[0].description, "");
    }

    #[test]
    fn test_outline_resource_line_with_url() {
        let outline = parse_roadmap_outline(
            "RESOURCES\n- [Online] Khan Academy: Free courses https://khanacademy.org",
            10,
        );
        assert_eq!(outline.resources.len(), 1);
        let r = &outline.resources[0];
        assert_eq!(r.resource_type, ResourceType::Online);
        assert_eq!(r.title, "Khan Academy");
        assert_eq!(r.description, "Free courses");
        assert_eq!(r.url, "https://khanacademy.org");
        assert_eq!(r.grade_level, 10);
        assert_eq!(r.category, ResourceCategory::Skill);
    }

    #[test]
    fn test_outline_resource_line_without_url() {
        let outline =
            parse_roadmap_outline("RESOURCES\n- [Book] Campbell Biology: The standard text", 10);
        assert_eq!(outline.resources[0].url, "");
        assert_eq!(outline.resources[0].description, "The standard text");
    }

    #[test]
    fn test_outline_unrecognized_resource_tag_drops_line() {
        let outline = parse_roadmap_outline("RESOURCES\n- [Podcast] Foo: bar", 10);
        assert!(outline.resources.is_empty());
    }

    #[test]
    fn test_outline_resource_line_without_tag_drops_line() {
        let outline = parse_roadmap_outline("RESOURCES\n- Khan Academy: Free courses", 10);
        assert!(outline.resources.is_empty());
    }

    #[test]
    fn test_outline_lines_before_first_header_are_ignored() {
        let outline = parse_roadmap_outline(
            "Here is your roadmap.\nBiology: honors track\nACADEMIC\n- Chemistry: Take AP chem",
            9,
        );
        assert_eq!(outline.milestones.len(), 1);
        assert_eq!(outline.milestones[0].title, "Chemistry");
    }

    #[test]
    fn test_outline_header_line_produces_no_record() {
        let outline = parse_roadmap_outline("ACADEMIC MILESTONES\nTESTING\nRESOURCES", 9);
        assert!(outline.milestones.is_empty());
        assert!(outline.resources.is_empty());
    }

    #[test]
    fn test_outline_header_keyword_order_is_first_match_wins() {
        // "Skill-building resources" matches "skill" before "resource".
        let outline = parse_roadmap_outline("Skill-building resources\n- Typing: Learn to type", 9);
        assert_eq!(outline.milestones.len(), 1);
        assert_eq!(outline.milestones[0].category, MilestoneCategory::Skill);
        assert!(outline.resources.is_empty());
    }

    #[test]
    fn test_outline_switches_sections() {
        let raw = "ACADEMIC\n- A: first\nTEST PREP\n- [Grade 12] SAT: Register early\nRESOURCES\n- [Tool] Anki: Flashcards";
        let outline = parse_roadmap_outline(raw, 9);
        assert_eq!(outline.milestones.len(), 2);
        assert_eq!(outline.milestones[0].category, MilestoneCategory::Academic);
        assert_eq!(outline.milestones[1].category, MilestoneCategory::Test);
        assert_eq!(outline.milestones[1].grade_level, 12);
        assert_eq!(outline.resources.len(), 1);
        assert_eq!(outline.resources[0].resource_type, ResourceType::Tool);
    }

    #[test]
    fn test_outline_blank_lines_skipped() {
        let outline = parse_roadmap_outline("ACADEMIC\n\n   \n- A: first\n", 9);
        assert_eq!(outline.milestones.len(), 1);
    }

    #[test]
    fn test_outline_empty_input_yields_nothing() {
        let outline = parse_roadmap_outline("", 9);
        assert!(outline.milestones.is_empty());
        assert!(outline.resources.is_empty());
    }

    #[test]
    fn test_grade_tag_extraction_strips_tag() {
        let (grade, rest) = extract_grade_tag("- [Grade 12] SAT: Register");
        assert_eq!(grade, Some(12));
        assert_eq!(rest, "-  SAT: Register");
    }

    #[test]
    fn test_grade_tag_without_digits_is_ignored() {
        let (grade, rest) = extract_grade_tag("- [Grade ?] SAT");
        assert_eq!(grade, None);
        assert_eq!(rest, "- [Grade ?] SAT");
    }

    #[test]
    fn test_extract_url_mid_description() {
        let (url, rest) = extract_url("Free https://x.org courses");
        assert_eq!(url, "https://x.org");
        assert_eq!(rest, "Free courses");
    }
}
