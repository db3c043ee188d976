//! Prompt constants and builders for the roadmap AI calls.

use crate::models::roadmap::CareerRoadmap;
use crate::models::user::User;

/// System instruction shared by both AI calls.
pub const GUIDANCE_COUNSELOR_SYSTEM: &str = "You are an experienced high-school guidance \
    counselor helping a student plan toward a career goal. \
    Give concrete, age-appropriate steps tied to the student's grade level. \
    Follow the requested output format exactly.";

/// Recommendations prompt (structured JSON reply).
/// Replace: {grade}, {career_goal}, {interests}, {completed}
pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"A student needs new roadmap recommendations.

Student profile:
- Grade: {grade}
- Career goal: {career_goal}
- Interests: {interests}
- Already completed milestones: {completed}

Suggest 3 to 5 new milestones the student should work on next. Do not repeat
completed milestones.

Respond with a JSON object with this EXACT schema (no extra fields):
{
  "recommendations": [
    {
      "title": "Take AP Biology",
      "description": "Enroll in AP Biology to build a science foundation",
      "gradeLevel": 10,
      "category": "academic",
      "dueDate": "2026-05-01",
      "resources": [
        {
          "title": "Khan Academy Biology",
          "description": "Free video course",
          "url": "https://khanacademy.org",
          "type": "online"
        }
      ]
    }
  ]
}

Rules:
- "category" must be one of: academic, extracurricular, skill, test, application
- "type" must be one of: online, book, video, course, tool
- "dueDate" is optional; when present use YYYY-MM-DD
- "gradeLevel" must be between 9 and 12"#;

/// Full-roadmap prompt (outline text reply).
/// Replace: {grade}, {career_goal}, {interests}
pub const ROADMAP_OUTLINE_PROMPT_TEMPLATE: &str = r#"Build a complete career roadmap for a student.

Student profile:
- Grade: {grade}
- Career goal: {career_goal}
- Interests: {interests}

Write the roadmap as plain text sections. Start each section with one of these
headers on its own line: ACADEMIC, EXTRACURRICULAR, SKILLS, TESTS,
APPLICATIONS, RESOURCES.

Under each milestone section, write one milestone per line as:
- [Grade N] Title: short description

Under RESOURCES, write one resource per line as:
- [Type] Title: short description and an optional https:// link
where Type is one of: Online, Book, Video, Course, Tool."#;

pub fn build_recommendations_prompt(user: &User, roadmap: &CareerRoadmap) -> String {
    let completed: Vec<&str> = roadmap
        .milestones
        .iter()
        .filter(|m| m.is_completed)
        .map(|m| m.title.as_str())
        .collect();

    RECOMMENDATIONS_PROMPT_TEMPLATE
        .replace("{grade}", &user.grade.to_string())
        .replace("{career_goal}", goal_or_placeholder(&user.career_goal))
        .replace("{interests}", &list_or_placeholder(&user.interests))
        .replace(
            "{completed}",
            &if completed.is_empty() {
                "none yet".to_string()
            } else {
                completed.join(", ")
            },
        )
}

pub fn build_roadmap_outline_prompt(user: &User) -> String {
    ROADMAP_OUTLINE_PROMPT_TEMPLATE
        .replace("{grade}", &user.grade.to_string())
        .replace("{career_goal}", goal_or_placeholder(&user.career_goal))
        .replace("{interests}", &list_or_placeholder(&user.interests))
}

fn goal_or_placeholder(goal: &str) -> &str {
    if goal.trim().is_empty() {
        "undecided"
    } else {
        goal
    }
}

fn list_or_placeholder(items: &[String]) -> String {
    if items.is_empty() {
        "none listed".to_string()
    } else {
        items.join(", ")
    }
}
