// Prompt constants and the per-student prompt builder for feedback generation.

use crate::feedback::level::LevelConfig;
use crate::models::student::StudentRecord;

/// System policy sent with every feedback request. Keeps the output literal,
/// classroom-only and short whatever the model's own tendencies.
pub const FEEDBACK_SYSTEM: &str = r#"You are an experienced English teacher writing short classroom feedback for students.

The feedback is:
- Written for the student to read
- Based only on classroom behaviour and language use
- Not a personality or character judgement

STRICT RULES:
- Do NOT analyse personality, motivation, confidence, or attitudes
- Do NOT use academic, counselling, or coaching language
- Do NOT exaggerate or reinterpret the inputs
- Treat all weaknesses as classroom behaviours
- Do NOT comment on appearance, clothing, or personal habits
- Use the Extra field only if it relates to classroom learning, participation, or interaction

PURPOSE:
- Acknowledge strengths (if provided)
- Identify areas to improve (if provided)
- Give clear, practical next steps (if provided)
- Add relevant context (only if Extra relates to learning)

STRUCTURE & LENGTH:
- 4-5 sentences total
- Maximum 20 words per sentence, fewer if the level requires it
- Each input field (Strength, Weakness, Suggestion, Extra) may produce 0-2 sentences
- If an input field is missing, skip it completely
- Use plain teacher language

TONE:
- Calm, fair, and direct
- Supportive without being emotional
- Professional classroom voice
- No emojis
- No exclamation marks
- No generic praise ("great job", "well done") unless the inputs support it

FORMAT:
- Start with the student's name, then a comma
- No greeting ("Dear...")
- No sign-off"#;

/// Closing line of every prompt.
pub const CLOSING_INSTRUCTION: &str =
    "Write the feedback now. 4-5 sentences total. Skip empty fields.";

/// Builds the user-turn prompt for one student.
///
/// `level_name` is printed on the LEVEL line as given; the CEFR band and
/// style guidance always come from `level`. Only non-blank fields are listed under INPUT DATA, always in the order
/// Strength, Weakness, Suggestion, Extra.
pub fn build_prompt(student: &StudentRecord, level: &LevelConfig, level_name: &str) -> String {
    let mut lines = vec![
        format!("STUDENT: {}", student.name.trim()),
        format!("LEVEL: {level_name} (CEFR {})", level.cefr),
        format!("LANGUAGE FOR THIS LEVEL: {}", level.style_guidance),
        String::new(),
        "INPUT DATA:".to_string(),
    ];

    let fields = [
        ("Strength", &student.good),
        ("Weakness", &student.bad),
        ("Suggestion", &student.suggestion),
        ("Extra", &student.extra),
    ];
    lines.extend(
        fields
            .iter()
            .map(|(label, value)| (label, value.trim()))
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| format!("{label}: {value}")),
    );

    lines.push(String::new());
    lines.push(CLOSING_INSTRUCTION.to_string());

    lines.join("\n")
}
