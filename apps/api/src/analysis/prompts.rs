// Prompt templates for the analysis tasks.
// Placeholders are `{name}` and are filled by `fill_template` before sending.

/// Fills `{name}` placeholders in one pass over `template`.
///
/// Inserted values are never scanned again, so a value that itself contains
/// `{resume_text}` or any other placeholder is copied through literally.
/// Braces that do not name a known placeholder (the JSON examples in the
/// templates) are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// System segment for résumé scoring.
pub const SCORING_SYSTEM: &str = r#"You are a Senior Technical Recruiter at a FAANG company with 15 years of experience.
You are critical, data-driven, and despise vague resume bullet points.

Your task is to analyze the provided resume text against the job description (if provided) or general software engineering standards.

Every score is an integer from 0 to 100.

Structure:
{
    "overallScore": number,
    "ATS": {
        "score": number,
        "tips": [{ "type": "good" | "improve", "tip": "string", "explanation": "string" }]
    },
    "content": {
        "score": number,
        "tips": [{ "type": "good" | "improve", "tip": "string", "explanation": "string" }]
    },
    "structure": {
        "score": number,
        "tips": [{ "type": "good" | "improve", "tip": "string", "explanation": "string" }]
    },
    "skills": {
        "score": number,
        "tips": [{ "type": "good" | "improve", "tip": "string", "explanation": "string" }]
    },
    "toneAndStyle": {
        "score": number,
        "tips": [{ "type": "good" | "improve", "tip": "string", "explanation": "string" }]
    },
    "keywordMatch": {
        "found": ["string"],
        "missing": ["string"]
    },
    "improvementSuggestions": [
        { "original": "string", "improved": "string", "reason": "string" }
    ]
}

{json_only}"#;

/// User segment for résumé scoring. Fills: {resume_text}, {job_section}.
pub const SCORING_USER_TEMPLATE: &str = r#"RESUME CONTENT:
{resume_text}

{job_section}

Think step-by-step:
1. Identify exact keywords from the JD (if present).
2. Check for metrics (numbers, %, $).
3. Evaluate formatting and readability.
4. Provide critical feedback."#;

/// Used in place of a job description when the user did not provide one.
pub const DEFAULT_TARGET_ROLE: &str = "TARGET ROLE: General Software Engineer";

/// Section rewriting. Fills: {job_description}, {original_text}.
pub const TAILOR_TEMPLATE: &str = r#"Act as a Professional Resume Writer. Rewrite the following resume section to better match the Job Description.

JOB DESCRIPTION KEYWORDS:
{job_description}

ORIGINAL TEXT:
"{original_text}"

EXAMPLES:
Bad: "Worked on API."
Good: "Engineered a RESTful API serving 10k+ daily requests, optimizing latency by 40% using Redis caching."

TASK:
Rewrite the text to be more impactful, using active verbs and metrics.
{plain_text_only}"#;

/// Interview questions. Fills: {resume_text}.
pub const INTERVIEW_TEMPLATE: &str = r#"Based on this resume, generate 5 challenging technical interview questions that probe the candidate's WEAKEST areas or vaguely described projects.

RESUME:
{resume_text}

Return JSON:
{
    "questions": [
        { "question": "string", "context": "string (why this question acts as a probe)" }
    ]
}

{json_only}"#;

/// Cover letter. Fills: {job_description}, {resume_text}.
pub const COVER_LETTER_TEMPLATE: &str = r#"Act as a professional candidate applying for a job. Write a compelling cover letter based on my resume and the job description.

JOB DESCRIPTION:
{job_description}

MY RESUME:
{resume_text}

REQUIREMENTS:
- distinct paragraphs (Intro, Why Me, Closing)
- Professional but enthusiastic tone
- Highlight specific achievements from my resume that match the JD
- Do not use placeholders like [Your Name], use "the candidate" if name is missing or generic.

{plain_text_only}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        let out = fill_template("{a} and {a}, then {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x, then y");
    }

    #[test]
    fn test_fill_template_does_not_rescan_inserted_values() {
        let out = fill_template(
            "JD: {job}\nRESUME: {resume}",
            &[("job", "see {resume} and {json_only}"), ("resume", "RRR")],
        );
        assert_eq!(out, "JD: see {resume} and {json_only}\nRESUME: RRR");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let out = fill_template("{\n  \"questions\": []\n}\n{x}", &[("x", "done")]);
        assert_eq!(out, "{\n  \"questions\": []\n}\ndone");
    }

    #[test]
    fn test_fill_template_handles_unclosed_brace_and_multibyte_text() {
        let out = fill_template("résumé {name} {open", &[("name", "Zoë")]);
        assert_eq!(out, "résumé Zoë {open");
    }

    #[test]
    fn test_templates_fill_completely() {
        let filled = fill_template(
            COVER_LETTER_TEMPLATE,
            &[
                ("job_description", "jd"),
                ("resume_text", "cv"),
                ("plain_text_only", "plain"),
            ],
        );
        assert!(!filled.contains("{job_description}"));
        assert!(!filled.contains("{resume_text}"));
        assert!(!filled.contains("{plain_text_only}"));
    }
}
