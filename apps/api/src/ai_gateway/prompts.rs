// Shared prompt fragments.
// Each task that calls the gateway defines its own templates in analysis/prompts.rs.
// This file contains cross-cutting fragments appended to those templates.

/// Appended to every structured-output prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "RETURN ONLY JSON. \
    Do NOT output markdown. \
    Do NOT use code fences. \
    Do NOT include any text outside the JSON object.";

/// Appended to every free-form prompt that is shown to the user verbatim.
pub const PLAIN_TEXT_ONLY_INSTRUCTION: &str = "Return ONLY the requested text. \
    No preamble, no headings, no markdown.";
