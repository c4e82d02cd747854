//! Prompt templates and the feedback-driven prompt adjustment.
//!
//! The snapshot is passed in by the caller on every request; nothing here
//! caches it.

use feedback::AggregateSnapshot;

pub const LATEST_TRENDS: &str = "AI, Blockchain, Quantum Computing";

const LOW_RATING: f64 = 3.0;

pub fn recommendation_prompt(project: &str, snapshot: &AggregateSnapshot) -> String {
    let mut prompt = format!(
        "Recommend a tech stack for the following project: {}\n\
         Answer with a comma-separated list of technologies only.",
        project.trim()
    );
    push_adjustments(&mut prompt, snapshot);
    prompt
}

pub fn prioritization_prompt(project: &str, snapshot: &AggregateSnapshot) -> String {
    let mut prompt = format!(
        "Break the following project into a prioritized list of tasks, most important first, \
         one task per line: {}",
        project.trim()
    );
    push_adjustments(&mut prompt, snapshot);
    prompt
}

pub fn chat_prompt(message: &str) -> String {
    format!("Chat with the user: {message}")
}

fn push_adjustments(prompt: &mut String, snapshot: &AggregateSnapshot) {
    if !snapshot.top_feedback.is_empty() {
        let said: Vec<&str> = snapshot
            .top_feedback
            .iter()
            .map(|c| c.feedback.as_str())
            .collect();
        prompt.push_str("\nPrevious users said about these answers: ");
        prompt.push_str(&said.join("; "));
        prompt.push_str(". Address these concerns.");
    }
    if snapshot.average_rating > 0.0 && snapshot.average_rating < LOW_RATING {
        prompt.push_str("\nRecent answers were rated poorly, so be specific and detailed.");
    }
}

/// Split a completion into stack items on commas and line breaks.
pub fn split_stack(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(clean_item)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a completion into tasks, one per line or sentence.
pub fn split_tasks(text: &str) -> Vec<String> {
    text.lines()
        .flat_map(|line| line.split(". "))
        .map(clean_item)
        .filter(|s| !s.is_empty())
        .collect()
}

// strips list markers: "- x", "* x", "3. x", "3) x"
fn clean_item(raw: &str) -> String {
    let s = raw
        .trim()
        .trim_start_matches(['-', '*', '•'])
        .trim_start();

    let s = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(i) if i > 0 && s[i..].starts_with(['.', ')']) => s[i + 1..].trim_start(),
        _ => s,
    };

    s.trim_end_matches('.').trim().to_string()
}
