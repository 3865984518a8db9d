use kindred_types::models::Entry;

/// System prompt sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a warm, knowledgeable relationship guide inside a \
glossary app for couples. Explain concepts plainly, stay non-judgmental and inclusive, \
offer one or two concrete ideas a couple could try, and suggest professional support when \
a question involves safety, abuse or a crisis. Keep answers under 200 words unless asked \
for more.";

/// Opening request for a deep dive on one glossary entry.
pub fn deep_dive_prompt(entry: &Entry) -> String {
    let mut prompt = format!(
        "Tell me more about \"{}\" ({}). The glossary says: {}",
        entry.name, entry.category, entry.description
    );
    if !entry.tags.is_empty() {
        let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
        prompt.push_str(&format!(" Related themes: {}.", tags.join(", ")));
    }
    prompt.push_str(" How can we explore this together?");
    prompt
}
