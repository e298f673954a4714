use super::request::{ContentIdeaRequest, Section};
use super::response::REQUESTED_IDEAS;

const PROMPT_INTRO: &str =
    "You are a marketing assistant for the website of a professional makeup artist's studio.";

pub const TOPIC_CLAUSE_PREFIX: &str = "Every idea must focus on this topic:";

const OUTPUT_INSTRUCTION: &str = "Respond only with a JSON object of the form \
{\"ideas\": [\"idea one\", \"idea two\", \"idea three\"]}, one short idea per string, \
with no commentary outside the JSON.";

fn section_focus(section: Section) -> &'static str {
    match section {
        Section::Hero => "Think headlines and taglines that make a first-time visitor book a session.",
        Section::Services => {
            "Think service descriptions and packages such as bridal, editorial, and event makeup."
        }
        Section::Gallery => "Think photo and video concepts that show off finished looks.",
        Section::Testimonials => {
            "Think ways to invite, frame, or highlight client reviews and transformations."
        }
    }
}

/// Renders the fixed prompt for a request.
pub fn render_prompt(request: &ContentIdeaRequest) -> String {
    let section = request.section();
    let mut prompt = format!(
        "{PROMPT_INTRO}\nGenerate exactly {REQUESTED_IDEAS} short, engaging content ideas for the \
         \"{section}\" section of the website. {}",
        section_focus(section)
    );

    if let Some(topic) = request.topic_constraint() {
        prompt.push('\n');
        prompt.push_str(TOPIC_CLAUSE_PREFIX);
        prompt.push_str(&format!(" \"{topic}\"."));
    }

    prompt.push('\n');
    prompt.push_str(OUTPUT_INSTRUCTION);
    prompt
}
