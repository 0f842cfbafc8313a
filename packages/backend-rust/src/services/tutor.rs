//! Kindergarten tutor prompt and output shaping

pub const TUTOR_SYSTEM_PROMPT: &str = "You are an expert Kindergarten Teacher. \
Give a VERY SHORT answer (1-2 sentences). \
Do NOT repeat yourself. Stop talking after the answer.";

pub const FALLBACK_ANSWER: &str = "A is for Apple 🍎. B is for Ball 🏀. Let's try again later!";

/// Answers shorter than this are treated as failures
pub const MIN_ANSWER_CHARS: usize = 5;

/// Phrases that start an endless praise loop
const PRAISE_LOOP_PHRASES: [&str; 6] = [
    "Perfect work!",
    "Fantastic!",
    "You're a superstar!",
    "Incredible job!",
    "You're amazing!",
    "Bravo!",
];

const SPEAKER_PREFIX: &str = "Teacher:";
const GREETING: &str = "Hello little one!";
const CLOSING: &str = "... Wasn't that fun?";

/// Keep only the text before the first praise loop, minus any echoed
/// speaker label
pub fn clean_tutor_response(text: &str) -> String {
    let text = match text.rfind(SPEAKER_PREFIX) {
        Some(idx) => &text[idx + SPEAKER_PREFIX.len()..],
        None => text,
    };
    let cut = PRAISE_LOOP_PHRASES
        .iter()
        .filter_map(|phrase| text.find(phrase))
        .min()
        .unwrap_or(text.len());
    text[..cut].trim().to_string()
}

/// Cleaned answer, or `None` when too short to serve
pub fn usable_answer(raw: &str) -> Option<String> {
    let cleaned = clean_tutor_response(raw);
    if cleaned.chars().count() < MIN_ANSWER_CHARS {
        None
    } else {
        Some(cleaned)
    }
}

const CHAT_SYSTEM_PROMPT: &str = "You are Learning Buddy, a friendly helper for children aged 3-6 \
using the Smart Learning System.

Features you can talk about:
- 3D AI Teacher: a friendly animated character that talks and teaches
- Voice recognition: children speak and practice pronunciation
- Lessons: ABCs, Numbers, Shapes, Colors, Poems and a Drawing Board
- Progress tracking with stars and points

Guidelines:
- Use short, simple sentences
- Be warm and encouraging
- Add a fun emoji or two
- Only talk about learning and the features above";

const DEFAULT_PAGE: &str = "general learning page";

pub const CHAT_DEFAULT_REPLY: &str = "I'm here to help you learn! 🌟 Try asking about our 3D teacher, \
voice system, or ABC lessons! What would you like to explore?";

/// Canned replies matched by substring against the lowercased message, first hit wins
const CHAT_KEYWORD_REPLIES: [(&str, &str); 11] = [
    ("3d", "We have an amazing 3D AI Teacher! 🤖 It's a friendly character that teaches with animations and talks to you! Try the 'AI Teacher' page to see it!"),
    ("voice", "Our voice system lets you speak and practice! 🗣️ Just talk and the system will listen and help you learn pronunciation!"),
    ("draw", "The Drawing Board is so much fun! 🎨 You can draw shapes, colors, and be creative! Find it in the learning menu!"),
    ("learn", "Let's learn together! 📚 We have ABCs, Numbers, Shapes, Colors, and fun Poems! Which one would you like to try?"),
    ("abc", "ABC lessons are so fun! 🔤 We learn letters with games and sounds. A is for Apple, B is for Ball! Ready to learn?"),
    ("number", "Numbers are everywhere! 🔢 Let's count 1, 2, 3 and play counting games together!"),
    ("shape", "Shapes are all around us! 🔺 We have circles, squares, triangles! Can you find shapes in your room?"),
    ("color", "Colors make the world beautiful! 🌈 Let's learn red, blue, green, and all the rainbow colors!"),
    ("help", "I can help you explore our Smart Learning System! 🚀 We have 3D teacher, voice practice, drawing, and fun lessons! What would you like to know?"),
    ("hi", "Hello! 👋 I'm Learning Buddy! I can tell you about our 3D teacher, voice system, and all the fun learning games! What would you like to explore?"),
    ("hello", "Hi there! 🌟 Welcome to Smart Learning! We have so many fun ways to learn - 3D characters, voice games, drawing, and more!"),
];

/// System prompt for the learning buddy, aware of the page the child is on
pub fn chat_system_prompt(current_page: Option<&str>) -> String {
    let page = current_page
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PAGE);
    format!("{CHAT_SYSTEM_PROMPT}\n\nThe child is currently on the {page}.")
}

/// Canned reply for the first keyword found in the message
pub fn keyword_reply(message: &str) -> Option<&'static str> {
    let lowered = message.to_lowercase();
    CHAT_KEYWORD_REPLIES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, reply)| *reply)
}

pub fn poem_prompt(topic: &str) -> String {
    format!(
        "Write a short, simple, and joyful poem for a toddler (age 2-6) about: {topic}\n\n\
Make it:\n\
- 4-6 lines long\n\
- Use simple words\n\
- Include rhymes\n\
- Make it fun and educational\n\n\
Topic: {topic}"
    )
}

/// Slow the narration down for small children: pauses after every full
/// stop, blank lines dropped, a greeting and a closing line added
pub fn make_text_baby_friendly(text: &str) -> String {
    let body = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.replace('.', "... "))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{GREETING} {body} {CLOSING}")
}
