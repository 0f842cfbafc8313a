//! Multiple-choice quiz generation: LLM first, static question bank second

use serde::{Deserialize, Serialize};

use crate::services::llm_provider::{ChatMessage, ChatOptions, LLMError, LLMProvider};

pub const DEFAULT_TOPIC: &str = "mixed";
pub const DEFAULT_DIFFICULTY: &str = "Easy";
pub const QUESTIONS_PER_QUIZ: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
}

impl QuizQuestion {
    fn is_valid(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() >= 2
            && self.options.iter().any(|o| o == &self.answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizSource {
    Llm,
    StaticBank,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQuiz {
    pub questions: Vec<QuizQuestion>,
    pub source: QuizSource,
}

pub fn build_quiz_prompt(topic: &str, difficulty: &str) -> String {
    format!(
        r#"You are a Kindergarten Teacher API.
Create {QUESTIONS_PER_QUIZ} multiple-choice questions for a child about: {topic}.
Difficulty: {difficulty}.

CRITICAL RULES:
1. Output ONLY valid JSON. No text before or after.
2. Use simple English suitable for a 5-year-old.
3. Use Emojis in every question (e.g. "Count the stars ⭐").
4. "answer" must be EXACTLY one of the "options".

REQUIRED JSON STRUCTURE:
{{"questions": [
    {{
        "question": "What color is the sun? ☀️",
        "options": ["Blue", "Yellow", "Red", "Green"],
        "answer": "Yellow",
        "skill": "Recognition"
    }}
]}}"#
    )
}

/// Questions from model output: a bare array, or an object holding one.
/// Invalid questions are dropped; `None` when nothing usable remains.
pub fn extract_questions(content: &str) -> Option<Vec<QuizQuestion>> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(content)).ok()?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.into_iter().find_map(|(_, v)| match v {
            serde_json::Value::Array(items) => Some(items),
            _ => None,
        })?,
        _ => return None,
    };

    let questions: Vec<QuizQuestion> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<QuizQuestion>(item).ok())
        .filter(QuizQuestion::is_valid)
        .collect();

    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches("json");
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub async fn generate_with_llm(
    llm: &LLMProvider,
    topic: &str,
    difficulty: &str,
) -> Result<Option<Vec<QuizQuestion>>, LLMError> {
    let messages = [ChatMessage::system(build_quiz_prompt(topic, difficulty))];
    let options = ChatOptions {
        temperature: Some(0.5),
        max_tokens: Some(1024),
        json_mode: true,
    };
    let content = llm.complete(&messages, options).await?;
    Ok(extract_questions(&content))
}

/// LLM quiz, falling back to the question bank on any failure
pub async fn generate_quiz(llm: &LLMProvider, topic: &str, difficulty: &str) -> GeneratedQuiz {
    if llm.is_available() {
        match generate_with_llm(llm, topic, difficulty).await {
            Ok(Some(questions)) => {
                return GeneratedQuiz {
                    questions,
                    source: QuizSource::Llm,
                }
            }
            Ok(None) => tracing::warn!(topic, "LLM quiz JSON unusable, using question bank"),
            Err(err) => tracing::warn!(topic, error = %err, "LLM quiz generation failed, using question bank"),
        }
    }

    GeneratedQuiz {
        questions: static_questions(topic),
        source: QuizSource::StaticBank,
    }
}

// ==================== Question bank ====================

type BankEntry = (&'static str, [&'static str; 4], &'static str);

const BANK: [(&str, [BankEntry; QUESTIONS_PER_QUIZ]); 9] = [
    ("abc", [
        ("Which letter does Apple 🍎 start with?", ["A", "B", "C", "D"], "A"),
        ("Which letter does Ball 🏀 start with?", ["D", "B", "P", "E"], "B"),
        ("Which letter does Cat 🐱 start with?", ["K", "S", "C", "T"], "C"),
        ("Which letter comes after A? 🔤", ["C", "B", "Z", "D"], "B"),
        ("Which letter does Dog 🐶 start with?", ["B", "G", "O", "D"], "D"),
    ]),
    ("numbers", [
        ("How many stars? ⭐⭐⭐", ["2", "3", "4", "5"], "3"),
        ("How many apples? 🍎🍎", ["1", "2", "3", "4"], "2"),
        ("What comes after 4? 🔢", ["3", "6", "5", "7"], "5"),
        ("How many balloons? 🎈", ["1", "2", "0", "3"], "1"),
        ("How many fingers on one hand? ✋", ["4", "5", "6", "10"], "5"),
    ]),
    ("colors", [
        ("What color is the sun? ☀️", ["Blue", "Yellow", "Red", "Green"], "Yellow"),
        ("What color is grass? 🌱", ["Green", "Pink", "Black", "Blue"], "Green"),
        ("What color is a strawberry? 🍓", ["Purple", "White", "Red", "Yellow"], "Red"),
        ("What color is the sky? ☁️", ["Orange", "Blue", "Brown", "Red"], "Blue"),
        ("What color is an orange? 🍊", ["Orange", "Green", "Blue", "Pink"], "Orange"),
    ]),
    ("shapes", [
        ("Which shape is round like a ball? ⚽", ["Square", "Circle", "Triangle", "Star"], "Circle"),
        ("How many sides does a triangle have? 🔺", ["2", "3", "4", "5"], "3"),
        ("Which shape has four equal sides? 🟦", ["Circle", "Heart", "Square", "Oval"], "Square"),
        ("What shape twinkles in the sky? ⭐", ["Star", "Square", "Circle", "Triangle"], "Star"),
        ("What shape is a slice of pizza? 🍕", ["Circle", "Triangle", "Square", "Star"], "Triangle"),
    ]),
    ("fruits", [
        ("Which fruit is yellow and long? 🍌", ["Apple", "Banana", "Grapes", "Cherry"], "Banana"),
        ("Which fruit is red and round? 🍎", ["Apple", "Banana", "Lemon", "Pear"], "Apple"),
        ("Which fruit grows in bunches? 🍇", ["Mango", "Grapes", "Apple", "Kiwi"], "Grapes"),
        ("Which fruit is sour and yellow? 🍋", ["Lemon", "Cherry", "Plum", "Grapes"], "Lemon"),
        ("Which fruit is big and green outside, red inside? 🍉", ["Apple", "Watermelon", "Banana", "Peach"], "Watermelon"),
    ]),
    ("veg", [
        ("Which vegetable is orange and crunchy? 🥕", ["Carrot", "Potato", "Onion", "Pea"], "Carrot"),
        ("Which vegetable looks like a little tree? 🥦", ["Corn", "Broccoli", "Tomato", "Carrot"], "Broccoli"),
        ("Which vegetable is yellow with many kernels? 🌽", ["Corn", "Pea", "Cabbage", "Carrot"], "Corn"),
        ("Which vegetable is small, round and green? 🟢", ["Potato", "Pea", "Onion", "Pumpkin"], "Pea"),
        ("Which vegetable makes you cry when you cut it? 🧅", ["Onion", "Carrot", "Corn", "Lettuce"], "Onion"),
    ]),
    ("animals", [
        ("Which animal says Moo? 🐄", ["Dog", "Cow", "Cat", "Duck"], "Cow"),
        ("Which animal says Woof? 🐶", ["Dog", "Sheep", "Horse", "Frog"], "Dog"),
        ("Which animal has a long trunk? 🐘", ["Lion", "Monkey", "Elephant", "Zebra"], "Elephant"),
        ("Which animal hops and says Ribbit? 🐸", ["Frog", "Cat", "Bird", "Fish"], "Frog"),
        ("Which animal is the king of the jungle? 🦁", ["Tiger", "Lion", "Bear", "Rabbit"], "Lion"),
    ]),
    ("body", [
        ("What do you see with? 👀", ["Ears", "Eyes", "Nose", "Hands"], "Eyes"),
        ("What do you hear with? 👂", ["Ears", "Feet", "Mouth", "Eyes"], "Ears"),
        ("What do you smell with? 👃", ["Hands", "Knees", "Nose", "Hair"], "Nose"),
        ("What do you walk with? 🦶", ["Feet", "Ears", "Nose", "Eyes"], "Feet"),
        ("How many hands do you have? 🙌", ["1", "2", "3", "4"], "2"),
    ]),
    ("days", [
        ("Which day comes after Monday? 📅", ["Sunday", "Tuesday", "Friday", "Thursday"], "Tuesday"),
        ("How many days are in a week? 🗓️", ["5", "6", "7", "10"], "7"),
        ("Which day comes before Saturday? 📆", ["Friday", "Sunday", "Monday", "Wednesday"], "Friday"),
        ("Which is the first day of the school week? 🎒", ["Monday", "Saturday", "Sunday", "Friday"], "Monday"),
        ("Which day comes after Saturday? 🌞", ["Friday", "Tuesday", "Sunday", "Monday"], "Sunday"),
    ]),
];

fn to_question(entry: &BankEntry, skill: &str) -> QuizQuestion {
    let (question, options, answer) = entry;
    QuizQuestion {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
        skill: Some(skill.to_string()),
    }
}

/// Bank questions for `topic`. Unknown topics get a mixed quiz with one
/// question from each of the first topics.
pub fn static_questions(topic: &str) -> Vec<QuizQuestion> {
    let topic = topic.trim().to_lowercase();
    if let Some((name, entries)) = BANK.iter().find(|(name, _)| *name == topic) {
        return entries.iter().map(|e| to_question(e, name)).collect();
    }
    BANK.iter()
        .take(QUESTIONS_PER_QUIZ)
        .enumerate()
        .map(|(i, (name, entries))| to_question(&entries[i % entries.len()], name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::services::llm_provider::LLMConfig;

    const SAMPLE: &str = r#"[{"question":"What color is the sun? ☀️","options":["Blue","Yellow"],"answer":"Yellow","skill":"Recognition"}]"#;

    #[test]
    fn test_extract_bare_array() {
        let questions = extract_questions(SAMPLE).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer, "Yellow");
    }

    #[test]
    fn test_extract_wrapped_and_fenced() {
        let wrapped = format!("{{\"title\": \"Quiz\", \"questions\": {SAMPLE}}}");
        assert_eq!(extract_questions(&wrapped).unwrap().len(), 1);
        let fenced = format!("```json\n{SAMPLE}\n```");
        assert_eq!(extract_questions(&fenced).unwrap().len(), 1);
    }

    #[test]
    fn test_extract_rejects_unusable_output() {
        assert!(extract_questions("Here is your quiz!").is_none());
        assert!(extract_questions(r#"{"title": "no list"}"#).is_none());
        // answer not among the options
        assert!(extract_questions(
            r#"[{"question":"2+2?","options":["3","5"],"answer":"4"}]"#
        )
        .is_none());
    }

    #[test]
    fn test_static_bank_is_consistent() {
        for (name, _) in BANK.iter() {
            let questions = static_questions(name);
            assert_eq!(questions.len(), QUESTIONS_PER_QUIZ);
            assert!(questions.iter().all(QuizQuestion::is_valid), "{name}");
        }
        let mixed = static_questions("mixed");
        assert_eq!(mixed.len(), QUESTIONS_PER_QUIZ);
        assert_eq!(mixed[0].skill.as_deref(), Some("abc"));
        assert_eq!(mixed[4].skill.as_deref(), Some("fruits"));
        assert_eq!(static_questions(" Colors ")[0].skill.as_deref(), Some("colors"));
    }

    #[tokio::test]
    async fn test_generate_quiz_uses_llm() {
        let server = MockServer::start().await;
        let content = format!("{{\"questions\": {SAMPLE}}}");
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })))
            .mount(&server)
            .await;

        let llm = LLMProvider::new(LLMConfig {
            api_key: Some("k".into()),
            model: "m".into(),
            api_endpoint: format!("{}/v1", server.uri()),
            timeout: Duration::from_secs(5),
        });
        let quiz = generate_quiz(&llm, "colors", "Easy").await;
        assert_eq!(quiz.source, QuizSource::Llm);
        assert_eq!(quiz.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_quiz_falls_back_without_llm() {
        let llm = LLMProvider::new(LLMConfig {
            api_key: None,
            model: "m".into(),
            api_endpoint: "http://127.0.0.1:9/v1".into(),
            timeout: Duration::from_secs(1),
        });
        let quiz = generate_quiz(&llm, "animals", "Easy").await;
        assert_eq!(quiz.source, QuizSource::StaticBank);
        assert_eq!(quiz.questions[0].answer, "Cow");
    }
}
