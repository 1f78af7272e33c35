use crate::error::GameError;
use crate::game::WordPair;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

mod gemini;

pub use gemini::GeminiWordSource;

/// Something that can come up with a word pair for a topic.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Generates a common/undercover word pair related to `topic`.
    /// Every kind of failure is reported as [GameError::GenerationFailed].
    async fn generate_pair(&self, topic: &str) -> Result<WordPair, GameError>;

    /// Gets the name of this source.
    fn name(&self) -> &str;
}

/// A word source that draws from a fixed list of pairs, ignoring the topic.
pub struct StaticWordSource {
    pairs: Vec<WordPair>,
}

impl StaticWordSource {
    pub fn new(pairs: Vec<WordPair>) -> Self {
        Self { pairs }
    }
}

impl Default for StaticWordSource {
    fn default() -> Self {
        let pairs = [
            ("Ocean", "Lake"),
            ("Coffee", "Tea"),
            ("Guitar", "Violin"),
            ("Pizza", "Burger"),
            ("Cat", "Tiger"),
            ("Train", "Tram"),
            ("Football", "Rugby"),
            ("Moon", "Sun"),
            ("Novel", "Poem"),
            ("Mountain", "Hill"),
        ];
        Self::new(pairs.iter().map(|(c, u)| WordPair::new(*c, *u)).collect())
    }
}

#[async_trait]
impl WordSource for StaticWordSource {
    async fn generate_pair(&self, _topic: &str) -> Result<WordPair, GameError> {
        choose_pair(&self.pairs, &mut rand::thread_rng())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// A word pair as it appears in generated output; either field may be missing.
#[derive(Deserialize)]
struct RawPair {
    common: Option<String>,
    undercover: Option<String>,
}

/// Parses generated text holding a JSON array of `{ "common", "undercover" }` objects,
/// which may be wrapped in a Markdown code fence.
pub fn parse_word_pairs(text: &str) -> Result<Vec<WordPair>, GameError> {
    let cleaned = strip_code_fence(text);
    let raw: Vec<RawPair> = serde_json::from_str(cleaned).map_err(|err| {
        log::error!("Could not parse generated word pairs: {}", err);
        GameError::GenerationFailed
    })?;
    if raw.is_empty() {
        log::error!("Generated word pair list was empty");
        return Err(GameError::GenerationFailed);
    }
    let pairs: Vec<WordPair> = raw
        .into_iter()
        .filter_map(|pair| match (pair.common, pair.undercover) {
            (Some(common), Some(undercover))
                if !common.trim().is_empty() && !undercover.trim().is_empty() =>
            {
                Some(WordPair::new(common.trim(), undercover.trim()))
            }
            _ => {
                log::warn!("Skipping generated word pair with a missing word");
                None
            }
        })
        .collect();
    if pairs.is_empty() {
        log::error!("No usable word pairs were generated");
        return Err(GameError::GenerationFailed);
    }
    Ok(pairs)
}

/// Picks one pair uniformly at random.
pub fn choose_pair(pairs: &[WordPair], rng: &mut impl Rng) -> Result<WordPair, GameError> {
    pairs.choose(rng).cloned().ok_or(GameError::GenerationFailed)
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag on the opening fence, if any
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
