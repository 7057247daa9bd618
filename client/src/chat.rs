//! # Chat Companion
//!
//! The scripted side of the SerenAI companion. An LLM-backed provider is an
//! external collaborator; [`Companion`] is the seam it would plug into, and
//! [`ScriptedCompanion`] is the offline implementation the app ships with.

use uuid::Uuid;

/// First message shown when the chat screen opens
pub const OPENING_MESSAGE: &str = "I'm SerenAI, your mindful companion. I'm here to listen, \
    support, and help you find your way back to calm. How is your heart feeling right now?";

/// Quick prompts offered above the input box
pub const SUGGESTION_CHIPS: [&str; 4] = [
    "I feel overwhelmed",
    "I need to vent about work",
    "Help me find focus",
    "Tell me something peaceful",
];

/// Keywords that switch the reply to crisis resources
const CRISIS_KEYWORDS: [&str; 4] = ["hurt myself", "self-harm", "suicide", "end my life"];

const CRISIS_RESPONSE: &str = "I'm really glad you told me, and I want you to have more \
    support than I can give. I'm an AI, not a therapist. If you are in the US, you can call \
    or text 988 to reach the Suicide & Crisis Lifeline, any time. You deserve real care.";

const FALLBACK_RESPONSE: &str = "I'm here for you. Tell me a little more about what that \
    feels like, and we can sit with it together.";

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// One message in the companion conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
        }
    }
}

/// A reply source for the companion conversation
pub trait Companion {
    /// The message that opens a fresh conversation
    fn opening(&self) -> &str;

    /// Produce a reply to one user message
    fn reply(&self, message: &str) -> String;
}

/// Keyword-scripted companion, warm and non-clinical
///
/// Crisis keywords always win over every other match.
pub struct ScriptedCompanion;

impl Companion for ScriptedCompanion {
    fn opening(&self) -> &str {
        OPENING_MESSAGE
    }

    fn reply(&self, message: &str) -> String {
        let lowered = message.to_lowercase();

        if CRISIS_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return CRISIS_RESPONSE.to_string();
        }

        let reply = if lowered.contains("overwhelm") || lowered.contains("stress") {
            "That sounds like a lot to carry. Let's slow it down together: one small thing \
             at a time. What feels heaviest right now?"
        } else if lowered.contains("work") {
            "Work can take up so much room in a day. Your worth isn't your productivity. \
             What happened that you'd like to set down here?"
        } else if lowered.contains("focus") {
            "Focus often returns when we stop chasing it. Try one slow breath in for four \
             counts, out for eight. What would you like to give your attention to?"
        } else if lowered.contains("sleep") || lowered.contains("tired") {
            "Rest is a courageous act of self-care, not a reward you have to earn. How has \
             your sleep been treating you lately?"
        } else if lowered.contains("peace") || lowered.contains("calm") {
            "Picture a slow forest rain, each drop landing exactly where it should. You're \
             allowed to move at that pace too."
        } else {
            FALLBACK_RESPONSE
        };

        reply.to_string()
    }
}
