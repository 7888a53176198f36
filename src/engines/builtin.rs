//! Built-in engine catalog

use super::catalog::Engine;

const CLAUDE_NOTES: &str = "Claude cannot run the query automatically. The query is \
filled in for you, so you only need to press enter. Pick another engine for a fully \
automatic search.";

/// Default engine definitions, in display order
pub fn builtin_engines() -> Vec<Engine> {
    vec![
        Engine::new("google", "https://www.google.com/search?q={searchTerm}")
            .image("/engines/google.png"),
        Engine::new("duckduckgo", "https://duckduckgo.com/?q={searchTerm}")
            .image("/engines/duckduckgo.png"),
        Engine::new("ecosia", "https://www.ecosia.org/search?q={searchTerm}")
            .image("/engines/ecosia.png"),
        Engine::new("bing", "https://www.bing.com/search?q={searchTerm}")
            .image("/engines/bing.png"),
        Engine::new("chatgpt", "https://chat.openai.com/?q={searchTerm}")
            .image("/engines/chatgpt.png")
            .dark_image("/engines/chatgpt-dark.png"),
        Engine::new("claude", "https://claude.ai/new?q={searchTerm}")
            .image("/engines/claude.png")
            .notes(CLAUDE_NOTES),
    ]
}
