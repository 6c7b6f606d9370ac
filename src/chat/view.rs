//! Screen rendering for the terminal front end.
//!
//! The view keeps track of what it has already printed so each sync only
//! prints what changed: new conversation rows, or a whole new screen when the
//! selection changes.

use crate::chat::state::{RoleplayState, Stage};
use crate::render::Renderer;

const TOPIC_PROMPT: &str = "어떤 롤플레이를 할까요?";
const BACK_HINT: &str = "🔙 주제로 돌아가기: /back";
const INPUT_HINT: &str = "메시지를 입력하세요. 끝내려면 /exit";

/// Incremental renderer for a [`RoleplayState`].
#[derive(Debug, Default)]
pub struct ConversationView {
    generation: Option<u64>,
    rendered: usize,
}

impl ConversationView {
    /// Creates a view that has printed nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prints whatever changed since the last sync.
    pub fn sync(&mut self, state: &RoleplayState, renderer: &mut dyn Renderer) {
        if self.generation != Some(state.generation()) || state.history().len() < self.rendered {
            self.render_all(state, renderer);
            return;
        }
        if let Stage::Conversing { .. } = state.stage() {
            for entry in &state.history()[self.rendered..] {
                renderer.print_entry(entry);
            }
            self.rendered = state.history().len();
        }
    }

    /// Prints the current screen from the top.
    pub fn render_all(&mut self, state: &RoleplayState, renderer: &mut dyn Renderer) {
        let stage = state.stage();
        renderer.print_header(&stage.header());
        match stage {
            Stage::ChoosingTopic => {
                let topics: Vec<String> = state
                    .catalog()
                    .topics()
                    .iter()
                    .map(|t| t.display_name())
                    .collect();
                renderer.print_choices(TOPIC_PROMPT, &topics);
            }
            Stage::ChoosingSubtopic { topic } => {
                let subtopics = state
                    .catalog()
                    .topic(topic)
                    .map(|t| t.subtopics.clone())
                    .unwrap_or_default();
                renderer.print_choices(&format!("{topic} - 어떤 상황인가요?"), &subtopics);
                renderer.print_info(BACK_HINT);
            }
            Stage::Conversing { .. } => {
                renderer.print_info(INPUT_HINT);
                for entry in state.history() {
                    renderer.print_entry(entry);
                }
            }
        }
        self.generation = Some(state.generation());
        self.rendered = state.history().len();
    }
}
