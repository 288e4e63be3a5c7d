//! Prompt assembly for the strategy summarizer.
//!
//! A prompt is `preamble + one block per turn + closing`. Preamble and closing
//! come from a template (built-in per [`Language`], overridable from the
//! config file); the turn blocks are fixed so every turn's player, move and
//! board always appear, in play order.
//!
//! Template placeholders:
//!
//! | Placeholder        | Value                                        |
//! |--------------------|----------------------------------------------|
//! | `{label}`          | file name, game name or phase title          |
//! | `{winner}`         | winning player id, or "unknown"              |
//! | `{board_size}`     | configured board side length                 |
//! | `{phase}`          | phase title (phase prompts only)             |
//! | `{opening_plies}`  | plies per player in the opening              |
//! | `{opening_turns}`  | turns in the opening                         |
//! | `{midgame_start}`  | 1-based number of the first midgame turn     |

use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhaseSegmenter, PhaseSlice};
use crate::record::Turn;

/// Language of the built-in templates and report headings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn phase_title(&self, phase: Phase) -> &'static str {
        match (self, phase) {
            (Language::En, Phase::Opening) => "opening",
            (Language::En, Phase::MidgameToEnd) => "midgame-to-endgame",
            (Language::Zh, Phase::Opening) => "开局",
            (Language::Zh, Phase::MidgameToEnd) => "中局到终局",
        }
    }

    /// Heading of one entry in the analysis report.
    pub fn analysis_heading(&self, label: &str) -> String {
        match self {
            Language::En => format!("Key position analysis for {label}"),
            Language::Zh => format!("文件 {label} 的关键位置分析"),
        }
    }

    /// Heading of one phase in the reflexion report.
    pub fn reflexion_heading(&self, phase: Phase) -> String {
        match self {
            Language::En => format!("{} winning strategies", self.phase_title(phase)),
            Language::Zh => format!("{}获胜策略", self.phase_title(phase)),
        }
    }

    /// System message sent along with every prompt by chat backends.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Language::En => {
                "You are an expert in Gomoku strategy analysis. Summarize the winning strategies based on the provided game data."
            }
            Language::Zh => {
                "你是一名擅长五子棋（Gomoku）游戏的专业玩家，现在希望你能根据历史棋局总结一些下棋的关键位置。"
            }
        }
    }

    fn unknown_winner(&self) -> &'static str {
        match self {
            Language::En => "unknown",
            Language::Zh => "未知",
        }
    }

    fn turn_block(&self, number: usize, turn: &Turn) -> String {
        match self {
            Language::En => format!(
                "Turn {}: player {} plays at {}. Board:\n{}\n\n",
                number, turn.player, turn.mv, turn.state
            ),
            Language::Zh => format!(
                "第{}回合：玩家 {} 下在位置 {}，棋盘状态如下：\n{}\n\n",
                number, turn.player, turn.mv, turn.state
            ),
        }
    }

    fn templates(&self) -> PromptTemplates {
        match self {
            Language::En => PromptTemplates {
                analysis: Template::new(EN_ANALYSIS_PREAMBLE, EN_ANALYSIS_CLOSING),
                reflexion: Template::new(EN_REFLEXION_PREAMBLE, EN_REFLEXION_CLOSING),
                summary: Template::new(EN_SUMMARY_PREAMBLE, EN_SUMMARY_CLOSING),
            },
            Language::Zh => PromptTemplates {
                analysis: Template::new(ZH_ANALYSIS_PREAMBLE, ZH_ANALYSIS_CLOSING),
                reflexion: Template::new(ZH_REFLEXION_PREAMBLE, ZH_REFLEXION_CLOSING),
                // The summary step works on free text and stays in English.
                summary: Template::new(EN_SUMMARY_PREAMBLE, EN_SUMMARY_CLOSING),
            },
        }
    }
}

const EN_ANALYSIS_PREAMBLE: &str = "The following is the record of one Gomoku game from {label}.\n\n\
Gomoku is played on a {board_size}x{board_size} board. Players take turns placing stones; \
the goal is to connect five stones of the same color.\n\n";

const EN_ANALYSIS_CLOSING: &str = "The winner of this game is player {winner}. In real Gomoku play, \
several connected groups of three or four stones are usually a winning pattern, and players often \
lose because they overlook three or four stones connected on a diagonal.\n\
Using this domain knowledge, analyze every move of the game. Name the three most critical moves of \
the opening phase (the first {opening_plies} moves of each player, i.e. the first {opening_turns} \
turns; every stone placed by either player counts as one turn) and the three most critical moves \
of the midgame-to-endgame phase (turn {midgame_start} until the winning turn). Explain how these \
positions led the winner to victory, or which mistakes made the loser fail.";

const EN_REFLEXION_PREAMBLE: &str = "Below are the moves of the {phase} phase of a Gomoku game that \
decided its outcome. The winner is player {winner}.\n\n";

const EN_REFLEXION_CLOSING: &str = "Summarize the winning strategy for the {phase} phase. Study the \
board states and the opponent's moves as well: reflect on why the opponent's strategy failed, \
derive the mistakes opponents are likely to make, and turn them into winning experience.";

const EN_SUMMARY_PREAMBLE: &str = "Here is the summary of past Gomoku game strategies:\n";

const EN_SUMMARY_CLOSING: &str = "\n\nPlease analyze and summarize the winning strategies.";

const ZH_ANALYSIS_PREAMBLE: &str = "以下是 {label} 中的一局五子棋比赛的棋谱数据：\n\n\
五子棋是一款在{board_size}x{board_size}的棋盘上进行的棋类游戏，玩家轮流下子，目标是连成五个相同的棋子。\n\n";

const ZH_ANALYSIS_CLOSING: &str = "该局游戏的赢家是玩家 {winner}。在真实的五子棋对战中，\
各种形式多个3个或4个棋子组合相连的情形通常被认为是某种取胜的方法；另外对手经常会因为没看到对角线上的3个或4个棋子相连的失误而输掉比赛。\n\
请结合上述五子棋实战中的领域知识，分析该局游戏中的每一步，最终给出你认为在开局阶段（双方的前{opening_plies}步，\
即前{opening_turns}个回合内，每有一个玩家走出一步棋子就是一个回合）和中间到最后一方获胜阶段（第{midgame_start}回合到最终获胜回合）\
分别给出最关键的三步下棋位置，并分析和指出这些位置是如何导致了赢家获胜，或是失败方是如何失误导致的最终失败。";

const ZH_REFLEXION_PREAMBLE: &str = "以下是{phase}阶段的某一局五子棋比赛棋谱数据中筛选过后几个导致最终胜利或失败重要的下棋步骤，\
赢家是玩家 {winner}。\n\n";

const ZH_REFLEXION_CLOSING: &str = "请总结在此阶段的获胜策略，同时你也可以观察棋盘状态和对手下棋的过程，\
反思对手的下棋策略是因为什么导致了失败，从而进一步总结对手可能出现的错误并利用这些错误总结获胜经验。";

/// Preamble and closing instruction of one prompt kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub preamble: String,
    pub closing: String,
}

impl Template {
    pub fn new(preamble: impl Into<String>, closing: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
            closing: closing.into(),
        }
    }

    fn apply(&mut self, custom: &TemplateOverride) {
        if let Some(preamble) = &custom.preamble {
            self.preamble = preamble.clone();
        }
        if let Some(closing) = &custom.closing {
            self.closing = closing.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PromptTemplates {
    analysis: Template,
    reflexion: Template,
    summary: Template,
}

/// Config file override for one prompt kind; unset parts keep the built-in text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<String>,
}

/// `[prompt]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub language: Language,
    pub analysis: TemplateOverride,
    pub reflexion: TemplateOverride,
    pub summary: TemplateOverride,
}

/// Renders prompts. Pure string construction.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    language: Language,
    templates: PromptTemplates,
    board_size: usize,
    segmenter: PhaseSegmenter,
}

impl PromptAssembler {
    pub fn new(config: &PromptConfig, board_size: usize, segmenter: PhaseSegmenter) -> Self {
        let mut templates = config.language.templates();
        templates.analysis.apply(&config.analysis);
        templates.reflexion.apply(&config.reflexion);
        templates.summary.apply(&config.summary);

        Self {
            language: config.language,
            templates,
            board_size,
            segmenter,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Full-game analysis prompt labelled with the file (or game) name.
    pub fn game_prompt(&self, turns: &[Turn], winner: Option<i32>, label: &str) -> String {
        self.assemble(&self.templates.analysis, turns, 0, winner, label, None)
    }

    /// Phase reflexion prompt; winner and turn numbering come from the slice.
    pub fn phase_prompt(&self, slice: &PhaseSlice<'_>) -> String {
        let title = self.language.phase_title(slice.phase());
        self.assemble(
            &self.templates.reflexion,
            slice.turns(),
            slice.played_before(),
            slice.game().winner,
            title,
            Some(title),
        )
    }

    /// Final summary prompt over the collected reflexion text.
    pub fn summary_prompt(&self, content: &str) -> String {
        let template = &self.templates.summary;
        let mut prompt = self.fill(&template.preamble, None, "", None);
        prompt.push_str(content);
        prompt.push_str(&self.fill(&template.closing, None, "", None));
        prompt
    }

    fn assemble(
        &self,
        template: &Template,
        turns: &[Turn],
        offset: usize,
        winner: Option<i32>,
        label: &str,
        phase: Option<&str>,
    ) -> String {
        let mut prompt = self.fill(&template.preamble, winner, label, phase);
        for (i, turn) in turns.iter().enumerate() {
            prompt.push_str(&self.language.turn_block(offset + i + 1, turn));
        }
        prompt.push_str(&self.fill(&template.closing, winner, label, phase));
        prompt
    }

    fn fill(&self, text: &str, winner: Option<i32>, label: &str, phase: Option<&str>) -> String {
        let winner = winner.map_or_else(
            || self.language.unknown_winner().to_string(),
            |w| w.to_string(),
        );
        let cutoff = self.segmenter.cutoff();
        substitute(text, |name| match name {
            "label" => Some(label.to_string()),
            "winner" => Some(winner.clone()),
            "board_size" => Some(self.board_size.to_string()),
            "phase" => Some(phase.unwrap_or(label).to_string()),
            "opening_plies" => Some(self.segmenter.plies_per_player().to_string()),
            "opening_turns" => Some(cutoff.to_string()),
            "midgame_start" => Some((cutoff + 1).to_string()),
            _ => None,
        })
    }
}

/// Replace every known `{name}` in one pass; inserted values are never
/// scanned again and unknown names are kept as written.
fn substitute(text: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after
            .find('}')
            .and_then(|close| value(&after[..close]).map(|v| (v, close)));
        match replaced {
            Some((v, close)) => {
                out.push_str(&v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
