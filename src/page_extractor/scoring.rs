//! Text-quality scoring shared by every extraction strategy

use regex::Regex;
use std::sync::LazyLock;

use super::schema::{CandidateScore, ExtractionMethod};
use crate::utils::char_len;

/// Boilerplate vocabulary; every occurrence costs [`NOISE_PENALTY`]
static NOISE_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)登录|注册|隐私|cookie|广告|赞助|推荐|关注|下载|APP|客户端|免责声明|相关文章|阅读更多|展开全文")
            .expect("BUG: hardcoded CJK noise regex is invalid"),
        Regex::new(
            r"(?i)sign in|log in|register|cookie|privacy|terms|subscribe|advertis|sponsor|download|continue reading",
        )
        .expect("BUG: hardcoded English noise regex is invalid"),
    ]
});

/// Texts shorter than this score zero
pub const MIN_SCORABLE_CHARS: usize = 120;
pub const NOISE_PENALTY: f64 = 12.0;
const SHORT_LINE_PENALTY: f64 = 0.35;
const SHORT_LINE_CHARS: usize = 30;

/// Number of boilerplate-keyword occurrences across both vocabularies
#[must_use]
pub fn count_noise(text: &str) -> usize {
    NOISE_PATTERNS.iter().map(|re| re.find_iter(text).count()).sum()
}

/// Raw quality score, always `>= 0`
///
/// Rewards length (clamped at 12 000 chars), paragraph and line structure;
/// penalizes boilerplate keywords and navigation-like short lines.
#[must_use]
pub fn score_text(text: &str) -> f64 {
    let length = char_len(text);
    if length < MIN_SCORABLE_CHARS {
        return 0.0;
    }

    let paras = text.matches("\n\n").count() + 1;
    let lines = text.matches('\n').count() + 1;
    let noise = count_noise(text);
    let short_lines = text
        .lines()
        .filter(|ln| {
            let n = char_len(ln.trim());
            n > 0 && n < SHORT_LINE_CHARS
        })
        .count();

    let score = length.min(12_000) as f64 / 40.0 + paras.min(60) as f64 * 1.8 + lines.min(180) as f64 * 0.15
        - noise as f64 * NOISE_PENALTY
        - short_lines as f64 * SHORT_LINE_PENALTY;

    score.max(0.0)
}

/// Candidate text with its trust-weighted score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub method: ExtractionMethod,
    pub weighted_score: f64,
    pub text: String,
}

impl RankedCandidate {
    #[must_use]
    pub fn diagnostics(&self) -> CandidateScore {
        CandidateScore {
            method: self.method,
            score: self.weighted_score,
            length: char_len(&self.text),
        }
    }
}

/// Weight every candidate by its method prior and sort best-first
///
/// The sort is stable: equal weighted scores keep strategy order.
#[must_use]
pub fn rank_candidates(candidates: Vec<(ExtractionMethod, String)>) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|(method, text)| RankedCandidate {
            method,
            weighted_score: score_text(&text) * method.prior(),
            text,
        })
        .collect();
    ranked.sort_by(|a, b| b.weighted_score.total_cmp(&a.weighted_score));
    ranked
}
