//! Offline stand-in for the grading backend.

use std::cell::RefCell;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::constants::{SIMULATED_TOTAL_MAX, SIMULATED_TOTAL_MIN};
use crate::error::Result;
use crate::messages::Locale;
use crate::models::{GradingResult, ScoreBreakdown, StagedFile};
use crate::render::FeedbackRenderer;
use crate::scoring::ScoringClient;

/// Points per criterion; also the per-criterion maximum.
const WEIGHTS: [u32; 4] = [20, 50, 20, 10];

/// Split a total (capped at 100) across the criteria weights so the parts add
/// up to the total exactly. Leftover points go to the largest remainders.
pub fn split_total(total: u32) -> ScoreBreakdown {
    let total = total.min(100);
    let mut parts = WEIGHTS.map(|w| total * w / 100);
    let mut rest = total - parts.iter().sum::<u32>();
    let mut order = [0usize, 1, 2, 3];
    order.sort_by_key(|&i| std::cmp::Reverse(total * WEIGHTS[i] % 100));
    while rest > 0 {
        for &i in &order {
            if rest > 0 && parts[i] < WEIGHTS[i] {
                parts[i] += 1;
                rest -= 1;
            }
        }
    }
    let [compilability, correctness, code_quality, readability] = parts.map(f64::from);
    ScoreBreakdown::new(
        compilability,
        correctness,
        code_quality,
        readability,
        total as f64,
    )
}

fn canned_feedback(locale: Locale) -> (&'static str, [&'static str; 4]) {
    match locale {
        Locale::Zh => (
            "（模拟数据）代码逻辑清晰，基本功能实现完整，但在边界条件处理上可以更加完善。",
            [
                "建议在关键函数前添加注释，说明其功能和参数",
                "第25行的循环可以优化，避免不必要的计算",
                "考虑使用更描述性的变量名，提高代码可读性",
                "可以添加更多的输入验证来增强程序的健壮性",
            ],
        ),
        Locale::En => (
            "(simulated) The logic is clear and the core functionality is complete, but edge cases could be handled more carefully.",
            [
                "Add comments before key functions describing what they do",
                "The loop on line 25 can avoid redundant work",
                "Prefer more descriptive variable names",
                "Validate inputs to make the program more robust",
            ],
        ),
    }
}

/// Produces a plausible random score without talking to any server.
pub struct SimulatedScoring<R = StdRng> {
    rng: RefCell<R>,
    renderer: FeedbackRenderer,
}

impl SimulatedScoring<StdRng> {
    pub fn from_seed(seed: u64, renderer: FeedbackRenderer) -> Self {
        SimulatedScoring::new(StdRng::seed_from_u64(seed), renderer)
    }
}

impl<R: Rng> SimulatedScoring<R> {
    pub fn new(rng: R, renderer: FeedbackRenderer) -> Self {
        SimulatedScoring {
            rng: RefCell::new(rng),
            renderer,
        }
    }

    /// A total in `[70, 100)`.
    pub fn draw_total(&self) -> u32 {
        self.rng
            .borrow_mut()
            .gen_range(SIMULATED_TOTAL_MIN..SIMULATED_TOTAL_MAX)
    }
}

#[async_trait(?Send)]
impl<R: Rng> ScoringClient for SimulatedScoring<R> {
    async fn submit(&self, file: &StagedFile, student_id: &str) -> Result<GradingResult> {
        let total = self.draw_total();
        let (rationale, suggestions) = canned_feedback(self.renderer.locale());
        let suggestions: Vec<String> = suggestions.iter().map(|s| s.to_string()).collect();
        let markup = self
            .renderer
            .render(&split_total(total), rationale, &suggestions);
        info!(%student_id, file = %file.name(), total, "simulated score produced");
        Ok(GradingResult::new(student_id, total as f64, markup))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::intake::FileIntake;
    use crate::models::FileMeta;
    use pretty_assertions::assert_eq;

    fn staged() -> StagedFile {
        FileIntake::default()
            .stage(FileMeta::new("sol.png", "image/png", 1), vec![1])
            .unwrap()
    }

    #[test]
    fn split_parts_sum_to_total() {
        for total in 0..=100 {
            let b = split_total(total);
            let sum = b.compilability() + b.correctness() + b.code_quality() + b.readability();
            assert_eq!(sum, total as f64, "total {total}");
            for (value, max) in b.criteria() {
                assert!(value <= max, "total {total}: {value} > {max}");
            }
        }
    }

    #[tokio::test]
    async fn totals_stay_in_range_and_vary() {
        let sim = SimulatedScoring::from_seed(7, FeedbackRenderer::default());
        let file = staged();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let r = sim.submit(&file, "2023001").await.unwrap();
            assert!((70.0..=100.0).contains(&r.total_score), "{}", r.total_score);
            assert_eq!(r.student_id, "2023001");
            seen.insert(r.total_score as u32);
        }
        assert!(seen.len() > 1);
    }

    #[tokio::test]
    async fn feedback_goes_through_the_renderer() {
        let sim = SimulatedScoring::from_seed(1, FeedbackRenderer::new(Locale::En));
        let r = sim.submit(&staged(), "s1").await.unwrap();
        let expected = FeedbackRenderer::new(Locale::En).render(
            &split_total(r.total_score as u32),
            canned_feedback(Locale::En).0,
            &canned_feedback(Locale::En)
                .1
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        );
        assert_eq!(r.feedback_markup, expected);
    }

    #[tokio::test]
    async fn same_seed_same_sequence() {
        let a = SimulatedScoring::from_seed(42, FeedbackRenderer::default());
        let b = SimulatedScoring::from_seed(42, FeedbackRenderer::default());
        for _ in 0..20 {
            assert_eq!(a.draw_total(), b.draw_total());
        }
    }
}
