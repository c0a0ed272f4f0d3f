//! Feedback markup. This is the only place that builds HTML from score data.

use std::fmt::Write;

use crate::messages::{Locale, feedback_labels};
use crate::models::{ScoreBreakdown, ScoreReport};
use crate::utils::format_score;

/// Escape text for use inside HTML element content or quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FeedbackRenderer {
    locale: Locale,
}

impl FeedbackRenderer {
    pub fn new(locale: Locale) -> Self {
        FeedbackRenderer { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn render_report(&self, report: &ScoreReport) -> String {
        self.render(&report.score_breakdown, &report.rationale, &report.suggestions)
    }

    /// Deterministic: the same inputs always give the same markup.
    pub fn render(
        &self,
        breakdown: &ScoreBreakdown,
        rationale: &str,
        suggestions: &[String],
    ) -> String {
        let labels = feedback_labels(self.locale);
        let mut html = String::new();

        // write! into a String cannot fail
        let _ = write!(html, "<h3>{}</h3>\n<ul>\n", labels.scores_heading);
        for (label, (value, max)) in labels.criteria.iter().zip(breakdown.criteria()) {
            let _ = writeln!(
                html,
                "<li><strong>{}：</strong>{}/{}{}</li>",
                label,
                format_score(value),
                format_score(max),
                labels.unit
            );
        }
        let _ = write!(
            html,
            "<li><strong>{}：</strong>{}{}</li>\n</ul>\n",
            labels.total,
            format_score(breakdown.total()),
            labels.unit
        );

        let _ = write!(
            html,
            "<h3>{}</h3>\n<p>{}</p>\n",
            labels.rationale_heading,
            escape_html(rationale)
        );

        if !suggestions.is_empty() {
            let _ = write!(html, "<h3>{}</h3>\n<ul>\n", labels.suggestions_heading);
            for s in suggestions {
                let _ = writeln!(html, "<li>{}</li>", escape_html(s));
            }
            html.push_str("</ul>\n");
        }
        html
    }
}
