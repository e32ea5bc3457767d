//! Deterministic intent detection over the user's message.
//!
//! Detection is purely lexical so it can run before the model is invoked.
//! Matched intents become function calls whose results are injected into the
//! prompt as synthetic tool exchanges, saving the model a round-trip for
//! requests it would almost certainly make anyway.

use std::sync::OnceLock;

use demeter_tools::{MetricKind, TimePeriod, VisualizationKind};
use regex::Regex;
use serde_json::{json, Value};

/// Requested response length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Short, to-the-point reply
    Concise,
    /// Thorough, explanatory reply
    Detailed,
}

/// An intent detected in the user's message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Asking about one or more health metrics
    Metrics {
        /// Metrics in mention order, deduplicated
        metrics: Vec<MetricKind>,
        /// Requested period
        period: TimePeriod,
    },
    /// Asking about goal progress
    GoalProgress,
    /// Asking for a chart
    Visualization {
        /// Chart kind
        kind: VisualizationKind,
        /// Requested period
        period: TimePeriod,
    },
    /// Requesting a response style rather than data
    Mode(ResponseMode),
}

impl Intent {
    /// The function call this intent maps to, `None` for mode intents
    #[must_use]
    pub fn tool_call(&self) -> Option<(&'static str, Value)> {
        match self {
            Self::Metrics { metrics, period } => {
                let first = metrics.first()?;
                let args = if metrics.len() == 1 {
                    json!({
                        "metric_type": first.as_str(),
                        "time_period": period.as_str(),
                    })
                } else {
                    json!({
                        "metric_type": first.as_str(),
                        "metrics": metrics.iter().map(|m| m.as_str()).collect::<Vec<_>>(),
                        "time_period": period.as_str(),
                    })
                };
                Some(("get_health_metrics", args))
            }
            Self::GoalProgress => Some(("get_goal_progress", json!({}))),
            Self::Visualization { kind, period } => {
                let args = if *period == TimePeriod::Current {
                    json!({ "visualization_type": kind.as_str() })
                } else {
                    json!({
                        "visualization_type": kind.as_str(),
                        "time_period": period.as_str(),
                    })
                };
                Some(("generate_visualization", args))
            }
            Self::Mode(_) => None,
        }
    }
}

struct Patterns {
    weight: Regex,
    height: Regex,
    bmi: Regex,
    wellness: Regex,
    week: Regex,
    month: Regex,
    quarter: Regex,
    goals: Regex,
    chart: Regex,
    protein_chart: Regex,
    macro_chart: Regex,
    sleep_chart: Regex,
    concise: Regex,
    detailed: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        weight: Regex::new(r"\bweight\b").unwrap(),
        height: Regex::new(r"\bheight\b").unwrap(),
        bmi: Regex::new(r"\bbmi\b|\bbody mass index\b").unwrap(),
        wellness: Regex::new(r"\bwellness\b").unwrap(),
        week: Regex::new(r"\b(last|past|this)\s+week\b|\b(last|past)\s+(7|seven)\s+days\b")
            .unwrap(),
        month: Regex::new(r"\b(last|past|this)\s+month\b|\b(last|past)\s+(30|thirty)\s+days\b")
            .unwrap(),
        quarter: Regex::new(
            r"\b(last|past)\s+(quarter|three\s+months|3\s+months|90\s+days|ninety\s+days)\b",
        )
        .unwrap(),
        goals: Regex::new(r"\bgoals?\b|\bmilestones?\b|\bon track\b|\btargets?\b").unwrap(),
        chart: Regex::new(r"\bcharts?\b|\bgraphs?\b|\bplots?\b|\bvisuali[sz]").unwrap(),
        protein_chart: Regex::new(r"\bprotein\b").unwrap(),
        macro_chart: Regex::new(r"\bmacros?\b|\bmacronutrients?\b").unwrap(),
        sleep_chart: Regex::new(r"\bsleep\b").unwrap(),
        concise: Regex::new(r"\bconcise\b|\bbrief\b|\bshort version\b|\btl;?dr\b|\bkeep it short\b")
            .unwrap(),
        detailed: Regex::new(
            r"\bdetailed\b|\bin-depth\b|\belaborate\b|\bexplain more\b|\blong form\b",
        )
        .unwrap(),
    })
}

/// Detect intents in a user message.
///
/// At most one of each intent kind is produced, in a fixed order: metrics,
/// goal progress, visualization, response mode. When metrics are mentioned
/// without an explicit period, wellness-only questions default to the last
/// thirty days and everything else to the current value.
#[must_use]
pub fn detect_intents(message: &str) -> Vec<Intent> {
    let text = message.to_lowercase();
    let p = patterns();
    let mut intents = Vec::new();

    let explicit_period = if p.week.is_match(&text) {
        Some(TimePeriod::Days7)
    } else if p.month.is_match(&text) {
        Some(TimePeriod::Days30)
    } else if p.quarter.is_match(&text) {
        Some(TimePeriod::Days90)
    } else {
        None
    };

    let mut metrics: Vec<(usize, MetricKind)> = Vec::new();
    if let Some(m) = p.weight.find(&text) {
        metrics.push((m.start(), MetricKind::Weight));
    }
    if let Some(m) = p.height.find(&text) {
        metrics.push((m.start(), MetricKind::Height));
    }
    if let Some(m) = p.bmi.find(&text) {
        metrics.push((m.start(), MetricKind::Bmi));
    }
    if let Some(m) = p.wellness.find(&text) {
        metrics.push((m.start(), MetricKind::Wellness));
    }
    if !metrics.is_empty() {
        metrics.sort_by_key(|(pos, _)| *pos);
        let metrics: Vec<MetricKind> = metrics.into_iter().map(|(_, kind)| kind).collect();
        let period = explicit_period.unwrap_or(if metrics == [MetricKind::Wellness] {
            TimePeriod::Days30
        } else {
            TimePeriod::Current
        });
        intents.push(Intent::Metrics { metrics, period });
    }

    if p.goals.is_match(&text) {
        intents.push(Intent::GoalProgress);
    }

    if p.chart.is_match(&text) {
        let kind = if p.protein_chart.is_match(&text) {
            VisualizationKind::ProteinVsTarget
        } else if p.macro_chart.is_match(&text) {
            VisualizationKind::MacroBreakdown
        } else if p.sleep_chart.is_match(&text) {
            VisualizationKind::SleepTrend
        } else {
            VisualizationKind::WeightTrend
        };
        intents.push(Intent::Visualization {
            kind,
            period: explicit_period.unwrap_or_default(),
        });
    }

    if p.concise.is_match(&text) {
        intents.push(Intent::Mode(ResponseMode::Concise));
    } else if p.detailed.is_match(&text) {
        intents.push(Intent::Mode(ResponseMode::Detailed));
    }

    intents
}
