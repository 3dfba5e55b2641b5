//! Display tree for the "Authorization Criteria" tab.
//!
//! `build_view` maps the criteria model into display nodes (key, title,
//! leaf flag, ordered children); `render_report` turns them into text
//! lines. Both walk the tree with an explicit stack.

use crate::domain::questions::{
    AuthQuestion, CriteriaStats, Criterion, CriterionStatus, Operation,
};
use serde::Serialize;

const NO_CRITERIA: &str = "No authorization criteria available yet";
const PROCESSING_TITLE: &str = "Processing Document";
const PROCESSING_BODY: &str = "The authorization criteria are being extracted from the uploaded document. This may take a few moments.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub key: String,
    pub title: Title,
    pub is_leaf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ViewNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Title {
    Criterion {
        status: CriterionStatus,
        icon: &'static str,
        color: &'static str,
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tooltip: Option<String>,
    },
    Operation {
        badge: String,
        description: String,
    },
}

/// Icon name, glyph, and color for a criterion outcome.
pub fn status_icon(status: CriterionStatus) -> (&'static str, &'static str, &'static str) {
    match status {
        CriterionStatus::Met => ("check-circle", "✓", "#52c41a"),
        CriterionStatus::NotMet => ("close-circle", "✗", "#ff4d4f"),
        CriterionStatus::Pending => ("clock-circle", "◷", "#d9d9d9"),
    }
}

fn criterion_node(c: &Criterion) -> ViewNode {
    let status = c.status();
    let (icon, _, color) = status_icon(status);
    let tooltip = c
        .value
        .as_ref()
        .and_then(|v| v.justification())
        .map(str::to_string);
    let label = tooltip
        .as_ref()
        .and(c.value.as_ref().and_then(|v| v.answer()))
        .map(str::to_string);
    ViewNode {
        key: c.id.clone(),
        title: Title::Criterion {
            status,
            icon,
            color,
            description: c.description.clone(),
            label,
            tooltip,
        },
        is_leaf: true,
        children: None,
    }
}

fn operation_node(op: &Operation, children: Vec<ViewNode>) -> ViewNode {
    ViewNode {
        key: op.id.clone(),
        title: Title::Operation {
            badge: op.operator.to_uppercase(),
            description: op.description.clone(),
        },
        is_leaf: false,
        children: Some(children),
    }
}

/// Maps the criteria tree into display nodes, keeping child order.
pub fn build_view(root: &AuthQuestion) -> ViewNode {
    struct Frame<'a> {
        op: &'a Operation,
        children: Vec<ViewNode>,
    }

    let mut frames: Vec<Frame<'_>> = Vec::new();
    let mut next = root;
    loop {
        let mut finished = match next {
            AuthQuestion::Criterion(c) => criterion_node(c),
            AuthQuestion::Operation(op) => match op.children.first() {
                Some(first) => {
                    frames.push(Frame {
                        op,
                        children: Vec::with_capacity(op.children.len()),
                    });
                    next = first;
                    continue;
                }
                None => operation_node(op, Vec::new()),
            },
        };

        loop {
            let Some(mut frame) = frames.pop() else {
                return finished;
            };
            frame.children.push(finished);
            let op = frame.op;
            if let Some(child) = op.children.get(frame.children.len()) {
                next = child;
                frames.push(frame);
                break;
            }
            finished = operation_node(op, frame.children);
        }
    }
}

impl ViewNode {
    /// Single-line title as shown in the tree.
    pub fn title_text(&self) -> String {
        match &self.title {
            Title::Criterion {
                status,
                description,
                label,
                ..
            } => {
                let (_, glyph, _) = status_icon(*status);
                match label {
                    Some(l) => format!("{} {} ({})", glyph, description, l),
                    None => format!("{} {}", glyph, description),
                }
            }
            Title::Operation { badge, description } => format!("[{}] {}", badge, description),
        }
    }

    fn tooltip(&self) -> Option<&str> {
        match &self.title {
            Title::Criterion { tooltip, .. } => tooltip.as_deref(),
            Title::Operation { .. } => None,
        }
    }
}

/// Text lines for a display tree, drawn with connector lines.
pub fn render_tree(root: &ViewNode) -> Vec<String> {
    let mut lines = Vec::new();
    // (node, prefix for this node's line, prefix for its descendants)
    let mut stack: Vec<(&ViewNode, String, String)> = vec![(root, String::new(), String::new())];
    while let Some((node, head, rest)) = stack.pop() {
        lines.push(format!("{}{}", head, node.title_text()));
        if let Some(tip) = node.tooltip() {
            lines.push(format!("{}    {}", rest, tip));
        }
        let Some(children) = &node.children else {
            continue;
        };
        let last = children.len().saturating_sub(1);
        for (i, child) in children.iter().enumerate().rev() {
            let (connector, carry) = if i == last {
                ("└─ ", "   ")
            } else {
                ("├─ ", "│  ")
            };
            stack.push((
                child,
                format!("{}{}", rest, connector),
                format!("{}{}", rest, carry),
            ));
        }
    }
    lines
}

#[derive(Debug, Clone, Serialize)]
pub struct CriteriaReport {
    pub available: bool,
    pub stats: CriteriaStats,
    pub completion_rate: u32,
    pub description: Option<String>,
    pub tree: Option<ViewNode>,
}

impl CriteriaReport {
    pub fn from_questions(questions: Option<&AuthQuestion>) -> Self {
        match questions {
            None => CriteriaReport {
                available: false,
                stats: CriteriaStats::default(),
                completion_rate: 0,
                description: None,
                tree: None,
            },
            Some(root) => {
                let stats = CriteriaStats::collect(root);
                CriteriaReport {
                    available: true,
                    stats,
                    completion_rate: stats.completion_rate(),
                    description: Some(root.description().to_string()).filter(|d| !d.is_empty()),
                    tree: Some(build_view(root)),
                }
            }
        }
    }
}

pub fn render_report(report: &CriteriaReport) -> Vec<String> {
    let mut lines = vec!["Authorization Criteria".to_string()];
    let Some(tree) = &report.tree else {
        lines.push(NO_CRITERIA.to_string());
        lines.push(String::new());
        lines.push(PROCESSING_TITLE.to_string());
        lines.push(PROCESSING_BODY.to_string());
        return lines;
    };

    let s = &report.stats;
    let mut summary = format!(
        "{} total criteria • {} reviewed • {} met",
        s.total, s.completed, s.met
    );
    if report.completion_rate > 0 {
        summary.push_str(&format!(" • {}% complete", report.completion_rate));
    }
    lines.push(summary);
    if let Some(d) = &report.description {
        lines.push(format!("» {}", d));
    }
    lines.push(String::new());
    lines.extend(render_tree(tree));
    lines
}
