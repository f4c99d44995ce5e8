//! Mermaid flowchart markup for one day of a board.
//!
//! `generate` is the producing side: each task of the day becomes a node
//! labelled `time - title`, chained in time order, with completed tasks
//! assigned the `done` class. `parse_flowchart` is the consuming side used
//! by the terminal renderer; it accepts exactly the subset `generate` emits
//! and reports anything else as an error so the caller can show a fallback.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::board::{Board, Task, sort_by_time};
use crate::model::config::ThemeMode;

/// Label of the single node emitted when the day has no tasks
pub const PLACEHOLDER_LABEL: &str = "No tasks for today.";

const DONE_CLASS_DEF: &str = "classDef done fill:#dcfce7,stroke:#15803d,color:#166534";

static NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([A-Za-z0-9_]+)\["(.*)"\];?$"#).unwrap());
static EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)\s*-->\s*([A-Za-z0-9_]+);?$").unwrap());
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+([A-Za-z0-9_]+)\s+([A-Za-z0-9_-]+);?$").unwrap());

/// Error type for reading flowchart markup back
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("missing flowchart header")]
    MissingHeader,
    #[error("line {line}: unrecognized statement: {text}")]
    Unrecognized { line: usize, text: String },
    #[error("edge references unknown node {0}")]
    UnknownNode(String),
}

fn init_directive(theme: ThemeMode) -> String {
    let (primary, text, line) = match theme {
        ThemeMode::Light => ("#fff", "#0f172a", "#333"),
        ThemeMode::Dark => ("#161b22", "#c9d1d9", "#8b949e"),
    };
    format!(
        "%%{{init:{{\"theme\":\"base\",\"themeVariables\":{{\"fontFamily\":\"monospace\",\"fontSize\":\"16px\",\"primaryColor\":\"{}\",\"primaryTextColor\":\"{}\",\"lineColor\":\"{}\",\"tertiaryColor\":\"#f0f0f0\"}}}}}}%%\n",
        primary, text, line
    )
}

/// Escape a label for use inside `["..."]`
pub fn escape_label(text: &str) -> String {
    text.replace(['\r', '\n'], " ").replace('"', "#quot;")
}

fn unescape_label(text: &str) -> String {
    text.replace("#quot;", "\"")
}

/// Node ids are limited to `[A-Za-z0-9_]`; anything else in a task id
/// becomes `_`
fn node_id(day: u8, task: &Task) -> String {
    let id: String = task
        .id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("T{}_{}", day, id)
}

/// Flowchart markup for `day` of `board`. With no board or no tasks the
/// result is a single placeholder node and no edges.
pub fn generate(board: Option<&Board>, day: u8, theme: ThemeMode) -> String {
    let mut tasks: Vec<Task> = board.map(|b| b.day(day).to_vec()).unwrap_or_default();
    if tasks.is_empty() {
        return format!("graph TD\n    A[\"{}\"];\n", PLACEHOLDER_LABEL);
    }
    sort_by_time(&mut tasks);

    let mut out = init_directive(theme);
    out.push_str("flowchart TD\n");
    out.push_str(&format!("    {}\n", DONE_CLASS_DEF));
    for task in &tasks {
        let id = node_id(day, task);
        let label = escape_label(&format!("{} - {}", task.time, task.title));
        out.push_str(&format!("    {}[\"{}\"]\n", id, label));
        if task.done {
            out.push_str(&format!("    class {} done\n", id));
        }
    }
    for pair in tasks.windows(2) {
        out.push_str(&format!(
            "    {} --> {}\n",
            node_id(day, &pair[0]),
            node_id(day, &pair[1])
        ));
    }
    out
}

/// A node read back from markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    pub done: bool,
}

/// Nodes in declaration order plus directed edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flowchart {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<(String, String)>,
}

impl Flowchart {
    /// Successor of a node along the first matching edge
    pub fn next_of(&self, id: &str) -> Option<&str> {
        self.edges
            .iter()
            .find(|(from, _)| from == id)
            .map(|(_, to)| to.as_str())
    }
}

/// Read flowchart markup back into nodes and edges
pub fn parse_flowchart(markup: &str) -> Result<Flowchart, DiagramError> {
    let mut chart = Flowchart::default();
    let mut seen_header = false;

    for (i, raw) in markup.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }
        if !seen_header {
            if line.starts_with("flowchart ") || line.starts_with("graph ") {
                seen_header = true;
                continue;
            }
            return Err(DiagramError::MissingHeader);
        }
        if line.starts_with("classDef ") {
            continue;
        }
        if let Some(caps) = CLASS_RE.captures(line) {
            let class = &caps[2];
            if let Some(node) = chart.nodes.iter_mut().find(|n| n.id == caps[1]) {
                node.done |= class == "done";
                continue;
            }
            return Err(DiagramError::UnknownNode(caps[1].to_string()));
        }
        if let Some(caps) = EDGE_RE.captures(line) {
            for id in [&caps[1], &caps[2]] {
                if !chart.nodes.iter().any(|n| n.id == id) {
                    return Err(DiagramError::UnknownNode(id.to_string()));
                }
            }
            chart.edges.push((caps[1].to_string(), caps[2].to_string()));
            continue;
        }
        if let Some(caps) = NODE_RE.captures(line) {
            chart.nodes.push(FlowNode {
                id: caps[1].to_string(),
                label: unescape_label(&caps[2]),
                done: false,
            });
            continue;
        }
        return Err(DiagramError::Unrecognized {
            line: i + 1,
            text: line.to_string(),
        });
    }

    if !seen_header {
        return Err(DiagramError::MissingHeader);
    }
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use insta::assert_snapshot;

    fn board_with(day: u8, tasks: &[(&str, &str, &str, bool)]) -> Board {
        let created = DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut board = Board::new("b_test".into(), "Test".into(), created);
        for (id, time, title, done) in tasks {
            board.day_mut(day).push(Task {
                id: id.to_string(),
                time: time.to_string(),
                title: title.to_string(),
                done: *done,
            });
        }
        board
    }

    #[test]
    fn empty_day_yields_single_placeholder_node() {
        let board = board_with(2, &[]);
        let markup = generate(Some(&board), 2, ThemeMode::Light);
        let chart = parse_flowchart(&markup).unwrap();
        assert_eq!(chart.nodes.len(), 1);
        assert_eq!(chart.nodes[0].label, PLACEHOLDER_LABEL);
        assert!(chart.edges.is_empty());
        assert!(!markup.contains("-->"));
    }

    #[test]
    fn no_board_yields_placeholder() {
        let chart = parse_flowchart(&generate(None, 0, ThemeMode::Dark)).unwrap();
        assert_eq!(chart.nodes.len(), 1);
        assert!(chart.edges.is_empty());
    }

    #[test]
    fn three_tasks_chain_with_two_edges_in_time_order() {
        let board = board_with(
            3,
            &[
                ("t_c", "08:00", "Commute", false),
                ("t_a", "07:00", "Wake up", true),
                ("t_b", "07:30", "Breakfast", false),
            ],
        );
        let chart = parse_flowchart(&generate(Some(&board), 3, ThemeMode::Light)).unwrap();
        let labels: Vec<&str> = chart.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["07:00 - Wake up", "07:30 - Breakfast", "08:00 - Commute"]
        );
        assert_eq!(
            chart.edges,
            vec![
                ("T3_t_a".to_string(), "T3_t_b".to_string()),
                ("T3_t_b".to_string(), "T3_t_c".to_string()),
            ]
        );
        assert!(chart.nodes[0].done);
        assert!(!chart.nodes[1].done);
        assert_eq!(chart.next_of("T3_t_a"), Some("T3_t_b"));
        assert_eq!(chart.next_of("T3_t_c"), None);
    }

    #[test]
    fn markup_for_two_tasks() {
        let board = board_with(
            1,
            &[
                ("t_1", "08:00", "Coffee", true),
                ("t_2", "09:00", "Standup", false),
            ],
        );
        assert_snapshot!(generate(Some(&board), 1, ThemeMode::Dark), @r##"
        %%{init:{"theme":"base","themeVariables":{"fontFamily":"monospace","fontSize":"16px","primaryColor":"#161b22","primaryTextColor":"#c9d1d9","lineColor":"#8b949e","tertiaryColor":"#f0f0f0"}}}%%
        flowchart TD
            classDef done fill:#dcfce7,stroke:#15803d,color:#166534
            T1_t_1["08:00 - Coffee"]
            class T1_t_1 done
            T1_t_2["09:00 - Standup"]
            T1_t_1 --> T1_t_2
        "##);
    }

    #[test]
    fn quotes_are_escaped_and_restored() {
        let board = board_with(0, &[("t_q", "10:00", "Read \"Dune\"\nch. 2", false)]);
        let markup = generate(Some(&board), 0, ThemeMode::Light);
        assert!(markup.contains("#quot;Dune#quot;"));
        assert!(!markup.contains("\nch. 2"));
        let chart = parse_flowchart(&markup).unwrap();
        assert_eq!(chart.nodes[0].label, "10:00 - Read \"Dune\" ch. 2");
    }

    #[test]
    fn foreign_task_ids_still_chain() {
        let board = board_with(
            4,
            &[
                ("task-1", "09:00", "Mail", false),
                ("é 2", "10:00", "Lunch", true),
            ],
        );
        let chart = parse_flowchart(&generate(Some(&board), 4, ThemeMode::Light)).unwrap();
        let ids: Vec<&str> = chart.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["T4_task_1", "T4___2"]);
        assert_eq!(chart.next_of("T4_task_1"), Some("T4___2"));
        assert!(chart.nodes[1].done);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            parse_flowchart("A[\"x\"]"),
            Err(DiagramError::MissingHeader)
        );
        assert_eq!(parse_flowchart(""), Err(DiagramError::MissingHeader));
        assert!(matches!(
            parse_flowchart("flowchart TD\n    subgraph one"),
            Err(DiagramError::Unrecognized { line: 2, .. })
        ));
        assert_eq!(
            parse_flowchart("flowchart TD\n    A[\"a\"]\n    A --> B"),
            Err(DiagramError::UnknownNode("B".into()))
        );
    }
}
