use crate::models::InputRecord;
use crate::progress::{format_count, BoardMode, ProgressView};

pub fn render_index(view: &ProgressView, history: &[InputRecord]) -> String {
    let board = match view.mode {
        BoardMode::FirstRun => FIRST_RUN_PANEL.to_string(),
        BoardMode::Tracking => render_progress(view),
    };

    INDEX_HTML
        .replace("{{BOARD}}", &board)
        .replace("{{HISTORY}}", &render_history(history))
}

fn render_progress(view: &ProgressView) -> String {
    let exceeded = if view.exceeded > 0 {
        format!(
            r#"<div class="stat"><span class="label">Exceeded by</span><span class="value good">{}</span></div>"#,
            format_count(view.exceeded)
        )
    } else {
        String::new()
    };

    PROGRESS_PANEL
        .replace("{{TARGET}}", &format_count(view.total_target))
        .replace("{{ACHIEVED}}", &format_count(view.achieved_leads))
        .replace("{{REMAINING}}", &format_count(view.remaining))
        .replace("{{EXCEEDED}}", &exceeded)
        .replace("{{PERCENT}}", &format!("{:.1}", view.progress_percent))
}

fn render_history(history: &[InputRecord]) -> String {
    if history.is_empty() {
        return r#"<p class="empty">No entries yet.</p>"#.to_string();
    }

    history
        .iter()
        .map(|entry| {
            format!(
                r#"<li>{}: added {} leads (total {} leads)</li>"#,
                escape_html(&entry.timestamp),
                format_count(entry.value),
                format_count(entry.total)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const FIRST_RUN_PANEL: &str = r#"<section class="card">
      <h2>Set a target</h2>
      <p class="subtitle">No overall target yet. Set one with <code>leadctl</code> to start tracking.</p>
    </section>"#;

const PROGRESS_PANEL: &str = r#"<section class="card">
      <h2>Lead target board</h2>
      <div class="panel">
        <div class="stat"><span class="label">Target</span><span class="value">{{TARGET}}</span></div>
        <div class="stat"><span class="label">Achieved</span><span class="value good">{{ACHIEVED}}</span></div>
        <div class="stat"><span class="label">Remaining</span><span class="value warn">{{REMAINING}}</span></div>
        {{EXCEEDED}}
      </div>
      <div class="bar"><div class="fill" style="width: {{PERCENT}}%"></div><span>{{PERCENT}}%</span></div>
    </section>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Lead Board</title>
  <style>
    :root {
      --bg: #0b0b0c;
      --card: #16171a;
      --ink: #f4f4f5;
      --muted: #9ca3af;
      --good: #22c55e;
      --warn: #ef4444;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(520px, 100%);
      display: grid;
      gap: 16px;
    }

    .card {
      background: var(--card);
      border: 1px solid #27272a;
      border-radius: 12px;
      padding: 20px;
      display: grid;
      gap: 12px;
    }

    h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    .subtitle,
    .empty {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(120px, 1fr));
      gap: 12px;
    }

    .stat .label {
      display: block;
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .good {
      color: var(--good);
    }

    .warn {
      color: var(--warn);
    }

    .bar {
      position: relative;
      height: 24px;
      background: #3f3f46;
      border-radius: 999px;
      overflow: hidden;
      text-align: center;
      font-size: 0.85rem;
      line-height: 24px;
    }

    .bar .fill {
      position: absolute;
      inset: 0 auto 0 0;
      background: #16a34a;
    }

    .bar span {
      position: relative;
    }

    ul {
      margin: 0;
      padding: 0;
      list-style: none;
      display: grid;
      gap: 6px;
      max-height: 12rem;
      overflow-y: auto;
    }

    li {
      background: #27272a;
      border-radius: 6px;
      padding: 6px 10px;
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main class="app">
    {{BOARD}}
    <section class="card">
      <h2>Update history</h2>
      <ul>
        {{HISTORY}}
      </ul>
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadSnapshot;

    fn view(target: u64, achieved: u64) -> ProgressView {
        ProgressView::from_snapshot(&LeadSnapshot {
            total_target: target,
            achieved_leads: achieved,
            ..LeadSnapshot::default()
        })
    }

    #[test]
    fn first_run_hides_progress_board() {
        let html = render_index(&view(0, 12), &[]);
        assert!(html.contains("Set a target"));
        assert!(!html.contains("Lead target board"));
        assert!(html.contains("No entries yet."));
    }

    #[test]
    fn progress_board_shows_grouped_counts() {
        let history = vec![InputRecord {
            timestamp: "2026-01-05 09:00:00".to_string(),
            value: 1500,
            total: 10500,
        }];
        let html = render_index(&view(10000, 10500), &history);
        assert!(html.contains("10,000"));
        assert!(html.contains("Exceeded by"));
        assert!(html.contains("100.0%"));
        assert!(html.contains("added 1,500 leads (total 10,500 leads)"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn exceeded_row_only_when_over_target() {
        let html = render_index(&view(100, 80), &[]);
        assert!(!html.contains("Exceeded by"));
        assert!(html.contains("80.0%"));
    }

    #[test]
    fn history_timestamps_are_escaped() {
        let history = vec![InputRecord {
            timestamp: r#"<script>alert("x")</script> & co"#.to_string(),
            value: 3,
            total: 3,
        }];
        let html = render_index(&view(10, 3), &history);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; co: added 3 leads"));
    }
}
