use crate::client::{AuthApi, LeadApi};
use crate::controller::{LeadBoard, Level, ResetState, Signal};
use crate::models::InputRecord;
use crate::progress::{format_count, BoardMode, ProgressView};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::sleep;

const BAR_WIDTH: usize = 20;

const HELP: &str = "commands: show | add <n> | target <n> | undo | redo | reset | login | logout | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Add(String),
    Target(String),
    Undo,
    Redo,
    Reset,
    Login,
    Logout,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim().to_string();
        match name.to_ascii_lowercase().as_str() {
            "" | "show" => Ok(Self::Show),
            "add" => Ok(Self::Add(arg)),
            "target" => Ok(Self::Target(arg)),
            "undo" => Ok(Self::Undo),
            "redo" => Ok(Self::Redo),
            "reset" => Ok(Self::Reset),
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`")),
        }
    }
}

pub async fn run<A, R, W>(board: &mut LeadBoard<A>, input: R, out: &mut W) -> std::io::Result<()>
where
    A: LeadApi + AuthApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    writeln!(out, "Checking session...")?;
    while !board.start().await {
        let delay = flush_signals(board, out)?;
        if let Some(delay) = delay {
            sleep(delay).await;
        }
    }
    flush_signals(board, out)?;
    render(board, out)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}\n{HELP}")?;
                continue;
            }
        };

        match command {
            Command::Show => {}
            Command::Add(value) => {
                board.set_lead_input(value);
                board.submit_lead().await;
            }
            Command::Target(value) => {
                board.set_target_input(value);
                board.update_target().await;
            }
            Command::Undo => {
                board.undo().await;
            }
            Command::Redo => {
                board.redo().await;
            }
            Command::Reset => {
                board.request_reset();
            }
            Command::Login => board.open_login(),
            Command::Logout => board.logout().await,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Quit => break,
        }

        if board.login_prompt().is_open() {
            prompt_login(board, &mut lines, out).await?;
        }
        if board.reset_state() == ResetState::PendingConfirmation {
            confirm_reset(board, &mut lines, out).await?;
        }

        flush_signals(board, out)?;
        render(board, out)?;
    }

    Ok(())
}

async fn prompt_login<A, R, W>(board: &mut LeadBoard<A>, lines: &mut Lines<R>, out: &mut W) -> std::io::Result<()>
where
    A: LeadApi + AuthApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Log in to edit the board.")?;
    write!(out, "email: ")?;
    out.flush()?;
    let Some(email) = lines.next_line().await? else {
        board.dismiss_login();
        return Ok(());
    };
    write!(out, "password: ")?;
    out.flush()?;
    let Some(password) = lines.next_line().await? else {
        board.dismiss_login();
        return Ok(());
    };

    board.login(&email, password.trim_end_matches('\r')).await;
    if board.login_prompt().is_open() {
        board.dismiss_login();
        writeln!(out, "Type `login` to try again.")?;
    }
    Ok(())
}

async fn confirm_reset<A, R, W>(board: &mut LeadBoard<A>, lines: &mut Lines<R>, out: &mut W) -> std::io::Result<()>
where
    A: LeadApi + AuthApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "Reset the whole board? [y/N] ")?;
    out.flush()?;
    let answer = lines.next_line().await?.unwrap_or_default();
    if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        board.confirm_reset().await;
    } else {
        board.cancel_reset();
    }
    Ok(())
}

fn flush_signals<A, W>(board: &mut LeadBoard<A>, out: &mut W) -> std::io::Result<Option<std::time::Duration>>
where
    A: LeadApi + AuthApi,
    W: Write,
{
    let mut reload = None;
    for signal in board.drain_signals() {
        match signal {
            Signal::Notify(notice) => {
                let tag = match notice.level {
                    Level::Info => "info",
                    Level::Success => "ok",
                    Level::Warning => "warn",
                    Level::Error => "error",
                };
                writeln!(out, "[{tag}] {}", notice.message)?;
            }
            Signal::Celebrate => writeln!(out, "*** Nice work! ***")?,
            Signal::Reload(delay) => {
                writeln!(out, "Reloading in {}s...", delay.as_secs())?;
                reload = Some(delay);
            }
        }
    }
    Ok(reload)
}

fn render<A, W>(board: &LeadBoard<A>, out: &mut W) -> std::io::Result<()>
where
    A: LeadApi + AuthApi,
    W: Write,
{
    if let (Some(view), Some(snapshot)) = (board.view(), board.snapshot()) {
        write!(out, "{}", render_board(&view, &snapshot.input_history))?;
    }
    Ok(())
}

pub fn render_board(view: &ProgressView, history: &[InputRecord]) -> String {
    let mut text = String::new();
    if view.mode == BoardMode::FirstRun {
        text.push_str("No overall target yet. Use `target <n>` to set one.\n");
        return text;
    }

    text.push_str(&format!("Target:    {} leads\n", format_count(view.total_target)));
    text.push_str(&format!("Achieved:  {}\n", format_count(view.achieved_leads)));
    text.push_str(&format!("Remaining: {}\n", format_count(view.remaining)));
    if view.exceeded > 0 {
        text.push_str(&format!("Exceeded:  {}\n", format_count(view.exceeded)));
    }

    let filled = ((view.progress_percent / 100.0 * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    text.push_str(&format!(
        "[{}{}] {}\n",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        view.percent_label()
    ));
    text.push_str(&format!(
        "undo: {} | redo: {}\n",
        availability(view.can_undo),
        availability(view.can_redo)
    ));

    if history.is_empty() {
        text.push_str("History: no entries yet.\n");
    } else {
        text.push_str("History:\n");
        for entry in history {
            text.push_str(&format!(
                "  {}: +{} leads (total {})\n",
                entry.timestamp,
                format_count(entry.value),
                format_count(entry.total)
            ));
        }
    }
    text
}

fn availability(enabled: bool) -> &'static str {
    if enabled { "available" } else { "disabled" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use crate::ledger::{LeadLedger, LedgerError};
    use crate::models::LeadSnapshot;
    use std::sync::Mutex;

    struct LocalApi {
        ledger: Mutex<LeadLedger>,
        session: Mutex<bool>,
    }

    impl LocalApi {
        fn new(target: u64, logged_in: bool) -> Self {
            let mut ledger = LeadLedger::default();
            if target > 0 {
                ledger.set_target(target as i64).unwrap();
            }
            Self {
                ledger: Mutex::new(ledger),
                session: Mutex::new(logged_in),
            }
        }

        fn edit(&self, change: impl FnOnce(&mut LeadLedger) -> Result<(), LedgerError>) -> Result<(), ApiError> {
            if !*self.session.lock().unwrap() {
                return Err(ApiError::rejected(401, "login required"));
            }
            let mut ledger = self.ledger.lock().unwrap();
            change(&mut *ledger).map_err(|err| ApiError::rejected(409, err.to_string()))
        }
    }

    impl LeadApi for LocalApi {
        async fn fetch_snapshot(&self) -> Result<LeadSnapshot, ApiError> {
            Ok(self.ledger.lock().unwrap().snapshot())
        }

        async fn add_lead(&self, value: i64) -> Result<(), ApiError> {
            self.edit(|ledger| ledger.add_leads(value, "2026-01-05 09:00:00".to_string()))
        }

        async fn set_target(&self, new_target: i64) -> Result<(), ApiError> {
            self.edit(|ledger| ledger.set_target(new_target))
        }

        async fn undo(&self) -> Result<(), ApiError> {
            self.edit(LeadLedger::undo)
        }

        async fn redo(&self) -> Result<(), ApiError> {
            self.edit(LeadLedger::redo)
        }

        async fn reset_system(&self) -> Result<(), ApiError> {
            self.edit(|ledger| {
                ledger.reset();
                Ok(())
            })
        }
    }

    impl AuthApi for LocalApi {
        async fn login(&self, _email: &str, password: &str) -> Result<(), ApiError> {
            if password != "secret" {
                return Err(ApiError::rejected(401, "invalid email or password"));
            }
            *self.session.lock().unwrap() = true;
            Ok(())
        }

        async fn logout(&self) -> Result<(), ApiError> {
            *self.session.lock().unwrap() = false;
            Ok(())
        }

        async fn refresh(&self) -> Result<(), ApiError> {
            if *self.session.lock().unwrap() {
                Ok(())
            } else {
                Err(ApiError::rejected(401, "no session"))
            }
        }
    }

    async fn session_output(api: LocalApi, script: &str) -> (String, LeadBoard<LocalApi>) {
        let mut board = LeadBoard::new(api);
        let mut out = Vec::new();
        run(&mut board, script.as_bytes(), &mut out).await.unwrap();
        (String::from_utf8(out).unwrap(), board)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("add 25"), Ok(Command::Add("25".to_string())));
        assert_eq!(Command::parse("  TARGET   100 "), Ok(Command::Target("100".to_string())));
        assert_eq!(Command::parse("add"), Ok(Command::Add(String::new())));
        assert_eq!(Command::parse(""), Ok(Command::Show));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
        assert!(Command::parse("launch").is_err());
    }

    #[tokio::test]
    async fn first_run_then_target_then_add() {
        let (output, board) = session_output(LocalApi::new(0, true), "target 100\nadd 80\nadd 25\nquit\n").await;

        assert!(output.contains("No overall target yet."));
        assert!(output.contains("[ok] Target updated"));
        assert!(output.contains("[ok] Updated this week's leads"));
        assert!(output.contains("[ok] Goal reached!"));
        assert!(output.contains("Exceeded:  5"));
        assert!(output.contains("100.0%"));
        assert_eq!(board.snapshot().unwrap().achieved_leads, 105);
    }

    #[tokio::test]
    async fn anonymous_add_prompts_for_login() {
        let (output, board) =
            session_output(LocalApi::new(100, false), "add 5\nowner@example.com\nsecret\nadd 5\n").await;

        assert!(output.contains("Log in to edit the board."));
        assert!(output.contains("[ok] Logged in"));
        assert_eq!(board.snapshot().unwrap().achieved_leads, 5);
        assert_eq!(board.snapshot().unwrap().input_history.len(), 1);
    }

    #[tokio::test]
    async fn declined_reset_keeps_board() {
        let (output, board) = session_output(LocalApi::new(100, true), "add 10\nreset\nn\n").await;

        assert!(output.contains("Reset the whole board? [y/N]"));
        assert!(!output.contains("Board has been reset"));
        assert_eq!(board.snapshot().unwrap().achieved_leads, 10);
    }

    #[tokio::test]
    async fn confirmed_reset_clears_board() {
        let (output, board) = session_output(LocalApi::new(100, true), "add 10\nreset\ny\n").await;

        assert!(output.contains("[ok] Board has been reset"));
        assert_eq!(board.snapshot().unwrap().total_target, 0);
    }

    #[tokio::test]
    async fn invalid_value_warns() {
        let (output, board) = session_output(LocalApi::new(100, true), "add lots\n").await;
        assert!(output.contains("[warn] Please enter a valid number"));
        assert_eq!(board.snapshot().unwrap().achieved_leads, 0);
    }

    #[test]
    fn board_text_shows_bar_and_availability() {
        let view = ProgressView::from_snapshot(&LeadSnapshot {
            total_target: 100,
            achieved_leads: 50,
            history_stack: vec![serde_json::json!({})],
            ..LeadSnapshot::default()
        });
        let text = render_board(&view, &[]);
        assert!(text.contains("[##########----------] 50.0%"));
        assert!(text.contains("undo: available | redo: disabled"));
        assert!(text.contains("History: no entries yet."));
    }
}
