use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mindcare_core::{ResponseEvent, HELPLINES};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use std::io::{self, Stdout};
use std::path::PathBuf;

use crate::responder::Responder;

#[derive(Clone, Debug)]
struct Msg {
    role: Role,
    content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    User,
    Assistant,
    System,
}

struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    fn open_today() -> Result<Self> {
        let dir = crate::state::chat_log_dir()?;
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let path = dir.join(format!("{today}.md"));
        Ok(Self { path })
    }

    fn append_system(&mut self, msg: &str) -> Result<()> {
        self.append("system", msg)
    }

    fn append_user(&mut self, msg: &str) -> Result<()> {
        self.append("user", msg)
    }

    fn append_assistant(&mut self, ev: &ResponseEvent) -> Result<()> {
        let role = match ev.topic {
            Some(t) => format!("assistant:{t}"),
            None => "assistant:oracle".to_string(),
        };
        self.append(&role, &ev.response)
    }

    fn append(&mut self, role: &str, msg: &str) -> Result<()> {
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            f,
            "- {} [{}] {}",
            chrono::Utc::now().to_rfc3339(),
            role,
            msg.replace('\n', " ")
        )?;
        Ok(())
    }
}

pub fn run_chat(responder: &Responder) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chat_loop(&mut terminal, responder);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn chat_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, responder: &Responder) -> Result<()> {
    let mut messages: Vec<Msg> = vec![Msg {
        role: Role::System,
        content: "Share whatever is on your mind. Type /help for commands.".to_string(),
    }];

    let mut input = String::new();
    let mut show_help = true;
    let mode = match responder.oracle_name() {
        Some(name) => format!("oracle: {name}"),
        None => "canned responses".to_string(),
    };

    let mut log = ChatLog::open_today()?;
    log.append_system("session_start")?;

    loop {
        terminal.draw(|f| {
            let size = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(size);

            let splash = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    "MindCare",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(mode.as_str(), Style::default().fg(Color::Gray))),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(splash, chunks[0]);

            let header = Block::default().borders(Borders::ALL).title("conversation");

            let mut lines: Vec<Line> = Vec::new();
            if show_help {
                lines.push(Line::from(Span::styled(
                    "Shortcuts: Enter=send, Esc=quit, Ctrl-H=toggle help",
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::raw("Commands: /help /status /resources /clear"));
                lines.push(Line::raw(""));
            }

            for m in &messages {
                let (tag, color) = match m.role {
                    Role::User => ("you", Color::Cyan),
                    Role::Assistant => ("mindcare", Color::Green),
                    Role::System => ("system", Color::Gray),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", tag), Style::default().fg(color)),
                    Span::raw(m.content.clone()),
                ]));
                lines.push(Line::raw(""));
            }

            // keep the newest lines in view
            let visible = chunks[1].height.saturating_sub(2) as usize;
            let skip = lines.len().saturating_sub(visible) as u16;
            let history = Paragraph::new(Text::from(lines))
                .block(header)
                .wrap(Wrap { trim: false })
                .scroll((skip, 0));
            f.render_widget(history, chunks[1]);

            let input_block = Block::default().borders(Borders::ALL).title("message");
            let input_widget = Paragraph::new(input.as_str())
                .block(input_block)
                .style(Style::default().fg(Color::White));
            f.render_widget(input_widget, chunks[2]);
        })?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if ctrl => break,
                    KeyCode::Char('h') if ctrl => {
                        show_help = !show_help;
                    }
                    KeyCode::Enter => {
                        let trimmed = input.trim().to_string();
                        input.clear();
                        if trimmed.is_empty() {
                            continue;
                        }

                        if let Some(cmd) = parse_slash(&trimmed) {
                            match cmd {
                                Slash::Clear => {
                                    messages.retain(|m| m.role == Role::System);
                                    log.append_system("history_cleared")?;
                                }
                                other => messages.push(Msg {
                                    role: Role::System,
                                    content: slash_reply(other, responder),
                                }),
                            }
                            continue;
                        }

                        log.append_user(&trimmed)?;
                        let history = conversation_texts(&messages);
                        messages.push(Msg {
                            role: Role::User,
                            content: trimmed.clone(),
                        });

                        let ev = respond_blocking(responder, &trimmed, &history)?;
                        log.append_assistant(&ev)?;
                        messages.push(Msg {
                            role: Role::Assistant,
                            content: ev.response,
                        });
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                    }
                    _ => {}
                }
            }
        }
    }

    log.append_system("session_end")?;
    Ok(())
}

/// The CLI runs under `#[tokio::main]`; calling `block_on` on the current
/// runtime directly would panic, so step out with `block_in_place` first.
fn respond_blocking(responder: &Responder, message: &str, history: &[String]) -> Result<ResponseEvent> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        Ok(tokio::task::block_in_place(|| {
            handle.block_on(responder.respond(message, history))
        }))
    } else {
        let rt = tokio::runtime::Runtime::new()?;
        Ok(rt.block_on(responder.respond(message, history)))
    }
}

/// Prior user/assistant turns, oldest first.
fn conversation_texts(messages: &[Msg]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| m.content.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slash {
    Help,
    Status,
    Resources,
    Clear,
    Unknown,
}

fn parse_slash(input: &str) -> Option<Slash> {
    let s = input.trim();
    if !s.starts_with('/') {
        return None;
    }
    Some(match s {
        "/help" => Slash::Help,
        "/status" => Slash::Status,
        "/resources" => Slash::Resources,
        "/clear" => Slash::Clear,
        _ => Slash::Unknown,
    })
}

fn slash_reply(cmd: Slash, responder: &Responder) -> String {
    match cmd {
        Slash::Help => "Commands:\n\
- /help\n\
- /status (which responder is answering)\n\
- /resources (crisis helplines)\n\
- /clear (forget this conversation)\n\
\nShortcuts: Enter=send, Esc=quit, Ctrl-H=toggle help"
            .to_string(),
        Slash::Status => match responder.oracle_name() {
            Some(name) => format!(
                "Status: answers come from the {name} oracle, with canned replies as fallback. \
Logs are saved daily under ~/.mindcare/chat/YYYY-MM-DD.md"
            ),
            None => "Status: canned replies (no oracle key configured). \
Logs are saved daily under ~/.mindcare/chat/YYYY-MM-DD.md"
                .to_string(),
        },
        Slash::Resources => {
            let mut s = String::from("If you are in danger, contact emergency services now.\n");
            for h in HELPLINES {
                s.push_str(&format!("- {}: {} ({})\n", h.name, h.number, h.available));
            }
            s
        }
        Slash::Clear => "Conversation cleared.".to_string(),
        Slash::Unknown => "Unknown command. Try /help".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindcare_core::Classifier;

    #[test]
    fn test_parse_slash() {
        assert_eq!(parse_slash("/help"), Some(Slash::Help));
        assert_eq!(parse_slash(" /resources "), Some(Slash::Resources));
        assert_eq!(parse_slash("/nope"), Some(Slash::Unknown));
        assert_eq!(parse_slash("hello"), None);
    }

    #[test]
    fn test_conversation_texts_skip_system_lines() {
        let msgs = vec![
            Msg {
                role: Role::System,
                content: "banner".to_string(),
            },
            Msg {
                role: Role::User,
                content: "I can't sleep".to_string(),
            },
            Msg {
                role: Role::Assistant,
                content: "Try a wind-down routine".to_string(),
            },
        ];
        assert_eq!(
            conversation_texts(&msgs),
            vec!["I can't sleep".to_string(), "Try a wind-down routine".to_string()]
        );
    }

    #[test]
    fn test_resources_reply_lists_helplines() {
        let r = Responder::new(Classifier::builtin().unwrap());
        let s = slash_reply(Slash::Resources, &r);
        assert!(s.contains("988"));
        assert!(slash_reply(Slash::Status, &r).contains("canned"));
    }

    #[test]
    fn test_respond_blocking_outside_runtime() {
        let r = Responder::new(Classifier::builtin().unwrap());
        let ev = respond_blocking(&r, "hello", &[]).unwrap();
        assert!(!ev.response.is_empty());
    }
}
