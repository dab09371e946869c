//! 终端测验界面
//!
//! 把用户输入的命令转换成对 `QuizSession` 的调用，并渲染结果

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::workflow::{QuizSession, QuizView};

pub const HELP_TEXT: &str = "\
Commands:
  start          start the quiz (from the current question, or 0)
  goto N | N     show question N (0-based)
  next | prev    move to the next / previous question
  answer K       answer with option number K (1-based) or the exact option text
  score          show the current score
  help           show this help
  quit           leave the quiz";

/// 测验命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    Start,
    Goto(usize),
    Next,
    Prev,
    Answer(String),
    Score,
    Help,
    Quit,
    /// 无法识别的输入
    Unknown(String),
}

/// 解析一行输入
pub fn parse_command(line: &str) -> QuizCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "start" | "s" => QuizCommand::Start,
        "next" | "n" => QuizCommand::Next,
        "prev" | "p" => QuizCommand::Prev,
        "score" => QuizCommand::Score,
        "help" | "h" | "?" => QuizCommand::Help,
        "quit" | "q" | "exit" => QuizCommand::Quit,
        "goto" | "g" => match rest.parse() {
            Ok(index) => QuizCommand::Goto(index),
            Err(_) => QuizCommand::Unknown(line.to_string()),
        },
        "answer" | "a" if !rest.is_empty() => QuizCommand::Answer(rest.to_string()),
        _ => match line.parse() {
            Ok(index) => QuizCommand::Goto(index),
            Err(_) => QuizCommand::Unknown(line.to_string()),
        },
    }
}

/// 渲染题目视图
pub fn render_view(view: &QuizView, index: usize, total: usize) -> String {
    let mut out = String::new();
    if view.options.is_empty() {
        out.push_str(&view.question);
    } else {
        out.push_str(&format!("Question #{} (of {})\n{}", index, total, view.question));
        for (i, option) in view.options.iter().enumerate() {
            out.push_str(&format!("\n  {}) {}", i + 1, option));
        }
    }
    if !view.result.is_empty() {
        out.push_str(&format!("\n{}", view.result));
    }
    out
}

/// 终端测验
pub struct QuizConsole {
    session: QuizSession,
}

impl QuizConsole {
    pub fn new(session: QuizSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// 执行一条命令，返回要显示的文本；`None` 表示退出
    pub fn handle(&mut self, command: QuizCommand) -> Option<String> {
        let output = match command {
            QuizCommand::Start => {
                let view = self.session.start();
                self.render(&view)
            }
            QuizCommand::Goto(index) => {
                let view = self.session.navigate(index);
                self.render(&view)
            }
            QuizCommand::Next => {
                let view = self.session.navigate(self.session.current_index() + 1);
                self.render(&view)
            }
            QuizCommand::Prev => {
                let view = self
                    .session
                    .navigate(self.session.current_index().saturating_sub(1));
                self.render(&view)
            }
            QuizCommand::Answer(raw) => {
                let selected = self.resolve_option(&raw);
                self.session.answer(&selected)
            }
            QuizCommand::Score => self
                .session
                .scoreboard()
                .summary(self.session.question_count()),
            QuizCommand::Help => HELP_TEXT.to_string(),
            QuizCommand::Quit => return None,
            QuizCommand::Unknown(input) => {
                format!("Unknown command: {} (type `help`)", input)
            }
        };
        Some(output)
    }

    fn render(&self, view: &QuizView) -> String {
        render_view(view, self.session.current_index(), self.session.question_count())
    }

    /// 选项编号转换为选项文本；不是合法编号时按原文作答
    fn resolve_option(&self, raw: &str) -> String {
        let options = self
            .session
            .quiz()
            .and_then(|quiz| quiz.get(self.session.current_index()))
            .map(|item| item.options.as_slice())
            .unwrap_or(&[]);

        match raw.parse::<usize>() {
            Ok(n) if n >= 1 && n <= options.len() => options[n - 1].clone(),
            _ => raw.to_string(),
        }
    }

    /// 从标准输入读取命令直到 `quit` 或输入结束
    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        write_block(&mut stdout, HELP_TEXT).await?;

        loop {
            stdout.write_all(b"quiz> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match self.handle(parse_command(&line)) {
                Some(output) => write_block(&mut stdout, &output).await?,
                None => break,
            }
        }

        let summary = self
            .session
            .scoreboard()
            .summary(self.session.question_count());
        write_block(&mut stdout, &summary).await?;
        Ok(())
    }
}

async fn write_block<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Quiz, QuizItem};
    use std::sync::Arc;

    fn console() -> QuizConsole {
        let quiz = Quiz::new(vec![
            QuizItem::new(
                "Which service reads text from images?",
                vec!["Speech".into(), "Vision OCR".into(), "Translator".into(), "Bot".into()],
                Some("Vision OCR".into()),
            ),
            QuizItem::new(
                "Q2",
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                Some("d".into()),
            ),
        ]);
        QuizConsole::new(QuizSession::new(Arc::new(quiz)))
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("start"), QuizCommand::Start);
        assert_eq!(parse_command("  goto 3 "), QuizCommand::Goto(3));
        assert_eq!(parse_command("12"), QuizCommand::Goto(12));
        assert_eq!(
            parse_command("answer Vision OCR"),
            QuizCommand::Answer("Vision OCR".into())
        );
        assert_eq!(parse_command("a 2"), QuizCommand::Answer("2".into()));
        assert_eq!(parse_command("QUIT"), QuizCommand::Quit);
        assert_eq!(parse_command("goto x"), QuizCommand::Unknown("goto x".into()));
        assert_eq!(parse_command("answer"), QuizCommand::Unknown("answer".into()));
        assert_eq!(parse_command("-1"), QuizCommand::Unknown("-1".into()));
    }

    #[test]
    fn test_answer_by_number_and_text() {
        let mut console = console();
        let view = console.handle(QuizCommand::Start).unwrap();
        assert!(view.contains("2) Vision OCR"));

        let verdict = console.handle(QuizCommand::Answer("2".into())).unwrap();
        assert!(verdict.contains("Correct"));

        let verdict = console.handle(QuizCommand::Answer("speech".into())).unwrap();
        assert!(verdict.contains("Your answer: speech"));

        // 超出编号范围时按原文比较
        let verdict = console.handle(QuizCommand::Answer("9".into())).unwrap();
        assert!(verdict.contains("Your answer: 9"));
    }

    #[test]
    fn test_navigation_out_of_range_shows_not_found() {
        let mut console = console();
        assert!(console.handle(QuizCommand::Next).unwrap().contains("Q2"));
        assert_eq!(console.handle(QuizCommand::Next).unwrap(), "Question not found");
        assert!(console.handle(QuizCommand::Prev).unwrap().contains("Q2"));
        assert!(console
            .handle(QuizCommand::Answer("4".into()))
            .unwrap()
            .contains("Correct"));
        assert_eq!(
            console.handle(QuizCommand::Score).unwrap(),
            "Score: 1/1 (total 2)"
        );
        assert_eq!(console.handle(QuizCommand::Quit), None);
    }
}
