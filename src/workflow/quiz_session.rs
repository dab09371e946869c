//! 测验会话状态机 - 流程层
//!
//! 状态只有"当前题号"。测验内容本身只读，所有操作都是
//! `(quiz, index, action)` 的纯函数；`QuizSession` 只是把题号和计分板
//! 显式地保存下来，供界面层持有。

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::Quiz;

pub const NO_QUIZ_ON_START: &str = "No quiz available!";
pub const NO_QUIZ: &str = "No quiz available";
pub const QUESTION_NOT_FOUND: &str = "Question not found";
pub const QUIZ_NOT_LOADED: &str = "The quiz did not load correctly.";
pub const SUBMIT_QUESTION_NOT_FOUND: &str = "Question not found.";

/// 界面需要展示的内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizView {
    /// 题干（或提示信息）
    pub question: String,
    /// 可选项（已打乱顺序）
    pub options: Vec<String>,
    /// 上一次作答结果，切题时清空
    pub result: String,
}

impl QuizView {
    fn sentinel(message: &str) -> Self {
        Self {
            question: message.to_string(),
            options: Vec::new(),
            result: String::new(),
        }
    }

    fn question(quiz: &Quiz, index: usize) -> Option<Self> {
        quiz.get(index).map(|item| Self {
            question: item.question.clone(),
            options: item.options.clone(),
            result: String::new(),
        })
    }
}

fn available(quiz: Option<&Quiz>) -> Option<&Quiz> {
    quiz.filter(|q| !q.is_empty())
}

/// 开始测验
///
/// 题号超出范围时回到第 0 题
pub fn init(quiz: Option<&Quiz>, requested_index: usize) -> QuizView {
    let Some(quiz) = available(quiz) else {
        return QuizView::sentinel(NO_QUIZ_ON_START);
    };

    let index = if requested_index > quiz.len() - 1 {
        0
    } else {
        requested_index
    };

    QuizView::question(quiz, index).unwrap_or_else(|| QuizView::sentinel(QUESTION_NOT_FOUND))
}

/// 跳转到指定题目
///
/// 与 `init` 不同，题号超出范围时不回退，直接提示找不到题目
pub fn goto(quiz: Option<&Quiz>, index: usize) -> QuizView {
    let Some(quiz) = quiz else {
        return QuizView::sentinel(NO_QUIZ);
    };

    QuizView::question(quiz, index).unwrap_or_else(|| QuizView::sentinel(QUESTION_NOT_FOUND))
}

/// 提交答案，返回判定文本
///
/// 按字符串精确比较（区分大小写）；没有正确答案的题目任何作答都判错。
///
/// 判定文本会原样带上作答和正确答案，选项本身含有 "Correct" 字样时，
/// 错误判定的文本中也会出现该词。
pub fn submit(quiz: Option<&Quiz>, index: usize, selected_option: &str) -> String {
    let Some(quiz) = quiz else {
        return QUIZ_NOT_LOADED.to_string();
    };

    let Some(item) = quiz.get(index) else {
        return SUBMIT_QUESTION_NOT_FOUND.to_string();
    };

    let answer = item.correct_answer.as_deref();
    let correct = answer.unwrap_or("");

    if is_correct(selected_option, answer) {
        format!("✅ Correct! Answer: {}", correct)
    } else {
        format!(
            "❌ Incorrect. Your answer: {}. Right answer: {}",
            selected_option, correct
        )
    }
}

fn is_correct(selected: &str, correct: Option<&str>) -> bool {
    correct == Some(selected)
}

/// 计分板：记录每道题最近一次作答是否正确
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    verdicts: BTreeMap<usize, bool>,
}

impl Scoreboard {
    pub fn record(&mut self, index: usize, correct: bool) {
        self.verdicts.insert(index, correct);
    }

    pub fn answered(&self) -> usize {
        self.verdicts.len()
    }

    pub fn correct(&self) -> usize {
        self.verdicts.values().filter(|v| **v).count()
    }

    pub fn summary(&self, total: usize) -> String {
        format!("Score: {}/{} (total {})", self.correct(), self.answered(), total)
    }
}

/// 一次测验会话
///
/// 新的文档分析完成后整体替换，不跨会话保存
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    quiz: Option<Arc<Quiz>>,
    current_index: usize,
    scoreboard: Scoreboard,
}

impl QuizSession {
    pub fn new(quiz: Arc<Quiz>) -> Self {
        Self {
            quiz: Some(quiz),
            current_index: 0,
            scoreboard: Scoreboard::default(),
        }
    }

    /// 没有测验的会话
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_deref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.quiz().map(Quiz::len).unwrap_or(0)
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// 开始测验，题号越界时同步回到 0
    pub fn start(&mut self) -> QuizView {
        if let Some(quiz) = available(self.quiz()) {
            if self.current_index >= quiz.len() {
                self.current_index = 0;
            }
        }
        init(self.quiz(), self.current_index)
    }

    /// 切换到指定题目
    pub fn navigate(&mut self, index: usize) -> QuizView {
        self.current_index = index;
        goto(self.quiz(), index)
    }

    /// 对当前题目提交答案
    pub fn answer(&mut self, selected_option: &str) -> String {
        let verdict = submit(self.quiz(), self.current_index, selected_option);

        let index = self.current_index;
        let outcome = self.quiz().and_then(|q| q.get(index)).map(|item| {
            is_correct(selected_option, item.correct_answer.as_deref())
        });
        if let Some(correct) = outcome {
            self.scoreboard.record(index, correct);
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuizItem;

    fn quiz() -> Quiz {
        Quiz::new(vec![
            QuizItem::new(
                "Q1",
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                Some("B".into()),
            ),
            QuizItem::new(
                "Q2",
                vec!["w".into(), "x".into(), "y".into(), "z".into()],
                Some("z".into()),
            ),
        ])
    }

    #[test]
    fn test_init_without_quiz() {
        let view = init(None, 0);
        assert_eq!(view.question, NO_QUIZ_ON_START);
        assert!(view.options.is_empty());

        let view = init(Some(&Quiz::default()), 0);
        assert_eq!(view.question, NO_QUIZ_ON_START);
    }

    #[test]
    fn test_init_clamps_to_zero() {
        let quiz = quiz();
        assert_eq!(init(Some(&quiz), 1).question, "Q2");
        let view = init(Some(&quiz), 7);
        assert_eq!(view.question, "Q1");
        assert_eq!(view.options, vec!["A", "B", "C", "D"]);
        assert!(view.result.is_empty());
    }

    #[test]
    fn test_goto_rejects_out_of_range() {
        let quiz = quiz();
        assert_eq!(goto(Some(&quiz), 1).question, "Q2");
        let view = goto(Some(&quiz), 7);
        assert_eq!(view.question, QUESTION_NOT_FOUND);
        assert!(view.options.is_empty());
        assert_eq!(goto(None, 0).question, NO_QUIZ);
    }

    #[test]
    fn test_submit_verdicts() {
        let quiz = quiz();
        let ok = submit(Some(&quiz), 0, "B");
        assert_eq!(ok, "✅ Correct! Answer: B");

        let wrong = submit(Some(&quiz), 0, "A");
        assert!(!wrong.contains("Correct"));
        assert!(wrong.contains("Your answer: A"));
        assert!(wrong.contains("Right answer: B"));

        // 区分大小写
        assert!(!submit(Some(&quiz), 1, "Z").contains("Correct"));

        assert_eq!(submit(Some(&quiz), 9, "B"), SUBMIT_QUESTION_NOT_FOUND);
        assert_eq!(submit(None, 0, "B"), QUIZ_NOT_LOADED);
    }

    #[test]
    fn test_submit_without_correct_answer_never_matches() {
        let quiz = Quiz::new(vec![QuizItem::new("Q", vec!["A".into()], None)]);
        assert!(submit(Some(&quiz), 0, "A").starts_with("❌"));
    }

    #[test]
    fn test_empty_answer_against_missing_correct_answer() {
        let quiz = Arc::new(Quiz::new(vec![QuizItem::new(
            "Q",
            vec!["A".into(), "B".into()],
            None,
        )]));

        let verdict = submit(Some(&*quiz), 0, "");
        assert!(!verdict.contains("Correct"));
        assert!(verdict.starts_with("❌"));

        let mut session = QuizSession::new(quiz);
        assert!(!session.answer("").contains("Correct"));
        assert_eq!(session.scoreboard().answered(), 1);
        assert_eq!(session.scoreboard().correct(), 0);
    }

    #[test]
    fn test_incorrect_verdict_quotes_option_text() {
        let quiz = Quiz::new(vec![QuizItem::new(
            "Q",
            vec!["Correct".into(), "Wrong".into()],
            Some("Wrong".into()),
        )]);

        let verdict = submit(Some(&quiz), 0, "Correct");
        assert!(verdict.starts_with("❌"));
        assert!(verdict.contains("Your answer: Correct."));
    }

    #[test]
    fn test_session_tracks_index_and_score() {
        let mut session = QuizSession::new(Arc::new(quiz()));
        assert_eq!(session.start().question, "Q1");

        assert!(session.answer("B").contains("Correct"));
        assert_eq!(session.navigate(1).question, "Q2");
        assert_eq!(session.current_index(), 1);
        session.answer("w");
        session.answer("z");

        assert_eq!(session.scoreboard().answered(), 2);
        assert_eq!(session.scoreboard().correct(), 2);
        assert_eq!(session.scoreboard().summary(2), "Score: 2/2 (total 2)");
    }

    #[test]
    fn test_session_start_after_bad_navigation() {
        let mut session = QuizSession::new(Arc::new(quiz()));
        assert_eq!(session.navigate(5).question, QUESTION_NOT_FOUND);
        assert_eq!(session.answer("B"), SUBMIT_QUESTION_NOT_FOUND);
        assert_eq!(session.scoreboard().answered(), 0);

        assert_eq!(session.start().question, "Q1");
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_empty_session() {
        let mut session = QuizSession::empty();
        assert_eq!(session.start().question, NO_QUIZ_ON_START);
        assert_eq!(session.answer("A"), QUIZ_NOT_LOADED);
        assert_eq!(session.question_count(), 0);
    }
}
