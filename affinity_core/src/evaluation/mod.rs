//! Evaluation - administering forced-choice tasks and scoring the results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use story_world::NumberedTask;

use crate::error::{AffinityError, Result};
use crate::interpreter::{InterpretingAgent, Ranking};

/// How an agent did on one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPerformance {
    Correct,
    Incorrect,
    /// The agent could not decide between the choices.
    Incomplete,
}

impl TaskPerformance {
    /// Grade a ranking against the correct answer.
    pub fn grade(ranking: Ranking, answer: usize) -> Self {
        match ranking {
            Ranking::Chosen(index) if index == answer => TaskPerformance::Correct,
            Ranking::Chosen(_) => TaskPerformance::Incorrect,
            Ranking::Undecided => TaskPerformance::Incomplete,
        }
    }

    /// Spreadsheet value: 1 correct, -1 incorrect, 0 incomplete.
    pub fn score(&self) -> i8 {
        match self {
            TaskPerformance::Correct => 1,
            TaskPerformance::Incorrect => -1,
            TaskPerformance::Incomplete => 0,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            TaskPerformance::Correct => 'C',
            TaskPerformance::Incorrect => 'X',
            TaskPerformance::Incomplete => ' ',
        }
    }

    pub fn is_answered(&self) -> bool {
        !matches!(self, TaskPerformance::Incomplete)
    }
}

/// Outcomes of a batch of tasks, keyed by task number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    outcomes: BTreeMap<u32, TaskPerformance>,
}

impl PerformanceReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a task, replacing any earlier one.
    pub fn record(&mut self, number: u32, performance: TaskPerformance) {
        self.outcomes.insert(number, performance);
    }

    pub fn get(&self, number: u32) -> Option<TaskPerformance> {
        self.outcomes.get(&number).copied()
    }

    /// Outcomes in task-number order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, TaskPerformance)> + '_ {
        self.outcomes.iter().map(|(n, p)| (*n, *p))
    }

    /// Number of administered tasks.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Tasks where the agent picked a choice.
    pub fn answered(&self) -> usize {
        self.outcomes.values().filter(|p| p.is_answered()).count()
    }

    pub fn correct(&self) -> usize {
        self.outcomes
            .values()
            .filter(|p| **p == TaskPerformance::Correct)
            .count()
    }

    /// Share of administered tasks that were answered; 0 when none were administered.
    pub fn answered_ratio(&self) -> f64 {
        ratio(self.answered(), self.len())
    }

    /// Share of answered tasks that were correct; 0 when none were answered.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.answered())
    }

    /// Two-line summary of coverage and accuracy.
    pub fn score_statement(&self) -> String {
        format!(
            "On the {total} tasks, the agent answered {answered}/{total}={coverage:02.0}%\n\
             On the {answered} tasks answered, the agent correctly answered {correct}/{answered}={accuracy:02.0}%",
            total = self.len(),
            answered = self.answered(),
            correct = self.correct(),
            coverage = self.answered_ratio() * 100.0,
            accuracy = self.accuracy() * 100.0,
        )
    }

    /// One `n:\t <score>` line per task number from 1 to the largest
    /// administered; numbers that were not administered are left blank.
    pub fn table(&self) -> String {
        let last = self.outcomes.keys().next_back().copied().unwrap_or(0);
        let mut sheet = String::new();
        for number in 1..=last {
            match self.get(number) {
                Some(performance) => {
                    sheet.push_str(&format!("{}:\t {}\n", number, performance.score()))
                }
                None => sheet.push_str(&format!("{}:\t \n", number)),
            }
        }
        sheet
    }

    /// Compact `1=C, 2=X, 3= ` rendering.
    pub fn to_concise_string(&self) -> String {
        self.iter()
            .map(|(n, p)| format!("{}={}", n, p.symbol()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Have the agent perform every task in order and grade the results.
///
/// Missing action knowledge aborts the whole batch.
pub fn administer_tasks(
    agent: &mut InterpretingAgent,
    tasks: &[NumberedTask],
) -> Result<PerformanceReport> {
    let mut report = PerformanceReport::new();
    for numbered in tasks {
        if numbered.answer >= numbered.task.choices.len() {
            return Err(AffinityError::InvalidChoiceIndex {
                task: numbered.number,
                answer: numbered.answer,
            });
        }

        let ranking = agent.perform_task(&numbered.task)?;
        let performance = TaskPerformance::grade(ranking, numbered.answer);
        tracing::info!(
            task = numbered.number,
            %ranking,
            answer = numbered.answer + 1,
            ?performance,
            "task performed"
        );
        report.record(numbered.number, performance);
    }

    tracing::info!(
        tasks = report.len(),
        answered = report.answered(),
        correct = report.correct(),
        "tasks administered"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::ActionKnowledgeBase;
    use story_world::{ActionEvent, AgentDirectory, Scenario, Task};

    fn agent() -> InterpretingAgent {
        let knowledge = ActionKnowledgeBase::parse_typicality("greets F\nhits E\ncries\n", 2.0).unwrap();
        InterpretingAgent::new(knowledge, AgentDirectory::default())
    }

    fn one(actor: &str, action: &str, acted_upon: &str) -> Scenario {
        Scenario::new(vec![ActionEvent::new(actor, action, acted_upon)])
    }

    fn friendly_task(number: u32, answer: usize) -> NumberedTask {
        NumberedTask {
            number,
            task: Task::new(
                one("A", "greets", "B"),
                one("B", "greets", "A"),
                one("B", "hits", "A"),
            ),
            answer,
        }
    }

    fn undecidable_task(number: u32) -> NumberedTask {
        let cries = Scenario::new(vec![ActionEvent::partial(None, "cries", None)]);
        NumberedTask {
            number,
            task: Task::new(Scenario::default(), cries.clone(), cries),
            answer: 0,
        }
    }

    #[test]
    fn test_grade() {
        assert_eq!(TaskPerformance::grade(Ranking::Chosen(1), 1), TaskPerformance::Correct);
        assert_eq!(TaskPerformance::grade(Ranking::Chosen(0), 1), TaskPerformance::Incorrect);
        assert_eq!(TaskPerformance::grade(Ranking::Undecided, 0), TaskPerformance::Incomplete);
    }

    #[test]
    fn test_administer_tasks() {
        let mut agent = agent();
        let tasks = vec![friendly_task(1, 0), friendly_task(2, 1), undecidable_task(4)];
        let report = administer_tasks(&mut agent, &tasks).unwrap();

        assert_eq!(report.get(1), Some(TaskPerformance::Correct));
        assert_eq!(report.get(2), Some(TaskPerformance::Incorrect));
        assert_eq!(report.get(4), Some(TaskPerformance::Incomplete));
        assert_eq!(report.len(), 3);
        assert_eq!(report.answered(), 2);
        assert_eq!(report.correct(), 1);
        assert!((report.accuracy() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_table_marks_skipped_numbers() {
        let mut report = PerformanceReport::new();
        report.record(1, TaskPerformance::Correct);
        report.record(2, TaskPerformance::Incomplete);
        report.record(4, TaskPerformance::Incorrect);

        assert_eq!(report.table(), "1:\t 1\n2:\t 0\n3:\t \n4:\t -1\n");
        assert_eq!(report.to_concise_string(), "1=C, 2= , 4=X");
    }

    #[test]
    fn test_score_statement() {
        let mut report = PerformanceReport::new();
        report.record(1, TaskPerformance::Correct);
        report.record(2, TaskPerformance::Incorrect);
        report.record(3, TaskPerformance::Correct);
        report.record(4, TaskPerformance::Incomplete);

        assert_eq!(
            report.score_statement(),
            "On the 4 tasks, the agent answered 3/4=75%\n\
             On the 3 tasks answered, the agent correctly answered 2/3=67%"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = PerformanceReport::new();
        assert_eq!(report.answered_ratio(), 0.0);
        assert_eq!(report.accuracy(), 0.0);
        assert_eq!(report.table(), "");
    }

    #[test]
    fn test_invalid_answer_index() {
        let mut agent = agent();
        let err = administer_tasks(&mut agent, &[friendly_task(7, 2)]).unwrap_err();
        assert!(matches!(err, AffinityError::InvalidChoiceIndex { task: 7, answer: 2 }));
    }

    #[test]
    fn test_missing_knowledge_aborts_batch() {
        let mut agent = agent();
        let task = NumberedTask {
            number: 1,
            task: Task::new(one("A", "waltzes", "B"), Scenario::default(), Scenario::default()),
            answer: 0,
        };

        let err = administer_tasks(&mut agent, &[task]).unwrap_err();
        assert_eq!(err.missing_action(), Some("waltzes"));
    }

    #[test]
    fn test_report_serializes() {
        let mut report = PerformanceReport::new();
        report.record(3, TaskPerformance::Correct);

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"outcomes":{"3":"correct"}}"#);
    }
}
