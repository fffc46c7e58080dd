//! Compare command handler.
//!
//! Runs every strategy over the same questions so answers and runtimes can
//! be read side by side.

use super::pipeline::Pipeline;
use anyhow::Context;
use clap::Args;
use grounded_core::config::AppConfig;
use grounded_knowledge::{PipelineResult, Strategy};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Run every strategy and report side by side
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("input")
        .required(true)
        .multiple(true)
        .args(["question", "questions"])
))]
pub struct CompareCommand {
    /// A single question
    pub question: Option<String>,

    /// File with one question per line (blank lines and # comments ignored)
    #[arg(short = 'f', long)]
    pub questions: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct QuestionReport {
    question: String,
    runs: Vec<StrategyRun>,
}

#[derive(Debug, Serialize)]
struct StrategyRun {
    strategy: Strategy,
    #[serde(flatten)]
    result: PipelineResult,
}

impl CompareCommand {
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        let questions = self.collect_questions()?;
        if questions.is_empty() {
            anyhow::bail!("No questions to compare");
        }

        tracing::info!("Comparing strategies on {} questions", questions.len());
        let pipeline = Pipeline::from_config(config).await?;

        let mut reports = Vec::with_capacity(questions.len());
        for question in questions {
            let mut runs = Vec::with_capacity(Strategy::ALL.len());
            for strategy in Strategy::ALL {
                let result = pipeline.run(strategy, &question).await;
                runs.push(StrategyRun { strategy, result });
            }
            reports.push(QuestionReport { question, runs });
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            print!("{}", render_text(&reports));
        }

        Ok(())
    }

    fn collect_questions(&self) -> anyhow::Result<Vec<String>> {
        let mut questions = Vec::new();

        if let Some(question) = &self.question {
            questions.push(question.clone());
        }

        if let Some(path) = &self.questions {
            questions.extend(read_questions(path)?);
        }

        Ok(questions)
    }
}

fn read_questions(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions from {}", path.display()))?;
    Ok(parse_questions(&content))
}

fn parse_questions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn render_text(reports: &[QuestionReport]) -> String {
    let mut out = String::new();

    for report in reports {
        out.push_str(&format!("Question: {}\n", report.question));

        for run in &report.runs {
            out.push_str(&format!("\n== {} ({:.2}s) ==\n", run.strategy, run.result.runtime));

            if let Some(queries) = &run.result.generated_queries {
                for query in queries {
                    out.push_str(&format!("  > {}\n", query));
                }
            }

            out.push_str(&run.result.answer);
            out.push('\n');
        }

        out.push('\n');
    }

    out
}
