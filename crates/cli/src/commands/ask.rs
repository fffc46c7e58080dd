//! Ask command handler.

use super::pipeline::Pipeline;
use clap::Args;
use grounded_core::config::AppConfig;
use grounded_knowledge::{PipelineResult, Strategy};

/// Answer a question with one strategy
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Strategy: direct, query-expansion, multi-query
    #[arg(short, long, default_value = "direct")]
    pub strategy: Strategy,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        tracing::info!("Answering with strategy {}", self.strategy);

        let pipeline = Pipeline::from_config(config).await?;
        let result = pipeline.run(self.strategy, &self.question).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            log_details(&result);
            println!("{}", result.answer);
        }

        Ok(())
    }
}

fn log_details(result: &PipelineResult) {
    tracing::info!("Runtime: {:.2}s", result.runtime);

    if let Some(hypothetical) = &result.hypothetical_answer {
        tracing::info!("Hypothetical answer: {}", hypothetical);
    }

    if let Some(queries) = &result.generated_queries {
        for (i, query) in queries.iter().enumerate() {
            tracing::info!("Generated query {}: {}", i + 1, query);
        }
    }
}
