//! Classify command - one-shot classification

use anyhow::{Context, Result, bail};
use news_verdict_adapters::{BackendConfig, HttpClassifier, StubClassifier};
use news_verdict_domain::Classifier;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::ClassifyArgs;
use crate::config::AppConfig;

pub async fn execute(args: ClassifyArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    if args.title.trim().is_empty() {
        bail!("No title provided for classification");
    }

    let classifier = build_classifier(&config)?;

    tracing::info!(
        title_length = args.title.len(),
        content_length = args.content.len(),
        "Classifying text"
    );

    let output = classifier
        .classify(&args.title, &args.content)
        .await
        .context("Classification failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        println!("Classification Result");
        println!("=====================");
        println!();
        match output.is_fake {
            Some(true) => println!("Verdict: Fake News"),
            Some(false) => println!("Verdict: Real News"),
            None => println!("Verdict: (not returned)"),
        }
        if let Some(confidence) = output.confidence {
            println!("Confidence: {}%", confidence);
        }
        if let Some(ref explanation) = output.explanation {
            println!("Explanation: {}", explanation);
        }
    }

    Ok(())
}

pub(crate) fn build_classifier(config: &AppConfig) -> Result<Arc<dyn Classifier>> {
    match config.backend.provider.as_str() {
        "http" => {
            let classifier = HttpClassifier::new(BackendConfig {
                base_url: config.backend_base_url(),
                timeout_secs: config.backend.timeout_secs,
            })
            .context("Failed to configure classification backend")?;
            Ok(Arc::new(classifier))
        }
        "stub" => Ok(Arc::new(StubClassifier::heuristic())),
        other => bail!("Unknown classification backend provider: {}", other),
    }
}
