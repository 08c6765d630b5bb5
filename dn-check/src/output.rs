//! Flat text and JSON renderings of a result set, and spooling them to a file.

use dn_check_lib::{DnCheckError, ResultSet};
use std::fs;
use std::path::Path;

/// Format used for stdout and file output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `name.tld : bool` line per verdict
    Text,
    /// Pretty-printed JSON array
    Json,
}

/// One `name.tld : true|false` line per verdict, in result order.
pub fn render_text(results: &ResultSet) -> String {
    let mut out = String::new();
    for result in results {
        for verdict in &result.verdicts {
            out.push_str(&format!(
                "{}.{} : {}\n",
                result.name, verdict.tld, verdict.available
            ));
        }
    }
    out
}

/// Pretty JSON array of `{name, tlds: [{tld, is_available}]}`.
pub fn render_json(results: &ResultSet) -> Result<String, DnCheckError> {
    Ok(serde_json::to_string_pretty(results)?)
}

pub fn render(results: &ResultSet, format: OutputFormat) -> Result<String, DnCheckError> {
    match format {
        OutputFormat::Text => Ok(render_text(results)),
        OutputFormat::Json => {
            let mut json = render_json(results)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Write the rendered results to `path`, replacing any existing file.
pub fn write_to_file<P: AsRef<Path>>(
    path: P,
    results: &ResultSet,
    format: OutputFormat,
) -> Result<(), DnCheckError> {
    let path = path.as_ref();
    let content = render(results, format)?;

    fs::write(path, content)
        .map_err(|e| DnCheckError::output(path.to_string_lossy(), e.to_string()))?;

    tracing::debug!(path = %path.display(), ?format, "results written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dn_check_lib::{CheckConfig, FailureKind, NameChecker, Outcome, Resolve};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Stub;

    #[async_trait::async_trait]
    impl Resolve for Stub {
        async fn resolve(&self, fqdn: &str) -> Outcome {
            if fqdn == "sun4everyone.org" {
                Outcome::transient(FailureKind::Network, "unreachable")
            } else if fqdn.starts_with("yahoo.") {
                Outcome::Registered
            } else {
                Outcome::NotFound
            }
        }
    }

    async fn sample() -> ResultSet {
        let checker = NameChecker::with_resolver(CheckConfig::default(), Arc::new(Stub));
        checker
            .run(
                &["yahoo".to_string(), "sun4everyone".to_string()],
                &["com".to_string(), "org".to_string()],
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_render_text_skips_unchecked_pairs() {
        assert_eq!(
            render_text(&sample().await),
            "yahoo.com : false\nyahoo.org : false\nsun4everyone.com : true\n"
        );
    }

    #[tokio::test]
    async fn test_render_json_shape() {
        let json = render_json(&sample().await).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["name"], "yahoo");
        assert_eq!(value[0]["tlds"][1]["tld"], "org");
        assert_eq!(value[0]["tlds"][1]["is_available"], false);
        assert_eq!(value[1]["name"], "sun4everyone");
        assert_eq!(value[1]["tlds"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.txt");
        let results = sample().await;

        write_to_file(&path, &results, OutputFormat::Text).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), render_text(&results));

        write_to_file(&path, &results, OutputFormat::Json).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with('['));
        assert!(written.ends_with("]\n"));
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("results.json");

        let err = write_to_file(&path, &sample().await, OutputFormat::Json).unwrap_err();
        assert!(matches!(err, DnCheckError::Output { .. }));
    }
}
