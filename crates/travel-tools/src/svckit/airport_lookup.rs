//! Airport Lookup Tool

use std::sync::Arc;

use agent_core::{
    tool::{parse_arguments, ParameterSchema},
    Result as CoreResult, Tool, ToolResult, ToolSchema,
};
use async_trait::async_trait;
use serde::Deserialize;

use crate::airport::{normalize_icao, AirportDirectory};

/// Tool for airport details by ICAO code
pub struct AirportTool {
    directory: Arc<dyn AirportDirectory>,
}

impl AirportTool {
    pub fn new(directory: Arc<dyn AirportDirectory>) -> Self {
        Self { directory }
    }
}

#[derive(Deserialize)]
struct AirportArgs {
    icao_code: String,
}

#[async_trait]
impl Tool for AirportTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_airport_info".into(),
            description: "Get airport information by ICAO code (4-letter airport code). \
This directory works best for German airports (e.g., EDDF for Frankfurt, EDDM for Munich, EDDB for Berlin). \
If an airport is not found, suggest trying a German airport code instead."
                .into(),
            parameters: vec![ParameterSchema::required(
                "icao_code",
                "string",
                "4-letter ICAO airport code (e.g., EDDF for Frankfurt, EDDM for Munich)",
            )],
        }
    }

    async fn execute(&self, arguments: &str) -> CoreResult<ToolResult> {
        let Ok(args) = parse_arguments::<AirportArgs>(arguments) else {
            return Ok(ToolResult::failure(
                "get_airport_info",
                "failed to parse ICAO code parameter",
            ));
        };

        let lookup = match normalize_icao(&args.icao_code) {
            Ok(code) => self.directory.lookup(&code).await,
            Err(e) => Err(e),
        };

        match lookup {
            Ok(airport) => Ok(ToolResult::success(
                "get_airport_info",
                format!(
                    "Airport: {} (ICAO: {})\nWebsite: {}",
                    airport.name, airport.icao, airport.url
                ),
            )),
            Err(e) => {
                tracing::error!(icao_code = %args.icao_code, "Failed to get airport info: {}", e);
                Ok(ToolResult::failure(
                    "get_airport_info",
                    format!("failed to get airport info: {e}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airport::AirportInfo;
    use crate::error::{Result, TravelError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeDirectory {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl AirportDirectory for FakeDirectory {
        async fn lookup(&self, icao: &str) -> Result<AirportInfo> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match icao {
                "EDDF" => Ok(AirportInfo {
                    icao: "EDDF".into(),
                    name: "Frankfurt am Main".into(),
                    url: "https://www.frankfurt-airport.com".into(),
                    last_update: None,
                }),
                other => Err(TravelError::NotFound(format!("airport {other}"))),
            }
        }
    }

    #[tokio::test]
    async fn test_lookup_normalizes_code() {
        let tool = AirportTool::new(Arc::new(FakeDirectory::default()));
        let result = tool.execute(r#"{"icao_code":" eddf "}"#).await.unwrap();

        assert!(result.success);
        assert_eq!(
            result.output,
            "Airport: Frankfurt am Main (ICAO: EDDF)\nWebsite: https://www.frankfurt-airport.com"
        );
    }

    #[tokio::test]
    async fn test_invalid_code_never_reaches_directory() {
        let directory = Arc::new(FakeDirectory::default());
        let tool = AirportTool::new(directory.clone());

        let result = tool.execute(r#"{"icao_code":"ABC"}"#).await.unwrap();
        assert_eq!(
            result.output,
            "failed to get airport info: invalid ICAO code: must be 4 characters"
        );
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_found_and_bad_json() {
        let tool = AirportTool::new(Arc::new(FakeDirectory::default()));

        let result = tool.execute(r#"{"icao_code":"XXXX"}"#).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("not found"));

        let result = tool.execute("invalid json").await.unwrap();
        assert_eq!(result.output, "failed to parse ICAO code parameter");
    }
}
