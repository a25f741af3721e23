//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Settings;
use crate::confirm::{Confirm, Force, Prompt};
use crate::engine::{Engine, Invocation};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::operation::{load_catalog, CatalogDefinition};
use crate::pagination::PagingOptions;
use crate::select::Selector;
use crate::tags;
use crate::types::{JsonObject, JsonValue};
use futures::StreamExt;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
    cancel: CancellationToken,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop list commands between pages once `cancel` fires
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Operations => self.operations(),
            Commands::List {
                operation,
                params,
                body_json,
                next_token,
                no_auto_iteration,
                max_results,
                select,
            } => {
                let invocation = Invocation {
                    params: parse_params(params)?,
                    body: parse_body(body_json.as_deref())?,
                    ..Invocation::default()
                };
                let options = PagingOptions {
                    starting_token: next_token.clone(),
                    no_auto_iterate: *no_auto_iteration,
                    ..PagingOptions::default()
                };
                self.list(operation, &invocation, options, *max_results, select.as_deref())
                    .await
            }
            Commands::Invoke {
                operation,
                params,
                body_json,
                tags: tag_pairs,
                tag_keys,
                force,
                select,
            } => {
                let invocation = Invocation {
                    params: parse_params(params)?,
                    body: parse_body(body_json.as_deref())?,
                    tags: tags::parse_tags(tag_pairs)?,
                    tag_keys: tags::tag_keys(tag_keys)?,
                };
                self.invoke(operation, &invocation, *force, select.as_deref())
                    .await
            }
        }
    }

    /// Load the operation catalog
    fn load_catalog(&self) -> Result<CatalogDefinition> {
        load_catalog(&self.cli.catalog)
    }

    /// Resolve settings, then apply CLI flags on top
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::resolve(self.cli.settings.as_deref())?;

        if let Some(mode) = &self.cli.iteration_mode {
            settings.iteration_mode = mode.parse()?;
        }
        if let Some(endpoint) = &self.cli.endpoint {
            settings.endpoint = Some(endpoint.clone());
        }
        for pair in &self.cli.headers {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::invalid_value("header", format!("expected KEY=VALUE, got '{pair}'"))
            })?;
            settings
                .headers
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Build an engine for the catalog's service
    fn engine(&self, settings: &Settings, catalog: &CatalogDefinition) -> Result<Engine> {
        let config = settings.http_config(catalog.endpoint.as_deref());
        debug!(endpoint = config.base_url.as_deref().unwrap_or(""), "using endpoint");
        Ok(Engine::new(HttpClient::with_config(config)?))
    }

    /// Operations command
    fn operations(&self) -> Result<()> {
        let catalog = self.load_catalog()?;

        for op in &catalog.operations {
            self.output(&json!({
                "name": op.name,
                "method": op.method.to_string(),
                "path": op.path,
                "paged": op.is_paged(),
                "mutating": op.mutating,
                "description": op.description,
            }))?;
        }

        Ok(())
    }

    /// List command
    async fn list(
        &self,
        operation: &str,
        invocation: &Invocation,
        mut options: PagingOptions,
        max_results: Option<u32>,
        select: Option<&str>,
    ) -> Result<()> {
        let settings = self.settings()?;
        let catalog = self.load_catalog()?;
        let op = catalog.operation(operation)?;
        let engine = self.engine(&settings, &catalog)?;

        options.mode = settings.iteration_mode;
        let selector = Selector::resolve(select, op.result_path.as_deref());

        let mut stream = engine.list(op, invocation, options, max_results, self.cancel.clone())?;
        while let Some(page) = stream.next().await {
            let page = page?;
            for value in selector.project(page.body(), &invocation.params) {
                self.output(&value)?;
            }
        }

        if let Some(token) = stream.resume_token() {
            eprintln!("NextToken: {token}");
        }

        Ok(())
    }

    /// Invoke command
    async fn invoke(
        &self,
        operation: &str,
        invocation: &Invocation,
        force: bool,
        select: Option<&str>,
    ) -> Result<()> {
        let settings = self.settings()?;
        let catalog = self.load_catalog()?;
        let op = catalog.operation(operation)?;
        let engine = self.engine(&settings, &catalog)?;

        let confirm: Box<dyn Confirm> = if force {
            Box::new(Force)
        } else {
            Box::new(Prompt::stdio())
        };

        let response = engine.invoke(op, invocation, confirm.as_ref()).await?;

        let selector = Selector::resolve(select, op.result_path.as_deref());
        for value in selector.project(&response, &invocation.params) {
            self.output(&value)?;
        }

        Ok(())
    }

    /// Print one value in the selected format
    fn output(&self, value: &JsonValue) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Parse `NAME=VALUE` parameters. Values that are valid JSON are used as
/// JSON; anything else is a string. A bare `null` stays the string "null"
/// since a null parameter would be dropped from the request.
pub fn parse_params<S: AsRef<str>>(pairs: &[S]) -> Result<JsonObject> {
    let mut params = JsonObject::new();

    for pair in pairs {
        let pair = pair.as_ref();
        let (name, raw) = pair.split_once('=').ok_or_else(|| {
            Error::invalid_value("param", format!("expected NAME=VALUE, got '{pair}'"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_value(
                "param",
                format!("parameter name cannot be empty in '{pair}'"),
            ));
        }

        let value = match serde_json::from_str(raw) {
            Ok(JsonValue::Null) | Err(_) => JsonValue::String(raw.to_string()),
            Ok(value) => value,
        };
        params.insert(name.to_string(), value);
    }

    Ok(params)
}

/// Parse a `--body-json` value, which must be a JSON object
pub fn parse_body(raw: Option<&str>) -> Result<Option<JsonObject>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str(raw)? {
        JsonValue::Object(map) => Ok(Some(map)),
        other => Err(Error::invalid_value(
            "body-json",
            format!("expected a JSON object, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::IterationMode;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn runner(args: &[&str]) -> Runner {
        let cli = Cli::try_parse_from(std::iter::once("pagewalk").chain(args.iter().copied())).unwrap();
        Runner::new(cli)
    }

    #[test]
    fn test_parse_params_json_and_strings() {
        let params = parse_params(&[
            "Name=web",
            "Count=3",
            "Filters={\"Arns\":[\"a\"]}",
            "Flag=true",
            "Empty=",
        ])
        .unwrap();

        assert_eq!(params["Name"], json!("web"));
        assert_eq!(params["Count"], json!(3));
        assert_eq!(params["Filters"], json!({"Arns": ["a"]}));
        assert_eq!(params["Flag"], json!(true));
        assert_eq!(params["Empty"], json!(""));
    }

    #[test]
    fn test_parse_params_null_is_kept_as_text() {
        let params = parse_params(&["Arn=null", "Filters={\"Arn\":null}"]).unwrap();

        assert_eq!(params["Arn"], json!("null"));
        // Nested nulls are still JSON
        assert_eq!(params["Filters"], json!({"Arn": null}));
    }

    #[tokio::test]
    async fn test_run_invoke_sends_null_text_param() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/delete-pricing-rule"))
            .and(body_json(json!({"Arn": "null"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Arn": "null"})))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let runner = runner(&[
            "--endpoint",
            &uri,
            "invoke",
            "DeletePricingRule",
            "--param",
            "Arn=null",
            "--force",
        ]);
        runner.run().await.unwrap();
    }

    #[test]
    fn test_parse_params_errors() {
        assert!(parse_params(&["novalue"]).is_err());
        assert!(parse_params(&["=x"]).is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(None).unwrap(), None);
        let body = parse_body(Some(r#"{"BillingPeriod":"2024-01"}"#)).unwrap().unwrap();
        assert_eq!(body["BillingPeriod"], json!("2024-01"));
        assert!(parse_body(Some("[1]")).is_err());
        assert!(parse_body(Some("{")).is_err());
    }

    #[test]
    fn test_cli_flags_override_settings() {
        let runner = runner(&[
            "--iteration-mode",
            "LEGACY",
            "--endpoint",
            "http://localhost:4566",
            "--header",
            "x-a=1",
            "operations",
        ]);
        let settings = runner.settings().unwrap();

        assert_eq!(settings.iteration_mode, IterationMode::Legacy);
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(settings.headers.get("x-a"), Some(&"1".to_string()));
    }

    #[test]
    fn test_cli_rejects_bad_header() {
        let runner = runner(&["--header", "nope", "operations"]);
        assert!(runner.settings().is_err());
    }

    #[test]
    fn test_cli_parses_list_command() {
        let runner = runner(&[
            "--catalog",
            "rum",
            "list",
            "ListAppMonitors",
            "--param",
            "A=1",
            "--next-token",
            "t1",
            "--max-results",
            "5",
        ]);
        match &runner.cli.command {
            Commands::List {
                operation,
                params,
                next_token,
                max_results,
                no_auto_iteration,
                ..
            } => {
                assert_eq!(operation, "ListAppMonitors");
                assert_eq!(params, &vec!["A=1".to_string()]);
                assert_eq!(next_token.as_deref(), Some("t1"));
                assert_eq!(*max_results, Some(5));
                assert!(!no_auto_iteration);
            }
            other => panic!("expected list, got {other:?}"),
        }
        assert_eq!(runner.cli.catalog, "rum");
    }

    #[tokio::test]
    async fn test_run_list_against_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list-pricing-rules"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "PricingRules": [{"Name": "r1"}],
                "NextToken": "t1"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/list-pricing-rules"))
            .and(body_json(json!({"NextToken": "t1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "PricingRules": [{"Name": "r2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let runner = runner(&["--endpoint", &uri, "list", "ListPricingRules"]);
        runner.run().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_unknown_operation() {
        let runner = runner(&["--endpoint", "http://127.0.0.1:9", "list", "ListNothing"]);
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, Error::OperationNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_forced_invoke() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/delete-pricing-rule"))
            .and(body_json(json!({"Arn": "arn:rule"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Arn": "arn:rule"})))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let runner = runner(&[
            "--endpoint",
            &uri,
            "invoke",
            "DeletePricingRule",
            "--param",
            "Arn=arn:rule",
            "--force",
        ]);
        runner.run().await.unwrap();
    }
}
