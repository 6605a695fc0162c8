//! Subcommand dispatch
//!
//! State subcommands go through the reconcilers and report a `StateResult`;
//! the read-only ones call the client directly and report plain JSON.

use cairn_client::ConsulClient;
use cairn_state::{
    CheckDefinition, KeyDefinition, Reconciler, ServiceDefinition, StateResult,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{
    CheckArgs, CheckCommand, Commands, DcCommand, KeyCommand, NodeCommand, ServiceArgs,
    ServiceCommand,
};

/// What a command produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    State(StateResult),
    Data(Value),
}

impl Outcome {
    /// Only a failed reconciliation makes the process exit non-zero
    pub fn succeeded(&self) -> bool {
        match self {
            Outcome::State(result) => result.succeeded,
            Outcome::Data(_) => true,
        }
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let rendered = match self {
            Outcome::State(result) => serde_json::to_string_pretty(result)?,
            Outcome::Data(value) => serde_json::to_string_pretty(value)?,
        };
        Ok(rendered)
    }
}

pub fn service_definition(args: &ServiceArgs) -> ServiceDefinition {
    ServiceDefinition {
        name: args.name.clone(),
        service_id: args.id.clone(),
        port: args.port,
        // no --tag flags leaves tags unmanaged
        tags: (!args.tags.is_empty()).then(|| args.tags.iter().cloned().collect()),
        health_check_script: args.script.clone(),
        check_interval: args.interval.clone(),
        ttl: args.ttl.clone(),
    }
}

pub fn check_definition(args: &CheckArgs) -> CheckDefinition {
    CheckDefinition {
        name: args.name.clone(),
        check_id: args.id.clone(),
        script: args.script.clone(),
        interval: args.interval.clone(),
        ttl: args.ttl.clone(),
        notes: args.notes.clone(),
    }
}

pub async fn execute(client: &ConsulClient, command: Commands) -> anyhow::Result<Outcome> {
    debug!("Executing {:?}", command);
    match command {
        Commands::Key { action } => key(client, action).await,
        Commands::Service { action } => service(client, action).await,
        Commands::Check { action } => check(client, action).await,
        Commands::Node { action } => node(client, action).await,
        Commands::Dc { action } => dc(client, action).await,
    }
}

async fn key(client: &ConsulClient, action: KeyCommand) -> anyhow::Result<Outcome> {
    let keys = Reconciler::new(client).keys();
    match action {
        KeyCommand::Present {
            name,
            value,
            from_file,
            encoding,
        } => {
            let desired = if from_file {
                KeyDefinition::from_file(&name, &value).with_encoding(&encoding)
            } else {
                KeyDefinition::literal(&name, &value)
            };
            Ok(Outcome::State(keys.present(&desired).await?))
        }
        KeyCommand::Absent { name, recurse } => {
            Ok(Outcome::State(keys.absent(&name, recurse).await?))
        }
        KeyCommand::Get { name } => {
            let value = client.key_get(&name).await?;
            Ok(Outcome::Data(json!({ "key": name, "value": value })))
        }
    }
}

async fn service(client: &ConsulClient, action: ServiceCommand) -> anyhow::Result<Outcome> {
    let services = Reconciler::new(client).services();
    match action {
        ServiceCommand::Present(args) => Ok(Outcome::State(
            services.present(&service_definition(&args)).await?,
        )),
        ServiceCommand::Absent { name } => Ok(Outcome::State(services.absent(&name).await?)),
        ServiceCommand::TtlSet {
            name,
            status,
            notes,
        } => Ok(Outcome::State(
            services.ttl_set(&name, &status, notes.as_deref()).await?,
        )),
        ServiceCommand::List { catalog } => {
            let names = client.service_list(catalog).await?;
            Ok(Outcome::Data(json!(names)))
        }
        ServiceCommand::Health { name, passing } => {
            let statuses: Vec<Value> = client
                .service_health(&name, passing)
                .await?
                .into_iter()
                .map(|(node, status)| json!({ "node": node, "status": status }))
                .collect();
            Ok(Outcome::Data(Value::Array(statuses)))
        }
    }
}

async fn check(client: &ConsulClient, action: CheckCommand) -> anyhow::Result<Outcome> {
    let checks = Reconciler::new(client).checks();
    match action {
        CheckCommand::Present(args) => Ok(Outcome::State(
            checks.present(&check_definition(&args)).await?,
        )),
        CheckCommand::Absent { name } => Ok(Outcome::State(checks.absent(&name).await?)),
        CheckCommand::TtlSet {
            name,
            status,
            notes,
        } => Ok(Outcome::State(
            checks.ttl_set(&name, &status, notes.as_deref()).await?,
        )),
        CheckCommand::List => Ok(Outcome::Data(json!(client.check_list().await?))),
    }
}

async fn node(client: &ConsulClient, action: NodeCommand) -> anyhow::Result<Outcome> {
    match action {
        NodeCommand::List => {
            let nodes: Vec<Value> = client
                .node_list()
                .await?
                .into_iter()
                .map(|(node, address)| json!({ "node": node, "address": address }))
                .collect();
            Ok(Outcome::Data(Value::Array(nodes)))
        }
        NodeCommand::Get { name } => {
            let node = client.node_get(&name).await?;
            Ok(Outcome::Data(serde_json::to_value(node)?))
        }
    }
}

async fn dc(client: &ConsulClient, action: DcCommand) -> anyhow::Result<Outcome> {
    match action {
        DcCommand::List => Ok(Outcome::Data(json!(client.dc_list().await?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_args(name: &str) -> ServiceArgs {
        ServiceArgs {
            name: name.to_string(),
            id: None,
            port: None,
            tags: Vec::new(),
            script: None,
            interval: None,
            ttl: None,
        }
    }

    #[test]
    fn test_service_definition_without_tags_is_unmanaged() {
        let desired = service_definition(&service_args("web"));
        assert_eq!(desired.name, "web");
        assert!(desired.tags.is_none());
        assert!(desired.port.is_none());
    }

    #[test]
    fn test_service_definition_dedups_tags() {
        let mut args = service_args("web");
        args.tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        args.port = Some(6969);

        let desired = service_definition(&args);
        let tags: Vec<&str> = desired
            .tags
            .as_ref()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(desired.port, Some(6969));
    }

    #[test]
    fn test_check_definition_copies_fields() {
        let desired = check_definition(&CheckArgs {
            name: "mem".to_string(),
            id: Some("mem-1".to_string()),
            script: None,
            interval: None,
            ttl: Some("15s".to_string()),
            notes: Some("watchdog".to_string()),
        });
        assert_eq!(desired.effective_id(), "mem-1");
        assert_eq!(desired.ttl.as_deref(), Some("15s"));
        assert_eq!(desired.notes.as_deref(), Some("watchdog"));
    }

    #[test]
    fn test_outcome_exit_status() {
        let ok = Outcome::State(StateResult::unchanged("foo", "Key already set to defined value"));
        let failed = Outcome::State(StateResult::failed("foo", "/tmp/x does not exist"));
        assert!(ok.succeeded());
        assert!(!failed.succeeded());
        assert!(Outcome::Data(Value::Null).succeeded());
    }

    #[test]
    fn test_outcome_render() {
        let rendered = Outcome::State(StateResult::changed("foo", "Key \"foo\" deleted"))
            .render()
            .unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["name"], "foo");
        assert_eq!(value["changed"], true);
        assert_eq!(value["succeeded"], true);
    }
}
