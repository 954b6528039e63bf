use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{network::RemoteExecutionError, planner::Island};

/// A database engine the listener can run statements on.
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self, island: Island, statement: &str) -> Result<Value, RemoteExecutionError>;
}

/// Engines reachable from this host, by name.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn Engine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, engine: Arc<dyn Engine>) {
        self.engines.insert(engine.name().to_string(), engine);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Engine>> {
        self.engines.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(|k| k.as_str()).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry").field("engines", &self.names()).finish()
    }
}

/// Something a remote host can decode and run.
pub trait NetworkObject {
    fn execute(&self, engines: &EngineRegistry) -> Result<Value, RemoteExecutionError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Ping,
    Statement {
        id: Uuid,
        engine: String,
        island: Island,
        statement: String,
    },
}

impl Command {
    /// Wraps generated island text for execution on `engine`.
    pub fn statement(engine: &str, island: Island, statement: &str) -> Self {
        Command::Statement {
            id: Uuid::new_v4(),
            engine: engine.to_string(),
            island,
            statement: statement.to_string(),
        }
    }
}

impl NetworkObject for Command {
    fn execute(&self, engines: &EngineRegistry) -> Result<Value, RemoteExecutionError> {
        match self {
            Command::Ping => Ok(json!("pong")),
            Command::Statement { id, engine, island, statement } => {
                let target = engines
                    .get(engine)
                    .ok_or_else(|| RemoteExecutionError::UnknownEngine(engine.clone()))?;
                tracing::debug!(%id, %engine, %island, "executing statement");
                target.execute(*island, statement)
            },
        }
    }
}
