//! Model persistence for saving and loading trained agents
//!
//! The whole model is plain data: the action-value table plus a handful of
//! scalars. Everything goes into a single JSON document so a saved agent can
//! be inspected with any text tool and round-trips exactly.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::agent::QLearningAgent;
use super::config::QLearningConfig;
use super::observation::Observation;
use crate::game::Direction;

/// Metadata saved with the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Hyperparameters the agent was trained with
    pub config: QLearningConfig,

    /// Exploration rate at save time (after decay)
    pub epsilon: f32,

    /// Number of episodes trained
    pub episodes_trained: usize,

    /// Total environment steps taken
    pub training_steps: usize,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    /// Create new metadata for an agent at a point in training
    pub fn new(agent: &QLearningAgent, episodes_trained: usize, training_steps: usize) -> Self {
        Self {
            config: agent.config().clone(),
            epsilon: agent.epsilon(),
            episodes_trained,
            training_steps,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One exported value-table entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QTableEntry {
    state: Observation,
    action: Direction,
    value: f32,
}

/// On-disk model document
#[derive(Serialize, Deserialize)]
struct SavedModel {
    metadata: ModelMetadata,
    entries: Vec<QTableEntry>,
}

/// Save a trained agent to a JSON file
///
/// Creates parent directories if they don't exist.
pub fn save_model(
    agent: &QLearningAgent,
    episodes_trained: usize,
    training_steps: usize,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let entries = agent
        .table()
        .iter()
        .map(|(&(state, action), &value)| QTableEntry {
            state,
            action,
            value,
        })
        .collect();

    let document = SavedModel {
        metadata: ModelMetadata::new(agent, episodes_trained, training_steps),
        entries,
    };

    let json = serde_json::to_string_pretty(&document).context("Failed to serialize model")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write model to {:?}", path))?;

    Ok(())
}

/// Load a trained agent from a JSON file
///
/// Reconstructs the agent from the saved hyperparameters, imports the value
/// table, and restores the decayed epsilon.
pub fn load_model(path: &Path) -> Result<(QLearningAgent, ModelMetadata)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model from {:?}", path))?;
    let document: SavedModel =
        serde_json::from_str(&json).context("Failed to deserialize model")?;

    document
        .metadata
        .config
        .validate()
        .map_err(|e| anyhow::anyhow!("Saved model has invalid config: {}", e))?;

    let mut agent = QLearningAgent::new(document.metadata.config.clone());
    let table: HashMap<(Observation, Direction), f32> = document
        .entries
        .iter()
        .map(|entry| ((entry.state, entry.action), entry.value))
        .collect();
    agent.load_table(table);
    agent.set_epsilon(document.metadata.epsilon);

    Ok((agent, document.metadata))
}
