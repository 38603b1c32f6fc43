//! # Scenarios
//!
//! The write/read-back procedures run against a provisioned catalog. Each
//! scenario does its writes through the `database` crate and routes every
//! comparison through [`verify`], so a mismatch surfaces as
//! [`ScenarioError::Verification`] naming the entity that failed.
//!
//! Scenarios depend on each other's data and must run in [`Scenario::ALL`]
//! order on one [`ScenarioContext`].

pub mod add_data;
pub mod cleanup;
pub mod error;
pub mod foreign_keys;
pub mod interleaved;
pub mod jsonb_filter;
pub mod query_samples;
pub mod rollback;
pub mod verify;

pub use error::ScenarioError;

use core_types::SampleSequence;
use database::DbRepository;
use std::fmt;

/// State shared by the scenarios of one run.
#[derive(Debug)]
pub struct ScenarioContext {
    pub repo: DbRepository,
    /// Suffix source for every sample record created during the run.
    pub sequence: SampleSequence,
}

impl ScenarioContext {
    pub fn new(repo: DbRepository) -> Self {
        Self {
            repo,
            sequence: SampleSequence::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    AddData,
    ForeignKeyOperations,
    TransactionRollback,
    InterleavedTableUpdate,
    CreateAndQuerySampleData,
    JsonbFilter,
    DeleteAllData,
}

impl Scenario {
    /// Execution order. Later scenarios read rows written by earlier ones.
    pub const ALL: [Scenario; 7] = [
        Scenario::AddData,
        Scenario::ForeignKeyOperations,
        Scenario::TransactionRollback,
        Scenario::InterleavedTableUpdate,
        Scenario::CreateAndQuerySampleData,
        Scenario::JsonbFilter,
        Scenario::DeleteAllData,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::AddData => "add_data",
            Scenario::ForeignKeyOperations => "foreign_key_operations",
            Scenario::TransactionRollback => "transaction_rollback",
            Scenario::InterleavedTableUpdate => "interleaved_table_update",
            Scenario::CreateAndQuerySampleData => "create_and_query_sample_data",
            Scenario::JsonbFilter => "jsonb_filter",
            Scenario::DeleteAllData => "delete_all_data",
        }
    }

    /// The line printed once the scenario has passed.
    pub fn success_message(&self) -> &'static str {
        match self {
            Scenario::AddData => "Adding Data Successful",
            Scenario::ForeignKeyOperations => "Testing Foreign Key Successful",
            Scenario::TransactionRollback => "Transaction Rollback Successful",
            Scenario::InterleavedTableUpdate => "Interleaved Table Update Successful",
            Scenario::CreateAndQuerySampleData => "Fetching Data Successful",
            Scenario::JsonbFilter => "Jsonb Filtering Successful",
            Scenario::DeleteAllData => "Deleting Data Successful",
        }
    }

    pub async fn run(self, ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
        tracing::info!(scenario = self.name(), "Running scenario.");
        match self {
            Scenario::AddData => add_data::add_data(ctx).await,
            Scenario::ForeignKeyOperations => foreign_keys::foreign_key_operations(ctx).await,
            Scenario::TransactionRollback => rollback::transaction_rollback(ctx).await,
            Scenario::InterleavedTableUpdate => interleaved::interleaved_table_update(ctx).await,
            Scenario::CreateAndQuerySampleData => {
                query_samples::create_and_query_sample_data(ctx).await
            }
            Scenario::JsonbFilter => jsonb_filter::jsonb_filter(ctx).await,
            Scenario::DeleteAllData => cleanup::delete_all_data(ctx).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
