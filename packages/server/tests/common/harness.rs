//! Test harness wiring mocks into BotDeps.
//!
//! No network: the model and validator are scripted and outgoing messages
//! are recorded by MockMessenger.

#![allow(dead_code)]

use std::sync::Arc;

use outfit_finder::{Catalog, Finder, FinderConfig, MockModel, MockValidator};
use server_core::kernel::{BotDeps, MockMessenger};
use server_core::CatalogMode;

pub struct TestHarness {
    pub messenger: MockMessenger,
    pub model: MockModel,
    pub validator: MockValidator,
    pub deps: BotDeps,
}

impl TestHarness {
    /// Search mode over the given scripted model and validator.
    pub fn new(model: MockModel, validator: MockValidator) -> Self {
        Self::build(model, validator, CatalogMode::Search, MockMessenger::new())
    }

    /// Catalog-only mode; the model must never be called.
    pub fn local() -> Self {
        Self::build(
            MockModel::new(),
            MockValidator::new(),
            CatalogMode::Local,
            MockMessenger::new(),
        )
    }

    /// Messenger whose sends all fail.
    pub fn with_failing_messenger(model: MockModel, validator: MockValidator) -> Self {
        Self::build(model, validator, CatalogMode::Search, MockMessenger::failing())
    }

    fn build(
        model: MockModel,
        validator: MockValidator,
        mode: CatalogMode,
        messenger: MockMessenger,
    ) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let catalog = Arc::new(Catalog::builtin());
        let finder = Finder::new(
            Arc::new(model.clone()),
            Arc::new(validator.clone()),
            catalog.clone(),
            FinderConfig::default(),
        );
        let deps = BotDeps::new(
            Arc::new(messenger.clone()),
            Arc::new(finder),
            catalog,
            mode,
        );

        Self {
            messenger,
            model,
            validator,
            deps,
        }
    }
}
