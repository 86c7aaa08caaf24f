use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use super::{DatasetKind, StorageConfig, StorageError};
use crate::ingest::{load_customers, load_games, load_sponsors, LoadReport};
use crate::models::{CustomerPurchase, GameData, SponsorDeal};

/// The loaded record arrays. Never mutated in place; a dataset is replaced
/// whole through [`Dataset::apply`].
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub games: Vec<GameData>,
    pub customers: Vec<CustomerPurchase>,
    pub sponsors: Vec<SponsorDeal>,
    /// Load report of the most recent load per dataset
    pub reports: BTreeMap<DatasetKind, LoadReport>,
}

/// Record counts per dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSizes {
    pub games: usize,
    pub customers: usize,
    pub sponsors: usize,
}

/// A parsed replacement for one dataset, built before taking any lock.
#[derive(Debug, Clone)]
pub enum DatasetUpdate {
    Ticketing(Vec<GameData>, LoadReport),
    Crm(Vec<CustomerPurchase>, LoadReport),
    Sponsorship(Vec<SponsorDeal>, LoadReport),
}

impl DatasetUpdate {
    /// Parse CSV text for the given dataset. Never fails.
    pub fn parse(kind: DatasetKind, text: &str) -> Self {
        match kind {
            DatasetKind::Ticketing => {
                let load = load_games(text);
                DatasetUpdate::Ticketing(load.games, load.report)
            }
            DatasetKind::Crm => {
                let load = load_customers(text);
                DatasetUpdate::Crm(load.purchases, load.report)
            }
            DatasetKind::Sponsorship => {
                let load = load_sponsors(text);
                DatasetUpdate::Sponsorship(load.deals, load.report)
            }
        }
    }

    pub fn kind(&self) -> DatasetKind {
        match self {
            DatasetUpdate::Ticketing(..) => DatasetKind::Ticketing,
            DatasetUpdate::Crm(..) => DatasetKind::Crm,
            DatasetUpdate::Sponsorship(..) => DatasetKind::Sponsorship,
        }
    }

    pub fn report(&self) -> &LoadReport {
        match self {
            DatasetUpdate::Ticketing(_, report)
            | DatasetUpdate::Crm(_, report)
            | DatasetUpdate::Sponsorship(_, report) => report,
        }
    }
}

impl Dataset {
    /// Load every dataset present in the data directory. Missing files leave
    /// that dataset empty.
    pub fn load(storage: &StorageConfig) -> Result<Self, StorageError> {
        let mut dataset = Dataset::default();

        for kind in DatasetKind::ALL {
            if let Some(text) = storage.read(kind)? {
                dataset.apply(DatasetUpdate::parse(kind, &text));
            }
        }

        let sizes = dataset.sizes();
        info!(
            "Dataset ready: {} games, {} purchases, {} sponsorship deals",
            sizes.games, sizes.customers, sizes.sponsors
        );
        Ok(dataset)
    }

    /// Swap in a replacement and return its load report.
    pub fn apply(&mut self, update: DatasetUpdate) -> LoadReport {
        let kind = update.kind();
        let report = update.report().clone();

        match update {
            DatasetUpdate::Ticketing(games, _) => self.games = games,
            DatasetUpdate::Crm(customers, _) => self.customers = customers,
            DatasetUpdate::Sponsorship(sponsors, _) => self.sponsors = sponsors,
        }

        self.reports.insert(kind, report.clone());
        report
    }

    pub fn sizes(&self) -> DatasetSizes {
        DatasetSizes {
            games: self.games.len(),
            customers: self.customers.len(),
            sponsors: self.sponsors.len(),
        }
    }
}
