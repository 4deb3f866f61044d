//! One evaluation cycle: load -> sync -> persist -> position -> strategy -> dispatch.
//!
//! Collaborators are injected as port trait objects. A cycle that returns an
//! error never dispatches, and the store is only written after a successful
//! merge, so an aborted cycle leaves the cached series as it was.

use crate::domain::error::SigtraderError;
use crate::domain::position::PositionState;
use crate::domain::signal::Evaluation;
use crate::domain::strategy::Strategy;
use crate::domain::sync::{SyncEngine, SyncReport, SyncStatus};
use crate::ports::data_port::MarketDataPort;
use crate::ports::order_port::OrderPort;
use crate::ports::position_port::PositionPort;
use crate::ports::storage_port::BarStorePort;
use chrono::NaiveDate;
use tracing::{info, warn};

#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub store: &'a dyn BarStorePort,
    pub data: &'a dyn MarketDataPort,
    pub positions: &'a dyn PositionPort,
    pub orders: &'a dyn OrderPort,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Submitted,
    /// Hold or insufficient history: nothing to send.
    NotRequired,
    DryRun,
    /// Reported only; the signal stays valid and the store is untouched.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub symbol: String,
    pub sync: SyncStatus,
    pub bars: usize,
    pub latest_date: Option<NaiveDate>,
    pub has_position: bool,
    pub evaluation: Evaluation,
    pub dispatch: DispatchOutcome,
}

pub struct Evaluator<'a> {
    ports: Ports<'a>,
    sync_engine: SyncEngine,
    strategy: Strategy,
    dispatch_enabled: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(ports: Ports<'a>, sync_engine: SyncEngine, strategy: Strategy) -> Self {
        Self {
            ports,
            sync_engine,
            strategy,
            dispatch_enabled: true,
        }
    }

    /// Derive signals without submitting orders.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dispatch_enabled = !dry_run;
        self
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Load the cached series, bring it up to date and persist it if it
    /// changed.
    pub fn sync_symbol(&self, symbol: &str, today: NaiveDate) -> Result<SyncReport, SigtraderError> {
        let existing = self.ports.store.load(symbol)?;
        let report = self
            .sync_engine
            .sync(self.ports.data, symbol, existing, today)?;
        if report.status.is_updated() {
            self.ports.store.persist(symbol, &report.series)?;
        }
        Ok(report)
    }

    pub fn evaluate(&self, symbol: &str, today: NaiveDate) -> Result<CycleReport, SigtraderError> {
        let SyncReport { series, status } = self.sync_symbol(symbol, today)?;

        let has_position = self.ports.positions.has_open_position(symbol)?;
        let position = PositionState {
            symbol: symbol.to_string(),
            has_position,
        };

        let evaluation = self.strategy.evaluate(symbol, series.bars(), &position)?;
        let dispatch = match &evaluation {
            Evaluation::Insufficient { bars, required } => {
                info!(symbol, bars, required, "insufficient history, no signal");
                DispatchOutcome::NotRequired
            }
            Evaluation::Signal(signal) => {
                info!(symbol, %signal, "signal derived");
                match signal.order_request() {
                    None => DispatchOutcome::NotRequired,
                    Some(_) if !self.dispatch_enabled => DispatchOutcome::DryRun,
                    Some(order) => match self.ports.orders.submit(&order) {
                        Ok(()) => {
                            info!(symbol, %order, "order submitted");
                            DispatchOutcome::Submitted
                        }
                        Err(e) => {
                            warn!(symbol, %order, error = %e, "order submission failed");
                            DispatchOutcome::Failed {
                                reason: e.to_string(),
                            }
                        }
                    },
                }
            }
        };

        Ok(CycleReport {
            symbol: symbol.to_string(),
            sync: status,
            bars: series.len(),
            latest_date: series.latest_date(),
            has_position,
            evaluation,
            dispatch,
        })
    }
}
