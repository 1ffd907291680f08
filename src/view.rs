//! Render state for the chart and map views.
//!
//! A view is `Uninitialized` until its first fetch completes, then `Ready` with a freshly
//! built render model, or `Failed` with the fetch error. Every fetch takes a
//! [`FetchTicket`]; a completion carrying an older ticket than the latest issued one is
//! discarded, so a slow response can never overwrite the result of a newer request.

use crate::api::{self, DataSource, MapMode};
use crate::heatmap::HeatLayer;
use crate::models::{Area, Statistic, YScale};
use crate::transform::{self, ChartData};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Uninitialized,
    Ready(T),
    /// The latest fetch failed; no stale model is kept.
    Failed(String),
}

/// Generation number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// What a completion did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Rebuilt,
    Failed,
    /// A newer fetch was issued meanwhile; the result was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct View<T> {
    state: ViewState<T>,
    issued: u64,
    rebuilds: u64,
}

impl<T> Default for View<T> {
    fn default() -> Self {
        Self {
            state: ViewState::Uninitialized,
            issued: 0,
            rebuilds: 0,
        }
    }
}

impl<T> View<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// The current render model, if the view is ready.
    pub fn model(&self) -> Option<&T> {
        match &self.state {
            ViewState::Ready(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ViewState::Ready(_))
    }

    /// How many times the render model was rebuilt.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Start a fetch. Only the most recently issued ticket can change the view.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Discard the current model and install `model`.
    pub fn rebuild(&mut self, model: T) {
        self.state = ViewState::Ready(model);
        self.rebuilds += 1;
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    pub fn complete<E: Display>(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<T, E>,
    ) -> Applied {
        if ticket.0 != self.issued {
            log::warn!(
                "dropping stale response (ticket {}, latest {})",
                ticket.0,
                self.issued
            );
            return Applied::Stale;
        }
        match result {
            Ok(model) => {
                self.rebuild(model);
                Applied::Rebuilt
            }
            Err(e) => {
                log::warn!("fetch failed: {e}");
                self.state = ViewState::Failed(e.to_string());
                Applied::Failed
            }
        }
    }
}

/// What the line chart should show.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub areas: Vec<Area>,
    pub models: Vec<String>,
    pub days: u32,
    pub distancing: Option<bool>,
    pub statistic: Statistic,
    pub scale: YScale,
}

/// Fetch forecasts for `req` and rebuild the chart view from them.
pub fn load_chart<S: DataSource + ?Sized>(
    view: &mut View<ChartData>,
    source: &S,
    req: &ChartRequest,
) -> Applied {
    let ticket = view.begin_fetch();
    let result = api::fetch_forecasts(source, &req.areas, &req.models, req.days, req.distancing)
        .map(|forecasts| transform::build_chart(&forecasts, req.statistic, req.scale));
    view.complete(ticket, result)
}

/// Fetch totals for `mode` and rebuild the map view; the previous layer is replaced wholesale.
pub fn load_map<S: DataSource + ?Sized>(
    view: &mut View<HeatLayer>,
    source: &S,
    mode: &MapMode,
) -> Applied {
    let ticket = view.begin_fetch();
    let result = api::fetch_map_totals(source, mode).map(|t| HeatLayer::from_cumulative(&t));
    view.complete(ticket, result)
}
