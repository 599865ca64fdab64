use crate::aggregate::{aggregate, Aggregate};
use crate::api::ApiClient;
use crate::chart::{ChartBoard, ChartRenderer, ChartSurface};
use crate::fetch::{Fetcher, Scope};
use crate::map::{MapRenderer, MapSurface, MarkerLayer, PopupLayout};
use crate::metrics::RENDERS_TOTAL;
use crate::model::Camera;
use crate::view::{ModelInfo, SummaryCards, ViewModel};
use chrono::Local;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Refresh cadence of both pages
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(300);

/// Page controller: fetch, aggregate, then redraw map, charts and view slots.
///
/// `Scope::Fleet` is the overview page, `Scope::Model` the per-model page.
pub struct Dashboard<M = MarkerLayer, C = ChartBoard> {
    fetcher: Fetcher,
    scope: Scope,
    map: MapRenderer<M>,
    charts: ChartRenderer<C>,
    view: ViewModel,
    cameras: Vec<Camera>,
    aggregate: Aggregate,
}

impl Dashboard {
    pub fn new(client: ApiClient, scope: Scope) -> Self {
        Self::with_surfaces(client, scope, MarkerLayer::default(), ChartBoard::default())
    }
}

impl<M: MapSurface, C: ChartSurface> Dashboard<M, C> {
    pub fn with_surfaces(client: ApiClient, scope: Scope, map: M, charts: C) -> Self {
        let layout = match scope {
            Scope::Fleet => PopupLayout::Overview,
            Scope::Model(_) => PopupLayout::Detail,
        };

        Self {
            fetcher: Fetcher::new(client),
            scope,
            map: MapRenderer::new(map, layout),
            charts: ChartRenderer::new(charts),
            view: ViewModel::default(),
            cameras: Vec::new(),
            aggregate: Aggregate::default(),
        }
    }

    /// One fetch-and-render cycle. Returns false when the read failed, in which
    /// case everything drawn before stays as it was.
    pub async fn refresh(&mut self) -> bool {
        let Some(cameras) = self.fetcher.cameras(&self.scope).await else {
            warn!("Keeping last rendered state for {}", self.scope);
            return false;
        };

        let aggregate = aggregate(&cameras);
        match &self.scope {
            Scope::Fleet => {
                self.view.summary = Some(SummaryCards::from(&aggregate.totals));
                self.charts.render_by_model(&aggregate.groups);
            }
            Scope::Model(_) => {
                self.view.model_info = Some(ModelInfo::from(&aggregate.totals));
                self.charts.render_by_camera(&cameras);
            }
        }
        self.map.render(&cameras);

        if self.scope == Scope::Fleet {
            if let Some(models) = self.fetcher.models().await {
                self.view.set_model_list(&models);
            }
        }

        self.view.last_refresh = Some(Local::now());
        RENDERS_TOTAL.inc();
        debug!(
            "Rendered {} cameras in {} groups for {}",
            aggregate.totals.cameras,
            aggregate.groups.len(),
            self.scope
        );

        self.cameras = cameras;
        self.aggregate = aggregate;
        true
    }

    /// Refreshes now and then every `period` until `shutdown` resolves.
    ///
    /// `on_render` runs after each successful refresh.
    pub async fn run<F, R>(&mut self, period: Duration, shutdown: F, mut on_render: R)
    where
        F: Future<Output = ()>,
        R: FnMut(&Self),
    {
        info!("Refreshing {} every {:?}", self.scope, period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.refresh().await {
                        on_render(&*self);
                    }
                }
                _ = &mut shutdown => {
                    info!("Stopping refresh loop");
                    break;
                }
            }
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn client(&self) -> &ApiClient {
        self.fetcher.client()
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    pub fn map_surface(&self) -> &M {
        self.map.surface()
    }

    pub fn chart_surface(&self) -> &C {
        self.charts.surface()
    }
}
