//! `show` and `watch`: render a page once, or keep it live until interrupted.

use std::time::Duration;

use riskwatch_api_models::{
    Alert, AlertStatus, AnalyticsData, DashboardData, Entity, RealTimeRiskData,
    RealTimeSnapshot, RiskAnalysisData, RiskLevel, Severity, ThreatBoardData,
};
use riskwatch_gateway::{
    AlertsSource, AnalyticsSource, DashboardSource, EntitiesSource, PollHandle, PollIntervals,
    PollingController, RealTimeRiskSource, RealTimeStatsSource, RiskAnalysisSource, ThreatSource,
    ViewSnapshot, ViewSource, ViewStore, fetch_cycle,
};
use riskwatch_views::pages::{AlertBoard, EntitiesView, LiveRiskPane, ThreatBoard};
use riskwatch_views::{AlertFilter, Choice, EntityFilter, Page, Router, TextFilter, ThreatFilter};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cli::{OutputFormat, ShowArgs, ViewArgs, WatchArgs};
use crate::client::{AppContext, CliError, CliResult, parse_choice};
use crate::output::{
    SnapshotMeta, render_alerts, render_analytics, render_dashboard, render_entities,
    render_risk_analysis, render_threats,
};

/// Filter and paging state parsed from `show`/`watch` flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ViewFilters {
    pub(crate) search: TextFilter,
    pub(crate) level: Choice<RiskLevel>,
    pub(crate) severity: Choice<Severity>,
    pub(crate) status: Choice<AlertStatus>,
    pub(crate) page: usize,
}

impl ViewFilters {
    pub(crate) fn from_args(args: &ViewArgs) -> CliResult<Self> {
        Ok(Self {
            search: TextFilter::new(&args.search),
            level: parse_choice("level", args.level.as_deref())?,
            severity: parse_choice("severity", args.severity.as_deref())?,
            status: parse_choice("status", args.status.as_deref())?,
            page: args.page_number,
        })
    }

    fn entity_filter(&self) -> EntityFilter {
        EntityFilter {
            search: self.search.clone(),
            level: self.level,
        }
    }

    fn alert_filter(&self) -> AlertFilter {
        AlertFilter {
            search: self.search.clone(),
            severity: self.severity,
            status: self.status,
        }
    }

    fn threat_filter(&self) -> ThreatFilter {
        ThreatFilter {
            search: self.search.clone(),
            severity: self.severity,
        }
    }
}

/// Page model that keeps filter and paging state across fetched payloads.
pub(crate) trait PageModel {
    type Data: Clone + Default;

    /// Swap in a freshly fetched payload; paging returns to the first page.
    fn replace(&mut self, data: Self::Data);

    fn goto(&mut self, page: usize);

    fn current_page(&self) -> usize;

    fn render(&self, meta: &SnapshotMeta, format: OutputFormat) -> CliResult<()>;
}

impl PageModel for EntitiesView {
    type Data = Vec<Entity>;

    fn replace(&mut self, data: Self::Data) {
        Self::replace(self, data);
    }

    fn goto(&mut self, page: usize) {
        self.list_mut().goto(page);
    }

    fn current_page(&self) -> usize {
        self.list().bounds().page
    }

    fn render(&self, meta: &SnapshotMeta, format: OutputFormat) -> CliResult<()> {
        render_entities(meta, self, format)
    }
}

impl PageModel for AlertBoard {
    type Data = Vec<Alert>;

    fn replace(&mut self, data: Self::Data) {
        Self::replace(self, data);
    }

    fn goto(&mut self, page: usize) {
        self.list_mut().goto(page);
    }

    fn current_page(&self) -> usize {
        self.list().bounds().page
    }

    fn render(&self, meta: &SnapshotMeta, format: OutputFormat) -> CliResult<()> {
        render_alerts(meta, self, format)
    }
}

impl PageModel for ThreatBoard {
    type Data = ThreatBoardData;

    fn replace(&mut self, data: Self::Data) {
        Self::replace(self, data);
    }

    fn goto(&mut self, page: usize) {
        self.list_mut().goto(page);
    }

    fn current_page(&self) -> usize {
        self.list().bounds().page
    }

    fn render(&self, meta: &SnapshotMeta, format: OutputFormat) -> CliResult<()> {
        render_threats(meta, self, format)
    }
}

/// One page model fed by successive snapshots.
///
/// The `--page` flag positions only the first render; every later payload
/// replaces the rows and paging starts over at page 1.
pub(crate) struct LivePage<M> {
    page: Page,
    model: M,
    requested_page: Option<usize>,
}

impl<M: PageModel> LivePage<M> {
    pub(crate) const fn new(page: Page, model: M, requested_page: usize) -> Self {
        Self {
            page,
            model,
            requested_page: Some(requested_page),
        }
    }

    pub(crate) fn absorb(&mut self, snapshot: &ViewSnapshot<M::Data>) {
        self.model
            .replace(snapshot.data().cloned().unwrap_or_default());
        if let Some(page) = self.requested_page.take() {
            self.model.goto(page);
        }
        debug!(
            page = self.page.slug(),
            current = self.model.current_page(),
            "page data replaced"
        );
    }

    pub(crate) const fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub(crate) fn render(&self, ctx: &AppContext, snapshot: &ViewSnapshot<M::Data>) -> CliResult<()> {
        let meta = SnapshotMeta::from_snapshot(self.page, snapshot);
        self.model.render(&meta, ctx.output)
    }

    pub(crate) fn show(&mut self, ctx: &AppContext, snapshot: &ViewSnapshot<M::Data>) -> CliResult<()> {
        self.absorb(snapshot);
        self.render(ctx, snapshot)
    }
}

/// Fetch a page once, apply a local edit on top, and render the result.
///
/// Used after a remote action so the affected row shows its new state before
/// the backend's next listing catches up.
pub(crate) async fn show_with_edit<S, M>(
    ctx: &AppContext,
    page: Page,
    source: S,
    model: M,
    edit: impl FnOnce(&mut M) -> bool,
) -> CliResult<()>
where
    S: ViewSource<Output = M::Data>,
    M: PageModel,
{
    let snapshot = fetch_once(source).await;
    let mut live = LivePage::new(page, model, 1);
    live.absorb(&snapshot);
    if !edit(live.model_mut()) {
        warn!(page = page.slug(), "edited row is not in the fetched listing");
    }
    live.render(ctx, &snapshot)
}

fn resolve_page(raw: &str) -> Page {
    let mut router = Router::default();
    let page = router.navigate_to(raw);
    if page.slug() != raw.trim().to_ascii_lowercase() {
        warn!(requested = raw, page = page.slug(), "unknown page, showing dashboard");
    }
    router.active()
}

pub(crate) async fn handle_show(ctx: &AppContext, args: ShowArgs) -> CliResult<()> {
    let filters = ViewFilters::from_args(&args.view)?;
    let page = resolve_page(&args.view.target);
    let gateway = ctx.gateway.clone();

    match page {
        Page::Dashboard => {
            let (dashboard, live) = tokio::join!(
                fetch_once(DashboardSource::new(gateway.clone())),
                fetch_once(RealTimeRiskSource::new(gateway)),
            );
            render_dashboard_page(ctx, &dashboard, Some(&live), None)
        }
        Page::Entities => {
            let snapshot = fetch_once(EntitiesSource::new(gateway)).await;
            entities_page(&filters).show(ctx, &snapshot)
        }
        Page::RiskAnalysis => {
            let snapshot = fetch_once(RiskAnalysisSource::new(gateway)).await;
            render_risk_analysis_page(ctx, &snapshot)
        }
        Page::ThreatDetection => {
            let snapshot = fetch_once(ThreatSource::new(gateway)).await;
            threat_page(&filters).show(ctx, &snapshot)
        }
        Page::Analytics => {
            let snapshot = fetch_once(AnalyticsSource::new(gateway)).await;
            render_analytics_page(ctx, &snapshot)
        }
        Page::Alerts => {
            let snapshot = fetch_once(AlertsSource::new(gateway)).await;
            alert_page(&filters).show(ctx, &snapshot)
        }
    }
}

pub(crate) async fn handle_watch(ctx: &AppContext, args: WatchArgs) -> CliResult<()> {
    let filters = ViewFilters::from_args(&args.view)?;
    let page = resolve_page(&args.view.target);
    let intervals = match args.interval {
        Some(0) => return Err(CliError::validation("--interval must be at least 1 second")),
        Some(secs) => PollIntervals::uniform(Duration::from_secs(secs)),
        None => PollIntervals::default(),
    };
    let gateway = ctx.gateway.clone();
    info!(page = page.slug(), "watching page; press Ctrl-C to stop");

    match page {
        Page::Dashboard => watch_dashboard(ctx, intervals).await,
        Page::Entities => {
            let mut live = entities_page(&filters);
            watch_view(
                EntitiesSource::new(gateway),
                intervals.entities,
                |snapshot| live.show(ctx, snapshot),
            )
            .await
        }
        Page::RiskAnalysis => {
            watch_view(
                RiskAnalysisSource::new(gateway),
                intervals.risk_analysis,
                |snapshot| render_risk_analysis_page(ctx, snapshot),
            )
            .await
        }
        Page::ThreatDetection => {
            let mut live = threat_page(&filters);
            watch_view(ThreatSource::new(gateway), intervals.threats, |snapshot| {
                live.show(ctx, snapshot)
            })
            .await
        }
        Page::Analytics => {
            watch_view(AnalyticsSource::new(gateway), intervals.analytics, |snapshot| {
                render_analytics_page(ctx, snapshot)
            })
            .await
        }
        Page::Alerts => {
            let mut live = alert_page(&filters);
            watch_view(AlertsSource::new(gateway), intervals.alerts, |snapshot| {
                live.show(ctx, snapshot)
            })
            .await
        }
    }
}

/// Run exactly one fetch cycle through a fresh store and return what it published.
pub(crate) async fn fetch_once<S: ViewSource>(source: S) -> ViewSnapshot<S::Output> {
    let store = ViewStore::new(source.name());
    fetch_cycle(&source, &store).await;
    store.snapshot()
}

async fn watch_view<S, R>(source: S, interval: Duration, mut render: R) -> CliResult<()>
where
    S: ViewSource,
    R: FnMut(&ViewSnapshot<S::Output>) -> CliResult<()>,
{
    let handle = PollingController::spawn(source, interval);
    let mut updates = handle.subscribe();
    let mut rendered = 0_u64;
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    let result = loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.applied_sequence == rendered {
                    continue;
                }
                rendered = snapshot.applied_sequence;
                if let Err(err) = render(&snapshot) {
                    break Err(err);
                }
            }
            _ = &mut interrupted => break Ok(()),
        }
    };

    handle.shutdown().await;
    result
}

async fn watch_dashboard(ctx: &AppContext, intervals: PollIntervals) -> CliResult<()> {
    let gateway = ctx.gateway.clone();
    let dashboard =
        PollingController::spawn(DashboardSource::new(gateway.clone()), intervals.dashboard);
    let live =
        PollingController::spawn(RealTimeRiskSource::new(gateway.clone()), intervals.risk_data);
    let stats =
        PollingController::spawn(RealTimeStatsSource::new(gateway), intervals.real_time_stats);

    let mut dashboard_rx = dashboard.subscribe();
    let mut live_rx = live.subscribe();
    let mut stats_rx = stats.subscribe();
    let mut rendered = (0_u64, 0_u64, 0_u64);
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    let result = loop {
        tokio::select! {
            changed = dashboard_rx.changed() => if changed.is_err() { break Ok(()) },
            changed = live_rx.changed() => if changed.is_err() { break Ok(()) },
            changed = stats_rx.changed() => if changed.is_err() { break Ok(()) },
            _ = &mut interrupted => break Ok(()),
        }
        let current = (
            latest(&mut dashboard_rx),
            latest(&mut live_rx),
            latest(&mut stats_rx),
        );
        let sequences = (
            current.0.applied_sequence,
            current.1.applied_sequence,
            current.2.applied_sequence,
        );
        if sequences == rendered || current.0.applied_sequence == 0 {
            continue;
        }
        rendered = sequences;
        if let Err(err) =
            render_dashboard_page(ctx, &current.0, Some(&current.1), Some(&current.2))
        {
            break Err(err);
        }
    };

    shutdown_all(dashboard, live, stats).await;
    result
}

fn latest<T>(receiver: &mut watch::Receiver<ViewSnapshot<T>>) -> ViewSnapshot<T> {
    receiver.borrow_and_update().clone()
}

async fn shutdown_all(
    dashboard: PollHandle<DashboardSource>,
    live: PollHandle<RealTimeRiskSource>,
    stats: PollHandle<RealTimeStatsSource>,
) {
    tokio::join!(dashboard.shutdown(), live.shutdown(), stats.shutdown());
}

fn render_dashboard_page(
    ctx: &AppContext,
    dashboard: &ViewSnapshot<DashboardData>,
    live: Option<&ViewSnapshot<RealTimeRiskData>>,
    stats: Option<&ViewSnapshot<RealTimeSnapshot>>,
) -> CliResult<()> {
    let meta = SnapshotMeta::from_snapshot(Page::Dashboard, dashboard);
    let mut data = dashboard.data().cloned();
    if let (Some(data), Some(latest)) = (data.as_mut(), stats.and_then(ViewSnapshot::data)) {
        data.real_time = latest.stats.clone();
        data.active_users = latest.active_users.clone();
    }
    let pane = live.and_then(ViewSnapshot::data).map(LiveRiskPane::derive);
    render_dashboard(&meta, data.as_ref(), pane.as_ref(), ctx.output)
}

fn entities_page(filters: &ViewFilters) -> LivePage<EntitiesView> {
    LivePage::new(
        Page::Entities,
        EntitiesView::new(Vec::new(), filters.entity_filter()),
        filters.page,
    )
}

fn render_risk_analysis_page(
    ctx: &AppContext,
    snapshot: &ViewSnapshot<RiskAnalysisData>,
) -> CliResult<()> {
    let meta = SnapshotMeta::from_snapshot(Page::RiskAnalysis, snapshot);
    render_risk_analysis(&meta, snapshot.data(), ctx.output)
}

fn threat_page(filters: &ViewFilters) -> LivePage<ThreatBoard> {
    LivePage::new(
        Page::ThreatDetection,
        ThreatBoard::new(ThreatBoardData::default(), filters.threat_filter()),
        filters.page,
    )
}

fn render_analytics_page(ctx: &AppContext, snapshot: &ViewSnapshot<AnalyticsData>) -> CliResult<()> {
    let meta = SnapshotMeta::from_snapshot(Page::Analytics, snapshot);
    render_analytics(&meta, snapshot.data(), ctx.output)
}

fn alert_page(filters: &ViewFilters) -> LivePage<AlertBoard> {
    LivePage::new(
        Page::Alerts,
        AlertBoard::new(Vec::new(), filters.alert_filter()),
        filters.page,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::Client;
    use riskwatch_gateway::GatewayClient;
    use riskwatch_test_support::{fixtures, unreachable_base_url};
    use serde_json::json;
    use url::Url;

    fn context_with(server: &MockServer) -> AppContext {
        let base: Url = format!("{}/api", server.base_url()).parse().expect("valid URL");
        AppContext {
            gateway: GatewayClient::with_http_client(Client::new(), base),
            output: OutputFormat::Table,
        }
    }

    fn offline_context() -> AppContext {
        AppContext {
            gateway: GatewayClient::with_http_client(Client::new(), unreachable_base_url()),
            output: OutputFormat::Json,
        }
    }

    fn view_args(target: &str) -> ViewArgs {
        ViewArgs {
            target: target.to_string(),
            page_number: 1,
            ..ViewArgs::default()
        }
    }

    #[test]
    fn filters_parse_from_flags() {
        let mut args = view_args("alerts");
        args.search = "Admin".to_string();
        args.severity = Some("critical".to_string());
        args.status = Some("all".to_string());
        let filters = ViewFilters::from_args(&args).expect("filters");
        assert_eq!(filters.search.term(), "admin");
        assert_eq!(filters.severity, Choice::Only(Severity::Critical));
        assert_eq!(filters.status, Choice::All);
        assert_eq!(filters.level, Choice::All);
    }

    #[test]
    fn invalid_filter_is_a_validation_error() {
        let mut args = view_args("entities");
        args.level = Some("severe".to_string());
        let err = ViewFilters::from_args(&args).expect_err("invalid level");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_page_resolves_to_dashboard() {
        assert_eq!(resolve_page("alerts"), Page::Alerts);
        assert_eq!(resolve_page("reports"), Page::Dashboard);
    }

    #[tokio::test]
    async fn show_entities_fetches_once() {
        let server = MockServer::start_async().await;
        let entities = fixtures::entities_with_levels(45, 25);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/entities");
            then.status(200).json_body(json!(entities));
        });

        let ctx = context_with(&server);
        let mut args = view_args("entities");
        args.level = Some("high".to_string());
        args.page_number = 2;
        let result = handle_show(&ctx, ShowArgs { view: args }).await;

        assert!(result.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn show_alerts_against_unreachable_backend_renders_placeholder() {
        let ctx = offline_context();
        let result = handle_show(&ctx, ShowArgs { view: view_args("alerts") }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn fetch_once_degrades_to_fallback_when_offline() {
        let ctx = offline_context();
        let snapshot = fetch_once(AlertsSource::new(ctx.gateway.clone())).await;
        assert!(!snapshot.connected);
        assert!(snapshot.using_fallback);
        assert_eq!(snapshot.data().map(Vec::len), Some(8));
    }

    #[tokio::test]
    async fn fetch_once_without_fallback_has_no_data() {
        let ctx = offline_context();
        let snapshot = fetch_once(EntitiesSource::new(ctx.gateway.clone())).await;
        assert!(!snapshot.connected);
        assert!(snapshot.data().is_none());
        let filters = ViewFilters::from_args(&view_args("entities")).expect("filters");
        assert!(entities_page(&filters).show(&ctx, &snapshot).is_ok());
    }

    fn live_snapshot<T>(data: T, sequence: u64) -> ViewSnapshot<T> {
        ViewSnapshot {
            data: Some(std::sync::Arc::new(data)),
            connected: true,
            applied_sequence: sequence,
            ..ViewSnapshot::idle()
        }
    }

    #[test]
    fn watched_page_returns_to_first_page_when_data_is_replaced() {
        let ctx = offline_context();
        let mut args = view_args("entities");
        args.level = Some("high".to_string());
        args.page_number = 2;
        let filters = ViewFilters::from_args(&args).expect("filters");
        let mut live = entities_page(&filters);

        let first = live_snapshot(fixtures::entities_with_levels(45, 25), 1);
        assert!(live.show(&ctx, &first).is_ok());
        assert_eq!(live.model_mut().current_page(), 2, "--page positions the first render");

        let second = live_snapshot(fixtures::entities_with_levels(46, 25), 2);
        assert!(live.show(&ctx, &second).is_ok());
        assert_eq!(live.model_mut().current_page(), 1);
        assert_eq!(live.model_mut().list().source().len(), 46);
    }

    #[test]
    fn local_alert_edit_is_overwritten_by_next_snapshot() {
        let ctx = offline_context();
        let filters = ViewFilters::from_args(&view_args("alerts")).expect("filters");
        let mut live = alert_page(&filters);
        let listing = vec![fixtures::alert("A-1", Severity::High, AlertStatus::Active)];

        live.absorb(&live_snapshot(listing.clone(), 1));
        assert!(live.model_mut().acknowledge_local("A-1"));
        assert_eq!(live.model_mut().active_count(), 0);

        assert!(live.show(&ctx, &live_snapshot(listing, 2)).is_ok());
        assert_eq!(live.model_mut().active_count(), 1);
    }

    #[tokio::test]
    async fn watch_rejects_zero_interval() {
        let ctx = offline_context();
        let err = handle_watch(
            &ctx,
            WatchArgs {
                view: view_args("alerts"),
                interval: Some(0),
            },
        )
        .await
        .expect_err("zero interval");
        assert_eq!(err.exit_code(), 2);
    }
}
