use tokio::sync::watch;

use crate::ui::{self, Ui};

/// Bridges the orchestrator's watch channels into the render loop. Each
/// call copies whatever snapshots advanced and reports whether anything
/// changed.
pub(crate) struct Poller {
    pub(crate) status_rx: watch::Receiver<ui::UiStatus>,
    pub(crate) traces_rx: watch::Receiver<ui::TracesSnapshot>,
    pub(crate) detail_rx: watch::Receiver<ui::DetailSnapshot>,
    pub(crate) analytics_rx: watch::Receiver<ui::AnalyticsViewSnapshot>,
    pub(crate) activity_rx: watch::Receiver<ui::ActivitySnapshot>,
}

impl Poller {
    pub(crate) fn poll(&mut self, ui: &mut Ui) -> bool {
        let mut dirty = false;

        let status = self.status_rx.borrow().clone();
        dirty |= ui.update_status(&status);

        let traces = self.traces_rx.borrow().clone();
        dirty |= ui.update_traces(&traces);

        let detail = self.detail_rx.borrow().clone();
        dirty |= ui.update_detail(&detail);

        let analytics = self.analytics_rx.borrow().clone();
        dirty |= ui.update_analytics(&analytics);

        let activity = self.activity_rx.borrow().clone();
        dirty |= ui.update_activity(&activity);

        dirty
    }
}
