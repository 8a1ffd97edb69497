//! State streams that follow the latest page source
//!
//! Each stream yields the current value on first poll, then every distinct
//! change. When a refresh publishes a new source the stream rebinds to it,
//! so a single subscription survives any number of refreshes.

use crate::pagination::{PageSnapshot, PageSource};
use futures::stream::{self, BoxStream};
use std::sync::Arc;
use tokio::sync::watch;

type Latest = watch::Receiver<Option<Arc<PageSource>>>;

struct Follow<T, F> {
    latest: Latest,
    latest_open: bool,
    source: Option<watch::Receiver<PageSnapshot>>,
    rebind: bool,
    last: Option<T>,
    project: F,
}

enum Wake {
    Latest,
    LatestClosed,
    Source,
    SourceClosed,
    Done,
}

/// Project every snapshot of the latest source through `project`, skipping
/// values equal to the one yielded last
pub(crate) fn follow_latest<T, F>(latest: Latest, project: F) -> BoxStream<'static, T>
where
    T: Clone + PartialEq + Send + 'static,
    F: Fn(&PageSnapshot) -> T + Send + 'static,
{
    let state = Follow {
        latest,
        latest_open: true,
        source: None,
        rebind: true,
        last: None,
        project,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if st.rebind {
                st.rebind = false;
                let current = st.latest.borrow_and_update().clone();
                st.source = current.map(|source| source.subscribe());
            }

            if let Some(rx) = st.source.as_mut() {
                let value = (st.project)(&rx.borrow_and_update());
                if st.last.as_ref() != Some(&value) {
                    st.last = Some(value.clone());
                    return Some((value, st));
                }
            }

            let wake = match (st.source.as_mut(), st.latest_open) {
                (Some(rx), true) => tokio::select! {
                    changed = st.latest.changed() => {
                        if changed.is_ok() { Wake::Latest } else { Wake::LatestClosed }
                    }
                    changed = rx.changed() => {
                        if changed.is_ok() { Wake::Source } else { Wake::SourceClosed }
                    }
                },
                (Some(rx), false) => match rx.changed().await {
                    Ok(()) => Wake::Source,
                    Err(_) => Wake::Done,
                },
                (None, true) => match st.latest.changed().await {
                    Ok(()) => Wake::Latest,
                    Err(_) => Wake::Done,
                },
                (None, false) => Wake::Done,
            };

            match wake {
                Wake::Latest => st.rebind = true,
                Wake::LatestClosed => st.latest_open = false,
                Wake::SourceClosed => {
                    st.source = None;
                    st.rebind = st.latest_open;
                }
                Wake::Source => {}
                Wake::Done => return None,
            }
        }
    }))
}
