//! Remote-to-local reconciliation.
//!
//! One pass takes the full remote collection, keeps the syncable records,
//! overwrites matching local movies with the remote title and watched flag,
//! creates the ones missing locally, and commits everything as one change set.
//! Local movies absent remotely are left alone.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::{ChangeSet, MovieRepository};
use crate::error::Result;
use crate::models::{Movie, MovieId, MovieRecord};
use crate::util::unix_millis_now;

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Remote movies created locally
    pub created: usize,
    /// Local movies overwritten with remote values
    pub updated: usize,
    /// Local movies already matching the remote record
    pub unchanged: usize,
    /// Remote records without identifier or watched flag
    pub skipped: usize,
}

impl ReconcileSummary {
    /// Whether the pass wrote anything locally.
    pub const fn changed(&self) -> bool {
        self.created > 0 || self.updated > 0
    }
}

/// Syncable remote movies keyed by identifier, plus the number discarded.
pub fn collect_syncable(remote: &BTreeMap<String, MovieRecord>) -> (BTreeMap<MovieId, Movie>, usize) {
    let mut working = BTreeMap::new();
    let mut skipped = 0;

    for (key, record) in remote {
        let Some(movie) = Movie::from_record(record) else {
            tracing::debug!(
                "Skipping remote record {key:?} ({:?}): missing identifier or hasWatched",
                record.title
            );
            skipped += 1;
            continue;
        };

        if let Some(previous) = working.insert(movie.id, movie) {
            tracing::warn!(
                "Remote identifier {} appears under several keys; keeping the record at {key:?}",
                previous.id
            );
        }
    }

    (working, skipped)
}

/// Diff the working set against the local movies sharing its identifiers.
///
/// Pure: the returned change set has not been applied yet.
pub fn plan_changes(
    mut working: BTreeMap<MovieId, Movie>,
    existing: Vec<Movie>,
) -> (ChangeSet, ReconcileSummary) {
    let mut changes = ChangeSet::new();
    let mut summary = ReconcileSummary::default();
    let now = unix_millis_now();

    for mut local in existing {
        let Some(remote) = working.remove(&local.id) else {
            continue;
        };

        if local.differs_from(&remote.title, remote.has_watched) {
            local.title = remote.title;
            local.has_watched = remote.has_watched;
            local.updated_at = now;
            changes.update(local);
            summary.updated += 1;
        } else {
            summary.unchanged += 1;
        }
    }

    for movie in working.into_values() {
        changes.insert(movie);
        summary.created += 1;
    }

    (changes, summary)
}

/// Reconcile the remote collection into `repo` and commit.
///
/// Callers serialize passes by holding the store's lock around this call.
pub async fn reconcile<R: MovieRepository>(
    repo: &R,
    remote: &BTreeMap<String, MovieRecord>,
) -> Result<ReconcileSummary> {
    let (working, skipped) = collect_syncable(remote);
    let ids = working.keys().copied().collect::<Vec<_>>();

    let existing = repo.find_by_identifiers(&ids).await?;
    let (changes, mut summary) = plan_changes(working, existing);
    summary.skipped = skipped;
    tracing::debug!("Applying {} staged movie changes", changes.len());

    if let Err(error) = repo.apply(&changes).await {
        tracing::error!("Error saving reconciled movies: {error}");
        return Err(error);
    }

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        unchanged = summary.unchanged,
        skipped = summary.skipped,
        "Reconciled remote movies"
    );
    Ok(summary)
}
