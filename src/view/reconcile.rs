//! Mutation reconciliation.
//!
//! One strategy for every view. The remote call is always awaited first; only
//! a confirmed result touches the held rows:
//!
//! | call result | create | update | toggle |
//! |---|---|---|---|
//! | entity returned | prepend | replace in place | replace in place |
//! | entity already held | replace in place | - | - |
//! | empty success | refetch | refetch | patch in place |
//! | unexpected body | refetch | refetch | refetch |
//! | key not held | - | refetch | refetch |
//! | error | untouched | untouched | untouched |
//!
//! The view reports [`LoadState::Loading`] while the call is in flight.

use std::future::Future;

use super::{Keyed, ListSource, ListView, LoadState};
use crate::errors::ClientError;
use crate::pipeline::{Filterable, Sortable};

/// Successful outcome of a mutation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T> {
    /// The server returned the affected record.
    Entity(T),
    /// Success with an empty envelope.
    Acknowledged,
    /// Success, but the body was not the expected record shape.
    Unrecognized,
}

/// What the reconciler did to the held rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Prepended,
    Replaced,
    Patched,
    Refetched,
}

impl<T> ListView<T>
where
    T: Filterable + Sortable + Keyed + Send,
{
    /// Await a create call and prepend the created record.
    ///
    /// A returned key that is already held replaces that row instead.
    pub async fn create<F>(
        &mut self,
        source: &dyn ListSource<T>,
        call: F,
    ) -> Result<Reconciled, ClientError>
    where
        F: Future<Output = Result<Mutation<T>, ClientError>>,
    {
        match self.confirm(call).await? {
            Mutation::Entity(item) => match self.position(item.key()) {
                Some(index) => {
                    tracing::debug!(
                        view = self.name,
                        key = item.key(),
                        "Created record already held"
                    );
                    self.rows[index] = item;
                    Ok(Reconciled::Replaced)
                }
                None => {
                    tracing::debug!(
                        view = self.name,
                        key = item.key(),
                        "Prepending created record"
                    );
                    self.rows.insert(0, item);
                    Ok(Reconciled::Prepended)
                }
            },
            _ => self.refetch(source, "create returned no record").await,
        }
    }

    /// Await an update call and replace the matching record in place.
    pub async fn update<F>(
        &mut self,
        source: &dyn ListSource<T>,
        call: F,
    ) -> Result<Reconciled, ClientError>
    where
        F: Future<Output = Result<Mutation<T>, ClientError>>,
    {
        match self.confirm(call).await? {
            Mutation::Entity(item) => match self.position(item.key()) {
                Some(index) => {
                    self.rows[index] = item;
                    Ok(Reconciled::Replaced)
                }
                None => self.refetch(source, "updated record is not held").await,
            },
            _ => self.refetch(source, "update returned no record").await,
        }
    }

    /// Await a status toggle for `key`.
    ///
    /// An empty success applies `patch` to the held record.
    pub async fn toggle<F, P>(
        &mut self,
        source: &dyn ListSource<T>,
        key: &str,
        call: F,
        patch: P,
    ) -> Result<Reconciled, ClientError>
    where
        F: Future<Output = Result<Mutation<T>, ClientError>>,
        P: FnOnce(&mut T),
    {
        match self.confirm(call).await? {
            Mutation::Entity(item) => match self.position(item.key()) {
                Some(index) => {
                    self.rows[index] = item;
                    Ok(Reconciled::Replaced)
                }
                None => self.refetch(source, "toggled record is not held").await,
            },
            Mutation::Acknowledged => match self.position(key) {
                Some(index) => {
                    patch(&mut self.rows[index]);
                    Ok(Reconciled::Patched)
                }
                None => self.refetch(source, "toggled record is not held").await,
            },
            Mutation::Unrecognized => self.refetch(source, "toggle response not understood").await,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.key() == key)
    }

    async fn confirm<F>(&mut self, call: F) -> Result<Mutation<T>, ClientError>
    where
        F: Future<Output = Result<Mutation<T>, ClientError>>,
    {
        let previous = self.state;
        self.state = LoadState::Loading;
        match call.await {
            Ok(outcome) => {
                self.state = LoadState::Loaded;
                Ok(outcome)
            }
            Err(e) => {
                self.state = previous;
                tracing::warn!(view = self.name, "Mutation failed: {}", e);
                self.notifier.error(e.user_message());
                Err(e)
            }
        }
    }

    async fn refetch(
        &mut self,
        source: &dyn ListSource<T>,
        reason: &str,
    ) -> Result<Reconciled, ClientError> {
        tracing::warn!(view = self.name, reason, "Falling back to a full refetch");
        self.reload(source).await.map(|()| Reconciled::Refetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::api::interpret_mutation;
    use crate::models::{PartPolicy, PolicyStatus};
    use crate::notify::{self, NoticeLevel};
    use crate::view::testing::FakeSource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn policy(id: &str, status: PolicyStatus) -> PartPolicy {
        PartPolicy {
            id: id.to_string(),
            part_code: Some(format!("PART-{}", id)),
            part_name: None,
            policy_code: Some(format!("POL-{}", id)),
            start_date: None,
            end_date: None,
            status: Some(status),
        }
    }

    fn ids(view: &ListView<PartPolicy>) -> Vec<&str> {
        view.rows().iter().map(|p| p.id.as_str()).collect()
    }

    fn view_with(rows: Vec<PartPolicy>) -> (ListView<PartPolicy>, notify::NoticeFeed) {
        let (notifier, feed) = notify::channel();
        let mut view = ListView::new("policies", 10, notifier);
        view.set_rows(rows);
        (view, feed)
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let (mut view, _feed) = view_with(vec![
            policy("B", PolicyStatus::Active),
            policy("C", PolicyStatus::Active),
        ]);

        let outcome = view
            .create(&source, async {
                Ok(Mutation::Entity(policy("A", PolicyStatus::Active)))
            })
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Prepended);
        assert_eq!(ids(&view), vec!["A", "B", "C"]);
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let (mut view, _feed) = view_with(vec![
            policy("A", PolicyStatus::Active),
            policy("B", PolicyStatus::Active),
            policy("C", PolicyStatus::Active),
        ]);

        let mut updated = policy("B", PolicyStatus::Active);
        updated.part_name = Some("Updated".to_string());
        let outcome = view
            .update(&source, async { Ok(Mutation::Entity(updated)) })
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Replaced);
        assert_eq!(ids(&view), vec!["A", "B", "C"]);
        assert_eq!(view.rows()[1].part_name.as_deref(), Some("Updated"));
    }

    #[tokio::test]
    async fn test_update_of_unknown_key_refetches() {
        let server_rows = vec![
            policy("A", PolicyStatus::Active),
            policy("Z", PolicyStatus::Active),
        ];
        let source = FakeSource::new(server_rows.clone());
        let (mut view, _feed) = view_with(vec![policy("A", PolicyStatus::Active)]);

        let outcome = view
            .update(&source, async {
                Ok(Mutation::Entity(policy("Z", PolicyStatus::Active)))
            })
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Refetched);
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(view.rows(), server_rows.as_slice());
    }

    #[tokio::test]
    async fn test_acknowledged_toggle_patches_in_place() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let (mut view, _feed) = view_with(vec![
            policy("A", PolicyStatus::Active),
            policy("B", PolicyStatus::Active),
        ]);

        let outcome = view
            .toggle(
                &source,
                "B",
                async { Ok(Mutation::Acknowledged) },
                |p: &mut PartPolicy| p.status = p.status.map(|s| s.toggled()),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Patched);
        assert_eq!(view.rows()[1].status, Some(PolicyStatus::Inactive));
        assert_eq!(view.rows()[0].status, Some(PolicyStatus::Active));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_unrecognized_toggle_refetches() {
        let source = FakeSource::new(vec![policy("A", PolicyStatus::Inactive)]);
        let (mut view, _feed) = view_with(vec![policy("A", PolicyStatus::Active)]);

        let outcome = view
            .toggle(
                &source,
                "A",
                async { Ok(Mutation::Unrecognized) },
                |_: &mut PartPolicy| panic!("must not patch on an unrecognized response"),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Refetched);
        assert_eq!(view.rows()[0].status, Some(PolicyStatus::Inactive));
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_rows_untouched() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let before = vec![
            policy("A", PolicyStatus::Active),
            policy("B", PolicyStatus::Inactive),
        ];
        let (mut view, mut feed) = view_with(before.clone());

        let failing = || async {
            Err::<Mutation<PartPolicy>, _>(ClientError::Network("connection reset".to_string()))
        };

        assert!(view.create(&source, failing()).await.is_err());
        assert!(view.update(&source, failing()).await.is_err());
        assert!(view
            .toggle(&source, "A", failing(), |p: &mut PartPolicy| p.status = None)
            .await
            .is_err());

        assert_eq!(view.rows(), before.as_slice());
        assert_eq!(source.fetch_count(), 0);

        let notices = feed.drain();
        assert_eq!(notices.len(), 3);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
    }

    #[tokio::test]
    async fn test_server_rejection_surfaces_server_message() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let (mut view, mut feed) = view_with(vec![policy("A", PolicyStatus::Active)]);

        let result = view
            .create(&source, async {
                Err(ClientError::from_response(
                    409,
                    r#"{"message":"Policy code already exists"}"#,
                ))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(view.rows().len(), 1);
        assert_eq!(feed.drain()[0].message, "Policy code already exists");
    }

    #[tokio::test]
    async fn test_create_of_held_key_replaces() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let (mut view, _feed) = view_with(vec![
            policy("A", PolicyStatus::Active),
            policy("B", PolicyStatus::Active),
        ]);

        let mut echoed = policy("B", PolicyStatus::Inactive);
        echoed.part_name = Some("Echoed".to_string());
        let outcome = view
            .create(&source, async { Ok(Mutation::Entity(echoed)) })
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Replaced);
        assert_eq!(ids(&view), vec!["A", "B"]);
        assert_eq!(view.rows()[1].part_name.as_deref(), Some("Echoed"));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_acknowledged_toggle_of_unknown_key_refetches() {
        let server_rows = vec![
            policy("A", PolicyStatus::Active),
            policy("Z", PolicyStatus::Inactive),
        ];
        let source = FakeSource::new(server_rows.clone());
        let (mut view, _feed) = view_with(vec![policy("A", PolicyStatus::Active)]);

        let outcome = view
            .toggle(
                &source,
                "Z",
                async { Ok(Mutation::Acknowledged) },
                |_: &mut PartPolicy| panic!("nothing held to patch"),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Refetched);
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(view.rows(), server_rows.as_slice());
    }

    #[tokio::test]
    async fn test_partial_toggle_reply_refetches_instead_of_replacing() {
        let mut held = policy("P1", PolicyStatus::Active);
        held.part_code = Some("BAT-01".to_string());
        let mut on_server = held.clone();
        on_server.status = Some(PolicyStatus::Inactive);
        let source = FakeSource::new(vec![on_server]);
        let (mut view, _feed) = view_with(vec![held]);

        let reply = json!({"data": {"id": "P1", "status": "INACTIVE"}});
        let outcome = view
            .toggle(
                &source,
                "P1",
                async move { Ok(interpret_mutation::<PartPolicy>(Some(reply))) },
                |_: &mut PartPolicy| panic!("a partial reply is not an acknowledgement"),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciled::Refetched);
        assert_eq!(view.rows()[0].part_code.as_deref(), Some("BAT-01"));
        assert_eq!(view.rows()[0].status, Some(PolicyStatus::Inactive));
    }

    #[tokio::test]
    async fn test_view_is_loading_while_mutation_in_flight() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let (mut view, _feed) = view_with(vec![policy("A", PolicyStatus::Active)]);
        assert_eq!(view.state(), LoadState::Loaded);

        // Abandon a call that never resolves and look at the state it left.
        let stalled = tokio::time::timeout(
            Duration::from_millis(20),
            view.create(&source, std::future::pending()),
        )
        .await;
        assert!(stalled.is_err());
        assert!(view.is_loading());

        view.update(&source, async {
            Ok(Mutation::Entity(policy("A", PolicyStatus::Inactive)))
        })
        .await
        .unwrap();
        assert_eq!(view.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_failed_mutation_restores_previous_state() {
        let source = FakeSource::<PartPolicy>::new(vec![]);
        let (notifier, _feed) = notify::channel();
        let mut view: ListView<PartPolicy> = ListView::new("policies", 10, notifier);
        assert_eq!(view.state(), LoadState::Idle);

        let result = view
            .create(&source, async {
                Err(ClientError::Network("connection reset".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(view.state(), LoadState::Idle);
    }
}
