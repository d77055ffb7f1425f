//! Client-side state container for the user collection.
//!
//! The store mirrors the remote collection in memory and owns the four
//! asynchronous operations (fetch, create, update, delete) plus the
//! synchronous search-term mutation. Every state change funnels through
//! [`UserStore::apply`], so the transition rules live in one place and the
//! event-loop and the direct async methods cannot drift apart.
//!
//! The store is an explicitly owned value. Whoever drives it injects the
//! remote collaborator as a [`UserApi`] reference; nothing here is global.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::api::{NewUser, User, UserApi, UserId};
use crate::error::{WriteFailure, WriteOp};
use crate::search::filter_users;

/// One state transition. Produced either by the async operations below or
/// by tasks completing on the event-loop channel.
#[derive(Debug)]
pub enum StoreEvent {
    /// The initial fetch went in flight.
    FetchStarted,
    /// Fetch succeeded; the payload replaces the collection.
    Fetched(Vec<User>),
    /// Fetch failed; the message is recorded, the collection is untouched.
    FetchFailed(String),
    /// Create succeeded; the record is appended with a locally derived id.
    Created(User),
    /// Update succeeded; replaces the entry with the matching id, if any.
    Updated(User),
    /// Delete succeeded; removes the entry with the matching id, if any.
    Deleted(UserId),
    /// A write was rejected; the collection is left unchanged.
    WriteFailed(WriteFailure),
}

/// In-memory collection state plus the flags the view renders from.
#[derive(Debug, Default)]
pub struct UserStore {
    /// Arrival order from fetch, then appended creates.
    pub users: Vec<User>,
    /// True only while the initial fetch is in flight.
    pub loading: bool,
    /// Current filter string; see [`filter_users`].
    pub search_term: String,
    /// Last fetch failure message.
    pub error: Option<String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transition. This is the only place collection state moves.
    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::FetchStarted => {
                self.loading = true;
            }
            StoreEvent::Fetched(users) => {
                self.loading = false;
                self.error = None;
                self.users = users;
            }
            StoreEvent::FetchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            StoreEvent::Created(mut user) => {
                // The fixture API does not persist writes, so the echoed id
                // cannot be trusted to stay unique; derive one locally.
                user.id = self.next_local_id();
                self.users.push(user);
            }
            StoreEvent::Updated(user) => {
                if let Some(existing) = self.users.iter_mut().find(|u| u.id == user.id) {
                    *existing = user;
                }
            }
            StoreEvent::Deleted(id) => {
                self.users.retain(|u| u.id != id);
            }
            StoreEvent::WriteFailed(failure) => {
                tracing::warn!(error = %failure, "write rejected; collection left unchanged");
            }
        }
    }

    /// Fetch the whole collection. Single attempt; failure is terminal for
    /// this call and lands in [`UserStore::error`].
    pub async fn fetch_all(&mut self, api: &impl UserApi) {
        self.apply(StoreEvent::FetchStarted);
        let event = match api.list_users().await {
            Ok(users) => StoreEvent::Fetched(users),
            Err(e) => StoreEvent::FetchFailed(e.to_string()),
        };
        self.apply(event);
    }

    /// Send a candidate to the remote collection and append the result.
    /// No optimistic update: a failure appends nothing.
    pub async fn create(
        &mut self,
        api: &impl UserApi,
        candidate: NewUser,
    ) -> Result<UserId, WriteFailure> {
        match api.create_user(&candidate).await {
            Ok(created) => {
                self.apply(StoreEvent::Created(created));
                // apply() rewrote the id; the new record sits at the end.
                Ok(self.users.last().map(|u| u.id).unwrap_or_default())
            }
            Err(source) => Err(WriteFailure {
                operation: WriteOp::Create,
                id: None,
                source,
            }),
        }
    }

    /// Send the full record to the remote collection at its id. The remote
    /// response is ignored; the request payload becomes the new local state
    /// of the matching entry. No-op when the id is absent locally.
    pub async fn update(&mut self, api: &impl UserApi, record: User) -> Result<(), WriteFailure> {
        match api.update_user(&record).await {
            Ok(()) => {
                self.apply(StoreEvent::Updated(record));
                Ok(())
            }
            Err(source) => Err(WriteFailure {
                operation: WriteOp::Update,
                id: Some(record.id),
                source,
            }),
        }
    }

    /// Delete the record with the given id. Deleting an absent id succeeds
    /// remotely and is a local no-op.
    pub async fn delete(&mut self, api: &impl UserApi, id: UserId) -> Result<(), WriteFailure> {
        match api.delete_user(id).await {
            Ok(()) => {
                self.apply(StoreEvent::Deleted(id));
                Ok(())
            }
            Err(source) => Err(WriteFailure {
                operation: WriteOp::Delete,
                id: Some(id),
                source,
            }),
        }
    }

    /// Replace the search term. Takes effect on the next read of
    /// [`UserStore::visible_users`].
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The filtered view the table renders from. Derived, never stored.
    pub fn visible_users(&self) -> Vec<&User> {
        filter_users(&self.users, &self.search_term)
    }

    fn next_local_id(&self) -> UserId {
        let mut id = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as UserId)
            .unwrap_or(0);
        while self.users.iter().any(|u| u.id == id) {
            id += 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Address, Company};
    use crate::error::ApiError;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    /// In-memory stand-in for the remote collection. Failure flags let each
    /// operation be rejected independently.
    #[derive(Default)]
    struct FakeApi {
        listing: Vec<User>,
        fail_list: bool,
        fail_writes: bool,
    }

    fn rejected() -> ApiError {
        ApiError::Status {
            endpoint: "https://fixture.test/users".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[async_trait]
    impl UserApi for FakeApi {
        async fn list_users(&self) -> crate::error::Result<Vec<User>> {
            if self.fail_list {
                return Err(rejected());
            }
            Ok(self.listing.clone())
        }

        async fn create_user(&self, candidate: &NewUser) -> crate::error::Result<User> {
            if self.fail_writes {
                return Err(rejected());
            }
            // Echo the candidate with an arbitrary remote id, as the
            // fixture endpoint does.
            Ok(User {
                id: 11,
                name: candidate.name.clone(),
                email: candidate.email.clone(),
                address: candidate.address.clone(),
                company: candidate.company.clone(),
            })
        }

        async fn update_user(&self, _record: &User) -> crate::error::Result<()> {
            if self.fail_writes { Err(rejected()) } else { Ok(()) }
        }

        async fn delete_user(&self, _id: UserId) -> crate::error::Result<()> {
            if self.fail_writes { Err(rejected()) } else { Ok(()) }
        }
    }

    fn mk_user(id: UserId, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            ..User::default()
        }
    }

    fn seeded() -> UserStore {
        UserStore {
            users: vec![mk_user(1, "Ana", "ana@x.com"), mk_user(2, "Bo", "bo@y.com")],
            ..UserStore::default()
        }
    }

    #[test]
    fn starts_empty_and_idle() {
        let store = UserStore::new();
        assert!(store.users.is_empty());
        assert!(!store.loading);
        assert!(store.error.is_none());
        assert_eq!(store.search_term, "");
    }

    #[test]
    fn fetch_started_raises_loading() {
        let mut store = UserStore::new();
        store.apply(StoreEvent::FetchStarted);
        assert!(store.loading);
    }

    #[tokio::test]
    async fn fetch_replaces_collection_and_clears_loading() {
        let api = FakeApi {
            listing: vec![mk_user(1, "Ana", "ana@x.com")],
            ..FakeApi::default()
        };
        let mut store = UserStore::new();
        store.fetch_all(&api).await;
        assert_eq!(store.users, api.listing);
        assert!(!store.loading);
        assert!(store.error.is_none());
    }

    #[tokio::test]
    async fn failed_fetch_records_message_and_keeps_collection() {
        let api = FakeApi {
            fail_list: true,
            ..FakeApi::default()
        };
        let mut store = seeded();
        let before = store.users.clone();
        store.fetch_all(&api).await;
        assert_eq!(store.users, before);
        assert!(!store.loading);
        assert!(store.error.as_deref().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn successful_fetch_clears_previous_error() {
        let mut store = UserStore::new();
        store.apply(StoreEvent::FetchFailed("boom".into()));
        store.fetch_all(&FakeApi::default()).await;
        assert!(store.error.is_none());
    }

    #[tokio::test]
    async fn create_appends_with_fresh_local_id() {
        let api = FakeApi::default();
        let mut store = seeded();
        let candidate = NewUser {
            name: "Cy".into(),
            email: "cy@z.com".into(),
            address: Address::default(),
            company: Company::default(),
        };
        let id = store.create(&api, candidate).await.unwrap();
        assert_eq!(store.users.len(), 3);
        let created = store.users.last().unwrap();
        assert_eq!(created.id, id);
        assert_eq!(created.name, "Cy");
        assert_eq!(created.email, "cy@z.com");
        // The echoed remote id (11) must not leak into the collection.
        assert_ne!(created.id, 11);
        assert!(store.users.iter().filter(|u| u.id == id).count() == 1);
    }

    #[tokio::test]
    async fn failed_create_leaves_collection_unchanged() {
        let api = FakeApi {
            fail_writes: true,
            ..FakeApi::default()
        };
        let mut store = seeded();
        let err = store
            .create(&api, NewUser::default())
            .await
            .expect_err("create should be rejected");
        assert_eq!(err.operation, WriteOp::Create);
        assert_eq!(err.id, None);
        assert_eq!(store.users.len(), 2);
    }

    #[tokio::test]
    async fn update_replaces_matching_entry() {
        let api = FakeApi::default();
        let mut store = seeded();
        let mut edited = store.users[1].clone();
        edited.name = "Bodhi".into();
        edited.company.name = "Acme".into();
        store.update(&api, edited.clone()).await.unwrap();
        assert_eq!(store.users[1], edited);
        assert_eq!(store.users.len(), 2);
    }

    #[tokio::test]
    async fn update_with_unknown_id_is_a_noop_and_never_inserts() {
        let api = FakeApi::default();
        let mut store = seeded();
        let before = store.users.clone();
        store.update(&api, mk_user(99, "Ghost", "ghost@x.com")).await.unwrap();
        assert_eq!(store.users, before);
    }

    #[tokio::test]
    async fn failed_update_is_typed_and_leaves_state() {
        let api = FakeApi {
            fail_writes: true,
            ..FakeApi::default()
        };
        let mut store = seeded();
        let before = store.users.clone();
        let err = store
            .update(&api, mk_user(1, "Ana2", "ana@x.com"))
            .await
            .expect_err("update should be rejected");
        assert_eq!(err.operation, WriteOp::Update);
        assert_eq!(err.id, Some(1));
        assert_eq!(store.users, before);
    }

    #[tokio::test]
    async fn delete_removes_entry_and_repeats_harmlessly() {
        let api = FakeApi::default();
        let mut store = seeded();
        store.delete(&api, 1).await.unwrap();
        assert!(store.users.iter().all(|u| u.id != 1));
        assert_eq!(store.users.len(), 1);
        store.delete(&api, 1).await.unwrap();
        assert_eq!(store.users.len(), 1);
    }

    #[test]
    fn search_term_filters_on_next_read() {
        let mut store = seeded();
        store.set_search_term("an");
        let visible = store.visible_users();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);

        store.set_search_term("");
        assert_eq!(store.visible_users().len(), 2);
    }

    #[test]
    fn local_ids_stay_unique_under_collisions() {
        let mut store = UserStore::new();
        // Force the collision path by pre-seeding the next few millis.
        let base = store.next_local_id();
        store.users.push(mk_user(base, "a", "a@x.com"));
        store.users.push(mk_user(base + 1, "b", "b@x.com"));
        store.apply(StoreEvent::Created(mk_user(0, "c", "c@x.com")));
        let ids: Vec<UserId> = store.users.iter().map(|u| u.id).collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }
}
