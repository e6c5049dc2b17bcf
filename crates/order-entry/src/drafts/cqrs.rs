use std::{env, sync::Arc};

use cqrs_es::{
    mem_store::MemStore,
    persist::{PersistedEventStore, ViewRepository},
    CqrsFramework, Query,
};
use dynamo_es::{DynamoEventRepository, DynamoViewRepository};

use super::{DraftTable, DraftTableQuery, DraftTableView, MemViewRepository, Services};

pub type DraftsRepo = Arc<Box<dyn ViewRepository<DraftTableView, DraftTable>>>;

pub type DynamoDraftsCqrs =
    Arc<CqrsFramework<DraftTable, PersistedEventStore<DynamoEventRepository, DraftTable>>>;

pub type MemDraftsCqrs = Arc<CqrsFramework<DraftTable, MemStore<DraftTable>>>;

/// Events replayed before a draft table snapshot is taken
const SNAPSHOT_INTERVAL: usize = 20;

/// DynamoDB tables backing the draft store
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DraftStoreTables {
    pub event_log: String,
    pub snapshots: String,
    pub view: String,
}

impl DraftStoreTables {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let table = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            event_log: table("DYNAMODB_EVENT_LOG_TABLE", "order-entry-event-log"),
            snapshots: table("DYNAMODB_EVENT_SNAPSHOTS_TABLE", "order-entry-event-snapshots"),
            view: table("DYNAMODB_DRAFTS_VIEW_TABLE", "order-entry-drafts-view"),
        }
    }
}

pub fn init(
    client: aws_sdk_dynamodb::Client,
    tables: &DraftStoreTables,
    repo: DraftsRepo,
) -> DynamoDraftsCqrs {
    let events = DynamoEventRepository::new(client).with_tables(&tables.event_log, &tables.snapshots);
    let store: PersistedEventStore<DynamoEventRepository, DraftTable> =
        PersistedEventStore::new_snapshot_store(events, SNAPSHOT_INTERVAL);
    let queries: Vec<Box<dyn Query<DraftTable>>> = vec![Box::new(DraftTableQuery::new(repo))];

    Arc::new(CqrsFramework::new(store, queries, Services::default()))
}

pub fn init_repo(client: aws_sdk_dynamodb::Client, tables: &DraftStoreTables) -> DraftsRepo {
    Arc::new(Box::new(DynamoViewRepository::new(&tables.view, client)))
}

/// Event store and read model held in process memory
pub fn init_in_memory() -> (MemDraftsCqrs, DraftsRepo) {
    let repo: DraftsRepo = Arc::new(Box::new(MemViewRepository::default()));
    let queries: Vec<Box<dyn Query<DraftTable>>> =
        vec![Box::new(DraftTableQuery::new(repo.clone()))];

    let cqrs = Arc::new(CqrsFramework::new(
        MemStore::<DraftTable>::default(),
        queries,
        Services::default(),
    ));

    (cqrs, repo)
}
