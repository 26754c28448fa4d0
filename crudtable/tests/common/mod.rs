//! In-memory `ResourceApi` used by the controller tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use crudtable_lib::api::FormData;
use crudtable_lib::api::ResourceApi;
use crudtable_lib::api::query::Direction;
use crudtable_lib::api::query::QueryState;
use crudtable_lib::error::ApiError;
use crudtable_lib::error::Error;
use crudtable_lib::error::FieldValidationError;
use crudtable_lib::error::ValidationError;
use crudtable_lib::model::ColumnInfo;
use crudtable_lib::model::Created;
use crudtable_lib::model::FilterOperator;
use crudtable_lib::model::Item;
use crudtable_lib::model::ItemId;
use crudtable_lib::model::Permissions;
use crudtable_lib::model::ResourceInfo;
use crudtable_lib::model::ResultSet;
use crudtable_lib::model::Row;
use serde_json::json;
use tokio::sync::oneshot;

pub const RESOURCE: &str = "contacts";

#[derive(Debug, Clone)]
pub struct Contact {
    pub id: i64,
    pub name: String,
}

pub struct FakeApi {
    pub records: Mutex<Vec<Contact>>,
    pub info: Mutex<ResourceInfo>,
    /// Every list query received, in call order.
    pub calls: Mutex<Vec<QueryState>>,
    /// Every body received by `create`.
    pub created: Mutex<Vec<FormData>>,
    gates: Mutex<Vec<(QueryState, oneshot::Receiver<()>)>>,
    pub fail_list: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl FakeApi {
    /// `count` contacts named `Contact 00`, `Contact 01`, ...
    pub fn with_contacts(count: usize) -> Self {
        let records = (0..count)
            .map(|i| Contact {
                id: i as i64 + 1,
                name: format!("Contact {i:02}"),
            })
            .collect();

        Self {
            records: Mutex::new(records),
            info: Mutex::new(info(Permissions::all())),
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            gates: Mutex::new(Vec::new()),
            fail_list: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn permissions(self, permissions: Permissions) -> Self {
        self.info.lock().unwrap().permissions = permissions;
        self
    }

    pub fn add_column(self, column: ColumnInfo) -> Self {
        self.info.lock().unwrap().add_columns.push(column);
        self
    }

    /// Hold the response to `query` until the returned sender fires.
    pub fn gate(&self, query: &QueryState) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push((query.clone(), rx));
        tx
    }

    pub fn list_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> QueryState {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }

    fn page(&self, query: &QueryState) -> ResultSet {
        let mut records: Vec<Contact> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|c| {
                query
                    .filters()
                    .iter()
                    .all(|f| f.col != "name" || f.opr != "sw" || c.name.starts_with(&f.value))
            })
            .cloned()
            .collect();

        if let Some(order) = query.order() {
            records.sort_by(|a, b| a.name.cmp(&b.name));
            if order.direction == Direction::Desc {
                records.reverse();
            }
        }

        let count = records.len();
        let page: Vec<Contact> = records
            .into_iter()
            .skip(query.page() * query.page_size())
            .take(query.page_size())
            .collect();

        ResultSet {
            count,
            ids: page.iter().map(|c| ItemId::Int(c.id)).collect(),
            rows: page
                .iter()
                .map(|c| Row::flatten(&json!({"name": c.name, "group": {"name": "Friends"}})))
                .collect(),
            list_columns: vec!["name".into(), "group.name".into()],
            label_columns: [
                ("name".to_string(), "Name".to_string()),
                ("group.name".to_string(), "Group".to_string()),
            ]
            .into(),
            list_title: Some("List Contacts".into()),
        }
    }
}

pub fn info(permissions: Permissions) -> ResourceInfo {
    let mut filters = BTreeMap::new();
    filters.insert(
        "name".to_string(),
        vec![
            FilterOperator::new("Starts with", "sw"),
            FilterOperator::new("Equal to", "eq"),
        ],
    );
    ResourceInfo {
        add_title: "Add Contact".into(),
        edit_title: "Edit Contact".into(),
        add_columns: vec![ColumnInfo::new("name", "Name", "String").required()],
        edit_columns: Vec::new(),
        filters,
        permissions,
    }
}

#[async_trait]
impl ResourceApi for FakeApi {
    async fn list(&self, _resource: &str, query: &QueryState) -> Result<ResultSet, Error> {
        self.calls.lock().unwrap().push(query.clone());

        let gate = {
            let mut gates = self.gates.lock().unwrap();
            gates
                .iter()
                .position(|(q, _)| q == query)
                .map(|i| gates.remove(i).1)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.fail_list.swap(false, Ordering::SeqCst) {
            return Err(ApiError::http(500, "").into());
        }
        Ok(self.page(query))
    }

    async fn info(&self, _resource: &str) -> Result<ResourceInfo, Error> {
        Ok(self.info.lock().unwrap().clone())
    }

    async fn get_item(&self, resource: &str, id: &ItemId) -> Result<Item, Error> {
        let records = self.records.lock().unwrap();
        let contact = records
            .iter()
            .find(|c| ItemId::Int(c.id) == *id)
            .ok_or_else(|| Error::NotFound {
                resource: resource.to_string(),
                id: Some(id.to_string()),
            })?;

        Ok(Item {
            id: Some(id.clone()),
            show_title: "Show Contact".into(),
            label_columns: [("name".to_string(), "Name".to_string())].into(),
            show_columns: vec!["name".into()],
            result: Row::flatten(&json!({"name": contact.name})),
        })
    }

    async fn create(&self, _resource: &str, data: &FormData) -> Result<Created, Error> {
        self.created.lock().unwrap().push(data.clone());

        let name = data.get("name").and_then(|v| v.as_str()).unwrap_or("");
        if name == "Taken" {
            return Err(ValidationError::with_fields(
                422,
                vec![FieldValidationError::new("name", "Already exists.")],
            )
            .into());
        }

        let mut records = self.records.lock().unwrap();
        let id = records.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        records.push(Contact {
            id,
            name: name.to_string(),
        });
        Ok(Created {
            id: Some(ItemId::Int(id)),
            result: Row::flatten(&json!(data)),
        })
    }

    async fn delete(&self, resource: &str, id: &ItemId) -> Result<String, Error> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ApiError::http(500, "").into());
        }

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|c| ItemId::Int(c.id) != *id);
        if records.len() == before {
            return Err(Error::NotFound {
                resource: resource.to_string(),
                id: Some(id.to_string()),
            });
        }
        Ok("OK".into())
    }
}
