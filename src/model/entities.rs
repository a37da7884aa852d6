use chrono::NaiveDate;
use serde::Deserialize;

use super::record::{CellValue, Field, Record};

/// Everything the list pages show, as delivered by a data provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub accounts: Vec<Account>,
    pub clients: Vec<Client>,
    pub automations: Vec<Automation>,
    pub recurring_jobs: Vec<RecurringJob>,
    pub reminders: Vec<Reminder>,
}

/// A record type that has its own list page.
pub trait Entity: Record + Clone + Send + Sync + 'static {
    /// Page title, also used for the tab.
    const TITLE: &'static str;
    /// Singular noun for empty states ("account").
    const NOUN: &'static str;

    /// Default column order with accessors.
    fn columns() -> Vec<Field<Self>>;

    fn rows(dataset: &Dataset) -> &[Self];
}

fn date(d: &NaiveDate) -> CellValue {
    // ISO dates order correctly as text.
    CellValue::Text(d.format("%Y-%m-%d").to_string())
}

fn list(items: &[String]) -> CellValue {
    if items.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(items.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Individual,
    Company,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    pub owner: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub open_jobs: u32,
    #[serde(default)]
    pub unpaid_invoices: f64,
    pub created: NaiveDate,
}

impl Record for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Account {
    const TITLE: &'static str = "Accounts";
    const NOUN: &'static str = "account";

    fn columns() -> Vec<Field<Self>> {
        vec![
            Field::new("name", "Name", |a: &Account| a.name.as_str().into()).sortable(),
            Field::new("kind", "Type", |a: &Account| {
                CellValue::from(match a.kind {
                    AccountKind::Individual => "Individual",
                    AccountKind::Company => "Company",
                })
            }),
            Field::new("owner", "Owner", |a: &Account| a.owner.as_str().into()).sortable(),
            Field::new("tags", "Tags", |a: &Account| list(&a.tags)),
            Field::new("open_jobs", "Jobs", |a: &Account| a.open_jobs.into()).sortable(),
            Field::new("unpaid_invoices", "Unpaid", |a: &Account| {
                a.unpaid_invoices.into()
            })
            .sortable(),
            Field::new("created", "Created", |a: &Account| date(&a.created)).sortable(),
        ]
    }

    fn rows(dataset: &Dataset) -> &[Self] {
        &dataset.accounts
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub account: String,
    #[serde(default)]
    pub portal_access: bool,
    #[serde(default)]
    pub last_login: Option<NaiveDate>,
}

impl Record for Client {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Client {
    const TITLE: &'static str = "Clients";
    const NOUN: &'static str = "client";

    fn columns() -> Vec<Field<Self>> {
        vec![
            Field::new("name", "Name", |c: &Client| c.name.as_str().into()).sortable(),
            Field::new("email", "Email", |c: &Client| c.email.as_str().into()).sortable(),
            Field::new("phone", "Phone", |c: &Client| c.phone.clone().into()),
            Field::new("account", "Account", |c: &Client| c.account.as_str().into()).sortable(),
            Field::new("portal", "Portal", |c: &Client| {
                CellValue::from(if c.portal_access { "Yes" } else { "No" })
            }),
            Field::new("last_login", "Last login", |c: &Client| {
                c.last_login.as_ref().map_or(CellValue::Empty, date)
            })
            .sortable(),
        ]
    }

    fn rows(dataset: &Dataset) -> &[Self] {
        &dataset.clients
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Automation {
    pub id: String,
    pub name: String,
    pub trigger: String,
    pub pipeline: String,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub active: bool,
    pub updated: NaiveDate,
}

impl Record for Automation {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Automation {
    const TITLE: &'static str = "Automations";
    const NOUN: &'static str = "automation";

    fn columns() -> Vec<Field<Self>> {
        vec![
            Field::new("name", "Name", |a: &Automation| a.name.as_str().into()).sortable(),
            Field::new("trigger", "Trigger", |a: &Automation| a.trigger.as_str().into()),
            Field::new("pipeline", "Pipeline", |a: &Automation| {
                a.pipeline.as_str().into()
            })
            .sortable(),
            Field::new("runs", "Runs", |a: &Automation| a.runs.into()).sortable(),
            Field::new("status", "Status", |a: &Automation| {
                CellValue::from(if a.active { "Active" } else { "Paused" })
            }),
            Field::new("updated", "Updated", |a: &Automation| date(&a.updated)).sortable(),
        ]
    }

    fn rows(dataset: &Dataset) -> &[Self] {
        &dataset.automations
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurringJob {
    pub id: String,
    pub name: String,
    pub account: String,
    pub pipeline: String,
    pub frequency: String,
    pub next_run: NaiveDate,
    #[serde(default)]
    pub assignees: Vec<String>,
}

impl Record for RecurringJob {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for RecurringJob {
    const TITLE: &'static str = "Recurring jobs";
    const NOUN: &'static str = "recurring job";

    fn columns() -> Vec<Field<Self>> {
        vec![
            Field::new("name", "Job", |j: &RecurringJob| j.name.as_str().into()).sortable(),
            Field::new("account", "Account", |j: &RecurringJob| {
                j.account.as_str().into()
            })
            .sortable(),
            Field::new("pipeline", "Pipeline", |j: &RecurringJob| {
                j.pipeline.as_str().into()
            }),
            Field::new("frequency", "Repeats", |j: &RecurringJob| {
                j.frequency.as_str().into()
            }),
            Field::new("next_run", "Next run", |j: &RecurringJob| date(&j.next_run)).sortable(),
            Field::new("assignees", "Assignees", |j: &RecurringJob| list(&j.assignees)),
        ]
    }

    fn rows(dataset: &Dataset) -> &[Self] {
        &dataset.recurring_jobs
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub subject: String,
    pub account: String,
    pub channel: String,
    pub due: NaiveDate,
    #[serde(default)]
    pub sent: u32,
    #[serde(default)]
    pub status: String,
}

impl Record for Reminder {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Reminder {
    const TITLE: &'static str = "Reminders";
    const NOUN: &'static str = "reminder";

    fn columns() -> Vec<Field<Self>> {
        vec![
            Field::new("subject", "Subject", |r: &Reminder| r.subject.as_str().into()).sortable(),
            Field::new("account", "Account", |r: &Reminder| r.account.as_str().into()).sortable(),
            Field::new("channel", "Channel", |r: &Reminder| r.channel.as_str().into()),
            Field::new("due", "Due", |r: &Reminder| date(&r.due)).sortable(),
            Field::new("sent", "Sent", |r: &Reminder| r.sent.into()).sortable(),
            Field::new("status", "Status", |r: &Reminder| r.status.as_str().into()),
        ]
    }

    fn rows(dataset: &Dataset) -> &[Self] {
        &dataset.reminders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::ColumnDescriptor;

    fn assert_sane_columns<T: Entity>() {
        let cols: Vec<ColumnDescriptor> = T::columns().into_iter().map(|f| f.column).collect();
        let mut ids: Vec<&str> = cols.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), cols.len(), "{} has duplicate column ids", T::TITLE);
        assert!(cols.iter().filter(|c| c.sortable).count() >= 2);
    }

    #[test]
    fn every_entity_has_unique_columns_and_two_sortable() {
        assert_sane_columns::<Account>();
        assert_sane_columns::<Client>();
        assert_sane_columns::<Automation>();
        assert_sane_columns::<RecurringJob>();
        assert_sane_columns::<Reminder>();
    }

    #[test]
    fn dataset_sections_default_to_empty() {
        let ds: Dataset = serde_json::from_str(r#"{"accounts": []}"#).unwrap();
        assert!(ds.clients.is_empty());
        assert!(ds.reminders.is_empty());
    }

    #[test]
    fn account_accessors() {
        let account: Account = serde_json::from_str(
            r#"{"id":"a1","name":"Birch & Co","kind":"company","owner":"Dana Lee",
                "tags":["vip","payroll"],"open_jobs":3,"unpaid_invoices":1250.5,
                "created":"2025-03-14"}"#,
        )
        .unwrap();
        let cols = Account::columns();
        let cell = |id: &str| {
            cols.iter()
                .find(|f| f.id() == id)
                .map(|f| f.value(&account).to_string())
                .unwrap()
        };
        assert_eq!(cell("kind"), "Company");
        assert_eq!(cell("tags"), "vip, payroll");
        assert_eq!(cell("open_jobs"), "3");
        assert_eq!(cell("unpaid_invoices"), "1250.50");
        assert_eq!(cell("created"), "2025-03-14");
    }

    #[test]
    fn client_without_login_is_empty() {
        let client: Client = serde_json::from_str(
            r#"{"id":"c1","name":"Ann","email":"ann@example.com","account":"Birch & Co"}"#,
        )
        .unwrap();
        let field = Client::columns()
            .into_iter()
            .find(|f| f.id() == "last_login")
            .unwrap();
        assert!(field.value(&client).is_empty());
    }
}
