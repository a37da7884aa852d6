use anyhow::Result;
use chrono::NaiveDate;

use super::DataProvider;
use crate::model::entities::{
    Account, AccountKind, Automation, Client, Dataset, RecurringJob, Reminder,
};

/// Built-in sample workspace used by `clientdesk demo`.
pub struct FixtureProvider;

impl DataProvider for FixtureProvider {
    fn describe(&self) -> String {
        "built-in sample workspace".to_string()
    }

    fn fetch_rows(&self) -> Result<Dataset> {
        Ok(Dataset {
            accounts: accounts(),
            clients: clients(),
            automations: automations(),
            recurring_jobs: recurring_jobs(),
            reminders: reminders(),
        })
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn account(
    id: &str,
    name: &str,
    kind: AccountKind,
    owner: &str,
    tags: &[&str],
    open_jobs: u32,
    unpaid_invoices: f64,
    created: NaiveDate,
) -> Account {
    Account {
        id: id.into(),
        name: name.into(),
        kind,
        owner: owner.into(),
        tags: strings(tags),
        open_jobs,
        unpaid_invoices,
        created,
    }
}

#[rustfmt::skip]
fn accounts() -> Vec<Account> {
    use AccountKind::{Company, Individual};
    vec![
        account("acc-1001", "Birch & Hale LLP", Company, "Dana Lee", &["vip", "tax"], 4, 1250.0, day(2024, 2, 11)),
        account("acc-1002", "Marta Oliveira", Individual, "Sam Ortiz", &["1040"], 1, 0.0, day(2024, 5, 3)),
        account("acc-1003", "Northwind Bakery", Company, "Dana Lee", &["payroll", "bookkeeping"], 9, 430.75, day(2023, 11, 20)),
        account("acc-1004", "Émile Durand", Individual, "Priya Shah", &[], 0, 0.0, day(2025, 1, 8)),
        account("acc-1005", "Kestrel Logistics", Company, "Sam Ortiz", &["audit"], 10, 8800.0, day(2022, 7, 30)),
        account("acc-1006", "Hana Kobayashi", Individual, "Priya Shah", &["1040", "planning"], 2, 95.0, day(2025, 3, 17)),
        account("acc-1007", "Greenfield Dental", Company, "Alex Moreau", &["payroll"], 3, 0.0, day(2024, 9, 1)),
        account("acc-1008", "Osei Family Trust", Company, "Alex Moreau", &["trust", "tax"], 1, 2100.0, day(2023, 4, 22)),
    ]
}

#[rustfmt::skip]
fn clients() -> Vec<Client> {
    let client = |id: &str, name: &str, email: &str, phone: Option<&str>, account: &str, portal: bool, login: Option<NaiveDate>| Client {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone: phone.map(Into::into),
        account: account.into(),
        portal_access: portal,
        last_login: login,
    };
    vec![
        client("cli-01", "Margaret Birch", "margaret@birchhale.com", Some("+1 415 555 0142"), "Birch & Hale LLP", true, Some(day(2025, 6, 2))),
        client("cli-02", "Thomas Hale", "thomas@birchhale.com", None, "Birch & Hale LLP", true, None),
        client("cli-03", "Marta Oliveira", "marta.oliveira@mail.com", Some("+1 212 555 0199"), "Marta Oliveira", true, Some(day(2025, 5, 28))),
        client("cli-04", "Jonas Weber", "jonas@northwindbakery.com", Some("+1 646 555 0101"), "Northwind Bakery", false, None),
        client("cli-05", "Émile Durand", "emile@durand.fr", None, "Émile Durand", true, Some(day(2025, 4, 9))),
        client("cli-06", "Rita Kestrel", "rita@kestrel.io", Some("+1 312 555 0175"), "Kestrel Logistics", true, Some(day(2025, 6, 11))),
        client("cli-07", "Kwame Osei", "kwame@oseitrust.org", None, "Osei Family Trust", false, None),
    ]
}

#[rustfmt::skip]
fn automations() -> Vec<Automation> {
    let automation = |id: &str, name: &str, trigger: &str, pipeline: &str, runs: u32, active: bool, updated: NaiveDate| Automation {
        id: id.into(),
        name: name.into(),
        trigger: trigger.into(),
        pipeline: pipeline.into(),
        runs,
        active,
        updated,
    };
    vec![
        automation("aut-1", "Send organizer", "Job enters stage", "Tax returns", 142, true, day(2025, 1, 14)),
        automation("aut-2", "Request signature", "Job enters stage", "Tax returns", 98, true, day(2025, 2, 2)),
        automation("aut-3", "Invoice on completion", "Job completed", "Bookkeeping", 310, true, day(2024, 12, 5)),
        automation("aut-4", "Welcome email", "Account created", "Onboarding", 9, false, day(2025, 3, 30)),
        automation("aut-5", "Archive inactive", "Schedule", "Onboarding", 10, true, day(2024, 8, 19)),
    ]
}

#[rustfmt::skip]
fn recurring_jobs() -> Vec<RecurringJob> {
    let job = |id: &str, name: &str, account: &str, pipeline: &str, frequency: &str, next_run: NaiveDate, assignees: &[&str]| RecurringJob {
        id: id.into(),
        name: name.into(),
        account: account.into(),
        pipeline: pipeline.into(),
        frequency: frequency.into(),
        next_run,
        assignees: strings(assignees),
    };
    vec![
        job("job-1", "Monthly close", "Northwind Bakery", "Bookkeeping", "Monthly", day(2025, 7, 1), &["Dana Lee"]),
        job("job-2", "Payroll run", "Greenfield Dental", "Payroll", "Every 2 weeks", day(2025, 6, 20), &["Alex Moreau", "Sam Ortiz"]),
        job("job-3", "Quarterly estimates", "Marta Oliveira", "Tax returns", "Quarterly", day(2025, 9, 15), &["Sam Ortiz"]),
        job("job-4", "Annual audit", "Kestrel Logistics", "Audit", "Yearly", day(2026, 1, 10), &[]),
        job("job-5", "Trust accounting", "Osei Family Trust", "Bookkeeping", "Monthly", day(2025, 7, 5), &["Alex Moreau"]),
    ]
}

#[rustfmt::skip]
fn reminders() -> Vec<Reminder> {
    let reminder = |id: &str, subject: &str, account: &str, channel: &str, due: NaiveDate, sent: u32, status: &str| Reminder {
        id: id.into(),
        subject: subject.into(),
        account: account.into(),
        channel: channel.into(),
        due,
        sent,
        status: status.into(),
    };
    vec![
        reminder("rem-1", "Upload 1099 forms", "Marta Oliveira", "Email", day(2025, 6, 30), 2, "Pending"),
        reminder("rem-2", "Sign engagement letter", "Kestrel Logistics", "Portal", day(2025, 6, 18), 9, "Overdue"),
        reminder("rem-3", "Approve payroll", "Greenfield Dental", "SMS", day(2025, 6, 19), 10, "Pending"),
        reminder("rem-4", "Pay invoice #2041", "Birch & Hale LLP", "Email", day(2025, 6, 25), 1, "Pending"),
        reminder("rem-5", "Complete organizer", "Hana Kobayashi", "Portal", day(2025, 7, 2), 0, "Scheduled"),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::model::record::Record;

    fn unique<T: Record>(rows: &[T]) -> bool {
        let ids: HashSet<&str> = rows.iter().map(|r| r.id()).collect();
        ids.len() == rows.len()
    }

    #[test]
    fn fixtures_load_every_section() {
        let ds = FixtureProvider.fetch_rows().unwrap();
        assert!(!ds.accounts.is_empty());
        assert!(!ds.clients.is_empty());
        assert!(!ds.automations.is_empty());
        assert!(!ds.recurring_jobs.is_empty());
        assert!(!ds.reminders.is_empty());
    }

    #[test]
    fn fixture_ids_are_unique() {
        let ds = FixtureProvider.fetch_rows().unwrap();
        assert!(unique(&ds.accounts));
        assert!(unique(&ds.clients));
        assert!(unique(&ds.automations));
        assert!(unique(&ds.recurring_jobs));
        assert!(unique(&ds.reminders));
    }

    #[test]
    fn fixture_dates_are_valid() {
        let ds = FixtureProvider.fetch_rows().unwrap();
        assert!(ds.accounts.iter().all(|a| a.created != NaiveDate::default()));
    }
}
