pub mod layout;
pub mod theme;

use clap::ValueEnum;

/// Which list page is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tab {
    #[default]
    Accounts,
    Clients,
    Automations,
    RecurringJobs,
    Reminders,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Accounts,
        Tab::Clients,
        Tab::Automations,
        Tab::RecurringJobs,
        Tab::Reminders,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Accounts => "1:Accounts",
            Tab::Clients => "2:Clients",
            Tab::Automations => "3:Automations",
            Tab::RecurringJobs => "4:Recurring",
            Tab::Reminders => "5:Reminders",
        }
    }

    pub fn from_index(i: usize) -> Option<Tab> {
        Tab::ALL.get(i).copied()
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which part of the page currently receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    FilterBar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_round_trip() {
        for (i, tab) in Tab::ALL.iter().enumerate() {
            assert_eq!(Tab::from_index(i), Some(*tab));
            assert_eq!(tab.index(), i);
        }
        assert_eq!(Tab::from_index(99), None);
    }

    #[test]
    fn tab_labels() {
        assert_eq!(Tab::Accounts.label(), "1:Accounts");
        assert_eq!(Tab::RecurringJobs.label(), "4:Recurring");
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(Tab::Reminders.next(), Tab::Accounts);
        assert_eq!(Tab::Accounts.prev(), Tab::Reminders);
        assert_eq!(Tab::Clients.next(), Tab::Automations);
    }

    #[test]
    fn tab_value_names() {
        assert_eq!(Tab::from_str("recurring-jobs", true), Ok(Tab::RecurringJobs));
        assert!(Tab::from_str("invoices", true).is_err());
    }
}
