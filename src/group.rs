//! Named partitions of the named parameters.
//!
//! Membership is owned by the parameters themselves (each names its group),
//! so a parameter moved to another group after registration, or given
//! different attributes, is picked up the next time groups are read:
//! [`fix_groups`] rebuilds the view from the parameters every time.

use std::collections::BTreeMap;

use crate::param::ByName;
use crate::types::{Attributes, ConfigFile};

/// The group a parameter belongs to unless told otherwise.
pub const DEFAULT_GROUP: &str = "cmd";

/// What the registry stores about a group beyond its members.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupRecord {
    pub(crate) description: Option<String>,
    pub(crate) config_files: Vec<ConfigFile>,
}

/// A group as seen by readers: its parameters in registration order.
#[derive(Debug)]
pub struct Group<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub params: Vec<&'a ByName>,
    pub config_files: &'a [ConfigFile],
    /// How many members are hidden from standard usage.
    pub hidden_count: usize,
}

impl Group<'_> {
    /// True if every member is hidden from standard usage.
    pub fn all_hidden(&self) -> bool {
        self.hidden_count == self.params.len()
    }
}

/// Build the group view from the parameters' current group names and
/// attributes. Groups that have a record but no members are left out.
pub(crate) fn fix_groups<'a>(
    params: &'a [ByName],
    records: &'a BTreeMap<String, GroupRecord>,
) -> BTreeMap<&'a str, Group<'a>> {
    let mut groups: BTreeMap<&str, Group<'_>> = BTreeMap::new();
    for p in params {
        let name = p.group_name();
        let group = groups.entry(name).or_insert_with(|| {
            let record = records.get(name);
            Group {
                name,
                description: record.and_then(|r| r.description.as_deref()),
                params: Vec::new(),
                config_files: record.map(|r| r.config_files.as_slice()).unwrap_or(&[]),
                hidden_count: 0,
            }
        });
        if p.has_attr(Attributes::DONT_SHOW_IN_STD_USAGE) {
            group.hidden_count += 1;
        }
        group.params.push(p);
    }
    groups
}

/// Group names start with a letter, contain letters, digits, `-` and `.`,
/// and end with a letter or digit.
///
/// # Panics
///
/// Panics if the name breaks these rules.
pub(crate) fn check_group_name(name: &str) {
    let Some(first) = name.chars().next() else {
        panic!("the group name must not be empty");
    };
    if !first.is_ascii_alphabetic() {
        panic!("group '{name}': the name must start with a letter");
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        panic!("group '{name}': the name may not contain '{bad}'");
    }
    if name.ends_with(['-', '.']) {
        panic!("group '{name}': the name must end with a letter or digit");
    }
}
