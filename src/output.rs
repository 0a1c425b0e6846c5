//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{AsyncTask, Domain, ForemanObject, Host, PowerState, PuppetClass};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, base: &ForemanObject) -> Vec<String> {
    let title = format!("{kind}: {} (#{})", base.name, base.id);
    let divider = "─".repeat(title.chars().count().max(30));
    let mut lines = vec![title, divider];

    if let Some(created) = base.created_at_utc() {
        lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(updated) = base.updated_at_utc() {
        lines.push(format!("Updated:        {}", updated.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines
}

fn id_list(ids: &[i64]) -> String {
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
}

impl PrettyPrint for Domain {
    fn pretty_print(&self) -> String {
        let mut lines = header("Domain", &self.base);

        if let Some(ref fullname) = self.fullname {
            lines.push(format!("Description:    {}", fullname));
        }
        if self.dns_id > 0 {
            lines.push(format!("DNS Proxy:      #{}", self.dns_id));
        }
        if !self.location_ids.is_empty() {
            lines.push(format!("Locations:      {}", id_list(&self.location_ids)));
        }
        if !self.organization_ids.is_empty() {
            lines.push(format!("Organizations:  {}", id_list(&self.organization_ids)));
        }
        for (name, value) in &self.parameters {
            lines.push(format!("Parameter:      {} = {}", name, value));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Host {
    fn pretty_print(&self) -> String {
        let mut lines = header("Host", &self.base);

        if let Some(ref ip) = self.ip {
            lines.push(format!("IP:             {}", ip));
        }
        if let Some(ref mac) = self.mac {
            lines.push(format!("MAC:            {}", mac));
        }
        lines.push(format!("Build Mode:     {}", if self.build { "yes" } else { "no" }));
        if self.hostgroup_id > 0 {
            lines.push(format!("Host Group:     #{}", self.hostgroup_id));
        }
        if let Some(ref comment) = self.comment {
            lines.push(format!("Comment:        {}", comment));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for PuppetClass {
    fn pretty_print(&self) -> String {
        let mut lines = header("Puppet Class", &self.base);
        if let Some(ref module) = self.module_name {
            lines.push(format!("Module:         {}", module));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for AsyncTask {
    fn pretty_print(&self) -> String {
        let header = format!("Task {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("State:          {}", self.state),
            format!("Result:         {}", self.result),
            format!("Progress:       {:.0}%", self.progress * 100.0),
        ];

        if let Some(ref label) = self.label {
            lines.push(format!("Label:          {}", label));
        }
        if let Some(ref ended) = self.ended_at {
            lines.push(format!("Ended:          {}", ended));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for PowerState {
    fn pretty_print(&self) -> String {
        match self.status_text {
            Some(ref text) => format!("Host #{}: {} ({})", self.id, self.state, text),
            None => format!("Host #{}: {}", self.id, self.state),
        }
    }
}
