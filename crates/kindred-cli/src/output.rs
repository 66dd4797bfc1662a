//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use kindred_domain::traits::MemberPage;
use kindred_domain::{Member, RelationEdge};
use kindred_import::ImportResult;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// A relation edge as seen from one member, with the code at the other end.
#[derive(Debug, Clone)]
pub struct RelationView {
    /// The stored edge
    pub edge: RelationEdge,

    /// True if the member is `member1` of the edge
    pub outgoing: bool,

    /// Code of the member at the other end
    pub other_code: String,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the outcome of an import batch.
    pub fn format_import_result(&self, result: &ImportResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(result.summary()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["", "Created", "Updated"]);
                builder.push_record([
                    "Members".to_string(),
                    result.members_created.to_string(),
                    result.members_updated.to_string(),
                ]);
                builder.push_record([
                    "Relations".to_string(),
                    result.relations_created.to_string(),
                    result.relations_updated.to_string(),
                ]);

                let mut out = self.table(builder);
                out.push('\n');

                if result.errors.is_empty() {
                    out.push_str(&self.success(&format!("Batch {} imported", result.batch_id)));
                } else {
                    out.push_str(&self.warning(&format!(
                        "Batch {} imported with {} error(s)",
                        result.batch_id,
                        result.errors.len()
                    )));
                    let mut errors = Builder::default();
                    errors.push_record(["Line", "Error"]);
                    for error in &result.errors {
                        errors.push_record([error.line.to_string(), error.message.clone()]);
                    }
                    out.push('\n');
                    out.push_str(&self.table(errors));
                }

                Ok(out)
            }
        }
    }

    /// Format one page of members.
    pub fn format_members(&self, page: &MemberPage) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let items: Vec<serde_json::Value> = page.items.iter().map(member_json).collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "items": items,
                    "total": page.total,
                    "page": page.page,
                    "limit": page.limit,
                    "totalPages": page.total_pages(),
                }))?)
            }
            OutputFormat::Quiet => {
                let codes: Vec<&str> = page.items.iter().map(Member::code).collect();
                Ok(codes.join("\n"))
            }
            OutputFormat::Table => {
                if page.items.is_empty() {
                    return Ok(self.colorize("No members found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Code", "Name", "Nickname", "Born", "Died", "City"]);
                for member in &page.items {
                    let data = &member.data;
                    let city = data.address.as_ref().and_then(|a| a.city.clone());
                    builder.push_record([
                        data.code.clone(),
                        member.display_name(),
                        data.nick_name.clone().unwrap_or_default(),
                        data.birth_date.map(|d| d.to_string()).unwrap_or_default(),
                        data.death_date.map(|d| d.to_string()).unwrap_or_default(),
                        city.unwrap_or_default(),
                    ]);
                }

                let mut out = self.table(builder);
                out.push('\n');
                out.push_str(&self.info(&format!(
                    "Page {} of {} ({} member(s))",
                    page.page,
                    page.total_pages(),
                    page.total
                )));
                Ok(out)
            }
        }
    }

    /// Format the relations of `member`.
    pub fn format_relations(&self, member: &Member, relations: &[RelationView]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let edges: Vec<serde_json::Value> = relations
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.edge.id.value(),
                            "type": r.edge.relation_type.as_str(),
                            "direction": if r.outgoing { "outgoing" } else { "incoming" },
                            "otherCode": r.other_code,
                            "rank": r.edge.rank,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "member": member_json(member),
                    "relations": edges,
                }))?)
            }
            OutputFormat::Quiet => {
                let codes: Vec<&str> = relations.iter().map(|r| r.other_code.as_str()).collect();
                Ok(codes.join("\n"))
            }
            OutputFormat::Table => {
                let header = self.colorize(
                    &format!("{} ({})", member.display_name(), member.code()),
                    "cyan",
                );
                if relations.is_empty() {
                    return Ok(format!("{}\n{}", header, self.colorize("No relations found.", "yellow")));
                }

                let mut builder = Builder::default();
                builder.push_record(["Type", "Direction", "Other", "Rank"]);
                for r in relations {
                    builder.push_record([
                        r.edge.relation_type.to_string(),
                        if r.outgoing { "->" } else { "<-" }.to_string(),
                        r.other_code.clone(),
                        r.edge.rank.map(|rank| rank.to_string()).unwrap_or_default(),
                    ]);
                }

                Ok(format!("{}\n{}", header, self.table(builder)))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn member_json(member: &Member) -> serde_json::Value {
    let data = &member.data;
    let address = data.address.as_ref().map(|a| {
        serde_json::json!({
            "street": a.street,
            "complement": a.complement,
            "postalCode": a.postal_code,
            "city": a.city,
            "country": a.country,
        })
    });

    let social_networks: Vec<serde_json::Value> = data
        .social_networks
        .iter()
        .map(|n| {
            serde_json::json!({
                "socialNetworkType": n.network_type.as_str(),
                "value": n.value,
            })
        })
        .collect();

    serde_json::json!({
        "id": member.id.value(),
        "code": data.code,
        "firstName": data.first_name,
        "lastName": data.last_name,
        "nickName": data.nick_name,
        "birthDate": data.birth_date.map(|d| d.to_string()),
        "deathDate": data.death_date.map(|d| d.to_string()),
        "phoneNumber": data.phone_number,
        "mobileNumber": data.mobile_number,
        "email": data.email,
        "website": data.website,
        "biography": data.biography,
        "address": address,
        "socialNetworks": social_networks,
    })
}
