use crate::verify::{InventorySnapshot, locker::Item, state::RequesterId};

pub const NONE_LABEL: &str = "None";
pub const MAX_OUTFITS: usize = 3;

// Discord rejects embed field values above 1024 characters.
const FIELD_VALUE_MAX_CHARS: usize = 1024;

/// One labelled line of the channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeField {
    pub name: &'static str,
    pub value: String,
    pub inline: bool,
}

/// What gets announced for a successful verification.
///
/// Only a bounded projection of the locker is kept: up to [`MAX_OUTFITS`] outfit
/// names plus the first back bling and pickaxe. Empty projections read [`NONE_LABEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationNotice {
    pub requester: RequesterId,
    pub display_name: String,
    pub outfits: String,
    pub back_bling: String,
    pub pickaxe: String,
}

impl VerificationNotice {
    #[must_use]
    pub fn new(requester: RequesterId, display_name: &str, snapshot: &InventorySnapshot) -> Self {
        Self {
            requester,
            display_name: display_name.to_string(),
            outfits: project(&snapshot.outfits, MAX_OUTFITS),
            back_bling: project(&snapshot.back_blings, 1),
            pickaxe: project(&snapshot.pickaxes, 1),
        }
    }

    /// Legacy nickname mention of the requester.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@!{}>", self.requester)
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!("**{}** just verified!", escape_markdown(&self.display_name))
    }

    #[must_use]
    pub fn fields(&self) -> [NoticeField; 3] {
        [
            NoticeField {
                name: "Outfits",
                value: self.outfits.clone(),
                inline: false,
            },
            NoticeField {
                name: "Back Bling",
                value: self.back_bling.clone(),
                inline: true,
            },
            NoticeField {
                name: "Pickaxe",
                value: self.pickaxe.clone(),
                inline: true,
            },
        ]
    }
}

fn project(items: &[Item], limit: usize) -> String {
    let names: Vec<&str> = items
        .iter()
        .map(|item| item.name.trim())
        .filter(|name| !name.is_empty())
        .take(limit)
        .collect();

    if names.is_empty() {
        return NONE_LABEL.to_string();
    }

    names.join(", ").chars().take(FIELD_VALUE_MAX_CHARS).collect()
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '*' | '_' | '~' | '`' | '|' | '>') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
